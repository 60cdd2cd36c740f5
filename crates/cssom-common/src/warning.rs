//! Diagnostics with colored terminal output.
//!
//! Provides deduplication so that a style sheet full of the same invalid
//! construct reports it once. Used by the term, calc and selector modules
//! to report values that were accepted but marked invalid.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

use owo_colors::OwoColorize;

/// Global set of warnings we've already printed (to deduplicate).
///
/// Only grows between [`clear_warnings`] calls; its size is bounded by the
/// number of distinct `[component] message` strings emitted.
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Report a recoverable problem (prints once per unique message).
///
/// # Example
/// ```ignore
/// warn_once("calc", "type mismatch between length and angle operands");
/// ```
pub fn warn_once(component: &str, message: &str) {
    let key = format!("[{component}] {message}");
    let should_print = WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get_or_insert_with(HashSet::new)
        .insert(key);

    if should_print {
        let line = format!("[cssom {component}] {message}");
        eprintln!("{}", line.yellow());
    }
}

/// Snapshot of every warning recorded since the last [`clear_warnings`],
/// sorted for stable comparison.
#[must_use]
pub fn emitted_warnings() -> Vec<String> {
    let guard = WARNED.lock().unwrap_or_else(PoisonError::into_inner);
    let mut warnings: Vec<String> = guard
        .as_ref()
        .map(|set| set.iter().cloned().collect())
        .unwrap_or_default();
    warnings.sort();
    warnings
}

/// Clear all recorded warnings (call when processing a new style sheet)
pub fn clear_warnings() {
    let mut guard = WARNED.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(set) = guard.as_mut() {
        set.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warning_is_recorded_once_until_cleared() {
        warn_once("test", "duplicate message");
        warn_once("test", "duplicate message");
        let recorded = emitted_warnings()
            .into_iter()
            .filter(|w| w == "[test] duplicate message")
            .count();
        assert_eq!(recorded, 1);

        clear_warnings();
        assert!(emitted_warnings().is_empty());

        warn_once("test", "duplicate message");
        assert_eq!(emitted_warnings(), vec!["[test] duplicate message".to_string()]);
    }
}
