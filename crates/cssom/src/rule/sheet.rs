//! The style sheet: the top-level rule container.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};

use super::{Origin, RuleBlock, RuleContainer, RuleList, StyleSheetRef};

static NEXT_SHEET_ID: AtomicU64 = AtomicU64::new(1);

/// [CSSOM § 6.1 CSS Style Sheets](https://drafts.csswg.org/cssom/#css-style-sheets)
///
/// An ordered list of rule blocks with a cascade origin. Every block added
/// to the sheet is linked back to it; changing the origin relinks them.
///
/// Equality and hashing look at origin and rules only, never at the sheet's
/// identity.
#[derive(Debug, Clone)]
pub struct StyleSheet {
    id: u64,
    origin: Origin,
    rules: RuleList<RuleBlock>,
}

impl StyleSheet {
    /// An empty style sheet with a fresh identity.
    #[must_use]
    pub fn new(origin: Origin) -> Self {
        Self {
            id: NEXT_SHEET_ID.fetch_add(1, Ordering::Relaxed),
            origin,
            rules: RuleList::new(),
        }
    }

    /// The sheet's cascade origin.
    #[must_use]
    pub const fn origin(&self) -> Origin {
        self.origin
    }

    /// Change the origin and relink every rule block.
    pub fn set_origin(&mut self, origin: Origin) {
        self.origin = origin;
        let link = Some(self.link());
        for rule in self.rules.iter_mut() {
            rule.set_style_sheet(link);
        }
    }

    /// The handle rule blocks carry to point back at this sheet.
    #[must_use]
    pub const fn link(&self) -> StyleSheetRef {
        StyleSheetRef {
            id: self.id,
            origin: self.origin,
        }
    }

    /// Serialize every rule block.
    #[must_use]
    pub fn to_css(&self) -> String {
        self.rules.iter().map(|rule| rule.to_css(0)).collect()
    }
}

impl Default for StyleSheet {
    fn default() -> Self {
        Self::new(Origin::default())
    }
}

impl RuleContainer for StyleSheet {
    type Item = RuleBlock;

    fn list(&self) -> &RuleList<RuleBlock> {
        &self.rules
    }

    fn list_mut(&mut self) -> &mut RuleList<RuleBlock> {
        &mut self.rules
    }

    fn adopt(&self, item: &mut RuleBlock) {
        item.set_style_sheet(Some(self.link()));
    }

    fn release(&self, item: &mut RuleBlock) {
        item.set_style_sheet(None);
    }
}

impl PartialEq for StyleSheet {
    fn eq(&self, other: &Self) -> bool {
        self.origin == other.origin && self.rules == other.rules
    }
}

impl Hash for StyleSheet {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.origin.hash(state);
        self.rules.hash(state);
    }
}

impl fmt::Display for StyleSheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css())
    }
}
