//! Rule containers
//!
//! [CSSOM § 6.4 CSS Rules](https://drafts.csswg.org/cssom/#css-rules)
//!
//! Every rule is an ordered, mutable list of children (declarations, terms
//! or nested rules) plus rule-specific metadata. The lists share one
//! mutation contract through [`RuleContainer`]: `replace_all` swaps the
//! contents, `unlock` empties the list so it can be refilled, and every
//! mutation clears the cached content hash.
//!
//! ```text
//!   StyleSheet ── RuleBlock ─┬─ RuleSet ──────── Declaration ── Term
//!                            ├─ RuleMedia ────── RuleSet
//!                            ├─ RuleKeyframes ── KeyframeBlock ── Declaration
//!                            ├─ RuleFontFace ─── Declaration
//!                            ├─ RulePage ─────── PageItem (Declaration | RuleMargin)
//!                            └─ RuleViewport ─── Declaration
//! ```

mod block;
mod font_face;
mod page;
mod sheet;

use std::cell::Cell;
use std::collections::hash_map::DefaultHasher;
use std::fmt::{self, Write};
use std::hash::{Hash, Hasher};
use std::slice;

use serde::Serialize;
use strum_macros::{AsRefStr, Display, EnumString};

use crate::error::CssError;
use crate::term::Term;

pub use block::{
    KeyframeBlock, MediaExpression, MediaQualifier, MediaQuery, RuleKeyframes, RuleMedia,
    RuleSet, RuleViewport,
};
pub use font_face::{FontSource, FontStyle, FontWeight, RuleFontFace};
pub use page::{MarginArea, PageItem, RuleMargin, RulePage};
pub use sheet::StyleSheet;

/// [CSS Cascade § 6.2 Cascade Origins](https://www.w3.org/TR/css-cascade-4/#cascading-origins)
///
/// "Each style rule has a cascade origin, which determines where it enters
/// the cascade."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "kebab-case")]
pub enum Origin {
    /// "The author specifies style sheets for a source document according
    /// to the conventions of the document language."
    #[default]
    Author,
    /// "Conforming user agents must apply a default style sheet"
    #[strum(serialize = "user-agent")]
    Agent,
    /// "The user may be able to specify style information for a particular
    /// document."
    User,
}

/// A copyable handle identifying the style sheet a rule belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StyleSheetRef {
    /// Identity of the sheet, unique within the process.
    pub id: u64,
    /// The sheet's cascade origin.
    pub origin: Origin,
}

/// Back-link from a rule to its style sheet. Ignored by equality and
/// hashing: two rules with the same content are equal wherever they live.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct SheetLink(pub(crate) Option<StyleSheetRef>);

impl PartialEq for SheetLink {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for SheetLink {}

impl Hash for SheetLink {
    fn hash<H: Hasher>(&self, _state: &mut H) {}
}

/// An ordered list with a lazily computed content hash.
///
/// The hash is cached after the first [`RuleList::content_hash`] call and
/// cleared by every method that hands out mutable access.
#[derive(Debug, Clone)]
pub struct RuleList<T> {
    items: Vec<T>,
    hash: Cell<Option<u64>>,
}

impl<T> Default for RuleList<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            hash: Cell::new(None),
        }
    }
}

impl<T: Hash> RuleList<T> {
    /// An empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A list holding `items`.
    #[must_use]
    pub const fn from_items(items: Vec<T>) -> Self {
        Self {
            items,
            hash: Cell::new(None),
        }
    }

    fn invalidate(&self) {
        self.hash.set(None);
    }

    fn check_index(&self, index: usize, allow_end: bool) -> Result<(), CssError> {
        let limit = if allow_end {
            self.items.len() + 1
        } else {
            self.items.len()
        };
        if index < limit {
            Ok(())
        } else {
            Err(CssError::invalid(format!(
                "index {index} out of range for {} items",
                self.items.len()
            )))
        }
    }

    /// Append an item.
    pub fn push(&mut self, item: T) {
        self.invalidate();
        self.items.push(item);
    }

    /// Insert an item at `index`, shifting later items.
    ///
    /// # Errors
    ///
    /// Returns [`CssError::InvalidArgument`] if `index > len`.
    pub fn insert(&mut self, index: usize, item: T) -> Result<(), CssError> {
        self.check_index(index, true)?;
        self.invalidate();
        self.items.insert(index, item);
        Ok(())
    }

    /// Replace the item at `index`, returning the old one.
    ///
    /// # Errors
    ///
    /// Returns [`CssError::InvalidArgument`] if `index >= len`.
    pub fn set(&mut self, index: usize, item: T) -> Result<T, CssError> {
        self.check_index(index, false)?;
        self.invalidate();
        Ok(std::mem::replace(&mut self.items[index], item))
    }

    /// Remove the item at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`CssError::InvalidArgument`] if `index >= len`.
    pub fn remove(&mut self, index: usize) -> Result<T, CssError> {
        self.check_index(index, false)?;
        self.invalidate();
        Ok(self.items.remove(index))
    }

    /// Clear the list and append `items`.
    pub fn replace_all(&mut self, items: Vec<T>) {
        self.invalidate();
        self.items = items;
    }

    /// Clear the list so it can be filled again.
    pub fn unlock(&mut self) {
        self.invalidate();
        self.items.clear();
    }

    /// Mutable iteration. Clears the cached hash.
    pub fn iter_mut(&mut self) -> slice::IterMut<'_, T> {
        self.invalidate();
        self.items.iter_mut()
    }

    /// Iterate over the items.
    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.items.iter()
    }

    /// The items as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The item at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    /// Hash of the contents, computed on first use after a mutation.
    #[must_use]
    pub fn content_hash(&self) -> u64 {
        if let Some(hash) = self.hash.get() {
            return hash;
        }
        let mut hasher = DefaultHasher::new();
        self.items.hash(&mut hasher);
        let hash = hasher.finish();
        self.hash.set(Some(hash));
        hash
    }
}

impl<T: PartialEq> PartialEq for RuleList<T> {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl<T: Eq> Eq for RuleList<T> {}

impl<T: Hash> Hash for RuleList<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.content_hash());
    }
}

impl<'a, T: Hash> IntoIterator for &'a RuleList<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// The shared mutation contract of every rule.
///
/// Implementors expose their [`RuleList`]; items entering the container
/// pass through [`RuleContainer::adopt`] first, which is where back-links
/// are set.
pub trait RuleContainer {
    /// What the container holds.
    type Item: Hash;

    /// The underlying list.
    fn list(&self) -> &RuleList<Self::Item>;

    /// The underlying list, mutably.
    fn list_mut(&mut self) -> &mut RuleList<Self::Item>;

    /// Prepare an item that is about to enter the container.
    fn adopt(&self, _item: &mut Self::Item) {}

    /// Detach an item that has left the container.
    fn release(&self, _item: &mut Self::Item) {}

    /// Append an item.
    fn push(&mut self, mut item: Self::Item) {
        self.adopt(&mut item);
        self.list_mut().push(item);
    }

    /// Insert an item at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`CssError::InvalidArgument`] if `index > len`.
    fn insert(&mut self, index: usize, mut item: Self::Item) -> Result<(), CssError> {
        self.adopt(&mut item);
        self.list_mut().insert(index, item)
    }

    /// Replace the item at `index`, returning the old one.
    ///
    /// # Errors
    ///
    /// Returns [`CssError::InvalidArgument`] if `index >= len`.
    fn set(&mut self, index: usize, mut item: Self::Item) -> Result<Self::Item, CssError> {
        self.adopt(&mut item);
        let mut old = self.list_mut().set(index, item)?;
        self.release(&mut old);
        Ok(old)
    }

    /// Remove the item at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`CssError::InvalidArgument`] if `index >= len`.
    fn remove(&mut self, index: usize) -> Result<Self::Item, CssError> {
        let mut removed = self.list_mut().remove(index)?;
        self.release(&mut removed);
        Ok(removed)
    }

    /// Clear the container and append `items`.
    fn replace_all(&mut self, mut items: Vec<Self::Item>) {
        for item in &mut items {
            self.adopt(item);
        }
        self.list_mut().replace_all(items);
    }

    /// Empty the container so it can be filled again.
    fn unlock(&mut self) {
        self.list_mut().unlock();
    }

    /// The items, in order.
    fn as_list(&self) -> &[Self::Item] {
        self.list().as_slice()
    }

    /// Number of items.
    fn len(&self) -> usize {
        self.list().len()
    }

    /// Whether the container is empty.
    fn is_empty(&self) -> bool {
        self.list().is_empty()
    }

    /// The item at `index`.
    fn get(&self, index: usize) -> Option<&Self::Item> {
        self.list().get(index)
    }

    /// Hash of the contents. See [`RuleList::content_hash`].
    fn content_hash(&self) -> u64 {
        self.list().content_hash()
    }
}

/// Indentation for nested output: one tab per level.
pub(crate) fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push('\t');
    }
}

/// Write every declaration of `list` one level deeper than `depth`.
pub(crate) fn write_declarations(out: &mut String, list: &RuleList<Declaration>, depth: usize) {
    for declaration in list {
        out.push_str(&declaration.to_css(depth + 1));
    }
}

/// [CSSOM § 6.7.1 CSS Declarations](https://drafts.csswg.org/cssom/#css-declarations)
///
/// "A CSS declaration is an abstract concept that is not exposed as an
/// object in the DOM." It holds a property name, the value terms and the
/// important flag.
#[derive(Debug, Clone, PartialEq, Hash)]
pub struct Declaration {
    property: String,
    important: bool,
    terms: RuleList<Term>,
}

impl Declaration {
    /// A declaration of `property` with no value yet. Property names are
    /// ASCII lowercased.
    ///
    /// # Errors
    ///
    /// Returns [`CssError::InvalidArgument`] if `property` is empty.
    pub fn new(property: &str) -> Result<Self, CssError> {
        if property.is_empty() {
            return Err(CssError::invalid("property name must not be empty"));
        }
        Ok(Self {
            property: property.to_ascii_lowercase(),
            important: false,
            terms: RuleList::new(),
        })
    }

    /// A declaration of `property` with `terms` as its value.
    ///
    /// # Errors
    ///
    /// Returns [`CssError::InvalidArgument`] if `property` is empty.
    pub fn with_terms(property: &str, terms: Vec<Term>) -> Result<Self, CssError> {
        let mut declaration = Self::new(property)?;
        declaration.terms.replace_all(terms);
        Ok(declaration)
    }

    /// Builder-style important flag setter.
    #[must_use]
    pub const fn important(mut self, important: bool) -> Self {
        self.important = important;
        self
    }

    /// The property name.
    #[must_use]
    pub fn property(&self) -> &str {
        &self.property
    }

    /// Rename the property.
    ///
    /// # Errors
    ///
    /// Returns [`CssError::InvalidArgument`] if `property` is empty.
    pub fn set_property(&mut self, property: &str) -> Result<(), CssError> {
        if property.is_empty() {
            return Err(CssError::invalid("property name must not be empty"));
        }
        property.to_ascii_lowercase().clone_into(&mut self.property);
        Ok(())
    }

    /// [§ 6.4.2 Important Declarations](https://www.w3.org/TR/css-cascade-4/#importance)
    #[must_use]
    pub const fn is_important(&self) -> bool {
        self.important
    }

    /// Set the important flag.
    pub const fn set_important(&mut self, important: bool) {
        self.important = important;
    }

    /// Serialize as one line, indented by `depth` tabs.
    #[must_use]
    pub fn to_css(&self, depth: usize) -> String {
        let mut out = String::new();
        indent(&mut out, depth);
        out.push_str(&self.property);
        out.push_str(": ");
        for (index, term) in self.terms.iter().enumerate() {
            // The first term never gets a separator in front.
            let term = if index == 0 {
                term.clone().with_operator(None)
            } else {
                term.clone()
            };
            let _ = write!(out, "{term}");
        }
        if self.important {
            out.push_str(" !important");
        }
        out.push_str(";\n");
        out
    }
}

impl RuleContainer for Declaration {
    type Item = Term;

    fn list(&self) -> &RuleList<Term> {
        &self.terms
    }

    fn list_mut(&mut self) -> &mut RuleList<Term> {
        &mut self.terms
    }
}

impl fmt::Display for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css(0))
    }
}

/// Anything that can appear directly in a style sheet.
#[derive(Debug, Clone, PartialEq, Hash)]
pub enum RuleBlock {
    /// A style rule.
    Set(RuleSet),
    /// `@media`
    Media(RuleMedia),
    /// `@keyframes`
    Keyframes(RuleKeyframes),
    /// `@font-face`
    FontFace(RuleFontFace),
    /// `@page`
    Page(RulePage),
    /// `@viewport`
    Viewport(RuleViewport),
}

impl RuleBlock {
    /// The style sheet this block belongs to.
    #[must_use]
    pub const fn style_sheet(&self) -> Option<StyleSheetRef> {
        match self {
            Self::Set(rule) => rule.style_sheet(),
            Self::Media(rule) => rule.style_sheet(),
            Self::Keyframes(rule) => rule.style_sheet(),
            Self::FontFace(rule) => rule.style_sheet(),
            Self::Page(rule) => rule.style_sheet(),
            Self::Viewport(rule) => rule.style_sheet(),
        }
    }

    /// Link the block (and, for `@media`, its rule sets) to a style sheet.
    pub fn set_style_sheet(&mut self, sheet: Option<StyleSheetRef>) {
        match self {
            Self::Set(rule) => rule.set_style_sheet(sheet),
            Self::Media(rule) => rule.set_style_sheet(sheet),
            Self::Keyframes(rule) => rule.set_style_sheet(sheet),
            Self::FontFace(rule) => rule.set_style_sheet(sheet),
            Self::Page(rule) => rule.set_style_sheet(sheet),
            Self::Viewport(rule) => rule.set_style_sheet(sheet),
        }
    }

    /// Serialize, indented by `depth` tabs.
    #[must_use]
    pub fn to_css(&self, depth: usize) -> String {
        match self {
            Self::Set(rule) => rule.to_css(depth),
            Self::Media(rule) => rule.to_css(depth),
            Self::Keyframes(rule) => rule.to_css(depth),
            Self::FontFace(rule) => rule.to_css(depth),
            Self::Page(rule) => rule.to_css(depth),
            Self::Viewport(rule) => rule.to_css(depth),
        }
    }
}

impl fmt::Display for RuleBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css(0))
    }
}

macro_rules! impl_from_rule {
    ($($rule:ident => $variant:ident),* $(,)?) => {
        $(
            impl From<$rule> for RuleBlock {
                fn from(rule: $rule) -> Self {
                    Self::$variant(rule)
                }
            }
        )*
    };
}

impl_from_rule!(
    RuleSet => Set,
    RuleMedia => Media,
    RuleKeyframes => Keyframes,
    RuleFontFace => FontFace,
    RulePage => Page,
    RuleViewport => Viewport,
);
