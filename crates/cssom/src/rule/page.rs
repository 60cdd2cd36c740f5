//! `@page` and its margin boxes.
//!
//! [CSS Paged Media § 3 Page Selectors](https://www.w3.org/TR/css-page-3/#page-selectors)

use std::fmt::{self, Write};
use std::str::FromStr;

use serde::Serialize;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

use super::{
    Declaration, RuleContainer, RuleList, SheetLink, StyleSheetRef, indent, write_declarations,
};
use crate::error::CssError;

/// [§ 4.2 Page-Margin Boxes](https://www.w3.org/TR/css-page-3/#margin-boxes)
///
/// "There are sixteen page-margin boxes"
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumString, AsRefStr, EnumIter,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum MarginArea {
    /// `@top-left-corner`
    TopLeftCorner,
    /// `@top-left`
    TopLeft,
    /// `@top-center`
    TopCenter,
    /// `@top-right`
    TopRight,
    /// `@top-right-corner`
    TopRightCorner,
    /// `@bottom-left-corner`
    BottomLeftCorner,
    /// `@bottom-left`
    BottomLeft,
    /// `@bottom-center`
    BottomCenter,
    /// `@bottom-right`
    BottomRight,
    /// `@bottom-right-corner`
    BottomRightCorner,
    /// `@left-top`
    LeftTop,
    /// `@left-middle`
    LeftMiddle,
    /// `@left-bottom`
    LeftBottom,
    /// `@right-top`
    RightTop,
    /// `@right-middle`
    RightMiddle,
    /// `@right-bottom`
    RightBottom,
}

/// A page-margin box rule such as `@top-center { content: "1" }`.
#[derive(Debug, Clone, PartialEq, Hash)]
pub struct RuleMargin {
    area: MarginArea,
    declarations: RuleList<Declaration>,
}

impl RuleMargin {
    /// An empty margin rule for the named area (without the `@`).
    ///
    /// # Errors
    ///
    /// Returns [`CssError::InvalidArgument`] if `area` names none of the
    /// sixteen margin boxes.
    pub fn new(area: &str) -> Result<Self, CssError> {
        let area = MarginArea::from_str(area)
            .map_err(|_| CssError::invalid(format!("unknown page margin area '{area}'")))?;
        Ok(Self::for_area(area))
    }

    /// An empty margin rule for `area`.
    #[must_use]
    pub fn for_area(area: MarginArea) -> Self {
        Self {
            area,
            declarations: RuleList::new(),
        }
    }

    /// The margin box this rule styles.
    #[must_use]
    pub const fn area(&self) -> MarginArea {
        self.area
    }

    /// Serialize, indented by `depth` tabs.
    #[must_use]
    pub fn to_css(&self, depth: usize) -> String {
        let mut out = String::new();
        indent(&mut out, depth);
        let _ = writeln!(out, "@{} {{", self.area);
        write_declarations(&mut out, &self.declarations, depth);
        indent(&mut out, depth);
        out.push_str("}\n");
        out
    }
}

impl RuleContainer for RuleMargin {
    type Item = Declaration;

    fn list(&self) -> &RuleList<Declaration> {
        &self.declarations
    }

    fn list_mut(&mut self) -> &mut RuleList<Declaration> {
        &mut self.declarations
    }
}

impl fmt::Display for RuleMargin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css(0))
    }
}

/// Content of a `@page` rule: page declarations interleaved with margin
/// box rules.
#[derive(Debug, Clone, PartialEq, Hash)]
pub enum PageItem {
    /// A declaration applying to the page box.
    Declaration(Declaration),
    /// A nested margin box rule.
    Margin(RuleMargin),
}

impl PageItem {
    fn to_css(&self, depth: usize) -> String {
        match self {
            Self::Declaration(declaration) => declaration.to_css(depth),
            Self::Margin(margin) => margin.to_css(depth),
        }
    }
}

impl From<Declaration> for PageItem {
    fn from(declaration: Declaration) -> Self {
        Self::Declaration(declaration)
    }
}

impl From<RuleMargin> for PageItem {
    fn from(margin: RuleMargin) -> Self {
        Self::Margin(margin)
    }
}

/// [§ 3 Page Selectors](https://www.w3.org/TR/css-page-3/#page-selectors)
///
/// "The @page rule is used to specify properties of the page box". It may
/// be restricted to a named page and a page pseudo-class (`:first`,
/// `:left`, `:right`, `:blank`).
#[derive(Debug, Clone, Default, PartialEq, Hash)]
pub struct RulePage {
    name: Option<String>,
    pseudo: Option<String>,
    items: RuleList<PageItem>,
    sheet: SheetLink,
}

impl RulePage {
    /// An empty `@page` rule. Empty strings count as absent.
    #[must_use]
    pub fn new(name: Option<&str>, pseudo: Option<&str>) -> Self {
        Self {
            name: name.filter(|name| !name.is_empty()).map(str::to_owned),
            pseudo: pseudo
                .filter(|pseudo| !pseudo.is_empty())
                .map(str::to_ascii_lowercase),
            ..Self::default()
        }
    }

    /// The page name.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The page pseudo-class, without the colon.
    #[must_use]
    pub fn pseudo(&self) -> Option<&str> {
        self.pseudo.as_deref()
    }

    /// Declarations on the page box itself, in order.
    pub fn declarations(&self) -> impl Iterator<Item = &Declaration> {
        self.items.iter().filter_map(|item| match item {
            PageItem::Declaration(declaration) => Some(declaration),
            PageItem::Margin(_) => None,
        })
    }

    /// Margin box rules, in order.
    pub fn margins(&self) -> impl Iterator<Item = &RuleMargin> {
        self.items.iter().filter_map(|item| match item {
            PageItem::Margin(margin) => Some(margin),
            PageItem::Declaration(_) => None,
        })
    }

    /// The style sheet this rule belongs to.
    #[must_use]
    pub const fn style_sheet(&self) -> Option<StyleSheetRef> {
        self.sheet.0
    }

    /// Link the rule to a style sheet.
    pub const fn set_style_sheet(&mut self, sheet: Option<StyleSheetRef>) {
        self.sheet = SheetLink(sheet);
    }

    /// Serialize, indented by `depth` tabs.
    #[must_use]
    pub fn to_css(&self, depth: usize) -> String {
        let mut out = String::new();
        indent(&mut out, depth);
        out.push_str("@page");
        if let Some(name) = &self.name {
            out.push(' ');
            out.push_str(name);
        }
        if let Some(pseudo) = &self.pseudo {
            if self.name.is_none() {
                out.push(' ');
            }
            out.push(':');
            out.push_str(pseudo);
        }
        out.push_str(" {\n");
        for item in &self.items {
            out.push_str(&item.to_css(depth + 1));
        }
        indent(&mut out, depth);
        out.push_str("}\n");
        out
    }
}

impl RuleContainer for RulePage {
    type Item = PageItem;

    fn list(&self) -> &RuleList<PageItem> {
        &self.items
    }

    fn list_mut(&mut self) -> &mut RuleList<PageItem> {
        &mut self.items
    }
}

impl fmt::Display for RulePage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css(0))
    }
}
