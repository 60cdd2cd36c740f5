//! Style rules, `@media`, `@keyframes` and `@viewport`.

use std::fmt::{self, Write};

use serde::Serialize;

use super::{
    Declaration, RuleContainer, RuleList, SheetLink, StyleSheetRef, indent, write_declarations,
};
use crate::error::CssError;
use crate::selector::CombinedSelector;
use crate::term::{NumericKind, Term};

/// [CSSOM § 6.4.3 CSSStyleRule](https://drafts.csswg.org/cssom/#the-cssstylerule-interface)
///
/// A selector list and the declarations that apply to elements it matches.
#[derive(Debug, Clone, Default, PartialEq, Hash)]
pub struct RuleSet {
    selectors: Vec<CombinedSelector>,
    declarations: RuleList<Declaration>,
    sheet: SheetLink,
}

impl RuleSet {
    /// A rule set for `selectors` with no declarations.
    #[must_use]
    pub fn new(selectors: Vec<CombinedSelector>) -> Self {
        Self {
            selectors,
            ..Self::default()
        }
    }

    /// The selector list.
    #[must_use]
    pub fn selectors(&self) -> &[CombinedSelector] {
        &self.selectors
    }

    /// Replace the selector list.
    pub fn set_selectors(&mut self, selectors: Vec<CombinedSelector>) {
        self.selectors = selectors;
    }

    /// The style sheet this rule set belongs to.
    #[must_use]
    pub const fn style_sheet(&self) -> Option<StyleSheetRef> {
        self.sheet.0
    }

    /// Link the rule set to a style sheet.
    pub const fn set_style_sheet(&mut self, sheet: Option<StyleSheetRef>) {
        self.sheet = SheetLink(sheet);
    }

    /// Serialize, indented by `depth` tabs.
    #[must_use]
    pub fn to_css(&self, depth: usize) -> String {
        let mut out = String::new();
        indent(&mut out, depth);
        let selectors: Vec<String> = self.selectors.iter().map(ToString::to_string).collect();
        out.push_str(&selectors.join(", "));
        out.push_str(" {\n");
        write_declarations(&mut out, &self.declarations, depth);
        indent(&mut out, depth);
        out.push_str("}\n");
        out
    }
}

impl RuleContainer for RuleSet {
    type Item = Declaration;

    fn list(&self) -> &RuleList<Declaration> {
        &self.declarations
    }

    fn list_mut(&mut self) -> &mut RuleList<Declaration> {
        &mut self.declarations
    }
}

impl fmt::Display for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css(0))
    }
}

/// `not` or `only` in front of a media query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MediaQualifier {
    /// "The `not` keyword ... negates the result of the media query"
    Not,
    /// "The `only` keyword has no effect on the media query's result"
    Only,
}

/// [Media Queries § 3 Syntax](https://www.w3.org/TR/mediaqueries-4/#mq-syntax)
///
/// A media type with optional qualifier, followed by feature expressions
/// joined with `and`.
#[derive(Debug, Clone, Default, PartialEq, Hash, Serialize)]
pub struct MediaQuery {
    /// `not` / `only`
    pub qualifier: Option<MediaQualifier>,
    /// `screen`, `print`, ... Absent for a bare `(feature)` query.
    pub media_type: Option<String>,
    /// The `(feature: value)` conditions.
    pub expressions: Vec<MediaExpression>,
}

impl MediaQuery {
    /// A query on `media_type` with no expressions. Type names are ASCII
    /// lowercased.
    #[must_use]
    pub fn new(media_type: Option<&str>) -> Self {
        Self {
            qualifier: None,
            media_type: media_type.map(str::to_ascii_lowercase),
            expressions: Vec::new(),
        }
    }

    /// Builder-style qualifier setter.
    #[must_use]
    pub const fn with_qualifier(mut self, qualifier: MediaQualifier) -> Self {
        self.qualifier = Some(qualifier);
        self
    }

    /// Builder-style expression append.
    #[must_use]
    pub fn with_expression(mut self, expression: MediaExpression) -> Self {
        self.expressions.push(expression);
        self
    }

    /// Whether the query is negated with `not`.
    #[must_use]
    pub fn is_negated(&self) -> bool {
        self.qualifier == Some(MediaQualifier::Not)
    }
}

impl fmt::Display for MediaQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut words: Vec<String> = Vec::new();
        match self.qualifier {
            Some(MediaQualifier::Not) => words.push("not".to_owned()),
            Some(MediaQualifier::Only) => words.push("only".to_owned()),
            None => {}
        }
        if let Some(media_type) = &self.media_type {
            words.push(media_type.clone());
        }
        let head = words.join(" ");
        let expressions: Vec<String> = self.expressions.iter().map(ToString::to_string).collect();
        match (head.is_empty(), expressions.is_empty()) {
            (_, true) => f.write_str(&head),
            (true, false) => f.write_str(&expressions.join(" and ")),
            (false, false) => write!(f, "{head} and {}", expressions.join(" and ")),
        }
    }
}

/// [Media Queries § 2.4 Media Features](https://www.w3.org/TR/mediaqueries-4/#mq-features)
///
/// "A media feature is a more fine-grained test than media types, testing
/// a single, specific feature of the user agent or display device."
#[derive(Debug, Clone, PartialEq, Hash, Serialize)]
pub struct MediaExpression {
    feature: String,
    terms: Vec<Term>,
}

impl MediaExpression {
    /// `(feature: terms)`, or the boolean form `(feature)` when `terms` is
    /// empty. Feature names are ASCII lowercased.
    ///
    /// # Errors
    ///
    /// Returns [`CssError::InvalidArgument`] if `feature` is empty.
    pub fn new(feature: &str, terms: Vec<Term>) -> Result<Self, CssError> {
        if feature.is_empty() {
            return Err(CssError::invalid("media feature name must not be empty"));
        }
        Ok(Self {
            feature: feature.to_ascii_lowercase(),
            terms,
        })
    }

    /// The feature name, e.g. `min-width`.
    #[must_use]
    pub fn feature(&self) -> &str {
        &self.feature
    }

    /// The feature value.
    #[must_use]
    pub fn terms(&self) -> &[Term] {
        &self.terms
    }
}

impl fmt::Display for MediaExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}", self.feature)?;
        if !self.terms.is_empty() {
            f.write_str(": ")?;
            for (index, term) in self.terms.iter().enumerate() {
                if index == 0 {
                    write!(f, "{}", term.clone().with_operator(None))?;
                } else {
                    write!(f, "{term}")?;
                }
            }
        }
        f.write_str(")")
    }
}

/// [CSS Conditional § 6 Media-specific Rules](https://www.w3.org/TR/css-conditional-3/#at-media)
///
/// Rule sets that apply only when one of the media queries holds. Rule sets
/// added here are linked to the same style sheet as the `@media` rule.
#[derive(Debug, Clone, Default, PartialEq, Hash)]
pub struct RuleMedia {
    queries: Vec<MediaQuery>,
    rules: RuleList<RuleSet>,
    sheet: SheetLink,
}

impl RuleMedia {
    /// An empty `@media` rule for `queries`.
    #[must_use]
    pub fn new(queries: Vec<MediaQuery>) -> Self {
        Self {
            queries,
            ..Self::default()
        }
    }

    /// The media query list.
    #[must_use]
    pub fn queries(&self) -> &[MediaQuery] {
        &self.queries
    }

    /// Replace the media query list.
    pub fn set_queries(&mut self, queries: Vec<MediaQuery>) {
        self.queries = queries;
    }

    /// The style sheet this rule belongs to.
    #[must_use]
    pub const fn style_sheet(&self) -> Option<StyleSheetRef> {
        self.sheet.0
    }

    /// Link the rule and every rule set inside it to a style sheet.
    pub fn set_style_sheet(&mut self, sheet: Option<StyleSheetRef>) {
        self.sheet = SheetLink(sheet);
        for rule in self.rules.iter_mut() {
            rule.set_style_sheet(sheet);
        }
    }

    /// Serialize, indented by `depth` tabs.
    #[must_use]
    pub fn to_css(&self, depth: usize) -> String {
        let mut out = String::new();
        indent(&mut out, depth);
        out.push_str("@media ");
        let queries: Vec<String> = self.queries.iter().map(ToString::to_string).collect();
        out.push_str(&queries.join(", "));
        out.push_str(" {\n");
        for rule in &self.rules {
            out.push_str(&rule.to_css(depth + 1));
        }
        indent(&mut out, depth);
        out.push_str("}\n");
        out
    }
}

impl RuleContainer for RuleMedia {
    type Item = RuleSet;

    fn list(&self) -> &RuleList<RuleSet> {
        &self.rules
    }

    fn list_mut(&mut self) -> &mut RuleList<RuleSet> {
        &mut self.rules
    }

    fn adopt(&self, item: &mut RuleSet) {
        item.set_style_sheet(self.sheet.0);
    }

    fn release(&self, item: &mut RuleSet) {
        item.set_style_sheet(None);
    }
}

impl fmt::Display for RuleMedia {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css(0))
    }
}

/// [CSS Animations § 3 Keyframes](https://www.w3.org/TR/css-animations-1/#keyframes)
///
/// "Keyframes are used to specify the values for the animating properties
/// at various points during the animation."
#[derive(Debug, Clone, Default, PartialEq, Hash)]
pub struct RuleKeyframes {
    name: String,
    blocks: RuleList<KeyframeBlock>,
    sheet: SheetLink,
}

impl RuleKeyframes {
    /// An empty `@keyframes name` rule.
    ///
    /// # Errors
    ///
    /// Returns [`CssError::InvalidArgument`] if `name` is empty.
    pub fn new(name: &str) -> Result<Self, CssError> {
        if name.is_empty() {
            return Err(CssError::invalid("keyframes name must not be empty"));
        }
        Ok(Self {
            name: name.to_owned(),
            ..Self::default()
        })
    }

    /// The animation name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
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
        let _ = writeln!(out, "@keyframes {} {{", self.name);
        for block in &self.blocks {
            out.push_str(&block.to_css(depth + 1));
        }
        indent(&mut out, depth);
        out.push_str("}\n");
        out
    }
}

impl RuleContainer for RuleKeyframes {
    type Item = KeyframeBlock;

    fn list(&self) -> &RuleList<KeyframeBlock> {
        &self.blocks
    }

    fn list_mut(&mut self) -> &mut RuleList<KeyframeBlock> {
        &mut self.blocks
    }
}

impl fmt::Display for RuleKeyframes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css(0))
    }
}

/// One keyframe: the offsets it applies at and its declarations.
///
/// The offsets are kept apart from the declaration list, so replacing the
/// declarations never touches them.
#[derive(Debug, Clone, PartialEq, Hash)]
pub struct KeyframeBlock {
    percentages: Vec<Term>,
    declarations: RuleList<Declaration>,
}

impl KeyframeBlock {
    /// A keyframe at `percentages`.
    ///
    /// # Errors
    ///
    /// Returns [`CssError::InvalidArgument`] if the list is empty or holds
    /// anything but percentages.
    pub fn new(percentages: Vec<Term>) -> Result<Self, CssError> {
        Self::check_percentages(&percentages)?;
        Ok(Self {
            percentages,
            declarations: RuleList::new(),
        })
    }

    fn check_percentages(percentages: &[Term]) -> Result<(), CssError> {
        if percentages.is_empty() {
            return Err(CssError::invalid("keyframe needs at least one offset"));
        }
        let all_percent = percentages.iter().all(|term| {
            term.as_numeric()
                .is_some_and(|numeric| numeric.kind() == NumericKind::Percent)
        });
        if all_percent {
            Ok(())
        } else {
            Err(CssError::invalid("keyframe offsets must be percentages"))
        }
    }

    /// The keyframe offsets.
    #[must_use]
    pub fn percentages(&self) -> &[Term] {
        &self.percentages
    }

    /// Replace the keyframe offsets.
    ///
    /// # Errors
    ///
    /// Same conditions as [`KeyframeBlock::new`].
    pub fn set_percentages(&mut self, percentages: Vec<Term>) -> Result<(), CssError> {
        Self::check_percentages(&percentages)?;
        self.percentages = percentages;
        Ok(())
    }

    /// Serialize, indented by `depth` tabs.
    #[must_use]
    pub fn to_css(&self, depth: usize) -> String {
        let mut out = String::new();
        indent(&mut out, depth);
        let offsets: Vec<String> = self
            .percentages
            .iter()
            .map(|term| term.clone().with_operator(None).to_string())
            .collect();
        out.push_str(&offsets.join(", "));
        out.push_str(" {\n");
        write_declarations(&mut out, &self.declarations, depth);
        indent(&mut out, depth);
        out.push_str("}\n");
        out
    }
}

impl RuleContainer for KeyframeBlock {
    type Item = Declaration;

    fn list(&self) -> &RuleList<Declaration> {
        &self.declarations
    }

    fn list_mut(&mut self) -> &mut RuleList<Declaration> {
        &mut self.declarations
    }
}

impl fmt::Display for KeyframeBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css(0))
    }
}

/// [CSS Device Adaptation § 9 The @viewport rule](https://www.w3.org/TR/css-device-adapt-1/#atviewport-rule)
#[derive(Debug, Clone, Default, PartialEq, Hash)]
pub struct RuleViewport {
    declarations: RuleList<Declaration>,
    sheet: SheetLink,
}

impl RuleViewport {
    /// An empty `@viewport` rule.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
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
        out.push_str("@viewport {\n");
        write_declarations(&mut out, &self.declarations, depth);
        indent(&mut out, depth);
        out.push_str("}\n");
        out
    }
}

impl RuleContainer for RuleViewport {
    type Item = Declaration;

    fn list(&self) -> &RuleList<Declaration> {
        &self.declarations
    }

    fn list_mut(&mut self) -> &mut RuleList<Declaration> {
        &mut self.declarations
    }
}

impl fmt::Display for RuleViewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css(0))
    }
}
