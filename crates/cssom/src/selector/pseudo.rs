//! Pseudo-classes and pseudo-elements.
//!
//! [Selectors Level 4 § 3.5 Pseudo-classes](https://www.w3.org/TR/selectors-4/#pseudo-classes)
//! and [§ 3.6 Pseudo-elements](https://www.w3.org/TR/selectors-4/#pseudo-elements)

use std::fmt;

use cssom_common::{EscapeLevel, escape_identifier, warn_once};
use cssom_dom::{DomTree, ElementData, NodeId, NodeType};
use serde::Serialize;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

use super::nth::{decode_index, position_matches};
use super::{ElementMatcher, MatchCondition, Selector, SelectorPart};
use crate::error::CssError;

/// Pseudo-classes with a known name.
///
/// Structural ones are answered from the tree; the rest are delegated to the
/// [`MatchCondition`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumString, AsRefStr, EnumIter,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
#[serde(rename_all = "kebab-case")]
pub enum PseudoClassType {
    /// [§ 14.3.1 :first-child](https://www.w3.org/TR/selectors-4/#the-first-child-pseudo)
    FirstChild,
    /// [§ 14.3.2 :last-child](https://www.w3.org/TR/selectors-4/#the-last-child-pseudo)
    LastChild,
    /// [§ 14.3.3 :only-child](https://www.w3.org/TR/selectors-4/#the-only-child-pseudo)
    OnlyChild,
    /// [§ 14.4.3 :first-of-type](https://www.w3.org/TR/selectors-4/#the-first-of-type-pseudo)
    FirstOfType,
    /// [§ 14.4.4 :last-of-type](https://www.w3.org/TR/selectors-4/#the-last-of-type-pseudo)
    LastOfType,
    /// [§ 14.4.5 :only-of-type](https://www.w3.org/TR/selectors-4/#the-only-of-type-pseudo)
    OnlyOfType,
    /// [§ 14.3.4 :nth-child()](https://www.w3.org/TR/selectors-4/#the-nth-child-pseudo)
    NthChild,
    /// [§ 14.3.5 :nth-last-child()](https://www.w3.org/TR/selectors-4/#the-nth-last-child-pseudo)
    NthLastChild,
    /// [§ 14.4.1 :nth-of-type()](https://www.w3.org/TR/selectors-4/#the-nth-of-type-pseudo)
    NthOfType,
    /// [§ 14.4.2 :nth-last-of-type()](https://www.w3.org/TR/selectors-4/#the-nth-last-of-type-pseudo)
    NthLastOfType,
    /// [§ 14.1 :root](https://www.w3.org/TR/selectors-4/#the-root-pseudo)
    Root,
    /// [§ 14.2 :empty](https://www.w3.org/TR/selectors-4/#the-empty-pseudo)
    Empty,
    /// [§ 4.3 :not()](https://www.w3.org/TR/selectors-4/#negation)
    Not,
    /// [§ 9.2 :link](https://www.w3.org/TR/selectors-4/#link)
    Link,
    /// [§ 9.2 :visited](https://www.w3.org/TR/selectors-4/#link)
    Visited,
    /// [§ 9.1 :any-link](https://www.w3.org/TR/selectors-4/#the-any-link-pseudo)
    AnyLink,
    /// [§ 9.5 :target](https://www.w3.org/TR/selectors-4/#the-target-pseudo)
    Target,
    /// [§ 10.1 :hover](https://www.w3.org/TR/selectors-4/#the-hover-pseudo)
    Hover,
    /// [§ 10.2 :active](https://www.w3.org/TR/selectors-4/#the-active-pseudo)
    Active,
    /// [§ 10.3 :focus](https://www.w3.org/TR/selectors-4/#the-focus-pseudo)
    Focus,
    /// [§ 10.5 :focus-within](https://www.w3.org/TR/selectors-4/#the-focus-within-pseudo)
    FocusWithin,
    /// [§ 13.1.1 :enabled](https://www.w3.org/TR/selectors-4/#enableddisabled)
    Enabled,
    /// [§ 13.1.1 :disabled](https://www.w3.org/TR/selectors-4/#enableddisabled)
    Disabled,
    /// [§ 13.3.1 :checked](https://www.w3.org/TR/selectors-4/#checked)
    Checked,
    /// [§ 7.2 :lang()](https://www.w3.org/TR/selectors-4/#the-lang-pseudo)
    Lang,
}

impl PseudoClassType {
    /// Whether the pseudo-class takes an `an+b` argument.
    #[must_use]
    pub const fn is_nth(self) -> bool {
        matches!(
            self,
            Self::NthChild | Self::NthLastChild | Self::NthOfType | Self::NthLastOfType
        )
    }
}

/// Pseudo-elements with a known name.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumString, AsRefStr, EnumIter,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
#[serde(rename_all = "kebab-case")]
pub enum PseudoElementType {
    /// [CSS Pseudo § 3.1 ::before](https://www.w3.org/TR/css-pseudo-4/#generated-content)
    Before,
    /// [CSS Pseudo § 3.1 ::after](https://www.w3.org/TR/css-pseudo-4/#generated-content)
    After,
    /// [CSS Pseudo § 2.1 ::first-line](https://www.w3.org/TR/css-pseudo-4/#first-line-pseudo)
    FirstLine,
    /// [CSS Pseudo § 2.2 ::first-letter](https://www.w3.org/TR/css-pseudo-4/#first-letter-pseudo)
    FirstLetter,
    /// [CSS Pseudo § 3.2 ::marker](https://www.w3.org/TR/css-pseudo-4/#marker-pseudo)
    Marker,
    /// [CSS Pseudo § 3.3 ::placeholder](https://www.w3.org/TR/css-pseudo-4/#placeholder-pseudo)
    Placeholder,
    /// [CSS Pseudo § 4.1 ::selection](https://www.w3.org/TR/css-pseudo-4/#selectordef-selection)
    Selection,
    /// [Fullscreen § 4 ::backdrop](https://fullscreen.spec.whatwg.org/#::backdrop-pseudo-element)
    Backdrop,
}

/// `:name`, `:name(argument)` or `:not(selector)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PseudoClass {
    kind: Option<PseudoClassType>,
    name: String,
    function_value: Option<String>,
    nested: Option<Box<Selector>>,
    element_index: Option<(i32, i32)>,
}

impl PseudoClass {
    /// A pseudo-class without an argument. Unknown names are kept and
    /// delegated to the [`MatchCondition`] when matched.
    ///
    /// # Errors
    ///
    /// Returns [`CssError::InvalidArgument`] if `name` is empty.
    pub fn new(name: &str) -> Result<Self, CssError> {
        if name.is_empty() {
            return Err(CssError::invalid("pseudo-class name must not be empty"));
        }
        let kind = name.parse::<PseudoClassType>().ok();
        if kind.is_none() {
            warn_once("selector", &format!("unknown pseudo-class ':{name}'"));
        }
        Ok(Self {
            kind,
            name: name.to_string(),
            function_value: None,
            nested: None,
            element_index: None,
        })
    }

    /// A functional pseudo-class such as `:nth-child(2n+1)` or `:lang(en)`.
    ///
    /// An `an+b` argument that fails to decode leaves the pseudo-class in
    /// place but it never matches.
    ///
    /// # Errors
    ///
    /// Returns [`CssError::InvalidArgument`] if `name` is empty.
    pub fn function(name: &str, argument: &str) -> Result<Self, CssError> {
        let mut pseudo = Self::new(name)?;
        if pseudo.kind.is_some_and(PseudoClassType::is_nth) {
            pseudo.element_index = decode_index(argument);
            if pseudo.element_index.is_none() {
                warn_once(
                    "selector",
                    &format!("invalid an+b argument '{argument}' in :{name}()"),
                );
            }
        }
        pseudo.function_value = Some(argument.to_string());
        Ok(pseudo)
    }

    /// [§ 4.3 The Negation Pseudo-class](https://www.w3.org/TR/selectors-4/#negation)
    ///
    /// `:not(selector)`
    #[must_use]
    pub fn negation(selector: Selector) -> Self {
        Self {
            kind: Some(PseudoClassType::Not),
            name: PseudoClassType::Not.to_string(),
            function_value: None,
            nested: Some(Box::new(selector)),
            element_index: None,
        }
    }

    /// The pseudo-class, if its name is known.
    #[must_use]
    pub const fn kind(&self) -> Option<PseudoClassType> {
        self.kind
    }

    /// The name as written.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The raw argument of a functional pseudo-class.
    #[must_use]
    pub fn function_value(&self) -> Option<&str> {
        self.function_value.as_deref()
    }

    /// The selector inside `:not()`.
    #[must_use]
    pub fn nested(&self) -> Option<&Selector> {
        self.nested.as_deref()
    }

    /// The decoded `(a, b)` of an `nth-*` pseudo-class.
    #[must_use]
    pub const fn element_index(&self) -> Option<(i32, i32)> {
        self.element_index
    }

    /// [§ 14 Tree-Structural pseudo-classes](https://www.w3.org/TR/selectors-4/#structural-pseudos)
    ///
    /// Structural kinds and `:not()` are answered here; everything else goes
    /// to `condition` together with the owning `part`.
    pub(super) fn matches(
        &self,
        tree: &DomTree,
        node: NodeId,
        part: &SelectorPart,
        matcher: &dyn ElementMatcher,
        condition: &dyn MatchCondition,
    ) -> bool {
        let Some(element) = tree.as_element(node) else {
            return false;
        };
        let position = |of_type: bool, from_end: bool| -> i32 {
            sibling_position(tree, node, element, of_type, from_end)
        };

        match self.kind {
            Some(PseudoClassType::FirstChild) => position(false, false) == 1,
            Some(PseudoClassType::LastChild) => position(false, true) == 1,
            Some(PseudoClassType::OnlyChild) => {
                position(false, false) == 1 && position(false, true) == 1
            }
            Some(PseudoClassType::FirstOfType) => position(true, false) == 1,
            Some(PseudoClassType::LastOfType) => position(true, true) == 1,
            Some(PseudoClassType::OnlyOfType) => {
                position(true, false) == 1 && position(true, true) == 1
            }
            Some(kind @ (PseudoClassType::NthChild
            | PseudoClassType::NthLastChild
            | PseudoClassType::NthOfType
            | PseudoClassType::NthLastOfType)) => {
                let Some((a, b)) = self.element_index else {
                    return false;
                };
                let of_type = matches!(
                    kind,
                    PseudoClassType::NthOfType | PseudoClassType::NthLastOfType
                );
                let from_end = matches!(
                    kind,
                    PseudoClassType::NthLastChild | PseudoClassType::NthLastOfType
                );
                position_matches(position(of_type, from_end), a, b)
            }
            // "The :root pseudo-class represents an element that is the root
            // of the document."
            Some(PseudoClassType::Root) => tree
                .parent(node)
                .and_then(|parent| tree.get(parent))
                .is_some_and(|parent| matches!(parent.node_type, NodeType::Document)),
            // "The :empty pseudo-class represents an element that has no
            // children except, optionally, document white space characters."
            // Comments and processing instructions do not count.
            Some(PseudoClassType::Empty) => !tree.children(node).iter().any(|&child| {
                tree.get(child).is_some_and(|child| {
                    matches!(
                        child.node_type,
                        NodeType::Element(_)
                            | NodeType::Text(_)
                            | NodeType::CData(_)
                            | NodeType::EntityReference(_)
                    )
                })
            }),
            Some(PseudoClassType::Not) => self
                .nested
                .as_ref()
                .is_some_and(|nested| !nested.matches(tree, node, matcher, condition)),
            _ => condition.is_satisfied(tree, node, part),
        }
    }
}

/// 1-based position of `node` among its element siblings, counted from the
/// start or the end, optionally only among siblings with the same tag name.
fn sibling_position(
    tree: &DomTree,
    node: NodeId,
    element: &ElementData,
    of_type: bool,
    from_end: bool,
) -> i32 {
    let counts = |sibling: &NodeId| {
        tree.as_element(*sibling).is_some_and(|candidate| {
            !of_type || candidate.tag_name.eq_ignore_ascii_case(&element.tag_name)
        })
    };
    let before = if from_end {
        tree.following_siblings(node).filter(counts).count()
    } else {
        tree.preceding_siblings(node).filter(counts).count()
    };
    i32::try_from(before).map_or(i32::MAX, |before| before.saturating_add(1))
}

impl fmt::Display for PseudoClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ":{}", escape_identifier(&self.name, EscapeLevel::default()))?;
        match (&self.nested, &self.function_value) {
            (Some(nested), _) => write!(f, "({nested})"),
            (None, Some(argument)) => write!(f, "({argument})"),
            (None, None) => Ok(()),
        }
    }
}

/// `::name` or `::name(argument)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PseudoElement {
    kind: Option<PseudoElementType>,
    name: String,
    function_value: Option<String>,
}

impl PseudoElement {
    /// A pseudo-element. Unknown names are kept but never match.
    ///
    /// # Errors
    ///
    /// Returns [`CssError::InvalidArgument`] if `name` is empty.
    pub fn new(name: &str) -> Result<Self, CssError> {
        if name.is_empty() {
            return Err(CssError::invalid("pseudo-element name must not be empty"));
        }
        let kind = name.parse::<PseudoElementType>().ok();
        if kind.is_none() {
            warn_once("selector", &format!("unknown pseudo-element '::{name}'"));
        }
        Ok(Self {
            kind,
            name: name.to_string(),
            function_value: None,
        })
    }

    /// A functional pseudo-element.
    ///
    /// # Errors
    ///
    /// Returns [`CssError::InvalidArgument`] if `name` is empty.
    pub fn function(name: &str, argument: &str) -> Result<Self, CssError> {
        let mut pseudo = Self::new(name)?;
        pseudo.function_value = Some(argument.to_string());
        Ok(pseudo)
    }

    /// The pseudo-element, if its name is known.
    #[must_use]
    pub const fn kind(&self) -> Option<PseudoElementType> {
        self.kind
    }

    /// The name as written.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The raw argument, if functional.
    #[must_use]
    pub fn function_value(&self) -> Option<&str> {
        self.function_value.as_deref()
    }
}

impl fmt::Display for PseudoElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "::{}", escape_identifier(&self.name, EscapeLevel::default()))?;
        match &self.function_value {
            Some(argument) => write!(f, "({argument})"),
            None => Ok(()),
        }
    }
}
