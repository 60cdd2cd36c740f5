//! CSS selectors: model, specificity and matching
//!
//! This module implements selector matching per
//! [Selectors Level 4](https://www.w3.org/TR/selectors-4/).
//!
//! # Structure
//!
//! ```text
//!   CombinedSelector      div.note > p:first-child
//!   ├── Selector          div.note            (no combinator)
//!   │   ├── SelectorPart  div
//!   │   └── SelectorPart  .note
//!   └── Selector          p:first-child       (combinator: Child)
//!       ├── SelectorPart  p
//!       └── SelectorPart  :first-child
//! ```
//!
//! Matching never decides policy itself: element tests go through an
//! injected [`ElementMatcher`] and state-dependent pseudo-classes through an
//! injected [`MatchCondition`].

mod attribute;
mod matcher;
mod nth;
mod pseudo;
mod specificity;

use std::fmt;

use cssom_common::{EscapeLevel, escape_identifier};
use cssom_dom::{DomTree, NodeId};
use serde::{Serialize, Serializer};
use strum_macros::Display;

use crate::error::CssError;

pub use attribute::{AttributeOperator, AttributeSelector};
pub use matcher::{
    CaseSensitivity, ElementMatcher, ElementPseudoAssignment, LinkCondition, MatchCondition,
    NoCondition, StandardMatcher,
};
pub use nth::{decode_index, position_matches};
pub use pseudo::{PseudoClass, PseudoClassType, PseudoElement, PseudoElementType};
pub use specificity::{Specificity, SpecificityLevel};

/// [§ 5.2 Universal selector](https://www.w3.org/TR/selectors-4/#universal-selector)
/// "The universal selector is a single asterisk (*)"
pub const WILDCARD: &str = "*";

/// One atomic test within a [`Selector`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum SelectorPart {
    /// [§ 5.1 Type selector](https://www.w3.org/TR/selectors-4/#type-selectors)
    /// "A type selector is the name of a document language element type,
    /// and represents an instance of that element type in the document tree."
    ///
    /// `*` is the universal selector.
    ElementName(String),

    /// [§ 6.6 Class selector](https://www.w3.org/TR/selectors-4/#class-html)
    /// "The class selector is given as a full stop (. U+002E) immediately
    /// followed by an identifier."
    ElementClass(String),

    /// [§ 6.7 ID selector](https://www.w3.org/TR/selectors-4/#id-selectors)
    /// "An ID selector is a hash (#, U+0023) immediately followed by the
    /// ID value, which is an identifier."
    ElementId(String),

    /// [§ 6 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
    ElementAttribute(AttributeSelector),

    /// [§ 3.5 Pseudo-classes](https://www.w3.org/TR/selectors-4/#pseudo-classes)
    PseudoClass(PseudoClass),

    /// [§ 3.6 Pseudo-elements](https://www.w3.org/TR/selectors-4/#pseudo-elements)
    PseudoElement(PseudoElement),

    /// Matches exactly one element. Used for the declarations of a `style`
    /// attribute, which count as inline style when `inline_priority` is set.
    ElementDom {
        /// The element.
        #[serde(serialize_with = "serialize_node")]
        node: NodeId,
        /// Whether the part counts at specificity level A.
        inline_priority: bool,
    },
}

fn serialize_node<S: Serializer>(node: &NodeId, serializer: S) -> Result<S::Ok, S::Error> {
    let index = u64::try_from(node.0).map_err(<S::Error as serde::ser::Error>::custom)?;
    serializer.serialize_u64(index)
}

impl SelectorPart {
    /// A type selector, or the universal selector for `*`.
    ///
    /// # Errors
    ///
    /// Returns [`CssError::InvalidArgument`] if `name` is empty.
    pub fn element_name(name: &str) -> Result<Self, CssError> {
        non_empty(name, "element name").map(Self::ElementName)
    }

    /// A class selector.
    ///
    /// # Errors
    ///
    /// Returns [`CssError::InvalidArgument`] if `class` is empty.
    pub fn class(class: &str) -> Result<Self, CssError> {
        non_empty(class, "class name").map(Self::ElementClass)
    }

    /// An ID selector.
    ///
    /// # Errors
    ///
    /// Returns [`CssError::InvalidArgument`] if `id` is empty.
    pub fn id(id: &str) -> Result<Self, CssError> {
        non_empty(id, "ID").map(Self::ElementId)
    }

    /// An attribute selector.
    ///
    /// # Errors
    ///
    /// Returns [`CssError::InvalidArgument`] if `name` is empty.
    pub fn attribute(
        name: &str,
        value: &str,
        operator: AttributeOperator,
        is_string_value: bool,
    ) -> Result<Self, CssError> {
        AttributeSelector::new(name, value, operator, is_string_value).map(Self::ElementAttribute)
    }

    /// A pseudo-class without an argument.
    ///
    /// # Errors
    ///
    /// Returns [`CssError::InvalidArgument`] if `name` is empty.
    pub fn pseudo_class(name: &str) -> Result<Self, CssError> {
        PseudoClass::new(name).map(Self::PseudoClass)
    }

    /// A functional pseudo-class.
    ///
    /// # Errors
    ///
    /// Returns [`CssError::InvalidArgument`] if `name` is empty.
    pub fn pseudo_class_function(name: &str, argument: &str) -> Result<Self, CssError> {
        PseudoClass::function(name, argument).map(Self::PseudoClass)
    }

    /// `:not(selector)`
    #[must_use]
    pub fn negation(selector: Selector) -> Self {
        Self::PseudoClass(PseudoClass::negation(selector))
    }

    /// A pseudo-element.
    ///
    /// # Errors
    ///
    /// Returns [`CssError::InvalidArgument`] if `name` is empty.
    pub fn pseudo_element(name: &str) -> Result<Self, CssError> {
        PseudoElement::new(name).map(Self::PseudoElement)
    }

    /// A part matching only `node`.
    #[must_use]
    pub const fn element_dom(node: NodeId, inline_priority: bool) -> Self {
        Self::ElementDom {
            node,
            inline_priority,
        }
    }

    /// Whether this part holds for `node`. Non-element nodes never match.
    #[must_use]
    pub fn matches(
        &self,
        tree: &DomTree,
        node: NodeId,
        matcher: &dyn ElementMatcher,
        condition: &dyn MatchCondition,
    ) -> bool {
        let Some(element) = tree.as_element(node) else {
            return false;
        };
        match self {
            Self::ElementName(name) => name == WILDCARD || matcher.matches_name(element, name),
            Self::ElementClass(class) => matcher.matches_class(element, class),
            Self::ElementId(id) => matcher.matches_id(element, id),
            Self::ElementAttribute(attribute) => matcher.matches_attribute(
                element,
                attribute.name(),
                attribute.value(),
                attribute.operator(),
            ),
            Self::PseudoClass(pseudo) => pseudo.matches(tree, node, self, matcher, condition),
            // Pseudo-elements do not restrict which element is the
            // originating element; unknown ones make the selector fail.
            Self::PseudoElement(pseudo) => pseudo.kind().is_some(),
            Self::ElementDom { node: own, .. } => *own == node,
        }
    }

    /// [§ 17](https://www.w3.org/TR/selectors-4/#specificity-rules)
    ///
    /// Add this part's contribution to `specificity`.
    ///
    /// Pseudo-classes count one at level C, except `:not()`, which counts
    /// its argument instead of itself: `:not(#x)` is `0,1,0,0`, not
    /// `0,0,1,0`.
    pub fn add_specificity(&self, specificity: &mut Specificity) {
        match self {
            // "count the number of ID selectors in the selector"
            Self::ElementId(_) => specificity.add_one(SpecificityLevel::B),
            // "count the number of class selectors, attributes selectors,
            // and pseudo-classes in the selector"
            Self::ElementClass(_) | Self::ElementAttribute(_) => {
                specificity.add_one(SpecificityLevel::C);
            }
            // "The specificity of a :not() pseudo-class is replaced by the
            // specificity of the most specific complex selector in its
            // selector list argument."
            Self::PseudoClass(pseudo) => match pseudo.nested() {
                Some(nested) => *specificity += nested.specificity(),
                None => specificity.add_one(SpecificityLevel::C),
            },
            // "count the number of type selectors and pseudo-elements in the
            // selector". The universal selector is ignored.
            Self::ElementName(name) if name == WILDCARD => {}
            Self::ElementName(_) | Self::PseudoElement(_) => {
                specificity.add_one(SpecificityLevel::D);
            }
            Self::ElementDom {
                inline_priority, ..
            } => {
                if *inline_priority {
                    specificity.add_one(SpecificityLevel::A);
                }
            }
        }
    }
}

fn non_empty(value: &str, what: &str) -> Result<String, CssError> {
    if value.is_empty() {
        Err(CssError::invalid(format!("{what} must not be empty")))
    } else {
        Ok(value.to_string())
    }
}

impl fmt::Display for SelectorPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = EscapeLevel::default();
        match self {
            Self::ElementName(name) if name == WILDCARD => f.write_str(WILDCARD),
            Self::ElementName(name) => f.write_str(&escape_identifier(name, level)),
            Self::ElementClass(class) => write!(f, ".{}", escape_identifier(class, level)),
            Self::ElementId(id) => write!(f, "#{}", escape_identifier(id, level)),
            Self::ElementAttribute(attribute) => write!(f, "{attribute}"),
            Self::PseudoClass(pseudo) => write!(f, "{pseudo}"),
            Self::PseudoElement(pseudo) => write!(f, "{pseudo}"),
            // Inline style has no selector text.
            Self::ElementDom { .. } => Ok(()),
        }
    }
}

/// [§ 16 Combinators](https://www.w3.org/TR/selectors-4/#combinators)
///
/// "A combinator is punctuation that represents a particular kind of
/// relationship between the selectors on either side."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display)]
pub enum Combinator {
    /// [§ 16.1](https://www.w3.org/TR/selectors-4/#descendant-combinators)
    /// "A selector of the form 'A B' represents an element B that is an
    /// arbitrary descendant of some ancestor element A."
    #[strum(serialize = " ")]
    Descendant,
    /// [§ 16.2](https://www.w3.org/TR/selectors-4/#child-combinators)
    /// "A selector of the form 'A > B' represents an element B that is a
    /// direct child of element A."
    #[strum(serialize = " > ")]
    Child,
    /// [§ 16.3](https://www.w3.org/TR/selectors-4/#adjacent-sibling-combinators)
    /// "A selector of the form 'A + B' represents an element B that
    /// immediately follows element A, where A and B share the same parent."
    #[strum(serialize = " + ")]
    Adjacent,
    /// [§ 16.4](https://www.w3.org/TR/selectors-4/#general-sibling-combinators)
    /// "A selector of the form 'A ~ B' represents an element B that follows
    /// element A (not necessarily immediately), where A and B share the same
    /// parent."
    #[strum(serialize = " ~ ")]
    Preceding,
}

/// [§ 3.1 Compound selector](https://www.w3.org/TR/selectors-4/#compound)
///
/// An ordered sequence of parts, with the combinator joining it to the
/// previous selector in a [`CombinedSelector`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Selector {
    combinator: Option<Combinator>,
    parts: Vec<SelectorPart>,
    #[serde(skip)]
    pseudo_element: Option<usize>,
}

impl Selector {
    /// An empty selector joined by `combinator`.
    #[must_use]
    pub const fn new(combinator: Option<Combinator>) -> Self {
        Self {
            combinator,
            parts: Vec::new(),
            pseudo_element: None,
        }
    }

    /// Build a selector from parts.
    #[must_use]
    pub fn from_parts(combinator: Option<Combinator>, parts: Vec<SelectorPart>) -> Self {
        let mut selector = Self::new(combinator);
        for part in parts {
            selector.push(part);
        }
        selector
    }

    /// Builder-style [`Selector::push`].
    #[must_use]
    pub fn with_part(mut self, part: SelectorPart) -> Self {
        self.push(part);
        self
    }

    /// Append a part. A pseudo-element becomes the selector's pseudo-element,
    /// replacing any earlier one for [`Selector::pseudo_element`].
    pub fn push(&mut self, part: SelectorPart) {
        if matches!(part, SelectorPart::PseudoElement(_)) {
            self.pseudo_element = Some(self.parts.len());
        }
        self.parts.push(part);
    }

    /// Remove and return the part at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`CssError::InvalidArgument`] if `index` is out of range.
    pub fn remove(&mut self, index: usize) -> Result<SelectorPart, CssError> {
        if index >= self.parts.len() {
            return Err(CssError::invalid(format!(
                "part index {index} out of range for {} parts",
                self.parts.len()
            )));
        }
        let part = self.parts.remove(index);
        self.pseudo_element = self
            .parts
            .iter()
            .rposition(|part| matches!(part, SelectorPart::PseudoElement(_)));
        Ok(part)
    }

    /// The parts, in order.
    #[must_use]
    pub fn parts(&self) -> &[SelectorPart] {
        &self.parts
    }

    /// The combinator joining this selector to the previous one.
    #[must_use]
    pub const fn combinator(&self) -> Option<Combinator> {
        self.combinator
    }

    /// Replace the combinator.
    pub const fn set_combinator(&mut self, combinator: Option<Combinator>) {
        self.combinator = combinator;
    }

    /// The registered pseudo-element.
    #[must_use]
    pub fn pseudo_element(&self) -> Option<&PseudoElement> {
        match self.parts.get(self.pseudo_element?) {
            Some(SelectorPart::PseudoElement(pseudo)) => Some(pseudo),
            _ => None,
        }
    }

    /// The first type selector's name, `*` included.
    #[must_use]
    pub fn element_name(&self) -> Option<&str> {
        self.parts.iter().find_map(|part| match part {
            SelectorPart::ElementName(name) => Some(name.as_str()),
            _ => None,
        })
    }

    /// All class names tested, in order.
    #[must_use]
    pub fn class_names(&self) -> Vec<&str> {
        self.parts
            .iter()
            .filter_map(|part| match part {
                SelectorPart::ElementClass(class) => Some(class.as_str()),
                _ => None,
            })
            .collect()
    }

    /// The first ID tested.
    #[must_use]
    pub fn id_name(&self) -> Option<&str> {
        self.parts.iter().find_map(|part| match part {
            SelectorPart::ElementId(id) => Some(id.as_str()),
            _ => None,
        })
    }

    /// Sum of the parts' specificity.
    #[must_use]
    pub fn specificity(&self) -> Specificity {
        let mut specificity = Specificity::default();
        for part in &self.parts {
            part.add_specificity(&mut specificity);
        }
        specificity
    }

    /// Whether every part holds for `node`. The combinator is not consulted.
    #[must_use]
    pub fn matches(
        &self,
        tree: &DomTree,
        node: NodeId,
        matcher: &dyn ElementMatcher,
        condition: &dyn MatchCondition,
    ) -> bool {
        tree.is_element(node)
            && self
                .parts
                .iter()
                .all(|part| part.matches(tree, node, matcher, condition))
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.parts.iter().try_for_each(|part| write!(f, "{part}"))
    }
}

/// [§ 3.1 Complex selector](https://www.w3.org/TR/selectors-4/#complex)
///
/// "A complex selector is a sequence of one or more compound selectors
/// separated by combinators." The last selector is the subject.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct CombinedSelector {
    selectors: Vec<Selector>,
}

impl CombinedSelector {
    /// An empty combined selector.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            selectors: Vec::new(),
        }
    }

    /// Build from selectors in source order.
    #[must_use]
    pub const fn from_selectors(selectors: Vec<Selector>) -> Self {
        Self { selectors }
    }

    /// Builder-style [`CombinedSelector::push`].
    #[must_use]
    pub fn with_selector(mut self, selector: Selector) -> Self {
        self.push(selector);
        self
    }

    /// Append a selector.
    pub fn push(&mut self, selector: Selector) {
        self.selectors.push(selector);
    }

    /// The selectors, in source order.
    #[must_use]
    pub fn selectors(&self) -> &[Selector] {
        &self.selectors
    }

    /// The subject selector.
    ///
    /// # Errors
    ///
    /// Returns [`CssError::Unsupported`] if there are no selectors.
    pub fn last_selector(&self) -> Result<&Selector, CssError> {
        self.selectors
            .last()
            .ok_or(CssError::Unsupported("last selector of an empty combined selector"))
    }

    /// The subject's pseudo-element.
    #[must_use]
    pub fn pseudo_element(&self) -> Option<&PseudoElement> {
        self.selectors.last().and_then(Selector::pseudo_element)
    }

    /// [§ 17](https://www.w3.org/TR/selectors-4/#specificity-rules)
    ///
    /// Sum over all selectors in the chain.
    #[must_use]
    pub fn specificity(&self) -> Specificity {
        self.selectors
            .iter()
            .fold(Specificity::default(), |sum, selector| sum + selector.specificity())
    }

    /// [§ 4.1 Selector Matching](https://www.w3.org/TR/selectors-4/#match-a-selector-against-an-element)
    ///
    /// Whether the whole chain matches with `node` as the subject. The chain
    /// is walked right to left; descendant and subsequent-sibling steps try
    /// every candidate before giving up.
    #[must_use]
    pub fn matches(
        &self,
        tree: &DomTree,
        node: NodeId,
        matcher: &dyn ElementMatcher,
        condition: &dyn MatchCondition,
    ) -> bool {
        match self.selectors.len() {
            0 => false,
            len => self.matches_from(len - 1, tree, node, matcher, condition),
        }
    }

    fn matches_from(
        &self,
        index: usize,
        tree: &DomTree,
        node: NodeId,
        matcher: &dyn ElementMatcher,
        condition: &dyn MatchCondition,
    ) -> bool {
        let selector = &self.selectors[index];
        if !selector.matches(tree, node, matcher, condition) {
            return false;
        }
        if index == 0 {
            return true;
        }

        let previous = |candidate: NodeId| {
            self.matches_from(index - 1, tree, candidate, matcher, condition)
        };
        match selector.combinator.unwrap_or(Combinator::Descendant) {
            Combinator::Descendant => tree.ancestors(node).any(previous),
            Combinator::Child => tree.parent(node).is_some_and(previous),
            // Only element siblings take part; text and comments are skipped.
            Combinator::Adjacent => tree
                .preceding_siblings(node)
                .find(|&sibling| tree.is_element(sibling))
                .is_some_and(previous),
            Combinator::Preceding => tree.preceding_siblings(node).any(previous),
        }
    }
}

impl fmt::Display for CombinedSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, selector) in self.selectors.iter().enumerate() {
            if index > 0 {
                let combinator = selector.combinator.unwrap_or(Combinator::Descendant);
                write!(f, "{combinator}")?;
            }
            write!(f, "{selector}")?;
        }
        Ok(())
    }
}
