//! Injectable matching policies.
//!
//! Selectors never decide case sensitivity or application state on their
//! own. Element tests go through an [`ElementMatcher`], and pseudo-classes
//! that depend on state outside the tree (visited links, hover) go through a
//! [`MatchCondition`].

use std::collections::{HashMap, HashSet};

use cssom_dom::{DomTree, ElementData, NodeId};

use super::{AttributeOperator, PseudoClassType, SelectorPart};

/// Whether values compare exactly or ASCII case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CaseSensitivity {
    /// Exact comparison.
    #[default]
    Sensitive,
    /// ASCII case-insensitive comparison.
    Insensitive,
}

impl CaseSensitivity {
    /// Compare two strings under this policy.
    #[must_use]
    pub fn equals(self, a: &str, b: &str) -> bool {
        match self {
            Self::Sensitive => a == b,
            Self::Insensitive => a.eq_ignore_ascii_case(b),
        }
    }
}

/// How selector parts are tested against an element.
pub trait ElementMatcher {
    /// The element's tag name.
    fn element_name<'a>(&self, element: &'a ElementData) -> &'a str;

    /// The element's ID, if it has one.
    fn element_id<'a>(&self, element: &'a ElementData) -> Option<&'a str>;

    /// The element's classes, in document order.
    fn element_classes<'a>(&self, element: &'a ElementData) -> Vec<&'a str>;

    /// The value of attribute `name`, if present.
    fn attribute<'a>(&self, element: &'a ElementData, name: &str) -> Option<&'a str>;

    /// [§ 5.1 Type selector](https://www.w3.org/TR/selectors-4/#type-selectors)
    fn matches_name(&self, element: &ElementData, name: &str) -> bool;

    /// [§ 6.6 Class selector](https://www.w3.org/TR/selectors-4/#class-html)
    fn matches_class(&self, element: &ElementData, class: &str) -> bool;

    /// [§ 6.7 ID selector](https://www.w3.org/TR/selectors-4/#id-selectors)
    fn matches_id(&self, element: &ElementData, id: &str) -> bool;

    /// [§ 6.1 Attribute presence and value selectors](https://www.w3.org/TR/selectors-4/#attribute-representation)
    fn matches_attribute(
        &self,
        element: &ElementData,
        name: &str,
        value: &str,
        operator: AttributeOperator,
    ) -> bool;
}

/// The stock [`ElementMatcher`]: values (classes, IDs, attribute values)
/// compare under one policy and names (tags, attribute names) under another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct StandardMatcher {
    values: CaseSensitivity,
    names: CaseSensitivity,
}

impl StandardMatcher {
    /// Create a matcher with separate value and name policies.
    #[must_use]
    pub const fn new(values: CaseSensitivity, names: CaseSensitivity) -> Self {
        Self { values, names }
    }

    /// Everything compares exactly (XML documents).
    #[must_use]
    pub const fn strict() -> Self {
        Self::new(CaseSensitivity::Sensitive, CaseSensitivity::Sensitive)
    }

    /// [HTML § 4.16.1 Case-sensitivity of selectors](https://html.spec.whatwg.org/multipage/semantics-other.html#case-sensitivity-of-selectors)
    ///
    /// Values compare exactly; tag and attribute names do not.
    #[must_use]
    pub const fn html_standard() -> Self {
        Self::new(CaseSensitivity::Sensitive, CaseSensitivity::Insensitive)
    }

    /// Values compare case-insensitively; names exactly.
    #[must_use]
    pub const fn case_insensitive() -> Self {
        Self::new(CaseSensitivity::Insensitive, CaseSensitivity::Sensitive)
    }

    /// "Classes and IDs are matched ASCII case-insensitively in quirks mode."
    #[must_use]
    pub const fn quirks() -> Self {
        Self::new(CaseSensitivity::Insensitive, CaseSensitivity::Insensitive)
    }
}

impl ElementMatcher for StandardMatcher {
    fn element_name<'a>(&self, element: &'a ElementData) -> &'a str {
        &element.tag_name
    }

    fn element_id<'a>(&self, element: &'a ElementData) -> Option<&'a str> {
        element.id()
    }

    fn element_classes<'a>(&self, element: &'a ElementData) -> Vec<&'a str> {
        element.classes()
    }

    fn attribute<'a>(&self, element: &'a ElementData, name: &str) -> Option<&'a str> {
        match self.names {
            CaseSensitivity::Sensitive => element.attr(name),
            CaseSensitivity::Insensitive => element
                .attrs
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
                .map(|(_, value)| value.as_str()),
        }
    }

    fn matches_name(&self, element: &ElementData, name: &str) -> bool {
        self.names.equals(&element.tag_name, name)
    }

    fn matches_class(&self, element: &ElementData, class: &str) -> bool {
        element
            .classes()
            .iter()
            .any(|candidate| self.values.equals(candidate, class))
    }

    fn matches_id(&self, element: &ElementData, id: &str) -> bool {
        element.id().is_some_and(|own| self.values.equals(own, id))
    }

    fn matches_attribute(
        &self,
        element: &ElementData,
        name: &str,
        value: &str,
        operator: AttributeOperator,
    ) -> bool {
        self.attribute(element, name)
            .is_some_and(|actual| operator.matches(actual, value, self.values))
    }
}

/// Extra state consulted for pseudo-classes that the tree alone cannot
/// answer.
pub trait MatchCondition {
    /// Whether `part` holds for `node`.
    fn is_satisfied(&self, tree: &DomTree, node: NodeId, part: &SelectorPart) -> bool;
}

/// No extra state: every delegated pseudo-class fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCondition;

impl MatchCondition for NoCondition {
    fn is_satisfied(&self, _tree: &DomTree, _node: NodeId, _part: &SelectorPart) -> bool {
        false
    }
}

/// [§ 9.2 The Link History Pseudo-classes](https://www.w3.org/TR/selectors-4/#link)
///
/// "The :link pseudo-class applies to links that have not yet been visited."
/// Without history every link is unvisited, so `:link` and `:any-link`
/// match any `<a>` or `<area>` element with an `href` attribute.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinkCondition;

impl MatchCondition for LinkCondition {
    fn is_satisfied(&self, tree: &DomTree, node: NodeId, part: &SelectorPart) -> bool {
        let SelectorPart::PseudoClass(pseudo) = part else {
            return false;
        };
        if !matches!(
            pseudo.kind(),
            Some(PseudoClassType::Link | PseudoClassType::AnyLink)
        ) {
            return false;
        }
        tree.as_element(node).is_some_and(|element| {
            (element.tag_name.eq_ignore_ascii_case("a")
                || element.tag_name.eq_ignore_ascii_case("area"))
                && element.attrs.contains_key("href")
        })
    }
}

/// Pseudo-classes assigned by the application, either to individual nodes
/// or to every element with a given tag name.
///
/// ```ignore
/// let mut state = ElementPseudoAssignment::default();
/// state.assign_to_node(button, "hover");
/// state.assign_to_element_name("input", "enabled");
/// ```
#[derive(Debug, Clone, Default)]
pub struct ElementPseudoAssignment {
    by_node: HashMap<NodeId, HashSet<String>>,
    by_name: HashMap<String, HashSet<String>>,
}

impl ElementPseudoAssignment {
    /// Make `pseudo` hold for `node`.
    pub fn assign_to_node(&mut self, node: NodeId, pseudo: &str) {
        let _ = self
            .by_node
            .entry(node)
            .or_default()
            .insert(pseudo.to_ascii_lowercase());
    }

    /// Make `pseudo` hold for every element named `element_name`.
    pub fn assign_to_element_name(&mut self, element_name: &str, pseudo: &str) {
        let _ = self
            .by_name
            .entry(element_name.to_ascii_lowercase())
            .or_default()
            .insert(pseudo.to_ascii_lowercase());
    }

    /// Remove every assignment for `node`.
    pub fn clear_node(&mut self, node: NodeId) {
        let _ = self.by_node.remove(&node);
    }
}

impl MatchCondition for ElementPseudoAssignment {
    fn is_satisfied(&self, tree: &DomTree, node: NodeId, part: &SelectorPart) -> bool {
        let SelectorPart::PseudoClass(pseudo) = part else {
            return false;
        };
        let name = pseudo.name().to_ascii_lowercase();
        if self.by_node.get(&node).is_some_and(|set| set.contains(&name)) {
            return true;
        }
        tree.as_element(node).is_some_and(|element| {
            self.by_name
                .get(&element.tag_name.to_ascii_lowercase())
                .is_some_and(|set| set.contains(&name))
        })
    }
}
