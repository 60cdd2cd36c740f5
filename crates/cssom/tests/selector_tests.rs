//! Integration tests for selector matching.

use cssom::error::CssError;
use cssom::selector::{
    AttributeOperator, CaseSensitivity, Combinator, CombinedSelector, ElementPseudoAssignment,
    LinkCondition, NoCondition, PseudoClassType, Selector, SelectorPart, StandardMatcher,
    decode_index, position_matches,
};
use cssom_common::{clear_warnings, emitted_warnings};
use cssom_dom::{DomTree, ElementData, NodeId, NodeType};
use quickcheck_macros::quickcheck;

fn element(tree: &mut DomTree, parent: NodeId, tag: &str) -> NodeId {
    let id = tree.alloc(NodeType::Element(ElementData::new(tag)));
    tree.append_child(parent, id);
    id
}

fn element_with(tree: &mut DomTree, parent: NodeId, data: ElementData) -> NodeId {
    let id = tree.alloc(NodeType::Element(data));
    tree.append_child(parent, id);
    id
}

fn simple(parts: Vec<SelectorPart>) -> Selector {
    Selector::from_parts(None, parts)
}

fn matches(selector: &Selector, tree: &DomTree, node: NodeId) -> bool {
    selector.matches(tree, node, &StandardMatcher::html_standard(), &NoCondition)
}

/// `<ul>` with `count` `<li>` children.
fn list(count: usize) -> (DomTree, Vec<NodeId>) {
    let mut tree = DomTree::new();
    let html = element(&mut tree, NodeId::ROOT, "html");
    let ul = element(&mut tree, html, "ul");
    let items = (0..count).map(|_| element(&mut tree, ul, "li")).collect();
    (tree, items)
}

#[test]
fn test_type_class_and_id() {
    let mut tree = DomTree::new();
    let div = element_with(
        &mut tree,
        NodeId::ROOT,
        ElementData::new("div")
            .with_attr("id", "main")
            .with_attr("class", "note wide"),
    );

    assert!(matches(&simple(vec![SelectorPart::element_name("DIV").unwrap()]), &tree, div));
    assert!(matches(&simple(vec![SelectorPart::class("wide").unwrap()]), &tree, div));
    assert!(!matches(&simple(vec![SelectorPart::class("Wide").unwrap()]), &tree, div));
    assert!(matches(&simple(vec![SelectorPart::id("main").unwrap()]), &tree, div));
    assert!(matches(&simple(vec![SelectorPart::element_name("*").unwrap()]), &tree, div));
    assert!(!matches(&simple(vec![SelectorPart::element_name("span").unwrap()]), &tree, div));
}

#[test]
fn test_quirks_matcher_ignores_case_of_classes() {
    let mut tree = DomTree::new();
    let div = element_with(&mut tree, NodeId::ROOT, ElementData::new("div").with_attr("class", "Note"));
    let selector = simple(vec![SelectorPart::class("note").unwrap()]);
    assert!(!selector.matches(&tree, div, &StandardMatcher::strict(), &NoCondition));
    assert!(selector.matches(&tree, div, &StandardMatcher::quirks(), &NoCondition));
}

#[test]
fn test_non_element_never_matches() {
    let mut tree = DomTree::new();
    let text = tree.append_text(NodeId::ROOT, "hi");
    let selector = simple(vec![SelectorPart::element_name("*").unwrap()]);
    assert!(!matches(&selector, &tree, text));
}

#[test]
fn test_empty_part_names_rejected() {
    assert!(matches!(SelectorPart::class(""), Err(CssError::InvalidArgument(_))));
    assert!(SelectorPart::id("").is_err());
    assert!(SelectorPart::attribute("", "x", AttributeOperator::Equals, true).is_err());
}

#[test]
fn test_attribute_includes() {
    let op = AttributeOperator::Includes;
    let case = CaseSensitivity::Sensitive;
    assert!(!op.matches("foobar", "foo", case));
    assert!(op.matches("bar foo baz", "foo", case));
    assert!(!op.matches("foo bar", "foo bar", case));
    assert!(!op.matches("foo", "", case));
}

#[test]
fn test_attribute_operators() {
    let case = CaseSensitivity::Sensitive;
    assert!(AttributeOperator::NoOperator.matches("anything", "", case));
    assert!(AttributeOperator::Equals.matches("en", "en", case));
    assert!(AttributeOperator::DashMatch.matches("en-US", "en", case));
    assert!(!AttributeOperator::DashMatch.matches("english", "en", case));
    assert!(AttributeOperator::StartsWith.matches("https://x", "https", case));
    assert!(AttributeOperator::EndsWith.matches("photo.png", ".png", case));
    assert!(AttributeOperator::Contains.matches("abcdef", "cd", case));
    assert!(!AttributeOperator::Contains.matches("abcdef", "", case));
    assert!(AttributeOperator::Equals.matches("EN", "en", CaseSensitivity::Insensitive));
}

#[test]
fn test_attribute_selector_on_element() {
    let mut tree = DomTree::new();
    let link = element_with(
        &mut tree,
        NodeId::ROOT,
        ElementData::new("a").with_attr("HREF", "/docs/intro.html"),
    );
    let selector = simple(vec![
        SelectorPart::attribute("href", ".html", AttributeOperator::EndsWith, true).unwrap(),
    ]);
    // Attribute names compare case-insensitively for HTML.
    assert!(matches(&selector, &tree, link));
    assert!(!selector.matches(&tree, link, &StandardMatcher::strict(), &NoCondition));
}

#[test]
fn test_decode_index() {
    assert_eq!(decode_index("odd"), Some((2, 1)));
    assert_eq!(decode_index("even"), Some((2, 0)));
    assert_eq!(decode_index("2n+1"), Some((2, 1)));
    assert_eq!(decode_index("-n+3"), Some((-1, 3)));
    assert_eq!(decode_index("5"), Some((0, 5)));
    assert_eq!(decode_index(" 3n - 2 "), Some((3, -2)));
    assert_eq!(decode_index("n"), Some((1, 0)));
    assert_eq!(decode_index("n+"), None);
    assert_eq!(decode_index("2n1"), None);
    assert_eq!(decode_index(""), None);
}

#[test]
fn test_decode_index_whitespace_only_around_offset_sign() {
    assert_eq!(decode_index("2n+ 1"), Some((2, 1)));
    assert_eq!(decode_index("2n +1"), Some((2, 1)));
    assert_eq!(decode_index(" -n + 3 "), Some((-1, 3)));
    assert_eq!(decode_index("- n+3"), None);
    assert_eq!(decode_index("2 n + 1"), None);
    assert_eq!(decode_index("+ 5"), None);
    assert_eq!(decode_index("2n+-1"), None);
    assert_eq!(decode_index("2n + 1 0"), None);
}

#[quickcheck]
fn prop_position_matches_brute_force(position: u8, a: i8, b: i8) -> bool {
    let position = i32::from(position) + 1;
    let (a, b) = (i32::from(a), i32::from(b));
    let expected = (0..=600).any(|k| a * k + b == position);
    position_matches(position, a, b) == expected
}

#[quickcheck]
fn prop_zero_a_matches_only_b(position: u8, b: i8) -> bool {
    let position = i32::from(position) + 1;
    position_matches(position, 0, i32::from(b)) == (position == i32::from(b))
}

#[test]
fn test_unrecognized_selectors_are_reported() {
    clear_warnings();
    let _ = SelectorPart::pseudo_class("frobbed").unwrap();
    let _ = SelectorPart::pseudo_class_function("nth-child", "3x+1").unwrap();
    let _ = SelectorPart::pseudo_element("sparkle").unwrap();

    let warnings = emitted_warnings();
    for expected in [
        "[selector] unknown pseudo-class ':frobbed'",
        "[selector] invalid an+b argument '3x+1' in :nth-child()",
        "[selector] unknown pseudo-element '::sparkle'",
    ] {
        assert!(warnings.contains(&expected.to_string()), "missing {expected}");
    }
}

#[test]
fn test_nth_child_odd() {
    let (tree, items) = list(6);
    let nth = simple(vec![SelectorPart::pseudo_class_function("nth-child", "2n+1").unwrap()]);
    let odd = simple(vec![SelectorPart::pseudo_class_function("nth-child", "odd").unwrap()]);
    let matched: Vec<usize> = (0..items.len())
        .filter(|&index| matches(&nth, &tree, items[index]))
        .map(|index| index + 1)
        .collect();
    assert_eq!(matched, [1, 3, 5]);
    for &item in &items {
        assert_eq!(matches(&nth, &tree, item), matches(&odd, &tree, item));
    }
}

#[test]
fn test_nth_child_first_three() {
    let (tree, items) = list(5);
    let selector = simple(vec![SelectorPart::pseudo_class_function("nth-child", "-n+3").unwrap()]);
    let matched: Vec<bool> = items.iter().map(|&item| matches(&selector, &tree, item)).collect();
    assert_eq!(matched, [true, true, true, false, false]);
}

#[test]
fn test_nth_last_child() {
    let (tree, items) = list(4);
    let selector = simple(vec![SelectorPart::pseudo_class_function("nth-last-child", "2").unwrap()]);
    let matched: Vec<bool> = items.iter().map(|&item| matches(&selector, &tree, item)).collect();
    assert_eq!(matched, [false, false, true, false]);
}

#[test]
fn test_invalid_nth_argument_never_matches() {
    let (tree, items) = list(3);
    let part = SelectorPart::pseudo_class_function("nth-child", "bogus").unwrap();
    let SelectorPart::PseudoClass(pseudo) = &part else {
        panic!("expected a pseudo-class");
    };
    assert_eq!(pseudo.element_index(), None);
    let selector = simple(vec![part]);
    assert!(items.iter().all(|&item| !matches(&selector, &tree, item)));
}

#[test]
fn test_first_last_only_child() {
    let (tree, items) = list(3);
    let first = simple(vec![SelectorPart::pseudo_class("first-child").unwrap()]);
    let last = simple(vec![SelectorPart::pseudo_class("last-child").unwrap()]);
    let only = simple(vec![SelectorPart::pseudo_class("only-child").unwrap()]);
    assert!(matches(&first, &tree, items[0]));
    assert!(!matches(&first, &tree, items[1]));
    assert!(matches(&last, &tree, items[2]));
    assert!(!items.iter().any(|&item| matches(&only, &tree, item)));

    let (tree, items) = list(1);
    assert!(matches(&only, &tree, items[0]));
}

#[test]
fn test_of_type_variants_skip_other_tags() {
    let mut tree = DomTree::new();
    let body = element(&mut tree, NodeId::ROOT, "body");
    let h1 = element(&mut tree, body, "h1");
    let p1 = element(&mut tree, body, "P");
    let _ = tree.append_text(body, "text between");
    let p2 = element(&mut tree, body, "p");
    let img = element(&mut tree, body, "img");

    let first_of_type = simple(vec![SelectorPart::pseudo_class("first-of-type").unwrap()]);
    let last_of_type = simple(vec![SelectorPart::pseudo_class("last-of-type").unwrap()]);
    let only_of_type = simple(vec![SelectorPart::pseudo_class("only-of-type").unwrap()]);
    let second_p = simple(vec![
        SelectorPart::element_name("p").unwrap(),
        SelectorPart::pseudo_class_function("nth-of-type", "2").unwrap(),
    ]);

    assert!(matches(&first_of_type, &tree, p1));
    assert!(!matches(&first_of_type, &tree, p2));
    assert!(matches(&last_of_type, &tree, p2));
    assert!(matches(&only_of_type, &tree, h1));
    assert!(matches(&only_of_type, &tree, img));
    assert!(!matches(&only_of_type, &tree, p1));
    assert!(matches(&second_p, &tree, p2));
    assert!(!matches(&second_p, &tree, p1));
}

#[test]
fn test_root_and_empty() {
    let mut tree = DomTree::new();
    let html = element(&mut tree, NodeId::ROOT, "html");
    let body = element(&mut tree, html, "body");
    let empty = element(&mut tree, body, "div");
    let with_text = element(&mut tree, body, "div");
    let _ = tree.append_text(with_text, "x");
    let with_comment = element(&mut tree, body, "div");
    let comment = tree.alloc(NodeType::Comment("note".to_string()));
    tree.append_child(with_comment, comment);

    let root = simple(vec![SelectorPart::pseudo_class("root").unwrap()]);
    assert!(matches(&root, &tree, html));
    assert!(!matches(&root, &tree, body));

    let is_empty = simple(vec![SelectorPart::pseudo_class("empty").unwrap()]);
    assert!(matches(&is_empty, &tree, empty));
    assert!(!matches(&is_empty, &tree, with_text));
    assert!(matches(&is_empty, &tree, with_comment));
    assert!(!matches(&is_empty, &tree, body));
}

#[test]
fn test_negation() {
    let (tree, items) = list(3);
    let not_first = simple(vec![
        SelectorPart::element_name("li").unwrap(),
        SelectorPart::negation(simple(vec![SelectorPart::pseudo_class("first-child").unwrap()])),
    ]);
    assert!(!matches(&not_first, &tree, items[0]));
    assert!(matches(&not_first, &tree, items[1]));
    assert!(matches(&not_first, &tree, items[2]));
}

#[test]
fn test_unknown_pseudo_class_goes_to_condition() {
    let mut tree = DomTree::new();
    let button = element(&mut tree, NodeId::ROOT, "button");
    let other = element(&mut tree, NodeId::ROOT, "button");
    let hover = simple(vec![SelectorPart::pseudo_class("hover").unwrap()]);
    let custom = simple(vec![SelectorPart::pseudo_class("x-pressed").unwrap()]);
    let matcher = StandardMatcher::html_standard();

    let mut state = ElementPseudoAssignment::default();
    state.assign_to_node(button, "hover");
    state.assign_to_element_name("button", "x-pressed");

    assert!(hover.matches(&tree, button, &matcher, &state));
    assert!(!hover.matches(&tree, other, &matcher, &state));
    assert!(custom.matches(&tree, other, &matcher, &state));
    assert!(!hover.matches(&tree, button, &matcher, &NoCondition));

    state.clear_node(button);
    assert!(!hover.matches(&tree, button, &matcher, &state));
}

#[test]
fn test_link_condition() {
    let mut tree = DomTree::new();
    let link = element_with(&mut tree, NodeId::ROOT, ElementData::new("a").with_attr("href", "#top"));
    let anchor = element(&mut tree, NodeId::ROOT, "a");
    let selector = simple(vec![SelectorPart::pseudo_class("link").unwrap()]);
    let matcher = StandardMatcher::html_standard();
    assert!(selector.matches(&tree, link, &matcher, &LinkCondition));
    assert!(!selector.matches(&tree, anchor, &matcher, &LinkCondition));

    let SelectorPart::PseudoClass(pseudo) = &selector.parts()[0] else {
        panic!("expected a pseudo-class");
    };
    assert_eq!(pseudo.kind(), Some(PseudoClassType::Link));
}

#[test]
fn test_pseudo_element_registration() {
    let mut selector = simple(vec![
        SelectorPart::element_name("p").unwrap(),
        SelectorPart::pseudo_element("before").unwrap(),
    ]);
    assert_eq!(selector.pseudo_element().unwrap().name(), "before");
    let _ = selector.remove(1).unwrap();
    assert!(selector.pseudo_element().is_none());
    assert!(selector.remove(5).is_err());
}

#[test]
fn test_unknown_pseudo_element_never_matches() {
    let mut tree = DomTree::new();
    let p = element(&mut tree, NodeId::ROOT, "p");
    let known = simple(vec![SelectorPart::pseudo_element("first-line").unwrap()]);
    let unknown = simple(vec![SelectorPart::pseudo_element("bogus").unwrap()]);
    assert!(matches(&known, &tree, p));
    assert!(!matches(&unknown, &tree, p));
}

#[test]
fn test_element_dom_part() {
    let mut tree = DomTree::new();
    let a = element(&mut tree, NodeId::ROOT, "div");
    let b = element(&mut tree, NodeId::ROOT, "div");
    let selector = simple(vec![SelectorPart::element_dom(a, true)]);
    assert!(matches(&selector, &tree, a));
    assert!(!matches(&selector, &tree, b));
}

#[test]
fn test_selector_helpers() {
    let selector = simple(vec![
        SelectorPart::element_name("div").unwrap(),
        SelectorPart::class("a").unwrap(),
        SelectorPart::id("main").unwrap(),
        SelectorPart::class("b").unwrap(),
    ]);
    assert_eq!(selector.element_name(), Some("div"));
    assert_eq!(selector.class_names(), ["a", "b"]);
    assert_eq!(selector.id_name(), Some("main"));
    assert_eq!(selector.to_string(), "div.a#main.b");
}

/// `<div class="outer"><section><p/><span/><em/></section></div>`
fn nested_tree() -> (DomTree, [NodeId; 5]) {
    let mut tree = DomTree::new();
    let div = element_with(&mut tree, NodeId::ROOT, ElementData::new("div").with_attr("class", "outer"));
    let section = element(&mut tree, div, "section");
    let p = element(&mut tree, section, "p");
    let _ = tree.append_text(section, " ");
    let span = element(&mut tree, section, "span");
    let em = element(&mut tree, section, "em");
    (tree, [div, section, p, span, em])
}

fn combined(steps: &[(Option<Combinator>, SelectorPart)]) -> CombinedSelector {
    steps
        .iter()
        .cloned()
        .fold(CombinedSelector::new(), |chain, (combinator, part)| {
            chain.with_selector(Selector::new(combinator).with_part(part))
        })
}

#[test]
fn test_descendant_and_child_combinators() {
    let (tree, [_, _, p, _, _]) = nested_tree();
    let matcher = StandardMatcher::html_standard();

    let descendant = combined(&[
        (None, SelectorPart::class("outer").unwrap()),
        (Some(Combinator::Descendant), SelectorPart::element_name("p").unwrap()),
    ]);
    assert!(descendant.matches(&tree, p, &matcher, &NoCondition));

    let child = combined(&[
        (None, SelectorPart::class("outer").unwrap()),
        (Some(Combinator::Child), SelectorPart::element_name("p").unwrap()),
    ]);
    assert!(!child.matches(&tree, p, &matcher, &NoCondition));

    let child = combined(&[
        (None, SelectorPart::element_name("section").unwrap()),
        (Some(Combinator::Child), SelectorPart::element_name("p").unwrap()),
    ]);
    assert!(child.matches(&tree, p, &matcher, &NoCondition));
    assert_eq!(child.to_string(), "section > p");
}

#[test]
fn test_sibling_combinators() {
    let (tree, [_, _, _, span, em]) = nested_tree();
    let matcher = StandardMatcher::html_standard();

    // The text node between p and span is skipped.
    let adjacent = combined(&[
        (None, SelectorPart::element_name("p").unwrap()),
        (Some(Combinator::Adjacent), SelectorPart::element_name("span").unwrap()),
    ]);
    assert!(adjacent.matches(&tree, span, &matcher, &NoCondition));

    let not_adjacent = combined(&[
        (None, SelectorPart::element_name("p").unwrap()),
        (Some(Combinator::Adjacent), SelectorPart::element_name("em").unwrap()),
    ]);
    assert!(!not_adjacent.matches(&tree, em, &matcher, &NoCondition));

    let preceding = combined(&[
        (None, SelectorPart::element_name("p").unwrap()),
        (Some(Combinator::Preceding), SelectorPart::element_name("em").unwrap()),
    ]);
    assert!(preceding.matches(&tree, em, &matcher, &NoCondition));
}

#[test]
fn test_descendant_backtracks() {
    // div > section p: the nearest `section` ancestor must be a child of a div.
    let (tree, [_, _, p, _, _]) = nested_tree();
    let chain = combined(&[
        (None, SelectorPart::element_name("div").unwrap()),
        (Some(Combinator::Child), SelectorPart::element_name("section").unwrap()),
        (Some(Combinator::Descendant), SelectorPart::element_name("p").unwrap()),
    ]);
    assert!(chain.matches(&tree, p, &StandardMatcher::html_standard(), &NoCondition));
    assert_eq!(chain.to_string(), "div > section p");
}

#[test]
fn test_empty_combined_selector() {
    let chain = CombinedSelector::new();
    assert!(matches!(chain.last_selector(), Err(CssError::Unsupported(_))));
    let tree = DomTree::new();
    assert!(!chain.matches(&tree, NodeId::ROOT, &StandardMatcher::default(), &NoCondition));
}

#[test]
fn test_selector_serializes_to_json() {
    let selector = simple(vec![SelectorPart::class("note").unwrap()]);
    let json = serde_json::to_value(&selector).unwrap();
    assert_eq!(json["parts"][0]["ElementClass"], "note");
}
