//! Specificity computation and ordering.

use quickcheck_macros::quickcheck;

use cssom::selector::{CombinedSelector, Selector, SelectorPart, Specificity, SpecificityLevel};
use cssom_dom::NodeId;

fn selector(parts: Vec<SelectorPart>) -> Selector {
    Selector::from_parts(None, parts)
}

fn classes(count: u8) -> Selector {
    selector(
        (0..count)
            .map(|index| SelectorPart::class(&format!("c{index}")).unwrap())
            .collect(),
    )
}

#[test]
fn test_specificity_components() {
    let spec = selector(vec![
        SelectorPart::element_name("a").unwrap(),
        SelectorPart::id("nav").unwrap(),
        SelectorPart::class("x").unwrap(),
        SelectorPart::pseudo_class("hover").unwrap(),
        SelectorPart::pseudo_element("before").unwrap(),
    ])
    .specificity();
    assert_eq!(spec, Specificity::new(0, 1, 2, 2));
    assert_eq!(spec.get(SpecificityLevel::C), 2);
    assert_eq!(spec.to_string(), "0,1,2,2");
}

#[test]
fn test_universal_selector_counts_nothing() {
    let spec = selector(vec![SelectorPart::element_name("*").unwrap()]).specificity();
    assert_eq!(spec, Specificity::default());
}

#[test]
fn test_id_outranks_classes() {
    let id = selector(vec![SelectorPart::id("a").unwrap()]).specificity();
    let many_classes = classes(5).specificity();
    assert!(id > many_classes);
}

#[test]
fn test_inline_style_outranks_ids() {
    let inline = selector(vec![SelectorPart::element_dom(NodeId(3), true)]).specificity();
    let plain_dom = selector(vec![SelectorPart::element_dom(NodeId(3), false)]).specificity();
    let ids = selector(vec![
        SelectorPart::id("a").unwrap(),
        SelectorPart::id("b").unwrap(),
    ])
    .specificity();
    assert!(inline > ids);
    assert_eq!(plain_dom, Specificity::default());
}

#[test]
fn test_negation_counts_its_argument() {
    let not_id = selector(vec![SelectorPart::negation(selector(vec![
        SelectorPart::id("skip").unwrap(),
    ]))])
    .specificity();
    assert_eq!(not_id, Specificity::new(0, 1, 0, 0));
}

#[test]
fn test_combined_specificity_sums_chain() {
    let chain = CombinedSelector::new()
        .with_selector(selector(vec![SelectorPart::id("main").unwrap()]))
        .with_selector(selector(vec![
            SelectorPart::element_name("p").unwrap(),
            SelectorPart::class("note").unwrap(),
        ]));
    assert_eq!(chain.specificity(), Specificity::new(0, 1, 1, 1));
}

#[quickcheck]
fn prop_single_id_beats_any_number_of_classes(count: u8) -> bool {
    let id = selector(vec![SelectorPart::id("a").unwrap()]).specificity();
    id > classes(count).specificity()
}

#[quickcheck]
fn prop_higher_level_decides(a: (u8, u8, u8, u8), b: (u8, u8, u8, u8)) -> bool {
    let left = Specificity::new(a.0.into(), a.1.into(), a.2.into(), a.3.into());
    let right = Specificity::new(b.0.into(), b.1.into(), b.2.into(), b.3.into());
    let expected = (a.0, a.1, a.2, a.3).cmp(&(b.0, b.1, b.2, b.3));
    left.cmp(&right) == expected
}
