//! Integration tests for rule containers and style sheets.

use cssom::rule::{
    Declaration, FontSource, FontStyle, FontWeight, KeyframeBlock, MarginArea, MediaExpression,
    MediaQualifier, MediaQuery, Origin, PageItem, RuleBlock, RuleContainer, RuleFontFace,
    RuleKeyframes, RuleMargin, RuleMedia, RulePage, RuleSet, RuleViewport, StyleSheet,
};
use cssom::selector::{Combinator, CombinedSelector, Selector, SelectorPart};
use cssom::term::{Operator, Term, TermValue, Unit};
use strum::IntoEnumIterator;

fn px(value: f32) -> Term {
    Term::dimension(value, Unit::Px).unwrap()
}

fn declaration(property: &str, terms: Vec<Term>) -> Declaration {
    Declaration::with_terms(property, terms).unwrap()
}

fn simple_selector(part: SelectorPart) -> CombinedSelector {
    CombinedSelector::new().with_selector(Selector::new(None).with_part(part))
}

fn rule_set() -> RuleSet {
    let mut rule = RuleSet::new(vec![
        simple_selector(SelectorPart::element_name("h1").unwrap()),
        CombinedSelector::new()
            .with_selector(Selector::new(None).with_part(SelectorPart::class("nav").unwrap()))
            .with_selector(
                Selector::new(Some(Combinator::Child))
                    .with_part(SelectorPart::element_name("a").unwrap()),
            ),
    ]);
    rule.push(declaration("color", vec![Term::ident("red")]));
    rule.push(
        declaration(
            "margin",
            vec![px(0.0), Term::ident("auto").with_operator(Some(Operator::Space))],
        )
        .important(true),
    );
    rule
}

#[test]
fn test_declaration_serialization() {
    let decl = declaration(
        "font-family",
        vec![
            Term::string("Open Sans"),
            Term::ident("serif").with_operator(Some(Operator::Comma)),
        ],
    );
    assert_eq!(decl.to_css(0), "font-family: \"Open Sans\", serif;\n");
    assert_eq!(decl.to_css(2), "\t\tfont-family: \"Open Sans\", serif;\n");
}

#[test]
fn test_declaration_property_is_lowercased() {
    let decl = Declaration::new("COLOR").unwrap();
    assert_eq!(decl.property(), "color");
    assert!(Declaration::new("").is_err());
}

#[test]
fn test_rule_set_serialization() {
    let css = rule_set().to_css(0);
    assert_eq!(css, "h1, .nav > a {\n\tcolor: red;\n\tmargin: 0px auto !important;\n}\n");
}

#[test]
fn test_rule_set_nested_indentation() {
    let css = rule_set().to_css(1);
    assert!(css.starts_with("\th1, .nav > a {\n\t\tcolor: red;\n"));
    assert!(css.ends_with("\t}\n"));
}

#[test]
fn test_container_index_operations() {
    let mut rule = rule_set();
    rule.insert(0, declaration("display", vec![Term::ident("block")])).unwrap();
    assert_eq!(rule.len(), 3);
    assert_eq!(rule.get(0).unwrap().property(), "display");

    let old = rule.set(1, declaration("color", vec![Term::ident("blue")])).unwrap();
    assert_eq!(old.as_list()[0].as_ident(), Some("red"));

    let removed = rule.remove(2).unwrap();
    assert_eq!(removed.property(), "margin");
    assert_eq!(rule.len(), 2);

    assert!(rule.insert(9, declaration("x", vec![])).is_err());
    assert!(rule.set(2, declaration("x", vec![])).is_err());
    assert!(rule.remove(2).is_err());
}

#[test]
fn test_unlock_and_replace_all() {
    let mut rule = rule_set();
    let before = rule.content_hash();
    assert_eq!(rule.content_hash(), before);

    rule.unlock();
    assert!(rule.is_empty());

    let replacement = vec![
        declaration("width", vec![px(10.0)]),
        declaration("height", vec![px(20.0)]),
    ];
    rule.replace_all(replacement.clone());
    assert_eq!(rule.as_list(), replacement.as_slice());
    assert_ne!(rule.content_hash(), before);
}

#[test]
fn test_hash_tracks_term_mutation() {
    let mut decl = declaration("width", vec![px(10.0)]);
    let before = decl.content_hash();
    let _ = decl.set(0, px(11.0)).unwrap();
    assert_ne!(decl.content_hash(), before);
    let _ = decl.set(0, px(10.0)).unwrap();
    assert_eq!(decl.content_hash(), before);
}

#[test]
fn test_equal_content_compares_equal() {
    assert_eq!(rule_set(), rule_set());
    let mut other = rule_set();
    other.push(declaration("top", vec![px(1.0)]));
    assert_ne!(rule_set(), other);
}

#[test]
fn test_style_sheet_links_blocks() {
    let mut sheet = StyleSheet::new(Origin::Author);
    sheet.push(RuleBlock::from(rule_set()));
    sheet.push(RuleViewport::new().into());

    let link = sheet.link();
    assert!(sheet.as_list().iter().all(|block| block.style_sheet() == Some(link)));

    sheet.set_origin(Origin::User);
    assert!(
        sheet
            .as_list()
            .iter()
            .all(|block| block.style_sheet().map(|link| link.origin) == Some(Origin::User))
    );
}

#[test]
fn test_style_sheets_have_distinct_identity_but_equal_content() {
    let mut first = StyleSheet::new(Origin::Agent);
    let mut second = StyleSheet::new(Origin::Agent);
    first.push(rule_set().into());
    second.push(rule_set().into());
    assert_ne!(first.link().id, second.link().id);
    assert_eq!(first, second);
    assert_eq!(first.as_list()[0], second.as_list()[0]);
}

#[test]
fn test_media_propagates_style_sheet() {
    let mut media = RuleMedia::new(vec![MediaQuery::new(Some("screen"))]);
    media.push(rule_set());
    media.push(rule_set());
    assert!(media.as_list().iter().all(|rule| rule.style_sheet().is_none()));

    let mut sheet = StyleSheet::new(Origin::Author);
    sheet.push(media.into());
    let RuleBlock::Media(media) = &sheet.as_list()[0] else {
        panic!("expected a media rule");
    };
    assert!(media.as_list().iter().all(|rule| rule.style_sheet() == Some(sheet.link())));
}

#[test]
fn test_removed_block_drops_style_sheet_link() {
    let mut sheet = StyleSheet::new(Origin::Author);
    sheet.push(rule_set().into());
    sheet.push(RuleViewport::new().into());

    let removed = sheet.remove(0).unwrap();
    assert_eq!(removed.style_sheet(), None);

    let replaced = sheet.set(0, rule_set().into()).unwrap();
    assert_eq!(replaced.style_sheet(), None);
    assert_eq!(sheet.as_list()[0].style_sheet(), Some(sheet.link()));
}

#[test]
fn test_media_releases_removed_rule_sets() {
    let sheet = StyleSheet::new(Origin::Author);
    let mut media = RuleMedia::new(vec![]);
    media.set_style_sheet(Some(sheet.link()));
    media.push(rule_set());
    media.push(rule_set());

    assert_eq!(media.remove(1).unwrap().style_sheet(), None);
    assert_eq!(media.set(0, rule_set()).unwrap().style_sheet(), None);
    assert_eq!(media.as_list()[0].style_sheet(), Some(sheet.link()));
}

#[test]
fn test_media_adopts_rule_sets_added_later() {
    let sheet = StyleSheet::new(Origin::User);
    let mut media = RuleMedia::new(vec![]);
    media.set_style_sheet(Some(sheet.link()));
    media.push(rule_set());
    assert_eq!(media.as_list()[0].style_sheet(), Some(sheet.link()));
}

#[test]
fn test_media_query_serialization() {
    let query = MediaQuery::new(Some("Screen"))
        .with_qualifier(MediaQualifier::Only)
        .with_expression(MediaExpression::new("min-width", vec![px(600.0)]).unwrap())
        .with_expression(MediaExpression::new("color", vec![]).unwrap());
    assert_eq!(query.to_string(), "only screen and (min-width: 600px) and (color)");

    let bare = MediaQuery::new(None)
        .with_expression(MediaExpression::new("hover", vec![Term::ident("hover")]).unwrap());
    assert_eq!(bare.to_string(), "(hover: hover)");
    assert!(MediaQuery::new(Some("print")).with_qualifier(MediaQualifier::Not).is_negated());
    assert!(MediaExpression::new("", vec![]).is_err());
}

#[test]
fn test_media_rule_serialization() {
    let mut media = RuleMedia::new(vec![MediaQuery::new(Some("print")), MediaQuery::new(Some("tv"))]);
    let mut rule = RuleSet::new(vec![simple_selector(SelectorPart::element_name("p").unwrap())]);
    rule.push(declaration("color", vec![Term::ident("black")]));
    media.push(rule);
    assert_eq!(media.to_css(0), "@media print, tv {\n\tp {\n\t\tcolor: black;\n\t}\n}\n");
}

#[test]
fn test_keyframes() {
    let mut from = KeyframeBlock::new(vec![Term::percent(0.0).unwrap()]).unwrap();
    from.push(declaration("opacity", vec![Term::integer(0)]));
    let mut to = KeyframeBlock::new(vec![
        Term::percent(50.0).unwrap(),
        Term::percent(100.0).unwrap().with_operator(Some(Operator::Comma)),
    ])
    .unwrap();
    to.push(declaration("opacity", vec![Term::integer(1)]));

    let mut keyframes = RuleKeyframes::new("fade").unwrap();
    keyframes.push(from);
    keyframes.push(to);
    assert_eq!(
        keyframes.to_css(0),
        "@keyframes fade {\n\t0% {\n\t\topacity: 0;\n\t}\n\t50%, 100% {\n\t\topacity: 1;\n\t}\n}\n"
    );
}

#[test]
fn test_keyframe_offsets_survive_replace_all() {
    let mut block = KeyframeBlock::new(vec![Term::percent(25.0).unwrap()]).unwrap();
    block.push(declaration("left", vec![px(1.0)]));
    block.replace_all(vec![declaration("top", vec![px(2.0)])]);
    assert_eq!(block.percentages().len(), 1);
    assert_eq!(block.len(), 1);
    assert!(KeyframeBlock::new(vec![px(1.0)]).is_err());
    assert!(KeyframeBlock::new(vec![]).is_err());
    assert!(RuleKeyframes::new("").is_err());
}

fn font_face() -> RuleFontFace {
    let format = Term::function("format", vec![Term::string("woff2")])
        .unwrap()
        .with_operator(Some(Operator::Space));
    let local = Term::function("local", vec![
        Term::ident("Open"),
        Term::ident("Sans").with_operator(Some(Operator::Space)),
    ])
    .unwrap()
    .with_operator(Some(Operator::Comma));

    let mut face = RuleFontFace::new();
    face.push(declaration("font-family", vec![Term::ident("Old")]));
    face.push(declaration("font-family", vec![Term::string("Open Sans")]));
    face.push(declaration(
        "src",
        vec![Term::uri("/fonts/open.woff2", Some("http://example.com/")), format, local],
    ));
    face.push(declaration("font-style", vec![Term::ident("Italic")]));
    face.push(declaration("font-weight", vec![Term::integer(600)]));
    face.push(declaration(
        "unicode-range",
        vec![
            Term::new(TermValue::UnicodeRange("U+0000-00FF".to_string())),
            Term::new(TermValue::UnicodeRange("U+0131".to_string()))
                .with_operator(Some(Operator::Comma)),
        ],
    ));
    face
}

#[test]
fn test_font_face_accessors() {
    let face = font_face();
    assert_eq!(face.font_family().as_deref(), Some("Open Sans"));
    assert_eq!(face.font_style(), Some(FontStyle::Italic));
    assert_eq!(face.font_weight(), Some(FontWeight::Numeric(600)));
    assert_eq!(face.unicode_ranges(), ["U+0000-00FF", "U+0131"]);

    let sources = face.sources();
    assert_eq!(sources.len(), 2);
    let FontSource::Url { uri, format } = &sources[0] else {
        panic!("expected a url source");
    };
    assert_eq!(uri.resolved(), "http://example.com/fonts/open.woff2");
    assert_eq!(format.as_deref(), Some("woff2"));
    assert_eq!(sources[1], FontSource::Local("Open Sans".to_string()));
}

#[test]
fn test_font_face_missing_descriptors() {
    let face = RuleFontFace::new();
    assert_eq!(face.font_family(), None);
    assert!(face.sources().is_empty());
    assert_eq!(face.font_weight(), None);
    assert!(face.unicode_ranges().is_empty());
}

#[test]
fn test_font_weight_keywords() {
    assert_eq!(FontWeight::from_term(&Term::ident("bold")), Some(FontWeight::Bold));
    assert_eq!(FontWeight::Bold.value(), Some(700));
    assert_eq!(FontWeight::from_term(&Term::integer(0)), None);
    assert_eq!(FontWeight::from_term(&Term::ident("heavy")), None);
}

#[test]
fn test_page_rule_with_margins() {
    let mut margin = RuleMargin::new("top-center").unwrap();
    assert_eq!(margin.area(), MarginArea::TopCenter);
    margin.push(declaration("content", vec![Term::string("Title")]));

    let mut page = RulePage::new(None, Some("first"));
    page.push(PageItem::from(declaration("margin", vec![Term::dimension(2.0, Unit::Cm).unwrap()])));
    page.push(margin.into());

    assert_eq!(page.declarations().count(), 1);
    assert_eq!(page.margins().count(), 1);
    assert_eq!(
        page.to_css(0),
        "@page :first {\n\tmargin: 2cm;\n\t@top-center {\n\t\tcontent: \"Title\";\n\t}\n}\n"
    );
}

#[test]
fn test_invalid_margin_area_rejected() {
    assert!(RuleMargin::new("middle-center").is_err());
    assert!(RuleMargin::new("TOP-LEFT-CORNER").is_ok());
}

#[test]
fn test_every_margin_area_parses_from_its_name() {
    assert_eq!(MarginArea::iter().count(), 16);
    for area in MarginArea::iter() {
        let margin = RuleMargin::new(area.as_ref()).unwrap();
        assert_eq!(margin.area(), area);
        assert_eq!(margin.to_css(0), format!("@{area} {{\n}}\n"));
    }
}

#[test]
fn test_named_page() {
    let page = RulePage::new(Some("cover"), Some("left"));
    assert_eq!(page.name(), Some("cover"));
    assert_eq!(page.to_css(0), "@page cover:left {\n}\n");
}

#[test]
fn test_style_sheet_serialization() {
    let mut sheet = StyleSheet::new(Origin::Author);
    sheet.push(rule_set().into());
    let mut viewport = RuleViewport::new();
    viewport.push(declaration("width", vec![Term::ident("device-width")]));
    sheet.push(viewport.into());
    assert_eq!(
        sheet.to_string(),
        "h1, .nav > a {\n\tcolor: red;\n\tmargin: 0px auto !important;\n}\n\
         @viewport {\n\twidth: device-width;\n}\n"
    );
}

#[test]
fn test_origin_names() {
    assert_eq!(Origin::Agent.to_string(), "user-agent");
    assert_eq!("user".parse::<Origin>().unwrap(), Origin::User);
}
