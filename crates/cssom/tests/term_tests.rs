//! Integration tests for value terms.

use cssom::error::CssError;
use cssom::term::{
    ColorKeyword, Delim, Numeric, NumericKind, Operator, Term, TermColor, TermFunction, TermRect,
    TermValue, Unit,
};
use cssom_common::{Color, EscapeLevel};
use quickcheck_macros::quickcheck;

fn px(value: f32) -> Term {
    Term::dimension(value, Unit::Px).unwrap()
}

#[test]
fn test_numeric_display() {
    assert_eq!(px(10.0).to_string(), "10px");
    assert_eq!(px(1.5).to_string(), "1.5px");
    assert_eq!(Term::percent(50.0).unwrap().to_string(), "50%");
    assert_eq!(Term::integer(-3).to_string(), "-3");
    assert_eq!(Term::dimension(2.0, Unit::KHz).unwrap().to_string(), "2kHz");
}

#[test]
fn test_numeric_rejects_wrong_unit_family() {
    let result = Numeric::length(1.0, Unit::Deg);
    assert!(matches!(result, Err(CssError::InvalidArgument(_))));
    assert!(Numeric::angle(90.0, Unit::Deg).is_ok());
}

#[test]
fn test_numeric_rejects_negative_time() {
    assert!(Numeric::time(-1.0, Unit::S).is_err());
    assert!(Numeric::frequency(-1.0, Unit::Hz).is_err());
    assert!(Numeric::time(0.0, Unit::Ms).is_ok());
}

#[test]
fn test_numeric_rejects_non_finite() {
    assert!(Numeric::number(f32::NAN).is_err());
    assert!(Numeric::number(f32::INFINITY).is_err());
}

#[test]
fn test_dimension_kind_follows_unit() {
    let term = Term::dimension(45.0, Unit::Deg).unwrap();
    assert_eq!(term.as_numeric().unwrap().kind(), NumericKind::Angle);
    let term = Term::dimension(2.0, Unit::Dppx).unwrap();
    assert_eq!(term.as_numeric().unwrap().kind(), NumericKind::Resolution);
}

#[test]
fn test_operator_prefixes_serialization() {
    let term = px(2.0).with_operator(Some(Operator::Comma));
    assert_eq!(term.to_string(), ", 2px");
    let term = px(2.0).with_operator(Some(Operator::Slash));
    assert_eq!(term.to_string(), "/2px");
}

#[test]
fn test_string_and_ident_escaping() {
    assert_eq!(Term::string("a\"b").to_string(), "\"a\\\"b\"");
    assert_eq!(Term::ident("foo").to_string(), "foo");
    assert_eq!(Term::ident("1st").to_css(EscapeLevel::Hex), "\\31 st");
}

#[test]
fn test_uri_serialization_and_resolution() {
    let term = Term::uri("img/a.png", Some("http://example.com/css/site.css"));
    assert_eq!(term.to_string(), "url(\"img/a.png\")");
    let uri = term.as_uri().unwrap();
    assert_eq!(uri.resolved(), "http://example.com/css/img/a.png");
}

#[test]
fn test_function_serialization() {
    let args = vec![
        Term::integer(1),
        Term::integer(2).with_operator(Some(Operator::Comma)),
    ];
    let term = Term::function("foo", args).unwrap();
    assert_eq!(term.to_string(), "foo(1, 2)");
}

#[test]
fn test_function_empty_name_rejected() {
    assert!(TermFunction::new("", vec![]).is_err());
}

#[test]
fn test_function_folds_leading_minus() {
    let args = vec![Term::delim(Delim::Minus), px(4.0)];
    let function = TermFunction::new("translate", args).unwrap();
    assert!(function.is_valid());
    assert_eq!(function.args().len(), 1);
    assert_eq!(function.to_string(), "translate(-4px)");
}

#[test]
fn test_function_folds_minus_after_comma() {
    let args = vec![
        px(1.0),
        Term::delim(Delim::Minus).with_operator(Some(Operator::Comma)),
        px(2.0),
    ];
    let function = TermFunction::new("f", args).unwrap();
    assert!(function.is_valid());
    assert_eq!(function.args().len(), 2);
    assert_eq!(function.args()[1].operator(), Some(Operator::Comma));
    assert_eq!(function.to_string(), "f(1px, -2px)");
}

#[test]
fn test_function_dangling_minus_marks_invalid() {
    let args = vec![
        px(1.0),
        Term::delim(Delim::Minus).with_operator(Some(Operator::Comma)),
    ];
    let function = TermFunction::new("f", args).unwrap();
    assert!(!function.is_valid());
    assert!(!Term::from(function).is_valid());
}

#[test]
fn test_function_keeps_minus_between_operands() {
    let args = vec![
        px(1.0),
        Term::delim(Delim::Minus).with_operator(Some(Operator::Space)),
        px(2.0).with_operator(Some(Operator::Space)),
    ];
    let function = TermFunction::new("f", args).unwrap();
    assert!(function.is_valid());
    assert_eq!(function.args().len(), 3);
}

#[test]
fn test_separated_args() {
    let args = vec![
        px(1.0),
        px(2.0).with_operator(Some(Operator::Space)),
        px(3.0).with_operator(Some(Operator::Comma)),
    ];
    let function = TermFunction::new("f", args).unwrap();
    let groups = function.separated_args();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].len(), 2);
    assert_eq!(groups[1].len(), 1);
}

#[test]
fn test_negated_ident_and_number() {
    let ident = Term::ident("webkit-box").negated().unwrap();
    assert_eq!(ident.as_ident(), Some("-webkit-box"));
    let number = px(3.0).with_operator(Some(Operator::Space)).negated().unwrap();
    assert_eq!(number.as_numeric().unwrap().value(), -3.0);
    assert_eq!(number.operator(), Some(Operator::Space));
    assert!(Term::string("x").negated().is_none());
}

#[test]
fn test_color_from_hex_and_ident() {
    let color = TermColor::from_hex("#f00").unwrap();
    assert_eq!(color.color(), Color::rgb(255, 0, 0));
    assert_eq!(Term::from(color).to_string(), "#ff0000");

    let named = Term::ident("blue").to_color().unwrap();
    assert_eq!(named.color(), Color::rgb(0, 0, 255));
}

#[test]
fn test_color_keywords() {
    let current = TermColor::from_ident("currentColor").unwrap();
    assert_eq!(current.color_keyword(), Some(ColorKeyword::CurrentColor));
    assert_eq!(current.color(), Color::TRANSPARENT);
    assert_eq!(current.to_string(), "currentcolor");
}

#[test]
fn test_color_from_rgb_function() {
    let args = vec![
        Term::integer(10),
        Term::integer(20).with_operator(Some(Operator::Comma)),
        Term::integer(30).with_operator(Some(Operator::Comma)),
    ];
    let color = Term::function("rgb", args).unwrap().to_color().unwrap();
    assert_eq!(color.color(), Color::rgb(10, 20, 30));
}

#[test]
fn test_color_rejects_mixed_channels() {
    let args = vec![
        Term::integer(10),
        Term::percent(20.0).unwrap().with_operator(Some(Operator::Comma)),
        Term::integer(30).with_operator(Some(Operator::Comma)),
    ];
    assert!(Term::function("rgb", args).unwrap().to_color().is_none());
}

#[test]
fn test_color_from_hsl_function() {
    let args = vec![
        Term::integer(120),
        Term::percent(100.0).unwrap().with_operator(Some(Operator::Comma)),
        Term::percent(50.0).unwrap().with_operator(Some(Operator::Comma)),
    ];
    let color = Term::function("hsl", args).unwrap().to_color().unwrap();
    assert_eq!(color.color(), Color::rgb(0, 255, 0));
}

#[test]
fn test_rect_serialization() {
    let rect = TermRect::new([
        Some(Numeric::length(1.0, Unit::Px).unwrap()),
        None,
        Some(Numeric::integer(0)),
        Some(Numeric::length(2.0, Unit::Em).unwrap()),
    ])
    .unwrap();
    assert_eq!(Term::new(TermValue::Rect(rect)).to_string(), "rect(1px, auto, 0, 2em)");
}

#[test]
fn test_rect_rejects_non_length() {
    let edges = [Some(Numeric::angle(1.0, Unit::Deg).unwrap()), None, None, None];
    assert!(TermRect::new(edges).is_err());
}

#[test]
fn test_bracketed_idents() {
    let term = Term::new(TermValue::BracketedIdents(vec!["a".into(), "b".into()]));
    assert_eq!(term.to_string(), "[a b]");
}

#[test]
fn test_term_serializes_to_json() {
    let json = serde_json::to_value(px(12.0)).unwrap();
    assert_eq!(json["value"]["Numeric"]["unit"], "px");
}

#[quickcheck]
fn prop_negative_zero_is_normalized(positive: bool) -> bool {
    let zero = if positive { 0.0_f32 } else { -0.0_f32 };
    let mut numeric = Numeric::length(1.0, Unit::Px).unwrap();
    numeric.set_value(zero).unwrap();
    numeric.value().is_sign_positive() && numeric.to_string() == "0px"
}

#[quickcheck]
fn prop_negative_time_rejected(value: f32) -> bool {
    if !value.is_finite() {
        return true;
    }
    let mut numeric = Numeric::time(0.0, Unit::Ms).unwrap();
    numeric.set_value(value).is_ok() == (value >= 0.0)
}
