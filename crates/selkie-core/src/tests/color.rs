use crate::color::{Paint, Rgb, parse_color, resolve_named};

#[test]
fn rgb_components_normalize_to_unit_range() {
    let Paint::Color(c) = parse_color("rgb(255,0,128)") else {
        panic!("expected a color");
    };
    assert_eq!(c.red, 1.0);
    assert_eq!(c.green, 0.0);
    assert!((c.blue - 128.0 / 255.0).abs() < 1e-9);
}

#[test]
fn rgb_accepts_sloppy_separators() {
    assert!(matches!(parse_color("rgb( 12 , 34 , 56 )"), Paint::Color(_)));
    assert!(matches!(parse_color("rgb(12 34 56)"), Paint::Color(_)));
}

#[test]
fn none_is_absence_of_paint_not_black() {
    let paint = parse_color("none");
    assert_eq!(paint, Paint::None);
    assert_eq!(paint.resolve(), None);
}

#[test]
fn unrecognized_strings_pass_through_verbatim() {
    assert_eq!(
        parse_color("cornflowerblue"),
        Paint::Named("cornflowerblue".into())
    );
    // Never an error, even for clearly broken input.
    assert_eq!(parse_color("rgb(1,2)"), Paint::Named("rgb(1,2)".into()));
}

#[test]
fn named_paints_resolve_hex_forms() {
    assert_eq!(resolve_named("#ff0000"), Some(Rgb::new(1.0, 0.0, 0.0)));
    assert_eq!(resolve_named("#f00"), Some(Rgb::new(1.0, 0.0, 0.0)));
    assert_eq!(resolve_named("#zzzzzz"), None);
}

#[test]
fn named_paints_resolve_svg_keywords() {
    assert_eq!(resolve_named("black"), Some(Rgb::black()));
    assert_eq!(resolve_named("White"), Some(Rgb::white()));
    let green = resolve_named("green").unwrap();
    assert!((green.green - 128.0 / 255.0).abs() < 1e-9);
    assert_eq!(resolve_named("not-a-color"), None);
}

#[test]
fn hex_serialization_round_trips() {
    let c = Rgb::from_bytes(0x12, 0xAB, 0xEF);
    assert_eq!(c.to_hex(), "#12ABEF");
    assert_eq!(resolve_named(&c.to_hex()), Some(c));
}
