use crate::units::{Length, LengthError, LengthUnit, PIXELS_PER_CM, UnitContext, parse_length};

fn ctx() -> UnitContext {
    UnitContext::default()
}

#[test]
fn centimeters_resolve_unscaled() {
    // cm is the internal unit, so the dictUnitScales-style factor is 1.
    assert_eq!(parse_length("2.5cm", &ctx()).unwrap(), 2.5);
}

#[test]
fn pixels_resolve_at_90_dpi() {
    let v = parse_length("35.43307px", &ctx()).unwrap();
    assert!((v - 1.0).abs() < 1e-9);
}

#[test]
fn points_picas_inches_millimeters() {
    let c = ctx();
    assert!((parse_length("1pt", &c).unwrap() - 1.25 / PIXELS_PER_CM).abs() < 1e-12);
    assert!((parse_length("1pc", &c).unwrap() - 15.0 / PIXELS_PER_CM).abs() < 1e-12);
    assert!((parse_length("1in", &c).unwrap() - 90.0 / PIXELS_PER_CM).abs() < 1e-12);
    assert!((parse_length("10mm", &c).unwrap() - 1.0).abs() < 1e-9);
}

#[test]
fn em_and_ex_track_the_current_font_size() {
    let c = UnitContext {
        font_size: 0.7,
        ..ctx()
    };
    assert!((parse_length("2em", &c).unwrap() - 1.4).abs() < 1e-12);
    assert!((parse_length("1ex", &c).unwrap() - 1.4).abs() < 1e-12);
}

#[test]
fn percent_is_relative_to_the_viewport_diagonal() {
    let c = UnitContext {
        view_length: 32.0,
        ..ctx()
    };
    assert!((parse_length("50%", &c).unwrap() - 16.0).abs() < 1e-12);
}

#[test]
fn unitless_values_use_the_user_scale() {
    let c = UnitContext {
        user_scale: 0.1,
        ..ctx()
    };
    assert!((parse_length("40", &c).unwrap() - 4.0).abs() < 1e-12);
}

#[test]
fn parse_reserialize_reparse_is_identity() {
    let c = UnitContext {
        user_scale: 0.25,
        font_size: 0.9,
        view_length: 12.0,
    };
    for text in [
        "10", "-3.5", "2.5cm", "4mm", "11px", "8pt", "2pc", "0.5in", "1.5em", "3ex", "75%",
    ] {
        let first = Length::parse(text).unwrap();
        let again = Length::parse(&first.to_string()).unwrap();
        assert_eq!(first.unit, again.unit, "{text}");
        assert!(
            (first.resolve(&c) - again.resolve(&c)).abs() < 1e-12,
            "round-trip of {text}"
        );
    }
}

#[test]
fn garbage_is_malformed() {
    assert!(matches!(
        parse_length("", &ctx()),
        Err(LengthError::Malformed { .. })
    ));
    assert!(matches!(
        parse_length("cm", &ctx()),
        Err(LengthError::Malformed { .. })
    ));
}

#[test]
fn unrecognized_suffix_is_reported() {
    let err = parse_length("10foo", &ctx()).unwrap_err();
    assert_eq!(
        err,
        LengthError::UnknownUnit {
            unit: "foo".into(),
            text: "10foo".into()
        }
    );
}

#[test]
fn unit_suffixes_round_trip_through_display() {
    for unit in [
        LengthUnit::None,
        LengthUnit::Em,
        LengthUnit::Ex,
        LengthUnit::Px,
        LengthUnit::Pt,
        LengthUnit::Pc,
        LengthUnit::Cm,
        LengthUnit::Mm,
        LengthUnit::In,
        LengthUnit::Percent,
    ] {
        let len = Length::new(3.25, unit);
        assert_eq!(Length::parse(&len.to_string()).unwrap(), len);
    }
}

#[test]
fn view_box_sets_scale_and_diagonal() {
    let mut c = UnitContext::new();
    c.set_document_extents(Some(10.0), Some(10.0), Some([0.0, 0.0, 100.0, 100.0]));
    assert!((c.user_scale - 0.1).abs() < 1e-12);
    assert!((c.view_length - 100.0).abs() < 1e-12);
}

#[test]
fn view_box_with_one_known_dimension_uses_that_ratio() {
    let mut c = UnitContext::new();
    c.set_document_extents(Some(20.0), None, Some([0.0, 0.0, 40.0, 80.0]));
    assert!((c.user_scale - 0.5).abs() < 1e-12);
}

#[test]
fn missing_view_box_leaves_the_context_alone() {
    let mut c = UnitContext::new();
    c.set_document_extents(Some(20.0), Some(10.0), None);
    assert!((c.user_scale - 1.0).abs() < 1e-12);
    assert!((c.view_length - 32.0).abs() < 1e-12);
}
