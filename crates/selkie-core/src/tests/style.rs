use crate::style::{
    LineCap, LineJoin, LineStyle, parse_dash_array, parse_line_cap, parse_line_join,
    split_style_declarations,
};
use crate::units::UnitContext;

fn ctx() -> UnitContext {
    UnitContext::default()
}

#[test]
fn two_entries_map_to_dashed_or_dotted_by_threshold() {
    assert_eq!(
        parse_dash_array("0.5,0.5", &ctx()),
        Some((LineStyle::Dashed, 0.5))
    );
    assert_eq!(
        parse_dash_array("0.05,0.05", &ctx()),
        Some((LineStyle::Dotted, 0.05))
    );
}

#[test]
fn four_and_six_entries_map_to_dash_dot_variants() {
    assert_eq!(
        parse_dash_array("1,0.4,0.1,0.4", &ctx()),
        Some((LineStyle::DashDot, 1.0))
    );
    assert_eq!(
        parse_dash_array("1,0.3,0.1,0.3,0.1,0.3", &ctx()),
        Some((LineStyle::DashDotDot, 1.0))
    );
}

#[test]
fn dasharray_none_degrades_to_solid() {
    assert_eq!(
        parse_dash_array("none", &ctx()),
        Some((LineStyle::Solid, 1.0))
    );
}

#[test]
fn odd_entry_counts_are_not_mapped() {
    assert_eq!(parse_dash_array("1,2,3", &ctx()), None);
}

#[test]
fn caps_and_joins_parse_the_svg_keywords() {
    assert_eq!(parse_line_cap("round"), Some(LineCap::Round));
    assert_eq!(parse_line_cap("square"), Some(LineCap::Projecting));
    assert_eq!(parse_line_join("bevel"), Some(LineJoin::Bevel));
    assert_eq!(parse_line_join("weird"), None);
}

#[test]
fn style_declarations_split_into_trimmed_pairs() {
    let pairs: Vec<_> =
        split_style_declarations(" fill : none ; stroke:#ff0000;; stroke-width:0.2 ").collect();
    assert_eq!(
        pairs,
        vec![
            ("fill", "none"),
            ("stroke", "#ff0000"),
            ("stroke-width", "0.2"),
        ]
    );
}

#[test]
fn line_style_indices_round_trip() {
    for style in [
        LineStyle::Solid,
        LineStyle::Dashed,
        LineStyle::DashDot,
        LineStyle::DashDotDot,
        LineStyle::Dotted,
    ] {
        assert_eq!(LineStyle::from_index(style.index()), Some(style));
    }
}
