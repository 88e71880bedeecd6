use selkie_core::color::Rgb;
use selkie_core::geom::{point, rect};
use selkie_core::style::{LineCap, LineStyle};
use selkie_render::{Alignment, DiagramRenderer, SvgRenderer};

fn rendered(draw: impl FnOnce(&mut SvgRenderer<Vec<u8>>)) -> String {
    let mut renderer = SvgRenderer::new(Vec::new());
    renderer.begin_render(rect(0.0, 0.0, 10.0, 10.0)).expect("begin ok");
    draw(&mut renderer);
    renderer.end_render().expect("end ok");
    String::from_utf8(renderer.into_inner()).expect("svg is utf8")
}

#[test]
fn document_bracket_emits_prologue_viewbox_and_closing_tag() {
    let svg = rendered(|_| {});
    assert!(svg.starts_with("<?xml version=\"1.0\""));
    assert!(svg.contains(r#"viewBox="0.000 0.000 10.000 10.000""#));
    assert!(svg.trim_end().ends_with("</svg>"));
}

#[test]
fn zero_line_width_clamps_to_the_minimum_visible_width() {
    let svg = rendered(|r| {
        r.set_line_width(0.0);
        r.draw_line(point(0.0, 0.0), point(5.0, 0.0), Rgb::black())
            .expect("draw ok");
    });
    assert!(svg.contains(r#"stroke-width="0.001""#), "{svg}");
    assert!(!svg.contains(r#"stroke-width="0.000""#), "{svg}");
}

#[test]
fn state_setters_are_latest_wins() {
    let svg = rendered(|r| {
        r.set_line_width(0.2);
        r.set_line_width(0.4);
        r.draw_line(point(0.0, 0.0), point(1.0, 1.0), Rgb::black())
            .expect("draw ok");
    });
    assert!(svg.contains(r#"stroke-width="0.400""#), "{svg}");
    assert!(!svg.contains(r#"stroke-width="0.200""#), "{svg}");
}

#[test]
fn dash_styles_serialize_as_dash_arrays() {
    let svg = rendered(|r| {
        r.set_line_style(LineStyle::Dashed, 1.0);
        r.draw_line(point(0.0, 0.0), point(1.0, 0.0), Rgb::black())
            .expect("draw ok");
    });
    assert!(svg.contains(r#"stroke-dasharray="1.00,1.00""#), "{svg}");

    let svg = rendered(|r| {
        r.set_line_style(LineStyle::Dotted, 1.0);
        r.draw_line(point(0.0, 0.0), point(1.0, 0.0), Rgb::black())
            .expect("draw ok");
    });
    assert!(svg.contains(r#"stroke-dasharray="0.10,0.10""#), "{svg}");
}

#[test]
fn line_caps_serialize_only_when_not_the_default() {
    let svg = rendered(|r| {
        r.set_line_caps(LineCap::Round);
        r.draw_line(point(0.0, 0.0), point(1.0, 0.0), Rgb::black())
            .expect("draw ok");
    });
    assert!(svg.contains(r#"stroke-linecap="round""#), "{svg}");

    let svg = rendered(|r| {
        r.draw_line(point(0.0, 0.0), point(1.0, 0.0), Rgb::black())
            .expect("draw ok");
    });
    assert!(!svg.contains("stroke-linecap"), "{svg}");
}

#[test]
fn text_is_escaped_ampersand_first() {
    let svg = rendered(|r| {
        r.draw_string("a & <b> \"c'\"", point(0.0, 1.0), Alignment::Left, Rgb::black())
            .expect("draw ok");
    });
    assert!(
        svg.contains("a &amp; &lt;b&gt; &quot;c&apos;&quot;"),
        "{svg}"
    );
}

#[test]
fn alignment_maps_to_text_anchor() {
    let svg = rendered(|r| {
        r.draw_string("mid", point(0.0, 1.0), Alignment::Center, Rgb::black())
            .expect("draw ok");
    });
    assert!(svg.contains(r#"text-anchor="middle""#), "{svg}");

    let svg = rendered(|r| {
        r.draw_string("right", point(0.0, 1.0), Alignment::Right, Rgb::black())
            .expect("draw ok");
    });
    assert!(svg.contains(r#"text-anchor="end""#), "{svg}");
}

#[test]
fn empty_strings_are_skipped() {
    let svg = rendered(|r| {
        r.draw_string("", point(0.0, 1.0), Alignment::Left, Rgb::black())
            .expect("draw ok");
    });
    assert!(!svg.contains("<text"), "{svg}");
}

#[test]
fn arc_sweep_flag_follows_the_angle_direction() {
    // Decreasing angle sweeps positively in the y-flipped coordinate system.
    let svg = rendered(|r| {
        r.draw_arc(point(0.0, 0.0), 2.0, 2.0, 90.0, 0.0, Rgb::black())
            .expect("draw ok");
    });
    assert!(svg.contains("A 1.000,1.000 0 0,1"), "{svg}");

    let svg = rendered(|r| {
        r.draw_arc(point(0.0, 0.0), 2.0, 2.0, 0.0, 90.0, Rgb::black())
            .expect("draw ok");
    });
    assert!(svg.contains("A 1.000,1.000 0 0,0"), "{svg}");
}

#[test]
fn arc_large_arc_flag_set_from_half_turn_up() {
    let svg = rendered(|r| {
        r.draw_arc(point(0.0, 0.0), 2.0, 2.0, 0.0, 270.0, Rgb::black())
            .expect("draw ok");
    });
    assert!(svg.contains("A 1.000,1.000 0 1,0"), "{svg}");
}

#[test]
fn filled_arcs_carry_no_stroke() {
    let svg = rendered(|r| {
        r.fill_arc(point(0.0, 0.0), 2.0, 2.0, 0.0, 180.0, Rgb::new(1.0, 0.0, 0.0))
            .expect("draw ok");
    });
    assert!(svg.contains(r##"stroke="none" fill="#FF0000""##), "{svg}");
}

#[test]
fn beziergon_closes_its_path_data() {
    use selkie_core::path::PathCommand;
    let ops = [
        PathCommand::MoveTo(point(0.0, 0.0)),
        PathCommand::CurveTo(point(1.0, 0.0), point(2.0, 1.0), point(2.0, 2.0)),
    ];
    let svg = rendered(|r| {
        r.draw_beziergon(&ops, Some(Rgb::white()), Some(Rgb::black()))
            .expect("draw ok");
    });
    assert!(svg.contains("z\"/>"), "{svg}");
}

#[test]
fn absent_paint_serializes_as_none() {
    let svg = rendered(|r| {
        r.draw_rect(rect(0.0, 0.0, 2.0, 1.0), None, Some(Rgb::black()))
            .expect("draw ok");
    });
    assert!(svg.contains(r#"fill="none""#), "{svg}");
}

#[test]
fn object_wrappers_nest_link_outside_group() {
    let svg = rendered(|r| {
        r.begin_object(Some("node-1"), Some("https://example.com/a?x=1&y=2"))
            .expect("begin ok");
        r.draw_rect(rect(0.0, 0.0, 1.0, 1.0), None, Some(Rgb::black()))
            .expect("draw ok");
        r.end_object(Some("node-1"), Some("https://example.com/a?x=1&y=2"))
            .expect("end ok");
    });
    let a = svg.find("<a xlink:href=\"https://example.com/a?x=1&amp;y=2\">").expect("link open");
    let g = svg.find("<g id=\"node-1\">").expect("group open");
    assert!(a < g, "link wraps the id group: {svg}");
    assert!(svg.contains("</g>\n</a>"), "{svg}");
}
