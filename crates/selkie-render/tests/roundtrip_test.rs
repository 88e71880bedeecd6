use selkie_core::model::{Diagram, PropertyValue, create_standard_object};
use selkie_core::{import_svg, import_svg_str};
use selkie_render::{export_svg, export_svgz, render_to_string};

#[test]
fn viewbox_matches_the_diagram_extents() {
    let diagram =
        import_svg_str(r#"<svg><rect x="0" y="0" width="10" height="5"/></svg>"#).expect("import ok");
    let svg = render_to_string(&diagram).expect("render ok");
    assert!(svg.contains(r#"viewBox="0.000 0.000 10.000 5.000""#), "{svg}");
}

#[test]
fn fill_none_survives_a_round_trip_as_absence_of_paint() {
    let diagram =
        import_svg_str(r#"<svg><rect x="0" y="0" width="10" height="5" fill="none"/></svg>"#)
            .expect("import ok");
    let svg = render_to_string(&diagram).expect("render ok");
    assert!(svg.contains(r#"fill="none""#), "{svg}");

    // The exported layer wrapper comes back as one group owning the shapes.
    let again = import_svg_str(&svg).expect("reimport ok");
    let layer_group = &again.layers()[0].objects()[0];
    assert_eq!(layer_group.type_name(), "Group");
    let object = &layer_group.children[0];
    assert_eq!(
        object.get("show_background").and_then(PropertyValue::as_bool),
        Some(false)
    );
}

#[test]
fn geometry_survives_a_round_trip() {
    let diagram = import_svg_str(
        r#"<svg><rect x="1" y="2" width="3" height="4"/><ellipse cx="5" cy="5" rx="2" ry="1"/></svg>"#,
    )
    .expect("import ok");
    let svg = render_to_string(&diagram).expect("render ok");
    let again = import_svg_str(&svg).expect("reimport ok");

    let objects = &again.layers()[0].objects()[0].children;
    assert_eq!(objects.len(), 2);
    assert_eq!(objects[0].type_name(), "Standard - Box");
    assert_eq!(
        objects[0].get("elem_width").and_then(PropertyValue::as_real),
        Some(3.0)
    );
    assert_eq!(objects[1].type_name(), "Standard - Ellipse");
    assert_eq!(
        objects[1].get("elem_width").and_then(PropertyValue::as_real),
        Some(4.0)
    );
}

#[test]
fn zero_width_line_exports_with_the_minimum_width() {
    let mut diagram = Diagram::new();
    let mut line = create_standard_object("Standard - Line", 0.0, 0.0).expect("line type");
    line.set(
        "end_point",
        PropertyValue::Point(selkie_core::geom::point(4.0, 0.0)),
    );
    line.set("line_width", PropertyValue::Real(0.0));
    diagram.active_layer_mut().add_object(line);

    let svg = render_to_string(&diagram).expect("render ok");
    assert!(svg.contains(r#"stroke-width="0.001""#), "{svg}");
}

#[test]
fn layers_render_as_named_groups() {
    let diagram = import_svg_str(
        r#"<svg><rect x="wat" y="0" width="2" height="2"/></svg>"#,
    )
    .expect("import ok");
    let svg = render_to_string(&diagram).expect("render ok");
    assert!(svg.contains(r#"<g id="Background">"#), "{svg}");
    // The diagnostics layer renders too, so the round trip keeps the report.
    assert!(svg.contains(r#"<g id="Errors">"#), "{svg}");
}

#[test]
fn object_metadata_becomes_link_and_id_wrappers() {
    let diagram = import_svg_str(
        r#"<svg><g id="frame"><rect x="0" y="0" width="2" height="2"/></g></svg>"#,
    )
    .expect("import ok");
    let svg = render_to_string(&diagram).expect("render ok");
    assert!(svg.contains(r#"<g id="frame">"#), "{svg}");
}

#[test]
fn multi_line_text_renders_one_element_per_line() {
    let diagram = import_svg_str(
        r#"<svg><text x="0" y="1">one<tspan dy="1">two</tspan></text></svg>"#,
    )
    .expect("import ok");
    let svg = render_to_string(&diagram).expect("render ok");
    assert_eq!(svg.matches("<text").count(), 2, "{svg}");
}

#[test]
fn compressed_export_reimports_transparently() {
    let diagram =
        import_svg_str(r#"<svg><rect x="0" y="0" width="2" height="2"/></svg>"#).expect("import ok");

    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("out.svgz");
    export_svgz(&diagram, &path).expect("export ok");

    let bytes = std::fs::read(&path).expect("read output");
    assert!(bytes.starts_with(&[0x1f, 0x8b]), "output is not gzip");

    let again = import_svg(&path).expect("reimport ok");
    assert_eq!(again.object_count(), diagram.object_count());
}

#[test]
fn plain_and_compressed_exports_carry_the_same_document() {
    use flate2::read::GzDecoder;
    use std::io::Read as _;

    let diagram = import_svg_str(
        r#"<svg><rect x="0" y="0" width="2" height="2"/><line x1="0" y1="0" x2="1" y2="1"/></svg>"#,
    )
    .expect("import ok");

    let dir = tempfile::tempdir().expect("tempdir");
    let plain_path = dir.path().join("out.svg");
    let gz_path = dir.path().join("out.svgz");
    export_svg(&diagram, &plain_path).expect("export svg ok");
    export_svgz(&diagram, &gz_path).expect("export svgz ok");

    let plain = std::fs::read_to_string(&plain_path).expect("read svg");
    let mut unpacked = String::new();
    GzDecoder::new(std::fs::File::open(&gz_path).expect("open svgz"))
        .read_to_string(&mut unpacked)
        .expect("decompress");
    assert_eq!(plain, unpacked);
}
