use crate::geom::point;
use crate::path::{PathCommand, PathError, parse_path, write_path};

use PathCommand::{Close, CurveTo, LineTo, MoveTo};

#[test]
fn close_inserts_the_line_back_to_the_subpath_start() {
    let cmds = parse_path("M10,10 L20,20 L30,10 Z").unwrap();
    assert_eq!(
        cmds,
        vec![
            MoveTo(point(10.0, 10.0)),
            LineTo(point(20.0, 20.0)),
            LineTo(point(30.0, 10.0)),
            LineTo(point(10.0, 10.0)),
            Close,
        ]
    );
}

#[test]
fn close_on_the_start_point_adds_no_synthetic_line() {
    let cmds = parse_path("M0,0 L5,0 L0,0 Z").unwrap();
    assert_eq!(
        cmds,
        vec![
            MoveTo(point(0.0, 0.0)),
            LineTo(point(5.0, 0.0)),
            LineTo(point(0.0, 0.0)),
            Close,
        ]
    );
}

#[test]
fn consecutive_closes_emit_one_bare_close() {
    let cmds = parse_path("M0,0 L5,5 Z Z").unwrap();
    let closes = cmds.iter().filter(|c| matches!(c, Close)).count();
    let lines = cmds.iter().filter(|c| matches!(c, LineTo(_))).count();
    assert_eq!(closes, 2);
    // One drawn line plus exactly one synthetic line for the first close.
    assert_eq!(lines, 2);
}

#[test]
fn implicit_repeat_continues_the_last_command() {
    let cmds = parse_path("M0,0 L1,1 2,2 3,3").unwrap();
    assert_eq!(
        cmds,
        vec![
            MoveTo(point(0.0, 0.0)),
            LineTo(point(1.0, 1.0)),
            LineTo(point(2.0, 2.0)),
            LineTo(point(3.0, 3.0)),
        ]
    );
}

#[test]
fn moveto_repeats_as_lineto() {
    let cmds = parse_path("M1,1 2,2").unwrap();
    assert_eq!(cmds, vec![MoveTo(point(1.0, 1.0)), LineTo(point(2.0, 2.0))]);
}

#[test]
fn consecutive_movetos_model_a_degenerate_subpath() {
    let cmds = parse_path("M1,1 M2,2 L3,3").unwrap();
    assert_eq!(
        cmds,
        vec![
            MoveTo(point(1.0, 1.0)),
            MoveTo(point(2.0, 2.0)),
            LineTo(point(3.0, 3.0)),
        ]
    );
}

#[test]
fn relative_commands_accumulate_from_the_current_point() {
    let cmds = parse_path("m1,1 l2,0 v3 h-2 z").unwrap();
    assert_eq!(
        cmds,
        vec![
            MoveTo(point(1.0, 1.0)),
            LineTo(point(3.0, 1.0)),
            LineTo(point(3.0, 4.0)),
            LineTo(point(1.0, 4.0)),
            LineTo(point(1.0, 1.0)),
            Close,
        ]
    );
}

#[test]
fn horizontal_and_vertical_lines_keep_the_other_axis() {
    let cmds = parse_path("M1,2 H10 V20").unwrap();
    assert_eq!(
        cmds,
        vec![
            MoveTo(point(1.0, 2.0)),
            LineTo(point(10.0, 2.0)),
            LineTo(point(10.0, 20.0)),
        ]
    );
}

#[test]
fn smooth_curve_reflects_the_previous_control_point() {
    let cmds = parse_path("M0,0 C0,10 10,10 10,0 S20,-10 20,0").unwrap();
    assert_eq!(
        cmds,
        vec![
            MoveTo(point(0.0, 0.0)),
            CurveTo(point(0.0, 10.0), point(10.0, 10.0), point(10.0, 0.0)),
            // Reflection of (10,10) through (10,0).
            CurveTo(point(10.0, -10.0), point(20.0, -10.0), point(20.0, 0.0)),
        ]
    );
}

#[test]
fn smooth_curve_after_a_line_collapses_onto_the_current_point() {
    let cmds = parse_path("M0,0 L10,0 S20,10 20,0").unwrap();
    assert_eq!(
        cmds,
        vec![
            MoveTo(point(0.0, 0.0)),
            LineTo(point(10.0, 0.0)),
            CurveTo(point(10.0, 0.0), point(20.0, 10.0), point(20.0, 0.0)),
        ]
    );
}

#[test]
fn relative_curves_offset_every_control_point() {
    let cmds = parse_path("M10,10 c0,5 5,5 5,0").unwrap();
    assert_eq!(
        cmds,
        vec![
            MoveTo(point(10.0, 10.0)),
            CurveTo(point(10.0, 15.0), point(15.0, 15.0), point(15.0, 10.0)),
        ]
    );
}

#[test]
fn arcs_and_quadratics_are_rejected_by_letter() {
    assert_eq!(
        parse_path("M0,0 A5,5 0 0,1 10,10").unwrap_err(),
        PathError::UnknownCommand { command: 'A' }
    );
    assert_eq!(
        parse_path("M0,0 Q5,5 10,0").unwrap_err(),
        PathError::UnknownCommand { command: 'Q' }
    );
}

#[test]
fn missing_operands_name_the_command() {
    assert_eq!(
        parse_path("M0,0 C1,2 3,4").unwrap_err(),
        PathError::MissingOperands {
            command: 'C',
            expected: 6,
            found: 4
        }
    );
    assert_eq!(
        parse_path("M5").unwrap_err(),
        PathError::MissingOperands {
            command: 'M',
            expected: 2,
            found: 1
        }
    );
}

#[test]
fn operands_before_any_command_are_rejected() {
    assert!(matches!(
        parse_path("10,10 L20,20"),
        Err(PathError::UnknownCommand { .. })
    ));
}

#[test]
fn numbers_may_run_together_with_signs_and_fractions() {
    let cmds = parse_path("M10-5L.5.25 1e2,0").unwrap();
    assert_eq!(
        cmds,
        vec![
            MoveTo(point(10.0, -5.0)),
            LineTo(point(0.5, 0.25)),
            LineTo(point(100.0, 0.0)),
        ]
    );
}

#[test]
fn absolute_sequences_round_trip_through_reemission() {
    for data in [
        "M10,10 L20,20 L30,10 Z",
        "M0,0 C0,10 10,10 10,0 S20,-10 20,0",
        "M1,1 M2,2 L3,3",
        "M0,0 L5,0 L5,5 Z M10,10 L12,12",
    ] {
        let first = parse_path(data).unwrap();
        let again = parse_path(&write_path(&first)).unwrap();
        assert_eq!(first, again, "round-trip of {data:?}");
    }
}

#[test]
fn empty_path_data_yields_no_commands() {
    assert_eq!(parse_path("").unwrap(), Vec::new());
    assert_eq!(parse_path("   ").unwrap(), Vec::new());
}
