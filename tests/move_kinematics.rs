// tests/move_kinematics.rs
use glam::{DQuat, DVec3, IVec3};
use lattice_moves::{
    AnchorDirectionCode, Kinematics, ModuleShape, Move, MoveKind, TRIANGLE_ROLL_ANGLE,
};
use std::f64::consts::{FRAC_PI_2, PI};

const EPS: f64 = 1e-9;

fn pivot(shape: ModuleShape, adc: i32, delta: [i32; 3]) -> Move {
    Move::new(7, adc, IVec3::from_array(delta), MoveKind::Pivot, shape)
}

fn slide(adc: i32, delta: [i32; 3]) -> Move {
    Move::new(7, adc, IVec3::from_array(delta), MoveKind::Sliding, ModuleShape::Cube)
}

/// Where the module's centre ends up after the full move.
fn landing(mv: &Move) -> DVec3 {
    mv.transform_at(1.0).transform_point3(DVec3::ZERO)
}

fn assert_vec(actual: DVec3, expected: DVec3) {
    assert!(
        actual.abs_diff_eq(expected, EPS),
        "expected {expected}, got {actual}"
    );
}

fn assert_identity(q: DQuat) {
    for axis in [DVec3::X, DVec3::Y, DVec3::Z] {
        assert_vec(q * axis, axis);
    }
}

fn sample_moves() -> Vec<Move> {
    vec![
        pivot(ModuleShape::Cube, 2, [1, 0, 0]),
        pivot(ModuleShape::Cube, 4, [0, 0, -1]),
        pivot(ModuleShape::Cube, 2, [1, 1, 0]),
        slide(0, [0, 0, 1]),
        slide(-12, [1, 1, 0]),
        slide(-4, [1, 0, 1]),
        pivot(ModuleShape::RhombicDodecahedron, 12, [1, 0, 1]),
        pivot(ModuleShape::RhombicDodecahedron, 56, [1, -1, 0]),
        pivot(ModuleShape::Catom, 12, [1, 0, 1]),
        pivot(ModuleShape::Catom, 12, [2, 0, 0]),
        pivot(ModuleShape::Catom, 1012, [1, 0, 1]),
    ]
}

#[test]
fn test_cube_pivot_single_step() {
    let mv = pivot(ModuleShape::Cube, 2, [1, 0, 0]);
    assert_eq!(mv.kinematics(), Kinematics::CubePivot);
    assert_eq!(mv.steps().len(), 1);

    let step = &mv.steps()[0];
    assert_vec(step.rot_axis, DVec3::Z);
    assert!((step.max_angle - FRAC_PI_2).abs() < EPS);
    assert_eq!(step.max_pct, 1.0);
    assert_vec(step.post_trans, DVec3::new(0.5, 0.5, 0.0));
    assert_vec(step.pre_trans, -step.post_trans);

    assert_vec(landing(&mv), DVec3::X);
}

#[test]
fn test_cube_double_move_pivots_half_a_turn() {
    let mv = pivot(ModuleShape::Cube, 2, [1, 1, 0]);
    let step = &mv.steps()[0];

    assert!((step.max_angle - PI).abs() < EPS);
    assert_vec(step.post_trans, DVec3::new(0.5, 0.5, 0.0));
    assert_vec(landing(&mv), DVec3::new(1.0, 1.0, 0.0));
}

#[test]
fn test_pivot_axis_is_orthogonal_to_motion_and_anchor() {
    let cases = [
        (ModuleShape::Cube, 1, [0, 1, 0]),
        (ModuleShape::Cube, 3, [-1, 0, 0]),
        (ModuleShape::Cube, 5, [0, 0, 1]),
        (ModuleShape::Cube, 6, [0, 1, -1]),
        (ModuleShape::RhombicDodecahedron, 12, [1, 0, 1]),
        (ModuleShape::RhombicDodecahedron, 23, [1, 1, 0]),
        (ModuleShape::RhombicDodecahedron, 46, [0, -1, -1]),
    ];
    for (shape, adc, delta) in cases {
        let mv = pivot(shape, adc, delta);
        let step = &mv.steps()[0];
        assert!(step.rotates(), "{shape} {adc} {delta:?} should rotate");
        assert!((step.rot_axis.length() - 1.0).abs() < EPS);
        assert!(step.rot_axis.dot(mv.delta_pos().as_dvec3()).abs() < EPS);
        assert!(step.rot_axis.dot(step.anchor_dir).abs() < EPS);
    }
}

#[test]
fn test_pivots_land_on_their_displacement() {
    for mv in [
        pivot(ModuleShape::Cube, 2, [1, 0, 0]),
        pivot(ModuleShape::Cube, 1, [0, 0, 1]),
        pivot(ModuleShape::Cube, 2, [1, 1, 0]),
        pivot(ModuleShape::RhombicDodecahedron, 12, [1, 0, 1]),
        pivot(ModuleShape::Catom, 12, [1, 0, 1]),
        pivot(ModuleShape::Catom, 12, [2, 0, 0]),
        pivot(ModuleShape::Catom, 1012, [1, 0, 1]),
    ] {
        assert_vec(landing(&mv), mv.delta_pos().as_dvec3());
    }
}

#[test]
fn test_catom_step_axes_are_orthogonal_to_their_legs() {
    for (adc, delta) in [(12, [1, 0, 1]), (12, [2, 0, 0]), (45, [-1, 0, -1]), (26, [1, 0, -1])] {
        let mv = pivot(ModuleShape::Catom, adc, delta);
        assert_eq!(mv.kinematics(), Kinematics::CatomSquareRoll);
        for step in mv.steps() {
            assert!((step.rot_axis.length() - 1.0).abs() < EPS, "{adc} {delta:?}");
            assert!(step.rot_axis.dot(step.delta_pos).abs() < EPS, "{adc} {delta:?}");
        }
    }

    // The second triangle leg tilts about an axis normal to the whole displacement.
    let mv = pivot(ModuleShape::Catom, 1012, [1, 0, 1]);
    let [first, second] = mv.steps() else {
        panic!("triangle roll has two steps");
    };
    assert!(first.rot_axis.dot(first.delta_pos).abs() < EPS);
    assert!(second.rot_axis.dot(mv.delta_pos().as_dvec3()).abs() < EPS);
    assert!(second.rot_axis.dot(mv.bump_axis().unwrap()).abs() < EPS);
}

#[test]
fn test_rhombic_dodecahedron_pivot() {
    let mv = pivot(ModuleShape::RhombicDodecahedron, 12, [1, 0, 1]);
    let step = &mv.steps()[0];

    assert!((step.max_angle - 2.0 * PI / 3.0).abs() < EPS);
    assert_vec(step.rot_axis, DVec3::new(-1.0, 1.0, 1.0).normalize());

    let reversed = mv.reverse();
    assert_eq!(reversed.adc(), AnchorDirectionCode(26));
    assert_eq!(reversed.delta_pos(), IVec3::new(-1, 0, -1));
    assert_vec(reversed.steps()[0].rot_axis, -step.rot_axis);
}

#[test]
fn test_corner_slide_splits_into_two_legs() {
    let adc = AnchorDirectionCode::encode(DVec3::new(1.0, 1.0, 0.0)).corner();
    let mv = Move::new(3, adc, IVec3::new(1, 1, 0), MoveKind::Sliding, ModuleShape::Cube);
    assert_eq!(mv.kinematics(), Kinematics::CornerSlide);

    let steps = mv.steps();
    assert_eq!(steps.len(), 2);
    assert_eq!(steps[0].delta_pos, DVec3::X);
    assert_eq!(steps[1].delta_pos, DVec3::Y);
    assert_eq!(steps[0].delta_pos + steps[1].delta_pos, DVec3::new(1.0, 1.0, 0.0));
    assert_eq!((steps[0].max_pct, steps[1].max_pct), (0.5, 1.0));
    assert!(steps.iter().all(|s| s.max_angle == 0.0));

    // Halfway through, only the first leg has been travelled.
    assert_vec(mv.transform_at(0.5).transform_point3(DVec3::ZERO), DVec3::X);
    assert_vec(landing(&mv), DVec3::new(1.0, 1.0, 0.0));
}

#[test]
fn test_corner_slide_with_negative_axis_code() {
    let mv = slide(-4, [1, 0, 1]);
    assert_eq!(mv.steps()[0].delta_pos, DVec3::X);
    assert_eq!(mv.steps()[1].delta_pos, DVec3::Z);
}

#[test]
fn test_corner_slide_reversal_runs_legs_backwards() {
    let mv = slide(-1, [1, 1, 0]);
    let reversed = mv.reverse();

    assert_eq!(reversed.adc(), AnchorDirectionCode(-2));
    assert_eq!(reversed.steps()[0].delta_pos, DVec3::NEG_Y);
    assert_eq!(reversed.steps()[1].delta_pos, DVec3::NEG_X);
}

#[test]
fn test_generic_slide() {
    let mv = slide(0, [0, 0, 1]);
    assert_eq!(mv.kinematics(), Kinematics::GenericSlide);
    assert_eq!(mv.steps().len(), 1);
    assert_eq!(mv.steps()[0].max_angle, 0.0);
    assert_eq!(mv.reverse().adc(), AnchorDirectionCode(0));
    assert_vec(mv.transform_at(0.25).transform_point3(DVec3::ZERO), DVec3::new(0.0, 0.0, 0.25));
}

#[test]
fn test_unknown_code_degrades_to_slide() {
    let mv = pivot(ModuleShape::Cube, 7, [1, 0, 0]);
    assert_eq!(mv.steps().len(), 1);
    assert!(!mv.steps()[0].rotates());
    assert_vec(landing(&mv), DVec3::X);
    assert_identity(mv.committed_rotation());
}

#[test]
fn test_catom_square_roll() {
    let mv = pivot(ModuleShape::Catom, 12, [1, 0, 1]);
    assert_eq!(mv.kinematics(), Kinematics::CatomSquareRoll);
    assert_eq!(mv.bump_axis(), Some(DVec3::Y));

    let steps = mv.steps();
    assert_eq!(steps.len(), 2);
    assert_eq!((steps[0].max_pct, steps[1].max_pct), (0.5, 1.0));
    assert!(steps.iter().all(|s| (s.max_angle - FRAC_PI_2).abs() < EPS));
    assert_vec(steps[0].rot_axis, DVec3::Z);
    // Step two's axis is stored in the frame left by step one.
    assert_vec(steps[1].rot_axis, DVec3::Y);

    assert_eq!(mv.reverse().adc(), AnchorDirectionCode(26));
}

#[test]
fn test_straight_catom_roll_reuses_first_axis() {
    let mv = pivot(ModuleShape::Catom, 12, [2, 0, 0]);
    let steps = mv.steps();
    assert_eq!(steps[0].rot_axis, steps[1].rot_axis);
    assert_eq!(mv.reverse().adc(), AnchorDirectionCode(42));
}

#[test]
fn test_catom_triangle_roll() {
    let mv = pivot(ModuleShape::Catom, 1012, [1, 0, 1]);
    assert_eq!(mv.kinematics(), Kinematics::CatomTriangleRoll);
    assert_eq!(mv.steps().len(), 2);
    assert!(
        mv.steps()
            .iter()
            .all(|s| (s.max_angle - TRIANGLE_ROLL_ANGLE).abs() < EPS)
    );
    assert!((TRIANGLE_ROLL_ANGLE - (1.0f64 / 3.0).acos()).abs() < 1e-12);
    assert_identity(mv.committed_rotation());

    let reversed = mv.reverse();
    assert_eq!(reversed.adc(), AnchorDirectionCode(1026));
    assert_eq!(reversed.reverse().adc(), AnchorDirectionCode(1012));
}

#[test]
fn test_step_progress_boundaries_increase_to_one() {
    for mv in sample_moves() {
        let pcts: Vec<f64> = mv.steps().iter().map(|s| s.max_pct).collect();
        assert!(!pcts.is_empty());
        assert!(pcts.windows(2).all(|w| w[0] < w[1]), "{pcts:?}");
        assert_eq!(pcts.last().copied(), Some(1.0));
    }
}

#[test]
fn test_double_reversal_is_geometrically_equivalent() {
    for mv in sample_moves() {
        let back = mv.reverse().reverse();
        assert_eq!(back.delta_pos(), mv.delta_pos());
        assert_eq!(back.kinematics(), mv.kinematics());
        assert_eq!(back.steps().len(), mv.steps().len());
        for (a, b) in mv.steps().iter().zip(back.steps()) {
            assert_vec(b.delta_pos, a.delta_pos);
            assert_vec(b.rot_axis, a.rot_axis);
            assert_vec(b.post_trans, a.post_trans);
            assert!((b.max_angle - a.max_angle).abs() < EPS);
            assert_eq!(b.max_pct, a.max_pct);
        }
    }
}

#[test]
fn test_reversal_undoes_committed_transform() {
    for mv in sample_moves() {
        let reversed = mv.reverse();
        assert_eq!(reversed.delta_pos(), -mv.delta_pos());
        assert_identity(reversed.committed_rotation() * mv.committed_rotation());
    }
}

#[test]
fn test_reverse_never_mutates_original() {
    let mv = pivot(ModuleShape::Catom, 12, [1, 0, 1]);
    let snapshot = mv.clone();
    let _ = mv.reverse();
    assert_eq!(mv, snapshot);
}

#[test]
fn test_scenario_kind_convention() {
    assert_eq!(MoveKind::from_adc(AnchorDirectionCode(3)), MoveKind::Pivot);
    assert_eq!(MoveKind::from_adc(AnchorDirectionCode(0)), MoveKind::Sliding);
    assert_eq!(MoveKind::from_adc(AnchorDirectionCode(-12)), MoveKind::Sliding);
}

#[test]
fn test_monkey_moves_are_reserved_translations() {
    let mv = Move::new(1, 2, IVec3::X, MoveKind::Monkey, ModuleShape::Cube);
    assert_eq!(mv.kinematics(), Kinematics::Reserved);
    assert_vec(landing(&mv), DVec3::X);
    assert_eq!(mv.reverse().adc(), AnchorDirectionCode(2));
}
