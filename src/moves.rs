//! Move kinematics.
//!
//! A [`Move`] relocates one module to a neighbouring lattice cell. It is described
//! compactly by an [`AnchorDirectionCode`] and an integer displacement; from those
//! the constructor rebuilds one or two animation [`Step`]s: rotation axis, pivot
//! translation, total angle and the progress fraction at which each step ends.
//!
//! Moves are immutable. [`Move::reverse`] builds a fresh move from a recomputed
//! code and the negated displacement instead of editing steps in place.

use crate::adc::AnchorDirectionCode;
use crate::lattice::{ModuleId, ModuleShape, l1, rotate_about, sgn};
use glam::{DAffine3, DQuat, DVec3, IVec3};
use serde::{Deserialize, Serialize};

/// Rotation of one step of a catom roll across a triangular face:
/// `2 * atan2(1 - sqrt(2)/2, sqrt(2) - 1)`, i.e. `acos(1/3)`.
pub const TRIANGLE_ROLL_ANGLE: f64 = 1.230_959_417_340_774_6;

/// The primitive motion a move performs, as written in a scenario.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveKind {
    /// Rotation about an edge shared with an anchor module.
    #[default]
    Pivot,
    /// Pure translation.
    Sliding,
    /// Reserved. No scenario path produces it and its kinematics are undefined.
    Monkey,
}

impl MoveKind {
    /// Scenario convention: positive codes pivot, everything else slides.
    pub fn from_adc(adc: AnchorDirectionCode) -> Self {
        if adc.0 > 0 { Self::Pivot } else { Self::Sliding }
    }
}

/// The kinematic strategy a move resolves to once its shape, kind, code and
/// displacement are known. Construction and reversal both dispatch on it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Kinematics {
    /// Code `0`: translate, no anchor.
    GenericSlide,
    /// Negative code with a multi-cell displacement: two axis-aligned slides.
    CornerSlide,
    /// Any other sliding move: a single translation.
    Slide,
    /// Cube rotating 90° (or 180° for double moves) about an edge.
    CubePivot,
    /// Rhombic dodecahedron rotating about an edge.
    DodecahedronPivot,
    /// Catom rolling twice across a square face.
    CatomSquareRoll,
    /// Catom rolling twice across a triangular face.
    CatomTriangleRoll,
    /// [`MoveKind::Monkey`]: animated as a translation until it is specified.
    Reserved,
}

impl Kinematics {
    pub fn classify(
        adc: AnchorDirectionCode,
        delta_pos: IVec3,
        kind: MoveKind,
        shape: ModuleShape,
    ) -> Self {
        if kind == MoveKind::Monkey {
            return Self::Reserved;
        }
        if adc.is_generic_slide() {
            return Self::GenericSlide;
        }
        if adc.is_corner() && l1(delta_pos) > 1 {
            return Self::CornerSlide;
        }
        match (kind, shape) {
            (MoveKind::Sliding, _) => Self::Slide,
            (MoveKind::Pivot, ModuleShape::Cube) => Self::CubePivot,
            (MoveKind::Pivot, ModuleShape::RhombicDodecahedron) => Self::DodecahedronPivot,
            (MoveKind::Pivot, ModuleShape::Catom) if adc.is_triangle() => Self::CatomTriangleRoll,
            (MoveKind::Pivot, ModuleShape::Catom) => Self::CatomSquareRoll,
            (MoveKind::Monkey, _) => Self::Reserved,
        }
    }

    pub fn is_slide(self) -> bool {
        matches!(
            self,
            Self::GenericSlide | Self::CornerSlide | Self::Slide | Self::Reserved
        )
    }
}

/// One animation segment of a move.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Step {
    /// Normal of the face this step pivots away from (zero for slides).
    pub anchor_dir: DVec3,
    /// This step's contribution to the displacement, in the frame the step is applied in.
    pub delta_pos: DVec3,
    /// Unit rotation axis (zero for slides).
    pub rot_axis: DVec3,
    /// Total rotation of the step in radians.
    pub max_angle: f64,
    /// Translation bringing the pivot edge to the origin.
    pub pre_trans: DVec3,
    /// Translation taking the origin back to the pivot edge.
    pub post_trans: DVec3,
    /// Cumulative move progress at which the step completes.
    pub max_pct: f64,
}

impl Step {
    fn slide(delta_pos: DVec3, max_pct: f64) -> Self {
        Self {
            anchor_dir: DVec3::ZERO,
            delta_pos,
            rot_axis: DVec3::ZERO,
            max_angle: 0.0,
            pre_trans: DVec3::ZERO,
            post_trans: DVec3::ZERO,
            max_pct,
        }
    }

    fn pivot(
        anchor_dir: DVec3,
        delta_pos: DVec3,
        rot_axis: DVec3,
        max_angle: f64,
        post_trans: DVec3,
        max_pct: f64,
    ) -> Self {
        Self {
            anchor_dir,
            delta_pos,
            rot_axis,
            max_angle,
            pre_trans: -post_trans,
            post_trans,
            max_pct,
        }
    }

    pub fn rotates(&self) -> bool {
        self.max_angle != 0.0 && self.rot_axis != DVec3::ZERO
    }

    /// Full rotation this step applies once complete.
    pub fn rotation(&self) -> DQuat {
        if self.rotates() {
            DQuat::from_axis_angle(self.rot_axis, self.max_angle)
        } else {
            DQuat::IDENTITY
        }
    }

    /// Transform of this step alone at `pct` of its own duration.
    ///
    /// Pivots translate the edge to the origin, rotate, and translate back;
    /// slides translate along `delta_pos`.
    pub fn transform(&self, pct: f64) -> DAffine3 {
        if self.rotates() {
            DAffine3::from_translation(self.post_trans)
                * DAffine3::from_axis_angle(self.rot_axis, self.max_angle * pct)
                * DAffine3::from_translation(self.pre_trans)
        } else {
            DAffine3::from_translation(self.delta_pos * pct)
        }
    }
}

/// A single module relocation.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Move {
    id: ModuleId,
    adc: AnchorDirectionCode,
    delta_pos: IVec3,
    kind: MoveKind,
    shape: ModuleShape,
    kinematics: Kinematics,
    steps: Vec<Step>,
    /// Normal of the intermediate face of a square catom roll.
    bump_axis: Option<DVec3>,
}

impl Move {
    /// Builds a move and derives its steps.
    ///
    /// Never fails: an unknown code degrades to a translation (with a logged warning)
    /// because the displacement alone is still well defined.
    pub fn new(
        id: ModuleId,
        adc: impl Into<AnchorDirectionCode>,
        delta_pos: IVec3,
        kind: MoveKind,
        shape: ModuleShape,
    ) -> Self {
        let adc = adc.into();
        let kinematics = Kinematics::classify(adc, delta_pos, kind, shape);
        let mut bump_axis = None;

        let steps = match kinematics {
            Kinematics::GenericSlide | Kinematics::Slide => {
                let mut step = Step::slide(delta_pos.as_dvec3(), 1.0);
                step.anchor_dir = adc.decode();
                vec![step]
            }
            Kinematics::Reserved => {
                log::warn!("module {id}: move kind {kind:?} has no kinematics, animating as a slide");
                vec![Step::slide(delta_pos.as_dvec3(), 1.0)]
            }
            Kinematics::CornerSlide => corner_slide_steps(adc, delta_pos),
            Kinematics::CubePivot | Kinematics::DodecahedronPivot => {
                vec![pivot_step(adc, delta_pos, shape)]
            }
            Kinematics::CatomSquareRoll => {
                let (steps, bump) = catom_square_steps(adc, delta_pos);
                bump_axis = Some(bump);
                steps
            }
            Kinematics::CatomTriangleRoll => {
                let (steps, bump) = catom_triangle_steps(adc, delta_pos);
                bump_axis = Some(bump);
                steps
            }
        };

        Self {
            id,
            adc,
            delta_pos,
            kind,
            shape,
            kinematics,
            steps,
            bump_axis,
        }
    }

    pub fn id(&self) -> ModuleId {
        self.id
    }

    pub fn adc(&self) -> AnchorDirectionCode {
        self.adc
    }

    pub fn delta_pos(&self) -> IVec3 {
        self.delta_pos
    }

    pub fn kind(&self) -> MoveKind {
        self.kind
    }

    pub fn shape(&self) -> ModuleShape {
        self.shape
    }

    pub fn kinematics(&self) -> Kinematics {
        self.kinematics
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn bump_axis(&self) -> Option<DVec3> {
        self.bump_axis
    }

    /// The move that undoes this one.
    ///
    /// The displacement is negated and the anchor code is re-expressed from the
    /// mover's new cell, then every step is derived again from scratch.
    pub fn reverse(&self) -> Self {
        let delta_pos = -self.delta_pos;
        let adc = match self.kinematics {
            Kinematics::GenericSlide
            | Kinematics::Slide
            | Kinematics::CubePivot
            | Kinematics::Reserved => self.adc,
            Kinematics::CornerSlide => {
                AnchorDirectionCode::encode(self.steps[1].delta_pos.abs()).corner()
            }
            Kinematics::DodecahedronPivot => {
                // Anchor as seen from the cell the mover ends in.
                AnchorDirectionCode::encode(
                    sgn(self.steps[0].anchor_dir) + delta_pos.as_dvec3(),
                )
            }
            Kinematics::CatomTriangleRoll => AnchorDirectionCode::encode(
                self.adc.anchor_offset() - self.delta_pos.as_dvec3(),
            )
            .triangle(),
            Kinematics::CatomSquareRoll => {
                let magnitude = self.shape.geometry().rotation_magnitude;
                let second_leg =
                    rotate_about(self.steps[1].delta_pos, self.steps[0].rot_axis, -magnitude);
                AnchorDirectionCode::encode(-second_leg + self.bump_axis.unwrap_or_default())
            }
        };
        Self::new(self.id, adc, delta_pos, self.kind, self.shape)
    }

    /// Interpolated transform of the module at `progress` ∈ [0, 1] of the move.
    ///
    /// Steps compose with the first step outermost, so later steps are expressed in
    /// the frame left behind by earlier ones. Easing is the caller's concern.
    pub fn transform_at(&self, progress: f64) -> DAffine3 {
        let progress = progress.clamp(0.0, 1.0);
        let mut transform = DAffine3::IDENTITY;
        let mut prev_pct = 0.0;
        for step in &self.steps {
            let step_pct = (progress.min(step.max_pct) - prev_pct) / (step.max_pct - prev_pct);
            transform = transform * step.transform(step_pct);
            if progress < step.max_pct {
                break;
            }
            prev_pct = step.max_pct;
        }
        transform
    }

    /// Orientation change a module keeps once the move is finished.
    ///
    /// Slides keep their orientation. Triangle rolls also commit no rotation: the
    /// catom is symmetric under them and its frame snaps back to the lattice.
    pub fn committed_rotation(&self) -> DQuat {
        if self.kinematics.is_slide() || self.kinematics == Kinematics::CatomTriangleRoll {
            return DQuat::IDENTITY;
        }
        self.steps
            .iter()
            .fold(DQuat::IDENTITY, |q, step| q * step.rotation())
            .normalize()
    }
}

fn with_length(v: DVec3, length: f64) -> DVec3 {
    v.normalize_or_zero() * length
}

fn pivot_step(adc: AnchorDirectionCode, delta_pos: IVec3, shape: ModuleShape) -> Step {
    let geometry = shape.geometry();
    let anchor_dir = adc.decode();
    let delta = delta_pos.as_dvec3();

    // The pivot edge is perpendicular to both the motion and the anchor face.
    let rot_axis = delta.cross(anchor_dir).normalize_or_zero();
    if rot_axis == DVec3::ZERO {
        let mut step = Step::slide(delta, 1.0);
        step.anchor_dir = anchor_dir;
        return step;
    }

    // Midpoint of the start and end cells, seen from the anchor, lies on the pivot
    // edge. Cube double moves (180°) have no such midpoint; their edge lies along
    // the displacement itself.
    let through_edge = if shape == ModuleShape::Cube && l1(delta_pos) > 1 {
        delta
    } else {
        sgn(anchor_dir) + delta
    };

    Step::pivot(
        anchor_dir,
        delta,
        rot_axis,
        l1(delta_pos) as f64 * geometry.rotation_magnitude,
        with_length(through_edge, geometry.midsphere),
        1.0,
    )
}

fn corner_slide_steps(adc: AnchorDirectionCode, delta_pos: IVec3) -> Vec<Step> {
    let delta = delta_pos.as_dvec3();
    let projected = delta * sgn(adc.decode()).abs();

    // A multi-axis code only names which leg comes first.
    let mut first = DVec3::ZERO;
    if let Some(axis) = (0..3).find(|&axis| projected[axis] != 0.0) {
        first[axis] = projected[axis];
    }

    vec![Step::slide(first, 0.5), Step::slide(delta - first, 1.0)]
}

/// Square-face catom roll: pivot from face A onto intermediate face B, then from B onto C.
///
/// Both pivot edges lie on face B, so its normal (the bump axis) fixes one component
/// of each edge location; the other is the step's own direction scaled to the face
/// distance. Step two is stored in the frame left by step one's rotation.
fn catom_square_steps(adc: AnchorDirectionCode, delta_pos: IVec3) -> (Vec<Step>, DVec3) {
    let geometry = ModuleShape::Catom.geometry();
    let magnitude = geometry.rotation_magnitude;
    let anchor_dir = adc.decode();
    let delta = delta_pos.as_dvec3();

    let dp1 = (delta * sgn(anchor_dir).abs()).normalize_or_zero();
    let dp2 = delta - dp1;
    let bump_axis = sgn(anchor_dir) - sgn(dp1);

    let ra1 = dp1.cross(anchor_dir).normalize_or_zero();
    let ra2 = -dp2.cross(bump_axis).normalize_or_zero();
    let straight = dp1.abs_diff_eq(dp2, 1e-9);

    let post1 = with_length(dp1, geometry.face_dist) + with_length(bump_axis, geometry.bump_dist);
    let post2 = if straight {
        rotate_about(
            with_length(dp2, geometry.bump_dist) + with_length(bump_axis, geometry.face_dist),
            -ra1,
            magnitude,
        )
    } else {
        rotate_about(
            with_length(dp2, geometry.bump_dist) - with_length(bump_axis, geometry.face_dist),
            ra1,
            magnitude,
        )
    };

    let step1 = Step::pivot(anchor_dir, dp1, ra1, magnitude, post1, 0.5);
    let step2 = Step::pivot(
        bump_axis.normalize_or_zero(),
        rotate_about(dp2, ra1, magnitude),
        if straight { ra1 } else { rotate_about(ra2, ra1, magnitude) },
        magnitude,
        post2,
        1.0,
    );
    (vec![step1, step2], bump_axis)
}

/// Triangle-face catom roll. The leg along the anchor comes second here.
fn catom_triangle_steps(adc: AnchorDirectionCode, delta_pos: IVec3) -> (Vec<Step>, DVec3) {
    let geometry = ModuleShape::Catom.geometry();
    let anchor_dir = adc.decode();
    let delta = delta_pos.as_dvec3();

    let dp2 = (delta * sgn(anchor_dir).abs()).normalize_or_zero();
    let dp1 = delta - dp2;
    let bump_axis = sgn(anchor_dir) - sgn(dp2);

    let ra1 = dp1.cross(anchor_dir).normalize_or_zero();
    let ra2 = delta.cross(bump_axis).normalize_or_zero();

    let post1 = with_length(dp1, geometry.bump_dist)
        + with_length(dp2, 0.5)
        + with_length(bump_axis, 0.5);
    let post2 = sgn(delta) * 0.5 + with_length(bump_axis, geometry.bump_dist);

    let step1 = Step::pivot(anchor_dir, dp1, ra1, TRIANGLE_ROLL_ANGLE, post1, 0.5);
    let step2 = Step::pivot(
        bump_axis.normalize_or_zero(),
        dp2,
        ra2,
        TRIANGLE_ROLL_ANGLE,
        post2,
        1.0,
    );
    (vec![step1, step2], bump_axis)
}
