//! Lattice vocabulary shared by every other module: module identifiers,
//! shapes and their geometry, and the handful of vector helpers the
//! kinematics need on top of `glam`.

use glam::{DVec3, IVec3};
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_1_SQRT_2, FRAC_PI_2, FRAC_PI_3, SQRT_2};
use std::fmt;
use std::str::FromStr;

/// A unique identifier for a lattice module.
/// Matches the first column of scenario module and move lines.
pub type ModuleId = u32;

/// Components smaller than this are treated as zero by [`sgn`] and by ADC encoding.
pub const SIGN_EPSILON: f64 = 1e-6;

/// Component-wise sign of `v`.
///
/// Components with magnitude below [`SIGN_EPSILON`] (and NaN components) map to `0.0`.
pub fn sgn(v: DVec3) -> DVec3 {
    let s = |c: f64| {
        if c.is_nan() || c.abs() < SIGN_EPSILON {
            0.0
        } else {
            c.signum()
        }
    };
    DVec3::new(s(v.x), s(v.y), s(v.z))
}

/// Sum of the absolute components (the L1 length) of a lattice displacement.
pub fn l1(v: IVec3) -> i32 {
    v.abs().element_sum()
}

/// Rotates `v` by `angle` radians about the unit vector `axis`.
pub fn rotate_about(v: DVec3, axis: DVec3, angle: f64) -> DVec3 {
    glam::DQuat::from_axis_angle(axis, angle) * v
}

/// The three supported module polyhedra.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ModuleShape {
    /// Axis-aligned unit cube.
    #[default]
    Cube,
    /// Rhombic dodecahedron on the face-centred cubic lattice.
    RhombicDodecahedron,
    /// Rhombicuboctahedron ("catom") on the face-centred cubic lattice.
    Catom,
}

/// Fixed geometric measurements of a [`ModuleShape`], in lattice units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShapeGeometry {
    /// Radius of the midsphere (distance from centre to an edge midpoint).
    pub midsphere: f64,
    /// Distance from centre to a square face centroid.
    pub face_dist: f64,
    /// Distance from a square face centroid to the centre of one of its edges.
    pub bump_dist: f64,
    /// Rotation performed by a single pivot step, in radians.
    pub rotation_magnitude: f64,
}

impl ModuleShape {
    pub fn geometry(self) -> ShapeGeometry {
        match self {
            Self::Cube => ShapeGeometry {
                midsphere: FRAC_1_SQRT_2,
                face_dist: 0.5,
                bump_dist: 0.5,
                rotation_magnitude: FRAC_PI_2,
            },
            Self::RhombicDodecahedron => ShapeGeometry {
                // sqrt(6) / 3
                midsphere: 0.816_496_580_927_726,
                face_dist: FRAC_1_SQRT_2,
                bump_dist: 0.0,
                rotation_magnitude: FRAC_PI_3,
            },
            Self::Catom => ShapeGeometry {
                midsphere: (2.0 - SQRT_2).sqrt(),
                face_dist: FRAC_1_SQRT_2,
                bump_dist: 1.0 - FRAC_1_SQRT_2,
                rotation_magnitude: FRAC_PI_2,
            },
        }
    }

    /// The token used for this shape in scenario headers and pathfinder documents.
    pub fn token(self) -> &'static str {
        match self {
            Self::Cube => "CUBE",
            Self::RhombicDodecahedron => "RHOMBIC_DODECAHEDRON",
            Self::Catom => "CATOM",
        }
    }
}

impl fmt::Display for ModuleShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for ModuleShape {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "CUBE" => Ok(Self::Cube),
            "RHOMBIC_DODECAHEDRON" => Ok(Self::RhombicDodecahedron),
            "CATOM" => Ok(Self::Catom),
            other => Err(other.to_string()),
        }
    }
}

/// Axis-aligned bounding box over occupied lattice cells.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatticeBounds {
    pub min: IVec3,
    pub max: IVec3,
}

impl LatticeBounds {
    /// Computes the bounds of `cells`, or `None` when the iterator is empty.
    pub fn from_cells(cells: impl IntoIterator<Item = IVec3>) -> Option<Self> {
        let mut cells = cells.into_iter();
        let first = cells.next()?;
        Some(cells.fold(
            Self {
                min: first,
                max: first,
            },
            |b, c| Self {
                min: b.min.min(c),
                max: b.max.max(c),
            },
        ))
    }

    pub fn extent(&self) -> IVec3 {
        self.max - self.min
    }

    /// Centre of the box in continuous space.
    pub fn centroid(&self) -> DVec3 {
        (self.min.as_dvec3() + self.max.as_dvec3()) / 2.0
    }

    /// Largest extent along any axis.
    pub fn radius(&self) -> i32 {
        self.extent().max_element()
    }

    /// True when every cell shares one z coordinate.
    pub fn is_flat(&self) -> bool {
        self.min.z == self.max.z
    }
}
