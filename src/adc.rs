//! Anchor Direction Codes.
//!
//! An ADC is a small signed integer naming the face or edge a move pivots around.
//! Each non-zero axis of the anchor direction contributes one decimal digit, in
//! axis order: `1`/`2`/`3` for `+x`/`+y`/`+z` and `4`/`5`/`6` for `-x`/`-y`/`-z`.
//! Two flags ride on top of the digits:
//!
//! * an offset of [`TRIANGLE_OFFSET`] marks a catom roll across a triangular face;
//! * a negative sign marks a corner slide.
//!
//! `0` is a generic slide with no anchor.

use crate::lattice::{SIGN_EPSILON, sgn};
use glam::DVec3;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Offset added to the digits of a catom triangle-face roll.
pub const TRIANGLE_OFFSET: i32 = 1000;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnchorDirectionCode(pub i32);

impl AnchorDirectionCode {
    pub const GENERIC_SLIDE: Self = Self(0);

    /// Builds the code for `dir` from the axes whose magnitude exceeds the sign epsilon.
    ///
    /// The result never carries the triangle offset or the corner sign; callers add those.
    pub fn encode(dir: DVec3) -> Self {
        let code = dir
            .to_array()
            .iter()
            .enumerate()
            .filter(|(_, c)| c.abs() > SIGN_EPSILON)
            .fold(0, |code, (axis, c)| {
                code * 10 + axis as i32 + 1 + if *c < 0.0 { 3 } else { 0 }
            });
        Self(code)
    }

    /// Unit anchor direction named by this code.
    ///
    /// The triangle offset and the corner sign are ignored. Unknown digit patterns
    /// are logged and decode to the zero vector, which downstream code treats as a
    /// non-rotating slide.
    pub fn decode(self) -> DVec3 {
        let dir = match self.digits() {
            0 => DVec3::ZERO,

            // Cube faces
            1 => DVec3::X,
            2 => DVec3::Y,
            3 => DVec3::Z,
            4 => DVec3::NEG_X,
            5 => DVec3::NEG_Y,
            6 => DVec3::NEG_Z,

            // Face diagonals in the xy plane
            12 => DVec3::new(1.0, 1.0, 0.0),
            15 => DVec3::new(1.0, -1.0, 0.0),
            42 => DVec3::new(-1.0, 1.0, 0.0),
            45 => DVec3::new(-1.0, -1.0, 0.0),

            // xz plane
            13 => DVec3::new(1.0, 0.0, 1.0),
            16 => DVec3::new(1.0, 0.0, -1.0),
            43 => DVec3::new(-1.0, 0.0, 1.0),
            46 => DVec3::new(-1.0, 0.0, -1.0),

            // yz plane
            23 => DVec3::new(0.0, 1.0, 1.0),
            26 => DVec3::new(0.0, 1.0, -1.0),
            53 => DVec3::new(0.0, -1.0, 1.0),
            56 => DVec3::new(0.0, -1.0, -1.0),

            _ => {
                log::warn!("unknown anchor direction code {self}, treating move as a slide");
                DVec3::ZERO
            }
        };
        dir.normalize_or_zero()
    }

    /// Sign vector of the decoded direction: the anchor's lattice offset from the mover.
    pub fn anchor_offset(self) -> DVec3 {
        sgn(self.decode())
    }

    /// The digit part of the code, with sign and triangle offset stripped.
    pub fn digits(self) -> i32 {
        (self.0 % TRIANGLE_OFFSET).abs()
    }

    pub fn is_generic_slide(self) -> bool {
        self.0 == 0
    }

    pub fn is_corner(self) -> bool {
        self.0 < 0
    }

    pub fn is_triangle(self) -> bool {
        self.0 >= TRIANGLE_OFFSET
    }

    /// Adds the triangle-face offset.
    pub fn triangle(self) -> Self {
        Self(self.0 + TRIANGLE_OFFSET)
    }

    /// Flips the code to its corner-slide form.
    pub fn corner(self) -> Self {
        Self(-self.0)
    }
}

impl From<i32> for AnchorDirectionCode {
    fn from(code: i32) -> Self {
        Self(code)
    }
}

impl fmt::Display for AnchorDirectionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
