//! # lattice-moves
//!
//! Engine-agnostic kinematics for lattice modular robots built from cubes,
//! rhombic dodecahedra and catoms (rhombicuboctahedra).
//!
//! A move is stored as an integer Anchor Direction Code plus a lattice
//! displacement, the same compact form scenario files and the reconfiguration
//! pathfinder speak. This crate rebuilds the rotation axes, pivot points and
//! timing needed to animate each move, reverses moves exactly so playback can
//! run backwards, and sequences groups of simultaneous moves with checkpoints.
//! Rendering stays outside: modules expose an affine transform that any engine
//! can consume.

pub mod adc;
pub mod animation;
pub mod error;
pub mod lattice;
pub mod module;
pub mod move_set;
pub mod moves;
pub mod pathfinder;
pub mod scenario;

pub use adc::*;
pub use animation::*;
pub use error::*;
pub use lattice::*;
pub use module::*;
pub use move_set::*;
pub use moves::*;
pub use pathfinder::*;
pub use scenario::*;
