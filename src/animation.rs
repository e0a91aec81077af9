//! Frame-driven playback of a [`MoveSetSequence`].
//!
//! [`AnimationController`] owns all playback state: the active move set, its
//! progress, and whether another set has been requested. The host loop calls
//! [`AnimationController::tick`] once per frame with the elapsed time.

use crate::module::ModuleHost;
use crate::move_set::{MoveSet, MoveSetSequence};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Maps linear move progress in [0, 1] onto eased progress in [0, 1].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Easing {
    Linear,
    QuadraticInOut,
    CubicInOut,
    #[default]
    SinusoidalInOut,
}

impl Easing {
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::QuadraticInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Self::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Self::SinusoidalInOut => -((PI * t).cos() - 1.0) / 2.0,
        }
    }
}

/// Playback direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

/// Configuration for move playback.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AnimationConfig {
    /// Move sets per second.
    pub speed: f64,
    /// Keep playing through checkpoints without waiting for a new request.
    pub auto_animate: bool,
    pub easing: Easing,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            speed: 1.0,
            auto_animate: false,
            easing: Easing::default(),
        }
    }
}

/// Per-frame playback state machine.
#[derive(Clone, Debug, Default)]
pub struct AnimationController {
    pub config: AnimationConfig,
    direction: Direction,
    active: Option<MoveSet>,
    progress: f64,
    next_requested: bool,
}

impl AnimationController {
    pub fn new(config: AnimationConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Linear progress of the active set, 0 when idle.
    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn active(&self) -> Option<&MoveSet> {
        self.active.as_ref()
    }

    /// True when no move set is in flight and a new one may start.
    pub fn is_ready(&self) -> bool {
        self.active.is_none()
    }

    pub fn is_next_requested(&self) -> bool {
        self.next_requested
    }

    /// Asks for another move set in `direction` once the current one finishes.
    ///
    /// Changing direction takes effect for the next set fetched; a set already in
    /// flight completes in its own direction.
    pub fn request(&mut self, direction: Direction) {
        self.direction = direction;
        self.next_requested = true;
    }

    /// Abandons the active move set without committing it.
    pub fn cancel(&mut self) {
        self.active = None;
        self.progress = 0.0;
        self.next_requested = false;
    }

    /// Advances playback by `dt` seconds.
    ///
    /// Once the active set has run past full progress every move in it is committed
    /// on `host`. Playback then chains into the next set when auto-animating, or
    /// when the set crossed is not a checkpoint: going forward the upcoming set is
    /// checked, going backward the set just undone. A newly fetched set starts at
    /// progress 0, and every move of the active set is animated with the same
    /// eased progress.
    pub fn tick(&mut self, dt: f64, sequence: &mut MoveSetSequence, host: &mut impl ModuleHost) {
        if self.progress > 1.0
            && let Some(finished) = self.active.take()
        {
            host.finish_move_set(&finished);

            self.next_requested = if self.config.auto_animate {
                true
            } else {
                let boundary = match self.direction {
                    Direction::Forward => sequence.peek_next(),
                    Direction::Backward => Some(&finished),
                };
                boundary.is_some_and(|set| !set.checkpoint)
            };
            self.progress = 0.0;
        }

        if self.is_ready() && self.next_requested {
            self.active = match self.direction {
                Direction::Forward => sequence.pop(),
                Direction::Backward => sequence.undo(),
            };
            if self.active.is_none() {
                log::trace!("no move set left {:?}", self.direction);
                self.next_requested = false;
            }
        }

        if let Some(set) = &self.active {
            let eased = self.config.easing.apply(self.progress);
            for mv in set.moves() {
                host.animate_move(mv, eased);
            }
            log::trace!("animated {} moves at {:.3}", set.len(), self.progress);
            self.progress += dt * self.config.speed;
        }
    }
}
