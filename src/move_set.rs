//! Move sets and the playback queue that steps through them.

use crate::module::ModuleHost;
use crate::moves::Move;
use serde::Serialize;
use std::collections::VecDeque;

/// Moves that execute simultaneously as one atomic timestep.
///
/// Every move is expected to act on a different module and they all share one
/// progress value while animating.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct MoveSet {
    /// Playback should pause at this set rather than run through it.
    pub checkpoint: bool,
    moves: Vec<Move>,
}

impl MoveSet {
    pub fn new(checkpoint: bool, moves: Vec<Move>) -> Self {
        Self { checkpoint, moves }
    }

    pub fn push(&mut self, mv: Move) {
        self.moves.push(mv);
    }

    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// A set undoing this one: every move reversed, same checkpoint flag.
    pub fn reverse(&self) -> Self {
        Self {
            checkpoint: self.checkpoint,
            moves: self.moves.iter().map(Move::reverse).collect(),
        }
    }
}

/// Ordered, bidirectional queue of move sets.
///
/// At any time the undo stack (oldest first) followed by the pending queue is the
/// full original sequence, and `current_checkpoint` counts checkpoints on the stack.
#[derive(Clone, Debug, Default)]
pub struct MoveSetSequence {
    pending: VecDeque<MoveSet>,
    undo_stack: Vec<MoveSet>,
    total_move_sets: usize,
    remaining_move_sets: usize,
    current_move_set: usize,
    total_checkpoints: usize,
    current_checkpoint: usize,
    progress_label: String,
}

impl MoveSetSequence {
    pub fn new(move_sets: Vec<MoveSet>) -> Self {
        let total = move_sets.len();
        let mut sequence = Self {
            total_checkpoints: move_sets.iter().filter(|set| set.checkpoint).count(),
            pending: move_sets.into(),
            undo_stack: Vec::new(),
            total_move_sets: total,
            remaining_move_sets: total,
            current_move_set: 0,
            current_checkpoint: 0,
            progress_label: String::new(),
        };
        sequence.update_progress_label();
        sequence
    }

    fn update_progress_label(&mut self) {
        self.progress_label = format!(
            "Move #{} / #{}",
            self.current_checkpoint, self.total_checkpoints
        );
        log::debug!(
            "{} ({} of {} move sets played)",
            self.progress_label,
            self.current_move_set,
            self.total_move_sets
        );
    }

    /// Takes the next move set for forward playback and records it for undo.
    pub fn pop(&mut self) -> Option<MoveSet> {
        let set = self.pending.pop_front()?;

        self.remaining_move_sets -= 1;
        self.current_move_set += 1;
        if set.checkpoint {
            self.current_checkpoint += 1;
        }

        self.undo_stack.push(set.clone());
        self.update_progress_label();
        Some(set)
    }

    /// Returns the most recently played move set to the queue and yields its
    /// reversal for backward playback.
    pub fn undo(&mut self) -> Option<MoveSet> {
        let set = self.undo_stack.pop()?;
        if set.checkpoint {
            self.current_checkpoint -= 1;
        }

        self.remaining_move_sets += 1;
        self.current_move_set -= 1;

        let reversed = set.reverse();
        self.pending.push_front(set);
        self.update_progress_label();
        Some(reversed)
    }

    /// Collapses the sequence to its initial state, committing every undone move
    /// on `host` immediately instead of animating it.
    pub fn reset(&mut self, host: &mut impl ModuleHost) {
        while let Some(reversed) = self.undo() {
            host.finish_move_set(&reversed);
        }
        self.update_progress_label();
    }

    /// Drops every move set.
    ///
    /// Only meaningful while the sequence is at its initial state; invalidating
    /// mid-playback leaves modules wherever playback had taken them.
    pub fn invalidate(&mut self) {
        self.pending.clear();
        self.undo_stack.clear();
        self.total_move_sets = 0;
        self.remaining_move_sets = 0;
        self.current_move_set = 0;
        self.total_checkpoints = 0;
        self.current_checkpoint = 0;
        self.update_progress_label();
    }

    /// The set the next [`pop`](Self::pop) would return.
    pub fn peek_next(&self) -> Option<&MoveSet> {
        self.pending.front()
    }

    /// The set the next [`undo`](Self::undo) would reverse.
    pub fn last_played(&self) -> Option<&MoveSet> {
        self.undo_stack.last()
    }

    pub fn total_move_sets(&self) -> usize {
        self.total_move_sets
    }

    pub fn remaining_move_sets(&self) -> usize {
        self.remaining_move_sets
    }

    pub fn current_move_set(&self) -> usize {
        self.current_move_set
    }

    pub fn total_checkpoints(&self) -> usize {
        self.total_checkpoints
    }

    pub fn current_checkpoint(&self) -> usize {
        self.current_checkpoint
    }

    /// `"Move #<current checkpoint> / #<total checkpoints>"`.
    pub fn progress_label(&self) -> &str {
        &self.progress_label
    }
}
