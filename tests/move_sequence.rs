// tests/move_sequence.rs
use glam::IVec3;
use lattice_moves::{ModuleHost, ModuleId, ModuleShape, Move, MoveKind, MoveSet, MoveSetSequence};

/// Host that only records which moves it was asked to commit.
#[derive(Default)]
struct RecordingHost {
    animated: usize,
    finished: Vec<(ModuleId, IVec3)>,
}

impl ModuleHost for RecordingHost {
    fn animate_move(&mut self, _mv: &Move, _progress: f64) {
        self.animated += 1;
    }

    fn finish_move(&mut self, mv: &Move) {
        self.finished.push((mv.id(), mv.delta_pos()));
    }
}

fn cube_pivot(id: ModuleId, adc: i32, delta: [i32; 3]) -> Move {
    Move::new(id, adc, IVec3::from_array(delta), MoveKind::Pivot, ModuleShape::Cube)
}

/// Four move sets, checkpoints at 0 and 2, five moves in total.
fn sample_sets() -> Vec<MoveSet> {
    vec![
        MoveSet::new(true, vec![cube_pivot(1, 2, [1, 0, 0])]),
        MoveSet::new(
            false,
            vec![cube_pivot(1, 2, [1, 0, 0]), cube_pivot(2, 5, [0, 0, 1])],
        ),
        MoveSet::new(true, vec![cube_pivot(3, 1, [0, 1, 0])]),
        MoveSet::new(false, vec![cube_pivot(2, 5, [0, 0, -1])]),
    ]
}

fn assert_consistent(seq: &MoveSetSequence) {
    assert_eq!(
        seq.remaining_move_sets() + seq.current_move_set(),
        seq.total_move_sets()
    );
}

#[test]
fn test_new_sequence_counters() {
    let seq = MoveSetSequence::new(sample_sets());
    assert_eq!(seq.total_move_sets(), 4);
    assert_eq!(seq.remaining_move_sets(), 4);
    assert_eq!(seq.current_move_set(), 0);
    assert_eq!(seq.total_checkpoints(), 2);
    assert_eq!(seq.current_checkpoint(), 0);
    assert_eq!(seq.progress_label(), "Move #0 / #2");
}

#[test]
fn test_pop_advances_and_counts_checkpoints() {
    let mut seq = MoveSetSequence::new(sample_sets());

    let first = seq.pop().expect("first set");
    assert!(first.checkpoint);
    assert_eq!(seq.current_checkpoint(), 1);
    assert_eq!(seq.progress_label(), "Move #1 / #2");

    let second = seq.pop().expect("second set");
    assert_eq!(second.len(), 2);
    assert_eq!(seq.current_checkpoint(), 1);
    assert_eq!(seq.current_move_set(), 2);
    assert_consistent(&seq);
}

#[test]
fn test_pop_and_undo_on_exhausted_queues_are_no_ops() {
    let mut seq = MoveSetSequence::new(sample_sets());
    assert!(seq.undo().is_none());
    assert_eq!(seq.current_move_set(), 0);

    while seq.pop().is_some() {}
    assert!(seq.pop().is_none());
    assert_eq!(seq.remaining_move_sets(), 0);
    assert_eq!(seq.current_move_set(), 4);
    assert_eq!(seq.progress_label(), "Move #2 / #2");

    let empty = &mut MoveSetSequence::default();
    assert!(empty.pop().is_none());
    assert!(empty.undo().is_none());
}

#[test]
fn test_undo_yields_reversed_set_and_requeues_original() {
    let mut seq = MoveSetSequence::new(sample_sets());
    seq.pop();
    let played = seq.pop().expect("second set");

    let undone = seq.undo().expect("undo");
    assert_eq!(undone.checkpoint, played.checkpoint);
    for (mv, un) in played.moves().iter().zip(undone.moves()) {
        assert_eq!(un.id(), mv.id());
        assert_eq!(un.delta_pos(), -mv.delta_pos());
    }

    // Replaying after an undo returns the set in its forward form.
    assert_eq!(seq.peek_next(), Some(&played));
    assert_eq!(seq.pop(), Some(played));
}

#[test]
fn test_counters_stay_consistent_through_mixed_traversal() {
    let sets = sample_sets();
    let checkpoints: Vec<bool> = sets.iter().map(|s| s.checkpoint).collect();
    let mut seq = MoveSetSequence::new(sets);

    // true = pop, false = undo
    let ops = [
        true, true, false, true, true, true, false, false, true, false, false, false, false,
        true, true, true, true, true,
    ];
    for op in ops {
        if op {
            seq.pop();
        } else {
            seq.undo();
        }
        assert_consistent(&seq);
        let played = seq.current_move_set();
        let expected = checkpoints[..played].iter().filter(|c| **c).count();
        assert_eq!(seq.current_checkpoint(), expected);
    }
}

#[test]
fn test_reset_commits_every_reversed_move_once() {
    let sets = sample_sets();
    let mut seq = MoveSetSequence::new(sets.clone());
    while seq.pop().is_some() {}

    let mut host = RecordingHost::default();
    seq.reset(&mut host);

    assert_eq!(seq.current_move_set(), 0);
    assert_eq!(seq.remaining_move_sets(), 4);
    assert_eq!(seq.current_checkpoint(), 0);
    assert_eq!(host.animated, 0);

    // Latest set is undone first.
    let expected: Vec<(ModuleId, IVec3)> = sets
        .iter()
        .rev()
        .flat_map(|set| set.moves().iter().map(|mv| (mv.id(), -mv.delta_pos())))
        .collect();
    assert_eq!(host.finished, expected);
    assert_eq!(host.finished.len(), 5);
}

#[test]
fn test_reset_partway_only_undoes_played_sets() {
    let mut seq = MoveSetSequence::new(sample_sets());
    seq.pop();
    seq.pop();

    let mut host = RecordingHost::default();
    seq.reset(&mut host);
    assert_eq!(host.finished.len(), 3);
    assert_eq!(seq.remaining_move_sets(), 4);
    assert_eq!(seq.progress_label(), "Move #0 / #2");
}

#[test]
fn test_invalidate_clears_everything() {
    let mut seq = MoveSetSequence::new(sample_sets());
    seq.invalidate();

    assert_eq!(seq.total_move_sets(), 0);
    assert_eq!(seq.remaining_move_sets(), 0);
    assert_eq!(seq.total_checkpoints(), 0);
    assert!(seq.pop().is_none());
    assert_eq!(seq.progress_label(), "Move #0 / #0");
}

#[test]
fn test_move_set_reverse_keeps_checkpoint() {
    let set = MoveSet::new(true, vec![cube_pivot(4, 3, [0, 1, 0])]);
    let reversed = set.reverse();
    assert!(reversed.checkpoint);
    assert_eq!(reversed.moves()[0].delta_pos(), IVec3::new(0, -1, 0));
}
