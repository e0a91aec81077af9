use crate::lattice::{LatticeBounds, ModuleId, ModuleShape};
use crate::move_set::MoveSet;
use crate::moves::Move;
use glam::{DAffine3, DQuat, IVec3};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Receiver of per-frame move animation.
///
/// The playback machinery drives modules only through this trait, so a renderer
/// can implement it directly on its own scene graph.
pub trait ModuleHost {
    /// Applies the interpolated transform of `mv` at `progress` without committing
    /// the module's lattice position.
    fn animate_move(&mut self, mv: &Move, progress: f64);

    /// Commits the move's final lattice position and orientation and clears any
    /// transient transform.
    fn finish_move(&mut self, mv: &Move);

    /// Commits every move of a set that ran to completion.
    fn finish_move_set(&mut self, set: &MoveSet) {
        for mv in set.moves() {
            self.finish_move(mv);
        }
    }
}

/// Narrow read access to "what occupies this cell".
pub trait ModuleLookup {
    fn module_at(&self, cell: IVec3) -> Option<ModuleId>;
}

/// A module's engine-agnostic state: where it sits on the lattice, how it is
/// oriented, and the transient transform of any move in flight.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LatticeModule {
    pub id: ModuleId,
    pub shape: ModuleShape,

    /// Committed lattice cell.
    pub position: IVec3,

    /// Committed orientation, accumulated over every finished move.
    pub orientation: DQuat,

    /// RGB colour from the module's visual group.
    pub color: [u8; 3],

    /// Render scale (1.0 fills the cell).
    pub scale: f64,

    /// Static modules are fixed in place for the pathfinder.
    pub is_static: bool,

    /// Local transform relative to `position`, including `orientation`.
    pub transient: DAffine3,
}

impl LatticeModule {
    pub fn new(id: ModuleId, shape: ModuleShape, position: IVec3) -> Self {
        Self {
            id,
            shape,
            position,
            orientation: DQuat::IDENTITY,
            color: [128, 128, 128],
            scale: 1.0,
            is_static: false,
            transient: DAffine3::IDENTITY,
        }
    }

    pub fn with_appearance(mut self, color: [u8; 3], scale: f64) -> Self {
        self.color = color;
        self.scale = scale;
        self
    }

    pub fn animate_move(&mut self, mv: &Move, progress: f64) {
        self.transient = mv.transform_at(progress) * DAffine3::from_quat(self.orientation);
    }

    pub fn finish_move(&mut self, mv: &Move) {
        self.orientation = (mv.committed_rotation() * self.orientation).normalize();
        self.position += mv.delta_pos();
        self.transient = DAffine3::from_quat(self.orientation);
    }

    /// World transform: the lattice position followed by the transient transform.
    pub fn world_transform(&self) -> DAffine3 {
        DAffine3::from_translation(self.position.as_dvec3())
            * self.transient
            * DAffine3::from_scale(glam::DVec3::splat(self.scale))
    }
}

/// Position-indexed store of every module in the scene.
///
/// Cell occupancy is only re-indexed by [`finish_move_set`](Self::finish_move_set),
/// [`insert`](Self::insert) and [`remove`](Self::remove), which callers run between
/// move sets, never while one is animating.
#[derive(Clone, Debug, Default)]
pub struct ModuleRegistry {
    modules: HashMap<ModuleId, LatticeModule>,
    cells: HashMap<IVec3, ModuleId>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a module, replacing any module with the same id or in the same cell.
    pub fn insert(&mut self, module: LatticeModule) {
        if let Some(old) = self.remove(module.id) {
            log::debug!("replacing module {} at {}", old.id, old.position);
        }
        if let Some(occupant) = self.cells.get(&module.position).copied() {
            log::warn!(
                "cell {} already holds module {occupant}, evicting it for module {}",
                module.position,
                module.id
            );
            self.remove(occupant);
        }
        self.cells.insert(module.position, module.id);
        self.modules.insert(module.id, module);
    }

    pub fn remove(&mut self, id: ModuleId) -> Option<LatticeModule> {
        let module = self.modules.remove(&id)?;
        if self.cells.get(&module.position) == Some(&id) {
            self.cells.remove(&module.position);
        }
        Some(module)
    }

    pub fn clear(&mut self) {
        self.modules.clear();
        self.cells.clear();
    }

    pub fn get(&self, id: ModuleId) -> Option<&LatticeModule> {
        self.modules.get(&id)
    }

    pub fn get_mut(&mut self, id: ModuleId) -> Option<&mut LatticeModule> {
        self.modules.get_mut(&id)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn modules(&self) -> impl Iterator<Item = &LatticeModule> {
        self.modules.values()
    }

    /// One past the largest id in use.
    pub fn next_id(&self) -> ModuleId {
        self.modules.keys().max().map_or(0, |id| id + 1)
    }

    pub fn bounds(&self) -> Option<LatticeBounds> {
        LatticeBounds::from_cells(self.cells.keys().copied())
    }
}

impl ModuleHost for ModuleRegistry {
    /// Commits every move of `set` at once.
    ///
    /// Movers leave the cell index before any of them lands, so two modules
    /// exchanging cells inside one set stay consistently indexed.
    fn finish_move_set(&mut self, set: &MoveSet) {
        for mv in set.moves() {
            if let Some(module) = self.modules.get(&mv.id())
                && self.cells.get(&module.position) == Some(&module.id)
            {
                self.cells.remove(&module.position);
            }
        }
        for mv in set.moves() {
            self.finish_move(mv);
        }
    }

    fn animate_move(&mut self, mv: &Move, progress: f64) {
        match self.modules.get_mut(&mv.id()) {
            Some(module) => module.animate_move(mv, progress),
            None => log::warn!("animate: no module with id {}", mv.id()),
        }
    }

    fn finish_move(&mut self, mv: &Move) {
        let Some(module) = self.modules.get_mut(&mv.id()) else {
            log::warn!("finish: no module with id {}", mv.id());
            return;
        };
        if self.cells.get(&module.position) == Some(&module.id) {
            self.cells.remove(&module.position);
        }
        module.finish_move(mv);
        if let Some(occupant) = self.cells.insert(module.position, module.id)
            && occupant != module.id
        {
            log::warn!(
                "module {} landed on cell {} still indexed to module {occupant}",
                module.id,
                module.position
            );
        }
    }
}

impl ModuleLookup for ModuleRegistry {
    fn module_at(&self, cell: IVec3) -> Option<ModuleId> {
        self.cells.get(&cell).copied()
    }
}
