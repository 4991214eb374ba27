use crate::history::{HiddenSet, History};
use crate::mesh::CellMesh;
use crate::params::Composition;
use tracing::{debug, warn};

/// A seed whose visibility flips, reported to whatever animates the cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VisibilityChange {
    pub seed: usize,
    /// `true` when the cell should animate out, `false` when it comes back.
    pub hidden: bool,
}

/// Owns the meshes of the current seed generation together with their visibility.
///
/// Meshes live in a vector indexed by seed; absent entries are seeds without a cell.
/// The hidden set and its undo history survive rebuilds as long as the seed
/// composition stays the same.
#[derive(Clone, Debug, Default)]
pub struct CellRegistry {
    cells: Vec<Option<CellMesh>>,
    hidden: HiddenSet,
    history: History,
    composition: Option<Composition>,
}

impl CellRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces all meshes with those of a new rebuild.
    ///
    /// If `composition` differs from the previous one, seed indices now name different
    /// cells and visibility is reset. Returns whether the hidden set was kept.
    pub fn install(&mut self, cells: Vec<Option<CellMesh>>, composition: Composition) -> bool {
        self.cells = cells;
        let kept = self.composition == Some(composition);
        if !kept {
            self.reset();
            self.composition = Some(composition);
        }
        debug!(cells = self.cells.len(), hidden = self.hidden.len(), kept, "cells installed");
        kept
    }

    pub fn cells(&self) -> &[Option<CellMesh>] {
        &self.cells
    }

    pub fn get_cell(&self, seed: usize) -> Option<&CellMesh> {
        self.cells.get(seed).and_then(Option::as_ref)
    }

    pub fn seed_count(&self) -> usize {
        self.cells.len()
    }

    pub fn hidden(&self) -> &HiddenSet {
        &self.hidden
    }

    pub fn is_hidden(&self, seed: usize) -> bool {
        self.hidden.contains(&seed)
    }

    /// Scale the animation layer should tween a cell towards.
    pub fn target_scale(&self, seed: usize) -> f64 {
        if self.is_hidden(seed) { 0.0 } else { 1.0 }
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// The cells whose visibility differs between the current hidden set and `target`,
    /// in ascending seed order.
    pub fn transition(&self, target: &HiddenSet) -> Vec<VisibilityChange> {
        self.hidden
            .symmetric_difference(target)
            .map(|&seed| VisibilityChange {
                seed,
                hidden: target.contains(&seed),
            })
            .collect()
    }

    fn apply(&mut self, target: HiddenSet) -> Vec<VisibilityChange> {
        let changes = self.transition(&target);
        self.hidden = target;
        changes
    }

    /// Hides one cell and records the new state.
    pub fn hide(&mut self, seed: usize) -> Vec<VisibilityChange> {
        if seed >= self.cells.len() {
            warn!(seed, seeds = self.cells.len(), "ignoring hide of unknown seed");
            return Vec::new();
        }
        if self.hidden.contains(&seed) {
            return Vec::new();
        }
        let mut target = self.hidden.clone();
        target.insert(seed);
        let changes = self.apply(target.clone());
        self.history.push(target);
        changes
    }

    /// Shows every hidden cell and records the new state.
    pub fn unhide_all(&mut self) -> Vec<VisibilityChange> {
        if self.hidden.is_empty() {
            return Vec::new();
        }
        let changes = self.apply(HiddenSet::new());
        self.history.push(HiddenSet::new());
        changes
    }

    pub fn undo(&mut self) -> Vec<VisibilityChange> {
        match self.history.undo().cloned() {
            Some(state) => self.apply(state),
            None => Vec::new(),
        }
    }

    pub fn redo(&mut self) -> Vec<VisibilityChange> {
        match self.history.redo().cloned() {
            Some(state) => self.apply(state),
            None => Vec::new(),
        }
    }

    /// Shows everything and forgets the history.
    pub fn reset(&mut self) {
        self.hidden.clear();
        self.history.reset();
    }
}
