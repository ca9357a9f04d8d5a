use super::tile_manager::TileManager;
use crate::core::buffers::*;

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

struct QueueState {
    tiles: TileManager,
    paused: bool,
    stopped: bool,
}

/// Work units shared by the device workers of one run.
pub struct WorkQueue {
    state: Mutex<QueueState>,
    cond: Condvar,
}

impl WorkQueue {
    pub fn new(tiles: TileManager) -> Self {
        WorkQueue {
            state: Mutex::new(QueueState {
                tiles,
                paused: false,
                stopped: false,
            }),
            cond: Condvar::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Blocks until a unit is available. Returns `None` once the queue is
    /// stopped or every tile reached the target.
    pub fn take(&self) -> Option<RenderTile> {
        let mut state = self.lock();
        loop {
            if state.stopped || state.tiles.is_finished() {
                return None;
            }
            if !state.paused {
                if let Some(unit) = state.tiles.next_unit() {
                    return Some(unit);
                }
            }
            state = self.cond.wait(state).unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Records a merged unit and returns the samples every pixel now has.
    pub fn complete(&self, unit: &RenderTile) -> u32 {
        let mut state = self.lock();
        state.tiles.complete(unit);
        let samples = state.tiles.completed_samples();
        self.cond.notify_all();
        return samples;
    }

    pub fn requeue(&self, unit: &RenderTile) {
        let mut state = self.lock();
        state.tiles.requeue(unit);
        self.cond.notify_all();
    }

    pub fn set_paused(&self, paused: bool) {
        let mut state = self.lock();
        state.paused = paused;
        self.cond.notify_all();
    }

    /// Wakes every waiting worker and hands out nothing more.
    pub fn stop(&self) {
        let mut state = self.lock();
        state.stopped = true;
        self.cond.notify_all();
    }

    pub fn is_finished(&self) -> bool {
        return self.lock().tiles.is_finished();
    }

    pub fn completed_samples(&self) -> u32 {
        return self.lock().tiles.completed_samples();
    }
}
