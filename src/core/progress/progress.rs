use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

pub type UpdateCallback = Arc<dyn Fn() + Send + Sync>;

#[derive(Debug, Default, Clone)]
struct ProgressState {
    sample: u32,
    tile: u32,
    start_time: Option<Instant>,
    total_time: f64,
    sample_time: f64,
    status: String,
    substatus: String,
    cancel: bool,
    cancel_message: String,
    error: bool,
    error_message: String,
}

/// Progress of one render session.
///
/// Written by the controller and device workers, read from any thread. Every
/// getter copies a snapshot under a short lock and never waits on rendering.
/// The update callback is always invoked with no lock held, so it may call
/// the getters freely.
pub struct Progress {
    state: Mutex<ProgressState>,
    callback: Mutex<Option<UpdateCallback>>,
}

impl Progress {
    pub fn new() -> Self {
        Progress {
            state: Mutex::new(ProgressState::default()),
            callback: Mutex::new(None),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ProgressState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Clears samples, timing, status, cancel and error state.
    /// The update callback is kept.
    pub fn reset(&self) {
        let mut state = self.lock();
        *state = ProgressState::default();
    }

    /* callback */

    /// Installs the update callback, replacing any previous one.
    pub fn set_update_callback<F>(&self, f: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        let mut callback = self.callback.lock().unwrap_or_else(PoisonError::into_inner);
        *callback = Some(Arc::new(f));
    }

    pub fn clear_update_callback(&self) {
        let mut callback = self.callback.lock().unwrap_or_else(PoisonError::into_inner);
        *callback = None;
    }

    /// Notifies the update callback, if any.
    pub fn set_update(&self) {
        let callback = {
            let callback = self.callback.lock().unwrap_or_else(PoisonError::into_inner);
            callback.clone()
        };
        if let Some(callback) = callback {
            callback();
        }
    }

    /* samples, tiles and timing */

    pub fn set_start_time(&self) {
        let mut state = self.lock();
        state.start_time = Some(Instant::now());
    }

    fn update_timing(state: &mut ProgressState) {
        if let Some(start) = state.start_time {
            let elapsed = start.elapsed().as_secs_f64();
            state.total_time = f64::max(state.total_time, elapsed);
        }
        if state.sample > 0 {
            state.sample_time = state.total_time / state.sample as f64;
        }
    }

    /// Raises the completed sample count. Lower values are ignored.
    pub fn set_sample(&self, sample: u32) {
        let mut state = self.lock();
        state.sample = u32::max(state.sample, sample);
        Self::update_timing(&mut state);
    }

    pub fn add_finished_tile(&self) {
        let mut state = self.lock();
        state.tile += 1;
        Self::update_timing(&mut state);
    }

    pub fn get_sample(&self) -> u32 {
        return self.lock().sample;
    }

    /// `(finished tiles, total elapsed seconds, average seconds per sample)`.
    pub fn get_tile(&self) -> (u32, f64, f64) {
        let state = self.lock();
        return (state.tile, state.total_time, state.sample_time);
    }

    /* status */

    pub fn set_status(&self, status: &str, substatus: &str) {
        let mut state = self.lock();
        state.status = status.to_string();
        state.substatus = substatus.to_string();
    }

    pub fn set_substatus(&self, substatus: &str) {
        let mut state = self.lock();
        state.substatus = substatus.to_string();
    }

    pub fn get_status(&self) -> (String, String) {
        let state = self.lock();
        return (state.status.clone(), state.substatus.clone());
    }

    /* cancel */

    /// Requests cancellation. Only the first reason is kept.
    pub fn set_cancel(&self, reason: &str) {
        let mut state = self.lock();
        if !state.cancel {
            state.cancel = true;
            state.cancel_message = reason.to_string();
        }
    }

    pub fn get_cancel(&self) -> bool {
        return self.lock().cancel;
    }

    pub fn get_cancel_message(&self) -> String {
        return self.lock().cancel_message.clone();
    }

    /* error */

    /// Records a fatal session error and requests cancellation with the same
    /// message. Only the first error is kept.
    pub fn set_error(&self, msg: &str) {
        let mut state = self.lock();
        if !state.error {
            state.error = true;
            state.error_message = msg.to_string();
        }
        if !state.cancel {
            state.cancel = true;
            state.cancel_message = msg.to_string();
        }
    }

    pub fn get_error(&self) -> bool {
        return self.lock().error;
    }

    pub fn get_error_message(&self) -> String {
        return self.lock().error_message.clone();
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::new()
    }
}
