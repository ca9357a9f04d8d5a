use super::session_params::SessionParams;
use super::state::SessionState;
use super::tile_manager::TileManager;
use super::work_queue::WorkQueue;
use crate::core::buffers::*;
use crate::core::device::*;
use crate::core::display::*;
use crate::core::error::*;
use crate::core::imageio::write_image;
use crate::core::progress::Progress;
use crate::core::scene::*;

use log::*;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError, RwLock};
use std::thread::{self, JoinHandle, ThreadId};
use std::time::Duration;

const POLL_INTERVAL: Duration = Duration::from_millis(20);
const CHANNEL_NAMES: [&str; 3] = ["R", "G", "B"];

fn lock<T: ?Sized>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

struct Control {
    state: SessionState,
    buffer_params: BufferParams,
    samples: u32,
    queue: Option<Arc<WorkQueue>>,
    /// The controller thread has not finished yet.
    running: bool,
    /// The current run is being stopped by `reset` or drop.
    stop_requested: bool,
    controller: Option<JoinHandle<()>>,
    controller_id: Option<ThreadId>,
}

/// State shared between the session handle and its controller thread.
struct Shared {
    progress: Arc<Progress>,
    buffers: Mutex<RenderBuffers>,
    control: Mutex<Control>,
    finished: Condvar,
    display: Mutex<Option<Arc<RwLock<dyn Display>>>>,
    tone_mapper: Mutex<Option<Arc<dyn ToneMapper>>>,
}

impl Shared {
    fn resolve(&self) -> Image {
        let tone_mapper = lock(&self.tone_mapper).clone();
        let buffers = lock(&self.buffers);
        return buffers.resolve(tone_mapper.as_deref());
    }

    /// Resolves only when the buffer still has the shape `params`.
    fn resolve_if(&self, params: &BufferParams) -> Option<Image> {
        let tone_mapper = lock(&self.tone_mapper).clone();
        let buffers = lock(&self.buffers);
        if buffers.params() != params {
            return None;
        }
        return Some(buffers.resolve(tone_mapper.as_deref()));
    }

    fn display(&self) -> Option<Arc<RwLock<dyn Display>>> {
        return lock(&self.display).clone();
    }

    fn stop_requested(&self) -> bool {
        return lock(&self.control).stop_requested;
    }
}

enum WorkerEvent {
    TileDone {
        device: usize,
        tile: RenderTile,
    },
    DeviceFailed {
        device: usize,
        tile: RenderTile,
        error: RenderError,
    },
}

/// A progressive render session.
///
/// All methods take `&self`; the session can be shared with the threads that
/// drive it. Rendering happens on a controller thread started by `start`,
/// which runs one worker per device until the target sample count is
/// reached, the run is cancelled, or `reset` stops it.
pub struct Session {
    params: SessionParams,
    devices: Vec<Arc<dyn Device>>,
    scene: RwLock<Option<Arc<Scene>>>,
    shared: Arc<Shared>,
    /// Serializes `reset`, `start` and drop.
    lifecycle: Mutex<()>,
}

impl Session {
    /// Creates the devices named by `params.device` and an idle session.
    pub fn new(params: &SessionParams) -> Result<Self, RenderError> {
        let devices = create_devices(&params.device, params.threads)?;
        return Ok(Self::with_devices(params, devices));
    }

    pub fn with_devices(params: &SessionParams, devices: Vec<Arc<dyn Device>>) -> Self {
        let shared = Shared {
            progress: Arc::new(Progress::new()),
            buffers: Mutex::new(RenderBuffers::new()),
            control: Mutex::new(Control {
                state: SessionState::Uninitialized,
                buffer_params: BufferParams::default(),
                samples: params.samples,
                queue: None,
                running: false,
                stop_requested: false,
                controller: None,
                controller_id: None,
            }),
            finished: Condvar::new(),
            display: Mutex::new(None),
            tone_mapper: Mutex::new(None),
        };
        let names: Vec<&str> = devices.iter().map(|d| d.info().description.as_str()).collect();
        info!("Session created on {} device(s): {}", devices.len(), names.join(", "));
        Session {
            params: params.clone(),
            devices,
            scene: RwLock::new(None),
            shared: Arc::new(shared),
            lifecycle: Mutex::new(()),
        }
    }

    pub fn params(&self) -> &SessionParams {
        return &self.params;
    }

    pub fn devices(&self) -> &[Arc<dyn Device>] {
        return &self.devices;
    }

    pub fn progress(&self) -> Arc<Progress> {
        return self.shared.progress.clone();
    }

    pub fn state(&self) -> SessionState {
        return lock(&self.shared.control).state;
    }

    /// Buffer shape of the last `reset`.
    pub fn buffer_params(&self) -> BufferParams {
        return lock(&self.shared.control).buffer_params;
    }

    /// Target samples of the last `reset`.
    pub fn samples(&self) -> u32 {
        return lock(&self.shared.control).samples;
    }

    /* scene */

    pub fn scene(&self) -> Option<Arc<Scene>> {
        let scene = self.scene.read().unwrap_or_else(PoisonError::into_inner);
        return scene.clone();
    }

    /// Attaches the scene to render. It cannot change while a run is active.
    pub fn set_scene(&self, scene: Arc<Scene>) -> Result<(), RenderError> {
        if self.state().is_active() {
            return Err(RenderError::state("cannot replace the scene while rendering"));
        }
        let mut current = self.scene.write().unwrap_or_else(PoisonError::into_inner);
        *current = Some(scene);
        return Ok(());
    }

    pub fn release_scene(&self) -> Result<Option<Arc<Scene>>, RenderError> {
        if self.state().is_active() {
            return Err(RenderError::state("cannot release the scene while rendering"));
        }
        let mut current = self.scene.write().unwrap_or_else(PoisonError::into_inner);
        return Ok(current.take());
    }

    /* output */

    pub fn set_display(&self, display: Option<Arc<RwLock<dyn Display>>>) {
        *lock(&self.shared.display) = display;
    }

    pub fn set_tone_mapper(&self, tone_mapper: Option<Arc<dyn ToneMapper>>) {
        *lock(&self.shared.tone_mapper) = tone_mapper;
    }

    /// Resolves the current buffer contents.
    pub fn image(&self) -> Image {
        return self.shared.resolve();
    }

    /// Resolves the buffer and hands it to the display. Returns `false` when
    /// nothing was drawn: no display, no run started yet, or `buffer_params`
    /// does not match the buffer being rendered.
    pub fn draw(&self, buffer_params: &BufferParams) -> bool {
        if matches!(
            self.state(),
            SessionState::Uninitialized | SessionState::Configured
        ) {
            return false;
        }
        let display = match self.shared.display() {
            Some(display) => display,
            None => return false,
        };
        let image = match self.shared.resolve_if(buffer_params) {
            Some(image) => image,
            None => return false,
        };
        let tile = DisplayTile::from_image(&image);
        let mut display = display.write().unwrap_or_else(PoisonError::into_inner);
        match display.update(&tile) {
            Ok(()) => {
                return true;
            }
            Err(e) => {
                warn!("Display update failed: {}", e);
                return false;
            }
        }
    }

    /* lifecycle */

    fn on_controller_thread(&self) -> bool {
        let id = thread::current().id();
        return lock(&self.shared.control).controller_id == Some(id);
    }

    /// Stops the current run, if any, and joins the controller thread
    /// without touching the session state.
    fn stop_run(&self) {
        let (queue, handle) = {
            let mut control = lock(&self.shared.control);
            if control.controller.is_none() {
                return;
            }
            control.stop_requested = true;
            (control.queue.clone(), control.controller.take())
        };
        if let Some(queue) = queue {
            queue.stop();
        }
        if let Some(handle) = handle {
            if handle.join().is_err() {
                error!("Session controller thread panicked.");
            }
        }
        let mut control = lock(&self.shared.control);
        control.stop_requested = false;
        control.queue = None;
        control.controller_id = None;
        control.running = false;
        self.shared.finished.notify_all();
    }

    /// Prepares a new render of `buffer_params` with `samples` target samples
    /// (0 renders until cancelled). A running render is stopped first. On
    /// success the session is `Configured`; if the buffers cannot be
    /// allocated it is `Cancelled` and the reason is in the progress.
    pub fn reset(&self, buffer_params: &BufferParams, samples: u32) {
        if self.on_controller_thread() {
            warn!("Session::reset called from the session thread; ignored.");
            return;
        }
        let _lifecycle = lock(&self.lifecycle);
        self.stop_run();

        let progress = &self.shared.progress;
        progress.reset();
        let allocated = {
            let mut buffers = lock(&self.shared.buffers);
            let r = buffers.allocate(buffer_params);
            if r.is_err() {
                *buffers = RenderBuffers::new();
            }
            r
        };

        let mut control = lock(&self.shared.control);
        control.buffer_params = *buffer_params;
        control.samples = samples;
        match allocated {
            Ok(()) => {
                control.state = SessionState::Configured;
                drop(control);
                info!(
                    "Session reset: {}x{} pixels, {} samples",
                    buffer_params.width, buffer_params.height, samples
                );
                progress.set_status("Waiting for render to start", "");
            }
            Err(e) => {
                control.state = SessionState::Cancelled;
                drop(control);
                let reason = e.to_string();
                error!("Session reset failed: {}", reason);
                progress.set_cancel(&reason);
                progress.set_status("Cancelled", &reason);
            }
        }
        progress.set_update();
    }

    /// Reallocates for a new full-frame size. 0x0 falls back to the size the
    /// scene camera declares. The crop window of the session parameters is
    /// applied to the new frame.
    pub fn resize(&self, width: u32, height: u32) -> Result<(), RenderError> {
        let (width, height) = if width == 0 || height == 0 {
            let scene = self.scene().ok_or_else(|| {
                RenderError::config("cannot resize to the camera size without a scene")
            })?;
            (scene.camera.width, scene.camera.height)
        } else {
            (width, height)
        };
        let buffer_params = match self.params.crop_window.as_ref() {
            Some(crop_window) => BufferParams::from_crop_window(width, height, crop_window)?,
            None => BufferParams::new(width, height),
        };
        let samples = self.samples();
        self.reset(&buffer_params, samples);
        return Ok(());
    }

    /// Starts rendering in the background and returns immediately.
    pub fn start(&self) -> Result<(), RenderError> {
        if self.on_controller_thread() {
            return Err(RenderError::state("start called from the session thread"));
        }
        let _lifecycle = lock(&self.lifecycle);

        let scene = self
            .scene()
            .ok_or_else(|| RenderError::config("No scene attached to the session"))?;
        if self.devices.is_empty() {
            return Err(RenderError::config("No devices to render with"));
        }
        if scene.params.shading_system == ShadingSystem::Osl {
            if let Some(d) = self.devices.iter().find(|d| !d.info().advanced_shading) {
                let msg = format!(
                    "OSL shading system only works with CPU device, {} cannot run it",
                    d.info().description
                );
                return Err(RenderError::Config(msg));
            }
        }

        let mut control = lock(&self.shared.control);
        if control.state != SessionState::Configured {
            let msg = format!("cannot start a session that is {}", control.state);
            return Err(RenderError::State(msg));
        }

        let tiles = TileManager::new(
            &control.buffer_params,
            self.params.tile_size,
            control.samples,
            self.params.progressive,
            self.params.samples_per_pass,
        );
        debug!(
            "Scheduling {} tiles, {} samples per unit",
            tiles.num_tiles(),
            tiles.pass_size()
        );
        let queue = Arc::new(WorkQueue::new(tiles));
        let run = Run {
            shared: self.shared.clone(),
            devices: self.devices.clone(),
            scene,
            queue: queue.clone(),
            buffer_params: control.buffer_params,
            target: control.samples,
            background: self.params.background,
            output_path: self.params.output_path.clone(),
        };

        let progress = &self.shared.progress;
        progress.set_start_time();
        progress.set_status("Rendering", "");

        let handle = thread::Builder::new()
            .name(String::from("session"))
            .spawn(move || run.execute())?;
        control.controller_id = Some(handle.thread().id());
        control.controller = Some(handle);
        control.queue = Some(queue);
        control.state = SessionState::Running;
        control.running = true;
        return Ok(());
    }

    /// Blocks until the current run has finished and every device worker
    /// has exited. Returns at once when nothing is running.
    pub fn wait(&self) {
        if self.on_controller_thread() {
            warn!("Session::wait called from the session thread; ignored.");
            return;
        }
        let mut control = lock(&self.shared.control);
        while control.running {
            control = self
                .shared
                .finished
                .wait(control)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    pub fn set_pause(&self, pause: bool) {
        let mut control = lock(&self.shared.control);
        let next = match (control.state, pause) {
            (SessionState::Running, true) => SessionState::Paused,
            (SessionState::Paused, false) => SessionState::Running,
            _ => return,
        };
        if let Some(queue) = control.queue.as_ref() {
            queue.set_paused(pause);
        }
        control.state = next;
        drop(control);

        let progress = &self.shared.progress;
        if pause {
            info!("Render paused");
            progress.set_status("Paused", "");
        } else {
            info!("Render resumed");
            progress.set_status("Rendering", "");
        }
        progress.set_update();
    }

    /// Requests cancellation. Workers stop between tiles; everything
    /// already rendered stays in the buffer.
    pub fn cancel(&self, reason: &str) {
        let progress = &self.shared.progress;
        progress.set_cancel(reason);
        let mut control = lock(&self.shared.control);
        if let Some(queue) = control.queue.as_ref() {
            queue.stop();
        }
        if !control.running && !control.state.is_terminal() {
            control.state = SessionState::Cancelled;
            drop(control);
            progress.set_status("Cancelled", &progress.get_cancel_message());
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        let _lifecycle = lock(&self.lifecycle);
        self.shared.progress.set_cancel("Session destroyed");
        self.stop_run();
        debug!("Session destroyed");
    }
}

/// Everything one run needs, owned by the controller thread.
struct Run {
    shared: Arc<Shared>,
    devices: Vec<Arc<dyn Device>>,
    scene: Arc<Scene>,
    queue: Arc<WorkQueue>,
    buffer_params: BufferParams,
    target: u32,
    background: bool,
    output_path: Option<PathBuf>,
}

/// Marks the run finished even if the controller unwinds.
struct RunGuard<'a> {
    shared: &'a Shared,
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        let mut control = lock(&self.shared.control);
        control.running = false;
        self.shared.finished.notify_all();
    }
}

impl Run {
    fn execute(self) {
        let _guard = RunGuard {
            shared: &self.shared,
        };
        if self.target == 0 {
            info!(
                "Render started: {}x{}, until cancelled, {} device(s)",
                self.buffer_params.width,
                self.buffer_params.height,
                self.devices.len()
            );
        } else {
            info!(
                "Render started: {}x{}, {} samples, {} device(s)",
                self.buffer_params.width,
                self.buffer_params.height,
                self.target,
                self.devices.len()
            );
        }
        self.display_start();
        self.dispatch();
        self.finish();
    }

    fn dispatch(&self) {
        let progress = &self.shared.progress;
        let (tx, rx) = mpsc::channel::<WorkerEvent>();
        let mut alive = 0;
        thread::scope(|s| {
            for (index, device) in self.devices.iter().enumerate() {
                let tx = tx.clone();
                let spawned = thread::Builder::new()
                    .name(format!("session-worker-{}", index))
                    .spawn_scoped(s, move || self.worker(index, device.as_ref(), tx));
                match spawned {
                    Ok(_) => {
                        alive += 1;
                    }
                    Err(e) => {
                        warn!(
                            "Failed to start worker for {}: {}",
                            device.info().description,
                            e
                        );
                    }
                }
            }
            drop(tx);
            if alive == 0 {
                progress.set_error("No device could be started");
                self.queue.stop();
            }

            loop {
                match rx.recv_timeout(POLL_INTERVAL) {
                    Ok(WorkerEvent::TileDone { device, tile }) => {
                        let sample = self.queue.complete(&tile);
                        progress.add_finished_tile();
                        progress.set_sample(sample);
                        debug!(
                            "Tile {} samples {}..{} done on device {}",
                            tile.index,
                            tile.sample,
                            tile.sample + tile.num_samples,
                            device
                        );
                        progress.set_update();
                    }
                    Ok(WorkerEvent::DeviceFailed {
                        device,
                        tile,
                        error,
                    }) => {
                        alive -= 1;
                        self.queue.requeue(&tile);
                        let description = &self.devices[device].info().description;
                        warn!("Device {} failed: {}", description, error);
                        if alive == 0 {
                            let msg = format!(
                                "All devices failed, last error from {}: {}",
                                description, error
                            );
                            progress.set_error(&msg);
                            self.queue.stop();
                        } else {
                            let msg = format!(
                                "{} failed ({}), continuing on {} device(s)",
                                description, error, alive
                            );
                            progress.set_substatus(&msg);
                        }
                        progress.set_update();
                    }
                    Err(RecvTimeoutError::Timeout) => {}
                    Err(RecvTimeoutError::Disconnected) => {
                        break;
                    }
                }
                if progress.get_cancel() || self.shared.stop_requested() {
                    self.queue.stop();
                }
            }
        });
    }

    fn worker(&self, index: usize, device: &dyn Device, tx: Sender<WorkerEvent>) {
        let progress = &self.shared.progress;
        loop {
            if progress.get_cancel() {
                break;
            }
            let tile = match self.queue.take() {
                Some(tile) => tile,
                None => break,
            };
            let merged = device.render_tile(&self.scene, &tile).and_then(|result| {
                let mut buffers = lock(&self.shared.buffers);
                buffers.accumulate(&result)
            });
            let (event, failed) = match merged {
                Ok(()) => (WorkerEvent::TileDone { device: index, tile }, false),
                Err(error) => (
                    WorkerEvent::DeviceFailed {
                        device: index,
                        tile,
                        error,
                    },
                    true,
                ),
            };
            if tx.send(event).is_err() || failed {
                break;
            }
        }
        debug!("Worker for {} exiting", device.info().description);
    }

    fn finish(&self) {
        let progress = &self.shared.progress;
        let stopped = self.shared.stop_requested();
        let completed = !stopped && !progress.get_cancel() && self.queue.is_finished();
        if stopped {
            info!("Render stopped after {} samples", progress.get_sample());
        } else if completed {
            let (_, substatus) = progress.get_status();
            progress.set_status("Finished", &substatus);
            if self.background {
                if let Some(path) = self.output_path.as_ref() {
                    self.write_output(path);
                }
            }
            let (_, total_time, _) = progress.get_tile();
            info!(
                "Render finished: {} samples in {:.2}s",
                progress.get_sample(),
                total_time
            );
        } else {
            let mut reason = progress.get_cancel_message();
            if reason.is_empty() {
                reason = String::from("Cancelled");
            }
            info!("Render cancelled: {}", reason);
            progress.set_status("Cancelled", &reason);
        }
        self.display_end();

        {
            let mut control = lock(&self.shared.control);
            if !control.stop_requested {
                control.state = if completed {
                    SessionState::Completed
                } else {
                    SessionState::Cancelled
                };
            }
            control.queue = None;
        }
        progress.set_update();
    }

    fn write_output(&self, path: &Path) {
        let image = self.shared.resolve();
        match write_image(path, &image) {
            Ok(()) => {
                info!("Wrote {:?}", path);
            }
            Err(e) => {
                error!("Failed to write {:?}: {}", path, e);
                let msg = format!("Failed to write {}: {}", path.display(), e);
                self.shared.progress.set_substatus(&msg);
            }
        }
    }

    fn display_start(&self) {
        if let Some(display) = self.shared.display() {
            let resolution = [
                self.buffer_params.full_width as usize,
                self.buffer_params.full_height as usize,
            ];
            let title = format!("radiance {}x{}", resolution[0], resolution[1]);
            let mut display = display.write().unwrap_or_else(PoisonError::into_inner);
            if let Err(e) = display.start(&title, &resolution, &CHANNEL_NAMES) {
                warn!("Display start failed: {}", e);
            }
        }
    }

    fn display_end(&self) {
        if let Some(display) = self.shared.display() {
            let mut display = display.write().unwrap_or_else(PoisonError::into_inner);
            if let Err(e) = display.end() {
                warn!("Display end failed: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::prelude::*;

    struct ConstantDevice {
        info: DeviceInfo,
    }

    impl Device for ConstantDevice {
        fn info(&self) -> &DeviceInfo {
            &self.info
        }

        fn render_tile(&self, _scene: &Scene, tile: &RenderTile) -> Result<TileResult, RenderError> {
            let mut result = TileResult::new(tile);
            let l = Spectrum::new(1.0, 1.0, 1.0) * tile.num_samples as Float;
            for r in result.radiance.iter_mut() {
                *r = l;
            }
            Ok(result)
        }
    }

    fn scene() -> Arc<Scene> {
        let camera = Camera::new(
            8,
            4,
            &Point3f::zero(),
            &Point3f::new(0.0, 0.0, -1.0),
            &Vector3f::new(0.0, 1.0, 0.0),
            45.0,
        );
        let scene = Scene::new(
            &camera,
            &[],
            &[],
            &[],
            &IntegratorSettings::default(),
            &SceneParams::default(),
        )
        .unwrap();
        Arc::new(scene)
    }

    fn session() -> Session {
        let params = SessionParams {
            tile_size: 4,
            ..SessionParams::default()
        };
        let device: Arc<dyn Device> = Arc::new(ConstantDevice {
            info: DeviceInfo::cpu(1),
        });
        Session::with_devices(&params, vec![device])
    }

    #[test]
    fn test_001() {
        let session = session();
        assert_eq!(session.state(), SessionState::Uninitialized);
        assert!(session.start().is_err());

        session.reset(&BufferParams::new(8, 4), 3);
        // no scene
        let err = session.start().err().unwrap();
        assert!(matches!(err, RenderError::Config(_)));

        session.set_scene(scene()).unwrap();
        session.start().unwrap();
        session.wait();
        assert_eq!(session.state(), SessionState::Completed);
        assert_eq!(session.progress().get_sample(), 3);
        assert_eq!(session.image().get_pixel(7, 3), [1.0, 1.0, 1.0]);

        // Completed is terminal until the next reset.
        assert!(matches!(session.start(), Err(RenderError::State(_))));
    }

    #[test]
    fn test_002() {
        let session = session();
        session.set_scene(scene()).unwrap();
        session.reset(&BufferParams::new(8, 4), 0);
        session.start().unwrap();
        while session.progress().get_sample() < 2 {
            thread::sleep(Duration::from_millis(1));
        }
        session.cancel("stop");
        session.cancel("ignored");
        session.wait();
        assert_eq!(session.state(), SessionState::Cancelled);
        assert_eq!(session.progress().get_cancel_message(), "stop");
        assert_eq!(session.progress().get_status().0, "Cancelled");
    }

    #[test]
    fn test_003() {
        let session = session();
        session.set_scene(scene()).unwrap();
        session.reset(&BufferParams::new(8, 4), 0);
        session.start().unwrap();
        assert!(session.set_scene(scene()).is_err());
        session.set_pause(true);
        assert_eq!(session.state(), SessionState::Paused);
        assert_eq!(session.progress().get_status().0, "Paused");
        session.set_pause(false);
        assert_eq!(session.state(), SessionState::Running);
        session.cancel("done");
        session.wait();
        assert!(session.release_scene().unwrap().is_some());
    }
}
