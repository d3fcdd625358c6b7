//! Decouples the caller's per-frame render loop from trace passes that take several
//! frames to finish.
//!
//! Each call to [`FrameController::render_frame`] either launches a pass on a background
//! thread, or polls the running one without blocking. A finished pass is copied to the
//! caller's [`Surface`]. At most one pass is in flight at a time.

use crate::camera::Camera;
use crate::film::AccumulationBuffer;
use crate::integrator::WhittedIntegrator;
use crate::renderer::{PartitionedRenderer, PassReport};
use crate::sampler::DitherSampler;
use crate::scene::Scene;
use crate::settings::RenderSettings;
use crate::surface::Surface;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{sync_channel, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, info_span};

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Clone, Debug, PartialEq)]
pub enum FrameStatus {
    /// No pass was running, so one was started.
    Launched,

    /// The running pass has not finished yet.
    Pending,

    /// The running pass finished and its result was presented.
    Presented(PassReport),
}

/// Everything a background pass touches.
struct TraceContext<C> {
    scene: Scene,
    camera: Mutex<C>,
    target: Mutex<TraceTarget>,
    cancel: AtomicBool,
}

/// Locked by a pass for its whole duration.
struct TraceTarget {
    buffer: AccumulationBuffer,
    renderer: PartitionedRenderer,
    sampler: Box<dyn DitherSampler>,
}

enum ControllerState {
    Idle,
    Running {
        handle: JoinHandle<()>,
        done: Receiver<anyhow::Result<PassReport>>,
        settings: RenderSettings,
    },
}

pub struct FrameController<C: Camera> {
    ctx: Arc<TraceContext<C>>,
    state: ControllerState,
    poll_interval: Duration,
    last_report: Option<PassReport>,
}

impl<C: Camera> FrameController<C> {
    pub fn new(
        scene: Scene,
        mut camera: C,
        sampler: Box<dyn DitherSampler>,
        width: usize,
        height: usize,
    ) -> Self {
        camera.set_film_size(width, height);
        let target = TraceTarget {
            buffer: AccumulationBuffer::new(width, height),
            renderer: PartitionedRenderer::new(),
            sampler,
        };

        Self {
            ctx: Arc::new(TraceContext {
                scene,
                camera: Mutex::new(camera),
                target: Mutex::new(target),
                cancel: AtomicBool::new(false),
            }),
            state: ControllerState::Idle,
            poll_interval: DEFAULT_POLL_INTERVAL,
            last_report: None,
        }
    }

    /// How long `render_frame` sleeps when the running pass is not done yet.
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Call once per caller frame. Never waits for a pass to finish, except when a new
    /// field of view invalidates the running one: that pass is cancelled and joined, the
    /// buffer cleared, and a pass with the new settings launched.
    pub fn render_frame(&mut self, settings: RenderSettings, surface: &mut dyn Surface) -> anyhow::Result<FrameStatus> {
        let settings = settings.clamped();

        if let ControllerState::Running { settings: running, .. } = &self.state {
            if running.field_of_view != settings.field_of_view {
                debug!(from = running.field_of_view, to = settings.field_of_view, "field of view changed, restarting trace");
                self.teardown();
                self.launch(settings)?;
                return Ok(FrameStatus::Launched);
            }
        }

        match std::mem::replace(&mut self.state, ControllerState::Idle) {
            ControllerState::Idle => {
                self.launch(settings)?;
                Ok(FrameStatus::Launched)
            }

            ControllerState::Running { handle, done, settings: launched } => match done.try_recv() {
                Ok(result) => {
                    join_trace_thread(handle);
                    let report = result?;
                    self.present(surface);
                    self.last_report = Some(report.clone());
                    Ok(FrameStatus::Presented(report))
                }

                Err(TryRecvError::Empty) => {
                    self.state = ControllerState::Running { handle, done, settings: launched };
                    thread::sleep(self.poll_interval);
                    Ok(FrameStatus::Pending)
                }

                Err(TryRecvError::Disconnected) => {
                    join_trace_thread(handle);
                    Err(anyhow::anyhow!("trace thread exited without reporting a result"))
                }
            },
        }
    }

    /// Cancel and wait out any running pass, then clear the accumulated image.
    pub fn teardown(&mut self) {
        self.stop();
        self.ctx.target.lock().buffer.reset();
        self.last_report = None;
    }

    /// Match a new viewport size. Any running pass is cancelled first.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.stop();
        self.ctx.target.lock().buffer.resize(width, height);
        self.ctx.camera.lock().set_film_size(width, height);
        self.last_report = None;
        debug!(width, height, "resized accumulation buffer");
    }

    /// Access the live camera, e.g. to feed it input. Changes are picked up by the next
    /// pass; a running pass keeps the view it started with.
    pub fn with_camera<R>(&self, f: impl FnOnce(&mut C) -> R) -> R {
        f(&mut *self.ctx.camera.lock())
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, ControllerState::Running { .. })
    }

    /// Passes accumulated in the most recently presented frame.
    pub fn samples(&self) -> u32 {
        self.last_report.as_ref().map_or(0, |r| r.samples)
    }

    /// Duration of the most recently presented pass.
    pub fn last_frame_time(&self) -> Option<Duration> {
        self.last_report.as_ref().map(|r| r.elapsed)
    }

    fn launch(&mut self, settings: RenderSettings) -> anyhow::Result<()> {
        self.ctx.cancel.store(false, Ordering::SeqCst);

        let ctx = Arc::clone(&self.ctx);
        let (tx, done) = sync_channel(1);
        let handle = thread::Builder::new()
            .name("trace-pass".into())
            .spawn(move || {
                let result = trace_pass(&ctx, settings);
                if let Err(e) = &result {
                    error!(error = %e, "trace pass failed");
                }
                // the controller may have been torn down already
                let _ = tx.send(result);
            })?;

        self.state = ControllerState::Running { handle, done, settings };
        Ok(())
    }

    fn present(&self, surface: &mut dyn Surface) {
        let target = self.ctx.target.lock();
        let buffer = &target.buffer;
        surface.present(buffer.width(), buffer.height(), buffer.pixels());
    }

    /// Blocks until the running pass, if any, has observed cancellation and exited.
    fn stop(&mut self) {
        if let ControllerState::Running { handle, .. } = std::mem::replace(&mut self.state, ControllerState::Idle) {
            self.ctx.cancel.store(true, Ordering::SeqCst);
            join_trace_thread(handle);
            self.ctx.cancel.store(false, Ordering::SeqCst);
            info!("stopped running trace pass");
        }
    }
}

impl<C: Camera> Drop for FrameController<C> {
    fn drop(&mut self) {
        self.teardown();
    }
}

fn join_trace_thread(handle: JoinHandle<()>) {
    if handle.join().is_err() {
        error!("trace thread panicked");
    }
}

/// One full pass: pick up camera changes, clear the buffer if the view moved, then
/// accumulate one more sample per pixel.
fn trace_pass<C: Camera>(ctx: &TraceContext<C>, settings: RenderSettings) -> anyhow::Result<PassReport> {
    let _span = info_span!("trace_pass", partitions = settings.partitions, max_depth = settings.max_depth).entered();
    let start = Instant::now();

    let mut target = ctx.target.lock();

    let (camera_changed, camera) = {
        let mut camera = ctx.camera.lock();
        camera.set_field_of_view(settings.field_of_view);
        (camera.update(), camera.clone())
    };

    // the reset has to land before any sample of the new view
    if camera_changed {
        debug!("view changed, clearing accumulated samples");
        target.buffer.reset();
    }

    let sample = target.sampler.next_offset();
    let integrator = WhittedIntegrator::new(settings.max_depth);

    let TraceTarget { buffer, renderer, .. } = &mut *target;
    let mut report = renderer.render_pass(
        &ctx.scene,
        &camera,
        &integrator,
        buffer,
        settings.partitions,
        sample,
        &ctx.cancel,
    )?;

    report.camera_changed = camera_changed;
    report.elapsed = start.elapsed();
    debug!(ms = report.elapsed_ms(), samples = report.samples, rows = report.rows_traced, "trace pass finished");
    Ok(report)
}
