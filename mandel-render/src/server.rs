//! Render server.
//!
//! One dispatch thread owns a backend of each kind and draws requests strictly in
//! arrival order, so two draws never overlap on the same backend. Callers get a
//! oneshot receiver that completes with a copy of the finished framebuffer.

use std::sync::mpsc::{self, Receiver};

use mandel_core::{Error, Framebuffer, RenderResult, ViewParameters};

use crate::{
    oneshot, parallel::default_workers, ParallelRenderer, RenderMode, Renderer, SerialRenderer,
    ShaderRenderer,
};

/// What to draw, and with which backend.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderRequest {
    pub mode: RenderMode,
    pub params: ViewParameters,
}

/// A finished draw: the image and its timing.
#[derive(Clone, Debug)]
pub struct Rendered {
    pub framebuffer: Framebuffer,
    pub result: RenderResult,
}

pub type Completion = Result<Rendered, Error>;

pub struct RenderServer {
    queue: mpsc::Sender<Job>,
}

struct Job {
    request: RenderRequest,
    result: oneshot::Sender<Completion>,
}

struct Backends {
    serial: SerialRenderer,
    parallel: ParallelRenderer,
    shader: ShaderRenderer,
}

impl Backends {
    fn get(&mut self, mode: RenderMode) -> &mut dyn Renderer {
        match mode {
            RenderMode::Cpu => &mut self.serial,
            RenderMode::CpuParallel => &mut self.parallel,
            RenderMode::WebGl => &mut self.shader,
        }
    }
}

impl RenderServer {
    pub fn new() -> Result<Self, Error> {
        Self::with_workers(default_workers())
    }

    /// Starts a server whose parallel backend uses `workers` strip workers.
    pub fn with_workers(workers: usize) -> Result<Self, Error> {
        let backends = Backends {
            serial: SerialRenderer::new(),
            parallel: ParallelRenderer::with_workers(workers)?,
            shader: ShaderRenderer::new(),
        };

        let (queue, recv) = mpsc::channel();
        // The dispatch thread is free-running. It shuts down when the input queue closes.
        std::thread::Builder::new()
            .name("render-dispatch".to_string())
            .spawn(move || dispatch(backends, recv))
            .map_err(|e| Error::Internal(format!("error starting dispatch thread: {}", e)))?;

        Ok(RenderServer { queue })
    }

    /// Queues a draw. The receiver can be awaited or blocked on.
    pub fn submit(&self, request: RenderRequest) -> oneshot::Receiver<Completion> {
        let (result, recv) = oneshot::new();
        let job = Job { request, result };
        if let Err(mpsc::SendError(job)) = self.queue.send(job) {
            job.result.send(Err(Error::Internal(
                "rendering server has terminated".to_string(),
            )));
        }
        recv
    }
}

fn dispatch(mut backends: Backends, receiver: Receiver<Job>) {
    let span = tracing::info_span!("dispatch thread");
    let _guard = span.enter();

    for job in receiver.iter() {
        run_job(&mut backends, job);
    }
}

/// Draws one job, unless its requester has already hung up. Returns whether it drew.
fn run_job(backends: &mut Backends, Job { request, result }: Job) -> bool {
    if result.is_cancelled() {
        tracing::debug!(mode = %request.mode, "requester hung up; skipping draw");
        return false;
    }
    let renderer = backends.get(request.mode);
    let completion = renderer
        .draw(&request.params)
        .map(|timing| Rendered {
            framebuffer: renderer.framebuffer().clone(),
            result: timing,
        })
        .map_err(|err| {
            tracing::error!("render error: for parameters {:?}: {}", &request, err);
            err
        });
    result.send(completion);
    true
}
