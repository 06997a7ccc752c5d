use crate::message_handler::{RuntimeEvent, RuntimeMessage};
use crate::rt_thread::RuntimeThread;
use rtchart_core::{MonitorSettings, RenderBackend, RenderScheduler};
use sampling::{SharedWindow, Timestamp};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, SyncSender, TrySendError};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

/// Events the runtime holds for a consumer that is not draining them. Newer
/// events are dropped while the queue is full.
pub const EVENT_QUEUE_CAPACITY: usize = 32;

#[derive(thiserror::Error, Debug)]
pub enum RuntimeError {
    #[error("failed to spawn runtime thread: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("runtime thread failed to report status")]
    Startup,
    #[error("runtime thread has stopped")]
    Stopped,
    #[error("runtime thread panicked")]
    Panicked,
}

/// Channels and thread handle of a running monitor.
///
/// Dropping the handle stops the thread.
pub struct RuntimeHandle {
    tx: Sender<RuntimeMessage>,
    events: Receiver<RuntimeEvent>,
    window: SharedWindow,
    thread: Option<JoinHandle<()>>,
}

impl RuntimeHandle {
    pub fn sender(&self) -> &Sender<RuntimeMessage> {
        &self.tx
    }

    pub fn events(&self) -> &Receiver<RuntimeEvent> {
        &self.events
    }

    pub fn window(&self) -> &SharedWindow {
        &self.window
    }

    pub fn send(&self, message: RuntimeMessage) -> Result<(), RuntimeError> {
        self.tx.send(message).map_err(|_| RuntimeError::Stopped)
    }

    /// Asks the thread to stop and waits for it.
    pub fn shutdown(mut self) -> Result<(), RuntimeError> {
        self.stop()
    }

    fn stop(&mut self) -> Result<(), RuntimeError> {
        let Some(thread) = self.thread.take() else {
            return Ok(());
        };
        let _ = self.tx.send(RuntimeMessage::Shutdown);
        thread.join().map_err(|_| RuntimeError::Panicked)
    }
}

impl Drop for RuntimeHandle {
    fn drop(&mut self) {
        if let Err(err) = self.stop() {
            log::error!("{err}");
        }
    }
}

/// Spawns the thread that owns the scheduler.
///
/// The thread fires the generation cadence every `generation_step_ms` and
/// the render cadence every render period, applying queued messages in
/// between. It stops on [`RuntimeMessage::Shutdown`] or once every sender
/// is gone.
pub fn spawn_runtime<B>(
    settings: &MonitorSettings,
    backend: B,
) -> Result<RuntimeHandle, RuntimeError>
where
    B: RenderBackend + Send + 'static,
{
    let (tx, rx) = mpsc::channel::<RuntimeMessage>();
    let (event_tx, events) = mpsc::sync_channel::<RuntimeEvent>(EVENT_QUEUE_CAPACITY);
    let scheduler = RenderScheduler::new(settings, Timestamp::now(), backend);
    let window = scheduler.window();
    let summary = format!(
        "generation every {} ms, render every {} ms, threshold {}",
        scheduler.generation_step_ms(),
        scheduler.render_period_ms(),
        scheduler.threshold()
    );

    let thread = RuntimeThread::spawn(move || run_loop(scheduler, rx, event_tx))?;
    log::info!("monitor started: {summary}");

    Ok(RuntimeHandle {
        tx,
        events,
        window,
        thread: Some(thread),
    })
}

fn run_loop<B: RenderBackend>(
    mut scheduler: RenderScheduler<B>,
    rx: Receiver<RuntimeMessage>,
    event_tx: SyncSender<RuntimeEvent>,
) {
    let generation_step = millis(scheduler.generation_step_ms());
    let mut render_period = millis(scheduler.render_period_ms());
    let start = Instant::now();
    let mut next_generation = start + generation_step;
    let mut next_render = start + render_period;

    loop {
        let now = Instant::now();
        if now >= next_generation {
            if scheduler.on_generation_tick(Timestamp::now()) > 0 {
                publish(&event_tx, RuntimeEvent::Values(scheduler.latest_values().clone()));
            }
            next_generation += generation_step;
            if next_generation <= now {
                next_generation = now + generation_step;
            }
        }
        if now >= next_render {
            if let Some(artifact) = scheduler.on_render_tick() {
                publish(&event_tx, RuntimeEvent::Artifact(artifact));
            }
            next_render = now + render_period;
        }

        let wait = next_generation
            .min(next_render)
            .saturating_duration_since(Instant::now());
        let message = match rx.recv_timeout(wait) {
            Ok(message) => message,
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => break,
        };

        match message {
            RuntimeMessage::SetRunning(running) => scheduler.set_running(running),
            RuntimeMessage::SetRenderPeriod(period_ms) => {
                render_period = millis(scheduler.set_render_period(period_ms));
                next_render = Instant::now() + render_period;
            }
            RuntimeMessage::SetThreshold(value) => {
                if let Some(artifact) = scheduler.set_threshold(value) {
                    publish(&event_tx, RuntimeEvent::Artifact(artifact));
                }
            }
            RuntimeMessage::RequestRender => {
                if let Some(artifact) = scheduler.request_immediate_render() {
                    publish(&event_tx, RuntimeEvent::Artifact(artifact));
                }
            }
            RuntimeMessage::Shutdown => break,
        }
    }
    log::info!("monitor stopped");
}

fn publish(events: &SyncSender<RuntimeEvent>, event: RuntimeEvent) {
    match events.try_send(event) {
        Ok(()) => {}
        Err(TrySendError::Full(_)) => log::trace!("event queue full, dropping event"),
        // Nobody listens once the handle is gone; the loop ends on its own.
        Err(TrySendError::Disconnected(_)) => {}
    }
}

fn millis(ms: u32) -> Duration {
    Duration::from_millis(u64::from(ms))
}
