use crate::message_handler::{RuntimeEvent, RuntimeMessage};
use crate::runtime::{spawn_runtime, RuntimeError, RuntimeHandle};
use rtchart_core::{MonitorSettings, RenderBackend};
use sampling::WindowSnapshot;
use std::sync::mpsc::TryRecvError;
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Blocking facade over the runtime thread for command-line use.
pub struct MonitorService {
    handle: RuntimeHandle,
}

impl MonitorService {
    pub fn new<B>(settings: &MonitorSettings, backend: B) -> Result<Self, RuntimeError>
    where
        B: RenderBackend + Send + 'static,
    {
        Ok(Self {
            handle: spawn_runtime(settings, backend)?,
        })
    }

    pub fn set_running(&self, running: bool) -> Result<(), RuntimeError> {
        self.handle.send(RuntimeMessage::SetRunning(running))
    }

    pub fn set_render_period(&self, period_ms: u32) -> Result<(), RuntimeError> {
        self.handle.send(RuntimeMessage::SetRenderPeriod(period_ms))
    }

    pub fn set_threshold(&self, value: f64) -> Result<(), RuntimeError> {
        self.handle.send(RuntimeMessage::SetThreshold(value))
    }

    pub fn request_render(&self) -> Result<(), RuntimeError> {
        self.handle.send(RuntimeMessage::RequestRender)
    }

    pub fn poll_event(&self) -> Option<RuntimeEvent> {
        self.handle.events().try_recv().ok()
    }

    /// Copy of the sliding window as it is right now.
    pub fn snapshot(&self) -> WindowSnapshot {
        self.handle.window().snapshot()
    }

    /// Feeds every event to `on_event` until `duration` has elapsed.
    pub fn run_for_duration<F>(
        &self,
        duration: Duration,
        mut on_event: F,
    ) -> Result<(), RuntimeError>
    where
        F: FnMut(RuntimeEvent),
    {
        let start = Instant::now();
        while start.elapsed() < duration {
            loop {
                match self.handle.events().try_recv() {
                    Ok(event) => on_event(event),
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => return Err(RuntimeError::Stopped),
                }
            }
            std::thread::sleep(POLL_INTERVAL.min(duration.saturating_sub(start.elapsed())));
        }
        Ok(())
    }

    /// Waits up to `timeout` for an event matching `accept`, dropping the
    /// others.
    pub fn wait_for<F>(&self, timeout: Duration, mut accept: F) -> Option<RuntimeEvent>
    where
        F: FnMut(&RuntimeEvent) -> bool,
    {
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.handle.events().recv_timeout(remaining) {
                Ok(event) if accept(&event) => return Some(event),
                Ok(_) => continue,
                Err(_) => return None,
            }
        }
    }

    pub fn shutdown(self) -> Result<(), RuntimeError> {
        self.handle.shutdown()
    }
}
