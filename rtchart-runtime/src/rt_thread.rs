use crate::runtime::RuntimeError;
use std::{sync::mpsc, thread};

const THREAD_NAME: &str = "rtchart-runtime";

pub(crate) struct RuntimeThread;

impl RuntimeThread {
    /// Starts `f` on a named thread and waits until the thread reports that
    /// it is up.
    pub(crate) fn spawn<F>(f: F) -> Result<thread::JoinHandle<()>, RuntimeError>
    where
        F: FnOnce() + Send + 'static,
    {
        let (status_tx, status_rx) = mpsc::sync_channel(1);
        let handle = thread::Builder::new()
            .name(THREAD_NAME.to_string())
            .spawn(move || {
                let _ = status_tx.send(());
                f();
            })?;

        match status_rx.recv() {
            Ok(()) => {
                log::debug!("{THREAD_NAME} thread started");
                Ok(handle)
            }
            Err(_) => {
                let _ = handle.join();
                Err(RuntimeError::Startup)
            }
        }
    }
}
