mod rt_thread;
pub mod daemon;
pub mod message_handler;
pub mod runtime;

pub use daemon::MonitorService;
pub use message_handler::{RuntimeEvent, RuntimeMessage};
pub use runtime::{spawn_runtime, RuntimeError, RuntimeHandle, EVENT_QUEUE_CAPACITY};
