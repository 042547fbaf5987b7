pub mod config;
pub mod error;
pub mod threading;

pub use config::ThreadingConfig;
pub use error::{Result, ThreadingError};
pub use threading::{Message, Thread, ThreadId, ThreadingEngine};
