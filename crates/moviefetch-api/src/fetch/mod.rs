//! Fetch module.
//!
//! Runs one HTTP GET per call on a throwaway worker thread and posts the
//! decoded result (or a failure message) back to the caller's [`EventLoop`].

mod client;
mod config;
mod error;
mod event_loop;
mod task;

#[allow(clippy::module_name_repetitions)]
pub use config::{DEFAULT_CONNECT_TIMEOUT, DEFAULT_READ_TIMEOUT, FetchConfig, FetchConfigBuilder};
#[allow(clippy::module_name_repetitions)]
pub use error::{FetchError, SERVER_ERROR, UNKNOWN_ERROR};
pub use event_loop::{EventLoop, LoopHandle};
#[allow(clippy::module_name_repetitions)]
pub use task::{FetchCallback, FetchTask, FnCallback, callbacks};
