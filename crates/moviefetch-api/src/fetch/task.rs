//! `FetchTask` - one-shot background fetch with callback delivery.

use std::marker::PhantomData;
use std::thread;

use super::client::{fetch_decoded, parse_url};
use super::config::FetchConfig;
use super::error::{FetchError, UNKNOWN_ERROR};
use super::event_loop::LoopHandle;
use crate::catalog::{Category, DecodeError, MovieDetail, decode_categories, decode_movie_detail};

/// Callbacks for one fetch call.
///
/// `on_start` runs synchronously inside [`FetchTask::execute`]; exactly one
/// of `on_result` / `on_failure` runs later on the caller's [`EventLoop`].
///
/// [`EventLoop`]: super::EventLoop
#[allow(clippy::module_name_repetitions)]
pub trait FetchCallback<T>: Send + 'static {
    /// Called before any network activity.
    fn on_start(&mut self);

    /// Called with the decoded value.
    fn on_result(self, value: T);

    /// Called with a displayable failure message.
    fn on_failure(self, message: String);
}

/// [`FetchCallback`] built from three closures.
pub struct FnCallback<S, R, F> {
    on_start: S,
    on_result: R,
    on_failure: F,
}

impl<S, R, F> std::fmt::Debug for FnCallback<S, R, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnCallback").finish_non_exhaustive()
    }
}

/// Bundles `on_start`, `on_result` and `on_failure` closures into a callback.
pub const fn callbacks<S, R, F>(on_start: S, on_result: R, on_failure: F) -> FnCallback<S, R, F> {
    FnCallback {
        on_start,
        on_result,
        on_failure,
    }
}

impl<T, S, R, F> FetchCallback<T> for FnCallback<S, R, F>
where
    S: FnMut() + Send + 'static,
    R: FnOnce(T) + Send + 'static,
    F: FnOnce(String) + Send + 'static,
{
    fn on_start(&mut self) {
        (self.on_start)();
    }

    fn on_result(self, value: T) {
        (self.on_result)(value);
    }

    fn on_failure(self, message: String) {
        (self.on_failure)(message);
    }
}

/// Worker-owned guard that posts exactly one terminal delivery.
///
/// If the worker unwinds before calling [`Delivery::deliver`], `Drop` posts
/// a failure instead.
struct Delivery<T, C: FetchCallback<T>> {
    handle: LoopHandle,
    callback: Option<C>,
    _value: PhantomData<fn() -> T>,
}

impl<T, C> Delivery<T, C>
where
    T: Send + 'static,
    C: FetchCallback<T>,
{
    fn new(handle: LoopHandle, callback: C) -> Self {
        handle.begin();
        Self {
            handle,
            callback: Some(callback),
            _value: PhantomData,
        }
    }

    fn deliver(mut self, outcome: Result<T, FetchError>) {
        let Some(callback) = self.callback.take() else {
            return;
        };
        match outcome {
            Ok(value) => {
                tracing::debug!("fetch succeeded");
                self.handle
                    .finish(Box::new(move || callback.on_result(value)));
            }
            Err(e) => {
                tracing::warn!(kind = e.kind(), error = %e, "fetch failed");
                let message = e.message();
                self.handle
                    .finish(Box::new(move || callback.on_failure(message)));
            }
        }
    }
}

impl<T, C: FetchCallback<T>> Drop for Delivery<T, C> {
    fn drop(&mut self) {
        if let Some(callback) = self.callback.take() {
            tracing::error!("fetch worker ended without an outcome");
            self.handle
                .finish(Box::new(move || callback.on_failure(String::from(UNKNOWN_ERROR))));
        }
    }
}

/// Runs on the worker thread: validates the URL and performs the request on
/// a runtime owned by this call.
fn run_worker<T, D>(config: &FetchConfig, url: &str, decode: D) -> Result<T, FetchError>
where
    D: FnOnce(&str) -> Result<T, DecodeError>,
{
    let url = parse_url(url)?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(FetchError::Worker)?;
    runtime.block_on(fetch_decoded(config, &url, decode))
}

/// Performs catalog GETs off the calling thread.
///
/// Each [`execute`](Self::execute) spawns its own worker thread and
/// connection; nothing is shared between calls.
#[derive(Debug, Clone)]
#[allow(clippy::module_name_repetitions)]
pub struct FetchTask {
    /// Loop receiving terminal deliveries.
    handle: LoopHandle,
    /// Transport settings.
    config: FetchConfig,
}

impl FetchTask {
    /// Creates a task delivering to `handle` with default settings.
    #[must_use]
    pub fn new(handle: LoopHandle) -> Self {
        Self::with_config(handle, FetchConfig::default())
    }

    /// Creates a task delivering to `handle` with custom settings.
    #[must_use]
    pub const fn with_config(handle: LoopHandle, config: FetchConfig) -> Self {
        Self { handle, config }
    }

    /// Transport settings in use.
    #[must_use]
    pub const fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Fetches `url` and decodes the body with `decode`.
    ///
    /// Calls `callback.on_start()` before returning; the terminal callback
    /// runs later when the caller drives its [`EventLoop`](super::EventLoop).
    /// Invalid URLs are reported through `on_failure`.
    pub fn execute<T, D, C>(&self, url: &str, decode: D, mut callback: C)
    where
        T: Send + 'static,
        D: FnOnce(&str) -> Result<T, DecodeError> + Send + 'static,
        C: FetchCallback<T>,
    {
        callback.on_start();

        let delivery = Delivery::new(self.handle.clone(), callback);
        let config = self.config.clone();
        let url = String::from(url);
        let span = tracing::info_span!("fetch", url = %url);

        let spawned = thread::Builder::new()
            .name(String::from("moviefetch-worker"))
            .spawn(move || {
                let _entered = span.enter();
                let outcome = run_worker(&config, &url, decode);
                delivery.deliver(outcome);
            });
        if let Err(e) = spawned {
            tracing::error!(error = %e, "failed to spawn fetch worker");
        }
    }

    /// Fetches and decodes the category listing.
    pub fn fetch_categories<C>(&self, url: &str, callback: C)
    where
        C: FetchCallback<Vec<Category>>,
    {
        self.execute(url, decode_categories, callback);
    }

    /// Fetches and decodes one movie's detail and similar titles.
    pub fn fetch_movie_detail<C>(&self, url: &str, callback: C)
    where
        C: FetchCallback<MovieDetail>,
    {
        self.execute(url, decode_movie_detail, callback);
    }
}
