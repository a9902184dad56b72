//! Gemstore engine: wiki fetch, webhook dispatch, persisted state and the run driver.
mod dispatch;
mod fetch;
mod persist;
mod pipeline;
mod types;

pub use dispatch::{discord_payload, DiscordWebhookDispatcher, Dispatcher, WebhookSettings};
pub use fetch::{
    FetchSettings, PageFetcher, ReqwestPageFetcher, DEFAULT_API_URL, DEFAULT_CONTACT,
    DEFAULT_PAGE_NAME, DEFAULT_USER_AGENT,
};
pub use persist::{
    ensure_dir, write_atomic, FileStateStore, FileWatchListSource, PersistError, StateStore,
    WatchListSource,
};
pub use pipeline::{Pipeline, PipelineConfig, RunError, RunOutcome};
pub use types::{FailureKind, FetchError, FetchedPage};
