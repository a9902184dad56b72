use std::collections::VecDeque;

use gemstore_core::{update, DispatchResult, Effect, Msg, RunContext, RunState, Stage};
use gemstore_logging::{gem_debug, gem_error, gem_info, gem_warn};
use thiserror::Error;

use crate::{Dispatcher, FetchError, PageFetcher, PersistError, StateStore, WatchListSource};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Wiki page holding the store data, e.g. `Gem_Store/data`.
    pub page_name: String,
    /// Page linked from notifications.
    pub source_url: String,
}

/// How a run ended when nothing went wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Revision already seen; state untouched, nothing sent.
    Suppressed { timestamp: String },
    /// New revision recorded, but nothing on the watch list is discounted.
    EmptyMatch { timestamp: String },
    /// New revision recorded and a notification attempted.
    Notified {
        timestamp: String,
        matched: Vec<String>,
        dispatch: DispatchResult,
    },
}

#[derive(Debug, Error)]
pub enum RunError {
    #[error("could not load watch list: {0}")]
    WatchList(#[source] PersistError),
    #[error("could not read run state: {0}")]
    StateLoad(#[source] PersistError),
    #[error("could not commit run state: {0}")]
    StateCommit(#[source] PersistError),
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),
    #[error("page could not be parsed: {0}")]
    Parse(String),
    #[error("run stopped in non-terminal stage {0:?}")]
    Stalled(Stage),
    #[error("could not start async runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

/// One fetch-to-dispatch pass over the injected collaborators.
pub struct Pipeline<'a> {
    config: PipelineConfig,
    fetcher: &'a dyn PageFetcher,
    dispatcher: &'a dyn Dispatcher,
    state_store: &'a dyn StateStore,
    watch_list: &'a dyn WatchListSource,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        config: PipelineConfig,
        fetcher: &'a dyn PageFetcher,
        dispatcher: &'a dyn Dispatcher,
        state_store: &'a dyn StateStore,
        watch_list: &'a dyn WatchListSource,
    ) -> Self {
        Self {
            config,
            fetcher,
            dispatcher,
            state_store,
            watch_list,
        }
    }

    /// Runs [`Pipeline::run`] to completion on a private runtime.
    pub fn run_blocking(&self) -> Result<RunOutcome, RunError> {
        let runtime = tokio::runtime::Runtime::new().map_err(RunError::Runtime)?;
        runtime.block_on(self.run())
    }

    pub async fn run(&self) -> Result<RunOutcome, RunError> {
        let desired = self.watch_list.load().map_err(RunError::WatchList)?;
        let last_seen = self.state_store.load().map_err(RunError::StateLoad)?;
        gem_info!(
            "Watching {} item(s); last seen revision {}",
            desired.len(),
            last_seen.as_deref().unwrap_or("<none>")
        );

        let state = RunState::new(RunContext {
            desired,
            last_seen,
            source_url: self.config.source_url.clone(),
        });

        let page = match self.fetcher.fetch(&self.config.page_name).await {
            Ok(page) => page,
            Err(err) => {
                let (state, _) = update(
                    state,
                    Msg::FetchFailed {
                        reason: err.to_string(),
                    },
                );
                gem_error!(
                    "Fetching {} failed ({:?}): {}",
                    self.config.page_name,
                    state.stage(),
                    err
                );
                return Err(RunError::Fetch(err));
            }
        };
        gem_debug!(
            "Fetched revision {} ({} bytes)",
            page.timestamp,
            page.content.len()
        );

        let (mut state, effects) = update(
            state,
            Msg::PageFetched {
                content: page.content,
                timestamp: page.timestamp,
            },
        );

        let mut queue: VecDeque<Effect> = effects.into();
        while let Some(effect) = queue.pop_front() {
            match effect {
                Effect::CommitTimestamp { timestamp } => {
                    self.state_store.save(&timestamp).map_err(|err| {
                        gem_error!("Could not record revision {}: {}", timestamp, err);
                        RunError::StateCommit(err)
                    })?;
                    gem_debug!("Recorded revision {}", timestamp);
                }
                Effect::Dispatch { message } => {
                    let result = self.dispatcher.send(&message).await;
                    if !result.success {
                        gem_warn!("Notification was not delivered: {}", result.status_text);
                    }
                    let (next, more) = update(state, Msg::DispatchCompleted(result));
                    state = next;
                    queue.extend(more);
                }
            }
        }

        outcome_of(&state)
    }
}

fn outcome_of(state: &RunState) -> Result<RunOutcome, RunError> {
    let summary = state.view();
    gem_debug!(
        "Run summary: {} parsed, {} discounted, {} matched",
        summary.parsed_count,
        summary.discounted_count,
        summary.matched_names.len()
    );
    let timestamp = summary.timestamp.unwrap_or_default();
    match summary.stage {
        Stage::Suppressed => Ok(RunOutcome::Suppressed { timestamp }),
        Stage::EmptyMatch => Ok(RunOutcome::EmptyMatch { timestamp }),
        Stage::Notified => Ok(RunOutcome::Notified {
            timestamp,
            matched: summary.matched_names,
            dispatch: summary.dispatch.unwrap_or(DispatchResult {
                success: false,
                status_text: "no dispatch result".to_string(),
            }),
        }),
        Stage::Failed => {
            let reason = summary.failure.unwrap_or_else(|| "unknown".to_string());
            gem_error!("Run failed: {}", reason);
            Err(RunError::Parse(reason))
        }
        other => Err(RunError::Stalled(other)),
    }
}
