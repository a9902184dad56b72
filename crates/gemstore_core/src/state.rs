use crate::{DesiredItemList, DispatchResult, ItemRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Stage {
    #[default]
    Idle,
    Fetched,
    Parsed,
    Filtered,
    Matched,
    /// Page unchanged since the last run.
    Suppressed,
    /// Page changed but nothing on the watch list is discounted.
    EmptyMatch,
    Dispatching,
    Notified,
    Failed,
}

impl Stage {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Stage::Suppressed | Stage::EmptyMatch | Stage::Notified | Stage::Failed
        )
    }
}

/// Inputs gathered before the page is fetched.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunContext {
    pub desired: DesiredItemList,
    pub last_seen: Option<String>,
    /// Human-facing page linked from the notification.
    pub source_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunState {
    context: RunContext,
    stage: Stage,
    timestamp: Option<String>,
    parsed_count: usize,
    discounted: Vec<ItemRecord>,
    matched: Vec<ItemRecord>,
    dispatch: Option<DispatchResult>,
    failure: Option<String>,
}

/// Read-only snapshot of a run, for logging and reporting.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunSummary {
    pub stage: Stage,
    pub timestamp: Option<String>,
    pub parsed_count: usize,
    pub discounted_count: usize,
    pub matched_names: Vec<String>,
    pub dispatch: Option<DispatchResult>,
    pub failure: Option<String>,
}

impl RunState {
    pub fn new(context: RunContext) -> Self {
        Self {
            context,
            ..Self::default()
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn context(&self) -> &RunContext {
        &self.context
    }

    pub fn matched(&self) -> &[ItemRecord] {
        &self.matched
    }

    pub fn view(&self) -> RunSummary {
        RunSummary {
            stage: self.stage,
            timestamp: self.timestamp.clone(),
            parsed_count: self.parsed_count,
            discounted_count: self.discounted.len(),
            matched_names: self.matched.iter().map(|r| r.name.clone()).collect(),
            dispatch: self.dispatch.clone(),
            failure: self.failure.clone(),
        }
    }

    pub(crate) fn mark_fetched(&mut self, timestamp: String) {
        self.timestamp = Some(timestamp);
        self.stage = Stage::Fetched;
    }

    pub(crate) fn mark_parsed(&mut self, parsed_count: usize) {
        self.parsed_count = parsed_count;
        self.stage = Stage::Parsed;
    }

    pub(crate) fn mark_filtered(&mut self, discounted: Vec<ItemRecord>) {
        self.discounted = discounted;
        self.stage = Stage::Filtered;
    }

    pub(crate) fn mark_matched(&mut self, matched: Vec<ItemRecord>) {
        self.matched = matched;
        self.stage = Stage::Matched;
    }

    pub(crate) fn discounted(&self) -> &[ItemRecord] {
        &self.discounted
    }

    pub(crate) fn finish(&mut self, stage: Stage) {
        self.stage = stage;
    }

    pub(crate) fn record_dispatch(&mut self, result: DispatchResult) {
        self.dispatch = Some(result);
        self.stage = Stage::Notified;
    }

    pub(crate) fn fail(&mut self, reason: impl Into<String>) {
        self.failure = Some(reason.into());
        self.stage = Stage::Failed;
    }
}
