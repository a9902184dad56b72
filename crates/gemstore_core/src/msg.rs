/// Outcome reported by the notification channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchResult {
    pub success: bool,
    pub status_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Raw page markup and its revision timestamp arrived.
    PageFetched { content: String, timestamp: String },
    /// The page could not be fetched; the run ends without touching state.
    FetchFailed { reason: String },
    /// The notification channel answered a `Dispatch` effect.
    DispatchCompleted(DispatchResult),
}
