use std::process::ExitCode;

use gemstore_engine::RunOutcome;

/// How the process ends. Run outcomes that are not failures are clean
/// (status 0). A missing or unusable destination is a configuration error
/// (status 2) so schedulers surface it; `Failed` is status 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Exit {
    NotConfigured(String),
    NoChange { timestamp: String },
    NoMatches { timestamp: String },
    Notified { items: Vec<String>, delivered: bool, status: String },
    Failed(String),
}

impl Exit {
    pub fn from_outcome(outcome: RunOutcome) -> Self {
        match outcome {
            RunOutcome::Suppressed { timestamp } => Exit::NoChange { timestamp },
            RunOutcome::EmptyMatch { timestamp } => Exit::NoMatches { timestamp },
            RunOutcome::Notified {
                matched, dispatch, ..
            } => Exit::Notified {
                items: matched,
                delivered: dispatch.success,
                status: dispatch.status_text,
            },
        }
    }

    /// The single line logged for this exit.
    pub fn log_line(&self) -> String {
        match self {
            Exit::NotConfigured(reason) => {
                format!("No notification destination configured ({reason}); exiting")
            }
            Exit::NoChange { timestamp } => {
                format!("No sale data changed since revision {timestamp}; exiting")
            }
            Exit::NoMatches { timestamp } => {
                format!("No watched items on sale in revision {timestamp}; exiting")
            }
            Exit::Notified {
                items,
                delivered: true,
                status,
            } => format!(
                "Notified about {} item(s) [{}] ({status}); exiting",
                items.len(),
                items.join(", ")
            ),
            Exit::Notified {
                items,
                delivered: false,
                status,
            } => format!(
                "Notification about {} item(s) was not delivered ({status}); not retrying",
                items.len()
            ),
            Exit::Failed(reason) => format!("Run failed: {reason}"),
        }
    }

    pub fn code(&self) -> ExitCode {
        match self {
            Exit::NotConfigured(_) => ExitCode::from(2),
            Exit::Failed(_) => ExitCode::FAILURE,
            Exit::NoChange { .. } | Exit::NoMatches { .. } | Exit::Notified { .. } => {
                ExitCode::SUCCESS
            }
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Exit::NotConfigured(_) | Exit::Failed(_))
    }
}
