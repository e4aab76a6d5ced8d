//! Notification types.

use serde::{Deserialize, Serialize};

/// User-triggered cycle actions that produce a notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CycleAction {
    Load,
    Create,
    Update,
    Delete,
    MarkInvested,
    DistributeProfit,
    AssignPaidPayments,
}

impl CycleAction {
    pub fn label(&self) -> &'static str {
        match self {
            CycleAction::Load => "Loading cycles",
            CycleAction::Create => "Creating cycle",
            CycleAction::Update => "Updating cycle",
            CycleAction::Delete => "Deleting cycle",
            CycleAction::MarkInvested => "Marking invested",
            CycleAction::DistributeProfit => "Distributing profit",
            CycleAction::AssignPaidPayments => "Assigning paid payments",
        }
    }
}

/// Transient message for the user after an action finishes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "level", rename_all = "snake_case")]
pub enum Notification {
    Success {
        action: CycleAction,
        cycle_id: Option<String>,
        message: String,
    },
    Error {
        action: CycleAction,
        cycle_id: Option<String>,
        message: String,
    },
}

impl Notification {
    pub fn success(action: CycleAction, cycle_id: Option<&str>, message: impl Into<String>) -> Self {
        Self::Success {
            action,
            cycle_id: cycle_id.map(str::to_string),
            message: message.into(),
        }
    }

    pub fn error(action: CycleAction, cycle_id: Option<&str>, message: impl Into<String>) -> Self {
        Self::Error {
            action,
            cycle_id: cycle_id.map(str::to_string),
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Notification::Error { .. })
    }

    pub fn action(&self) -> CycleAction {
        match self {
            Notification::Success { action, .. } | Notification::Error { action, .. } => *action,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Notification::Success { message, .. } | Notification::Error { message, .. } => message,
        }
    }
}
