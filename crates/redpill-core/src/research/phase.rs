//! Research approval-flow state.

use super::plan::ResearchPlan;
use serde::{Deserialize, Serialize};

/// The deep-research flow, represented explicitly rather than as loose
/// booleans. Transitions:
///
/// ```text
/// Idle -> Planning -> AwaitingApproval -> Executing -> Completed -> Idle
///                        |
///                        +-- reject --> Idle
/// ```
///
/// Cancellation from any non-idle state returns to `Idle`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ResearchPhase {
    /// No research in flight.
    Idle,
    /// A plan request is being generated.
    Planning,
    /// A plan has been proposed and awaits user confirmation.
    AwaitingApproval { plan: ResearchPlan },
    /// Approved sections are being executed sequentially.
    Executing,
    /// All sections finished; transient before returning to idle.
    Completed,
}

impl ResearchPhase {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_awaiting_approval(&self) -> bool {
        matches!(self, Self::AwaitingApproval { .. })
    }

    /// Short label for status lines.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Planning => "planning",
            Self::AwaitingApproval { .. } => "awaiting approval",
            Self::Executing => "executing",
            Self::Completed => "completed",
        }
    }
}
