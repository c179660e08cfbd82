//! Deep-research domain module.
//!
//! - `plan`: proposed outline (`ResearchPlan`, `PlanSection`) and extraction
//! - `section`: completed units of analysis (`ResearchSection`)
//! - `phase`: explicit approval-flow state (`ResearchPhase`)
//! - `engine`: orchestration (`ResearchEngine`)

mod engine;
mod phase;
mod plan;
mod section;

pub use engine::ResearchEngine;
pub use phase::ResearchPhase;
pub use plan::{PlanSection, ResearchPlan};
pub use section::{ResearchSection, SectionStatus};
