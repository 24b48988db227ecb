use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::approval::{ApprovalStage, NotifyChannel};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Decision {
    #[serde(rename = "Auto-approved")]
    AutoApproved,
    #[serde(rename = "Approval required")]
    ApprovalRequired,
    Blocked,
}

impl Decision {
    pub fn label(&self) -> &'static str {
        match self {
            Self::AutoApproved => "Auto-approved",
            Self::ApprovalRequired => "Approval required",
            Self::Blocked => "Blocked",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageProjection {
    pub stage: String,
    pub required: u32,
    pub channels: Vec<NotifyChannel>,
    pub sla: String,
}

impl From<&ApprovalStage> for StageProjection {
    fn from(stage: &ApprovalStage) -> Self {
        Self {
            stage: stage.name.clone(),
            required: stage.required_approvers,
            channels: stage.notify_channels.clone(),
            sla: stage.escalation_after.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub decision: Decision,
    pub stages: Vec<StageProjection>,
    pub reason: String,
}

impl SimulationResult {
    pub fn auto_approved(reason: impl Into<String>) -> Self {
        Self { decision: Decision::AutoApproved, stages: Vec::new(), reason: reason.into() }
    }

    pub fn blocked(reason: impl Into<String>) -> Self {
        Self { decision: Decision::Blocked, stages: Vec::new(), reason: reason.into() }
    }

    pub fn approval_required(stages: Vec<StageProjection>, reason: impl Into<String>) -> Self {
        Self { decision: Decision::ApprovalRequired, stages, reason: reason.into() }
    }

    pub fn total_required_approvers(&self) -> u32 {
        self.stages.iter().map(|stage| stage.required).sum()
    }
}
