use std::collections::HashSet;

use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::approvals::EVALUATION_CURRENCY;
use crate::domain::approval::{
    dedupe_channels, ApprovalFlow, ApprovalStage, FlowId, FlowStatus, NotifyChannel, StageId,
    StageType, Threshold,
};
use crate::errors::DomainError;

pub const DEFAULT_AUTO_APPROVE_UNDER: i64 = 100_000;
pub const DEFAULT_ESCALATION_AFTER: &str = "24h";

/// Editable fields of a stage; the id is assigned by the flow.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageDraft {
    pub name: String,
    pub stage_type: StageType,
    pub required_approvers: u32,
    pub delegates_allowed: bool,
    pub escalation_after: String,
    pub notify_channels: Vec<NotifyChannel>,
    pub note: String,
}

impl StageDraft {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            stage_type: StageType::Custom,
            required_approvers: 1,
            delegates_allowed: false,
            escalation_after: DEFAULT_ESCALATION_AFTER.to_string(),
            notify_channels: vec![NotifyChannel::InApp],
            note: String::new(),
        }
    }

    pub fn of_type(mut self, stage_type: StageType) -> Self {
        self.stage_type = stage_type;
        self
    }

    pub fn requiring(mut self, required_approvers: u32) -> Self {
        self.required_approvers = required_approvers;
        self
    }

    pub fn escalating_after(mut self, escalation_after: impl Into<String>) -> Self {
        self.escalation_after = escalation_after.into();
        self
    }

    pub fn notifying(mut self, channels: Vec<NotifyChannel>) -> Self {
        self.notify_channels = channels;
        self
    }

    pub fn with_delegates(mut self, delegates_allowed: bool) -> Self {
        self.delegates_allowed = delegates_allowed;
        self
    }

    fn into_stage(self, id: StageId) -> ApprovalStage {
        ApprovalStage {
            id,
            name: self.name,
            stage_type: self.stage_type,
            required_approvers: self.required_approvers,
            delegates_allowed: self.delegates_allowed,
            escalation_after: self.escalation_after,
            notify_channels: dedupe_channels(self.notify_channels),
            note: self.note,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StageMove {
    Up,
    Down,
}

impl ApprovalFlow {
    pub fn draft(name: impl Into<String>, applies_to: Vec<String>, actor: &str) -> Self {
        let mut flow = Self {
            id: FlowId::generate(),
            name: name.into(),
            status: FlowStatus::Draft,
            applies_to,
            thresholds: vec![Threshold {
                currency: EVALUATION_CURRENCY.to_string(),
                under: Decimal::new(DEFAULT_AUTO_APPROVE_UNDER, 0),
                auto_approve: true,
                note: "Default auto-approve limit".to_string(),
            }],
            stages: Vec::new(),
            last_edited: String::new(),
        };
        flow.mark_edited(actor);
        flow
    }

    /// Copies the flow under a new id as a draft. Stage ids are kept since
    /// they only need to be unique within a flow.
    pub fn duplicate(&self, actor: &str) -> Self {
        let mut copy = self.clone();
        copy.id = FlowId::generate();
        copy.name = format!("{} (copy)", self.name);
        copy.status = FlowStatus::Draft;
        copy.mark_edited(actor);
        copy
    }

    pub fn mark_edited(&mut self, actor: &str) {
        self.last_edited =
            format!("Edited {} by {actor}", Utc::now().format("%Y-%m-%d %H:%M UTC"));
    }

    pub fn add_stage(&mut self, draft: StageDraft, actor: &str) -> StageId {
        let id = StageId::generate();
        self.stages.push(draft.into_stage(id.clone()));
        self.mark_edited(actor);
        id
    }

    pub fn update_stage(
        &mut self,
        id: &StageId,
        draft: StageDraft,
        actor: &str,
    ) -> Result<(), DomainError> {
        let index = self.stage_index(id)?;
        self.stages[index] = draft.into_stage(id.clone());
        self.mark_edited(actor);
        Ok(())
    }

    pub fn remove_stage(&mut self, id: &StageId, actor: &str) -> Result<ApprovalStage, DomainError> {
        let index = self.stage_index(id)?;
        let removed = self.stages.remove(index);
        self.mark_edited(actor);
        Ok(removed)
    }

    /// Swaps the stage with its neighbour. Moving past either end leaves the
    /// order untouched.
    pub fn move_stage(
        &mut self,
        id: &StageId,
        direction: StageMove,
        actor: &str,
    ) -> Result<(), DomainError> {
        let index = self.stage_index(id)?;
        let target = match direction {
            StageMove::Up => index.checked_sub(1),
            StageMove::Down => Some(index + 1).filter(|next| *next < self.stages.len()),
        };

        if let Some(target) = target {
            self.stages.swap(index, target);
            self.mark_edited(actor);
        }
        Ok(())
    }

    pub fn upsert_threshold(&mut self, threshold: Threshold, actor: &str) {
        match self.thresholds.iter_mut().find(|existing| existing.currency == threshold.currency) {
            Some(existing) => *existing = threshold,
            None => self.thresholds.push(threshold),
        }
        self.mark_edited(actor);
    }

    pub fn remove_threshold(&mut self, currency: &str, actor: &str) -> bool {
        let before = self.thresholds.len();
        self.thresholds.retain(|threshold| threshold.currency != currency);
        let removed = self.thresholds.len() != before;
        if removed {
            self.mark_edited(actor);
        }
        removed
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::InvariantViolation(format!(
                "flow `{}` must have a name",
                self.id
            )));
        }

        let mut currencies = HashSet::new();
        for threshold in &self.thresholds {
            if !currencies.insert(threshold.currency.as_str()) {
                return Err(DomainError::InvariantViolation(format!(
                    "flow `{}` has more than one {} threshold",
                    self.id, threshold.currency
                )));
            }
            if threshold.under < Decimal::ZERO {
                return Err(DomainError::InvariantViolation(format!(
                    "flow `{}` has a negative {} threshold",
                    self.id, threshold.currency
                )));
            }
            if !threshold.under.fract().is_zero() {
                return Err(DomainError::InvariantViolation(format!(
                    "flow `{}` has a fractional {} threshold",
                    self.id, threshold.currency
                )));
            }
        }

        let mut stage_ids = HashSet::new();
        for stage in &self.stages {
            if !stage_ids.insert(&stage.id) {
                return Err(DomainError::InvariantViolation(format!(
                    "flow `{}` repeats stage id `{}`",
                    self.id, stage.id
                )));
            }
            if stage.required_approvers == 0 {
                return Err(DomainError::InvariantViolation(format!(
                    "stage `{}` in flow `{}` must require at least one approver",
                    stage.name, self.id
                )));
            }
        }

        Ok(())
    }

    fn stage_index(&self, id: &StageId) -> Result<usize, DomainError> {
        self.stages.iter().position(|stage| &stage.id == id).ok_or_else(|| {
            DomainError::UnknownStage { flow_id: self.id.clone(), stage_id: id.clone() }
        })
    }
}
