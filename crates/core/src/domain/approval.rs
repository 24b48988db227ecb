use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FlowId(pub String);

impl FlowId {
    pub fn generate() -> Self {
        Self(format!("AF-{}", short_id()))
    }
}

impl fmt::Display for FlowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StageId(pub String);

impl StageId {
    pub fn generate() -> Self {
        Self(format!("ST-{}", short_id()))
    }
}

impl fmt::Display for StageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn short_id() -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(8);
    id.to_ascii_uppercase()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlowStatus {
    Draft,
    Active,
    Archived,
}

impl FlowStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Active => "Active",
            Self::Archived => "Archived",
        }
    }
}

/// Informational only; the evaluator never branches on it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StageType {
    Manager,
    Finance,
    Risk,
    Custom,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NotifyChannel {
    #[serde(rename = "In-app")]
    InApp,
    Email,
    WhatsApp,
    WeChat,
    #[serde(rename = "SMS")]
    Sms,
}

impl NotifyChannel {
    pub fn label(&self) -> &'static str {
        match self {
            Self::InApp => "In-app",
            Self::Email => "Email",
            Self::WhatsApp => "WhatsApp",
            Self::WeChat => "WeChat",
            Self::Sms => "SMS",
        }
    }
}

/// Drops repeated channels, keeping the first occurrence of each.
pub fn dedupe_channels(channels: Vec<NotifyChannel>) -> Vec<NotifyChannel> {
    let mut unique = Vec::with_capacity(channels.len());
    for channel in channels {
        if !unique.contains(&channel) {
            unique.push(channel);
        }
    }
    unique
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Threshold {
    pub currency: String,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub under: Decimal,
    pub auto_approve: bool,
    #[serde(default)]
    pub note: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalStage {
    pub id: StageId,
    pub name: String,
    #[serde(rename = "type")]
    pub stage_type: StageType,
    pub required_approvers: u32,
    /// Advisory for the console; delegation is not enforced anywhere.
    #[serde(default)]
    pub delegates_allowed: bool,
    /// Opaque SLA label such as `"2h"` or `"24h"`.
    pub escalation_after: String,
    #[serde(default)]
    pub notify_channels: Vec<NotifyChannel>,
    #[serde(default)]
    pub note: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalFlow {
    pub id: FlowId,
    pub name: String,
    pub status: FlowStatus,
    #[serde(default)]
    pub applies_to: Vec<String>,
    #[serde(default)]
    pub thresholds: Vec<Threshold>,
    #[serde(default)]
    pub stages: Vec<ApprovalStage>,
    #[serde(default)]
    pub last_edited: String,
}

impl ApprovalFlow {
    pub fn threshold_for(&self, currency: &str) -> Option<&Threshold> {
        self.thresholds.iter().find(|threshold| threshold.currency == currency)
    }

    pub fn stage(&self, id: &StageId) -> Option<&ApprovalStage> {
        self.stages.iter().find(|stage| &stage.id == id)
    }

    pub fn applies_to(&self, transaction_type: &str) -> bool {
        self.applies_to.iter().any(|category| category.eq_ignore_ascii_case(transaction_type))
    }
}
