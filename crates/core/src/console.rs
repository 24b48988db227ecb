use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::domain::approval::FlowId;
use crate::domain::scenario::Scenario;
use crate::domain::simulation::{Decision, SimulationResult};

pub const MAX_TOASTS: usize = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToastTone {
    Success,
    Info,
    Warning,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toast {
    pub tone: ToastTone,
    pub title: String,
    pub message: String,
}

/// Transient state of one interactive console client. Callers own it and
/// thread it through; nothing here is shared between sessions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleSession {
    pub org: String,
    pub selected_flow: Option<FlowId>,
    pub last_scenario: Option<Scenario>,
    pub last_result: Option<SimulationResult>,
    toasts: VecDeque<Toast>,
}

impl ConsoleSession {
    pub fn new(org: impl Into<String>) -> Self {
        Self {
            org: org.into(),
            selected_flow: None,
            last_scenario: None,
            last_result: None,
            toasts: VecDeque::new(),
        }
    }

    pub fn select_flow(&mut self, flow_id: FlowId) {
        if self.selected_flow.as_ref() != Some(&flow_id) {
            self.last_scenario = None;
            self.last_result = None;
        }
        self.selected_flow = Some(flow_id);
    }

    pub fn push_toast(
        &mut self,
        tone: ToastTone,
        title: impl Into<String>,
        message: impl Into<String>,
    ) {
        if self.toasts.len() == MAX_TOASTS {
            self.toasts.pop_front();
        }
        self.toasts.push_back(Toast { tone, title: title.into(), message: message.into() });
    }

    pub fn toasts(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter()
    }

    pub fn latest_toast(&self) -> Option<&Toast> {
        self.toasts.back()
    }

    pub fn dismiss_toasts(&mut self) -> Vec<Toast> {
        self.toasts.drain(..).collect()
    }

    pub fn record_simulation(&mut self, scenario: Scenario, result: SimulationResult) {
        let tone = match result.decision {
            Decision::AutoApproved => ToastTone::Success,
            Decision::ApprovalRequired => ToastTone::Info,
            Decision::Blocked => ToastTone::Warning,
        };
        self.push_toast(tone, result.decision.label(), result.reason.clone());
        self.last_scenario = Some(scenario);
        self.last_result = Some(result);
    }
}
