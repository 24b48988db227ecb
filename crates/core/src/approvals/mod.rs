//! Approval decision evaluation.
//!
//! [`simulate`] maps a flow and a scenario to exactly one
//! [`SimulationResult`]. Rules are checked in priority order and the first
//! match wins:
//!
//! 1. the flow's UGX threshold auto-approves amounts strictly below `under`;
//! 2. a `Viewer` requester is blocked;
//! 3. otherwise every stage of the flow is required, in flow order.
//!
//! Evaluation never converts currencies: the scenario amount is taken to be
//! UGX already, and thresholds in any other currency are ignored.

use crate::domain::approval::ApprovalFlow;
use crate::domain::scenario::{RequesterRole, Scenario};
use crate::domain::simulation::{SimulationResult, StageProjection};
use crate::money::format_amount;

pub const EVALUATION_CURRENCY: &str = "UGX";

pub const VIEWER_BLOCKED_REASON: &str = "Viewer role cannot request approvals";
pub const APPROVAL_REQUIRED_REASON: &str = "Meets criteria for approval workflow";

pub trait ApprovalEvaluator: Send + Sync {
    fn evaluate(&self, flow: &ApprovalFlow, scenario: &Scenario) -> SimulationResult;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct DeterministicApprovalEvaluator;

impl ApprovalEvaluator for DeterministicApprovalEvaluator {
    fn evaluate(&self, flow: &ApprovalFlow, scenario: &Scenario) -> SimulationResult {
        simulate(flow, scenario)
    }
}

pub fn simulate(flow: &ApprovalFlow, scenario: &Scenario) -> SimulationResult {
    if let Some(threshold) = flow.threshold_for(EVALUATION_CURRENCY) {
        if threshold.auto_approve && scenario.amount_ugx < threshold.under {
            return SimulationResult::auto_approved(format!(
                "Under {} auto-approve threshold",
                format_amount(EVALUATION_CURRENCY, threshold.under)
            ));
        }
    }

    if scenario.requester_role == RequesterRole::Viewer {
        return SimulationResult::blocked(VIEWER_BLOCKED_REASON);
    }

    let stages = flow.stages.iter().map(StageProjection::from).collect();
    SimulationResult::approval_required(stages, APPROVAL_REQUIRED_REASON)
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{simulate, ApprovalEvaluator, DeterministicApprovalEvaluator};
    use crate::domain::approval::{
        ApprovalFlow, ApprovalStage, FlowId, FlowStatus, NotifyChannel, StageId, StageType,
        Threshold,
    };
    use crate::domain::scenario::{RequesterRole, Scenario};
    use crate::domain::simulation::Decision;

    fn stage(id: &str, name: &str, required: u32, channels: Vec<NotifyChannel>) -> ApprovalStage {
        ApprovalStage {
            id: StageId(id.to_string()),
            name: name.to_string(),
            stage_type: StageType::Manager,
            required_approvers: required,
            delegates_allowed: false,
            escalation_after: "24h".to_string(),
            notify_channels: channels,
            note: String::new(),
        }
    }

    fn flow_fixture(thresholds: Vec<Threshold>) -> ApprovalFlow {
        ApprovalFlow {
            id: FlowId("AF-TEST".to_string()),
            name: "Purchases".to_string(),
            status: FlowStatus::Active,
            applies_to: vec!["Purchases".to_string()],
            thresholds,
            stages: vec![
                stage(
                    "ST-1",
                    "Manager approval",
                    1,
                    vec![NotifyChannel::InApp, NotifyChannel::Email],
                ),
                stage("ST-2", "Finance approval", 1, vec![NotifyChannel::InApp]),
            ],
            last_edited: String::new(),
        }
    }

    fn ugx_threshold(under: i64, auto_approve: bool) -> Threshold {
        Threshold {
            currency: "UGX".to_string(),
            under: Decimal::new(under, 0),
            auto_approve,
            note: String::new(),
        }
    }

    fn scenario(amount: i64, role: RequesterRole) -> Scenario {
        Scenario::new("Purchases", Decimal::new(amount, 0), role)
    }

    #[test]
    fn amount_under_threshold_is_auto_approved() {
        let flow = flow_fixture(vec![ugx_threshold(100_000, true)]);
        let result = simulate(&flow, &scenario(50_000, RequesterRole::Member));

        assert_eq!(result.decision, Decision::AutoApproved);
        assert!(result.stages.is_empty());
        assert_eq!(result.reason, "Under UGX 100,000 auto-approve threshold");
    }

    #[test]
    fn threshold_comparison_is_strict() {
        let flow = flow_fixture(vec![ugx_threshold(100_000, true)]);

        let below = simulate(&flow, &scenario(99_999, RequesterRole::Member));
        assert_eq!(below.decision, Decision::AutoApproved);

        let equal = simulate(&flow, &scenario(100_000, RequesterRole::Member));
        assert_eq!(equal.decision, Decision::ApprovalRequired);
    }

    #[test]
    fn auto_approve_takes_precedence_over_viewer_block() {
        let flow = flow_fixture(vec![ugx_threshold(100_000, true)]);
        let result = simulate(&flow, &scenario(10, RequesterRole::Viewer));

        assert_eq!(result.decision, Decision::AutoApproved);
    }

    #[test]
    fn viewer_is_blocked_when_auto_approve_does_not_apply() {
        let flow = flow_fixture(vec![ugx_threshold(100_000, true)]);
        let result = simulate(&flow, &scenario(540_000, RequesterRole::Viewer));
        assert_eq!(result.decision, Decision::Blocked);
        assert!(result.stages.is_empty());
        assert_eq!(result.reason, "Viewer role cannot request approvals");

        let disabled = flow_fixture(vec![ugx_threshold(100_000, false)]);
        let result = simulate(&disabled, &scenario(5, RequesterRole::Viewer));
        assert_eq!(result.decision, Decision::Blocked);
    }

    #[test]
    fn approval_required_projects_stages_in_order() {
        let flow = flow_fixture(vec![ugx_threshold(100_000, true)]);
        let result = simulate(&flow, &scenario(540_000, RequesterRole::Member));

        assert_eq!(result.decision, Decision::ApprovalRequired);
        assert_eq!(result.reason, "Meets criteria for approval workflow");
        assert_eq!(result.stages.len(), 2);
        assert_eq!(result.stages[0].stage, "Manager approval");
        assert_eq!(result.stages[0].required, 1);
        assert_eq!(result.stages[0].channels, vec![NotifyChannel::InApp, NotifyChannel::Email]);
        assert_eq!(result.stages[0].sla, "24h");
        assert_eq!(result.stages[1].stage, "Finance approval");
        assert_eq!(result.stages[1].channels, vec![NotifyChannel::InApp]);
        assert_eq!(result.total_required_approvers(), 2);
    }

    #[test]
    fn non_ugx_thresholds_never_auto_approve() {
        let flow = flow_fixture(vec![Threshold {
            currency: "USD".to_string(),
            under: Decimal::new(1_000_000_000, 0),
            auto_approve: true,
            note: String::new(),
        }]);

        let result = simulate(&flow, &scenario(1, RequesterRole::Owner));
        assert_eq!(result.decision, Decision::ApprovalRequired);

        let result = simulate(&flow, &scenario(1, RequesterRole::Viewer));
        assert_eq!(result.decision, Decision::Blocked);
    }

    #[test]
    fn flow_without_stages_still_requires_approval() {
        let mut flow = flow_fixture(Vec::new());
        flow.stages.clear();

        let result = simulate(&flow, &scenario(1, RequesterRole::Admin));
        assert_eq!(result.decision, Decision::ApprovalRequired);
        assert!(result.stages.is_empty());
    }

    #[test]
    fn evaluator_trait_delegates_to_simulate() {
        let flow = flow_fixture(vec![ugx_threshold(100_000, true)]);
        let input = scenario(540_000, RequesterRole::Finance);

        let evaluator = DeterministicApprovalEvaluator;
        assert_eq!(evaluator.evaluate(&flow, &input), simulate(&flow, &input));
    }
}
