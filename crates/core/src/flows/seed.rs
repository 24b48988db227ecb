use rust_decimal::Decimal;

use crate::approvals::EVALUATION_CURRENCY;
use crate::domain::approval::{
    ApprovalFlow, ApprovalStage, FlowId, FlowStatus, NotifyChannel, StageId, StageType, Threshold,
};

pub const SEED_EDITED_BY: &str = "Seeded by CorporatePay";

/// Flows written to an empty store on first read.
pub fn default_flows() -> Vec<ApprovalFlow> {
    vec![standard_purchases(), high_value_payouts()]
}

fn standard_purchases() -> ApprovalFlow {
    ApprovalFlow {
        id: FlowId("AF-PURCHASES".to_string()),
        name: "Standard purchases".to_string(),
        status: FlowStatus::Active,
        applies_to: vec!["Purchases".to_string()],
        thresholds: vec![Threshold {
            currency: EVALUATION_CURRENCY.to_string(),
            under: Decimal::new(100_000, 0),
            auto_approve: true,
            note: "Small purchases skip the approval chain".to_string(),
        }],
        stages: vec![
            ApprovalStage {
                id: StageId("ST-MANAGER".to_string()),
                name: "Manager approval".to_string(),
                stage_type: StageType::Manager,
                required_approvers: 1,
                delegates_allowed: true,
                escalation_after: "24h".to_string(),
                notify_channels: vec![NotifyChannel::InApp, NotifyChannel::Email],
                note: "Requester's line manager".to_string(),
            },
            ApprovalStage {
                id: StageId("ST-FINANCE".to_string()),
                name: "Finance approval".to_string(),
                stage_type: StageType::Finance,
                required_approvers: 1,
                delegates_allowed: false,
                escalation_after: "48h".to_string(),
                notify_channels: vec![NotifyChannel::InApp],
                note: String::new(),
            },
        ],
        last_edited: SEED_EDITED_BY.to_string(),
    }
}

fn high_value_payouts() -> ApprovalFlow {
    ApprovalFlow {
        id: FlowId("AF-PAYOUTS".to_string()),
        name: "High-value payouts".to_string(),
        status: FlowStatus::Draft,
        applies_to: vec!["Payouts".to_string(), "Refunds".to_string()],
        thresholds: vec![Threshold {
            currency: EVALUATION_CURRENCY.to_string(),
            under: Decimal::ZERO,
            auto_approve: false,
            note: "Every payout is reviewed".to_string(),
        }],
        stages: vec![
            ApprovalStage {
                id: StageId("ST-FINANCE".to_string()),
                name: "Finance approval".to_string(),
                stage_type: StageType::Finance,
                required_approvers: 1,
                delegates_allowed: false,
                escalation_after: "8h".to_string(),
                notify_channels: vec![NotifyChannel::InApp, NotifyChannel::Email],
                note: String::new(),
            },
            ApprovalStage {
                id: StageId("ST-RISK".to_string()),
                name: "Risk review".to_string(),
                stage_type: StageType::Risk,
                required_approvers: 2,
                delegates_allowed: false,
                escalation_after: "2h".to_string(),
                notify_channels: vec![NotifyChannel::Email, NotifyChannel::Sms],
                note: "Two reviewers from the risk desk".to_string(),
            },
        ],
        last_edited: SEED_EDITED_BY.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::default_flows;

    #[test]
    fn seed_flows_are_valid_and_distinct() {
        let flows = default_flows();

        assert_eq!(flows.len(), 2);
        assert_ne!(flows[0].id, flows[1].id);
        for flow in &flows {
            assert!(flow.validate().is_ok(), "seed flow {} should validate", flow.id);
        }
    }
}
