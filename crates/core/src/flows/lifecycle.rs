use thiserror::Error;

use crate::domain::approval::{ApprovalFlow, FlowId, FlowStatus};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum FlowTransitionError {
    #[error("flow `{flow_id}` cannot move from {from:?} to {to:?}")]
    InvalidTransition { flow_id: FlowId, from: FlowStatus, to: FlowStatus },
    #[error("flow `{flow_id}` cannot be activated without at least one stage")]
    NoStages { flow_id: FlowId },
}

impl FlowStatus {
    pub fn can_transition_to(&self, next: FlowStatus) -> bool {
        matches!(
            (self, next),
            (FlowStatus::Draft, FlowStatus::Active)
                | (FlowStatus::Active, FlowStatus::Draft)
                | (FlowStatus::Active, FlowStatus::Archived)
                | (FlowStatus::Archived, FlowStatus::Draft)
        )
    }
}

impl ApprovalFlow {
    /// Moves the flow to `next`. Re-applying the current status is a no-op.
    pub fn transition_to(
        &mut self,
        next: FlowStatus,
        actor: &str,
    ) -> Result<(), FlowTransitionError> {
        if self.status == next {
            return Ok(());
        }

        if !self.status.can_transition_to(next) {
            return Err(FlowTransitionError::InvalidTransition {
                flow_id: self.id.clone(),
                from: self.status,
                to: next,
            });
        }

        if next == FlowStatus::Active && self.stages.is_empty() {
            return Err(FlowTransitionError::NoStages { flow_id: self.id.clone() });
        }

        self.status = next;
        self.mark_edited(actor);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::approval::{ApprovalFlow, FlowStatus};
    use crate::flows::{FlowTransitionError, StageDraft};

    fn flow_with_stage() -> ApprovalFlow {
        let mut flow = ApprovalFlow::draft("Purchases", vec!["Purchases".to_string()], "admin");
        flow.add_stage(StageDraft::named("Manager approval"), "admin");
        flow
    }

    #[test]
    fn draft_flow_activates_and_archives() {
        let mut flow = flow_with_stage();

        flow.transition_to(FlowStatus::Active, "admin").expect("draft -> active");
        assert_eq!(flow.status, FlowStatus::Active);

        flow.transition_to(FlowStatus::Archived, "admin").expect("active -> archived");
        assert_eq!(flow.status, FlowStatus::Archived);

        flow.transition_to(FlowStatus::Draft, "admin").expect("archived -> draft");
        assert_eq!(flow.status, FlowStatus::Draft);
    }

    #[test]
    fn archived_flow_cannot_be_reactivated_directly() {
        let mut flow = flow_with_stage();
        flow.transition_to(FlowStatus::Active, "admin").expect("activate");
        flow.transition_to(FlowStatus::Archived, "admin").expect("archive");

        let error = flow.transition_to(FlowStatus::Active, "admin").expect_err("invalid");
        assert!(matches!(
            error,
            FlowTransitionError::InvalidTransition {
                from: FlowStatus::Archived,
                to: FlowStatus::Active,
                ..
            }
        ));
        assert_eq!(flow.status, FlowStatus::Archived);
    }

    #[test]
    fn draft_cannot_skip_to_archived() {
        let mut flow = flow_with_stage();
        assert!(flow.transition_to(FlowStatus::Archived, "admin").is_err());
    }

    #[test]
    fn activation_requires_a_stage() {
        let mut flow = ApprovalFlow::draft("Empty", Vec::new(), "admin");

        let error = flow.transition_to(FlowStatus::Active, "admin").expect_err("no stages");
        assert!(matches!(error, FlowTransitionError::NoStages { .. }));
    }

    #[test]
    fn same_status_is_a_no_op() {
        let mut flow = flow_with_stage();
        let before = flow.clone();

        flow.transition_to(FlowStatus::Draft, "someone-else").expect("no-op");
        assert_eq!(flow, before);
    }
}
