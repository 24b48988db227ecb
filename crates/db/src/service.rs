use std::sync::Arc;

use tracing::{info, warn};

use corpay_core::approvals::{ApprovalEvaluator, DeterministicApprovalEvaluator};
use corpay_core::audit::{AuditCategory, AuditEvent, AuditOutcome, AuditSink, TracingAuditSink};
use corpay_core::domain::approval::{ApprovalFlow, FlowId, FlowStatus};
use corpay_core::domain::scenario::Scenario;
use corpay_core::domain::simulation::SimulationResult;
use corpay_core::errors::{ApplicationError, DomainError};

use crate::repositories::ApprovalFlowRepository;

/// Console-facing operations over stored approval flows. Every mutation
/// validates before it reaches the repository.
pub struct ApprovalFlowService<R> {
    repository: R,
    evaluator: Arc<dyn ApprovalEvaluator>,
    audit: Arc<dyn AuditSink>,
    actor: String,
}

impl<R: ApprovalFlowRepository> ApprovalFlowService<R> {
    pub fn new(repository: R, actor: impl Into<String>) -> Self {
        Self {
            repository,
            evaluator: Arc::new(DeterministicApprovalEvaluator),
            audit: Arc::new(TracingAuditSink),
            actor: actor.into(),
        }
    }

    pub fn with_evaluator(mut self, evaluator: Arc<dyn ApprovalEvaluator>) -> Self {
        self.evaluator = evaluator;
        self
    }

    pub fn with_audit_sink(mut self, audit: Arc<dyn AuditSink>) -> Self {
        self.audit = audit;
        self
    }

    pub fn actor(&self) -> &str {
        &self.actor
    }

    pub async fn list_flows(&self) -> Result<Vec<ApprovalFlow>, ApplicationError> {
        Ok(self.repository.load().await?)
    }

    pub async fn get_flow(&self, id: &FlowId) -> Result<ApprovalFlow, ApplicationError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApplicationError::NotFound(format!("approval flow `{id}`")))
    }

    pub async fn create_flow(
        &self,
        name: &str,
        applies_to: Vec<String>,
        correlation_id: &str,
    ) -> Result<ApprovalFlow, ApplicationError> {
        let flow = ApprovalFlow::draft(name, applies_to, &self.actor);
        flow.validate()?;
        self.repository.save(flow.clone()).await?;
        self.emit_flow_event(
            &flow.id,
            correlation_id,
            "approval_flow.created",
            AuditOutcome::Success,
        );
        Ok(flow)
    }

    pub async fn save_flow(
        &self,
        mut flow: ApprovalFlow,
        correlation_id: &str,
    ) -> Result<ApprovalFlow, ApplicationError> {
        if let Err(error) = flow.validate() {
            warn!(
                event_name = "approval_flow.rejected",
                correlation_id,
                flow_id = %flow.id,
                error = %error,
                "approval flow failed validation"
            );
            self.emit_flow_event(
                &flow.id,
                correlation_id,
                "approval_flow.rejected",
                AuditOutcome::Rejected,
            );
            return Err(error.into());
        }

        flow.mark_edited(&self.actor);
        self.repository.save(flow.clone()).await?;
        self.emit_flow_event(
            &flow.id,
            correlation_id,
            "approval_flow.saved",
            AuditOutcome::Success,
        );
        Ok(flow)
    }

    pub async fn delete_flow(
        &self,
        id: &FlowId,
        correlation_id: &str,
    ) -> Result<(), ApplicationError> {
        if !self.repository.delete(id).await? {
            return Err(ApplicationError::NotFound(format!("approval flow `{id}`")));
        }
        self.emit_flow_event(id, correlation_id, "approval_flow.deleted", AuditOutcome::Success);
        Ok(())
    }

    pub async fn set_status(
        &self,
        id: &FlowId,
        status: FlowStatus,
        correlation_id: &str,
    ) -> Result<ApprovalFlow, ApplicationError> {
        let mut flow = self.get_flow(id).await?;
        let from = flow.status;
        flow.transition_to(status, &self.actor).map_err(DomainError::from)?;
        self.repository.save(flow.clone()).await?;

        info!(
            event_name = "approval_flow.status_changed",
            correlation_id,
            flow_id = %flow.id,
            from = from.as_str(),
            to = status.as_str(),
            "approval flow status changed"
        );
        self.audit.emit(
            AuditEvent::new(
                Some(flow.id.clone()),
                correlation_id,
                "approval_flow.status_changed",
                AuditCategory::Flow,
                self.actor.clone(),
                AuditOutcome::Success,
            )
            .with_metadata("from", from.as_str())
            .with_metadata("to", status.as_str()),
        );
        Ok(flow)
    }

    pub async fn duplicate_flow(
        &self,
        id: &FlowId,
        correlation_id: &str,
    ) -> Result<ApprovalFlow, ApplicationError> {
        let copy = self.get_flow(id).await?.duplicate(&self.actor);
        self.repository.save(copy.clone()).await?;
        self.audit.emit(
            AuditEvent::new(
                Some(copy.id.clone()),
                correlation_id,
                "approval_flow.duplicated",
                AuditCategory::Flow,
                self.actor.clone(),
                AuditOutcome::Success,
            )
            .with_metadata("source_flow_id", id.0.clone()),
        );
        Ok(copy)
    }

    /// Evaluates `scenario` against the stored flow `flow_id`. The scenario
    /// is rejected before evaluation when its amount is negative.
    pub async fn simulate(
        &self,
        flow_id: &FlowId,
        scenario: &Scenario,
        correlation_id: &str,
    ) -> Result<SimulationResult, ApplicationError> {
        scenario.validate()?;
        let flow = self.get_flow(flow_id).await?;
        let result = self.evaluator.evaluate(&flow, scenario);

        info!(
            event_name = "approval.simulated",
            correlation_id,
            flow_id = %flow.id,
            requester_role = scenario.requester_role.as_str(),
            amount_ugx = %scenario.amount_ugx,
            decision = result.decision.label(),
            stage_count = result.stages.len(),
            "approval scenario evaluated"
        );
        self.audit.emit(
            AuditEvent::new(
                Some(flow.id.clone()),
                correlation_id,
                "approval.simulated",
                AuditCategory::Simulation,
                self.actor.clone(),
                AuditOutcome::Success,
            )
            .with_metadata("decision", result.decision.label())
            .with_metadata("requester_role", scenario.requester_role.as_str())
            .with_metadata("amount_ugx", scenario.amount_ugx.to_string())
            .with_metadata("transaction_type", scenario.transaction_type.clone()),
        );

        Ok(result)
    }

    fn emit_flow_event(
        &self,
        flow_id: &FlowId,
        correlation_id: &str,
        event_type: &str,
        outcome: AuditOutcome,
    ) {
        self.audit.emit(AuditEvent::new(
            Some(flow_id.clone()),
            correlation_id,
            event_type,
            AuditCategory::Flow,
            self.actor.clone(),
            outcome,
        ));
    }
}
