use async_trait::async_trait;
use tokio::sync::RwLock;

use corpay_core::domain::approval::{ApprovalFlow, FlowId};

use super::{remove_flow, upsert_flow, ApprovalFlowRepository, RepositoryError};

#[derive(Default)]
pub struct InMemoryApprovalFlowRepository {
    flows: RwLock<Vec<ApprovalFlow>>,
}

impl InMemoryApprovalFlowRepository {
    pub fn with_flows(flows: Vec<ApprovalFlow>) -> Self {
        Self { flows: RwLock::new(flows) }
    }
}

#[async_trait]
impl ApprovalFlowRepository for InMemoryApprovalFlowRepository {
    async fn load(&self) -> Result<Vec<ApprovalFlow>, RepositoryError> {
        let flows = self.flows.read().await;
        Ok(flows.clone())
    }

    async fn find_by_id(&self, id: &FlowId) -> Result<Option<ApprovalFlow>, RepositoryError> {
        let flows = self.flows.read().await;
        Ok(flows.iter().find(|flow| &flow.id == id).cloned())
    }

    async fn save(&self, flow: ApprovalFlow) -> Result<(), RepositoryError> {
        let mut flows = self.flows.write().await;
        upsert_flow(&mut flows, flow);
        Ok(())
    }

    async fn delete(&self, id: &FlowId) -> Result<bool, RepositoryError> {
        let mut flows = self.flows.write().await;
        Ok(remove_flow(&mut flows, id))
    }
}
