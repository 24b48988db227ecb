use async_trait::async_trait;
use thiserror::Error;

use corpay_core::domain::approval::{ApprovalFlow, FlowId};
use corpay_core::errors::ApplicationError;

pub mod kv;
pub mod memory;

pub use kv::{KvApprovalFlowRepository, SqlKeyValueStore, APPROVAL_FLOWS_KEY};
pub use memory::InMemoryApprovalFlowRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
    #[error("encode error: {0}")]
    Encode(String),
}

impl From<RepositoryError> for ApplicationError {
    fn from(error: RepositoryError) -> Self {
        ApplicationError::Persistence(error.to_string())
    }
}

/// Storage for approval flows. The list order is the console's display
/// order and is preserved across saves.
#[async_trait]
pub trait ApprovalFlowRepository: Send + Sync {
    async fn load(&self) -> Result<Vec<ApprovalFlow>, RepositoryError>;

    async fn find_by_id(&self, id: &FlowId) -> Result<Option<ApprovalFlow>, RepositoryError> {
        Ok(self.load().await?.into_iter().find(|flow| &flow.id == id))
    }

    /// Replaces the flow with the same id in place, or appends it.
    async fn save(&self, flow: ApprovalFlow) -> Result<(), RepositoryError>;

    /// Returns whether a flow was removed.
    async fn delete(&self, id: &FlowId) -> Result<bool, RepositoryError>;
}

pub(crate) fn upsert_flow(flows: &mut Vec<ApprovalFlow>, flow: ApprovalFlow) {
    match flows.iter_mut().find(|existing| existing.id == flow.id) {
        Some(existing) => *existing = flow,
        None => flows.push(flow),
    }
}

pub(crate) fn remove_flow(flows: &mut Vec<ApprovalFlow>, id: &FlowId) -> bool {
    let before = flows.len();
    flows.retain(|flow| &flow.id != id);
    flows.len() != before
}
