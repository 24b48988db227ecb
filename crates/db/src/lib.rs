pub mod connection;
pub mod migrations;
pub mod repositories;
pub mod service;

pub use connection::{connect, connect_from_config, connect_with_settings, DbPool};
pub use repositories::{
    ApprovalFlowRepository, InMemoryApprovalFlowRepository, KvApprovalFlowRepository,
    RepositoryError,
};
pub use service::ApprovalFlowService;
