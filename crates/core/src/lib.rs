pub mod approvals;
pub mod audit;
pub mod config;
pub mod console;
pub mod domain;
pub mod errors;
pub mod flows;
pub mod money;

pub use approvals::{simulate, ApprovalEvaluator, DeterministicApprovalEvaluator};
pub use console::{ConsoleSession, Toast, ToastTone};
pub use domain::approval::{
    ApprovalFlow, ApprovalStage, FlowId, FlowStatus, NotifyChannel, StageId, StageType, Threshold,
};
pub use domain::scenario::{RequesterRole, Scenario};
pub use domain::simulation::{Decision, SimulationResult, StageProjection};
pub use errors::{ApplicationError, DomainError, InterfaceError};
pub use flows::{FlowTransitionError, StageDraft, StageMove};
pub use money::format_amount;
