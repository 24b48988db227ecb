pub mod builder;
pub mod lifecycle;
pub mod seed;

pub use builder::{StageDraft, StageMove, DEFAULT_AUTO_APPROVE_UNDER};
pub use lifecycle::FlowTransitionError;
pub use seed::default_flows;
