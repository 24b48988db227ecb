pub mod approval;
pub mod scenario;
pub mod simulation;
