//! Application-level configuration.
//!
//! - [`OrchestrationParams`]: run loop bounds, caps and timeouts
//! - [`RoleModels`]: which model each agent role calls

pub mod orchestration_params;
pub mod role_models;

pub use orchestration_params::OrchestrationParams;
pub use role_models::RoleModels;
