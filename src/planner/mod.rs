// Module declarations
pub(crate) mod allocator;
pub(crate) mod planner_model;
pub(crate) mod planner_service;

// Re-export the public interface
pub use allocator::{allocate, PlanInput};
pub use planner_model::{Plan, PlanMode, PlanRow};
pub use planner_service::PlannerService;

#[cfg(test)]
pub(crate) mod tests;
