pub mod orchestration;

pub use orchestration::{run_bump_workflow, BumpArgs, UsageError, WorkflowOutcome, WorkflowResult};
