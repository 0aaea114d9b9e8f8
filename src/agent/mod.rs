//! Job orchestration
//!
//! Ties the pipeline together around a browser tool session: retry-wrapped
//! tool calls, interaction replay, page loading, and the coordinator that
//! produces the final envelope.

mod coordinator;
mod interactions;
mod page;
mod retry;

pub use coordinator::{run_job, Coordinator};
pub use interactions::InteractionRunner;
pub use page::PageLoader;
pub use retry::RetryPolicy;
