//! Domain entities shared across the application.

pub mod report;
pub mod tool;

pub use report::{InstallOutcome, InvocationResult, PrereqReport, SendOutcome, ToolStatus};
pub use tool::{Invocation, ToolKind};
