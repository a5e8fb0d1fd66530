/// BROCCOLI tool layer: binary discovery and process execution.
pub mod errors;
pub mod locate;
pub mod runner;

pub use errors::ToolError;
pub use locate::{LocationSource, has_subdir, locate_tool};
pub use runner::{Capture, Invocation, ProcessRunner, RawOutput, Runner};
