/// CLI layer: clap definitions and stdout/stderr rendering.
pub mod args;
pub mod output;

pub use args::{Cli, ExecFlags, OutputFormat};
pub use output::{OutputCtx, write_error};
