/// `describe` command: print the documentation of an interface.
use crate::analysis::{AnalysisError, interface_doc};
use crate::cli::OutputCtx;
use crate::cli::args::DescribeArgs;
use crate::cli::output::write_doc;

/// Run `broccoli-run describe`.
///
/// # Errors
///
/// Cannot currently fail.
pub fn run(args: &DescribeArgs, ctx: &OutputCtx) -> Result<(), AnalysisError> {
    write_doc(&interface_doc(args.interface), ctx);
    Ok(())
}
