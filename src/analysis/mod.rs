/// Analysis domain layer: requests, help text, command lines, expected outputs.
pub mod cmdline;
pub mod errors;
pub mod help;
pub mod outputs;
pub mod request;
pub mod request_file;

pub use cmdline::build_args;
pub use errors::AnalysisError;
pub use help::{interface_doc, render_help};
pub use outputs::expected_outputs;
pub use request::{AnalysisRequest, FirstLevelRequest, IcaRequest, InterfaceKind};
pub use request_file::load_request;
