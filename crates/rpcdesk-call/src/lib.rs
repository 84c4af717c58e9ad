//! Turning a resolved request schema into an executed call.
//!
//! - [`RequestBody`]: the fill-in form for a method's request fields,
//!   serialized to the JSON payload grpcurl expects.
//! - [`substitute`]: `{{name}}` environment variable expansion.
//! - [`GrpcurlExecutor`]: builds the grpcurl argument vector and runs it,
//!   capturing exit status and output.

pub mod body;
pub mod command;
pub mod vars;

pub use body::{FormField, RequestBody};
pub use command::{CallExecutor, CallOutcome, CallRequest, GrpcurlExecutor};
pub use vars::{referenced_variables, substitute};

#[derive(Debug, thiserror::Error)]
pub enum CallError {
    #[error("Missing required fields (Protoset, Server, or Call Name).")]
    MissingRequired,
    #[error("`{0}` is not a field of the request message")]
    UnknownField(String),
}
