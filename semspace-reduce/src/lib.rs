//! semspace reduction service
//!
//! Reads one JSON request per line from stdin, reduces embeddings to 3D with
//! [`semspace_core`], tracks the session's walk path, and writes one JSON
//! response per line to stdout. Logs go to stderr.

pub mod cli;
pub mod handlers;
pub mod logging;
pub mod service;

pub use handlers::{HandlerContext, HandlerError, JsonResponse};
pub use service::ReduceService;
