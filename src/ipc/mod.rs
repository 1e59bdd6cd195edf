mod error;
mod handlers;
mod helpers;
mod router;
mod types;

pub use router::{handle_line, handle_request, serve};
pub use types::{AppState, Request};
