mod handlers;
mod reply;
mod router;
mod serve;
mod types;

pub use reply::{err, ok, ErrorBody, Reply};
pub use router::handle_request;
pub use serve::serve;
pub use types::{AppState, Request};
