pub mod envelope;
pub mod handlers;
pub mod response;
pub mod router;
pub mod routes;

pub use envelope::{RequestEnvelope, ResponseEnvelope};
pub use router::dispatch;
pub use routes::create_http_routes;
