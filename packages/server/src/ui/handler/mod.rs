//! Connection and HTTP handlers.

mod http;
mod session;

pub use http::{get_status, health_check};
pub use session::handle_connection;
