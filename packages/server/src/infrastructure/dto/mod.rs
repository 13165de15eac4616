//! Data Transfer Objects (DTOs) for the HTTP status endpoint.

pub mod conversion;
pub mod http;
