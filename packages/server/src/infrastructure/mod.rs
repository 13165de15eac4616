//! Infrastructure layer: concrete implementations behind domain traits, and
//! loading of external resources.

pub mod banner;
pub mod dto;
pub mod registry;
