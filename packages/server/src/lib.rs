//! Line-oriented TCP group chat server.
//!
//! Clients connect with a plain stream socket (e.g. `nc`), pick a unique display
//! name and exchange `\n`-terminated messages that are fanned out to every other
//! connected client. Newcomers receive the full transcript first.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
