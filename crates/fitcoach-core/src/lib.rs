//! Domain logic for fitcoach.
//!
//! - [`catalog`]: exercise templates, TOML catalog import, the built-in library.
//! - [`plan`]: the workout plan generator, spreadsheet serializer, and the
//!   service layer that ties them to the database.
//! - [`account`]: user and coach accounts, login, coach assignment.

pub mod account;
pub mod catalog;
pub mod plan;
