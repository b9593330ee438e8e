//! Subcommand handlers, one module per resource

pub mod account;
pub mod auth;
pub mod card;
pub mod ledger;
pub mod user;
