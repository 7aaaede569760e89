//! Subcommands and the plumbing they share.

pub mod config;
pub mod consolidate;
pub mod extract;
pub mod rules;

mod input;
mod output;
mod store;
