//! Subcommand implementations.

pub mod call;
pub mod methods;
pub mod page;
pub mod profile;
pub mod recent;
pub mod search;
pub mod version;
