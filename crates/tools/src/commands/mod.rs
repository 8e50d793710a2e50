//! Subcommands of the `minipic` binary.

pub mod inspect;
pub mod list;
pub mod validate;
