//! Subcommands of the `mazeq` binary

pub mod benchmark;
pub mod inspect;
pub mod train;
