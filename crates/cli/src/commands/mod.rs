//! fp-cli subcommand implementations.

pub mod call;
