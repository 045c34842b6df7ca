//! Subcommand implementations.

pub mod capacity;
pub mod extract;
pub mod issue;
pub mod keygen;
pub mod verify;
