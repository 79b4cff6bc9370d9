//! # Fruitbench Binary Library
//!
//! The library surface of the fruitbench binary. The CLI module is public
//! so integration tests can drive command implementations directly.

pub mod cli;
