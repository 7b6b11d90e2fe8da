//! Tutor Service Library Crate
//!
//! Configuration loading and the stdio runtime that hosts the tutor agent.
//! The `tutor` binary is a thin wrapper around this library.

pub mod config;
pub mod runtime;
