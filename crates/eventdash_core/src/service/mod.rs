//! Use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into the operations a UI consumes.
//! - Keep presentation layers decoupled from storage details.

pub mod dashboard;
