//! Core use-case services.
//!
//! # Responsibility
//! - Validate enrollment selections before any write.
//! - Orchestrate repository calls into the CRUD operation surface.
//! - Keep external adapters (HTTP/UI) decoupled from storage details.

pub mod enrollment;
pub mod student_service;
