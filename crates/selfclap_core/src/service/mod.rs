//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into diary/task use-cases.
//! - Keep the CLI decoupled from storage details.

pub mod diary_service;
pub mod task_service;
