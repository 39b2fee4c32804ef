//! Core domain crate for the hireloop job board.
//!
//! Employers publish jobs, candidates apply, applications are ranked by a
//! skill-match score, and interview transcripts are evaluated through an
//! injected analyzer adapter. Persistence and notification delivery sit
//! behind traits so the workflows can be exercised without external systems.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
