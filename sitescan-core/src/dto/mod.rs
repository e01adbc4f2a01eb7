//! Data Transfer Objects for communication with the analysis backend
//!
//! DTOs mirror the JSON bodies of the submission and health endpoints. Status
//! and result bodies are modelled in [`crate::domain`] because the watcher
//! interprets them.

pub mod scan;
