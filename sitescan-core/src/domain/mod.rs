//! Core domain types
//!
//! This module contains the structures shared by the HTTP client, the job
//! watcher and the rendering front-end. The view model in [`view`] is the only
//! shape renderers are expected to depend on.

pub mod error;
pub mod job;
pub mod payload;
pub mod view;
