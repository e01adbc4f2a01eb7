//! Sitescan Core
//!
//! Core types and pure logic for the Sitescan website-analysis client.
//!
//! This crate contains:
//! - Domain types: job lifecycle, result payload sections, error descriptors
//!   and the render-ready view model
//! - DTOs: request/response shapes exchanged with the analysis backend
//!
//! Nothing in here performs I/O. The HTTP client and the polling loop live in
//! `sitescan-client` and `sitescan-watcher`.

pub mod domain;
pub mod dto;
