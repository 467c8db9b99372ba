//! Shared test utilities for the domain-manager workspace.
//!
//! This crate provides standardised test fixtures to eliminate duplication
//! across crate test suites. It is a dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`fixtures`]: domain configuration documents and test people
//! - [`workspace`]: [`TestWorkspace`](workspace::TestWorkspace) builder for
//!   on-disk workspaces

pub mod fixtures;
pub mod workspace;
