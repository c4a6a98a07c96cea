//! stale-scope library: cross-project transitive stale-dependency resolution.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod domain;
pub mod server;
