//! aircap
//!
//! Table-driven CLI front end for packet-capture tooling: launches and stops
//! an external wireless-survey daemon, captures its live stream into timed
//! segment files, and extracts deduplicated field tables from capture files
//! via an external dissector.
//!
//! This crate provides the core implementation for the `aircap` CLI tool;
//! the modules are public so the integration tests can exercise them.

pub mod bulk;
pub mod cleanup;
pub mod commands;
pub mod hints;
pub mod pipeline;
pub mod report;
pub mod tools;
pub mod utils;
