//! Core library for the `surge` CLI.
//!
//! This crate provides the building blocks used by the binary: CLI argument
//! types, configuration parsing, the worker and dispatcher, result
//! collection and percentile aggregation, run orchestration, and output
//! sinks. The primary user-facing interface is the `surge` command-line
//! application.
pub mod app;
pub mod args;
pub mod config;
pub mod domain;
pub mod error;
pub mod http;
pub mod metrics;
pub mod sinks;
