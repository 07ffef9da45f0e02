//! Core application module
//!
//! This module contains:
//! - Application entry point: load, annotate, export
//! - Command-line parsing
//! - Script replay

pub mod app;
pub mod cli;
pub mod script;
