//! Annotation construction and picking
//!
//! This module provides:
//! - Building annotations from the tool parameters (handlers.rs)
//! - Restyling existing annotations (handlers.rs)
//! - Hit-testing and topmost-shape lookup (hit_test.rs)

pub mod handlers;
pub mod hit_test;
