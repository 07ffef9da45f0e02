//! Pure domain types with minimal dependencies
//!
//! This module contains core types used throughout the application.
//! Types here should not depend on the renderer or the editor session.

pub mod annotation;
pub mod geometry;
pub mod selection;

pub use annotation::*;
pub use geometry::*;
pub use selection::*;
