//! Full-page screenshot annotation editor
//!
//! Stitches viewport captures into one page image, lets annotations be drawn
//! over it, and flattens the result for export.

pub mod annotations;
pub mod capture;
pub mod config;
pub mod core;
pub mod domain;
pub mod export;
pub mod render;
pub mod session;
