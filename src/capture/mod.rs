//! Base image acquisition module
//!
//! This module consolidates:
//! - The base image type (image.rs)
//! - Stitching viewport captures into a page image (stitch.rs)

pub mod image;
pub mod stitch;
