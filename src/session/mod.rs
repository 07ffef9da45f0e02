//! Annotation editor session module
//!
//! This module contains:
//! - The editor state machine (editor.rs)
//! - Document and history state (state.rs)
//! - Message types and keyboard shortcuts
//! - The text-edit overlay

pub mod editor;
pub mod messages;
pub mod shortcuts;
pub mod state;
pub mod text_edit;
