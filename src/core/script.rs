//! Recorded input scripts
//!
//! A script is a JSON array of editor messages, replayed in order.

use std::path::Path;

use anyhow::Context;

use crate::session::editor::Editor;
use crate::session::messages::EditorMsg;

pub fn parse_script(raw: &str) -> anyhow::Result<Vec<EditorMsg>> {
    serde_json::from_str(raw).context("Invalid editor script")
}

pub fn load_script(path: &Path) -> anyhow::Result<Vec<EditorMsg>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read script {}", path.display()))?;
    parse_script(&raw).with_context(|| format!("In script {}", path.display()))
}

/// Feed every message to the editor; returns how many were processed
pub fn replay(editor: &mut Editor, msgs: Vec<EditorMsg>) -> usize {
    let count = msgs.len();
    for msg in msgs {
        log::debug!("Replaying {msg:?}");
        editor.update(msg);
    }
    count
}
