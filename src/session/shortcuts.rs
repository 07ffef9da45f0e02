use crate::session::messages::{EditorMsg, Key, Modifiers, Named};

/// Translate a key press into an editor message
///
/// While a text edit is open, Enter commits and Escape cancels it, and the
/// delete keys edit the field instead of the document. Undo and redo work in
/// either case.
pub fn handle_key_event(key: &Key, modifiers: Modifiers, text_editing: bool) -> Option<EditorMsg> {
    match key {
        Key::Named(Named::Enter) if text_editing => Some(EditorMsg::TextCommit),
        Key::Named(Named::Escape) if text_editing => Some(EditorMsg::TextCancel),
        Key::Named(Named::Delete | Named::Backspace) if !text_editing => {
            Some(EditorMsg::DeleteSelected)
        }
        // Undo/redo shortcuts
        Key::Character(c)
            if c.eq_ignore_ascii_case("z") && modifiers.command() && !modifiers.shift() =>
        {
            Some(EditorMsg::Undo)
        }
        Key::Character(c)
            if (c.eq_ignore_ascii_case("y") && modifiers.command())
                || (c.eq_ignore_ascii_case("z") && modifiers.command() && modifiers.shift()) =>
        {
            Some(EditorMsg::Redo)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctrl() -> Modifiers {
        Modifiers {
            ctrl: true,
            ..Default::default()
        }
    }

    fn character(c: &str) -> Key {
        Key::Character(c.to_string())
    }

    #[test]
    fn test_history_shortcuts() {
        assert_eq!(handle_key_event(&character("z"), ctrl(), false), Some(EditorMsg::Undo));
        let cmd_shift = Modifiers {
            meta: true,
            shift: true,
            ..Default::default()
        };
        // Shift often reports the uppercase character
        assert_eq!(handle_key_event(&character("Z"), cmd_shift, false), Some(EditorMsg::Redo));
        assert_eq!(handle_key_event(&character("y"), ctrl(), false), Some(EditorMsg::Redo));
        assert_eq!(handle_key_event(&character("z"), Modifiers::default(), false), None);
    }

    #[test]
    fn test_delete_keys() {
        for named in [Named::Delete, Named::Backspace] {
            assert_eq!(
                handle_key_event(&Key::Named(named), Modifiers::default(), false),
                Some(EditorMsg::DeleteSelected)
            );
        }
    }

    #[test]
    fn test_text_edit_keys() {
        let none = Modifiers::default();
        assert_eq!(handle_key_event(&Key::Named(Named::Delete), none, true), None);
        assert_eq!(handle_key_event(&Key::Named(Named::Backspace), none, true), None);
        assert_eq!(handle_key_event(&character("z"), ctrl(), true), Some(EditorMsg::Undo));
        assert_eq!(handle_key_event(&character("y"), ctrl(), true), Some(EditorMsg::Redo));
        assert_eq!(handle_key_event(&character("z"), none, true), None);
        assert_eq!(
            handle_key_event(&Key::Named(Named::Enter), none, true),
            Some(EditorMsg::TextCommit)
        );
        assert_eq!(
            handle_key_event(&Key::Named(Named::Escape), none, true),
            Some(EditorMsg::TextCancel)
        );
        // Enter outside an edit does nothing
        assert_eq!(handle_key_event(&Key::Named(Named::Enter), none, false), None);
    }
}
