//! Small shared helpers: name validation and external collaborator lookup.

use std::env;

/// Check that a session name is filesystem-safe: a letter followed by
/// letters, digits, underscores, or dashes.
pub fn valid_session_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// The user's editor, `vi` if `$EDITOR` is unset or empty.
pub fn editor() -> String {
    match env::var("EDITOR") {
        Ok(editor) if !editor.trim().is_empty() => editor,
        _ => "vi".to_owned(),
    }
}
