//! The single enforcement point for identifier interpolation.
//!
//! Table and column names are not known at statement-bind time, and the wire
//! protocol cannot parameterize identifiers, so they must be spliced into SQL
//! text. Every call site that does so goes through this module; nothing else
//! in the workspace concatenates request strings into statements.
//!
//! The checks assume identifiers come from a trusted administrative context
//! (see the crate docs) — they are a backstop against statement breakout, not
//! a substitute for authentication in front of this core.

use dataforge_commons::{DataForgeError, Result};

/// Validate a table/column/constraint name for direct interpolation.
///
/// Accepts the engine's unquoted-identifier grammar: a leading ASCII letter
/// or underscore followed by letters, digits, underscores, or `$`.
pub fn safe_ident(name: &str) -> Result<&str> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        }
        _ => false,
    };
    if valid {
        Ok(name)
    } else {
        Err(DataForgeError::invalid_input(format!(
            "invalid identifier: '{}'",
            name
        )))
    }
}

/// Validate a free-form SQL fragment (a type string such as `VARCHAR(255)`,
/// or a privilege keyword) for interpolation.
///
/// Looser than [`safe_ident`]: parentheses, digits, commas, and spaces are
/// legitimate in type syntax. Statement terminators, quotes, comment tokens,
/// and control characters are not.
pub fn safe_fragment(fragment: &str) -> Result<&str> {
    let trimmed = fragment.trim();
    if trimmed.is_empty() {
        return Err(DataForgeError::invalid_input("empty SQL fragment"));
    }
    let forbidden = trimmed.chars().any(|c| {
        matches!(c, ';' | '\'' | '"' | '`' | '\\') || c.is_control()
    }) || trimmed.contains("--")
        || trimmed.contains("/*");
    if forbidden {
        return Err(DataForgeError::invalid_input(format!(
            "invalid SQL fragment: '{}'",
            fragment
        )));
    }
    Ok(fragment)
}
