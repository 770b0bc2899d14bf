//! Text normalization applied to everything sent to the ticket tracker, which rejects
//! multi-line and control-character input.

fn is_transmittable(c: char) -> bool {
    matches!(c, '\u{20}'..='\u{7E}') || c >= '\u{A0}'
}

fn is_space(c: char) -> bool {
    c.is_whitespace() || c == '\u{FEFF}'
}

/// Replaces control and non-printable characters with a space, collapses whitespace runs to a
/// single space and trims both ends.
pub fn clean_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;

    for c in text.chars() {
        if !is_transmittable(c) || is_space(c) {
            pending_space = true;
            continue;
        }
        if pending_space && !out.is_empty() {
            out.push(' ');
        }
        pending_space = false;
        out.push(c);
    }

    out
}

/// True when `text` is already in the shape [`clean_text`] produces.
pub fn is_clean(text: &str) -> bool {
    clean_text(text) == text
}
