//! Fragment Sanitization
//!
//! The server escapes spaces (`&nbsp`) and newlines (`\n`) so fragments
//! survive SSE framing, and quoted text can straddle a chunk boundary right
//! at a markdown bold marker. Accumulation therefore re-normalizes the
//! whole buffer on every fragment, which requires `normalize` to be
//! idempotent: re-running it on already-normalized text must not alter it.

/// Normalizes transport-escaped text into display-ready text.
///
/// Rules, in order:
/// 1. literal `&nbsp` becomes a space
/// 2. the two-character escape `\n` becomes a line break
/// 3. a `"` directly before or after `**` gains a backslash escape,
///    unless one is already present
pub fn normalize(text: &str) -> String {
    let text = text.replace("&nbsp", " ").replace("\\n", "\n");
    escape_bold_quotes(&text)
}

/// Appends a fragment to an already-normalized buffer.
///
/// Normalizing the concatenation (rather than the fragment alone) heals
/// escape sequences split across a chunk boundary, e.g. a trailing `\`
/// in one fragment and a leading `n` in the next.
pub fn accumulate(buffer: &str, fragment: &str) -> String {
    let mut combined = String::with_capacity(buffer.len() + fragment.len());
    combined.push_str(buffer);
    combined.push_str(fragment);
    normalize(&combined)
}

/// Escapes a double-quote adjacent to a bold marker (`"**` or `**"`) so
/// quoted text cannot break markdown emphasis. Already-escaped quotes are
/// left alone, which is what makes the pass idempotent.
fn escape_bold_quotes(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());

    for (i, &c) in chars.iter().enumerate() {
        if c == '"' {
            let already_escaped = i > 0 && chars[i - 1] == '\\';
            let before_bold = chars.get(i + 1) == Some(&'*') && chars.get(i + 2) == Some(&'*');
            let after_bold = i >= 2 && chars[i - 1] == '*' && chars[i - 2] == '*';
            if !already_escaped && (before_bold || after_bold) {
                out.push('\\');
            }
        }
        out.push(c);
    }

    out
}
