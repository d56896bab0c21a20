//! RFC 5545 text escaping and line folding.

/// Maximum content line length in octets, excluding the CRLF.
const MAX_LINE_OCTETS: usize = 75;

/// Line break that separates and folds content lines.
pub const CRLF: &str = "\r\n";

/// Escapes a TEXT property value.
///
/// Backslash, comma and semicolon are backslash-escaped, newlines become
/// `\n`, and carriage returns are dropped.
pub fn escape_text(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            '\r' => {}
            ',' => escaped.push_str("\\,"),
            ';' => escaped.push_str("\\;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Folds a content line to 75 octets.
///
/// Continuation lines start with a single space, which counts toward their
/// length. Breaks only fall on UTF-8 character boundaries.
pub fn fold_line(line: &str) -> String {
    if line.len() <= MAX_LINE_OCTETS {
        return line.to_string();
    }

    let mut folded = String::with_capacity(line.len() + line.len() / MAX_LINE_OCTETS * 3);
    let mut current_len = 0;

    for c in line.chars() {
        let char_len = c.len_utf8();
        if current_len + char_len > MAX_LINE_OCTETS {
            folded.push_str(CRLF);
            folded.push(' ');
            current_len = 1;
        }
        folded.push(c);
        current_len += char_len;
    }

    folded
}
