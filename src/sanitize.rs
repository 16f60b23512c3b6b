// SPDX-License-Identifier: MIT

//! HTML escaping for echoing condition text back to the author

/// Escape `<`, `>`, `"` and `'` so the text renders literally in markup.
///
/// `&` is passed through unchanged.
pub fn sanitize_for_display(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
