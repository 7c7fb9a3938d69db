//! Quote bare identifiers in quasi-JSON geometry text.
//!
//! Fence geometry arrives as e.g.
//!
//! ```text
//! {type: Polygon, coordinates: [[[4600000, 3200000], [4610000, 3200000], …]]}
//! ```
//!
//! The repair is one left-to-right scan:
//!
//! - characters inside an existing `"…"` string (escapes included) are copied
//!   untouched;
//! - every maximal bare word (alphanumerics and `_`) is wrapped in quotes,
//!   unless it is all ASCII digits, in which case it stays a number.
//!
//! Exponent literals such as `1e5` are words that are not all digits, so they
//! come out as the string `"1e5"`.  `12.5` survives because `12` and `5` are
//! separate digit-only words.

/// Repair `input` so that `serde_json` can parse it.
pub fn repair_geometry_text(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + input.len() / 4);
    let mut chars = input.char_indices().peekable();

    while let Some((start, c)) = chars.next() {
        if c == '"' {
            out.push(c);
            copy_string_body(&mut chars, &mut out);
        } else if is_word_char(c) {
            let mut end = start + c.len_utf8();
            while let Some(&(i, next)) = chars.peek() {
                if !is_word_char(next) {
                    break;
                }
                end = i + next.len_utf8();
                chars.next();
            }
            push_word(&input[start..end], &mut out);
        } else {
            out.push(c);
        }
    }
    out
}

#[inline]
fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn push_word(word: &str, out: &mut String) {
    if word.bytes().all(|b| b.is_ascii_digit()) {
        out.push_str(word);
    } else {
        out.push('"');
        out.push_str(word);
        out.push('"');
    }
}

/// Copy through the closing quote of a string whose opening quote has
/// already been emitted.  An unterminated string runs to end of input.
fn copy_string_body<I>(chars: &mut std::iter::Peekable<I>, out: &mut String)
where
    I: Iterator<Item = (usize, char)>,
{
    let mut escaped = false;
    for (_, c) in chars.by_ref() {
        out.push(c);
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '"' => return,
            _ => {}
        }
    }
}
