//! Inline span parsing.
//!
//! Each trigger byte has a handler in the parser's dispatch table. A handler
//! gets the whole span plus the offset of its trigger byte and returns how
//! many bytes it consumed; 0 means the byte is ordinary text after all.
use crate::options::Extensions;
use crate::parser::Parser;
use crate::renderer::Renderer;
use crate::util::{is_backslash_escaped, is_punct, is_space};

/// Characters that a backslash turns into literal text
const ESCAPE_CHARS: &[u8] = b"\\`*_{}[]()#+-.!:|&<>~";

impl Parser {
    /// Render the spans of `data`
    pub(crate) fn inline(&mut self, r: &mut dyn Renderer, out: &mut String, data: &str) {
        self.nested(|p| {
            let bytes = data.as_bytes();
            let mut i = 0;
            let mut end = 0;

            while i < bytes.len() {
                // copy inactive chars into the output
                while end < bytes.len() && p.inline_callback[usize::from(bytes[end])].is_none() {
                    end += 1;
                }
                if end > i {
                    r.normal_text(out, &data[i..end]);
                }
                if end >= bytes.len() {
                    break;
                }
                i = end;

                let Some(handler) = p.inline_callback[usize::from(bytes[end])] else {
                    break;
                };
                let consumed = handler(p, r, out, data, i);
                if consumed == 0 {
                    // buffer the byte for the next plain run
                    end = i + 1;
                } else {
                    i += consumed;
                    end = i;
                }
            }
        });
    }
}

/// `\` followed by a markup character
pub(crate) fn escape(
    _p: &mut Parser,
    r: &mut dyn Renderer,
    out: &mut String,
    data: &str,
    offset: usize,
) -> usize {
    let data = &data[offset..];
    match data.as_bytes().get(1) {
        Some(c) if ESCAPE_CHARS.contains(c) => {
            r.normal_text(out, &data[1..2]);
            2
        }
        _ => 0,
    }
}

/// `*`, `_` and `~` runs of one to three markers
pub(crate) fn emphasis(
    p: &mut Parser,
    r: &mut dyn Renderer,
    out: &mut String,
    data: &str,
    offset: usize,
) -> usize {
    let data = &data[offset..];
    let bytes = data.as_bytes();
    let c = bytes[0];

    // *text*
    if bytes.len() > 2 && bytes[1] != c {
        if c == b'~' || is_space(bytes[1]) {
            return 0;
        }
        return match helper_emphasis(p, r, out, &data[1..], c) {
            0 => 0,
            n => n + 1,
        };
    }

    // **text**
    if bytes.len() > 3 && bytes[1] == c && bytes[2] != c {
        if is_space(bytes[2]) {
            return 0;
        }
        return match helper_double_emphasis(p, r, out, &data[2..], c) {
            0 => 0,
            n => n + 2,
        };
    }

    // ***text***
    if bytes.len() > 4 && bytes[1] == c && bytes[2] == c && bytes[3] != c {
        if c == b'~' || is_space(bytes[3]) {
            return 0;
        }
        return match helper_triple_emphasis(p, r, out, data, 3, c) {
            0 => 0,
            n => n + 3,
        };
    }

    0
}

/// Position of the next `c` at or after `from` that is not backslash-escaped
fn find_emph_char(data: &[u8], from: usize, c: u8) -> Option<usize> {
    let mut i = from;
    while i < data.len() {
        if data[i] == c && !is_backslash_escaped(data, i) {
            return Some(i);
        }
        i += 1;
    }
    None
}

/// Match a single marker. `data` starts right after the opener; returns the
/// bytes consumed including the closer, or 0.
fn helper_emphasis(
    p: &mut Parser,
    r: &mut dyn Renderer,
    out: &mut String,
    data: &str,
    c: u8,
) -> usize {
    let bytes = data.as_bytes();

    // entered from a triple run: the first two markers are already spoken for
    let mut i = if bytes.len() > 1 && bytes[0] == c && bytes[1] == c { 2 } else { 0 };

    while let Some(found) = find_emph_char(bytes, i, c) {
        i = found;

        // a longer run belongs to some other span
        if i + 1 < bytes.len() && bytes[i + 1] == c {
            while i < bytes.len() && bytes[i] == c {
                i += 1;
            }
            continue;
        }

        // whitespace before the marker makes it an opener, not a closer
        if i == 0 || is_space(bytes[i - 1]) {
            return 0;
        }

        if p.flags.contains(Extensions::NO_INTRA_EMPHASIS) {
            let next = bytes.get(i + 1).copied();
            if !next.is_none_or(|b| is_space(b) || is_punct(b)) {
                return 0;
            }
        }

        let mut work = String::new();
        p.inline(r, &mut work, &data[..i]);
        r.emphasis(out, &work);
        return i + 1;
    }

    0
}

/// Match a marker pair. `data` starts right after the opener.
fn helper_double_emphasis(
    p: &mut Parser,
    r: &mut dyn Renderer,
    out: &mut String,
    data: &str,
    c: u8,
) -> usize {
    let bytes = data.as_bytes();
    let mut i = 0;

    while let Some(found) = find_emph_char(bytes, i, c) {
        i = found;

        if i + 1 < bytes.len() && bytes[i + 1] == c && i > 0 && !is_space(bytes[i - 1]) {
            let mut work = String::new();
            p.inline(r, &mut work, &data[..i]);
            if !work.is_empty() {
                if c == b'~' {
                    r.strikethrough(out, &work);
                } else {
                    r.double_emphasis(out, &work);
                }
            }
            return i + 2;
        }
        i += 1;
    }

    0
}

/// Match a run of three markers. `data` starts at the opener, whose length is
/// `offset`. A shorter closer hands the span to the single or double matcher.
fn helper_triple_emphasis(
    p: &mut Parser,
    r: &mut dyn Renderer,
    out: &mut String,
    data: &str,
    offset: usize,
    c: u8,
) -> usize {
    let text = &data[offset..];
    let bytes = text.as_bytes();
    let mut i = 0;

    while let Some(found) = find_emph_char(bytes, i, c) {
        i = found;

        if i == 0 || is_space(bytes[i - 1]) {
            return 0;
        }

        if i + 2 < bytes.len() && bytes[i + 1] == c && bytes[i + 2] == c {
            let mut work = String::new();
            p.inline(r, &mut work, &text[..i]);
            if !work.is_empty() {
                r.triple_emphasis(out, &work);
            }
            return i + 3;
        }

        if i + 1 < bytes.len() && bytes[i + 1] == c {
            // closes the outer single; the inner pair is matched on the way
            return match helper_emphasis(p, r, out, &data[offset - 2..], c) {
                0 => 0,
                n => n - 2,
            };
        }

        // closes the outer pair
        return match helper_double_emphasis(p, r, out, &data[offset - 1..], c) {
            0 => 0,
            n => n - 1,
        };
    }

    0
}

/// `` ` `` fences of any length
pub(crate) fn code_span(
    _p: &mut Parser,
    r: &mut dyn Renderer,
    out: &mut String,
    data: &str,
    offset: usize,
) -> usize {
    let data = &data[offset..];
    let bytes = data.as_bytes();

    let nb = bytes.iter().take_while(|&&b| b == b'`').count();

    // find a closing run of exactly the same length
    let mut i = nb;
    let mut close = None;
    while i < bytes.len() {
        if bytes[i] != b'`' {
            i += 1;
            continue;
        }
        let run_start = i;
        while i < bytes.len() && bytes[i] == b'`' {
            i += 1;
        }
        if i - run_start == nb {
            close = Some(run_start);
            break;
        }
    }

    let Some(close) = close else {
        return 0;
    };

    let mut content = &data[nb..close];
    if content.len() >= 2 && content.starts_with(' ') && content.ends_with(' ') {
        content = &content[1..content.len() - 1];
    }
    r.code_span(out, content);

    close + nb
}

/// `\n` inside a span: a hard break or a plain newline
pub(crate) fn line_break(
    p: &mut Parser,
    r: &mut dyn Renderer,
    out: &mut String,
    data: &str,
    offset: usize,
) -> usize {
    let trimmed = out.trim_end_matches(' ').len();
    out.truncate(trimmed);

    let bytes = data.as_bytes();
    let two_spaces = offset >= 2 && bytes[offset - 2] == b' ' && bytes[offset - 1] == b' ';
    let backslash = p.flags.contains(Extensions::BACKSLASH_LINE_BREAK)
        && is_backslash_escaped(bytes, offset);

    if !(p.flags.contains(Extensions::HARD_LINE_BREAK) || two_spaces || backslash) {
        return 0;
    }

    if backslash && out.ends_with('\\') {
        out.pop();
    }
    r.line_break(out);
    1
}
