//! Block-level parsing: headers and paragraphs
use crate::options::Extensions;
use crate::parser::Parser;
use crate::renderer::Renderer;
use crate::slug::sanitized_anchor_name;
use crate::util::{is_backslash_escaped, skip_char, skip_until_char};

impl Parser {
    /// Parse block-level `data`, one construct at a time.
    ///
    /// `data` must end with a newline; every scanner below relies on it.
    pub(crate) fn block(&mut self, r: &mut dyn Renderer, out: &mut String, data: &str) {
        assert!(
            data.ends_with('\n'),
            "block input is missing terminating newline"
        );

        self.nested(|p| {
            let mut data = data;
            while !data.is_empty() {
                // # Header 1
                // ...
                // ###### Header 6
                if p.is_prefix_header(data) {
                    data = &data[p.prefix_header(r, out, data)..];
                    continue;
                }

                let blank = is_empty(data);
                if blank > 0 {
                    data = &data[blank..];
                    continue;
                }

                data = &data[p.paragraph(r, out, data)..];
            }
        });
    }

    fn is_prefix_header(&self, data: &str) -> bool {
        let bytes = data.as_bytes();
        if bytes.first() != Some(&b'#') {
            return false;
        }

        if self.flags.contains(Extensions::SPACE_HEADERS) {
            let mut level = 0;
            while level < 6 && level < bytes.len() && bytes[level] == b'#' {
                level += 1;
            }
            if bytes.get(level) != Some(&b' ') {
                return false;
            }
        }
        true
    }

    /// Render an ATX header and return the number of bytes it spans
    fn prefix_header(&mut self, r: &mut dyn Renderer, out: &mut String, data: &str) -> usize {
        let bytes = data.as_bytes();
        let mut level = 0;
        while level < 6 && bytes[level] == b'#' {
            level += 1;
        }

        let start = skip_char(bytes, level, b' ');
        let mut end = skip_until_char(bytes, start, b'\n');
        let mut skip = end;
        let mut id = None;

        if self.flags.contains(Extensions::HEADER_IDS) {
            if let Some(open) = data[start..end].find("{#").map(|j| start + j) {
                if let Some(close) = data[open + 2..end].find('}').map(|k| open + 2 + k) {
                    id = Some(data[open + 2..close].to_string());
                    end = open;
                    skip = close + 1;
                    while end > start && bytes[end - 1] == b' ' {
                        end -= 1;
                    }
                }
            }
        }

        while end > start && bytes[end - 1] == b'#' {
            if is_backslash_escaped(bytes, end - 1) {
                break;
            }
            end -= 1;
        }
        while end > start && bytes[end - 1] == b' ' {
            end -= 1;
        }

        if end > start {
            let content = &data[start..end];
            if id.as_deref().is_none_or(str::is_empty)
                && self.flags.contains(Extensions::AUTO_HEADER_IDS)
            {
                id = Some(sanitized_anchor_name(content));
            }
            self.render_header(r, out, content, level as u8, id);
        }

        skip
    }

    /// Render a paragraph, or paragraph lines followed by a setext header.
    /// Returns the number of bytes consumed.
    fn paragraph(&mut self, r: &mut dyn Renderer, out: &mut String, data: &str) -> usize {
        let bytes = data.as_bytes();
        let mut prev = 0;
        let mut line = 0;
        let mut i = 0;

        while i < bytes.len() {
            prev = line;
            let current = &data[i..];
            line = i;

            // a blank line ends the paragraph
            let blank = is_empty(current);
            if blank > 0 {
                self.render_paragraph(r, out, &data[..i]);
                return i + blank;
            }

            // an underline turns the previous line into a header
            if i > 0 {
                if let Some(level) = is_underlined_header(current) {
                    self.render_paragraph(r, out, &data[..prev]);

                    let mut start = prev;
                    let mut eol = i - 1;
                    while start < eol && bytes[start] == b' ' {
                        start += 1;
                    }
                    while eol > start && bytes[eol - 1] == b' ' {
                        eol -= 1;
                    }

                    let content = &data[start..eol];
                    let id = self
                        .flags
                        .contains(Extensions::AUTO_HEADER_IDS)
                        .then(|| sanitized_anchor_name(content));
                    self.render_header(r, out, content, level, id);

                    return skip_until_char(bytes, i, b'\n') + 1;
                }
            }

            if self.is_prefix_header(current) {
                self.render_paragraph(r, out, &data[..i]);
                return i;
            }

            i = skip_until_char(bytes, i, b'\n') + 1;
        }

        self.render_paragraph(r, out, &data[..i]);
        i
    }

    fn render_paragraph(&mut self, r: &mut dyn Renderer, out: &mut String, data: &str) {
        let bytes = data.as_bytes();
        let beg = skip_char(bytes, 0, b' ');

        let mut end = bytes.len();
        if end > beg && bytes[end - 1] == b'\n' {
            end -= 1;
        }
        while end > beg && bytes[end - 1] == b' ' {
            end -= 1;
        }
        if beg >= end {
            return;
        }

        let content = &data[beg..end];
        r.paragraph(out, &mut |r, out| self.render_content(r, out, content));
    }

    /// Settle the header id, then hand the header to the renderer
    fn render_header(
        &mut self,
        r: &mut dyn Renderer,
        out: &mut String,
        content: &str,
        level: u8,
        id: Option<String>,
    ) {
        let mut id = id.filter(|id| !id.is_empty());
        if id.is_none() && self.toc_ids {
            id = Some(format!("toc_{}", self.header_count));
        }
        self.header_count += 1;

        let id = id.map(|id| {
            let unique = self.header_ids.ensure_unique(&id);
            if unique != id {
                tracing::debug!(requested = %id, assigned = %unique, "header id already taken");
            }
            unique
        });

        r.header(
            out,
            &mut |r, out| self.render_content(r, out, content),
            level,
            id.as_deref(),
        );
    }

    /// Render inline `data`; false when nothing was written
    fn render_content(&mut self, r: &mut dyn Renderer, out: &mut String, data: &str) -> bool {
        let before = out.len();
        self.inline(r, out, data);
        out.len() > before
    }
}

/// Length of the leading blank line (newline included), or 0 when the first
/// line has content
fn is_empty(data: &str) -> usize {
    let bytes = data.as_bytes();
    let mut i = 0;
    while i < bytes.len() && bytes[i] != b'\n' {
        if bytes[i] != b' ' && bytes[i] != b'\t' {
            return 0;
        }
        i += 1;
    }
    if i == bytes.len() {
        // no newline: empty data or trailing spaces
        return 0;
    }
    i + 1
}

/// `=` underlines give level 1, `-` level 2
fn is_underlined_header(data: &str) -> Option<u8> {
    let bytes = data.as_bytes();
    let (marker, level) = match bytes.first()? {
        b'=' => (b'=', 1),
        b'-' => (b'-', 2),
        _ => return None,
    };

    let i = skip_char(bytes, 0, marker);
    let i = skip_char(bytes, i, b' ');
    (bytes.get(i) == Some(&b'\n')).then_some(level)
}
