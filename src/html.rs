//! HTML backend.

use crate::renderer::{RenderContent, RenderFlags, Renderer};

const XHTML_CLOSE: &str = " />";
const HTML_CLOSE: &str = ">";

/// Extra knobs for [`HtmlRenderer`]
#[derive(Debug, Clone, Default)]
pub struct HtmlParameters {
    /// Prepended to every header id, e.g. to keep them unique across documents
    pub header_id_prefix: String,
    /// Appended to every header id
    pub header_id_suffix: String,
}

/// Renders to HTML (or XHTML with [`RenderFlags::USE_XHTML`]).
///
/// Blocks are separated by a blank line. With [`RenderFlags::TOC`] a nested
/// list of links to every header is inserted in a `<nav>` at the top of the
/// body once the document is finished.
#[derive(Debug)]
pub struct HtmlRenderer {
    flags: RenderFlags,
    close_tag: &'static str,
    title: String,
    css: String,
    parameters: HtmlParameters,

    // table of contents state for the current document
    toc_marker: usize,
    header_count: usize,
    current_level: u8,
    toc: String,
}

impl HtmlRenderer {
    /// `title` and `css` are only used with [`RenderFlags::COMPLETE_PAGE`]
    pub fn new(flags: RenderFlags, title: &str, css: &str) -> Self {
        Self::with_parameters(flags, title, css, HtmlParameters::default())
    }

    pub fn with_parameters(
        flags: RenderFlags,
        title: &str,
        css: &str,
        parameters: HtmlParameters,
    ) -> Self {
        let close_tag = if flags.contains(RenderFlags::USE_XHTML) {
            XHTML_CLOSE
        } else {
            HTML_CLOSE
        };
        HtmlRenderer {
            flags,
            close_tag,
            title: title.to_string(),
            css: css.to_string(),
            parameters,
            toc_marker: 0,
            header_count: 0,
            current_level: 0,
            toc: String::new(),
        }
    }

    fn write_header_id(&self, out: &mut String, id: &str) {
        escape_html(out, &self.parameters.header_id_prefix);
        escape_html(out, id);
        escape_html(out, &self.parameters.header_id_suffix);
    }

    /// Add a header to the table of contents, opening or closing nested lists
    /// to reach `level`
    fn toc_header_with_anchor(&mut self, text: &str, level: u8, anchor: Option<&str>) {
        while level > self.current_level {
            if self.toc.ends_with("</li>\n") {
                // the sublist nests underneath the previous entry
                self.toc.truncate(self.toc.len() - "</li>\n".len());
            } else if self.current_level > 0 {
                self.toc.push_str("<li>");
            }
            if !self.toc.is_empty() {
                self.toc.push('\n');
            }
            self.toc.push_str("<ul>\n");
            self.current_level += 1;
        }

        while level < self.current_level {
            self.toc.push_str("</ul>");
            if self.current_level > 1 {
                self.toc.push_str("</li>\n");
            }
            self.current_level -= 1;
        }

        let mut entry = String::from("<li><a href=\"#");
        match anchor {
            Some(anchor) => self.write_header_id(&mut entry, anchor),
            None => {
                entry.push_str(&format!("toc_{}", self.header_count));
            }
        }
        entry.push_str("\">");
        entry.push_str(text);
        entry.push_str("</a></li>\n");
        self.toc.push_str(&entry);
        self.header_count += 1;
    }

    fn toc_finalize(&mut self) {
        while self.current_level > 1 {
            self.toc.push_str("</ul></li>\n");
            self.current_level -= 1;
        }
        if self.current_level > 0 {
            self.toc.push_str("</ul>\n");
            self.current_level = 0;
        }
    }
}

impl Default for HtmlRenderer {
    fn default() -> Self {
        Self::new(RenderFlags::USE_XHTML, "", "")
    }
}

impl Renderer for HtmlRenderer {
    fn document_header(&mut self, out: &mut String) {
        self.toc.clear();
        self.header_count = 0;
        self.current_level = 0;

        if !self.flags.contains(RenderFlags::COMPLETE_PAGE) {
            self.toc_marker = out.len();
            return;
        }

        let ending = if self.flags.contains(RenderFlags::USE_XHTML) {
            out.push_str("<!DOCTYPE html PUBLIC \"-//W3C//DTD XHTML 1.0 Transitional//EN\" ");
            out.push_str("\"http://www.w3.org/TR/xhtml1/DTD/xhtml1-transitional.dtd\">\n");
            out.push_str("<html xmlns=\"http://www.w3.org/1999/xhtml\">\n");
            " /"
        } else {
            out.push_str("<!DOCTYPE html>\n");
            out.push_str("<html>\n");
            ""
        };

        out.push_str("<head>\n");
        out.push_str("  <title>");
        escape_html(out, &self.title);
        out.push_str("</title>\n");
        out.push_str(&format!(
            "  <meta name=\"GENERATOR\" content=\"inkdown v{}\"{ending}>\n",
            env!("CARGO_PKG_VERSION")
        ));
        out.push_str(&format!("  <meta charset=\"utf-8\"{ending}>\n"));
        if !self.css.is_empty() {
            out.push_str("  <link rel=\"stylesheet\" type=\"text/css\" href=\"");
            escape_html(out, &self.css);
            out.push_str(&format!("\"{ending}>\n"));
        }
        out.push_str("</head>\n");
        out.push_str("<body>\n");

        self.toc_marker = out.len();
    }

    fn document_footer(&mut self, out: &mut String) {
        if self.flags.contains(RenderFlags::TOC) {
            self.toc_finalize();

            let contents = out.split_off(self.toc_marker);
            if self.flags.contains(RenderFlags::COMPLETE_PAGE) {
                out.push('\n');
            }
            out.push_str("<nav>\n");
            out.push_str(&self.toc);
            out.push_str("</nav>\n");

            if !self.flags.contains(RenderFlags::OMIT_CONTENTS) {
                if !self.flags.contains(RenderFlags::COMPLETE_PAGE) {
                    out.push('\n');
                }
                out.push_str(&contents);
            }
        }

        if self.flags.contains(RenderFlags::COMPLETE_PAGE) {
            out.push_str("\n</body>\n");
            out.push_str("</html>\n");
        }
    }

    fn header(
        &mut self,
        out: &mut String,
        content: &mut RenderContent<'_>,
        level: u8,
        id: Option<&str>,
    ) {
        let marker = out.len();
        double_space(out);

        match id {
            Some(id) => {
                out.push_str(&format!("<h{level} id=\""));
                self.write_header_id(out, id);
                out.push_str("\">");
            }
            None => {
                out.push_str(&format!("<h{level}>"));
            }
        }

        let text_start = out.len();
        if !content(self, out) {
            out.truncate(marker);
            return;
        }

        if self.flags.contains(RenderFlags::TOC) {
            let text = out[text_start..].to_string();
            self.toc_header_with_anchor(&text, level, id);
        }

        out.push_str(&format!("</h{level}>\n"));
    }

    fn paragraph(&mut self, out: &mut String, content: &mut RenderContent<'_>) {
        let marker = out.len();
        double_space(out);
        out.push_str("<p>");
        if !content(self, out) {
            out.truncate(marker);
            return;
        }
        out.push_str("</p>\n");
    }

    fn normal_text(&mut self, out: &mut String, text: &str) {
        escape_html(out, text);
    }

    fn emphasis(&mut self, out: &mut String, text: &str) {
        wrap(out, "em", text);
    }

    fn double_emphasis(&mut self, out: &mut String, text: &str) {
        wrap(out, "strong", text);
    }

    fn triple_emphasis(&mut self, out: &mut String, text: &str) {
        if text.is_empty() {
            return;
        }
        out.push_str("<strong><em>");
        out.push_str(text);
        out.push_str("</em></strong>");
    }

    fn strikethrough(&mut self, out: &mut String, text: &str) {
        wrap(out, "del", text);
    }

    fn code_span(&mut self, out: &mut String, text: &str) {
        if text.is_empty() {
            return;
        }
        out.push_str("<code>");
        escape_html(out, text);
        out.push_str("</code>");
    }

    fn line_break(&mut self, out: &mut String) {
        out.push_str("<br");
        out.push_str(self.close_tag);
        out.push('\n');
    }

    fn flags(&self) -> RenderFlags {
        self.flags
    }
}

/// Wrap already-rendered `text` in `tag`; empty text emits nothing
fn wrap(out: &mut String, tag: &str, text: &str) {
    if text.is_empty() {
        return;
    }
    out.push_str(&format!("<{tag}>{text}</{tag}>"));
}

/// Separate a block from whatever precedes it
fn double_space(out: &mut String) {
    if !out.is_empty() {
        out.push('\n');
    }
}

/// Append `text` with `"`, `&`, `<` and `>` replaced by entities
pub fn escape_html(out: &mut String, text: &str) {
    let mut last = 0;
    for (i, byte) in text.bytes().enumerate() {
        let entity = match byte {
            b'"' => "&quot;",
            b'&' => "&amp;",
            b'<' => "&lt;",
            b'>' => "&gt;",
            _ => continue,
        };
        out.push_str(&text[last..i]);
        out.push_str(entity);
        last = i + 1;
    }
    out.push_str(&text[last..]);
}
