//! A callback-driven Markdown engine with pluggable render backends.
//!
//! Input is normalized (line endings, tabs), split into headers and
//! paragraphs, and each block's spans are parsed with a byte dispatch table.
//! Every construct is handed to a [`Renderer`]; [`HtmlRenderer`] is the
//! bundled backend.
//!
//! ```
//! assert_eq!(
//!     inkdown::markdown_to_html("# Title\n\nSome *emphasis*.\n"),
//!     "<h1>Title</h1>\n\n<p>Some <em>emphasis</em>.</p>\n"
//! );
//! ```
pub mod error;
pub mod html;
pub mod options;
pub mod renderer;
pub mod slug;

mod block;
mod inline;
mod parser;
mod preprocess;
mod util;

pub use error::{Error, Result};
pub use html::{HtmlParameters, HtmlRenderer};
pub use options::{Extensions, Options, Reference};
pub use renderer::{RenderContent, RenderFlags, Renderer};
pub use slug::{SlugRegistry, sanitized_anchor_name};

use parser::Parser;

/// Convert `input` with `renderer` and the given extensions.
///
/// Invalid UTF-8 is replaced with U+FFFD before parsing.
pub fn markdown(input: &[u8], renderer: &mut dyn Renderer, extensions: Extensions) -> Vec<u8> {
    markdown_with_options(input, Some(renderer), &Options::new(extensions))
}

/// Convert `input` with full [`Options`]. Without a renderer there is
/// nothing to produce and the result is empty.
pub fn markdown_with_options(
    input: &[u8],
    renderer: Option<&mut dyn Renderer>,
    options: &Options,
) -> Vec<u8> {
    let Some(renderer) = renderer else {
        tracing::debug!("no renderer supplied, skipping conversion");
        return Vec::new();
    };

    let text = String::from_utf8_lossy(input);
    let mut parser = Parser::new(options, renderer.flags());
    parser.render(renderer, &text).into_bytes()
}

/// Plain XHTML conversion with no extensions
pub fn markdown_basic(input: &[u8]) -> Vec<u8> {
    let mut renderer = HtmlRenderer::new(RenderFlags::USE_XHTML, "", "");
    markdown(input, &mut renderer, Extensions::empty())
}

/// XHTML conversion with [`Extensions::COMMON`]
pub fn markdown_common(input: &[u8]) -> Vec<u8> {
    let mut renderer = HtmlRenderer::new(RenderFlags::USE_XHTML, "", "");
    markdown(input, &mut renderer, Extensions::COMMON)
}

/// Parse markdown text and render to HTML
pub fn markdown_to_html(markdown: &str) -> String {
    let mut renderer = HtmlRenderer::new(RenderFlags::USE_XHTML, "", "");
    let mut parser = Parser::new(&Options::default(), renderer.flags());
    parser.render(&mut renderer, markdown)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn html(input: &str, extensions: Extensions) -> String {
        let mut renderer = HtmlRenderer::new(RenderFlags::USE_XHTML, "", "");
        String::from_utf8(markdown(input.as_bytes(), &mut renderer, extensions)).unwrap()
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(markdown_to_html(""), "");
        assert_eq!(markdown_basic(b""), b"");
    }

    #[test]
    fn test_missing_renderer() {
        let out = markdown_with_options(b"# Title\n", None, &Options::default());
        assert!(out.is_empty());
    }

    #[test]
    fn test_basic_and_common() {
        assert_eq!(
            String::from_utf8(markdown_basic(b"un*frigging*believable\n")).unwrap(),
            "<p>un<em>frigging</em>believable</p>\n"
        );
        assert_eq!(
            String::from_utf8(markdown_common(b"un*frigging*believable ~~x~~\n")).unwrap(),
            "<p>un*frigging*believable <del>x</del></p>\n"
        );
        assert_eq!(
            String::from_utf8(markdown_common(b"#Not a header\n")).unwrap(),
            "<p>#Not a header</p>\n"
        );
    }

    #[test]
    fn test_line_endings_and_tabs() {
        assert_eq!(html("a\tb\n", Extensions::empty()), "<p>a   b</p>\n");
        assert_eq!(html("a\tb\n", Extensions::TAB_SIZE_EIGHT), "<p>a       b</p>\n");
        assert_eq!(
            html("first\r\n\r\nsecond\r\n", Extensions::empty()),
            "<p>first</p>\n\n<p>second</p>\n"
        );
        assert_eq!(html("no newline", Extensions::empty()), "<p>no newline</p>\n");
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let mut renderer = HtmlRenderer::default();
        let out = markdown(b"caf\xe9 *ok*\n", &mut renderer, Extensions::empty());
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "<p>caf\u{fffd} <em>ok</em></p>\n"
        );
    }

    #[test]
    fn test_options_drive_conversion() {
        let options = Options::from_json(r#"{"extensions": ["auto_header_ids"]}"#).unwrap();
        let mut renderer = HtmlRenderer::default();
        let out = markdown_with_options(b"# Hello World\n", Some(&mut renderer), &options);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "<h1 id=\"hello-world\">Hello World</h1>\n"
        );
    }

    #[test]
    fn test_toc() {
        let mut renderer = HtmlRenderer::new(RenderFlags::TOC | RenderFlags::USE_XHTML, "", "");
        let out = markdown(b"# One\n## Two\n# Three\n", &mut renderer, Extensions::empty());
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "<nav>\n\
             <ul>\n\
             <li><a href=\"#toc_0\">One</a>\n\
             <ul>\n\
             <li><a href=\"#toc_1\">Two</a></li>\n\
             </ul></li>\n\
             <li><a href=\"#toc_2\">Three</a></li>\n\
             </ul>\n\
             </nav>\n\
             \n\
             <h1 id=\"toc_0\">One</h1>\n\
             \n\
             <h2 id=\"toc_1\">Two</h2>\n\
             \n\
             <h1 id=\"toc_2\">Three</h1>\n"
        );
    }

    #[test]
    fn test_toc_omit_contents_keeps_explicit_ids() {
        let mut renderer = HtmlRenderer::new(
            RenderFlags::TOC | RenderFlags::OMIT_CONTENTS | RenderFlags::USE_XHTML,
            "",
            "",
        );
        let out = markdown(
            b"# Intro {#start}\n\nbody text\n",
            &mut renderer,
            Extensions::HEADER_IDS,
        );
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "<nav>\n<ul>\n<li><a href=\"#start\">Intro</a></li>\n</ul>\n</nav>\n"
        );
    }

    #[test]
    fn test_renderer_is_reusable() {
        let mut renderer = HtmlRenderer::new(RenderFlags::TOC | RenderFlags::USE_XHTML, "", "");
        let first = markdown(b"# A\n", &mut renderer, Extensions::empty());
        let second = markdown(b"# A\n", &mut renderer, Extensions::empty());
        assert_eq!(first, second);
    }

    #[test]
    fn test_complete_page_wraps_body() {
        let mut renderer =
            HtmlRenderer::new(RenderFlags::COMPLETE_PAGE | RenderFlags::USE_XHTML, "Doc", "");
        let out = String::from_utf8(markdown(b"text\n", &mut renderer, Extensions::empty())).unwrap();
        assert!(out.contains("<title>Doc</title>"));
        assert!(out.contains("<body>\n\n<p>text</p>\n\n</body>\n</html>\n"));
    }

    /// Records the callbacks it receives
    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
    }

    impl Renderer for Recorder {
        fn document_header(&mut self, _out: &mut String) {
            self.events.push("begin".to_string());
        }

        fn document_footer(&mut self, _out: &mut String) {
            self.events.push("end".to_string());
        }

        fn header(
            &mut self,
            out: &mut String,
            content: &mut RenderContent<'_>,
            level: u8,
            id: Option<&str>,
        ) {
            self.events.push(format!("header {level} {id:?}"));
            content(self, out);
        }

        fn paragraph(&mut self, out: &mut String, content: &mut RenderContent<'_>) {
            self.events.push("paragraph".to_string());
            content(self, out);
        }

        fn normal_text(&mut self, out: &mut String, text: &str) {
            self.events.push(format!("text {text:?}"));
            out.push_str(text);
        }

        fn emphasis(&mut self, out: &mut String, text: &str) {
            self.events.push(format!("em {text:?}"));
            out.push_str(text);
        }

        fn double_emphasis(&mut self, out: &mut String, text: &str) {
            self.events.push(format!("strong {text:?}"));
            out.push_str(text);
        }

        fn triple_emphasis(&mut self, out: &mut String, text: &str) {
            self.events.push(format!("strong-em {text:?}"));
            out.push_str(text);
        }

        fn strikethrough(&mut self, out: &mut String, text: &str) {
            self.events.push(format!("del {text:?}"));
            out.push_str(text);
        }

        fn code_span(&mut self, out: &mut String, text: &str) {
            self.events.push(format!("code {text:?}"));
            out.push_str(text);
        }

        fn line_break(&mut self, _out: &mut String) {
            self.events.push("break".to_string());
        }

        fn flags(&self) -> RenderFlags {
            RenderFlags::TOC
        }
    }

    #[test]
    fn test_callback_order() {
        let mut recorder = Recorder::default();
        let out = markdown(b"# Head\n\nsome *em* `x`\n", &mut recorder, Extensions::empty());
        assert_eq!(String::from_utf8(out).unwrap(), "Headsome em x");
        assert_eq!(
            recorder.events,
            [
                "begin",
                "header 1 Some(\"toc_0\")",
                "text \"Head\"",
                "paragraph",
                "text \"some \"",
                "text \"em\"",
                "em \"em\"",
                "text \" \"",
                "code \"x\"",
                "end",
            ]
        );
    }

    proptest! {
        #[test]
        fn prop_any_bytes_convert(input in prop::collection::vec(any::<u8>(), 0..256)) {
            let out = markdown_common(&input);
            prop_assert!(String::from_utf8(out).is_ok());
        }

        #[test]
        fn prop_depth_bound(depth in 1usize..300) {
            let input = format!("{}x{}\n", "*_".repeat(depth), "_*".repeat(depth));
            let out = markdown_common(input.as_bytes());
            prop_assert!(out.len() <= 16 * input.len() + 64);
        }
    }
}
