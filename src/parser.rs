//! Per-conversion parser state shared by the block and inline passes
use std::collections::HashMap;

use unicode_casefold::UnicodeCaseFold;

use crate::inline;
use crate::options::{Extensions, Options, Reference};
use crate::preprocess;
use crate::renderer::{RenderFlags, Renderer};
use crate::slug::SlugRegistry;

/// Deepest nesting of blocks and spans rendered before content is dropped
pub(crate) const MAX_NESTING: usize = 16;

/// Handler for a trigger byte.
///
/// Receives the whole span and the offset of the trigger byte within it, and
/// returns how many bytes it consumed starting at that offset. Returning 0
/// declines, leaving the trigger byte as plain text.
pub(crate) type InlineHandler =
    fn(&mut Parser, &mut dyn Renderer, &mut String, &str, usize) -> usize;

pub(crate) struct Parser {
    pub(crate) flags: Extensions,
    nesting: usize,
    max_nesting: usize,
    pub(crate) inline_callback: [Option<InlineHandler>; 256],
    /// Link references keyed by normalized label
    refs: HashMap<String, Reference>,
    pub(crate) header_ids: SlugRegistry,
    /// Headers seen so far, used for table-of-contents ids
    pub(crate) header_count: usize,
    /// Give headers without an id a `toc_<n>` one
    pub(crate) toc_ids: bool,
}

impl Parser {
    pub(crate) fn new(options: &Options, render_flags: RenderFlags) -> Self {
        let flags = options.extensions;

        let mut inline_callback: [Option<InlineHandler>; 256] = [None; 256];
        inline_callback[usize::from(b'*')] = Some(inline::emphasis as InlineHandler);
        inline_callback[usize::from(b'_')] = Some(inline::emphasis);
        if flags.contains(Extensions::STRIKETHROUGH) {
            inline_callback[usize::from(b'~')] = Some(inline::emphasis);
        }
        inline_callback[usize::from(b'`')] = Some(inline::code_span);
        inline_callback[usize::from(b'\n')] = Some(inline::line_break);
        inline_callback[usize::from(b'\\')] = Some(inline::escape);

        let refs = options
            .references
            .iter()
            .map(|(label, reference)| (normalize_label(label), reference.clone()))
            .collect();

        Parser {
            flags,
            nesting: 0,
            max_nesting: MAX_NESTING,
            inline_callback,
            refs,
            header_ids: SlugRegistry::new(),
            header_count: 0,
            toc_ids: render_flags.contains(RenderFlags::TOC),
        }
    }

    #[cfg(test)]
    pub(crate) fn with_max_nesting(mut self, max_nesting: usize) -> Self {
        self.max_nesting = max_nesting;
        self
    }

    pub(crate) fn tab_size(&self) -> usize {
        self.flags.tab_size()
    }

    /// Look up a link reference, ignoring case and whitespace differences.
    ///
    /// Reserved: no implemented span resolves references yet.
    #[allow(dead_code)]
    pub(crate) fn reference(&self, label: &str) -> Option<&Reference> {
        self.refs.get(&normalize_label(label))
    }

    /// Run `f` one level deeper, or return `None` when the nesting limit is
    /// already reached
    pub(crate) fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> Option<T> {
        if self.nesting >= self.max_nesting {
            tracing::trace!(depth = self.nesting, "nesting limit reached, dropping content");
            return None;
        }
        self.nesting += 1;
        let result = f(self);
        self.nesting -= 1;
        Some(result)
    }

    /// Convert a whole document
    pub(crate) fn render(&mut self, r: &mut dyn Renderer, input: &str) -> String {
        let text = preprocess::normalize(input, self.tab_size());

        let mut out = String::with_capacity(text.len() + text.len() / 2);
        r.document_header(&mut out);
        self.block(r, &mut out, &text);
        r.document_footer(&mut out);

        debug_assert_eq!(self.nesting, 0, "unbalanced nesting after conversion");
        tracing::debug!(
            input_len = input.len(),
            output_len = out.len(),
            headers = self.header_count,
            "conversion finished"
        );
        out
    }
}

/// Fold case and collapse whitespace runs so labels compare loosely
fn normalize_label(label: &str) -> String {
    label
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .case_fold()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_normalize_label() {
        assert_eq!(normalize_label("Foo  Bar"), "foo bar");
        assert_eq!(normalize_label("  foo\n\tbar "), "foo bar");
        assert_eq!(normalize_label("ΑΓΩ"), "αγω");
    }

    #[test]
    fn test_reference_lookup() {
        let mut options = Options::default();
        options.references.insert(
            "Home  Page".to_string(),
            Reference {
                link: "/".to_string(),
                ..Default::default()
            },
        );
        let parser = Parser::new(&options, RenderFlags::empty());
        assert_eq!(parser.reference("home page").map(|r| r.link.as_str()), Some("/"));
        assert_eq!(parser.reference("HOME\nPAGE").map(|r| r.link.as_str()), Some("/"));
        assert!(parser.reference("about").is_none());
    }

    #[test]
    fn test_dispatch_table() {
        let parser = Parser::new(&Options::default(), RenderFlags::empty());
        for c in [b'*', b'_', b'`', b'\n', b'\\'] {
            assert!(parser.inline_callback[usize::from(c)].is_some());
        }
        assert!(parser.inline_callback[usize::from(b'~')].is_none());
        assert!(parser.inline_callback[usize::from(b'a')].is_none());

        let parser = Parser::new(
            &Options::new(Extensions::STRIKETHROUGH),
            RenderFlags::empty(),
        );
        assert!(parser.inline_callback[usize::from(b'~')].is_some());
    }

    #[test]
    fn test_nested_limit() {
        let mut parser =
            Parser::new(&Options::default(), RenderFlags::empty()).with_max_nesting(2);
        let depth = parser.nested(|p| p.nested(|p| p.nested(|_| ())));
        assert_eq!(depth, Some(Some(None)));
        assert_eq!(parser.nesting, 0);
    }

    #[test]
    fn test_tab_size_follows_extensions() {
        let parser = Parser::new(&Options::new(Extensions::TAB_SIZE_EIGHT), RenderFlags::empty());
        assert_eq!(parser.tab_size(), 8);
    }
}
