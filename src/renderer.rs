//! Rendering capability consumed by the parser.
//!
//! The parser never writes markup itself. It walks the normalized input and
//! calls back into a [`Renderer`], which appends to the output buffer.

use std::ops::{BitOr, BitOrAssign};

/// Lazily renders a block's inline content.
///
/// The renderer invokes it with itself and the output buffer after writing
/// the block's opening markup. It returns `false` when nothing was produced,
/// in which case the renderer discards what it wrote for the block.
pub type RenderContent<'a> = dyn FnMut(&mut dyn Renderer, &mut String) -> bool + 'a;

/// Feature flags of a renderer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct RenderFlags(u32);

impl RenderFlags {
    /// Build a table of contents; headers without an id get `toc_<n>`
    pub const TOC: Self = Self(1);
    /// Emit only the table of contents
    pub const OMIT_CONTENTS: Self = Self(1 << 1);
    /// Wrap the output in a complete HTML page
    pub const COMPLETE_PAGE: Self = Self(1 << 2);
    /// Generate XHTML (`<br />`) instead of HTML (`<br>`)
    pub const USE_XHTML: Self = Self(1 << 3);

    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for RenderFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for RenderFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Output backend driven by the parser.
///
/// Span callbacks receive text that is already rendered (for emphasis forms)
/// or raw (for [`normal_text`](Renderer::normal_text) and
/// [`code_span`](Renderer::code_span)). Implementations must not hold on to
/// the slices they are given.
pub trait Renderer {
    /// Called once before any block
    fn document_header(&mut self, out: &mut String);

    /// Called once after the last block
    fn document_footer(&mut self, out: &mut String);

    /// A header of `level` 1 to 6, with an id that is unique in this document
    fn header(
        &mut self,
        out: &mut String,
        content: &mut RenderContent<'_>,
        level: u8,
        id: Option<&str>,
    );

    fn paragraph(&mut self, out: &mut String, content: &mut RenderContent<'_>);

    /// Plain text that needs escaping for the output format
    fn normal_text(&mut self, out: &mut String, text: &str);

    fn emphasis(&mut self, out: &mut String, text: &str);

    fn double_emphasis(&mut self, out: &mut String, text: &str);

    fn triple_emphasis(&mut self, out: &mut String, text: &str);

    fn strikethrough(&mut self, out: &mut String, text: &str);

    fn code_span(&mut self, out: &mut String, text: &str);

    fn line_break(&mut self, out: &mut String);

    /// Flags the parser consults, e.g. to assign table-of-contents ids
    fn flags(&self) -> RenderFlags {
        RenderFlags::empty()
    }
}
