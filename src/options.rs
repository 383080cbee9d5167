//! Parser extensions and conversion options
use std::collections::HashMap;
use std::ops::{BitOr, BitOrAssign};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default width of a tab stop
pub const TAB_SIZE_DEFAULT: usize = 4;
/// Tab stop width under [`Extensions::TAB_SIZE_EIGHT`]
pub const TAB_SIZE_EIGHT: usize = 8;

/// Set of enabled parser extensions.
///
/// Flags are combined with `|`:
///
/// ```
/// use inkdown::Extensions;
///
/// let ext = Extensions::SPACE_HEADERS | Extensions::AUTO_HEADER_IDS;
/// assert!(ext.contains(Extensions::SPACE_HEADERS));
/// assert!(!ext.contains(Extensions::STRIKETHROUGH));
/// ```
///
/// In configuration files the set is written as a list of snake_case names,
/// e.g. `["space_headers", "auto_header_ids"]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Extensions(u32);

impl Extensions {
    /// Ignore emphasis markers inside words
    pub const NO_INTRA_EMPHASIS: Self = Self(1);
    /// Reserved: pipe tables
    pub const TABLES: Self = Self(1 << 1);
    /// Reserved: fenced code blocks
    pub const FENCED_CODE: Self = Self(1 << 2);
    /// Reserved: bare URL autolinking
    pub const AUTOLINK: Self = Self(1 << 3);
    /// `~~text~~` renders as strikethrough
    pub const STRIKETHROUGH: Self = Self(1 << 4);
    /// Reserved: relaxed HTML block detection
    pub const LAX_HTML_BLOCKS: Self = Self(1 << 5);
    /// Require a space between the `#` run and the header text
    pub const SPACE_HEADERS: Self = Self(1 << 6);
    /// Every newline inside a paragraph becomes a hard break
    pub const HARD_LINE_BREAK: Self = Self(1 << 7);
    /// Expand tabs to eight columns instead of four
    pub const TAB_SIZE_EIGHT: Self = Self(1 << 8);
    /// Reserved: footnotes
    pub const FOOTNOTES: Self = Self(1 << 9);
    /// Reserved: blocks without a separating blank line
    pub const NO_EMPTY_LINE_BEFORE_BLOCK: Self = Self(1 << 10);
    /// Honor `{#id}` markers at the end of ATX headers
    pub const HEADER_IDS: Self = Self(1 << 11);
    /// Reserved: Pandoc-style title blocks
    pub const TITLEBLOCK: Self = Self(1 << 12);
    /// Derive header ids from the header text
    pub const AUTO_HEADER_IDS: Self = Self(1 << 13);
    /// A backslash before a newline is a hard break
    pub const BACKSLASH_LINE_BREAK: Self = Self(1 << 14);
    /// Reserved: definition lists
    pub const DEFINITION_LISTS: Self = Self(1 << 15);

    /// The extension set used by [`markdown_common`](crate::markdown_common)
    pub const COMMON: Self = Self(
        Self::NO_INTRA_EMPHASIS.0
            | Self::TABLES.0
            | Self::FENCED_CODE.0
            | Self::AUTOLINK.0
            | Self::STRIKETHROUGH.0
            | Self::SPACE_HEADERS.0
            | Self::HEADER_IDS.0
            | Self::BACKSLASH_LINE_BREAK.0
            | Self::DEFINITION_LISTS.0,
    );

    const NAMES: [(&'static str, Self); 16] = [
        ("no_intra_emphasis", Self::NO_INTRA_EMPHASIS),
        ("tables", Self::TABLES),
        ("fenced_code", Self::FENCED_CODE),
        ("autolink", Self::AUTOLINK),
        ("strikethrough", Self::STRIKETHROUGH),
        ("lax_html_blocks", Self::LAX_HTML_BLOCKS),
        ("space_headers", Self::SPACE_HEADERS),
        ("hard_line_break", Self::HARD_LINE_BREAK),
        ("tab_size_eight", Self::TAB_SIZE_EIGHT),
        ("footnotes", Self::FOOTNOTES),
        ("no_empty_line_before_block", Self::NO_EMPTY_LINE_BEFORE_BLOCK),
        ("header_ids", Self::HEADER_IDS),
        ("titleblock", Self::TITLEBLOCK),
        ("auto_header_ids", Self::AUTO_HEADER_IDS),
        ("backslash_line_break", Self::BACKSLASH_LINE_BREAK),
        ("definition_lists", Self::DEFINITION_LISTS),
    ];

    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    /// True when every flag in `other` is also set in `self`
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    /// Look up a single extension by its snake_case name
    pub fn from_name(name: &str) -> Result<Self> {
        Self::NAMES
            .iter()
            .find(|(candidate, _)| *candidate == name)
            .map(|&(_, flag)| flag)
            .ok_or_else(|| Error::UnknownExtension(name.to_string()))
    }

    /// Width of a tab stop for this extension set
    pub fn tab_size(self) -> usize {
        if self.contains(Self::TAB_SIZE_EIGHT) {
            TAB_SIZE_EIGHT
        } else {
            TAB_SIZE_DEFAULT
        }
    }
}

impl BitOr for Extensions {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for Extensions {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl TryFrom<Vec<String>> for Extensions {
    type Error = Error;

    fn try_from(names: Vec<String>) -> Result<Self> {
        names.iter().try_fold(Self::empty(), |acc, name| {
            Ok(acc | Self::from_name(name.trim())?)
        })
    }
}

impl From<Extensions> for Vec<String> {
    fn from(ext: Extensions) -> Self {
        Extensions::NAMES
            .iter()
            .filter(|(_, flag)| ext.contains(*flag))
            .map(|(name, _)| (*name).to_string())
            .collect()
    }
}

/// Details of a link reference.
///
/// Reserved: no implemented construct resolves references yet, but callers
/// may seed the table through [`Options::references`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Reference {
    /// Usually the URL the reference points to
    pub link: String,
    /// Alternate text describing the link in more detail
    pub title: String,
    /// Optional text that replaces the reference label when rendered
    pub text: String,
}

/// Options for a single conversion
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Options {
    pub extensions: Extensions,
    /// Predefined link references, keyed by label
    pub references: HashMap<String, Reference>,
}

impl Options {
    pub fn new(extensions: Extensions) -> Self {
        Options {
            extensions,
            ..Default::default()
        }
    }

    /// Parse options from a JSON document such as
    /// `{"extensions": ["strikethrough", "header_ids"]}`
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
