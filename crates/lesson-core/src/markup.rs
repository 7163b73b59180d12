//! Lesson markup parsing.
//!
//! Lesson text uses two inline markers:
//! - `*new line*` starts a new, centered segment.
//! - `bold{...}` marks a bold run, closed by the first `}` after the marker.
//!
//! An opening `bold{` without a closing brace is kept as literal plain text.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

pub const NEW_LINE_MARKER: &str = "*new line*";

static RE_BOLD: Lazy<Regex> = Lazy::new(|| Regex::new(r"bold\{([^}]*)\}").unwrap());

/// A bold or plain run of characters within a segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fragment {
    pub text: String,
    pub is_bold: bool,
}

impl Fragment {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_bold: false,
        }
    }

    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_bold: true,
        }
    }

    /// Length in characters, not bytes.
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// One visual line of lesson text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    pub fragments: Vec<Fragment>,
    pub is_centered: bool,
}

impl Segment {
    pub fn len(&self) -> usize {
        self.fragments.iter().map(Fragment::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.iter().all(Fragment::is_empty)
    }

    pub fn plain_text(&self) -> String {
        self.fragments.iter().map(|f| f.text.as_str()).collect()
    }
}

/// Parse lesson markup into ordered segments.
pub fn parse(source: &str) -> Vec<Segment> {
    source
        .split(NEW_LINE_MARKER)
        .enumerate()
        .map(|(idx, piece)| Segment {
            fragments: parse_fragments(piece),
            is_centered: idx > 0,
        })
        .collect()
}

/// Sum of all segment lengths.
pub fn total_length(segments: &[Segment]) -> usize {
    segments.iter().map(Segment::len).sum()
}

fn parse_fragments(piece: &str) -> Vec<Fragment> {
    let mut fragments = Vec::new();
    let mut cursor = 0;

    for caps in RE_BOLD.captures_iter(piece) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        push_non_empty(&mut fragments, Fragment::plain(&piece[cursor..whole.start()]));
        push_non_empty(&mut fragments, Fragment::bold(inner.as_str()));
        cursor = whole.end();
    }

    // Anything left, including an unclosed `bold{`, is literal plain text.
    push_non_empty(&mut fragments, Fragment::plain(&piece[cursor..]));
    fragments
}

fn push_non_empty(fragments: &mut Vec<Fragment>, fragment: Fragment) {
    if !fragment.is_empty() {
        fragments.push(fragment);
    }
}
