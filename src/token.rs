//! Tokenization for syntax coloring.
//!
//! Tokenization always covers the entire text of a buffer, since tokens such as
//! block comments may span multiple lines. The result is then cut at line breaks so
//! that each line of the buffer has its own sequence of spans.

use crate::syntax::Syntax;
use std::ops::Range;

/// The highlight class of text that does not match any token.
pub const PLAIN: &str = "plain";

/// A slice of text on a single line along with its highlight class.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Span {
    pub text: String,
    pub class: String,
}

impl Span {
    pub fn new(text: &str, class: &str) -> Span {
        Span {
            text: text.to_string(),
            class: class.to_string(),
        }
    }
}

/// The spans of each line in a buffer.
pub type Lines = Vec<Vec<Span>>;

/// Tokenizes `text`, whose lines are expected to be separated by `\n`, according to
/// `syntax`, and returns the spans of each line.
///
/// The number of lines returned always equals the number of lines in `text`, and
/// the concatenation of spans on any given line is identical to that line. Empty
/// lines have no spans.
pub fn highlight(text: &str, syntax: &Syntax) -> Lines {
    let mut lines = Lines::new();
    lines.push(Vec::new());
    for (range, class) in segments(text, syntax) {
        let mut pieces = text[range].split('\n');
        if let Some(first) = pieces.next() {
            push_span(&mut lines, first, class);
        }
        for piece in pieces {
            lines.push(Vec::new());
            push_span(&mut lines, piece, class);
        }
    }
    lines
}

/// Returns the byte ranges of `text` in order, each paired with its highlight
/// class, such that the ranges are contiguous and cover `text` entirely.
fn segments<'a>(text: &str, syntax: &'a Syntax) -> Vec<(Range<usize>, &'a str)> {
    let mut segments = Vec::new();

    // Byte offset following last token.
    let mut offset = 0;

    if let Some(re) = syntax.re.as_ref() {
        for cap in re.captures_iter(text) {
            let Some((class, Range { start, end })) = syntax.lookup(&cap) else {
                continue;
            };

            // Tokens that match empty text contribute nothing.
            if start == end {
                continue;
            }

            // Insert gap if non-zero distance exists between this token and prior
            // token.
            if start > offset {
                segments.push((offset..start, PLAIN));
            }
            segments.push((start..end, class));
            offset = end;
        }
    }

    if offset < text.len() {
        segments.push((offset..text.len(), PLAIN));
    }
    segments
}

fn push_span(lines: &mut Lines, text: &str, class: &str) {
    if !text.is_empty()
        && let Some(line) = lines.last_mut()
    {
        line.push(Span::new(text, class));
    }
}
