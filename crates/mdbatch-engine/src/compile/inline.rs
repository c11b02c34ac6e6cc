//! Flattens a paragraph's inline tokens into plain text plus style spans.

use super::cursor::utf16_len;
use crate::ops::{TextRange, TextStyle};
use crate::tokens::InlineToken;

/// A style to apply over part of a composed string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleSpan {
    pub style: TextStyle,
    /// Offsets relative to the start of the composed text.
    pub range: TextRange,
}

/// Output of [`compose`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ComposedInline {
    pub text: String,
    pub spans: Vec<StyleSpan>,
}

/// Walks `tokens` once, left to right, concatenating their rendered text and
/// recording a span for every styled token. Empty styled runs produce no span.
///
/// Pure: it knows nothing about where the text will land in the document.
pub fn compose(tokens: &[InlineToken]) -> ComposedInline {
    let mut out = ComposedInline::default();
    let mut offset = 0;

    for token in tokens {
        let rendered = token.rendered();
        let len = utf16_len(rendered);
        out.text.push_str(rendered);

        let style = match token {
            InlineToken::Strong { .. } => Some(TextStyle::Bold),
            InlineToken::Em { .. } => Some(TextStyle::Italic),
            InlineToken::Link { href, .. } => Some(TextStyle::Link { url: href.clone() }),
            InlineToken::Text { .. } | InlineToken::Other { .. } => None,
        };
        if let Some(style) = style
            && len > 0
        {
            out.spans.push(StyleSpan {
                style,
                range: TextRange::at(offset, len),
            });
        }

        offset += len;
    }

    out
}
