use pulldown_cmark::{Event, Tag};

use crate::tokens::InlineToken;

#[derive(Debug)]
enum StyleKind {
    Strong,
    Em,
    Link { href: String },
}

/// A styled run being collected; nested markup only contributes its text.
#[derive(Debug)]
struct Styled {
    kind: StyleKind,
    text: String,
    depth: usize,
}

impl Styled {
    fn into_token(self) -> InlineToken {
        match self.kind {
            StyleKind::Strong => InlineToken::Strong { text: self.text },
            StyleKind::Em => InlineToken::Em { text: self.text },
            StyleKind::Link { href } => InlineToken::Link {
                text: self.text,
                href,
            },
        }
    }
}

/// Folds inline events into a flat [`InlineToken`] run.
///
/// Only the outermost strong/emphasis/link becomes a styled token. Any other
/// inline element is kept as its source slice and its inner events are skipped.
#[derive(Debug, Default)]
pub(crate) struct InlineCollector {
    tokens: Vec<InlineToken>,
    styled: Option<Styled>,
    opaque_depth: usize,
}

impl InlineCollector {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.tokens.is_empty() && self.styled.is_none()
    }

    /// Inside an element kept as its source slice.
    pub(crate) fn in_opaque(&self) -> bool {
        self.opaque_depth > 0
    }

    /// Separates a following paragraph of the same container with a space.
    pub(crate) fn push_separator(&mut self) {
        if self.opaque_depth == 0 && !self.is_empty() {
            self.push_text(" ");
        }
    }

    /// `raw` is the source slice covered by the element being opened.
    pub(crate) fn start(&mut self, tag: &Tag<'_>, raw: &str) {
        if self.opaque_depth > 0 {
            self.opaque_depth += 1;
            return;
        }
        if let Some(styled) = &mut self.styled {
            styled.depth += 1;
            return;
        }

        let kind = match tag {
            Tag::Strong => StyleKind::Strong,
            Tag::Emphasis => StyleKind::Em,
            Tag::Link { dest_url, .. } => StyleKind::Link {
                href: dest_url.to_string(),
            },
            _ => {
                self.tokens.push(InlineToken::other(raw));
                self.opaque_depth = 1;
                return;
            }
        };
        self.styled = Some(Styled {
            kind,
            text: String::new(),
            depth: 1,
        });
    }

    pub(crate) fn end(&mut self) {
        if self.opaque_depth > 0 {
            self.opaque_depth -= 1;
            return;
        }
        let closed = match &mut self.styled {
            Some(styled) => {
                styled.depth -= 1;
                styled.depth == 0
            }
            None => false,
        };
        if closed && let Some(styled) = self.styled.take() {
            self.tokens.push(styled.into_token());
        }
    }

    /// Handles a non-structural event; `raw` is its source slice.
    pub(crate) fn event(&mut self, event: &Event<'_>, raw: &str) {
        if self.opaque_depth > 0 {
            return;
        }
        match event {
            Event::Text(text) => self.push_text(text),
            Event::SoftBreak => self.push_text("\n"),
            Event::Code(code) => self.push_opaque(code, raw),
            Event::HardBreak => self.push_opaque("\n", raw),
            _ => self.push_opaque(raw, raw),
        }
    }

    pub(crate) fn push_text(&mut self, text: &str) {
        if let Some(styled) = &mut self.styled {
            styled.text.push_str(text);
            return;
        }
        match self.tokens.last_mut() {
            Some(InlineToken::Text { text: last }) => last.push_str(text),
            _ => self.tokens.push(InlineToken::text(text)),
        }
    }

    /// Inside a styled run only `styled_text` is kept; elsewhere the source is.
    fn push_opaque(&mut self, styled_text: &str, raw: &str) {
        match &mut self.styled {
            Some(styled) => styled.text.push_str(styled_text),
            None => self.tokens.push(InlineToken::other(raw)),
        }
    }

    /// Rendered text of everything collected so far.
    pub(crate) fn plain_text(&self) -> String {
        let mut text: String = self.tokens.iter().map(InlineToken::rendered).collect();
        if let Some(styled) = &self.styled {
            text.push_str(&styled.text);
        }
        text
    }

    pub(crate) fn finish(mut self) -> Vec<InlineToken> {
        if let Some(styled) = self.styled.take() {
            self.tokens.push(styled.into_token());
        }
        self.tokens
    }
}
