//! Token model handed from the Markdown lexer to the compiler.
//!
//! Both unions are closed: the block dispatcher matches them exhaustively, so a
//! new construct has to be given an explicit rendering before it compiles.

/// A top-level Markdown construct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockToken {
    Heading {
        text: String,
        /// Heading level as reported by the lexer (1..=6 by convention, unchecked).
        depth: u8,
    },
    Paragraph {
        /// Paragraph text used when no inline tokens are available.
        text: String,
        inline: Option<Vec<InlineToken>>,
    },
    List {
        items: Vec<ListItem>,
        ordered: bool,
    },
    Table {
        header: Vec<String>,
        rows: Vec<Vec<String>>,
    },
    /// A structural gap such as a blank line between blocks.
    Blank,
    /// Anything without first-class treatment, inserted verbatim.
    Raw { text: String },
}

/// A single list entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    pub text: String,
}

impl ListItem {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// A character-level run inside a paragraph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InlineToken {
    Text { text: String },
    Strong { text: String },
    Em { text: String },
    Link { text: String, href: String },
    /// Opaque passthrough (inline code, images, hard breaks, inline HTML).
    Other { raw: String },
}

impl InlineToken {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    pub fn strong(text: impl Into<String>) -> Self {
        Self::Strong { text: text.into() }
    }

    pub fn em(text: impl Into<String>) -> Self {
        Self::Em { text: text.into() }
    }

    pub fn link(text: impl Into<String>, href: impl Into<String>) -> Self {
        Self::Link {
            text: text.into(),
            href: href.into(),
        }
    }

    pub fn other(raw: impl Into<String>) -> Self {
        Self::Other { raw: raw.into() }
    }

    /// The literal text this token contributes to the rendered paragraph.
    pub fn rendered(&self) -> &str {
        match self {
            Self::Text { text } | Self::Strong { text } | Self::Em { text } => text,
            Self::Link { text, .. } => text,
            Self::Other { raw } => raw,
        }
    }
}

impl BlockToken {
    /// Short lowercase name used in log lines.
    pub fn kind_name(&self) -> &'static str {
        match self {
            BlockToken::Heading { .. } => "heading",
            BlockToken::Paragraph { .. } => "paragraph",
            BlockToken::List { .. } => "list",
            BlockToken::Table { .. } => "table",
            BlockToken::Blank => "blank",
            BlockToken::Raw { .. } => "raw",
        }
    }
}
