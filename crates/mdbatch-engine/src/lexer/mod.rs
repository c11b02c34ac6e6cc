//! Markdown lexing on top of pulldown-cmark.
//!
//! pulldown-cmark emits a flat stream of start/end events. This module folds
//! the top-level constructs of that stream into [`BlockToken`]s, using the
//! offset iterator so constructs without first-class treatment can be passed
//! through as their exact source text.
//!
//! ## List events
//!
//! ```markdown
//! - Parent
//!   - Child
//! ```
//! arrives as `Start(List)`, `Start(Item)`, `Text("Parent")`, `Start(List)`,
//! `Start(Item)`, `Text("Child")`, `End(Item)`, `End(List)`, `End(Item)`,
//! `End(List)`. Nested lists sit inside their parent item, so the parent's
//! text is flushed as soon as a child item starts and the whole tree comes out
//! as one flat, pre-ordered item list.

mod inline;

use std::ops::Range;

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};

use crate::tokens::{BlockToken, ListItem};
use inline::InlineCollector;

/// Lexes Markdown source into top-level block tokens.
pub fn lex(markdown: &str) -> Vec<BlockToken> {
    let parser = Parser::new_ext(markdown, Options::ENABLE_TABLES).into_offset_iter();
    let mut lexer = BlockLexer::new(markdown);

    for (event, range) in parser {
        lexer.process_event(event, range);
    }

    lexer.finish()
}

/// An item under construction.
#[derive(Debug)]
struct OpenItem {
    inline: InlineCollector,
    /// Whether part of this item was already flushed ahead of a nested list.
    flushed: bool,
}

impl OpenItem {
    fn new() -> Self {
        Self {
            inline: InlineCollector::new(),
            flushed: false,
        }
    }
}

/// The top-level construct currently being folded.
#[derive(Debug)]
enum OpenBlock {
    Heading {
        depth: u8,
        inline: InlineCollector,
    },
    Paragraph {
        range: Range<usize>,
        inline: InlineCollector,
    },
    List {
        ordered: bool,
        items: Vec<ListItem>,
        open_items: Vec<OpenItem>,
    },
    Table {
        header: Vec<String>,
        rows: Vec<Vec<String>>,
        row: Vec<String>,
        cell: Option<InlineCollector>,
    },
    Raw {
        range: Range<usize>,
    },
}

struct BlockLexer<'a> {
    source: &'a str,
    tokens: Vec<BlockToken>,
    open: Option<OpenBlock>,
    /// Event nesting depth; 0 between top-level blocks.
    depth: usize,
    /// Source end of the previous top-level block.
    last_end: Option<usize>,
}

impl<'a> BlockLexer<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            tokens: Vec::new(),
            open: None,
            depth: 0,
            last_end: None,
        }
    }

    fn process_event(&mut self, event: Event<'_>, range: Range<usize>) {
        match event {
            Event::Start(tag) => {
                if self.depth == 0 {
                    self.open_block(&tag, range);
                } else {
                    self.start_nested(&tag, range);
                }
                self.depth += 1;
            }
            Event::End(tag_end) => {
                self.depth = self.depth.saturating_sub(1);
                if self.depth == 0 {
                    self.close_block();
                } else {
                    self.end_nested(&tag_end);
                }
            }
            other => {
                if self.depth == 0 {
                    // Thematic breaks and other stand-alone events.
                    self.push_gap(range.start);
                    let range = with_indent(self.source, range);
                    self.tokens.push(raw_token(&self.source[range.clone()]));
                    self.last_end = Some(range.end);
                } else {
                    self.nested_event(&other, range);
                }
            }
        }
    }

    fn open_block(&mut self, tag: &Tag<'_>, range: Range<usize>) {
        self.push_gap(range.start);
        self.last_end = Some(range.end);

        self.open = Some(match tag {
            Tag::Heading { level, .. } => OpenBlock::Heading {
                depth: *level as u8,
                inline: InlineCollector::new(),
            },
            Tag::Paragraph => OpenBlock::Paragraph {
                range,
                inline: InlineCollector::new(),
            },
            Tag::List(first_number) => OpenBlock::List {
                ordered: first_number.is_some(),
                items: Vec::new(),
                open_items: Vec::new(),
            },
            Tag::Table(_) => OpenBlock::Table {
                header: Vec::new(),
                rows: Vec::new(),
                row: Vec::new(),
                cell: None,
            },
            _ => OpenBlock::Raw {
                range: with_indent(self.source, range),
            },
        });
    }

    /// Emits a blank token when the gap before `start` holds an empty line.
    fn push_gap(&mut self, start: usize) {
        let Some(prev_end) = self.last_end else {
            return;
        };
        let content_end = self.source[..prev_end]
            .trim_end_matches(['\n', '\r'])
            .len();
        let newlines = self.source[content_end..start]
            .bytes()
            .filter(|b| *b == b'\n')
            .count();
        if newlines >= 2 {
            self.tokens.push(BlockToken::Blank);
        }
    }

    fn start_nested(&mut self, tag: &Tag<'_>, range: Range<usize>) {
        let source = self.source;
        let raw = &source[range];
        match &mut self.open {
            Some(OpenBlock::Heading { inline, .. }) | Some(OpenBlock::Paragraph { inline, .. }) => {
                inline.start(tag, raw)
            }
            Some(OpenBlock::List {
                items, open_items, ..
            }) => match tag {
                // Everything inside a passthrough element belongs to its source slice.
                _ if open_items.last().is_some_and(|item| item.inline.in_opaque()) => {
                    if let Some(item) = open_items.last_mut() {
                        item.inline.start(tag, raw);
                    }
                }
                Tag::Item => {
                    if let Some(parent) = open_items.last_mut() {
                        let text = parent.inline.plain_text();
                        let text = text.trim();
                        if !text.is_empty() {
                            items.push(ListItem::new(text));
                            parent.flushed = true;
                        }
                        parent.inline = InlineCollector::new();
                    }
                    open_items.push(OpenItem::new());
                }
                Tag::List(_) => {}
                Tag::Paragraph => {
                    if let Some(item) = open_items.last_mut() {
                        item.inline.push_separator();
                    }
                }
                _ => {
                    if let Some(item) = open_items.last_mut() {
                        if matches!(tag, Tag::BlockQuote(_) | Tag::CodeBlock(_) | Tag::HtmlBlock) {
                            item.inline.push_separator();
                        }
                        item.inline.start(tag, raw);
                    }
                }
            },
            Some(OpenBlock::Table { cell, .. }) => match tag {
                Tag::TableHead | Tag::TableRow => {}
                Tag::TableCell => *cell = Some(InlineCollector::new()),
                _ => {
                    if let Some(cell) = cell {
                        cell.start(tag, raw);
                    }
                }
            },
            Some(OpenBlock::Raw { .. }) | None => {}
        }
    }

    fn end_nested(&mut self, tag_end: &TagEnd) {
        match &mut self.open {
            Some(OpenBlock::Heading { inline, .. }) | Some(OpenBlock::Paragraph { inline, .. }) => {
                inline.end()
            }
            Some(OpenBlock::List {
                items, open_items, ..
            }) => match tag_end {
                _ if open_items.last().is_some_and(|item| item.inline.in_opaque()) => {
                    if let Some(item) = open_items.last_mut() {
                        item.inline.end();
                    }
                }
                TagEnd::Item => {
                    if let Some(item) = open_items.pop() {
                        let text = item.inline.plain_text();
                        let text = text.trim();
                        if !text.is_empty() || !item.flushed {
                            items.push(ListItem::new(text));
                        }
                    }
                }
                TagEnd::List(_) | TagEnd::Paragraph => {}
                _ => {
                    if let Some(item) = open_items.last_mut() {
                        item.inline.end();
                    }
                }
            },
            Some(OpenBlock::Table {
                header,
                rows,
                row,
                cell,
            }) => match tag_end {
                TagEnd::TableHead => *header = std::mem::take(row),
                TagEnd::TableRow => rows.push(std::mem::take(row)),
                TagEnd::TableCell => {
                    if let Some(cell) = cell.take() {
                        row.push(cell.plain_text().trim().to_string());
                    }
                }
                _ => {
                    if let Some(cell) = cell {
                        cell.end();
                    }
                }
            },
            Some(OpenBlock::Raw { .. }) | None => {}
        }
    }

    fn nested_event(&mut self, event: &Event<'_>, range: Range<usize>) {
        let source = self.source;
        let raw = &source[range];
        match &mut self.open {
            Some(OpenBlock::Heading { inline, .. }) | Some(OpenBlock::Paragraph { inline, .. }) => {
                inline.event(event, raw)
            }
            Some(OpenBlock::List { open_items, .. }) => {
                if let Some(item) = open_items.last_mut() {
                    item.inline.event(event, raw);
                }
            }
            Some(OpenBlock::Table { cell, .. }) => {
                if let Some(cell) = cell {
                    cell.event(event, raw);
                }
            }
            Some(OpenBlock::Raw { .. }) | None => {}
        }
    }

    fn close_block(&mut self) {
        let Some(block) = self.open.take() else {
            return;
        };
        let token = match block {
            OpenBlock::Heading { depth, inline } => BlockToken::Heading {
                text: inline.plain_text().trim().to_string(),
                depth,
            },
            OpenBlock::Paragraph { range, inline } => BlockToken::Paragraph {
                text: self.source[range].trim_end_matches(['\n', '\r']).to_string(),
                inline: Some(inline.finish()),
            },
            OpenBlock::List { ordered, items, .. } => BlockToken::List { items, ordered },
            OpenBlock::Table { header, rows, .. } => BlockToken::Table { header, rows },
            OpenBlock::Raw { range } => raw_token(&self.source[range]),
        };
        self.tokens.push(token);
    }

    fn finish(mut self) -> Vec<BlockToken> {
        self.close_block();
        self.tokens
    }
}

/// Extends `range` back to the start of its line when only indentation precedes it.
fn with_indent(source: &str, range: Range<usize>) -> Range<usize> {
    let line_start = source[..range.start].rfind('\n').map_or(0, |i| i + 1);
    if source[line_start..range.start]
        .bytes()
        .all(|b| b == b' ' || b == b'\t')
    {
        line_start..range.end
    } else {
        range
    }
}

/// Source text passed through verbatim, terminated by a newline so the next
/// block starts on its own line.
fn raw_token(source: &str) -> BlockToken {
    let mut text = source.to_string();
    if !text.is_empty() && !text.ends_with('\n') {
        text.push('\n');
    }
    BlockToken::Raw { text }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::InlineToken;
    use pretty_assertions::assert_eq;

    fn items(values: &[&str]) -> Vec<ListItem> {
        values.iter().map(|v| ListItem::new(*v)).collect()
    }

    #[test]
    fn heading_with_depth() {
        assert_eq!(
            lex("# Hi\n"),
            vec![BlockToken::Heading {
                text: "Hi".to_string(),
                depth: 1
            }]
        );
        assert!(matches!(lex("### Deep\n")[0], BlockToken::Heading { depth: 3, .. }));
    }

    #[test]
    fn heading_text_drops_emphasis_markers() {
        assert_eq!(
            lex("## A **bold** move\n"),
            vec![BlockToken::Heading {
                text: "A bold move".to_string(),
                depth: 2
            }]
        );
    }

    #[test]
    fn paragraph_keeps_source_text_and_inline_run() {
        assert_eq!(
            lex("go **fast**\n"),
            vec![BlockToken::Paragraph {
                text: "go **fast**".to_string(),
                inline: Some(vec![InlineToken::text("go "), InlineToken::strong("fast")]),
            }]
        );
    }

    #[test]
    fn inline_kinds() {
        let tokens = lex("*a* [docs](https://example.com) `x` ![i](i.png)\n");
        let BlockToken::Paragraph {
            inline: Some(inline),
            ..
        } = &tokens[0]
        else {
            panic!("expected paragraph, got {tokens:?}");
        };
        assert_eq!(
            inline,
            &vec![
                InlineToken::em("a"),
                InlineToken::text(" "),
                InlineToken::link("docs", "https://example.com"),
                InlineToken::text(" "),
                InlineToken::other("`x`"),
                InlineToken::text(" "),
                InlineToken::other("![i](i.png)"),
            ]
        );
    }

    #[test]
    fn nested_emphasis_flattens_into_outer_style() {
        let tokens = lex("**a *b***\n");
        assert!(matches!(
            &tokens[0],
            BlockToken::Paragraph { inline: Some(inline), .. }
                if inline == &vec![InlineToken::strong("a b")]
        ));
    }

    #[test]
    fn soft_breaks_stay_in_the_text() {
        let tokens = lex("a\nb\n");
        assert_eq!(
            tokens,
            vec![BlockToken::Paragraph {
                text: "a\nb".to_string(),
                inline: Some(vec![InlineToken::text("a\nb")]),
            }]
        );
    }

    #[test]
    fn bullet_and_numbered_lists() {
        assert_eq!(
            lex("- a\n- b\n"),
            vec![BlockToken::List {
                items: items(&["a", "b"]),
                ordered: false
            }]
        );
        assert_eq!(
            lex("1. one\n2. two\n"),
            vec![BlockToken::List {
                items: items(&["one", "two"]),
                ordered: true
            }]
        );
    }

    #[test]
    fn nested_lists_flatten_in_document_order() {
        assert_eq!(
            lex("- Parent\n  - Child\n- Next\n"),
            vec![BlockToken::List {
                items: items(&["Parent", "Child", "Next"]),
                ordered: false
            }]
        );
    }

    #[test]
    fn list_items_render_inline_text() {
        assert_eq!(
            lex("- **bold** item\n"),
            vec![BlockToken::List {
                items: items(&["bold item"]),
                ordered: false
            }]
        );
    }

    #[test]
    fn table_cells() {
        assert_eq!(
            lex("| A | B |\n|---|---|\n| 1 | 2 |\n| 3 | 4 |\n"),
            vec![BlockToken::Table {
                header: vec!["A".to_string(), "B".to_string()],
                rows: vec![
                    vec!["1".to_string(), "2".to_string()],
                    vec!["3".to_string(), "4".to_string()],
                ],
            }]
        );
    }

    #[test]
    fn blank_lines_between_blocks() {
        let tokens = lex("# T\n\nPara\n");
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[1], BlockToken::Blank);

        // Several blank lines still make one gap.
        let tokens = lex("# T\n\n\n\nPara\n");
        assert_eq!(tokens.len(), 3);

        let tokens = lex("# T\nPara\n");
        assert_eq!(tokens.len(), 2);
    }

    #[test]
    fn unsupported_blocks_pass_through_as_source() {
        assert_eq!(
            lex("```\ncode\n```\n"),
            vec![BlockToken::Raw {
                text: "```\ncode\n```\n".to_string()
            }]
        );
        assert_eq!(
            lex("> quoted\n"),
            vec![BlockToken::Raw {
                text: "> quoted\n".to_string()
            }]
        );
        assert_eq!(
            lex("---\n"),
            vec![BlockToken::Raw {
                text: "---\n".to_string()
            }]
        );
    }

    #[test]
    fn indented_code_keeps_every_line_indent() {
        let source = "    let a = 1;\n    let b = 2;\n";
        assert_eq!(
            lex(source),
            vec![BlockToken::Raw {
                text: source.to_string()
            }]
        );
    }

    #[test]
    fn indented_code_after_paragraph() {
        assert_eq!(
            lex("Intro\n\n    code\n"),
            vec![
                BlockToken::Paragraph {
                    text: "Intro".to_string(),
                    inline: Some(vec![InlineToken::text("Intro")]),
                },
                BlockToken::Blank,
                BlockToken::Raw {
                    text: "    code\n".to_string()
                },
            ]
        );
    }

    #[test]
    fn list_inside_quoted_item_is_kept_as_source() {
        assert_eq!(
            lex("- a\n  > - x\n- b\n"),
            vec![BlockToken::List {
                items: items(&["a > - x", "b"]),
                ordered: false
            }]
        );
    }

    #[test]
    fn raw_without_trailing_newline_gets_one() {
        assert_eq!(
            lex("```\ncode\n```"),
            vec![BlockToken::Raw {
                text: "```\ncode\n```\n".to_string()
            }]
        );
    }

    #[test]
    fn empty_source_has_no_tokens() {
        assert!(lex("").is_empty());
    }
}
