//! One transition per block kind.
//!
//! Each arm inserts the block's text, then emits the style operations for the
//! offsets that text now occupies. No arm looks at neighbouring blocks; the
//! cursor threaded in by the caller is the only state carried between calls.

use super::CompileOptions;
use super::cursor::{Cursor, utf16_len};
use super::emit::Emitter;
use super::inline::compose;
use super::table;
use crate::ops::{EditOperation, TextRange, TextStyle};
use crate::tokens::BlockToken;

pub fn dispatch(token: &BlockToken, cursor: &mut Cursor, options: &CompileOptions, out: &mut Emitter) {
    match token {
        BlockToken::Heading { text, depth } => {
            let line = format!("{text}\n");
            let range = cursor.advance_over(&line);
            out.insert(line);
            out.push(EditOperation::SetParagraphStyle {
                style_name: format!("HEADING_{depth}"),
                range,
            });
        }
        BlockToken::Paragraph { text, inline } => match inline.as_deref() {
            Some(tokens) if !tokens.is_empty() => {
                let composed = compose(tokens);
                let line = composed.text + "\n";
                let range = cursor.advance_over(&line);
                out.insert(line);
                for span in composed.spans {
                    out.push(EditOperation::SetTextStyle {
                        style: span.style,
                        range: span.range.offset_by(range.start),
                    });
                }
            }
            // An empty inline run renders exactly like a paragraph without one.
            _ => {
                let line = format!("{text}\n");
                cursor.advance_over(&line);
                out.insert(line);
            }
        },
        BlockToken::List { items, ordered } => {
            let preset = options.bullet_preset(*ordered);
            for item in items {
                let line = format!("{}\n", item.text);
                let range = cursor.advance_over(&line);
                out.insert(line);
                out.push(EditOperation::SetListBullet {
                    preset: preset.to_string(),
                    range,
                });
            }
        }
        BlockToken::Table { header, rows } => {
            let body = table::render(header, rows);
            let block = format!("{body}\n");
            let range = cursor.advance_over(&block);
            out.insert(block);
            out.push(EditOperation::SetTextStyle {
                style: TextStyle::FontFamily {
                    family: options.monospace_font.clone(),
                },
                range: TextRange::at(range.start, utf16_len(&body)),
            });
        }
        BlockToken::Blank => {
            cursor.advance_over("\n");
            out.insert("\n");
        }
        BlockToken::Raw { text } => {
            if text.is_empty() {
                return;
            }
            cursor.advance_over(text);
            out.insert(text.clone());
        }
    }
}
