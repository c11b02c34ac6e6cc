//! Edit operations emitted by the compiler.
//!
//! The Rust side keeps one flat enum so the emitted list preserves strict
//! application order. Serialization goes through [`wire`], which mirrors the
//! Google Docs `batchUpdate` request schema.

use serde::{Deserialize, Serialize};

/// Half-open `[start, end)` range of document offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRange {
    #[serde(rename = "startIndex")]
    pub start: usize,
    #[serde(rename = "endIndex")]
    pub end: usize,
}

impl TextRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Range of `len` offsets beginning at `start`.
    pub fn at(start: usize, len: usize) -> Self {
        Self::new(start, start + len)
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Shifts a range expressed relative to some origin onto absolute offsets.
    pub fn offset_by(self, origin: usize) -> Self {
        Self::new(self.start + origin, self.end + origin)
    }
}

/// Character-level style carried by [`EditOperation::SetTextStyle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextStyle {
    Bold,
    Italic,
    Link { url: String },
    FontFamily { family: String },
}

impl TextStyle {
    /// Field mask telling the service which style attribute is being written.
    pub fn field_mask(&self) -> &'static str {
        match self {
            TextStyle::Bold => "bold",
            TextStyle::Italic => "italic",
            TextStyle::Link { .. } => "link",
            TextStyle::FontFamily { .. } => "weightedFontFamily",
        }
    }
}

/// One atomic instruction in a batch sent to the Document Update Service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "wire::Request")]
pub enum EditOperation {
    /// Appends text at the end of the body segment.
    InsertText { text: String },
    SetParagraphStyle {
        style_name: String,
        range: TextRange,
    },
    SetTextStyle { style: TextStyle, range: TextRange },
    SetListBullet { preset: String, range: TextRange },
    DeleteContentRange { range: TextRange },
}

impl EditOperation {
    pub fn insert_text(text: impl Into<String>) -> Self {
        Self::InsertText { text: text.into() }
    }

    /// Text appended by this operation, if it is an insertion.
    pub fn inserted_text(&self) -> Option<&str> {
        match self {
            Self::InsertText { text } => Some(text),
            _ => None,
        }
    }

    /// Range addressed by this operation, if any.
    pub fn range(&self) -> Option<TextRange> {
        match self {
            Self::InsertText { .. } => None,
            Self::SetParagraphStyle { range, .. }
            | Self::SetTextStyle { range, .. }
            | Self::SetListBullet { range, .. }
            | Self::DeleteContentRange { range } => Some(*range),
        }
    }
}

mod wire {
    use serde::Serialize;

    use super::{EditOperation, TextRange, TextStyle};

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    pub enum Request {
        InsertText(InsertText),
        UpdateParagraphStyle(UpdateParagraphStyle),
        UpdateTextStyle(UpdateTextStyle),
        CreateParagraphBullets(CreateParagraphBullets),
        DeleteContentRange(DeleteContentRange),
    }

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct InsertText {
        text: String,
        end_of_segment_location: EndOfSegmentLocation,
    }

    #[derive(Serialize)]
    pub struct EndOfSegmentLocation {}

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct UpdateParagraphStyle {
        paragraph_style: ParagraphStyle,
        range: TextRange,
        fields: &'static str,
    }

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ParagraphStyle {
        named_style_type: String,
    }

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct UpdateTextStyle {
        text_style: WireTextStyle,
        range: TextRange,
        fields: &'static str,
    }

    #[derive(Serialize, Default)]
    #[serde(rename_all = "camelCase")]
    pub struct WireTextStyle {
        #[serde(skip_serializing_if = "Option::is_none")]
        bold: Option<bool>,
        #[serde(skip_serializing_if = "Option::is_none")]
        italic: Option<bool>,
        #[serde(skip_serializing_if = "Option::is_none")]
        link: Option<Link>,
        #[serde(skip_serializing_if = "Option::is_none")]
        weighted_font_family: Option<WeightedFontFamily>,
    }

    #[derive(Serialize)]
    pub struct Link {
        url: String,
    }

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct WeightedFontFamily {
        font_family: String,
    }

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CreateParagraphBullets {
        range: TextRange,
        bullet_preset: String,
    }

    #[derive(Serialize)]
    pub struct DeleteContentRange {
        range: TextRange,
    }

    impl From<TextStyle> for WireTextStyle {
        fn from(style: TextStyle) -> Self {
            match style {
                TextStyle::Bold => Self {
                    bold: Some(true),
                    ..Self::default()
                },
                TextStyle::Italic => Self {
                    italic: Some(true),
                    ..Self::default()
                },
                TextStyle::Link { url } => Self {
                    link: Some(Link { url }),
                    ..Self::default()
                },
                TextStyle::FontFamily { family } => Self {
                    weighted_font_family: Some(WeightedFontFamily {
                        font_family: family,
                    }),
                    ..Self::default()
                },
            }
        }
    }

    impl From<EditOperation> for Request {
        fn from(op: EditOperation) -> Self {
            match op {
                EditOperation::InsertText { text } => Request::InsertText(InsertText {
                    text,
                    end_of_segment_location: EndOfSegmentLocation {},
                }),
                EditOperation::SetParagraphStyle { style_name, range } => {
                    Request::UpdateParagraphStyle(UpdateParagraphStyle {
                        paragraph_style: ParagraphStyle {
                            named_style_type: style_name,
                        },
                        range,
                        fields: "namedStyleType",
                    })
                }
                EditOperation::SetTextStyle { style, range } => {
                    let fields = style.field_mask();
                    Request::UpdateTextStyle(UpdateTextStyle {
                        text_style: style.into(),
                        range,
                        fields,
                    })
                }
                EditOperation::SetListBullet { preset, range } => {
                    Request::CreateParagraphBullets(CreateParagraphBullets {
                        range,
                        bullet_preset: preset,
                    })
                }
                EditOperation::DeleteContentRange { range } => {
                    Request::DeleteContentRange(DeleteContentRange { range })
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn insert_text_appends_at_end_of_segment() {
        let op = EditOperation::insert_text("Hi\n");
        assert_eq!(
            serde_json::to_value(&op).unwrap(),
            json!({"insertText": {"text": "Hi\n", "endOfSegmentLocation": {}}})
        );
    }

    #[test]
    fn paragraph_style_carries_named_style_and_mask() {
        let op = EditOperation::SetParagraphStyle {
            style_name: "HEADING_1".to_string(),
            range: TextRange::new(1, 4),
        };
        assert_eq!(
            serde_json::to_value(&op).unwrap(),
            json!({"updateParagraphStyle": {
                "paragraphStyle": {"namedStyleType": "HEADING_1"},
                "range": {"startIndex": 1, "endIndex": 4},
                "fields": "namedStyleType"
            }})
        );
    }

    #[test]
    fn text_styles_only_write_their_own_attribute() {
        let link = EditOperation::SetTextStyle {
            style: TextStyle::Link {
                url: "https://example.com".to_string(),
            },
            range: TextRange::new(3, 7),
        };
        assert_eq!(
            serde_json::to_value(&link).unwrap(),
            json!({"updateTextStyle": {
                "textStyle": {"link": {"url": "https://example.com"}},
                "range": {"startIndex": 3, "endIndex": 7},
                "fields": "link"
            }})
        );

        let mono = EditOperation::SetTextStyle {
            style: TextStyle::FontFamily {
                family: "Consolas".to_string(),
            },
            range: TextRange::new(1, 2),
        };
        assert_eq!(
            serde_json::to_value(&mono).unwrap()["updateTextStyle"]["textStyle"],
            json!({"weightedFontFamily": {"fontFamily": "Consolas"}})
        );

        let italic = EditOperation::SetTextStyle {
            style: TextStyle::Italic,
            range: TextRange::new(1, 2),
        };
        let value = serde_json::to_value(&italic).unwrap();
        assert_eq!(value["updateTextStyle"]["textStyle"], json!({"italic": true}));
        assert_eq!(value["updateTextStyle"]["fields"], json!("italic"));
    }

    #[test]
    fn list_bullet_and_delete_shapes() {
        let bullet = EditOperation::SetListBullet {
            preset: "BULLET_DISC_CIRCLE_SQUARE".to_string(),
            range: TextRange::new(1, 3),
        };
        assert_eq!(
            serde_json::to_value(&bullet).unwrap(),
            json!({"createParagraphBullets": {
                "range": {"startIndex": 1, "endIndex": 3},
                "bulletPreset": "BULLET_DISC_CIRCLE_SQUARE"
            }})
        );

        let delete = EditOperation::DeleteContentRange {
            range: TextRange::new(1, 10),
        };
        assert_eq!(
            serde_json::to_value(&delete).unwrap(),
            json!({"deleteContentRange": {"range": {"startIndex": 1, "endIndex": 10}}})
        );
    }

    #[test]
    fn range_helpers() {
        let r = TextRange::at(4, 4);
        assert_eq!(r, TextRange::new(4, 8));
        assert_eq!(r.len(), 4);
        assert!(!r.is_empty());
        assert_eq!(TextRange::new(0, 2).offset_by(5), TextRange::new(5, 7));
        assert!(TextRange::new(3, 3).is_empty());
    }
}
