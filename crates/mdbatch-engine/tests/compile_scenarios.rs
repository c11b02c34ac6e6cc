use mdbatch_engine::{
    BlockToken, CompileOptions, EditOperation, InlineToken, ListItem, TextRange, TextStyle,
    compile, compile_markdown,
};
use pretty_assertions::assert_eq;

fn options_at(initial_offset: usize) -> CompileOptions {
    CompileOptions::default().with_initial_offset(initial_offset)
}

#[test]
fn single_heading() {
    let c = compile_markdown("# Hi\n", &options_at(1)).unwrap();
    assert_eq!(
        c.operations,
        vec![
            EditOperation::insert_text("Hi\n"),
            EditOperation::SetParagraphStyle {
                style_name: "HEADING_1".to_string(),
                range: TextRange::new(1, 4),
            },
        ]
    );
    assert_eq!(c.final_offset, 4);
}

#[test]
fn paragraph_with_bold_run() {
    let tokens = vec![BlockToken::Paragraph {
        text: "go **fast**".to_string(),
        inline: Some(vec![InlineToken::text("go "), InlineToken::strong("fast")]),
    }];
    let c = compile(&tokens, &options_at(1)).unwrap();
    assert_eq!(
        c.operations,
        vec![
            EditOperation::insert_text("go fast\n"),
            EditOperation::SetTextStyle {
                style: TextStyle::Bold,
                range: TextRange::new(4, 8),
            },
        ]
    );
    assert_eq!(c.final_offset, 9);
}

#[test]
fn unordered_list_items_each_get_a_bullet() {
    let tokens = vec![BlockToken::List {
        items: vec![ListItem::new("a"), ListItem::new("b")],
        ordered: false,
    }];
    let c = compile(&tokens, &options_at(1)).unwrap();
    let bullet = |start, end| EditOperation::SetListBullet {
        preset: "BULLET_DISC_CIRCLE_SQUARE".to_string(),
        range: TextRange::new(start, end),
    };
    assert_eq!(
        c.operations,
        vec![
            EditOperation::insert_text("a\n"),
            bullet(1, 3),
            EditOperation::insert_text("b\n"),
            bullet(3, 5),
        ]
    );
    assert_eq!(c.final_offset, 5);
}

#[test]
fn blank_alone() {
    let c = compile(&[BlockToken::Blank], &options_at(5)).unwrap();
    assert_eq!(c.operations, vec![EditOperation::insert_text("\n")]);
    assert_eq!(c.final_offset, 6);
}

#[test]
fn empty_input_compiles_to_empty_batch() {
    let c = compile_markdown("", &options_at(1)).unwrap();
    assert!(c.operations.is_empty());
    assert_eq!(c.final_offset, 1);
    assert!(c.into_batch().is_empty());
}

#[test]
fn blocks_follow_each_other_without_gaps() {
    let c = compile_markdown("# Title\n\nSome *text*.\n\n- one\n- two\n", &options_at(1)).unwrap();
    assert_eq!(
        c.operations,
        vec![
            EditOperation::insert_text("Title\n"),
            EditOperation::SetParagraphStyle {
                style_name: "HEADING_1".to_string(),
                range: TextRange::new(1, 7),
            },
            EditOperation::insert_text("\n"),
            EditOperation::insert_text("Some text.\n"),
            EditOperation::SetTextStyle {
                style: TextStyle::Italic,
                range: TextRange::new(13, 17),
            },
            EditOperation::insert_text("\n"),
            EditOperation::insert_text("one\n"),
            EditOperation::SetListBullet {
                preset: "BULLET_DISC_CIRCLE_SQUARE".to_string(),
                range: TextRange::new(20, 24),
            },
            EditOperation::insert_text("two\n"),
            EditOperation::SetListBullet {
                preset: "BULLET_DISC_CIRCLE_SQUARE".to_string(),
                range: TextRange::new(24, 28),
            },
        ]
    );
    assert_eq!(c.final_offset, 28);
}

#[test]
fn custom_presets_and_font_are_used() {
    let options = CompileOptions {
        monospace_font: "Roboto Mono".to_string(),
        ordered_preset: "NUMBERED_UPPERROMAN_UPPERALPHA_DECIMAL".to_string(),
        ..CompileOptions::default()
    };
    let c = compile_markdown("1. x\n\n| A |\n|---|\n| 1 |\n", &options).unwrap();
    assert!(c.operations.iter().any(|op| matches!(
        op,
        EditOperation::SetListBullet { preset, .. } if preset == "NUMBERED_UPPERROMAN_UPPERALPHA_DECIMAL"
    )));
    assert!(c.operations.iter().any(|op| matches!(
        op,
        EditOperation::SetTextStyle { style: TextStyle::FontFamily { family }, .. } if family == "Roboto Mono"
    )));
}

#[test]
fn batch_json_matches_service_schema() {
    let batch = compile_markdown("# Hi\n", &options_at(1)).unwrap().into_batch();
    assert_eq!(
        serde_json::to_value(&batch).unwrap(),
        serde_json::json!({"requests": [
            {"insertText": {"text": "Hi\n", "endOfSegmentLocation": {}}},
            {"updateParagraphStyle": {
                "paragraphStyle": {"namedStyleType": "HEADING_1"},
                "range": {"startIndex": 1, "endIndex": 4},
                "fields": "namedStyleType"
            }}
        ]})
    );
}
