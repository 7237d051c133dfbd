/*!
 * Tests for the subtitle document model and its readers
 */

use anyhow::Result;
use srv3conv::errors::SubtitleError;
use srv3conv::subtitle_document::{SubtitleDocument, SubtitleEvent};
use srv3conv::tag_parser::Block;
use crate::common;

#[test]
fn test_parseAssString_withSampleScript_shouldReadAllEvents() -> Result<()> {
    let events = SubtitleDocument::parse_ass_string(common::SAMPLE_ASS)?;

    assert_eq!(events.len(), 4);
    assert_eq!(events[0].start_ms, 5000);
    assert_eq!(events[0].end_ms, 7500);
    assert_eq!(events[0].text, "Second line, with a comma");

    assert_eq!(events[1].actor, "Alice");
    assert_eq!(events[1].text, "{\\i1}Hello{\\i0}\\Nworld");
    assert!(!events[1].comment);

    assert!(events[2].comment);
    assert_eq!(events[2].text, "Timing note");
    Ok(())
}

#[test]
fn test_parseAssString_withCustomFormatOrder_shouldFollowFormatLine() -> Result<()> {
    let script = "[Events]\nFormat: Start, End, Text\nDialogue: 0:00:01.00,0:00:02.00,Hi, there\n";
    let events = SubtitleDocument::parse_ass_string(script)?;

    assert_eq!(events, vec![SubtitleEvent::new(1000, 2000, "Hi, there")]);
    Ok(())
}

#[test]
fn test_parseAssString_withSsaMarkedField_shouldDefaultLayer() -> Result<()> {
    let script = "[Events]\nFormat: Marked, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text\nDialogue: Marked=0,0:00:00.00,0:00:01.00,Default,,0000,0000,0000,,SSA line\n";
    let events = SubtitleDocument::parse_ass_string(script)?;

    assert_eq!(events[0].layer, 0);
    assert_eq!(events[0].text, "SSA line");
    Ok(())
}

#[test]
fn test_parseAssString_withoutEventsSection_shouldFail() {
    let result = SubtitleDocument::parse_ass_string("[Script Info]\nTitle: x\n");
    assert!(matches!(result, Err(SubtitleError::MissingEventsSection)));
}

#[test]
fn test_parseAssString_withTooFewFields_shouldReportLine() {
    let result = SubtitleDocument::parse_ass_string("[Events]\nDialogue: 0,0:00:00.00\n");
    match result {
        Err(SubtitleError::MalformedEvent { line, .. }) => assert_eq!(line, 2),
        other => panic!("expected malformed event error, got {:?}", other),
    }
}

#[test]
fn test_parseAssString_withBadTimestamp_shouldFail() {
    let script = "[Events]\nFormat: Start, End, Text\nDialogue: nope,0:00:02.00,Hi\n";
    assert!(SubtitleDocument::parse_ass_string(script).is_err());
}

#[test]
fn test_parseAssString_withOverflowingHours_shouldReportLine() {
    let script = "[Events]\nFormat: Start, End, Text\nDialogue: 9999999999999:00:00.00,9999999999999:00:01.00,Hi\n";
    match SubtitleDocument::parse_ass_string(script) {
        Err(SubtitleError::MalformedEvent { line, .. }) => assert_eq!(line, 3),
        other => panic!("expected malformed event error, got {:?}", other),
    }
}

#[test]
fn test_parseSrtString_withSample_shouldConvertBreaksAndStyling() -> Result<()> {
    let events = SubtitleDocument::parse_srt_string(common::SAMPLE_SRT)?;

    assert_eq!(events.len(), 2);
    assert_eq!(events[0].start_ms, 1000);
    assert_eq!(events[0].end_ms, 4000);
    assert_eq!(events[0].text, "This is a {\\i1}test{\\i0} subtitle.");
    assert_eq!(events[1].text, "It contains\\Nmultiple lines.");
    Ok(())
}

#[test]
fn test_parseSrtString_withoutBlankSeparator_shouldNotLeakSequenceNumbers() -> Result<()> {
    let srt = "1\n00:00:01,000 --> 00:00:02,000\nfirst\n2\n00:00:03,000 --> 00:00:04,000\nsecond\n";
    let events = SubtitleDocument::parse_srt_string(srt)?;

    assert_eq!(events.len(), 2);
    assert_eq!(events[0].text, "first");
    assert_eq!(events[1].text, "second");
    Ok(())
}

#[test]
fn test_parseSrtString_withNoEntries_shouldFail() {
    assert!(matches!(
        SubtitleDocument::parse_srt_string("just text\n"),
        Err(SubtitleError::Empty(_))
    ));
}

#[test]
fn test_subtitleEvent_display_shouldFormatAsDialogueLine() {
    let event = SubtitleEvent::new(1500, 3000, "Hi");
    assert_eq!(event.to_string(), "Dialogue: 0,0:00:01.50,0:00:03.00,Default,,0,0,0,,Hi");

    let comment = SubtitleEvent::new_comment(0, 10, "c");
    assert!(comment.to_string().starts_with("Comment: "));
}

#[test]
fn test_subtitleEvent_parseBlocks_shouldDecomposeText() {
    let event = SubtitleEvent::new(0, 1, "{\\i1}a{b}");
    let blocks = event.parse_blocks();
    assert_eq!(blocks.len(), 3);
    assert_eq!(blocks[1], Block::Plain("a".to_string()));
    assert_eq!(blocks[2], Block::Comment("b".to_string()));
}

#[test]
fn test_fromFile_withAssExtension_shouldUseAssReader() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_ass(temp_dir.path(), "episode.ass")?;

    let document = SubtitleDocument::from_file(&path)?;
    assert_eq!(document.source_file, path);
    assert_eq!(document.events.len(), 4);
    Ok(())
}

#[test]
fn test_fromFile_withUnknownContent_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "notes.txt", "nothing to see")?;

    assert!(SubtitleDocument::from_file(&path).is_err());
    Ok(())
}
