/*!
 * Tests for the document normalisation passes
 */

use srv3conv::app_config::ExportConfig;
use srv3conv::normalize::{normalize, sort_by_start};
use srv3conv::subtitle_document::SubtitleEvent;

fn spans(events: &[SubtitleEvent]) -> Vec<(i64, i64, String)> {
    events.iter().map(|e| (e.start_ms, e.end_ms, e.text.clone())).collect()
}

#[test]
fn test_sortByStart_withEqualStarts_shouldBeStable() {
    let mut events = vec![
        SubtitleEvent::new(1000, 2000, "b1"),
        SubtitleEvent::new(0, 500, "a"),
        SubtitleEvent::new(1000, 1500, "b2"),
    ];
    sort_by_start(&mut events);
    let texts: Vec<&str> = events.iter().map(|e| e.text.as_str()).collect();
    assert_eq!(texts, vec!["a", "b1", "b2"]);
}

#[test]
fn test_normalize_withDefaults_shouldRunAllPasses() {
    let mut events = vec![
        SubtitleEvent::new(2000, 3000, "same"),
        SubtitleEvent::new_comment(0, 5000, "note"),
        SubtitleEvent::new(1000, 2000, "same"),
        SubtitleEvent::new(4000, 6000, "A"),
        SubtitleEvent::new(5000, 7000, "B"),
    ];
    normalize(&mut events, &ExportConfig::default());

    assert_eq!(spans(&events), vec![
        (1000, 3000, "same".to_string()),
        (4000, 5000, "A".to_string()),
        (5000, 6000, "A\\NB".to_string()),
        (6000, 7000, "B".to_string()),
    ]);
}

#[test]
fn test_normalize_withRawConfig_shouldLeaveEventsUntouched() {
    let original = vec![
        SubtitleEvent::new(2000, 3000, "late"),
        SubtitleEvent::new_comment(0, 1000, "note"),
        SubtitleEvent::new(2500, 3500, "overlap"),
    ];
    let mut events = original.clone();
    normalize(&mut events, &ExportConfig::raw());
    assert_eq!(events, original);
}

#[test]
fn test_normalize_withTouchingDifferentText_shouldNotMerge() {
    let mut events = vec![
        SubtitleEvent::new(0, 1000, "one"),
        SubtitleEvent::new(1000, 2000, "two"),
    ];
    normalize(&mut events, &ExportConfig::default());
    assert_eq!(events.len(), 2);
}
