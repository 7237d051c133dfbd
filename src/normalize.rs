/*!
 * Document normalisation run before export.
 *
 * Formats like srv3 have no notion of layers, comments or simultaneous
 * cues, so the exporter flattens a copy of the document first:
 * - `sort`: order events by start time
 * - `strip_comments`: drop commented-out and empty events
 * - `recombine_overlaps`: split overlapping events into non-overlapping pieces
 * - `merge_identical`: join back-to-back events with identical text
 */

use log::debug;
use crate::app_config::ExportConfig;
use crate::subtitle_document::SubtitleEvent;

/// Run every pass enabled in `config`, in the order listed above
pub fn normalize(events: &mut Vec<SubtitleEvent>, config: &ExportConfig) {
    if config.sort {
        sort_by_start(events);
    }
    if config.strip_comments {
        strip_comments(events);
    }
    if config.recombine_overlaps {
        recombine_overlaps(events);
    }
    if config.merge_identical {
        merge_identical(events);
    }
}

/// Stable sort by start time
pub fn sort_by_start(events: &mut [SubtitleEvent]) {
    events.sort_by_key(|e| e.start_ms);
}

/// Remove commented-out events and events with empty text
pub fn strip_comments(events: &mut Vec<SubtitleEvent>) {
    let before = events.len();
    events.retain(|e| !e.comment && !e.text.is_empty());
    debug!("Stripped {} comment/empty events", before - events.len());
}

/// Split overlapping events so no two cues are on screen at once.
///
/// Expects sorted input. For an event `a` overlapped by the following `b`, the
/// pair is replaced by up to three pieces: `a` alone until `b` starts, both
/// texts joined with `\N` while they overlap, then whichever one lasts longer.
pub fn recombine_overlaps(events: &mut Vec<SubtitleEvent>) {
    let mut i = 1;
    while i < events.len() {
        let prev = &events[i - 1];
        let cur = &events[i];
        if cur.start_ms >= prev.end_ms {
            i += 1;
            continue;
        }

        let pieces = split_overlap(prev, cur);
        debug!(
            "Recombined overlap at {}-{} ms into {} pieces",
            prev.start_ms, cur.end_ms.max(prev.end_ms), pieces.len()
        );

        events.remove(i);
        events.remove(i - 1);
        for piece in pieces {
            // Pieces can start later than events following the pair, so re-insert in order
            let pos = events.partition_point(|e| e.start_ms <= piece.start_ms);
            events.insert(pos, piece);
        }

        // The first piece starts where `prev` did; anything earlier is already overlap-free
        i = i.saturating_sub(1).max(1);
    }
}

fn split_overlap(prev: &SubtitleEvent, cur: &SubtitleEvent) -> Vec<SubtitleEvent> {
    let mut pieces = Vec::with_capacity(3);
    let overlap_end = prev.end_ms.min(cur.end_ms);

    if prev.start_ms < cur.start_ms {
        pieces.push(piece_of(prev, prev.start_ms, cur.start_ms, prev.text.clone()));
    }

    if cur.start_ms < overlap_end {
        pieces.push(piece_of(
            prev,
            cur.start_ms,
            overlap_end,
            format!("{}\\N{}", prev.text, cur.text),
        ));
    }

    let (longer, tail_end) = if prev.end_ms > cur.end_ms {
        (prev, prev.end_ms)
    } else {
        (cur, cur.end_ms)
    };
    if overlap_end < tail_end {
        pieces.push(piece_of(longer, overlap_end, tail_end, longer.text.clone()));
    }

    pieces
}

fn piece_of(template: &SubtitleEvent, start_ms: i64, end_ms: i64, text: String) -> SubtitleEvent {
    SubtitleEvent {
        start_ms,
        end_ms,
        text,
        ..template.clone()
    }
}

/// Merge consecutive events with identical text that touch end-to-start
pub fn merge_identical(events: &mut Vec<SubtitleEvent>) {
    let mut merged: Vec<SubtitleEvent> = Vec::with_capacity(events.len());
    for event in events.drain(..) {
        match merged.last_mut() {
            Some(last) if last.end_ms == event.start_ms && last.text == event.text => {
                last.end_ms = event.end_ms;
            }
            _ => merged.push(event),
        }
    }
    *events = merged;
}
