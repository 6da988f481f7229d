//! Terminal-style message reveal.
//!
//! Appends one character of the source per tick, blinks a cursor, plays a
//! keystroke per visible character, fires the alert cue once when the
//! marker first appears and routes configured tokens through the scramble
//! effect. Dropping the display drops all of its timers.

mod scramble;
mod scroll;

use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::audio::Cue;
use crate::content::Content;
use crate::feedback::Feedback;
use crate::params::RevealTiming;
use crate::timer::{advance_slot, fire_slot, Interval};

pub use scramble::Scramble;
pub use scroll::ScrollFollow;

/// One token occurrence in the source, in character indices
#[derive(Debug, Clone, PartialEq, Eq)]
struct TokenSpan {
    start: usize,
    len: usize,
    token: String,
}

/// A rendered line of the terminal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayLine {
    pub text: String,
    /// Contains the validation marker
    pub marker: bool,
    /// Cursor block drawn after the text
    pub cursor: bool,
}

pub struct RevealDisplay {
    timing: RevealTiming,
    source: Vec<char>,
    marker: String,
    spans: Vec<TokenSpan>,
    scrambles: Vec<Option<Scramble>>,

    revealed: String,
    index: usize,
    alerted: bool,
    cursor_visible: bool,

    reveal: Option<Interval>,
    cursor: Interval,
    scroll: ScrollFollow,
    line_px: f32,
    rng: StdRng,
}

impl RevealDisplay {
    pub fn new(timing: RevealTiming, content: &Content, seed: u64) -> Self {
        let source: Vec<char> = content.message.chars().collect();
        let spans = find_token_spans(&content.message, &content.scramble_tokens);
        let scrambles = spans.iter().map(|_| None).collect();

        Self {
            reveal: (!source.is_empty()).then(|| Interval::new(timing.char_period)),
            cursor: Interval::new(timing.cursor_period),
            scroll: ScrollFollow::new(0.0, timing.scroll_follow_rate),
            timing,
            source,
            marker: content.marker.clone(),
            spans,
            scrambles,
            revealed: String::new(),
            index: 0,
            alerted: false,
            cursor_visible: true,
            line_px: 0.0,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Viewport height and line height used for bottom tracking
    pub fn set_viewport(&mut self, viewport_px: f32, line_px: f32) {
        self.scroll.set_viewport(viewport_px);
        self.line_px = line_px;
        self.track_bottom();
    }

    pub fn update(&mut self, dt: Duration, fx: &mut dyn Feedback) {
        // Scrambles started below are caught up inside reveal_next
        for scramble in self.scrambles.iter_mut().flatten() {
            scramble.update(dt, &mut self.rng);
        }

        advance_slot(&mut self.reveal, dt);
        while fire_slot(&mut self.reveal) {
            self.reveal_next(fx);
        }

        self.cursor.advance(dt);
        while self.cursor.fire() {
            self.cursor_visible = !self.cursor_visible;
        }

        self.scroll.update(dt.as_secs_f32());
    }

    fn reveal_next(&mut self, fx: &mut dyn Feedback) {
        let Some(&ch) = self.source.get(self.index) else {
            self.reveal = None;
            return;
        };

        self.revealed.push(ch);
        let position = self.index;
        self.index += 1;
        let since_tick = self
            .reveal
            .as_ref()
            .map_or(Duration::ZERO, Interval::since_fire);

        if !ch.is_whitespace() {
            fx.cue(Cue::Keystroke);
        }

        if !self.alerted && !self.marker.is_empty() && self.revealed.ends_with(&self.marker) {
            self.alerted = true;
            fx.cue(Cue::Alert);
        }

        for (span, slot) in self.spans.iter().zip(self.scrambles.iter_mut()) {
            if span.start == position {
                let mut scramble =
                    Scramble::new(&span.token, self.timing.scramble_period, &mut self.rng);
                scramble.update(since_tick, &mut self.rng);
                *slot = Some(scramble);
            }
        }

        if ch == '\n' {
            self.track_bottom();
        }

        if self.index == self.source.len() {
            self.reveal = None;
        }
    }

    fn track_bottom(&mut self) {
        let lines = self.revealed.matches('\n').count() + 1;
        self.scroll.track(lines as f32 * self.line_px);
    }

    /// Characters revealed so far
    pub fn progress(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.source.len()
    }

    pub fn is_empty(&self) -> bool {
        self.source.is_empty()
    }

    pub fn is_done(&self) -> bool {
        self.index == self.source.len()
    }

    pub fn revealed(&self) -> &str {
        &self.revealed
    }

    pub fn alerted(&self) -> bool {
        self.alerted
    }

    pub fn cursor_visible(&self) -> bool {
        self.cursor_visible
    }

    pub fn scroll_offset_px(&self) -> f32 {
        self.scroll.offset_px()
    }

    /// Revealed text split into lines, with scrambled tokens substituted
    pub fn lines(&self) -> Vec<DisplayLine> {
        let mut shown: Vec<char> = self.revealed.chars().collect();

        for (span, scramble) in self.spans.iter().zip(&self.scrambles) {
            let Some(scramble) = scramble else {
                continue;
            };
            let visible = self.index.saturating_sub(span.start).min(span.len);
            for (offset, ch) in scramble.text().chars().take(visible).enumerate() {
                shown[span.start + offset] = ch;
            }
        }

        let shown: String = shown.into_iter().collect();
        let mut lines: Vec<DisplayLine> = shown
            .split('\n')
            .zip(self.revealed.split('\n'))
            .map(|(text, raw)| DisplayLine {
                text: text.to_string(),
                marker: !self.marker.is_empty() && raw.contains(&self.marker),
                cursor: false,
            })
            .collect();

        if let Some(last) = lines.last_mut() {
            last.cursor = self.cursor_visible;
        }
        lines
    }
}

/// Locate every non-overlapping token occurrence, in character indices
fn find_token_spans(message: &str, tokens: &[String]) -> Vec<TokenSpan> {
    let mut spans: Vec<TokenSpan> = Vec::new();

    for token in tokens {
        if token.is_empty() || token.contains('\n') {
            continue;
        }
        let len = token.chars().count();
        for (byte, _) in message.match_indices(token.as_str()) {
            let start = message[..byte].chars().count();
            let overlaps = spans
                .iter()
                .any(|s| start < s.start + s.len && s.start < start + len);
            if !overlaps {
                spans.push(TokenSpan {
                    start,
                    len,
                    token: token.clone(),
                });
            }
        }
    }

    spans.sort_by_key(|s| s.start);
    spans
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::Recorder;

    const TICK: Duration = Duration::from_millis(20);

    fn display() -> RevealDisplay {
        RevealDisplay::new(RevealTiming::default(), &Content::default(), 42)
    }

    fn small(message: &str, tokens: &[&str]) -> RevealDisplay {
        let content = Content {
            message: message.to_string(),
            scramble_tokens: tokens.iter().map(|t| t.to_string()).collect(),
            ..Content::default()
        };
        RevealDisplay::new(RevealTiming::default(), &content, 9)
    }

    #[test]
    fn test_reveals_one_char_per_tick_until_done() {
        let mut fx = Recorder::default();
        let mut display = display();
        let len = display.len();
        assert_eq!(display.progress(), 0);

        for tick in 1..=len {
            display.update(TICK, &mut fx);
            assert_eq!(display.progress(), tick);
        }
        assert!(display.is_done());
        assert!(display.reveal.is_none());
        assert_eq!(display.revealed(), Content::default().message);

        display.update(Duration::from_secs(3), &mut fx);
        assert_eq!(display.progress(), len);
    }

    #[test]
    fn test_keystroke_per_visible_character() {
        let mut fx = Recorder::default();
        let mut display = small("ab c\n d", &[]);
        display.update(Duration::from_secs(1), &mut fx);
        assert_eq!(fx.count(Cue::Keystroke), 4);
    }

    #[test]
    fn test_alert_fires_once_when_marker_appears() {
        let content = Content::default();
        let marker_end = content.message.find(&content.marker).unwrap() + content.marker.len();
        let alert_tick = content.message[..marker_end].chars().count();

        let mut fx = Recorder::default();
        let mut display = display();
        for tick in 1..=display.len() {
            display.update(TICK, &mut fx);
            let expected = usize::from(tick >= alert_tick);
            assert_eq!(fx.count(Cue::Alert), expected, "tick {tick}");
        }
        assert!(display.alerted());
    }

    #[test]
    fn test_marker_line_is_flagged() {
        let mut fx = Recorder::default();
        let mut display = display();
        display.update(Duration::from_secs(60), &mut fx);

        let lines = display.lines();
        let flagged: Vec<_> = lines.iter().filter(|l| l.marker).collect();
        assert_eq!(flagged.len(), 1);
        assert!(flagged[0].text.contains("KEY #0105"));
    }

    #[test]
    fn test_tokens_settle_to_true_text() {
        let mut fx = Recorder::default();
        let mut display = display();
        display.update(Duration::from_secs(60), &mut fx);

        let joined: Vec<String> = display.lines().into_iter().map(|l| l.text).collect();
        assert_eq!(joined.join("\n"), Content::default().message);
    }

    #[test]
    fn test_token_is_noise_while_resolving() {
        let mut fx = Recorder::default();
        let mut display = small("X=ABCDEFGH", &["ABCDEFGH"]);

        // Token appears on the third tick; by the tenth it has had 140 ms
        // of 25 ms lock ticks, so five characters are locked
        for _ in 0..10 {
            display.update(TICK, &mut fx);
        }
        let line = &display.lines()[0].text;
        assert!(line.starts_with("X=ABCDE"), "{line}");
        assert_eq!(line.chars().count(), 10);

        display.update(Duration::from_millis(100), &mut fx);
        assert_eq!(display.lines()[0].text, "X=ABCDEFGH");
    }

    #[test]
    fn test_partial_token_is_truncated_to_revealed_chars() {
        let mut fx = Recorder::default();
        let mut display = small("AB12345", &["12345"]);
        for _ in 0..4 {
            display.update(TICK, &mut fx);
        }
        let line = &display.lines()[0].text;
        assert_eq!(line.chars().count(), 4);
        assert!(line.starts_with("AB"));
    }

    #[test]
    fn test_scramble_started_mid_frame_only_gets_remaining_time() {
        let mut fx = Recorder::default();
        let mut display = small("AB12345", &["12345"]);

        // One long frame: the token starts on the 60 ms reveal tick and
        // lives for the last 40 ms, one 25 ms lock tick
        display.update(Duration::from_millis(100), &mut fx);
        assert_eq!(display.progress(), 5);
        let scramble = display.scrambles[0].as_ref().unwrap();
        assert_eq!(scramble.locked_len(), 1);

        display.update(Duration::from_millis(10), &mut fx);
        let scramble = display.scrambles[0].as_ref().unwrap();
        assert_eq!(scramble.locked_len(), 2);
    }

    #[test]
    fn test_cursor_blinks_on_last_line() {
        let mut fx = Recorder::default();
        let mut display = small("one\ntwo", &[]);
        assert!(display.cursor_visible());

        display.update(Duration::from_millis(500), &mut fx);
        assert!(!display.cursor_visible());
        display.update(Duration::from_millis(500), &mut fx);
        assert!(display.cursor_visible());

        let lines = display.lines();
        assert_eq!(lines.len(), 2);
        assert!(!lines[0].cursor);
        assert!(lines[1].cursor);
    }

    #[test]
    fn test_new_display_restarts_from_zero() {
        let mut fx = Recorder::default();
        let mut first = display();
        first.update(Duration::from_secs(1), &mut fx);
        assert!(first.progress() > 0);

        let second = display();
        assert_eq!(second.progress(), 0);
        assert_eq!(second.revealed(), "");
    }

    #[test]
    fn test_scroll_tracks_bottom() {
        let mut fx = Recorder::default();
        let mut display = display();
        display.set_viewport(100.0, 20.0);
        display.update(Duration::from_secs(60), &mut fx);
        display.update(Duration::from_secs(5), &mut fx);

        let lines = display.lines().len() as f32;
        assert_eq!(display.scroll_offset_px(), lines * 20.0 - 100.0);
    }

    #[test]
    fn test_token_spans_use_char_indices() {
        let spans = find_token_spans("指纹 163493y x 163493y", &["163493y".to_string()]);
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].start, 3);
        assert_eq!(spans[1].start, 13);
    }

    #[test]
    fn test_overlapping_tokens_are_skipped() {
        let spans = find_token_spans(
            "KEY #0105",
            &["#0105".to_string(), "0105".to_string()],
        );
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].token, "#0105");
    }
}
