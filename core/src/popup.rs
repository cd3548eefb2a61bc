//! Long-press accent popup.
//!
//! Holding a key for the long-press delay opens a horizontal row of variant
//! candidates centred over the key. Dragging selects the candidate whose
//! center is nearest the pointer, provided the pointer is close enough;
//! releasing commits the selection.
//!
//! Geometry is expressed in host pixels. The session is pure state: the
//! hosting shell draws it and forwards pointer coordinates.

use crate::accents;
use std::time::{Duration, Instant};
use tracing::debug;

/// Horizontal placement of the candidate row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandidateLayout {
    /// Left edge of the first candidate
    pub origin_x: f32,
    /// Width of one candidate
    pub candidate_width: f32,
    /// Number of candidates
    pub count: usize,
}

impl CandidateLayout {
    /// Lay out `count` candidates centred on `anchor_center_x`.
    pub fn centered(anchor_center_x: f32, candidate_width: f32, count: usize) -> Self {
        Self {
            origin_x: anchor_center_x - count as f32 * candidate_width / 2.0,
            candidate_width,
            count,
        }
    }

    /// Horizontal center of candidate `index`.
    pub fn center_x(&self, index: usize) -> f32 {
        self.origin_x + (index as f32 + 0.5) * self.candidate_width
    }

    /// Total width of the row.
    pub fn width(&self) -> f32 {
        self.count as f32 * self.candidate_width
    }
}

/// An open popup: the variants on offer and the current selection.
#[derive(Debug, Clone, PartialEq)]
pub struct PopupSession {
    anchor: String,
    candidates: Vec<String>,
    layout: CandidateLayout,
    hit_factor: f32,
    selected: usize,
}

impl PopupSession {
    /// Open a popup for `anchor` offering `variants`.
    ///
    /// Returns `None` when there is nothing to offer. The middle candidate
    /// (rounding down) starts selected.
    pub fn open(
        anchor: &str,
        variants: Vec<String>,
        anchor_center_x: f32,
        candidate_width: f32,
        hit_factor: f32,
    ) -> Option<Self> {
        if variants.is_empty() {
            return None;
        }
        let layout = CandidateLayout::centered(anchor_center_x, candidate_width, variants.len());
        let selected = (variants.len() - 1) / 2;
        debug!(anchor, count = variants.len(), "accent popup opened");
        Some(Self {
            anchor: anchor.to_string(),
            candidates: variants,
            layout,
            hit_factor,
            selected,
        })
    }

    /// Key the popup was opened from.
    pub fn anchor(&self) -> &str {
        &self.anchor
    }

    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    pub fn layout(&self) -> &CandidateLayout {
        &self.layout
    }

    /// Index of the highlighted candidate.
    pub fn selected_index(&self) -> usize {
        self.selected
    }

    /// Text of the highlighted candidate.
    pub fn selected(&self) -> &str {
        &self.candidates[self.selected]
    }

    /// Move the pointer to `(x, y)`.
    ///
    /// Selects the candidate with the nearest center if that center lies
    /// within `hit_factor * candidate_width`; ties keep the leftmost
    /// candidate. Moving out of range keeps the previous selection. Only the
    /// horizontal distance matters.
    pub fn drag_to(&mut self, x: f32, _y: f32) -> usize {
        let threshold = self.hit_factor * self.layout.candidate_width;
        let mut best: Option<(usize, f32)> = None;
        for index in 0..self.candidates.len() {
            let dist = (x - self.layout.center_x(index)).abs();
            if dist >= threshold {
                continue;
            }
            match best {
                Some((_, min)) if dist >= min => {}
                _ => best = Some((index, dist)),
            }
        }
        if let Some((index, _)) = best {
            self.selected = index;
        }
        self.selected
    }

    /// Close the popup and return the text to commit.
    pub fn finish(self) -> String {
        self.candidates
            .into_iter()
            .nth(self.selected)
            .unwrap_or(self.anchor)
    }
}

#[derive(Debug, Clone, PartialEq)]
enum PressState {
    Idle,
    Pressed {
        key: String,
        anchor_x: f32,
        deadline: Option<Instant>,
    },
    Active(PopupSession),
}

/// Turns a press/hold/release sequence on one key into either a plain tap or
/// a popup selection.
///
/// Time is passed in by the caller so the tracker never reads the clock.
#[derive(Debug, Clone, PartialEq)]
pub struct LongPressTracker {
    delay: Duration,
    candidate_width: f32,
    hit_factor: f32,
    state: PressState,
}

impl LongPressTracker {
    pub fn new(delay: Duration, candidate_width: f32, hit_factor: f32) -> Self {
        Self {
            delay,
            candidate_width,
            hit_factor,
            state: PressState::Idle,
        }
    }

    /// Start tracking a press on `key` whose center is at `anchor_x`.
    ///
    /// Any previous press is discarded.
    pub fn touch_down(&mut self, key: &str, anchor_x: f32, now: Instant) {
        self.state = PressState::Pressed {
            key: key.to_string(),
            anchor_x,
            deadline: Some(now + self.delay),
        };
    }

    /// Open the popup if the key has been held past the delay.
    ///
    /// Returns `true` when the popup opened on this call. A key without
    /// variants keeps behaving like a plain tap.
    pub fn poll(&mut self, now: Instant, language: &str, shifted: bool) -> bool {
        let PressState::Pressed { deadline, .. } = &self.state else {
            return false;
        };
        match deadline {
            Some(at) if now >= *at => {}
            _ => return false,
        }
        if self.activate(language, shifted) {
            return true;
        }
        if let PressState::Pressed { deadline, .. } = &mut self.state {
            *deadline = None;
        }
        false
    }

    /// Open the popup for the pressed key now, without waiting for the
    /// delay. Returns `false` if no key is pressed or it has no variants.
    pub fn activate(&mut self, language: &str, shifted: bool) -> bool {
        let PressState::Pressed { key, anchor_x, .. } = &self.state else {
            return false;
        };
        let variants = accents::variants(key, language, shifted);
        match PopupSession::open(key, variants, *anchor_x, self.candidate_width, self.hit_factor) {
            Some(session) => {
                self.state = PressState::Active(session);
                true
            }
            None => false,
        }
    }

    /// Forward a pointer move to the open popup.
    pub fn drag_to(&mut self, x: f32, y: f32) -> Option<usize> {
        match &mut self.state {
            PressState::Active(session) => Some(session.drag_to(x, y)),
            _ => None,
        }
    }

    /// Open popup, if any.
    pub fn session(&self) -> Option<&PopupSession> {
        match &self.state {
            PressState::Active(session) => Some(session),
            _ => None,
        }
    }

    pub fn is_popup_open(&self) -> bool {
        matches!(self.state, PressState::Active(_))
    }

    /// Finger lifted: the selected variant, the tapped key, or nothing if
    /// no press was being tracked.
    pub fn touch_up(&mut self) -> Option<String> {
        match std::mem::replace(&mut self.state, PressState::Idle) {
            PressState::Idle => None,
            PressState::Pressed { key, .. } => Some(key),
            PressState::Active(session) => Some(session.finish()),
        }
    }

    /// Abandon the press without committing anything.
    pub fn cancel(&mut self) {
        if !matches!(self.state, PressState::Idle) {
            debug!("long press cancelled");
        }
        self.state = PressState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn five() -> PopupSession {
        let variants = ["à", "á", "â", "ä", "ã"].iter().map(|s| s.to_string()).collect();
        PopupSession::open("a", variants, 500.0, 60.0, 1.5).unwrap()
    }

    #[test]
    fn layout_is_centred_on_anchor() {
        let s = five();
        assert_eq!(s.layout().origin_x, 350.0);
        assert_eq!(s.layout().center_x(0), 380.0);
        assert_eq!(s.layout().center_x(4), 620.0);
        assert_eq!(s.layout().width(), 300.0);
    }

    #[test]
    fn middle_candidate_preselected() {
        assert_eq!(five().selected_index(), 2);
        let two = PopupSession::open("x", vec!["1".into(), "2".into()], 0.0, 10.0, 1.5).unwrap();
        assert_eq!(two.selected_index(), 0);
    }

    #[test]
    fn no_variants_no_popup() {
        assert!(PopupSession::open("q", Vec::new(), 0.0, 10.0, 1.5).is_none());
    }

    #[test]
    fn drag_selects_nearest_center() {
        let mut s = five();
        let x = s.layout().center_x(2);
        assert_eq!(s.drag_to(x, 0.0), 2);
        assert_eq!(s.drag_to(s.layout().center_x(4) - 5.0, 0.0), 4);
        assert_eq!(s.drag_to(381.0, 40.0), 0);
        // Halfway between 0 and 1 keeps the leftmost
        assert_eq!(s.drag_to(410.0, 0.0), 0);
    }

    #[test]
    fn drag_out_of_range_keeps_selection() {
        let mut s = five();
        s.drag_to(s.layout().center_x(3), 0.0);
        assert_eq!(s.drag_to(5_000.0, 0.0), 3);
        assert_eq!(s.drag_to(-5_000.0, 0.0), 3);
        assert_eq!(s.finish(), "ä");
    }

    #[test]
    fn tracker_tap_before_delay_returns_key() {
        let t0 = Instant::now();
        let mut t = LongPressTracker::new(Duration::from_millis(250), 60.0, 1.5);
        t.touch_down("e", 100.0, t0);
        assert!(!t.poll(t0 + Duration::from_millis(100), "en", false));
        assert_eq!(t.touch_up().as_deref(), Some("e"));
        assert_eq!(t.touch_up(), None);
    }

    #[test]
    fn tracker_opens_after_delay() {
        let t0 = Instant::now();
        let mut t = LongPressTracker::new(Duration::from_millis(250), 60.0, 1.5);
        t.touch_down("s", 100.0, t0);
        assert!(t.poll(t0 + Duration::from_millis(250), "tr", true));
        assert_eq!(t.session().unwrap().candidates(), ["Ş"]);
        assert_eq!(t.touch_up().as_deref(), Some("Ş"));
    }

    #[test]
    fn tracker_key_without_variants_stays_a_tap() {
        let t0 = Instant::now();
        let mut t = LongPressTracker::new(Duration::from_millis(250), 60.0, 1.5);
        t.touch_down("q", 100.0, t0);
        assert!(!t.poll(t0 + Duration::from_secs(1), "en", false));
        assert!(!t.is_popup_open());
        assert_eq!(t.touch_up().as_deref(), Some("q"));
    }

    #[test]
    fn tracker_activate_skips_delay() {
        let mut t = LongPressTracker::new(Duration::from_millis(250), 60.0, 1.5);
        assert!(!t.activate("en", false));
        t.touch_down("c", 0.0, Instant::now());
        assert!(t.activate("tr", false));
        assert_eq!(t.touch_up().as_deref(), Some("ç"));
    }

    #[test]
    fn tracker_cancel_commits_nothing() {
        let t0 = Instant::now();
        let mut t = LongPressTracker::new(Duration::from_millis(250), 60.0, 1.5);
        t.touch_down("e", 100.0, t0);
        t.poll(t0 + Duration::from_millis(300), "en", false);
        assert_eq!(t.drag_to(40.0, 0.0), Some(1));
        t.cancel();
        assert_eq!(t.touch_up(), None);
        assert_eq!(t.drag_to(0.0, 0.0), None);
    }
}
