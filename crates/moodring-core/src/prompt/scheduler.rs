//! Evening mood prompt scheduler.
//!
//! The scheduler is a polled state machine. It does not use internal
//! threads or timers - the caller is responsible for calling `check()`
//! periodically (at most every `poll_interval_secs`).
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Prompting -> Idle
//! ```
//!
//! `Idle -> Prompting` happens on a check inside the window when the prompt
//! has not fired yet today. The day is marked as soon as the prompt opens,
//! so dismissing without committing still counts. A prompt left open past
//! the day it was shown on is closed as dismissed by the next check.

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::events::Event;
use crate::mood::Category;
use crate::storage::PromptConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchedulerState {
    Idle,
    Prompting,
}

/// Per-process prompt marker.
///
/// Starts empty on every process start unless restored explicitly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptState {
    pub last_shown: Option<NaiveDate>,
}

impl PromptState {
    pub fn shown_on(&self, date: NaiveDate) -> bool {
        self.last_shown == Some(date)
    }
}

/// Half-open local-hour window `[start_hour, end_hour)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptWindow {
    pub start_hour: u32,
    pub end_hour: u32,
}

impl PromptWindow {
    pub fn contains(&self, now: NaiveDateTime) -> bool {
        (self.start_hour..self.end_hour).contains(&now.hour())
    }
}

impl Default for PromptWindow {
    fn default() -> Self {
        Self {
            start_hour: 21,
            end_hour: 23,
        }
    }
}

/// Decides when the mood prompt should open.
#[derive(Debug, Clone)]
pub struct PromptScheduler {
    window: PromptWindow,
    category: Category,
    state: SchedulerState,
    prompt_state: PromptState,
}

impl PromptScheduler {
    pub fn new(window: PromptWindow, category: Category) -> Self {
        Self::with_state(window, category, PromptState::default())
    }

    /// Resume with a previously saved marker.
    pub fn with_state(window: PromptWindow, category: Category, prompt_state: PromptState) -> Self {
        Self {
            window,
            category,
            state: SchedulerState::Idle,
            prompt_state,
        }
    }

    pub fn from_config(config: &PromptConfig) -> Self {
        Self::new(
            PromptWindow {
                start_hour: config.start_hour,
                end_hour: config.end_hour,
            },
            config.category,
        )
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn prompt_state(&self) -> PromptState {
        self.prompt_state
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn window(&self) -> PromptWindow {
        self.window
    }

    /// Whether a check at `now` would open the prompt.
    pub fn is_due(&self, now: NaiveDateTime) -> bool {
        (self.state == SchedulerState::Idle || self.is_stale(now))
            && self.window.contains(now)
            && !self.prompt_state.shown_on(now.date())
    }

    /// A prompt still open on a later day than it was shown.
    fn is_stale(&self, now: NaiveDateTime) -> bool {
        self.state == SchedulerState::Prompting && !self.prompt_state.shown_on(now.date())
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Close a prompt that was abandoned on an earlier day.
    ///
    /// Returns `PromptClosed { committed: false }` if one was open.
    pub fn expire_stale(&mut self, now: NaiveDateTime) -> Option<Event> {
        if !self.is_stale(now) {
            return None;
        }
        info!(
            category = %self.category,
            last_shown = ?self.prompt_state.last_shown,
            "closing abandoned mood prompt"
        );
        self.dismiss()
    }

    /// Periodic check. Returns `PromptOpened` when the state flips to
    /// `Prompting`.
    ///
    /// An abandoned prompt from an earlier day is closed first; call
    /// [`expire_stale`](Self::expire_stale) beforehand to receive its
    /// `PromptClosed` event.
    pub fn check(&mut self, now: NaiveDateTime) -> Option<Event> {
        self.expire_stale(now);
        if !self.is_due(now) {
            debug!(state = ?self.state, hour = now.hour(), "prompt check: not due");
            return None;
        }

        let today = now.date();
        self.state = SchedulerState::Prompting;
        self.prompt_state.last_shown = Some(today);
        info!(category = %self.category, date = %today, "mood prompt opened");
        Some(Event::PromptOpened {
            category: self.category,
            date: today,
            at: now,
        })
    }

    /// Close the prompt after the user saved a mood.
    pub fn complete(&mut self) -> Option<Event> {
        self.close(true)
    }

    /// Close the prompt without saving.
    pub fn dismiss(&mut self) -> Option<Event> {
        self.close(false)
    }

    fn close(&mut self, committed: bool) -> Option<Event> {
        match self.state {
            SchedulerState::Prompting => {
                self.state = SchedulerState::Idle;
                Some(Event::PromptClosed {
                    category: self.category,
                    committed,
                })
            }
            SchedulerState::Idle => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    fn scheduler() -> PromptScheduler {
        PromptScheduler::new(PromptWindow::default(), Category::Daily)
    }

    #[test]
    fn fires_inside_window() {
        let mut s = scheduler();
        let event = s.check(at(2024, 5, 1, 22, 0));
        assert!(matches!(event, Some(Event::PromptOpened { .. })));
        assert_eq!(s.state(), SchedulerState::Prompting);
        assert_eq!(s.prompt_state().last_shown, NaiveDate::from_ymd_opt(2024, 5, 1));
    }

    #[test]
    fn window_is_half_open() {
        let mut s = scheduler();
        assert!(s.check(at(2024, 5, 1, 20, 59)).is_none());
        assert!(s.check(at(2024, 5, 1, 23, 0)).is_none());
        assert!(s.check(at(2024, 5, 1, 21, 0)).is_some());
    }

    #[test]
    fn at_most_once_per_day_even_after_dismiss() {
        let mut s = scheduler();
        assert!(s.check(at(2024, 5, 1, 21, 5)).is_some());
        assert!(s.check(at(2024, 5, 1, 21, 6)).is_none());
        assert!(matches!(
            s.dismiss(),
            Some(Event::PromptClosed { committed: false, .. })
        ));
        assert!(s.check(at(2024, 5, 1, 22, 30)).is_none());
        assert_eq!(s.state(), SchedulerState::Idle);
    }

    #[test]
    fn shown_today_never_fires() {
        let today = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let mut s = PromptScheduler::with_state(
            PromptWindow::default(),
            Category::Daily,
            PromptState { last_shown: Some(today) },
        );
        for hour in 0..24 {
            assert!(s.check(at(2024, 5, 1, hour, 30)).is_none());
        }
    }

    #[test]
    fn shown_yesterday_fires_at_22() {
        let yesterday = NaiveDate::from_ymd_opt(2024, 4, 30).unwrap();
        let mut s = PromptScheduler::with_state(
            PromptWindow::default(),
            Category::Daily,
            PromptState { last_shown: Some(yesterday) },
        );
        assert!(s.check(at(2024, 5, 1, 22, 0)).is_some());
    }

    #[test]
    fn fires_again_next_day() {
        let mut s = scheduler();
        assert!(s.check(at(2024, 5, 1, 21, 0)).is_some());
        s.complete();
        assert!(s.check(at(2024, 5, 2, 21, 0)).is_some());
    }

    #[test]
    fn abandoned_prompt_does_not_block_next_day() {
        let mut s = scheduler();
        assert!(s.check(at(2024, 5, 1, 21, 0)).is_some());
        // Never completed or dismissed.
        assert!(s.check(at(2024, 5, 1, 22, 0)).is_none());
        assert_eq!(s.state(), SchedulerState::Prompting);

        assert!(s.is_due(at(2024, 5, 2, 21, 0)));
        assert!(matches!(
            s.check(at(2024, 5, 2, 21, 0)),
            Some(Event::PromptOpened { .. })
        ));
        assert_eq!(s.prompt_state().last_shown, NaiveDate::from_ymd_opt(2024, 5, 2));
    }

    #[test]
    fn expire_stale_closes_as_dismissed() {
        let mut s = scheduler();
        s.check(at(2024, 5, 1, 21, 0));
        assert!(s.expire_stale(at(2024, 5, 1, 22, 0)).is_none());
        assert!(matches!(
            s.expire_stale(at(2024, 5, 2, 9, 0)),
            Some(Event::PromptClosed { committed: false, .. })
        ));
        assert_eq!(s.state(), SchedulerState::Idle);
        assert!(s.expire_stale(at(2024, 5, 2, 9, 0)).is_none());
    }

    #[test]
    fn close_when_idle_is_noop() {
        let mut s = scheduler();
        assert!(s.complete().is_none());
        assert!(s.dismiss().is_none());
    }

    #[test]
    fn from_config_uses_window_and_category() {
        let config = PromptConfig {
            start_hour: 8,
            end_hour: 9,
            category: Category::Meditation,
            ..Default::default()
        };
        let mut s = PromptScheduler::from_config(&config);
        assert_eq!(s.category(), Category::Meditation);
        assert!(s.check(at(2024, 5, 1, 21, 0)).is_none());
        assert!(s.check(at(2024, 5, 1, 8, 15)).is_some());
    }
}
