//! Persisted usage state.
//!
//! One record per installed app copy: launch count, first-seen timestamp,
//! last-prompt timestamp and the user's last response. No decision logic
//! lives here; the struct only enforces its own transition invariants.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The user's last response to the rating prompt.
///
/// `RatedOrDeclined` is terminal: once set, only [`UsageState::default`]
/// (via a store reset) can leave it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseStatus {
    /// The prompt has never been shown.
    #[default]
    NeverAsked,
    /// The user chose "rate later" or dismissed the prompt.
    Postponed,
    /// The user rated the app or declined permanently.
    RatedOrDeclined,
}

/// Durable usage record the conditions engine evaluates against.
///
/// Invariants:
/// - `launch_count` is monotonically non-decreasing.
/// - `first_launch_at` is written exactly once, on the first-ever launch.
/// - `launch_count_at_last_prompt` and `last_prompt_at` are written
///   together, each time the prompt is actually shown.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UsageState {
    /// Number of application starts recorded so far.
    #[serde(default)]
    pub launch_count: u32,
    /// When the first launch was recorded. Absent until then.
    #[serde(default)]
    pub first_launch_at: Option<DateTime<Utc>>,
    /// When the prompt was last shown. Absent before the first prompt.
    #[serde(default)]
    pub last_prompt_at: Option<DateTime<Utc>>,
    /// Launch count recorded at the moment of the last prompt.
    #[serde(default)]
    pub launch_count_at_last_prompt: u32,
    /// The user's last response.
    #[serde(default)]
    pub response_status: ResponseStatus,
}

impl UsageState {
    /// Whether the next prompt would be the first one ever shown.
    pub fn is_first_prompt(&self) -> bool {
        self.last_prompt_at.is_none()
    }

    /// Whether the user has rated or declined permanently.
    pub fn is_terminal(&self) -> bool {
        self.response_status == ResponseStatus::RatedOrDeclined
    }

    /// Record one application start, setting `first_launch_at` on the
    /// first-ever call.
    pub fn record_launch(&mut self, now: DateTime<Utc>) {
        self.launch_count = self.launch_count.saturating_add(1);
        if self.first_launch_at.is_none() {
            self.first_launch_at = Some(now);
        }
    }

    /// Record that the prompt was actually shown.
    ///
    /// Moves `NeverAsked` to `Postponed` so an unanswered prompt counts as
    /// postponed; a terminal status is left untouched.
    pub fn mark_prompt_shown(&mut self, now: DateTime<Utc>) {
        self.last_prompt_at = Some(now);
        self.launch_count_at_last_prompt = self.launch_count;
        if self.response_status == ResponseStatus::NeverAsked {
            self.response_status = ResponseStatus::Postponed;
        }
    }

    /// Record the terminal response (rated, or declined permanently).
    pub fn mark_rated_or_declined(&mut self) {
        self.response_status = ResponseStatus::RatedOrDeclined;
    }

    /// Record a postponement. `mark_prompt_shown` already moved the status
    /// to `Postponed`; this only guards against a terminal downgrade.
    pub fn mark_postponed(&mut self) {
        if self.response_status != ResponseStatus::RatedOrDeclined {
            self.response_status = ResponseStatus::Postponed;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, day, 9, 0, 0).unwrap()
    }

    #[test]
    fn zero_state_defaults() {
        let state = UsageState::default();
        assert_eq!(state.launch_count, 0);
        assert!(state.first_launch_at.is_none());
        assert!(state.last_prompt_at.is_none());
        assert_eq!(state.launch_count_at_last_prompt, 0);
        assert_eq!(state.response_status, ResponseStatus::NeverAsked);
        assert!(state.is_first_prompt());
        assert!(!state.is_terminal());
    }

    #[test]
    fn first_launch_at_written_exactly_once() {
        let mut state = UsageState::default();
        state.record_launch(at(1));
        state.record_launch(at(5));
        assert_eq!(state.launch_count, 2);
        assert_eq!(state.first_launch_at, Some(at(1)));
    }

    #[test]
    fn prompt_shown_records_count_and_timestamp_together() {
        let mut state = UsageState::default();
        state.record_launch(at(1));
        state.record_launch(at(2));
        state.record_launch(at(3));
        state.mark_prompt_shown(at(3));

        assert_eq!(state.last_prompt_at, Some(at(3)));
        assert_eq!(state.launch_count_at_last_prompt, 3);
        assert_eq!(state.response_status, ResponseStatus::Postponed);
        assert!(!state.is_first_prompt());
    }

    #[test]
    fn terminal_status_survives_postpone() {
        let mut state = UsageState::default();
        state.mark_rated_or_declined();
        state.mark_postponed();
        assert!(state.is_terminal());
    }

    #[test]
    fn prompt_shown_does_not_downgrade_terminal_status() {
        let mut state = UsageState::default();
        state.mark_rated_or_declined();
        state.mark_prompt_shown(at(4));
        assert_eq!(state.response_status, ResponseStatus::RatedOrDeclined);
    }

    #[test]
    fn state_roundtrips_through_toml() {
        let mut state = UsageState::default();
        state.record_launch(at(1));
        state.mark_prompt_shown(at(2));

        let text = toml::to_string(&state).unwrap();
        let parsed: UsageState = toml::from_str(&text).unwrap();
        assert_eq!(parsed, state);
    }

    #[test]
    fn missing_fields_deserialize_to_defaults() {
        let parsed: UsageState = toml::from_str("launch_count = 7").unwrap();
        assert_eq!(parsed.launch_count, 7);
        assert!(parsed.first_launch_at.is_none());
        assert_eq!(parsed.response_status, ResponseStatus::NeverAsked);
    }
}
