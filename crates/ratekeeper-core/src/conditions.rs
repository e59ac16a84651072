//! The condition-evaluation engine.
//!
//! [`decide`] is a pure function over `(state, policy, now)`. Gates are
//! AND-combined and evaluated in a fixed order, cheapest check first:
//!
//! 1. debug override (bypasses everything, development only)
//! 2. terminal response status
//! 3. launch-count gate
//! 4. elapsed-time gate
//!
//! The debug override intentionally ranks above the terminal check so a
//! developer can re-trigger the prompt on a device that already answered.
//! Negative elapsed time (device clock moved backward) never satisfies a
//! non-zero day threshold: the engine fails closed rather than erroring.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::policy::{DayPrecision, Policy};
use crate::state::UsageState;

/// Verdict of one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    /// All gates passed; the host should present the prompt.
    Show,
    /// At least one gate failed; do nothing this launch.
    Suppress,
}

/// The gate that produced a `Suppress` verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gate {
    /// The user already rated or declined permanently.
    TerminalStatus,
    /// Not enough launches recorded yet.
    LaunchCount,
    /// Not enough time elapsed yet.
    ElapsedTime,
}

/// Outcome of one evaluation with the failing gate, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    pub decision: Decision,
    /// Which gate suppressed the prompt. `None` when the decision is `Show`.
    pub suppressed_by: Option<Gate>,
    /// Whether the debug override produced the verdict.
    pub debug_override: bool,
}

/// Decide whether the prompt should be shown now.
pub fn decide(state: &UsageState, policy: &Policy, now: DateTime<Utc>) -> Decision {
    evaluate(state, policy, now).decision
}

/// Like [`decide`], but reports which gate failed.
pub fn evaluate(state: &UsageState, policy: &Policy, now: DateTime<Utc>) -> Evaluation {
    if policy.debug_always_show {
        debug!("conditions: debug override set, showing unconditionally");
        return Evaluation {
            decision: Decision::Show,
            suppressed_by: None,
            debug_override: true,
        };
    }

    if state.is_terminal() {
        debug!("conditions: user already rated or declined permanently");
        return suppressed(Gate::TerminalStatus);
    }

    if !launch_count_gate(state, policy) {
        debug!(
            launch_count = state.launch_count,
            first_prompt = state.is_first_prompt(),
            "conditions: launch-count gate not met"
        );
        return suppressed(Gate::LaunchCount);
    }

    if !elapsed_time_gate(state, policy, now) {
        debug!(
            first_prompt = state.is_first_prompt(),
            "conditions: elapsed-time gate not met"
        );
        return suppressed(Gate::ElapsedTime);
    }

    debug!("conditions: all gates passed");
    Evaluation {
        decision: Decision::Show,
        suppressed_by: None,
        debug_override: false,
    }
}

fn suppressed(gate: Gate) -> Evaluation {
    Evaluation {
        decision: Decision::Suppress,
        suppressed_by: Some(gate),
        debug_override: false,
    }
}

fn launch_count_gate(state: &UsageState, policy: &Policy) -> bool {
    if state.is_first_prompt() {
        state.launch_count >= policy.min_launches_before_first_prompt
    } else {
        let required = state
            .launch_count_at_last_prompt
            .saturating_add(policy.min_launches_between_prompts);
        state.launch_count >= required
    }
}

fn elapsed_time_gate(state: &UsageState, policy: &Policy, now: DateTime<Utc>) -> bool {
    if state.is_first_prompt() {
        elapsed_at_least(
            state.first_launch_at,
            policy.min_days_before_first_prompt,
            policy.day_precision,
            now,
        )
    } else {
        elapsed_at_least(
            state.last_prompt_at,
            policy.min_days_between_prompts,
            policy.day_precision,
            now,
        )
    }
}

/// A threshold of zero disables the gate. An absent anchor (state not yet
/// initialized) fails a non-zero threshold, as does negative elapsed time.
fn elapsed_at_least(
    since: Option<DateTime<Utc>>,
    threshold_days: u32,
    precision: DayPrecision,
    now: DateTime<Utc>,
) -> bool {
    if threshold_days == 0 {
        return true;
    }
    let Some(since) = since else {
        return false;
    };
    let elapsed = now.signed_duration_since(since);
    match precision {
        DayPrecision::WholeDays => elapsed.num_days() >= i64::from(threshold_days),
        DayPrecision::Continuous => elapsed >= Duration::days(i64::from(threshold_days)),
    }
}
