//! Prompt lifecycle orchestration.
//!
//! [`FlowController`] wires the store, the clock and the conditions engine
//! together: it records launches, asks for a decision, and applies the
//! state transition for whatever the user did with the prompt.
//!
//! Concurrency assumption: `load`/`save` on the store are individually
//! atomic, and the calls in a sequence like `record_launch` followed by
//! `on_prompt_shown` are separated by user-interaction time, so no
//! cross-call locking is done here. Storage failures are returned to the
//! caller, never swallowed; on a failed load the caller should treat the
//! decision as `Suppress`.

use tracing::{info, warn};

use crate::clock::{Clock, SystemClock};
use crate::conditions::{evaluate, Decision};
use crate::error::Result;
use crate::policy::Policy;
use crate::prompt::{PromptConfig, PromptOutcome};
use crate::state::UsageState;
use crate::storage::StateStore;

/// Orchestrates the rating-prompt lifecycle over a durable store.
#[derive(Debug, Clone)]
pub struct FlowController<S, C = SystemClock> {
    store: S,
    clock: C,
    policy: Policy,
    prompt: PromptConfig,
}

impl<S: StateStore> FlowController<S> {
    /// Controller over the system clock.
    pub fn new(store: S, policy: Policy, prompt: PromptConfig) -> Self {
        Self::with_clock(store, SystemClock, policy, prompt)
    }
}

impl<S: StateStore, C: Clock> FlowController<S, C> {
    /// Controller with an injected clock.
    pub fn with_clock(store: S, clock: C, policy: Policy, prompt: PromptConfig) -> Self {
        Self {
            store,
            clock,
            policy,
            prompt,
        }
    }

    /// Record one application start and decide whether to show the prompt.
    ///
    /// The single externally-invoked entry point: call it once per real
    /// app start. Each call increments the launch count by design.
    ///
    /// # Errors
    /// Returns an error if the state cannot be loaded or saved. Nothing is
    /// written when the load fails.
    pub fn record_launch(&self) -> Result<Decision> {
        let mut state = self.store.load()?;
        state.record_launch(self.clock.now());
        self.store.save(&state)?;

        let evaluation = evaluate(&state, &self.policy, self.clock.now());
        match evaluation.decision {
            Decision::Show => info!("show rating prompt now: conditions met"),
            Decision::Suppress => info!(
                gate = ?evaluation.suppressed_by,
                "don't show rating prompt: conditions not met"
            ),
        }
        Ok(evaluation.decision)
    }

    /// Record that the prompt was actually presented. Call exactly once
    /// per display, so the between-prompts gates stay consistent.
    pub fn on_prompt_shown(&self) -> Result<()> {
        let mut state = self.store.load()?;
        state.mark_prompt_shown(self.clock.now());
        self.store.save(&state)?;
        Ok(())
    }

    /// The user rated the app. Terminal.
    pub fn on_user_rated(&self) -> Result<()> {
        info!("user rated the app; no further prompts");
        self.mark_terminal()
    }

    /// The user declined permanently. Terminal.
    pub fn on_user_declined_permanently(&self) -> Result<()> {
        info!("user declined permanently; no further prompts");
        self.mark_terminal()
    }

    /// The user postponed. The next prompt is gated by the
    /// between-prompts thresholds.
    pub fn on_user_postponed(&self) -> Result<()> {
        let mut state = self.store.load()?;
        state.mark_postponed();
        self.store.save(&state)?;
        Ok(())
    }

    /// Apply the transition for an outcome reported by the UI layer.
    pub fn apply_outcome(&self, outcome: PromptOutcome) -> Result<()> {
        match outcome {
            PromptOutcome::RateNow | PromptOutcome::FeedbackSubmitted => self.on_user_rated(),
            PromptOutcome::Never => self.on_user_declined_permanently(),
            PromptOutcome::RateLater | PromptOutcome::Dismissed => self.on_user_postponed(),
        }
    }

    /// Restore the zero-state. Idempotent.
    pub fn reset(&self) -> Result<()> {
        self.store.reset()?;
        warn!("usage state was reset");
        Ok(())
    }

    /// The currently persisted state.
    pub fn state(&self) -> Result<UsageState> {
        Ok(self.store.load()?)
    }

    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    /// The render directive the UI layer should present on `Show`.
    pub fn prompt_config(&self) -> &PromptConfig {
        &self.prompt
    }

    fn mark_terminal(&self) -> Result<()> {
        let mut state = self.store.load()?;
        state.mark_rated_or_declined();
        self.store.save(&state)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::state::ResponseStatus;
    use crate::storage::{KvStateStore, MemoryKvStore};
    use chrono::{DateTime, TimeZone, Utc};

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, day, 10, 0, 0).unwrap()
    }

    fn controller(
        policy: Policy,
        day: u32,
    ) -> FlowController<KvStateStore<MemoryKvStore>, FixedClock> {
        FlowController::with_clock(
            KvStateStore::new(MemoryKvStore::new()),
            FixedClock(at(day)),
            policy,
            PromptConfig::default(),
        )
    }

    #[test]
    fn record_launch_increments_and_persists() {
        let flow = controller(Policy::default(), 1);
        flow.record_launch().unwrap();
        flow.record_launch().unwrap();

        let state = flow.state().unwrap();
        assert_eq!(state.launch_count, 2);
        assert_eq!(state.first_launch_at, Some(at(1)));
    }

    #[test]
    fn prompt_shown_moves_never_asked_to_postponed() {
        let flow = controller(Policy::default(), 1);
        flow.record_launch().unwrap();
        flow.on_prompt_shown().unwrap();

        let state = flow.state().unwrap();
        assert_eq!(state.response_status, ResponseStatus::Postponed);
        assert_eq!(state.last_prompt_at, Some(at(1)));
        assert_eq!(state.launch_count_at_last_prompt, 1);
    }

    #[test]
    fn outcomes_map_to_transitions() {
        for (outcome, expected) in [
            (PromptOutcome::RateNow, ResponseStatus::RatedOrDeclined),
            (
                PromptOutcome::FeedbackSubmitted,
                ResponseStatus::RatedOrDeclined,
            ),
            (PromptOutcome::Never, ResponseStatus::RatedOrDeclined),
            (PromptOutcome::RateLater, ResponseStatus::Postponed),
            (PromptOutcome::Dismissed, ResponseStatus::Postponed),
        ] {
            let flow = controller(Policy::default(), 1);
            flow.record_launch().unwrap();
            flow.on_prompt_shown().unwrap();
            flow.apply_outcome(outcome).unwrap();
            assert_eq!(flow.state().unwrap().response_status, expected);
        }
    }

    #[test]
    fn reset_restores_zero_state() {
        let flow = controller(Policy::default(), 1);
        flow.record_launch().unwrap();
        flow.on_prompt_shown().unwrap();

        flow.reset().unwrap();
        assert_eq!(flow.state().unwrap(), UsageState::default());
        // Idempotent.
        flow.reset().unwrap();
        assert_eq!(flow.state().unwrap(), UsageState::default());
    }

    #[test]
    fn load_failure_writes_nothing() {
        struct FailingStore;
        impl StateStore for FailingStore {
            fn load(&self) -> Result<UsageState, crate::error::StorageError> {
                Err(crate::error::StorageError::ParseFailed("corrupt".into()))
            }
            fn save(&self, _: &UsageState) -> Result<(), crate::error::StorageError> {
                panic!("save must not be called after a failed load");
            }
            fn reset(&self) -> Result<(), crate::error::StorageError> {
                Ok(())
            }
        }

        let flow = FlowController::with_clock(
            FailingStore,
            FixedClock(at(1)),
            Policy::default(),
            PromptConfig::default(),
        );
        assert!(flow.record_launch().is_err());
    }
}
