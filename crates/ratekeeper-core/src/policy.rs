//! Developer-supplied prompt policy.
//!
//! A [`Policy`] is immutable once built. Thresholds of zero disable the
//! corresponding gate. Defaults: 5 launches and 3 days before the first
//! prompt, 5 further launches and 14 days between prompts.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::PolicyError;

/// How "minimum days" comparisons measure elapsed time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayPrecision {
    /// Compare whole days, truncating partial days. Three days means the
    /// third midnight-to-midnight span has fully elapsed.
    #[default]
    WholeDays,
    /// Compare continuous duration: three days means 72 hours.
    Continuous,
}

/// Thresholds gating when the rating prompt may be shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policy {
    /// Launches required before the first prompt.
    #[serde(default = "default_min_launches")]
    pub min_launches_before_first_prompt: u32,
    /// Additional launches required between prompts.
    #[serde(default = "default_min_launches")]
    pub min_launches_between_prompts: u32,
    /// Days since the first launch required before the first prompt.
    #[serde(default = "default_min_days")]
    pub min_days_before_first_prompt: u32,
    /// Days since the last prompt required between prompts.
    #[serde(default = "default_min_days_between")]
    pub min_days_between_prompts: u32,
    /// Bypass every gate. Development only.
    #[serde(default)]
    pub debug_always_show: bool,
    /// Whole-day truncation vs continuous elapsed time.
    #[serde(default)]
    pub day_precision: DayPrecision,
}

fn default_min_launches() -> u32 {
    5
}
fn default_min_days() -> u32 {
    3
}
fn default_min_days_between() -> u32 {
    14
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            min_launches_before_first_prompt: default_min_launches(),
            min_launches_between_prompts: default_min_launches(),
            min_days_before_first_prompt: default_min_days(),
            min_days_between_prompts: default_min_days_between(),
            debug_always_show: false,
            day_precision: DayPrecision::default(),
        }
    }
}

impl Policy {
    pub fn builder() -> PolicyBuilder {
        PolicyBuilder::default()
    }
}

/// Validating builder for [`Policy`].
///
/// Setters accept signed values so misconfiguration is caught in
/// [`build`](Self::build) rather than panicking or wrapping; evaluation
/// itself never validates.
#[derive(Debug, Clone, Default)]
pub struct PolicyBuilder {
    min_launches_before_first_prompt: Option<i64>,
    min_launches_between_prompts: Option<i64>,
    min_days_before_first_prompt: Option<i64>,
    min_days_between_prompts: Option<i64>,
    debug_always_show: bool,
    day_precision: DayPrecision,
}

impl PolicyBuilder {
    /// Launches required before the first prompt. Zero disables the gate.
    pub fn min_launches_before_first_prompt(mut self, launches: i64) -> Self {
        self.min_launches_before_first_prompt = Some(launches);
        self
    }

    /// Additional launches required between prompts. Zero disables the gate.
    pub fn min_launches_between_prompts(mut self, launches: i64) -> Self {
        self.min_launches_between_prompts = Some(launches);
        self
    }

    /// Days since first launch required before the first prompt.
    /// Zero disables the gate.
    pub fn min_days_before_first_prompt(mut self, days: i64) -> Self {
        self.min_days_before_first_prompt = Some(days);
        self
    }

    /// Days since the last prompt required between prompts.
    /// Zero disables the gate.
    pub fn min_days_between_prompts(mut self, days: i64) -> Self {
        self.min_days_between_prompts = Some(days);
        self
    }

    /// Bypass every gate. Don't use this for production.
    pub fn debug_always_show(mut self, debug: bool) -> Self {
        if debug {
            warn!("debug_always_show is set; every decision will be Show");
        }
        self.debug_always_show = debug;
        self
    }

    /// Choose how elapsed days are measured.
    pub fn day_precision(mut self, precision: DayPrecision) -> Self {
        self.day_precision = precision;
        self
    }

    /// Finalize the policy, rejecting negative thresholds.
    pub fn build(self) -> Result<Policy, PolicyError> {
        let defaults = Policy::default();
        Ok(Policy {
            min_launches_before_first_prompt: validate(
                "min_launches_before_first_prompt",
                self.min_launches_before_first_prompt,
                defaults.min_launches_before_first_prompt,
            )?,
            min_launches_between_prompts: validate(
                "min_launches_between_prompts",
                self.min_launches_between_prompts,
                defaults.min_launches_between_prompts,
            )?,
            min_days_before_first_prompt: validate(
                "min_days_before_first_prompt",
                self.min_days_before_first_prompt,
                defaults.min_days_before_first_prompt,
            )?,
            min_days_between_prompts: validate(
                "min_days_between_prompts",
                self.min_days_between_prompts,
                defaults.min_days_between_prompts,
            )?,
            debug_always_show: self.debug_always_show,
            day_precision: self.day_precision,
        })
    }
}

fn validate(field: &'static str, value: Option<i64>, default: u32) -> Result<u32, PolicyError> {
    match value {
        None => Ok(default),
        Some(v) if v < 0 => Err(PolicyError::NegativeThreshold { field, value: v }),
        // Thresholds beyond u32::MAX are meaningless; saturate.
        Some(v) => Ok(u32::try_from(v).unwrap_or(u32::MAX)),
    }
}
