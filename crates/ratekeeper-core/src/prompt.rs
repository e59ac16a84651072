//! Render directive handed to the external UI layer.
//!
//! The core never draws anything. On a `Show` decision the host receives a
//! [`PromptConfig`] (texts, button visibility, star threshold, feedback
//! routing) and renders it however it likes, then reports back exactly one
//! [`PromptOutcome`] per presentation. The config is built once through
//! [`PromptConfigBuilder`] and immutable afterwards.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Star rating below which the user is routed to the feedback flow
/// instead of the store listing. Half-star granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatingThreshold {
    None,
    Half,
    One,
    OneAndAHalf,
    Two,
    TwoAndAHalf,
    #[default]
    Three,
    ThreeAndAHalf,
    Four,
    FourAndAHalf,
    Five,
}

impl RatingThreshold {
    /// The threshold in stars, e.g. `ThreeAndAHalf` is 3.5.
    pub fn as_stars(self) -> f32 {
        self as u8 as f32 / 2.0
    }
}

/// Mail composition settings for the feedback flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailSettings {
    pub address: String,
    pub subject: String,
    #[serde(default)]
    pub body: Option<String>,
}

/// The outcome the UI reports after one presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptOutcome {
    /// The user followed the store-rating button.
    RateNow,
    /// The user asked to be reminded later.
    RateLater,
    /// The user declined permanently.
    Never,
    /// The user went through the feedback flow instead of rating.
    FeedbackSubmitted,
    /// The prompt was dismissed without choosing.
    Dismissed,
}

/// Everything the UI layer needs to render the prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptConfig {
    pub title: String,
    pub message: Option<String>,
    pub rate_now_button: String,
    pub rate_later_button: String,
    /// Label for the "never" button; `None` hides it.
    pub rate_never_button: Option<String>,
    pub confirm_button: String,
    /// Ratings below this route to the feedback flow.
    pub rating_threshold: RatingThreshold,
    /// Whether only full stars can be selected.
    pub show_only_full_stars: bool,
    /// Whether the dialog can be dismissed without choosing.
    pub cancelable: bool,
    /// Use an in-app feedback form instead of mail feedback.
    pub use_custom_feedback: bool,
    /// Mail feedback settings; only consulted when `use_custom_feedback`
    /// is false.
    pub mail_settings: Option<MailSettings>,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            title: "Enjoying the app?".to_string(),
            message: None,
            rate_now_button: "Rate now".to_string(),
            rate_later_button: "Later".to_string(),
            rate_never_button: None,
            confirm_button: "Confirm".to_string(),
            rating_threshold: RatingThreshold::default(),
            show_only_full_stars: false,
            cancelable: false,
            use_custom_feedback: false,
            mail_settings: None,
        }
    }
}

impl PromptConfig {
    pub fn builder() -> PromptConfigBuilder {
        PromptConfigBuilder::default()
    }
}

/// Fluent builder for [`PromptConfig`].
#[derive(Debug, Clone, Default)]
pub struct PromptConfigBuilder {
    config: PromptConfig,
}

impl PromptConfigBuilder {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.config.title = title.into();
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.config.message = Some(message.into());
        self
    }

    pub fn rate_now_button(mut self, label: impl Into<String>) -> Self {
        self.config.rate_now_button = label.into();
        self
    }

    pub fn rate_later_button(mut self, label: impl Into<String>) -> Self {
        self.config.rate_later_button = label.into();
        self
    }

    /// Show the "never" button with the given label. Hidden by default.
    pub fn show_rate_never_button(mut self, label: impl Into<String>) -> Self {
        self.config.rate_never_button = Some(label.into());
        debug!("prompt: show rate-never button");
        self
    }

    pub fn confirm_button(mut self, label: impl Into<String>) -> Self {
        self.config.confirm_button = label.into();
        self
    }

    pub fn rating_threshold(mut self, threshold: RatingThreshold) -> Self {
        debug!(stars = threshold.as_stars(), "prompt: set rating threshold");
        self.config.rating_threshold = threshold;
        self
    }

    pub fn show_only_full_stars(mut self, full_stars_only: bool) -> Self {
        self.config.show_only_full_stars = full_stars_only;
        self
    }

    pub fn cancelable(mut self, cancelable: bool) -> Self {
        debug!(cancelable, "prompt: set cancelable");
        self.config.cancelable = cancelable;
        self
    }

    /// Use an in-app feedback form instead of mail feedback.
    pub fn use_custom_feedback(mut self, custom: bool) -> Self {
        debug!(custom, "prompt: use custom feedback");
        self.config.use_custom_feedback = custom;
        self
    }

    pub fn mail_settings(mut self, settings: MailSettings) -> Self {
        self.config.mail_settings = Some(settings);
        self
    }

    pub fn build(self) -> PromptConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_maps_to_half_star_values() {
        assert_eq!(RatingThreshold::None.as_stars(), 0.0);
        assert_eq!(RatingThreshold::Half.as_stars(), 0.5);
        assert_eq!(RatingThreshold::Three.as_stars(), 3.0);
        assert_eq!(RatingThreshold::ThreeAndAHalf.as_stars(), 3.5);
        assert_eq!(RatingThreshold::Five.as_stars(), 5.0);
    }

    #[test]
    fn default_config_hides_never_button() {
        let config = PromptConfig::default();
        assert!(config.rate_never_button.is_none());
        assert_eq!(config.rating_threshold, RatingThreshold::Three);
        assert!(!config.cancelable);
    }

    #[test]
    fn builder_produces_finalized_config() {
        let config = PromptConfig::builder()
            .title("Liking Ratekeeper?")
            .message("Tell us what you think.")
            .show_rate_never_button("No thanks")
            .rating_threshold(RatingThreshold::Four)
            .use_custom_feedback(true)
            .build();

        assert_eq!(config.title, "Liking Ratekeeper?");
        assert_eq!(config.rate_never_button.as_deref(), Some("No thanks"));
        assert_eq!(config.rating_threshold, RatingThreshold::Four);
        assert!(config.use_custom_feedback);
    }

    #[test]
    fn config_roundtrips_through_json() {
        let config = PromptConfig::builder()
            .mail_settings(MailSettings {
                address: "feedback@example.com".to_string(),
                subject: "App feedback".to_string(),
                body: None,
            })
            .build();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: PromptConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }
}
