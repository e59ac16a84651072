//! # Ratekeeper Core Library
//!
//! This library decides whether and when a running application should
//! prompt its user for a store rating, based on accumulated usage signals
//! (launch counts, elapsed time, prior responses) and developer-configured
//! thresholds. It is an embedded library: dialog rendering, store routing
//! and mail composition stay in the host application.
//!
//! ## Architecture
//!
//! - **Conditions Engine**: a pure function `decide(state, policy, now)`
//!   composing AND-combined gates with short-circuit evaluation
//! - **Storage**: a durable single-record store for the usage state, with
//!   TOML-file and key-value-backed implementations
//! - **Flow Controller**: records launches, asks for decisions, and applies
//!   the state transition for each user response
//! - **Prompt Config**: the render directive handed to the host's UI layer
//!
//! ## Key Components
//!
//! - [`FlowController`]: lifecycle orchestration, the host's entry point
//! - [`decide`]: the condition-evaluation engine
//! - [`Policy`]: gating thresholds, built via [`PolicyBuilder`]
//! - [`StateStore`]: durability contract for [`UsageState`]

pub mod clock;
pub mod conditions;
pub mod error;
pub mod flow;
pub mod policy;
pub mod prompt;
pub mod state;
pub mod storage;

pub use clock::{Clock, FixedClock, SystemClock};
pub use conditions::{decide, evaluate, Decision, Evaluation, Gate};
pub use error::{CoreError, PolicyError, StorageError};
pub use flow::FlowController;
pub use policy::{DayPrecision, Policy, PolicyBuilder};
pub use prompt::{MailSettings, PromptConfig, PromptConfigBuilder, PromptOutcome, RatingThreshold};
pub use state::{ResponseStatus, UsageState};
pub use storage::{KeyValueStore, KvStateStore, MemoryKvStore, StateStore, TomlStateStore};
