//! # lr-rewards: Reward Engine for the Luckyreel slot minigame
//!
//! Decides what a four-symbol draw pays and estimates the return to player
//! of a weight/rule configuration.
//!
//! ## Features
//!
//! - **Sampler**: integer-weighted symbol draws from an injected RNG
//! - **Matcher**: closed pattern vocabulary (sequence, combination, runs, counts, MMNN, ABBA)
//! - **Resolver**: fixed precedence, prioritized rules, bonus stacking, punishment tiers
//! - **Estimator**: exact punishment odds plus Monte Carlo tables, progress and cancellation
//! - **Cache**: permanent table cache, wiped on configuration edits
//! - **Store / Loader**: parsed configuration rows and variant bindings
//!
//! ## Architecture
//!
//! ```text
//! ConfigStore ──► SchemeLoader ──► (WeightConfig, RewardScheme, strictness)
//!                                        │
//!              ┌─────────────────────────┴──────────────┐
//!              v                                        v
//!        SlotMachine                           ProbabilityService
//!   SymbolSampler → RewardResolver          ProbabilityCache ◄─► ProbabilityEstimator
//!              │                                              (SymbolSampler + RewardResolver)
//!              v                                        │
//!     PlayRecord → RecordSink                   Arc<ProbabilityTable>
//! ```

pub mod cache;
pub mod config;
pub mod estimator;
pub mod matcher;
pub mod parser;
pub mod pattern;
pub mod play;
pub mod presets;
pub mod resolver;
pub mod rules;
pub mod sampler;
pub mod service;
pub mod store;
pub mod variant;

pub use cache::*;
pub use config::*;
pub use estimator::*;
pub use matcher::*;
pub use parser::*;
pub use pattern::*;
pub use play::*;
pub use resolver::*;
pub use rules::*;
pub use sampler::*;
pub use service::*;
pub use store::*;
pub use variant::*;
