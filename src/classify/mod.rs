//! Classification core: rule engine, adaptive scorer, and suggestion mapper.
//!
//! The pipeline runs `Message -> RuleEngine -> AdaptiveScorer -> suggestions`;
//! everything here is pure given its inputs, so concurrent classifications
//! need no coordination.

mod rules;
mod scorer;
mod suggestions;

pub use rules::{RuleEngine, RuleSet, TagRule, GENERAL_CONFIDENCE};
pub use scorer::{AdaptiveScorer, ScoringPolicy};
pub use suggestions::{suggested_actions, SuggestedAction};
