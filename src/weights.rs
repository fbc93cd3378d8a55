//! Result-driven word weights
//!
//! Every result contributes `correctness * day * week` to the weight of its
//! query word. Wrong and old answers weigh more, so words the learner
//! struggles with or has not seen for a while come back more often.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{QuizError, Result};
use crate::pool::WeightedPool;
use crate::results::{QuizResult, ResultLog};
use crate::vocabulary::VocabularyIndex;

/// Copies given to a word that has no recorded results.
pub const DEFAULT_WEIGHT: usize = 10;

/// Upper bound on the copies of any one word in a pool.
pub const MAX_WEIGHT: usize = 1_000_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightConfig {
    pub correct_factor: f64,
    pub incorrect_factor: f64,
    /// Applied when the result is less than a day old.
    pub day_recent_factor: f64,
    pub day_old_factor: f64,
    /// Applied when the result is less than a week old.
    pub week_recent_factor: f64,
    pub week_old_factor: f64,
    pub default_weight: usize,
}

impl Default for WeightConfig {
    fn default() -> Self {
        Self {
            correct_factor: 0.5,
            incorrect_factor: 2.0,
            day_recent_factor: 0.5,
            day_old_factor: 1.0,
            week_recent_factor: 0.75,
            week_old_factor: 1.25,
            default_weight: DEFAULT_WEIGHT,
        }
    }
}

impl WeightConfig {
    /// Factors must be finite and positive, and `default_weight` in `1..=MAX_WEIGHT`.
    pub fn validate(&self) -> Result<()> {
        let factors = [
            ("correct_factor", self.correct_factor),
            ("incorrect_factor", self.incorrect_factor),
            ("day_recent_factor", self.day_recent_factor),
            ("day_old_factor", self.day_old_factor),
            ("week_recent_factor", self.week_recent_factor),
            ("week_old_factor", self.week_old_factor),
        ];
        for (name, value) in factors {
            if !value.is_finite() || value <= 0.0 {
                return Err(QuizError::Config(format!(
                    "{} must be a positive finite number, got {}",
                    name, value
                )));
            }
        }
        if self.default_weight == 0 || self.default_weight > MAX_WEIGHT {
            return Err(QuizError::Config(format!(
                "default_weight must be between 1 and {}, got {}",
                MAX_WEIGHT, self.default_weight
            )));
        }
        Ok(())
    }
}

/// Summed weights of queried words, split by the dictionary the word is a key of.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WordWeights {
    pub forward: BTreeMap<String, f64>,
    pub backward: BTreeMap<String, f64>,
}

impl WordWeights {
    /// Replicate every index word `floor(weight)` times.
    ///
    /// Words without results get `default_weight` copies. A queried word whose
    /// summed weight is below 1 gets zero copies and is not drawn again until
    /// new results raise it (soft pruning). Counts are capped at `MAX_WEIGHT`.
    pub fn to_pool(&self, index: &VocabularyIndex, default_weight: usize) -> WeightedPool {
        let mut pool = WeightedPool::new();
        let mut pruned = 0usize;

        for (keys, weights) in [
            (index.forward(), &self.forward),
            (index.backward(), &self.backward),
        ] {
            for word in keys.keys() {
                let copies = match weights.get(word) {
                    Some(weight) => weight.floor() as usize,
                    None => default_weight,
                }
                .min(MAX_WEIGHT);
                if copies == 0 {
                    pruned += 1;
                }
                pool.add(word, copies);
            }
        }

        if pruned > 0 {
            log::debug!("{} words soft-pruned from the pool", pruned);
        }
        pool
    }
}

#[derive(Debug, Clone, Default)]
pub struct WeightCalculator {
    config: WeightConfig,
}

impl WeightCalculator {
    pub fn new(config: WeightConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &WeightConfig {
        &self.config
    }

    /// Contribution of a single result at time `now`.
    pub fn record_weight(&self, result: &QuizResult, now: DateTime<Utc>) -> f64 {
        let c = &self.config;
        let age = now - result.timestamp;

        let correctness = if result.user_correct {
            c.correct_factor
        } else {
            c.incorrect_factor
        };
        let day = if age < Duration::days(1) {
            c.day_recent_factor
        } else {
            c.day_old_factor
        };
        let week = if age < Duration::days(7) {
            c.week_recent_factor
        } else {
            c.week_old_factor
        };
        correctness * day * week
    }

    /// Sum result weights per query word, in a single pass over the log.
    ///
    /// Fails with `MalformedRecord` on the first invalid historical record.
    pub fn compute(
        &self,
        log: &ResultLog,
        index: &VocabularyIndex,
        now: DateTime<Utc>,
    ) -> Result<WordWeights> {
        let mut weights = WordWeights::default();
        let mut unknown = 0usize;

        for result in log.results() {
            let result = result?;
            let weight = self.record_weight(&result, now);
            let mut known = false;

            if index.forward().contains_key(&result.query) {
                *weights.forward.entry(result.query.clone()).or_insert(0.0) += weight;
                known = true;
            }
            if index.backward().contains_key(&result.query) {
                *weights.backward.entry(result.query.clone()).or_insert(0.0) += weight;
                known = true;
            }
            if !known {
                unknown += 1;
            }
        }

        if unknown > 0 {
            log::debug!("{} results refer to words outside the vocabulary", unknown);
        }
        Ok(weights)
    }

    /// `compute` followed by `WordWeights::to_pool`.
    pub fn pool(
        &self,
        log: &ResultLog,
        index: &VocabularyIndex,
        now: DateTime<Utc>,
    ) -> Result<WeightedPool> {
        let weights = self.compute(log, index, now)?;
        Ok(weights.to_pool(index, self.config.default_weight))
    }
}
