//! Distractor generation: plausible wrong answers for multiple choice

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use strsim::jaro_winkler;

use crate::error::{QuizError, Result};

fn default_keep_top() -> usize {
    1
}

fn default_window_slack() -> usize {
    2
}

/// How wrong options are picked from the candidate pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum DistractorStrategy {
    /// Rank candidates by Jaro-Winkler similarity to the correct answer.
    /// The `keep_top` best are always used; the rest are sampled from the
    /// next `count - keep_top + window_slack` ranked candidates, which keeps
    /// repeated quizzes on the same word from showing identical options.
    SimilarityBased {
        #[serde(default = "default_keep_top")]
        keep_top: usize,
        #[serde(default = "default_window_slack")]
        window_slack: usize,
    },
    /// Prefer candidates sharing the first character or the length of the
    /// correct answer, topped up with random candidates.
    HeuristicBased,
}

impl Default for DistractorStrategy {
    fn default() -> Self {
        DistractorStrategy::SimilarityBased {
            keep_top: default_keep_top(),
            window_slack: default_window_slack(),
        }
    }
}

impl DistractorStrategy {
    /// Pick `count` distinct words from `pool`, none equal to `correct`.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        correct: &str,
        pool: &[&str],
        count: usize,
        rng: &mut R,
    ) -> Result<Vec<String>> {
        let candidates = distinct_candidates(correct, pool);
        if candidates.len() < count {
            log::warn!(
                "only {} distractor candidates for '{}', {} needed",
                candidates.len(),
                correct,
                count
            );
            return Err(QuizError::InsufficientDistractors {
                needed: count,
                available: candidates.len(),
            });
        }

        let chosen = match *self {
            DistractorStrategy::SimilarityBased {
                keep_top,
                window_slack,
            } => by_similarity(correct, &candidates, count, keep_top, window_slack, rng),
            DistractorStrategy::HeuristicBased => by_heuristic(correct, candidates, count, rng),
        };
        Ok(chosen.into_iter().map(str::to_string).collect())
    }
}

/// Pool words without duplicates and without the correct answer, in pool order.
fn distinct_candidates<'a>(correct: &str, pool: &[&'a str]) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    pool.iter()
        .copied()
        .filter(|w| *w != correct && seen.insert(*w))
        .collect()
}

fn by_similarity<'a, R: Rng + ?Sized>(
    correct: &str,
    candidates: &[&'a str],
    count: usize,
    keep_top: usize,
    window_slack: usize,
    rng: &mut R,
) -> Vec<&'a str> {
    let mut ranked: Vec<(&'a str, f64)> = candidates
        .iter()
        .map(|w| (*w, jaro_winkler(correct, w)))
        .collect();
    // Stable, so equal scores keep pool order.
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

    let keep = keep_top.min(count);
    let remaining = count - keep;
    let window_end = (keep + remaining + window_slack).min(ranked.len());

    let mut chosen: Vec<&'a str> = ranked[..keep].iter().map(|(w, _)| *w).collect();
    chosen.extend(
        ranked[keep..window_end]
            .choose_multiple(rng, remaining)
            .map(|(w, _)| *w),
    );
    chosen
}

fn by_heuristic<'a, R: Rng + ?Sized>(
    correct: &str,
    candidates: Vec<&'a str>,
    count: usize,
    rng: &mut R,
) -> Vec<&'a str> {
    let first = correct.chars().next();
    let length = correct.chars().count();

    let (mut chosen, rest): (Vec<&'a str>, Vec<&'a str>) = candidates
        .into_iter()
        .partition(|w| w.chars().next() == first || w.chars().count() == length);

    chosen.shuffle(rng);
    chosen.truncate(count);
    if chosen.len() < count {
        let missing = count - chosen.len();
        chosen.extend(rest.choose_multiple(rng, missing).copied());
    }
    chosen
}
