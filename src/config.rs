//! Quiz configuration

use serde::{Deserialize, Serialize};
use std::env;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::dataset::DatasetConfig;
use crate::distractors::DistractorStrategy;
use crate::error::{QuizError, Result};
use crate::questions::{PromptSelection, QuestionBuilder, OPTION_COUNT};
use crate::weights::{WeightCalculator, WeightConfig};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuizConfig {
    /// Options shown per question, correct answer included.
    pub option_count: usize,
    pub distractors: DistractorStrategy,
    pub prompt_selection: PromptSelection,
    pub weights: WeightConfig,
    pub dataset: DatasetConfig,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            option_count: OPTION_COUNT,
            distractors: DistractorStrategy::default(),
            prompt_selection: PromptSelection::default(),
            weights: WeightConfig::default(),
            dataset: DatasetConfig::default(),
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

impl QuizConfig {
    /// Defaults overridden by `QUIZ_*` environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(count) = env_parse("QUIZ_OPTION_COUNT") {
            config.option_count = count;
        }
        if let Some(weight) = env_parse("QUIZ_DEFAULT_WEIGHT") {
            config.weights.default_weight = weight;
        }

        let keep_top = env_parse("QUIZ_KEEP_TOP").unwrap_or(1);
        let window_slack = env_parse("QUIZ_WINDOW_SLACK").unwrap_or(2);
        config.distractors = match env::var("QUIZ_DISTRACTOR_STRATEGY").as_deref() {
            Ok("heuristic") => DistractorStrategy::HeuristicBased,
            _ => DistractorStrategy::SimilarityBased {
                keep_top,
                window_slack,
            },
        };

        if let Ok("drawn_word") = env::var("QUIZ_PROMPT_SELECTION").as_deref() {
            config.prompt_selection = PromptSelection::DrawnWord;
        }

        config.dataset.source_column = env::var("QUIZ_SOURCE_COLUMN").ok();
        config.dataset.target_column = env::var("QUIZ_TARGET_COLUMN").ok();
        config
    }

    /// Load from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let config: QuizConfig = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.option_count < 2 {
            return Err(QuizError::Config(format!(
                "option_count must be at least 2, got {}",
                self.option_count
            )));
        }
        if let DistractorStrategy::SimilarityBased { keep_top: 0, .. } = self.distractors {
            return Err(QuizError::Config("keep_top must be at least 1".to_string()));
        }
        self.weights.validate()
    }

    pub fn question_builder(&self) -> QuestionBuilder {
        QuestionBuilder::new(
            self.option_count,
            self.distractors.clone(),
            self.prompt_selection,
        )
    }

    pub fn weight_calculator(&self) -> WeightCalculator {
        WeightCalculator::new(self.weights.clone())
    }
}
