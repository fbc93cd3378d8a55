//! Flashquiz Core - adaptive bilingual flashcard quiz engine
//!
//! Turns past quiz results into a sampling distribution over the vocabulary,
//! draws a word, and builds a multiple-choice question with plausible
//! distractors. Word-list loading, result storage and optional Python
//! bindings sit around that core.

pub mod config;
pub mod dataset;
pub mod distractors;
pub mod error;
pub mod pool;
pub mod questions;
pub mod results;
pub mod sampler;
pub mod session;
pub mod store;
pub mod vocabulary;
pub mod weights;

#[cfg(feature = "python")]
mod python;

pub use config::QuizConfig;
pub use dataset::{load_index, load_rows, DatasetConfig};
pub use distractors::DistractorStrategy;
pub use error::{QuizError, Result};
pub use pool::WeightedPool;
pub use questions::{PromptSelection, Question, QuestionBuilder, OPTION_COUNT};
pub use results::{AttemptStats, QuizResult, ResultLog, ResultRecord};
pub use sampler::draw;
pub use session::{AnswerFeedback, QuizSession, SilentFeedback};
pub use store::{JsonDirStore, ResultStore, SqliteStore};
pub use vocabulary::{Direction, VocabRow, VocabularyIndex};
pub use weights::{WeightCalculator, WeightConfig, WordWeights, DEFAULT_WEIGHT, MAX_WEIGHT};

#[cfg(feature = "python")]
use pyo3::prelude::*;

/// Flashquiz Core Python Module
#[cfg(feature = "python")]
#[pymodule]
fn flashquiz_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<python::PyQuizSession>()?;
    m.add_class::<python::PyQuestion>()?;
    Ok(())
}
