//! Multiple-choice question generation

use chrono::{DateTime, Utc};
use rand::seq::{IteratorRandom, SliceRandom};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::distractors::DistractorStrategy;
use crate::error::{QuizError, Result};
use crate::results::QuizResult;
use crate::vocabulary::{Direction, VocabularyIndex};

/// Total options per question, correct answer included.
pub const OPTION_COUNT: usize = 4;

/// How the displayed prompt relates to the drawn word.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptSelection {
    /// The drawn word only fixes the direction; the prompt is any key of
    /// the prompt dictionary.
    #[default]
    RandomKey,
    /// The drawn word is the prompt.
    DrawnWord,
}

/// A multiple-choice question
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    pub prompt: String,
    pub correct_answer: String,
    pub options: Vec<String>,
    pub direction: Direction,
}

impl Question {
    pub fn correct_index(&self) -> Option<usize> {
        self.options.iter().position(|o| *o == self.correct_answer)
    }

    pub fn is_correct(&self, choice: &str) -> bool {
        choice == self.correct_answer
    }

    /// The result record for answering this question with `choice`.
    pub fn answer(&self, choice: &str, now: DateTime<Utc>) -> QuizResult {
        QuizResult::new(
            self.prompt.clone(),
            self.correct_answer.clone(),
            self.is_correct(choice),
            now,
        )
    }
}

#[derive(Debug, Clone)]
pub struct QuestionBuilder {
    option_count: usize,
    strategy: DistractorStrategy,
    prompt_selection: PromptSelection,
}

impl Default for QuestionBuilder {
    fn default() -> Self {
        Self::new(OPTION_COUNT, DistractorStrategy::default(), PromptSelection::default())
    }
}

impl QuestionBuilder {
    pub fn new(
        option_count: usize,
        strategy: DistractorStrategy,
        prompt_selection: PromptSelection,
    ) -> Self {
        Self {
            option_count,
            strategy,
            prompt_selection,
        }
    }

    /// Build a question anchored on a word drawn from the weighted pool.
    ///
    /// The word is a target-language word when it is a key of the backward
    /// dictionary; the question then goes from target to source.
    pub fn build<R: Rng + ?Sized>(
        &self,
        word: &str,
        index: &VocabularyIndex,
        rng: &mut R,
    ) -> Result<Question> {
        let direction = if index.backward().contains_key(word) {
            Direction::FromTarget
        } else {
            Direction::FromSource
        };
        let (prompt_dict, answer_dict) = index.dictionaries(direction);

        let prompt = match self.prompt_selection {
            PromptSelection::DrawnWord if prompt_dict.contains_key(word) => word,
            _ => prompt_dict
                .keys()
                .choose(rng)
                .ok_or(QuizError::EmptyPool)?
                .as_str(),
        };
        let correct_answer = prompt_dict
            .get(prompt)
            .and_then(|translations| translations.choose(rng))
            .ok_or(QuizError::EmptyPool)?
            .clone();

        let pool: Vec<&str> = answer_dict.keys().map(String::as_str).collect();
        let count = self.option_count.saturating_sub(1);
        let mut options = self.strategy.generate(&correct_answer, &pool, count, rng)?;
        options.push(correct_answer.clone());
        options.shuffle(rng);

        Ok(Question {
            prompt: prompt.to_string(),
            correct_answer,
            options,
            direction,
        })
    }
}
