//! Quiz session: the question/answer loop without any UI

use chrono::{DateTime, Utc};
use rand::Rng;

use crate::config::QuizConfig;
use crate::error::Result;
use crate::questions::{Question, QuestionBuilder};
use crate::results::{AttemptStats, ResultLog, ResultRecord};
use crate::sampler;
use crate::store::ResultStore;
use crate::vocabulary::{Direction, VocabularyIndex};
use crate::weights::WeightCalculator;

/// Audio cues and speech for answered questions. Target-language words are
/// the ones handed to `speak`.
pub trait AnswerFeedback {
    fn on_correct(&mut self) {}
    fn on_incorrect(&mut self) {}
    fn speak(&mut self, _word: &str) {}
}

/// Feedback that does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentFeedback;

impl AnswerFeedback for SilentFeedback {}

/// One learner's quiz run: its own log, pool and random source.
pub struct QuizSession<R: Rng> {
    index: VocabularyIndex,
    log: ResultLog,
    calculator: WeightCalculator,
    builder: QuestionBuilder,
    rng: R,
    feedback: Box<dyn AnswerFeedback>,
    /// Session results already handed to a store.
    saved: usize,
}

impl<R: Rng> QuizSession<R> {
    pub fn new(
        index: VocabularyIndex,
        historical: Vec<ResultRecord>,
        config: &QuizConfig,
        rng: R,
    ) -> Self {
        Self {
            index,
            log: ResultLog::new(historical),
            calculator: config.weight_calculator(),
            builder: config.question_builder(),
            rng,
            feedback: Box::new(SilentFeedback),
            saved: 0,
        }
    }

    pub fn with_feedback(mut self, feedback: impl AnswerFeedback + 'static) -> Self {
        self.feedback = Box::new(feedback);
        self
    }

    pub fn index(&self) -> &VocabularyIndex {
        &self.index
    }

    pub fn log(&self) -> &ResultLog {
        &self.log
    }

    pub fn log_mut(&mut self) -> &mut ResultLog {
        &mut self.log
    }

    pub fn next_question(&mut self) -> Result<Question> {
        self.next_question_at(Utc::now())
    }

    /// Reweight from the full log, draw a word and build its question.
    pub fn next_question_at(&mut self, now: DateTime<Utc>) -> Result<Question> {
        let pool = self.calculator.pool(&self.log, &self.index, now)?;
        let word = sampler::draw(&pool, &mut self.rng)?;
        let question = self.builder.build(word, &self.index, &mut self.rng)?;

        if question.direction == Direction::FromTarget {
            self.feedback.speak(&question.prompt);
        }
        Ok(question)
    }

    pub fn answer(&mut self, question: &Question, choice: &str) -> bool {
        self.answer_at(question, choice, Utc::now())
    }

    /// Record the answer in the session log and give feedback.
    pub fn answer_at(&mut self, question: &Question, choice: &str, now: DateTime<Utc>) -> bool {
        let result = question.answer(choice, now);
        let correct = result.user_correct;

        if correct {
            self.feedback.on_correct();
        } else {
            self.feedback.on_incorrect();
        }
        if question.direction == Direction::FromSource {
            self.feedback.speak(choice);
        }

        self.log.push(result);
        correct
    }

    pub fn stats(&self) -> AttemptStats {
        self.log.stats()
    }

    /// Persist results answered since the last successful save.
    /// Nothing is written when there are none.
    pub fn save(&mut self, store: &mut dyn ResultStore) -> Result<usize> {
        let pending = &self.log.session()[self.saved..];
        if pending.is_empty() {
            return Ok(0);
        }
        store.save_session(pending)?;
        let count = pending.len();
        self.saved += count;
        log::info!("saved {} quiz results", count);
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QuizError;
    use crate::results::QuizResult;
    use crate::vocabulary::VocabRow;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Recorded {
        correct: usize,
        incorrect: usize,
        spoken: Vec<String>,
    }

    #[derive(Clone, Default)]
    struct RecordingFeedback(Rc<RefCell<Recorded>>);

    impl AnswerFeedback for RecordingFeedback {
        fn on_correct(&mut self) {
            self.0.borrow_mut().correct += 1;
        }
        fn on_incorrect(&mut self) {
            self.0.borrow_mut().incorrect += 1;
        }
        fn speak(&mut self, word: &str) {
            self.0.borrow_mut().spoken.push(word.to_string());
        }
    }

    #[derive(Default)]
    struct MemoryStore {
        saved: Vec<Vec<QuizResult>>,
    }

    impl ResultStore for MemoryStore {
        fn load_historical(&self) -> Result<Vec<ResultRecord>> {
            Ok(self.saved.iter().flatten().map(QuizResult::to_record).collect())
        }

        fn save_session(&mut self, results: &[QuizResult]) -> Result<()> {
            self.saved.push(results.to_vec());
            Ok(())
        }
    }

    fn index() -> VocabularyIndex {
        let rows: Vec<VocabRow> = [("Hund", "개"), ("Katze", "고양이"), ("Vogel", "새"), ("Maus", "쥐")]
            .iter()
            .map(|(s, t)| (Some(s.to_string()), Some(t.to_string())))
            .collect();
        VocabularyIndex::build(rows)
    }

    fn session(seed: u64) -> QuizSession<StdRng> {
        QuizSession::new(index(), Vec::new(), &QuizConfig::default(), StdRng::seed_from_u64(seed))
    }

    #[test]
    fn answers_feed_back_into_the_log() {
        let feedback = RecordingFeedback::default();
        let mut session = session(4).with_feedback(feedback.clone());

        for round in 0..10 {
            let question = session.next_question().unwrap();
            let choice = if round % 2 == 0 {
                question.correct_answer.clone()
            } else {
                question
                    .options
                    .iter()
                    .find(|o| **o != question.correct_answer)
                    .unwrap()
                    .clone()
            };
            assert_eq!(session.answer(&question, &choice), round % 2 == 0);
        }

        let recorded = feedback.0.borrow();
        assert_eq!(recorded.correct, 5);
        assert_eq!(recorded.incorrect, 5);
        assert_eq!(session.log().session().len(), 10);
        assert_eq!(session.stats().correct_count, 5);
        // Every question speaks exactly one target-language word.
        assert_eq!(recorded.spoken.len(), 10);
        for word in &recorded.spoken {
            assert!(session.index().backward().contains_key(word));
        }
    }

    #[test]
    fn seeded_sessions_repeat() {
        let mut a = session(21);
        let mut b = session(21);
        for _ in 0..5 {
            assert_eq!(a.next_question().unwrap(), b.next_question().unwrap());
        }
    }

    #[test]
    fn empty_vocabulary_has_no_question() {
        let mut session = QuizSession::new(
            VocabularyIndex::default(),
            Vec::new(),
            &QuizConfig::default(),
            StdRng::seed_from_u64(0),
        );
        assert!(matches!(session.next_question(), Err(QuizError::EmptyPool)));
    }

    #[test]
    fn malformed_history_can_be_discarded() {
        let mut session = QuizSession::new(
            index(),
            vec![ResultRecord::default()],
            &QuizConfig::default(),
            StdRng::seed_from_u64(0),
        );
        assert!(matches!(
            session.next_question(),
            Err(QuizError::MalformedRecord { position: 0, .. })
        ));
        assert_eq!(session.log_mut().discard_malformed(), 1);
        assert!(session.next_question().is_ok());
    }

    #[test]
    fn saves_only_non_empty_sessions() {
        let mut store = MemoryStore::default();
        let mut session = session(8);
        assert_eq!(session.save(&mut store).unwrap(), 0);
        assert!(store.saved.is_empty());

        let question = session.next_question().unwrap();
        session.answer(&question, &question.correct_answer.clone());
        assert_eq!(session.save(&mut store).unwrap(), 1);
        assert_eq!(store.load_historical().unwrap().len(), 1);
    }

    #[test]
    fn repeated_saves_write_each_result_once() {
        let mut store = MemoryStore::default();
        let mut session = session(9);
        for _ in 0..3 {
            let question = session.next_question().unwrap();
            session.answer(&question, &question.correct_answer.clone());
        }
        assert_eq!(session.save(&mut store).unwrap(), 3);
        assert_eq!(session.save(&mut store).unwrap(), 0);
        assert_eq!(store.saved.len(), 1);

        let question = session.next_question().unwrap();
        session.answer(&question, &question.correct_answer.clone());
        assert_eq!(session.save(&mut store).unwrap(), 1);

        let reloaded = store.load_historical().unwrap();
        assert_eq!(reloaded.len(), 4);
        assert_eq!(reloaded[3].query.as_deref(), Some(question.prompt.as_str()));
        // The in-memory log keeps every answer for weighting.
        assert_eq!(session.log().session().len(), 4);
    }

    #[test]
    fn failed_save_keeps_results_pending() {
        struct FailingStore;
        impl ResultStore for FailingStore {
            fn load_historical(&self) -> Result<Vec<ResultRecord>> {
                Ok(Vec::new())
            }
            fn save_session(&mut self, _: &[QuizResult]) -> Result<()> {
                Err(QuizError::EmptyFile)
            }
        }

        let mut session = session(10);
        let question = session.next_question().unwrap();
        session.answer(&question, &question.correct_answer.clone());
        assert!(session.save(&mut FailingStore).is_err());

        let mut store = MemoryStore::default();
        assert_eq!(session.save(&mut store).unwrap(), 1);
    }
}
