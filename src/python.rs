//! Python bindings (cargo feature `python`)

use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::QuizConfig;
use crate::dataset::load_index;
use crate::error::QuizError;
use crate::questions::Question;
use crate::session::QuizSession;
use crate::store::{JsonDirStore, ResultStore};

fn to_py_err(e: QuizError) -> PyErr {
    PyRuntimeError::new_err(e.to_string())
}

/// Multiple-choice question handed to Python
#[pyclass(name = "Question")]
#[derive(Debug, Clone)]
pub struct PyQuestion {
    #[pyo3(get)]
    pub prompt: String,
    #[pyo3(get)]
    pub correct_answer: String,
    #[pyo3(get)]
    pub options: Vec<String>,
    #[pyo3(get)]
    pub direction: String,
}

impl From<&Question> for PyQuestion {
    fn from(q: &Question) -> Self {
        Self {
            prompt: q.prompt.clone(),
            correct_answer: q.correct_answer.clone(),
            options: q.options.clone(),
            direction: q.direction.as_str().to_string(),
        }
    }
}

#[pymethods]
impl PyQuestion {
    fn __repr__(&self) -> String {
        format!(
            "Question(prompt='{}', options={:?}, direction='{}')",
            self.prompt, self.options, self.direction
        )
    }
}

/// Quiz session over a word list, persisting to a JSON results folder
#[pyclass(name = "QuizSession", unsendable)]
pub struct PyQuizSession {
    session: QuizSession<StdRng>,
    store: JsonDirStore,
    current: Option<Question>,
}

#[pymethods]
impl PyQuizSession {
    #[new]
    #[pyo3(signature = (vocabulary_path, results_dir = "./quiz_results/", seed = None))]
    fn new(vocabulary_path: &str, results_dir: &str, seed: Option<u64>) -> PyResult<Self> {
        let config = QuizConfig::from_env();
        config.validate().map_err(to_py_err)?;

        let index = load_index(vocabulary_path, &config.dataset).map_err(to_py_err)?;
        let store = JsonDirStore::new(results_dir);
        let historical = store.load_historical().map_err(to_py_err)?;
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut session = QuizSession::new(index, historical, &config, rng);
        session.log_mut().discard_malformed();
        Ok(Self {
            session,
            store,
            current: None,
        })
    }

    fn next_question(&mut self) -> PyResult<PyQuestion> {
        let question = self.session.next_question().map_err(to_py_err)?;
        let py_question = PyQuestion::from(&question);
        self.current = Some(question);
        Ok(py_question)
    }

    /// Answer the current question. Returns whether the choice was correct.
    fn answer(&mut self, choice: &str) -> PyResult<bool> {
        let question = self
            .current
            .take()
            .ok_or_else(|| PyValueError::new_err("no open question"))?;
        Ok(self.session.answer(&question, choice))
    }

    fn save(&mut self) -> PyResult<usize> {
        self.session.save(&mut self.store).map_err(to_py_err)
    }

    /// (total, correct, accuracy percent)
    fn stats(&self) -> (usize, usize, f64) {
        let stats = self.session.stats();
        (stats.total_attempts, stats.correct_count, stats.accuracy_percent)
    }
}
