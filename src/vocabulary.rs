//! Bilingual vocabulary index (source -> targets, target -> sources)

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One row of the word list: (source cell, target cell). `None` means missing.
pub type VocabRow = (Option<String>, Option<String>);

/// Word -> deduplicated translations, in first-seen order.
pub type Dictionary = BTreeMap<String, Vec<String>>;

/// Which side of the vocabulary a question starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    FromSource,
    FromTarget,
}

impl Direction {
    pub fn opposite(self) -> Self {
        match self {
            Direction::FromSource => Direction::FromTarget,
            Direction::FromTarget => Direction::FromSource,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::FromSource => "from_source",
            Direction::FromTarget => "from_target",
        }
    }
}

/// Forward and backward dictionaries built once per loaded dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VocabularyIndex {
    forward: Dictionary,
    backward: Dictionary,
}

impl VocabularyIndex {
    /// Build both dictionaries from word-list rows.
    ///
    /// Rows with a missing or blank cell are skipped; they are not an error.
    pub fn build<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = VocabRow>,
    {
        let mut index = VocabularyIndex::default();
        let mut skipped = 0usize;

        for (source, target) in rows {
            let source = source.as_deref().map(str::trim).filter(|s| !s.is_empty());
            let target = target.as_deref().map(str::trim).filter(|s| !s.is_empty());

            match (source, target) {
                (Some(source), Some(target)) => index.insert(source, target),
                _ => skipped += 1,
            }
        }

        if skipped > 0 {
            log::debug!("skipped {} incomplete vocabulary rows", skipped);
        }
        index
    }

    fn insert(&mut self, source: &str, target: &str) {
        push_unique(self.forward.entry(source.to_string()).or_default(), target);
        push_unique(self.backward.entry(target.to_string()).or_default(), source);
    }

    /// Source word -> target translations.
    pub fn forward(&self) -> &Dictionary {
        &self.forward
    }

    /// Target word -> source translations.
    pub fn backward(&self) -> &Dictionary {
        &self.backward
    }

    /// (prompt dictionary, answer dictionary) for a question direction.
    pub fn dictionaries(&self, direction: Direction) -> (&Dictionary, &Dictionary) {
        match direction {
            Direction::FromSource => (&self.forward, &self.backward),
            Direction::FromTarget => (&self.backward, &self.forward),
        }
    }

    pub fn translations(&self, direction: Direction, word: &str) -> Option<&[String]> {
        self.dictionaries(direction).0.get(word).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// Number of distinct source words plus distinct target words.
    pub fn word_count(&self) -> usize {
        self.forward.len() + self.backward.len()
    }
}

fn push_unique(list: &mut Vec<String>, word: &str) {
    if !list.iter().any(|w| w == word) {
        list.push(word.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn row(source: &str, target: &str) -> VocabRow {
        (Some(source.to_string()), Some(target.to_string()))
    }

    fn sample_rows() -> Vec<VocabRow> {
        vec![
            row("Hund", "개"),
            row(" Katze ", "고양이"),
            row("Vogel", "새"),
            row("Maus", "쥐"),
            row("Hund", "개"),
            row("Köter", "개"),
        ]
    }

    #[test]
    fn builds_both_directions_with_trimmed_cells() {
        let index = VocabularyIndex::build(sample_rows());

        assert_eq!(index.forward().get("Katze"), Some(&vec!["고양이".to_string()]));
        assert_eq!(
            index.backward().get("개"),
            Some(&vec!["Hund".to_string(), "Köter".to_string()])
        );
        assert_eq!(index.forward().len(), 5);
        assert_eq!(index.backward().len(), 4);
        assert_eq!(index.word_count(), 9);
    }

    #[test]
    fn skips_missing_and_blank_cells() {
        let rows = vec![
            row("Hund", "개"),
            (None, Some("고양이".to_string())),
            (Some("Vogel".to_string()), None),
            row("   ", "쥐"),
            (None, None),
        ];
        let index = VocabularyIndex::build(rows);

        assert_eq!(index.forward().keys().collect::<Vec<_>>(), vec!["Hund"]);
        assert_eq!(index.backward().keys().collect::<Vec<_>>(), vec!["개"]);
    }

    #[test]
    fn forward_and_backward_round_trip() {
        let index = VocabularyIndex::build(sample_rows());

        for (word, translations) in index.forward() {
            for translation in translations {
                assert!(index.backward()[translation].contains(word));
            }
        }
        for (word, translations) in index.backward() {
            for translation in translations {
                assert!(index.forward()[translation].contains(word));
            }
        }
    }

    #[test]
    fn translation_lists_are_duplicate_free() {
        let index = VocabularyIndex::build(sample_rows());
        for list in index.forward().values().chain(index.backward().values()) {
            let mut sorted = list.clone();
            sorted.sort();
            sorted.dedup();
            assert_eq!(sorted.len(), list.len());
        }
    }

    #[test]
    fn building_twice_is_identical() {
        assert_eq!(
            VocabularyIndex::build(sample_rows()),
            VocabularyIndex::build(sample_rows())
        );
    }

    #[test]
    fn dictionaries_swap_with_direction() {
        let index = VocabularyIndex::build(sample_rows());
        let (prompt, answer) = index.dictionaries(Direction::FromTarget);
        assert!(prompt.contains_key("개"));
        assert!(answer.contains_key("Hund"));
        assert_eq!(Direction::FromTarget.opposite(), Direction::FromSource);
        assert_eq!(
            index.translations(Direction::FromSource, "Vogel"),
            Some(&["새".to_string()][..])
        );
    }
}
