// ABOUTME: Vocabulary-based spelling corrector for recipe queries
// ABOUTME: Corrects words missing from the English dictionary toward the closest food or query word
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Spelling Correction
//!
//! A word is left alone when it has at most two characters, contains a digit,
//! or is known. Known words are the general English dictionary in
//! `data/english_words.txt`, the curated food vocabulary, common query words,
//! and words learned from catalog titles, each also matched through simple
//! inflections (`cookies`, `chopped`, `baking`).
//!
//! Unknown words are corrected only toward the vocabulary and learned title
//! words, never toward plain dictionary words. The best target at edit
//! distance 1 wins; distance 2 is tried only for words of five or more
//! characters. Ties go to the word seen most often in catalog titles, then to
//! the lexicographically smallest.

use recipe_core::models::{Recipe, SpellingCorrection};
use recipe_intelligence::vocabulary::{
    CATEGORY_SYNONYMS, DISH_NAMES, FOOD_WORDS, INGREDIENTS, MEAL_TYPE_SYNONYMS, QUERY_WORDS,
};
use recipe_intelligence::{Correction, SpellingCorrector};
use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// General English word list, one lower-case word per line
const ENGLISH_WORDS: &str = include_str!("../data/english_words.txt");

/// Largest edit distance considered
const MAX_EDIT_DISTANCE: usize = 2;

/// Shortest word the corrector will touch, and shortest correction target
const MIN_WORD_CHARS: usize = 3;

/// Shortest word eligible for a distance-2 correction
const MIN_DISTANCE_TWO_CHARS: usize = 5;

/// Inflection suffixes and their replacements, tried when a word is not known as written
const INFLECTIONS: &[(&str, &str)] = &[
    ("ies", "y"),
    ("es", ""),
    ("s", ""),
    ("ed", ""),
    ("ed", "e"),
    ("ing", ""),
    ("ing", "e"),
    ("er", ""),
    ("er", "e"),
    ("ly", ""),
];

/// Spelling corrector over a fixed vocabulary plus learned catalog words
#[derive(Debug, Clone)]
pub struct VocabularySpellCorrector {
    /// Correction targets with their learned frequency
    frequencies: HashMap<String, u64>,
    /// Words that are correct but never used as targets
    dictionary: HashSet<&'static str>,
}

impl Default for VocabularySpellCorrector {
    fn default() -> Self {
        Self::new()
    }
}

impl VocabularySpellCorrector {
    /// Corrector over the built-in vocabulary and English dictionary
    #[must_use]
    pub fn new() -> Self {
        let phrases = INGREDIENTS
            .iter()
            .chain(DISH_NAMES)
            .chain(FOOD_WORDS)
            .chain(QUERY_WORDS)
            .chain(CATEGORY_SYNONYMS.iter().flat_map(|(_, keywords)| keywords.iter()))
            .chain(MEAL_TYPE_SYNONYMS.iter().flat_map(|(_, keywords)| keywords.iter()));

        let mut frequencies = HashMap::new();
        for word in phrases.flat_map(|phrase| phrase.split_whitespace()) {
            if word.chars().count() >= MIN_WORD_CHARS {
                frequencies.entry(word.to_lowercase()).or_insert(1);
            }
        }

        let dictionary = ENGLISH_WORDS
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        Self {
            frequencies,
            dictionary,
        }
    }

    /// Learn words from recipe titles; repeated words gain weight for tie-breaking
    #[must_use]
    pub fn learn_titles<'a, I>(mut self, titles: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        for title in titles {
            for word in title.split(|c: char| !c.is_alphabetic() && c != '\'') {
                let word = word.trim_matches('\'').to_lowercase();
                if word.chars().count() >= MIN_WORD_CHARS {
                    *self.frequencies.entry(word).or_insert(0) += 1;
                }
            }
        }
        self
    }

    /// Learn from a loaded catalog
    #[must_use]
    pub fn learn_catalog(self, recipes: &[Recipe]) -> Self {
        self.learn_titles(recipes.iter().map(|r| r.title.as_str()))
    }

    /// Number of correction targets
    #[must_use]
    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    /// Whether there are no correction targets
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    /// Whether a lower-cased word, or one of its inflection stems, is known
    #[must_use]
    pub fn is_known(&self, word: &str) -> bool {
        self.is_listed(word) || inflection_stems(word).iter().any(|stem| self.is_listed(stem))
    }

    fn is_listed(&self, word: &str) -> bool {
        self.frequencies.contains_key(word) || self.dictionary.contains(word)
    }

    /// Best target within the edit budget for this word, nearest distance first
    fn best_match(&self, word: &str) -> Option<&str> {
        let length = word.chars().count();
        let budget = if length >= MIN_DISTANCE_TWO_CHARS {
            MAX_EDIT_DISTANCE
        } else {
            1
        };
        let mut best: Option<(usize, Reverse<u64>, &str)> = None;

        for (known, frequency) in &self.frequencies {
            if known.chars().count().abs_diff(length) > budget {
                continue;
            }
            let Some(distance) = edit_distance(word, known, budget) else {
                continue;
            };
            let candidate = (distance, Reverse(*frequency), known.as_str());
            if best.is_none_or(|current| candidate < current) {
                best = Some(candidate);
            }
        }
        best.map(|(_, _, known)| known)
    }
}

impl SpellingCorrector for VocabularySpellCorrector {
    fn correct(&self, text: &str) -> Correction {
        let mut words: Vec<String> = Vec::new();
        let mut corrections: Vec<SpellingCorrection> = Vec::new();

        for word in text.split_whitespace() {
            let clean = word
                .to_lowercase()
                .trim_matches(|c: char| matches!(c, '.' | ',' | '!' | '?'))
                .to_owned();

            let skip = clean.chars().count() < MIN_WORD_CHARS
                || clean.chars().any(|c| c.is_ascii_digit())
                || self.is_known(&clean);

            match (!skip).then(|| self.best_match(&clean)).flatten() {
                Some(corrected) if corrected != clean => {
                    words.push(corrected.to_owned());
                    corrections.push(SpellingCorrection::new(word, corrected));
                }
                _ => words.push(word.to_owned()),
            }
        }

        if !corrections.is_empty() {
            debug!(query = %text, corrections = corrections.len(), "Corrected spelling");
        }
        Correction {
            text: words.join(" "),
            corrections,
        }
    }
}

/// Candidate base forms of an inflected word; a doubled final consonant is
/// also undoubled (`chopped` -> `chop`)
fn inflection_stems(word: &str) -> Vec<String> {
    let mut stems = Vec::new();
    for (suffix, replacement) in INFLECTIONS {
        let Some(base) = word.strip_suffix(suffix) else {
            continue;
        };
        if base.chars().count() < MIN_WORD_CHARS - 1 {
            continue;
        }
        stems.push(format!("{base}{replacement}"));

        let mut undoubled = base.chars();
        let last = undoubled.next_back();
        if replacement.is_empty()
            && last.is_some_and(|c| !"aeiou".contains(c))
            && last == undoubled.clone().next_back()
        {
            stems.push(undoubled.as_str().to_owned());
        }
    }
    stems
}

/// Optimal string alignment distance (adjacent transpositions count as one
/// edit), or `None` when it exceeds `max`
fn edit_distance(a: &str, b: &str, max: usize) -> Option<usize> {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let mut before_previous: Vec<usize> = vec![0; b.len() + 1];
    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current: Vec<usize> = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        current[0] = i;
        let mut row_min = current[0];
        for j in 1..=b.len() {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            let mut value = (previous[j] + 1)
                .min(current[j - 1] + 1)
                .min(previous[j - 1] + cost);
            if i > 1 && j > 1 && a[i - 1] == b[j - 2] && a[i - 2] == b[j - 1] {
                value = value.min(before_previous[j - 2] + 1);
            }
            current[j] = value;
            row_min = row_min.min(value);
        }
        if row_min > max {
            return None;
        }
        before_previous.clone_from(&previous);
        previous.clone_from(&current);
    }

    let distance = previous[b.len()];
    (distance <= max).then_some(distance)
}
