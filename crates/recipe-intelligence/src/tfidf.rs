// ABOUTME: TF-IDF vector space model with sparse vectors and cosine similarity
// ABOUTME: Used for the catalog-wide semantic index and for per-request similarity spaces
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Term weighting follows the usual smoothed formulation:
//! `idf(t) = ln((1 + n) / (1 + df(t))) + 1`, `w(t, d) = tf(t, d) * idf(t)`,
//! then every document vector is L2-normalised so cosine similarity is a dot
//! product.
//!
//! Tokens are runs of two or more alphanumeric characters, lower-cased, with
//! English stop words removed before n-grams are formed.

use rayon::prelude::*;
use recipe_core::constants::{hybrid, similarity};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

/// English stop words removed before weighting
pub const ENGLISH_STOP_WORDS: &[&str] = &[
    "a", "about", "above", "across", "after", "afterwards", "again", "against", "all", "almost",
    "alone", "along", "already", "also", "although", "always", "am", "among", "amongst", "an",
    "and", "another", "any", "anyhow", "anyone", "anything", "anyway", "anywhere", "are",
    "around", "as", "at", "back", "be", "became", "because", "become", "becomes", "becoming",
    "been", "before", "beforehand", "behind", "being", "below", "beside", "besides", "between",
    "beyond", "both", "but", "by", "can", "cannot", "could", "do", "done", "down", "due",
    "during", "each", "eg", "either", "else", "elsewhere", "enough", "etc", "even", "ever",
    "every", "everyone", "everything", "everywhere", "except", "few", "for", "former",
    "formerly", "from", "further", "had", "has", "have", "he", "hence", "her", "here",
    "hereafter", "hereby", "herein", "hereupon", "hers", "herself", "him", "himself", "his",
    "how", "however", "ie", "if", "in", "indeed", "into", "is", "it", "its", "itself", "last",
    "latter", "latterly", "least", "less", "ltd", "many", "may", "me", "meanwhile", "might",
    "more", "moreover", "most", "mostly", "much", "must", "my", "myself", "namely", "neither",
    "never", "nevertheless", "next", "no", "nobody", "none", "noone", "nor", "not", "nothing",
    "now", "nowhere", "of", "off", "often", "on", "once", "one", "only", "onto", "or", "other",
    "others", "otherwise", "our", "ours", "ourselves", "out", "over", "own", "per", "perhaps",
    "please", "rather", "re", "same", "seem", "seemed", "seeming", "seems", "several", "she",
    "should", "since", "so", "some", "somehow", "someone", "something", "sometime",
    "sometimes", "somewhere", "still", "such", "than", "that", "the", "their", "them",
    "themselves", "then", "thence", "there", "thereafter", "thereby", "therefore", "therein",
    "thereupon", "these", "they", "this", "those", "though", "through", "throughout", "thru",
    "thus", "to", "together", "too", "toward", "towards", "under", "until", "up", "upon", "us",
    "very", "via", "was", "we", "well", "were", "what", "whatever", "when", "whence",
    "whenever", "where", "whereafter", "whereas", "whereby", "wherein", "whereupon",
    "wherever", "whether", "which", "while", "whither", "who", "whoever", "whole", "whom",
    "whose", "why", "will", "with", "within", "without", "would", "yet", "you", "your",
    "yours", "yourself", "yourselves",
];

/// Vectorizer settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TfIdfConfig {
    /// Keep at most this many terms, by corpus frequency
    pub max_features: usize,
    /// Drop terms found in fewer documents than this
    pub min_df: usize,
    /// Drop terms found in more than this fraction of documents
    pub max_df: f64,
    /// Longest n-gram (1 = unigrams only)
    pub max_ngram: usize,
}

impl TfIdfConfig {
    /// Unigram index over the whole catalog
    #[must_use]
    pub const fn catalog() -> Self {
        Self {
            max_features: hybrid::TFIDF_MAX_FEATURES,
            min_df: hybrid::TFIDF_MIN_DF,
            max_df: hybrid::TFIDF_MAX_DF,
            max_ngram: 1,
        }
    }

    /// Unigram and bigram space over a seed recipe and its candidates
    #[must_use]
    pub const fn similarity() -> Self {
        Self {
            max_features: similarity::TFIDF_MAX_FEATURES,
            min_df: 1,
            max_df: 1.0,
            max_ngram: 2,
        }
    }

    /// Override the feature cap
    #[must_use]
    pub const fn with_max_features(mut self, max_features: usize) -> Self {
        self.max_features = max_features;
        self
    }

    /// Override the document-frequency window
    #[must_use]
    pub const fn with_document_frequency(mut self, min_df: usize, max_df: f64) -> Self {
        self.min_df = min_df;
        self.max_df = max_df;
        self
    }

    /// Terms of a document: stop-word-free tokens and their n-grams
    #[must_use]
    pub fn terms(&self, text: &str) -> Vec<String> {
        let tokens = tokenize(text);
        let mut terms = tokens.clone();
        for n in 2..=self.max_ngram.max(1) {
            terms.extend(tokens.windows(n).map(|window| window.join(" ")));
        }
        terms
    }
}

/// Lower-cased tokens of two or more alphanumeric characters, without stop words
#[must_use]
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| token.chars().count() >= 2)
        .filter(|token| !ENGLISH_STOP_WORDS.contains(token))
        .map(str::to_owned)
        .collect()
}

/// Sparse, L2-normalised document vector sorted by term index
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    entries: Vec<(usize, f64)>,
}

impl SparseVector {
    fn from_weights(weights: BTreeMap<usize, f64>) -> Self {
        let norm = weights.values().map(|w| w * w).sum::<f64>().sqrt();
        if norm == 0.0 {
            return Self::default();
        }
        Self {
            entries: weights.into_iter().map(|(i, w)| (i, w / norm)).collect(),
        }
    }

    /// Whether the vector has no non-zero weight
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of non-zero weights
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Cosine similarity in [0, 1]; zero when either vector is empty
    #[must_use]
    pub fn cosine(&self, other: &Self) -> f64 {
        let (mut i, mut j) = (0, 0);
        let mut dot = 0.0;
        while let (Some(&(a_index, a)), Some(&(b_index, b))) =
            (self.entries.get(i), other.entries.get(j))
        {
            match a_index.cmp(&b_index) {
                Ordering::Less => i += 1,
                Ordering::Greater => j += 1,
                Ordering::Equal => {
                    dot += a * b;
                    i += 1;
                    j += 1;
                }
            }
        }
        dot.clamp(0.0, 1.0)
    }
}

/// Fitted vocabulary and inverse document frequencies
#[derive(Debug, Clone)]
pub struct TfIdfModel {
    config: TfIdfConfig,
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
}

impl TfIdfModel {
    /// Fit on a corpus and return the model with one vector per document
    #[must_use]
    pub fn fit_transform<S: AsRef<str> + Sync>(
        config: TfIdfConfig,
        documents: &[S],
    ) -> (Self, Vec<SparseVector>) {
        let term_lists: Vec<Vec<String>> = documents
            .par_iter()
            .map(|doc| config.terms(doc.as_ref()))
            .collect();

        let mut document_frequency: HashMap<&str, usize> = HashMap::new();
        let mut corpus_frequency: HashMap<&str, usize> = HashMap::new();
        for terms in &term_lists {
            let mut seen: Vec<&str> = Vec::with_capacity(terms.len());
            for term in terms {
                *corpus_frequency.entry(term.as_str()).or_default() += 1;
                if !seen.contains(&term.as_str()) {
                    seen.push(term.as_str());
                    *document_frequency.entry(term.as_str()).or_default() += 1;
                }
            }
        }

        let total = documents.len();
        let max_df = config.max_df * total as f64;
        let mut kept: Vec<(&str, usize)> = document_frequency
            .iter()
            .filter(|(_, df)| **df >= config.min_df && **df as f64 <= max_df)
            .map(|(term, _)| (*term, corpus_frequency.get(term).copied().unwrap_or_default()))
            .collect();
        kept.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        kept.truncate(config.max_features);

        // Index terms alphabetically so vectors are comparable across runs
        let mut terms: Vec<&str> = kept.into_iter().map(|(term, _)| term).collect();
        terms.sort_unstable();

        let vocabulary: HashMap<String, usize> = terms
            .iter()
            .enumerate()
            .map(|(index, term)| ((*term).to_owned(), index))
            .collect();
        let idf = terms
            .iter()
            .map(|term| {
                let df = document_frequency.get(term).copied().unwrap_or_default();
                ((1.0 + total as f64) / (1.0 + df as f64)).ln() + 1.0
            })
            .collect();

        let model = Self {
            config,
            vocabulary,
            idf,
        };
        let vectors = term_lists
            .par_iter()
            .map(|terms| model.vectorize(terms))
            .collect();
        (model, vectors)
    }

    /// Vector for an unseen text in the fitted space
    #[must_use]
    pub fn transform(&self, text: &str) -> SparseVector {
        self.vectorize(&self.config.terms(text))
    }

    /// Number of terms kept
    #[must_use]
    pub fn vocabulary_len(&self) -> usize {
        self.vocabulary.len()
    }

    fn vectorize(&self, terms: &[String]) -> SparseVector {
        let mut weights: BTreeMap<usize, f64> = BTreeMap::new();
        for term in terms {
            if let Some(&index) = self.vocabulary.get(term) {
                *weights.entry(index).or_default() += 1.0;
            }
        }
        for (index, weight) in &mut weights {
            *weight *= self.idf.get(*index).copied().unwrap_or(1.0);
        }
        SparseVector::from_weights(weights)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_drops_stop_words_and_short_tokens() {
        assert_eq!(
            tokenize("The Chicken with a 2 Garlic-Butter sauce!"),
            vec!["chicken", "garlic", "butter", "sauce"]
        );
    }

    #[test]
    fn test_bigrams_follow_filtered_tokens() {
        let terms = TfIdfConfig::similarity().terms("garlic and butter");
        assert_eq!(terms, vec!["garlic", "butter", "garlic butter"]);
    }

    #[test]
    fn test_identical_documents_have_unit_cosine() {
        let docs = ["chicken curry rice", "chicken curry rice", "chocolate cake"];
        let (_, vectors) = TfIdfModel::fit_transform(TfIdfConfig::similarity(), &docs);
        assert!((vectors[0].cosine(&vectors[1]) - 1.0).abs() < 1e-9);
        assert!(vectors[0].cosine(&vectors[2]).abs() < f64::EPSILON);
    }

    #[test]
    fn test_document_frequency_window() {
        let docs = ["salt beef", "salt pork", "salt fish", "salt lamb"];
        let config = TfIdfConfig::similarity().with_document_frequency(1, 0.5);
        let (model, _) = TfIdfModel::fit_transform(config, &docs);
        // "salt" appears everywhere and is dropped
        assert!(model.transform("salt").is_empty());
        assert!(!model.transform("beef").is_empty());
    }

    #[test]
    fn test_max_features_keeps_most_frequent() {
        let docs = ["basil basil basil", "basil thyme", "mint"];
        let config = TfIdfConfig::similarity().with_max_features(1);
        let (model, _) = TfIdfModel::fit_transform(config, &docs);
        assert_eq!(model.vocabulary_len(), 1);
        assert!(!model.transform("basil").is_empty());
    }

    #[test]
    fn test_query_transform_scores_related_document_higher() {
        let docs = [
            "spicy chicken curry",
            "chicken noodle soup",
            "chocolate chip cookies",
        ];
        let (model, vectors) = TfIdfModel::fit_transform(TfIdfConfig::similarity(), &docs);
        let query = model.transform("chicken curry");
        assert!(query.cosine(&vectors[0]) > query.cosine(&vectors[1]));
        assert!(query.cosine(&vectors[2]).abs() < f64::EPSILON);
    }
}
