// ABOUTME: Spelling corrector seam consumed by the query parser
// ABOUTME: Implementations map raw text to corrected text plus the word pairs that changed
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use recipe_core::models::SpellingCorrection;

/// Result of correcting a query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Correction {
    /// Corrected text
    pub text: String,
    /// Words that changed, in text order
    pub corrections: Vec<SpellingCorrection>,
}

impl Correction {
    /// A correction that leaves the text untouched
    #[must_use]
    pub fn unchanged(text: &str) -> Self {
        Self {
            text: text.to_owned(),
            corrections: Vec::new(),
        }
    }
}

/// Maps raw query text to corrected text
pub trait SpellingCorrector: Send + Sync {
    /// Correct a query
    fn correct(&self, text: &str) -> Correction;
}

/// Corrector used when spell checking is disabled
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCorrector;

impl SpellingCorrector for NoopCorrector {
    fn correct(&self, text: &str) -> Correction {
        Correction::unchanged(text)
    }
}
