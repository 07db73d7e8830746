// ABOUTME: Ordered, versioned negation rule list for exclusion extraction
// ABOUTME: Each rule pairs a capture pattern with a resolver from phrase to curated ingredients
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Negation rules are evaluated in list order, most specific first. A match whose
//! captured phrase overlaps a phrase already claimed by an earlier rule is ignored,
//! so a generic rule such as `no X` never re-interprets text that `but no X` or
//! `doesn't have X` already handled.
//!
//! Changing the list (order, patterns, or resolvers) changes parse results and
//! must bump [`NEGATION_RULES_VERSION`].

use crate::vocabulary::{is_stop_word, resolve_ingredients};
use recipe_core::errors::{AppError, AppResult};
use regex::Regex;
use std::ops::Range;

/// Version of [`NEGATION_RULES`]
pub const NEGATION_RULES_VERSION: u32 = 1;

/// Maps a negated phrase to curated ingredient names
pub type PhraseResolver = fn(&str) -> Vec<&'static str>;

/// One negation rule before compilation
#[derive(Debug, Clone, Copy)]
pub struct NegationRuleSpec {
    /// Stable rule name
    pub name: &'static str,
    /// Pattern whose first capture group is the negated phrase
    pub pattern: &'static str,
    /// Resolver applied to the captured phrase
    pub resolve: PhraseResolver,
}

// Captures up to two words following the negation prefix
macro_rules! rule {
    ($name:literal, $prefix:literal) => {
        NegationRuleSpec {
            name: $name,
            pattern: concat!($prefix, r"(\w+(?:\s+\w+)?)"),
            resolve: resolve_ingredients,
        }
    };
}

/// The negation rule list, in evaluation order
pub const NEGATION_RULES: &[NegationRuleSpec] = &[
    rule!(
        "does_not_have",
        r"(?:doesn'?t|does\s*not|dont)\s+(?:have|include|contain|want|use|need)\s+"
    ),
    rule!("do_not_want", r"(?:don'?t|do\s*not)\s+(?:want|use|add|include|need)\s+"),
    rule!("but_no", r"(?:but|and)\s+no\s+"),
    rule!("without", r"without\s+"),
    rule!("no", r"\bno\s+"),
    rule!("avoid", r"avoid(?:ing)?\s+"),
    rule!("exclude", r"exclud(?:e|ing)\s+"),
    NegationRuleSpec {
        name: "free_suffix",
        pattern: r"(\w+)[\s-]free\b",
        resolve: resolve_ingredients,
    },
    rule!("skip", r"skip(?:ping)?\s+"),
    rule!("hold", r"hold\s+(?:the\s+)?"),
    rule!("minus", r"minus\s+"),
    rule!("leave_out", r"leave\s+out\s+"),
    rule!("not_any", r"not?\s+(?:any|the)\s+"),
];

struct CompiledRule {
    name: &'static str,
    regex: Regex,
    resolve: PhraseResolver,
}

/// A negated phrase found in a query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NegatedPhrase {
    /// Rule that captured the phrase
    pub rule: &'static str,
    /// Captured phrase, trimmed and lower-cased
    pub phrase: String,
    /// Ingredients the phrase resolved to
    pub ingredients: Vec<&'static str>,
}

/// Compiled negation rules
pub struct NegationRules {
    rules: Vec<CompiledRule>,
}

impl NegationRules {
    /// Compile [`NEGATION_RULES`]
    ///
    /// # Errors
    ///
    /// Returns an internal error if a pattern fails to compile
    pub fn compile() -> AppResult<Self> {
        Self::from_specs(NEGATION_RULES)
    }

    /// Compile a custom rule list
    ///
    /// # Errors
    ///
    /// Returns an internal error if a pattern fails to compile
    pub fn from_specs(specs: &[NegationRuleSpec]) -> AppResult<Self> {
        let rules = specs
            .iter()
            .map(|spec| {
                Regex::new(&format!("(?i){}", spec.pattern))
                    .map(|regex| CompiledRule {
                        name: spec.name,
                        regex,
                        resolve: spec.resolve,
                    })
                    .map_err(|e| {
                        AppError::internal(format!(
                            "Invalid negation pattern '{}': {e}",
                            spec.name
                        ))
                    })
            })
            .collect::<AppResult<Vec<_>>>()?;
        Ok(Self { rules })
    }

    /// Rule names in evaluation order
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.iter().map(|rule| rule.name)
    }

    /// Negated phrases in rule order, skipping captures that overlap an earlier claim
    #[must_use]
    pub fn negated_phrases(&self, text: &str) -> Vec<NegatedPhrase> {
        let mut claimed: Vec<Range<usize>> = Vec::new();
        let mut phrases = Vec::new();

        for rule in &self.rules {
            for captures in rule.regex.captures_iter(text) {
                let Some(capture) = captures.get(1) else {
                    continue;
                };
                let span = capture.range();
                if claimed.iter().any(|c| c.start < span.end && span.start < c.end) {
                    continue;
                }
                claimed.push(span);

                let phrase = capture.as_str().trim().to_lowercase();
                if !is_resolvable(&phrase) {
                    continue;
                }
                let ingredients = (rule.resolve)(&phrase);
                phrases.push(NegatedPhrase {
                    rule: rule.name,
                    phrase,
                    ingredients,
                });
            }
        }
        phrases
    }

    /// Excluded ingredients, deduplicated in first-seen order and uncapped
    #[must_use]
    pub fn excluded_ingredients(&self, text: &str) -> Vec<String> {
        let mut excluded: Vec<String> = Vec::new();
        for negated in self.negated_phrases(text) {
            for ingredient in negated.ingredients {
                if !excluded.iter().any(|e| e == ingredient) {
                    excluded.push(ingredient.to_owned());
                }
            }
        }
        excluded
    }
}

/// Stop words, very short words, and numbers never resolve
fn is_resolvable(phrase: &str) -> bool {
    phrase.chars().count() > 2
        && !phrase.chars().all(|c| c.is_ascii_digit() || c.is_whitespace())
        && !is_stop_word(phrase)
}
