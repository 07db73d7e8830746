// ABOUTME: Nutrient identifiers, per-recipe nutrition records, and nutrient bounds
// ABOUTME: Defines how missing nutrition data is treated by hard filters
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Nutrients tracked for every recipe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Nutrient {
    /// Energy in kcal
    Calories,
    /// Protein in grams
    Protein,
    /// Fat in grams
    Fat,
    /// Sodium in milligrams
    Sodium,
    /// Sugar in grams
    Sugar,
    /// Saturated fat in grams
    Saturates,
}

impl Nutrient {
    /// Every nutrient, in storage column order
    pub const ALL: [Self; 6] = [
        Self::Calories,
        Self::Protein,
        Self::Fat,
        Self::Sodium,
        Self::Sugar,
        Self::Saturates,
    ];

    /// Convert to the column / wire name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Calories => "calories",
            Self::Protein => "protein",
            Self::Fat => "fat",
            Self::Sodium => "sodium",
            Self::Sugar => "sugar",
            Self::Saturates => "saturates",
        }
    }

    /// Parse a wire name; nutrients have no sensible fallback so unknown names yield `None`
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "calories" => Some(Self::Calories),
            "protein" => Some(Self::Protein),
            "fat" => Some(Self::Fat),
            "sodium" => Some(Self::Sodium),
            "sugar" => Some(Self::Sugar),
            "saturates" => Some(Self::Saturates),
            _ => None,
        }
    }
}

impl fmt::Display for Nutrient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Nutrition record of a recipe; `None` means the catalog had no value
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Nutrition {
    /// Energy in kcal
    pub calories: Option<f64>,
    /// Protein in grams
    pub protein: Option<f64>,
    /// Fat in grams
    pub fat: Option<f64>,
    /// Sodium in milligrams
    pub sodium: Option<f64>,
    /// Sugar in grams
    pub sugar: Option<f64>,
    /// Saturated fat in grams
    pub saturates: Option<f64>,
}

impl Nutrition {
    /// Read one nutrient
    #[must_use]
    pub const fn get(&self, nutrient: Nutrient) -> Option<f64> {
        match nutrient {
            Nutrient::Calories => self.calories,
            Nutrient::Protein => self.protein,
            Nutrient::Fat => self.fat,
            Nutrient::Sodium => self.sodium,
            Nutrient::Sugar => self.sugar,
            Nutrient::Saturates => self.saturates,
        }
    }

    /// Set one nutrient
    #[must_use]
    pub fn with(mut self, nutrient: Nutrient, value: f64) -> Self {
        match nutrient {
            Nutrient::Calories => self.calories = Some(value),
            Nutrient::Protein => self.protein = Some(value),
            Nutrient::Fat => self.fat = Some(value),
            Nutrient::Sodium => self.sodium = Some(value),
            Nutrient::Sugar => self.sugar = Some(value),
            Nutrient::Saturates => self.saturates = Some(value),
        }
        self
    }

    /// Whether calories are known and strictly positive
    #[must_use]
    pub fn has_positive_calories(&self) -> bool {
        self.calories.is_some_and(|c| c > 0.0)
    }

    /// Snapshot with missing values reported as zero
    #[must_use]
    pub fn snapshot(&self) -> NutritionSnapshot {
        NutritionSnapshot {
            calories: self.calories.unwrap_or_default(),
            protein: self.protein.unwrap_or_default(),
            fat: self.fat.unwrap_or_default(),
            sodium: self.sodium.unwrap_or_default(),
            sugar: self.sugar.unwrap_or_default(),
            saturates: self.saturates.unwrap_or_default(),
        }
    }
}

/// Nutrition values as published to clients (missing values are zero)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NutritionSnapshot {
    /// Energy in kcal
    pub calories: f64,
    /// Protein in grams
    pub protein: f64,
    /// Fat in grams
    pub fat: f64,
    /// Sodium in milligrams
    pub sodium: f64,
    /// Sugar in grams
    pub sugar: f64,
    /// Saturated fat in grams
    pub saturates: f64,
}

/// How a hard nutrient bound treats a recipe that has no value for that nutrient
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingNutrientPolicy {
    /// Missing data cannot satisfy an explicit bound
    #[default]
    Reject,
    /// Missing data cannot be penalized
    Admit,
}

impl MissingNutrientPolicy {
    /// Convert to configuration string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Reject => "reject",
            Self::Admit => "admit",
        }
    }

    /// Parse from configuration string representation
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "admit" | "include" | "keep" => Self::Admit,
            // Default to Reject for unrecognized values
            _ => Self::Reject,
        }
    }
}

/// Inclusive lower and/or upper bound on a nutrient
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NutrientBound {
    /// Inclusive minimum
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    /// Inclusive maximum
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

impl NutrientBound {
    /// Bound with only a minimum
    #[must_use]
    pub const fn at_least(min: f64) -> Self {
        Self {
            min: Some(min),
            max: None,
        }
    }

    /// Bound with only a maximum
    #[must_use]
    pub const fn at_most(max: f64) -> Self {
        Self {
            min: None,
            max: Some(max),
        }
    }

    /// Bound with both ends
    #[must_use]
    pub const fn between(min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    /// Whether neither end is set
    #[must_use]
    pub const fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    /// Whether every set end is a finite number
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.min.is_none_or(f64::is_finite) && self.max.is_none_or(f64::is_finite)
    }

    /// Whether a recipe value satisfies the bound under the given policy
    #[must_use]
    pub fn admits(&self, value: Option<f64>, policy: MissingNutrientPolicy) -> bool {
        if self.is_unbounded() {
            return true;
        }
        let Some(value) = value else {
            return policy == MissingNutrientPolicy::Admit;
        };
        self.min.is_none_or(|min| value >= min) && self.max.is_none_or(|max| value <= max)
    }
}

/// Nutrient constraints keyed by nutrient, in a stable order
pub type NutritionConstraints = BTreeMap<Nutrient, NutrientBound>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nutrient_parse_round_trips_names() {
        for nutrient in Nutrient::ALL {
            assert_eq!(Nutrient::parse(nutrient.as_str()), Some(nutrient));
        }
        assert_eq!(Nutrient::parse("Protein "), Some(Nutrient::Protein));
        assert_eq!(Nutrient::parse("fiber"), None);
    }

    #[test]
    fn test_bound_admits_present_values() {
        let bound = NutrientBound::between(10.0, 20.0);
        assert!(bound.admits(Some(10.0), MissingNutrientPolicy::Reject));
        assert!(bound.admits(Some(20.0), MissingNutrientPolicy::Reject));
        assert!(!bound.admits(Some(9.9), MissingNutrientPolicy::Admit));
        assert!(!bound.admits(Some(20.1), MissingNutrientPolicy::Admit));
    }

    #[test]
    fn test_bound_missing_value_follows_policy() {
        let bound = NutrientBound::at_least(15.0);
        assert!(!bound.admits(None, MissingNutrientPolicy::Reject));
        assert!(bound.admits(None, MissingNutrientPolicy::Admit));
        assert!(NutrientBound::default().admits(None, MissingNutrientPolicy::Reject));
    }

    #[test]
    fn test_snapshot_defaults_missing_to_zero() {
        let nutrition = Nutrition::default().with(Nutrient::Protein, 22.5);
        let snapshot = nutrition.snapshot();
        assert!((snapshot.protein - 22.5).abs() < f64::EPSILON);
        assert!(snapshot.calories.abs() < f64::EPSILON);
        assert!(!nutrition.has_positive_calories());
    }

    #[test]
    fn test_bound_serializes_only_set_ends() {
        let json = serde_json::to_value(NutrientBound::at_least(15.0)).unwrap();
        assert_eq!(json, serde_json::json!({"min": 15.0}));
    }

    #[test]
    fn test_missing_policy_parse() {
        assert_eq!(MissingNutrientPolicy::parse("ADMIT"), MissingNutrientPolicy::Admit);
        assert_eq!(MissingNutrientPolicy::parse("whatever"), MissingNutrientPolicy::Reject);
    }
}
