// ABOUTME: Core types and constants for the Recipe Buddy search platform
// ABOUTME: Foundation crate with error handling, recipe data model, and tuning constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Recipe Core
//!
//! Foundation crate providing shared types and constants for the Recipe Buddy
//! recipe intelligence platform. This crate is designed to change infrequently,
//! enabling incremental compilation benefits in the workspace.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError` and `ErrorCode`
//! - **constants**: Scoring points, limits, and defaults organized by domain
//! - **models**: Recipes, parsed queries, search results, and meal plans

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// Application constants organized by domain
pub mod constants;

/// Core data models (Recipe, `ParsedQuery`, `ScoredMatch`, `MealPlan`, etc.)
pub mod models;
