// ABOUTME: Database module for the Recipe Buddy server
// ABOUTME: SQLite-backed recipe store used in indexed mode
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Database Management
//!
//! Indexed mode keeps the catalog in SQLite and pushes the hard filters of a
//! query down into SQL. Connections are borrowed from the pool per call.

/// SQLite recipe store
pub mod recipes;

pub use recipes::SqliteRecipeStore;
