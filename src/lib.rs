// ABOUTME: Main library entry point for the Recipe Buddy search server
// ABOUTME: Wires configuration, storage, caching, and HTTP routes around the recipe engine
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Recipe Buddy
//!
//! A natural-language recipe search service. Free-text queries such as
//! "high protein breakfast without eggs" are parsed into structured
//! constraints and ranked against a recipe catalog.
//!
//! ## Architecture
//!
//! - **Engine** (`recipe-intelligence`): parser, match strategies, similarity, meal planner
//! - **Storage**: a JSON catalog held in memory (scan mode) or a `SQLite`
//!   database queried with filters (indexed mode)
//! - **HTTP**: axum routes over a shared [`resources::ServerResources`] container
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use recipe_buddy::config::ServerConfig;
//! use recipe_buddy::resources::ServerResources;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::from_env()?;
//!     let resources = Arc::new(ServerResources::from_config(config).await?);
//!     recipe_buddy::server::run(resources).await
//! }
//! ```

/// Response caching
pub mod cache;

/// Environment configuration
pub mod config;

/// JSON catalog loading and normalization
pub mod data_loader;

/// `SQLite` recipe store for indexed mode
pub mod database;

/// Error types shared with the engine
pub mod errors;

/// Tracing subscriber setup
pub mod logging;

/// Shared server resources (dependency container)
pub mod resources;

/// HTTP routes
pub mod routes;

/// Server bootstrap and middleware
pub mod server;

/// Vocabulary-based spelling correction
pub mod spelling;
