// ABOUTME: Configuration module for the Recipe Buddy server
// ABOUTME: Environment-only configuration with typed sub-configs per concern
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Configuration is read once at startup from environment variables and then
//! shared read-only through [`crate::resources::ServerResources`].

/// Environment and server configuration
pub mod environment;

pub use environment::{
    BackendMode, CacheSettings, HybridConfig, SearchConfig, ServerConfig, TfIdfSettings,
};
