// ABOUTME: Error types for the Recipe Buddy server, re-exported from recipe-core
// ABOUTME: Keeps crate::errors paths stable for route handlers and services
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Unified Error Handling
//!
//! The error taxonomy lives in `recipe-core` so the engine and the server share
//! one [`AppError`]. With the `http-response` feature enabled, `AppError`
//! implements `axum::response::IntoResponse`.

pub use recipe_core::errors::{
    AppError, AppResult, ErrorCode, ErrorContext, ErrorResponse, ErrorResponseDetails,
};
