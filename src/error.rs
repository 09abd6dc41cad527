// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Brushforge Inc.

//! Library error types

use thiserror::Error;

/// Fatal errors of the generation pipeline.
///
/// Everything recoverable (unrepairable rings, skipped footprints, cap
/// truncation, export invariant violations in non-strict mode) is collected
/// as warnings in the [`ValidationReport`](crate::validation::ValidationReport)
/// instead of surfacing here.
#[derive(Debug, Error)]
pub enum Error {
    /// The bounding box is malformed or degenerate (zero area).
    #[error("invalid bounding box: {0}")]
    InvalidBoundingBox(String),

    /// The bounding box lies outside the supported projection domain.
    #[error("unsupported region: {0}")]
    UnsupportedRegion(String),

    /// A configuration field failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Strict mode only: the validator found export invariant violations.
    #[error("strict validation failed: {violations} invariant violation(s) across {solids} solid(s)")]
    StrictValidation { violations: usize, solids: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
