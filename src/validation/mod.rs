// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Brushforge Inc.

//! Validation: post-export solid checks and the run report

pub mod report;
mod validator;

pub use report::{Counts, SolidVerdict, ValidationReport, Warning};
pub use validator::validate;
