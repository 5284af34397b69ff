// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Rule-based validation of typed payloads.
//!
//! A [`Validator`] is an immutable list of rules plus nested child validators.
//! Each rule is bound to one field path and carries a [`Severity`]. Rules may
//! be asynchronous and read external state through a per-invocation
//! [`RuleContext`]; the validator itself holds no per-invocation state and can
//! be shared across concurrent validations.
//!
//! Before any rule runs, the validator collects the lookup keys every rule
//! (including nested ones) will need, deduplicates them, and hands them to the
//! context in a single [`RuleContext::prefetch`] call.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod outcome;
mod rule;
mod validator;

#[cfg(test)]
mod tests;

pub use outcome::{Outcome, RuleFailure, Severity, ValidationReport};
pub use rule::{Check, Rule, RuleContext};
pub use validator::Validator;
