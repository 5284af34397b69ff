// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

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

mod error;
mod lifecycle;
mod types;
mod validation;
mod version;

#[cfg(test)]
mod tests;

pub use error::DomainError;
pub use lifecycle::LifecycleState;
pub use types::{Case, CaseId, CaseKey, Permission, SharePointDirectory, present};
pub use validation::{validate_case_key, validate_share_point_directory};
pub use version::VersionToken;
