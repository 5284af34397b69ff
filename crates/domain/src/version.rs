// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::{Deserialize, Serialize};

/// Optimistic-concurrency marker assigned by the store on every write.
///
/// The token is never interpreted, only compared. Two tokens are equal only
/// when both the logical timestamp and the opacity tag match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionToken {
    /// Logical write timestamp.
    pub timestamp: i64,
    /// Opaque entity tag.
    pub etag: String,
}

impl VersionToken {
    /// Creates a new `VersionToken`.
    #[must_use]
    pub fn new(timestamp: i64, etag: &str) -> Self {
        Self {
            timestamp,
            etag: etag.to_string(),
        }
    }

    /// Returns true if the token was issued by a store write.
    ///
    /// A snapshot that was never persisted carries a zero timestamp or an
    /// empty tag.
    #[must_use]
    pub fn is_assigned(&self) -> bool {
        self.timestamp != 0 && !self.etag.trim().is_empty()
    }
}

impl std::fmt::Display for VersionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.etag, self.timestamp)
    }
}
