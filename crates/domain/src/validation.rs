// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::types::{CaseKey, SharePointDirectory};

/// Validates that a Case key is usable as a business code.
///
/// # Errors
///
/// Returns `DomainError::InvalidCaseKey` if the key is empty after trimming.
pub fn validate_case_key(key: &CaseKey) -> Result<(), DomainError> {
    if key.value().is_empty() {
        return Err(DomainError::InvalidCaseKey(String::from(
            "Case key cannot be empty",
        )));
    }
    Ok(())
}

/// Validates that both identifiers of a SharePoint directory are set.
///
/// # Errors
///
/// Returns `DomainError::InvalidSharePointDirectory` naming the first empty
/// identifier.
pub fn validate_share_point_directory(directory: &SharePointDirectory) -> Result<(), DomainError> {
    if directory.directory_id.trim().is_empty() {
        return Err(DomainError::InvalidSharePointDirectory(String::from(
            "directory id cannot be empty",
        )));
    }

    if directory.drive_id.trim().is_empty() {
        return Err(DomainError::InvalidSharePointDirectory(String::from(
            "drive id cannot be empty",
        )));
    }

    Ok(())
}
