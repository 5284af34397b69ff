// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::{create_test_case, create_test_case_in};
use crate::{CaseChange, CaseStore, ChangeKind, InMemoryCaseStore, StoreError};
use case_survey_domain::{Case, CaseId, CaseKey, LifecycleState, VersionToken};

// ============================================================================
// Reads
// ============================================================================

#[tokio::test]
async fn test_get_returns_none_for_unknown_case() {
    let store: InMemoryCaseStore = InMemoryCaseStore::new();

    let found = store
        .get_by_id_and_key(&CaseId::new("missing"), &CaseKey::new("C-0"))
        .await
        .unwrap();

    assert!(found.is_none());
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_get_requires_both_id_and_key() {
    let store: InMemoryCaseStore = InMemoryCaseStore::new();
    store.insert(create_test_case("case-1", "C-100")).await.unwrap();

    let wrong_key = store
        .get_by_id_and_key(&CaseId::new("case-1"), &CaseKey::new("C-999"))
        .await
        .unwrap();
    let trimmed_key = store
        .get_by_id_and_key(&CaseId::new("case-1"), &CaseKey::new("  C-100 "))
        .await
        .unwrap();

    assert!(wrong_key.is_none());
    assert!(trimmed_key.is_some());
}

#[tokio::test]
async fn test_current_version_token_matches_stored_case() {
    let store: InMemoryCaseStore = InMemoryCaseStore::new();
    let stored: Case = store.insert(create_test_case("case-1", "C-100")).await.unwrap();

    let token: Option<VersionToken> = store
        .current_version_token(&stored.id, &stored.key)
        .await
        .unwrap();

    assert_eq!(token, stored.version_token);
}

// ============================================================================
// Writes
// ============================================================================

#[tokio::test]
async fn test_insert_assigns_version_token() {
    let store: InMemoryCaseStore = InMemoryCaseStore::new();

    let stored: Case = store.insert(create_test_case("case-1", "C-100")).await.unwrap();

    let token: &VersionToken = stored.version_token.as_ref().unwrap();
    assert!(token.is_assigned());
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn test_insert_rejects_duplicate() {
    let store: InMemoryCaseStore = InMemoryCaseStore::new();
    store.insert(create_test_case("case-1", "C-100")).await.unwrap();

    let result = store.insert(create_test_case("case-1", "C-100")).await;

    assert!(matches!(result, Err(StoreError::CaseAlreadyExists { .. })));
}

#[tokio::test]
async fn test_insert_rejects_blank_key() {
    let store: InMemoryCaseStore = InMemoryCaseStore::new();

    let result = store.insert(create_test_case("case-1", "   ")).await;

    assert!(matches!(result, Err(StoreError::InvalidCase(_))));
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_replace_with_current_token_issues_newer_token() {
    let store: InMemoryCaseStore = InMemoryCaseStore::new();
    let stored: Case = store.insert(create_test_case("case-1", "C-100")).await.unwrap();
    let before: VersionToken = stored.version_token.clone().unwrap();

    let mut changed: Case = stored.clone();
    changed.lifecycle_state = LifecycleState::SurveyOpened;
    let replaced: Case = store.replace(changed, Some(&before)).await.unwrap();

    let after: VersionToken = replaced.version_token.clone().unwrap();
    assert!(after.timestamp > before.timestamp);
    assert_ne!(after.etag, before.etag);
    assert_eq!(replaced.lifecycle_state, LifecycleState::SurveyOpened);
}

#[tokio::test]
async fn test_replace_with_stale_token_conflicts() {
    let store: InMemoryCaseStore = InMemoryCaseStore::new();
    let stored: Case = store.insert(create_test_case("case-1", "C-100")).await.unwrap();
    let first: VersionToken = stored.version_token.clone().unwrap();
    store.replace(stored.clone(), Some(&first)).await.unwrap();

    let result = store.replace(stored, Some(&first)).await;

    match result {
        Err(StoreError::VersionConflict {
            expected, found, ..
        }) => {
            assert_eq!(expected, Some(first));
            assert!(found.is_some());
            assert_ne!(expected, found);
        }
        other => panic!("Expected version conflict, got {other:?}"),
    }
}

#[tokio::test]
async fn test_replace_without_token_conflicts_with_stored_case() {
    let store: InMemoryCaseStore = InMemoryCaseStore::new();
    store.insert(create_test_case("case-1", "C-100")).await.unwrap();

    let result = store.replace(create_test_case("case-1", "C-100"), None).await;

    assert!(matches!(result, Err(StoreError::VersionConflict { .. })));
}

#[tokio::test]
async fn test_replace_unknown_case_is_not_found() {
    let store: InMemoryCaseStore = InMemoryCaseStore::new();

    let result = store.replace(create_test_case("case-1", "C-100"), None).await;

    assert!(matches!(result, Err(StoreError::CaseNotFound { .. })));
}

#[tokio::test]
async fn test_seed_inserts_every_case() {
    let store: InMemoryCaseStore = InMemoryCaseStore::new();

    let count: usize = store
        .seed(vec![
            create_test_case("case-1", "C-100"),
            create_test_case("case-2", "C-200"),
        ])
        .await
        .unwrap();

    assert_eq!(count, 2);
    assert_eq!(store.len().await, 2);
}

// ============================================================================
// Change feed
// ============================================================================

#[tokio::test]
async fn test_subscribers_receive_committed_writes() {
    let store: InMemoryCaseStore = InMemoryCaseStore::new();
    let mut rx = store.subscribe();

    let stored: Case = store
        .insert(create_test_case_in(LifecycleState::New))
        .await
        .unwrap();
    let token: VersionToken = stored.version_token.clone().unwrap();
    store.replace(stored.clone(), Some(&token)).await.unwrap();

    let inserted: CaseChange = rx.recv().await.unwrap();
    let replaced: CaseChange = rx.recv().await.unwrap();
    assert_eq!(inserted.kind, ChangeKind::Inserted);
    assert_eq!(inserted.case, stored);
    assert_eq!(replaced.kind, ChangeKind::Replaced);
}

#[tokio::test]
async fn test_failed_write_is_not_published() {
    let store: InMemoryCaseStore = InMemoryCaseStore::new();
    store.insert(create_test_case("case-1", "C-100")).await.unwrap();
    let mut rx = store.subscribe();

    let _ = store.replace(create_test_case("case-1", "C-100"), None).await;

    assert!(rx.try_recv().is_err());
}

#[test]
fn test_conflict_message_names_both_tokens() {
    let error = StoreError::VersionConflict {
        id: CaseId::new("case-1"),
        key: CaseKey::new("C-100"),
        expected: Some(VersionToken::new(1, "a")),
        found: None,
    };

    assert_eq!(
        error.to_string(),
        "Version conflict for case id=case-1, key=C-100: expected a@1, found none"
    );
}
