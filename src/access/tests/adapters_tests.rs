//! Unit tests for the in-memory store adapters.

use crate::access::adapters::memory::{InMemoryIssueStore, InMemoryUserStore};
use crate::access::domain::{
    DepartmentScope, IssueDetails, IssueId, IssueStatus, NewIssue, Role, User, UserId,
};
use crate::access::ports::{IssueStore, IssueStoreError, UserStore};
use crate::access::tests::fixtures::fixed_time;
use rstest::rstest;

fn account(id: u64, username: &str, role: Role) -> User {
    User::new(
        UserId::new(id),
        username,
        "argon2-hash",
        role,
        DepartmentScope::unrestricted(),
        DepartmentScope::unrestricted(),
    )
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn issue_store_assigns_sequential_identifiers() {
    let store = InMemoryIssueStore::new();
    for n in 1..=3 {
        let created = store
            .create(NewIssue {
                title: format!("Issue {n}"),
                status: IssueStatus::Open,
                department: None,
                details: IssueDetails::default(),
                created_at: fixed_time(),
            })
            .await
            .expect("creation should succeed");
        assert_eq!(created.id, IssueId::new(n));
        assert_eq!(created.updated_at, created.created_at);
    }

    let listed = store.list().await.expect("listing should succeed");
    assert_eq!(listed.len(), 3);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn issue_store_rejects_updates_to_unknown_records() {
    let store = InMemoryIssueStore::new();
    let created = store
        .create(NewIssue {
            title: "Ephemeral".to_owned(),
            status: IssueStatus::Open,
            department: None,
            details: IssueDetails::default(),
            created_at: fixed_time(),
        })
        .await
        .expect("creation should succeed");
    store
        .delete(created.id)
        .await
        .expect("delete should succeed");

    let result = store.update(&created).await;
    assert!(matches!(result, Err(IssueStoreError::NotFound(id)) if id == created.id));
    let missing = store.delete(created.id).await;
    assert!(matches!(missing, Err(IssueStoreError::NotFound(_))));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn user_store_finds_accounts_by_username() {
    let store = InMemoryUserStore::new();
    store
        .insert(account(2, "editor", Role::Editor))
        .expect("insert should succeed");
    store
        .insert(account(1, "admin", Role::Administrator))
        .expect("insert should succeed");

    let found = store
        .get_by_username("editor")
        .await
        .expect("lookup should succeed")
        .expect("account should exist");
    assert_eq!(found.role(), Role::Editor);

    let missing = store
        .get_by_username("ghost")
        .await
        .expect("lookup should succeed");
    assert!(missing.is_none());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn user_store_lists_in_identifier_order() {
    let store = InMemoryUserStore::new();
    store
        .insert(account(3, "viewer", Role::Viewer))
        .expect("insert should succeed");
    store
        .insert(account(1, "admin", Role::Administrator))
        .expect("insert should succeed");

    let listed = store.list().await.expect("listing should succeed");
    let names: Vec<&str> = listed.iter().map(User::username).collect();
    assert_eq!(names, vec!["admin", "viewer"]);
}
