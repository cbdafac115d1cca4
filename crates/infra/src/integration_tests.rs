//! End-to-end scenarios over the in-memory stores.
//!
//! Guard → Resolver → PermissionStore, and Recorder → AuditStore, wired the
//! same way `Services` wires them in production.

use std::collections::HashSet;
use std::sync::Arc;

use serde_json::json;

use bastion_audit::{AuditError, AuditOperation, PageRequest};
use bastion_auth::{AuthzError, Group, Permission, PermissionStore, Role};
use bastion_core::{DomainError, UserId};

use crate::Services;
use crate::audit_store::InMemoryAuditStore;
use crate::permission_store::InMemoryPermissionStore;

fn init_logging() {
    bastion_observability::init_with(bastion_observability::LogFormat::Pretty);
}

/// `reader-writer` holds R1 (`users:read`) and R2 (`users:write` plus a
/// redundant `users:read`).
fn seed_two_roles(store: &InMemoryPermissionStore) -> UserId {
    let group = store.create_group(Group::new("staff")).unwrap();
    let read = store
        .create_permission(Permission::new("users.read", "users", "read"))
        .unwrap();
    let write = store
        .create_permission(Permission::new("users.write", "users", "write"))
        .unwrap();

    let r1 = store.create_role(Role::new("R1", group.id)).unwrap();
    let r2 = store.create_role(Role::new("R2", group.id)).unwrap();
    store.grant_permission(r1.id, read.id).unwrap();
    store.grant_permission(r2.id, write.id).unwrap();
    store.grant_permission(r2.id, read.id).unwrap();

    let user = UserId::new("reader-writer");
    store.assign_role(user.clone(), r1.id).unwrap();
    store.assign_role(user.clone(), r2.id).unwrap();
    user
}

#[tokio::test]
async fn overlapping_roles_resolve_to_distinct_permissions() {
    init_logging();
    let (services, seed) = Services::in_memory();
    let user = seed_two_roles(&seed);

    // The raw store returns one row per grant path.
    assert_eq!(seed.user_permissions(&user).await.unwrap().len(), 3);

    let resolver = services.guard.resolver();
    let keys: HashSet<String> = resolver
        .user_permissions(&user)
        .await
        .unwrap()
        .iter()
        .map(Permission::key)
        .collect();
    assert_eq!(
        keys,
        HashSet::from(["users:read".to_string(), "users:write".to_string()])
    );
    assert_eq!(resolver.user_permissions(&user).await.unwrap().len(), 2);

    assert!(resolver.has_permission(&user, "users", "read").await.unwrap());
    assert!(!resolver.has_permission(&user, "users", "delete").await.unwrap());
}

#[tokio::test]
async fn denial_is_generic() {
    let (services, _seed) = Services::in_memory();
    let actor = UserId::new("actor-without-roles");

    let err = services
        .guard
        .require(&actor, "users", "write")
        .await
        .unwrap_err();

    assert_eq!(err, AuthzError::Forbidden);
    let message = err.to_string();
    assert_eq!(message, "Forbidden");
    assert!(!message.contains("users"));
    assert!(!message.contains("write"));
    assert!(!message.contains(actor.as_str()));
}

#[tokio::test]
async fn log_create_records_new_state_only() {
    let (services, _seed) = Services::in_memory();

    let record = services
        .recorder
        .log_create("user", "u-1", "actor-1", json!({"email": "a@b.com"}), None)
        .await
        .unwrap();

    assert_eq!(record.operation, AuditOperation::Create);
    assert_eq!(record.operation.as_str(), "CREATE");
    assert_eq!(record.old_values, None);
    assert_eq!(record.new_values, Some(json!({"email": "a@b.com"})));

    let stored = services.trail.find_by_id(record.id).await.unwrap();
    assert_eq!(stored, Some(record));
}

#[tokio::test]
async fn blank_entity_id_is_rejected_before_append() {
    let store = Arc::new(InMemoryAuditStore::new());
    let services = Services::new(Arc::new(InMemoryPermissionStore::new()), store.clone());

    let err = services
        .recorder
        .log_update(
            "user",
            "   ",
            "actor-1",
            json!({"email": "old@b.com"}),
            json!({"email": "new@b.com"}),
            None,
        )
        .await
        .unwrap_err();

    assert!(matches!(err, AuditError::Validation(DomainError::Validation(_))));
    assert!(store.is_empty());
}

#[tokio::test]
async fn concurrent_updates_from_different_actors_are_both_kept() {
    let (services, _seed) = Services::in_memory();
    let recorder = &services.recorder;

    let (a, b) = tokio::join!(
        recorder.log_update(
            "user",
            "u-1",
            "actor-a",
            json!({"name": "before-a"}),
            json!({"name": "after-a"}),
            None,
        ),
        recorder.log_update(
            "user",
            "u-1",
            "actor-b",
            json!({"name": "before-b"}),
            json!({"name": "after-b"}),
            None,
        ),
    );
    let (a, b) = (a.unwrap(), b.unwrap());
    assert_ne!(a.id, b.id);

    let history = services.trail.find_by_entity("user", "u-1").await.unwrap();
    assert_eq!(history.len(), 2);

    for (actor, before, after) in [
        ("actor-a", "before-a", "after-a"),
        ("actor-b", "before-b", "after-b"),
    ] {
        let record = history
            .iter()
            .find(|r| r.actor_id.as_deref() == Some(actor))
            .unwrap();
        assert_eq!(record.old_values, Some(json!({"name": before})));
        assert_eq!(record.new_values, Some(json!({"name": after})));
    }
}

#[tokio::test]
async fn find_all_never_exceeds_the_page_ceiling() {
    let (services, _seed) = Services::in_memory();
    for i in 0..1_500 {
        services
            .recorder
            .log_read("report", &format!("r-{i}"), "auditor", None)
            .await
            .unwrap();
    }

    let page = services
        .trail
        .find_all(PageRequest::new(Some(100_000), Some(0)))
        .await
        .unwrap();
    assert_eq!(page.len(), PageRequest::MAX_LIMIT as usize);

    let rest = services
        .trail
        .find_all(PageRequest::new(Some(100_000), Some(1_000)))
        .await
        .unwrap();
    assert_eq!(rest.len(), 500);
}

#[tokio::test]
async fn soft_deleting_a_group_revokes_its_grants() {
    init_logging();
    let (services, seed) = Services::in_memory();
    let group = seed.create_group(Group::new("ops")).unwrap();
    let role = seed.create_role(Role::new("deployer", group.id)).unwrap();
    let deploy = seed
        .create_permission(Permission::new("deploy.run", "deploy", "run"))
        .unwrap();
    seed.grant_permission(role.id, deploy.id).unwrap();
    let user = UserId::new("ops-1");
    seed.assign_role(user.clone(), role.id).unwrap();

    assert!(services.guard.require(&user, "deploy", "run").await.is_ok());

    seed.soft_delete_group(group.id).unwrap();
    assert!(!services.guard.check(&user, "deploy", "run").await);
    assert!(services.guard.user_permissions(&user).await.is_empty());
}
