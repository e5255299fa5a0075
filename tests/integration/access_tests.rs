//! Integration tests for user records and screen access.

use crate::mock_ports::RecordingStore;

use growsync::access::{self, ACCESS_DENIED_MESSAGE, Access, Role, Screen};
use growsync::app::ports::{RealtimeStore, StoreError};
use serde_json::json;

#[test]
fn new_account_is_a_plain_user() {
    let mut store = RecordingStore::new();
    let record = access::register_user(&mut store, "users", "u1", "grower@example.com").unwrap();

    assert_eq!(record.role, Role::User);
    assert_eq!(
        store.read("users/u1").unwrap(),
        Some(json!({"email": "grower@example.com", "role": "user"}))
    );
    assert_eq!(access::resolve_role(&store, "users", "u1"), Role::User);
    assert_eq!(
        access::check_access(Screen::IrrigationControl.allowed_roles(), Role::User),
        Access::Deny(ACCESS_DENIED_MESSAGE)
    );
}

#[test]
fn promoted_admin_reaches_irrigation_control() {
    let mut store = RecordingStore::new();
    access::register_user(&mut store, "users", "u2", "owner@example.com").unwrap();
    store.write("users/u2/role", json!("admin")).unwrap();

    let role = access::resolve_role(&store, "users", "u2");
    assert_eq!(role, Role::Admin);
    for screen in [Screen::Dashboard, Screen::IrrigationControl, Screen::Graph, Screen::Settings] {
        assert_eq!(access::check_access(screen.allowed_roles(), role), Access::Allow);
    }
}

#[test]
fn unknown_or_missing_roles_fall_back_to_user() {
    let mut store = RecordingStore::new();
    store.write("users/u3/role", json!("superuser")).unwrap();
    assert_eq!(access::resolve_role(&store, "users", "u3"), Role::User);
    assert_eq!(access::resolve_role(&store, "users", "nobody"), Role::User);
}

#[test]
fn registration_surfaces_store_failure() {
    let mut store = RecordingStore::new();
    store.fail_writes = Some(StoreError::PermissionDenied);
    assert_eq!(
        access::register_user(&mut store, "users", "u4", "x@example.com"),
        Err(StoreError::PermissionDenied)
    );
}
