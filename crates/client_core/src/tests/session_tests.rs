use super::*;
use std::{
    env,
    time::{SystemTime, UNIX_EPOCH},
};

use jsonwebtoken::{EncodingKey, Header};
use serde_json::json;

fn mint(claims: serde_json::Value) -> String {
    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(b"test-secret"),
    )
    .expect("encode token")
}

fn temp_token_path(label: &str) -> PathBuf {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    env::temp_dir()
        .join(format!("sneaker_admin_{label}_{suffix}"))
        .join("nested")
        .join("token")
}

#[test]
fn reads_role_and_uid_without_verifying_signature() {
    let token = mint(json!({"uid": "65f0aa", "role": "admin", "exp": 1}));
    let session = Session::from_token(token).expect("session");

    assert!(session.is_admin());
    assert_eq!(session.user_id(), Some("65f0aa"));
}

#[test]
fn unknown_role_is_not_admin() {
    let token = mint(json!({"uid": "1", "role": "customer"}));
    assert!(!Session::from_token(token).expect("session").is_admin());

    let token = mint(json!({"uid": "1", "role": "superuser"}));
    assert!(!Session::from_token(token).expect("session").is_admin());
}

#[test]
fn numeric_uid_keeps_admin_role() {
    let token = mint(json!({"uid": 42, "role": "admin"}));
    let session = Session::from_token(token).expect("session");

    assert!(session.is_admin());
    assert_eq!(session.user_id(), Some("42"));
}

#[test]
fn malformed_role_keeps_uid() {
    let token = mint(json!({"uid": "65f0aa", "role": ["admin"]}));
    let session = Session::from_token(token).expect("session");

    assert!(!session.is_admin());
    assert_eq!(session.user_id(), Some("65f0aa"));
}

#[test]
fn opaque_token_is_accepted_with_empty_claims() {
    let session = Session::from_token("not-a-jwt").expect("session");
    assert_eq!(session.token(), "not-a-jwt");
    assert_eq!(session.claims(), &SessionClaims::default());
    assert!(!session.is_admin());
}

#[test]
fn blank_token_is_rejected() {
    assert!(matches!(
        Session::from_token("  \n"),
        Err(SessionError::EmptyToken)
    ));
}

#[test]
fn debug_output_redacts_token() {
    let session = Session::from_token("secret-token-value").expect("session");
    let rendered = format!("{session:?}");
    assert!(!rendered.contains("secret-token-value"));
}

#[test]
fn file_store_round_trips_and_clears() {
    let path = temp_token_path("roundtrip");
    let store = FileTokenStore::new(&path);

    assert_eq!(store.load().expect("load missing"), None);
    store.save("tok-1").expect("save");
    assert_eq!(store.load().expect("load"), Some("tok-1".to_string()));

    store.clear().expect("clear");
    store.clear().expect("clear twice");
    assert_eq!(store.load().expect("load cleared"), None);

    if let Some(root) = path.parent().and_then(Path::parent) {
        fs::remove_dir_all(root).expect("cleanup");
    }
}

#[test]
fn file_store_treats_blank_file_as_empty_slot() {
    let path = temp_token_path("blank");
    let store = FileTokenStore::new(&path);
    store.save("   \n").expect("save");

    assert_eq!(store.load().expect("load"), None);

    if let Some(root) = path.parent().and_then(Path::parent) {
        fs::remove_dir_all(root).expect("cleanup");
    }
}

#[test]
fn memory_store_holds_a_single_slot() {
    let store = MemoryTokenStore::new();
    store.save("first").expect("save");
    store.save("second").expect("save");
    assert_eq!(store.load().expect("load"), Some("second".to_string()));
    store.clear().expect("clear");
    assert_eq!(store.load().expect("load"), None);
}
