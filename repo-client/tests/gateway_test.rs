//! Mutation Gateway Integration Tests
//!
//! Material writes, delete confirmation and role changes, observed through
//! the in-memory backend and the live mirror.

use std::cell::Cell;

use serde_json::json;

use repo_client::memory::Faults;
use repo_client::{
    ClientError, DeleteOutcome, Identity, MaterialForm, MemoryBackend, MirrorFeed, MirrorState,
    MutationGateway,
};
use shared_types::{Career, CareerFilter, Collection, MaterialFields, Namespace, Profile, Role, Timestamp};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("repo_client=debug")
        .try_init();
}

fn setup() -> (MemoryBackend, MutationGateway, Namespace) {
    init_tracing();
    let backend = MemoryBackend::new();
    let namespace = Namespace::default();
    let gateway = MutationGateway::new(&backend.backend(), namespace.clone());
    (backend, gateway, namespace)
}

fn profile(uid: &str, role: Role) -> Profile {
    Profile {
        uid: uid.to_string(),
        role,
        name: format!("Estudiante_{uid}"),
        joined_at: "2024-03-01T12:00:00.000Z".to_string(),
    }
}

fn fields(title: &str) -> MaterialFields {
    MaterialFields {
        title: title.to_string(),
        career: Career::SoftwareEngineering,
        url: "https://drive.example.com/f/1".to_string(),
        author: "Dr. Pérez".to_string(),
    }
}

#[tokio::test]
async fn test_create_stamps_uploader_and_verification() {
    let (backend, gateway, namespace) = setup();
    backend.set_server_time(Timestamp::from_seconds(1_700_000_000));

    let cases = [
        (Role::Student, false),
        (Role::Verifier, true),
        (Role::Admin, true),
    ];
    for (role, verified) in cases {
        let me = Identity::anonymous("abcd1234");
        let id = gateway
            .create_material(&fields("Apuntes"), Some(&me), Some(&profile("abcd1234", role)))
            .await
            .unwrap();

        let doc = backend
            .document(&namespace.document_path(Collection::Materials, &id))
            .unwrap();
        let material = doc.to_material().unwrap();
        assert_eq!(material.id, id);
        assert_eq!(material.uploader_id, "abcd1234");
        assert_eq!(material.uploader_name, "Estudiante_abcd1234");
        assert_eq!(material.verified, verified, "role {role}");
        assert_eq!(material.created_at, Some(Timestamp::from_seconds(1_700_000_000)));
        assert_eq!(material.author, "Dr. Pérez");
    }
}

#[tokio::test]
async fn test_create_requires_identity_and_profile() {
    let (backend, gateway, namespace) = setup();
    let me = Identity::anonymous("u1");

    let err = gateway
        .create_material(&fields("x"), None, Some(&profile("u1", Role::Admin)))
        .await
        .unwrap_err();
    assert_eq!(err, ClientError::NotSignedIn);

    let err = gateway
        .create_material(&fields("x"), Some(&me), None)
        .await
        .unwrap_err();
    assert_eq!(err, ClientError::ProfileNotLoaded);

    assert!(backend
        .documents(&namespace.collection_path(Collection::Materials))
        .is_empty());
}

#[tokio::test]
async fn test_update_touches_only_editable_fields() {
    let (backend, gateway, namespace) = setup();
    let path = namespace.document_path(Collection::Materials, "m1");
    backend.insert_raw(
        &path,
        json!({
            "title": "Costos",
            "career": "Gastronomía",
            "url": "https://example.com/old",
            "author": "",
            "uploaderId": "owner",
            "uploaderName": "Estudiante_owne",
            "createdAt": {"seconds": 100, "nanoseconds": 0},
            "verified": true
        }),
    );

    let form = MaterialForm {
        title: "Costos II".to_string(),
        career: "Desarrollo de Negocios".to_string(),
        url: "https://example.com/new".to_string(),
        author: "Mtra. López".to_string(),
    };
    gateway
        .update_material("m1", &form.to_fields().unwrap())
        .await
        .unwrap();

    let material = backend.document(&path).unwrap().to_material().unwrap();
    assert_eq!(material.title, "Costos II");
    assert_eq!(material.career, Career::BusinessDevelopment);
    assert_eq!(material.url, "https://example.com/new");
    assert_eq!(material.author, "Mtra. López");
    assert_eq!(material.uploader_id, "owner");
    assert_eq!(material.created_at, Some(Timestamp::from_seconds(100)));
    assert!(material.verified);
}

#[tokio::test]
async fn test_update_missing_material_fails() {
    let (_backend, gateway, _namespace) = setup();
    let err = gateway.update_material("ghost", &fields("x")).await.unwrap_err();
    assert!(matches!(err, ClientError::NotFound(_)));
}

#[tokio::test]
async fn test_cancelled_delete_sends_nothing() {
    let (backend, gateway, namespace) = setup();
    let path = namespace.document_path(Collection::Materials, "m1");
    backend.insert_raw(&path, json!({"title": "Costos"}));

    let asked = Cell::new(0);
    let decline = |_: &str| {
        asked.set(asked.get() + 1);
        false
    };
    let outcome = gateway.delete_material("m1", &decline).await.unwrap();
    assert_eq!(outcome, DeleteOutcome::Cancelled);
    assert_eq!(asked.get(), 1);
    assert!(backend.document(&path).is_some());

    let outcome = gateway.delete_material("m1", &|_: &str| true).await.unwrap();
    assert_eq!(outcome, DeleteOutcome::Deleted);
    assert!(backend.document(&path).is_none());
}

#[tokio::test]
async fn test_set_role_overwrites_only_role() {
    let (backend, gateway, namespace) = setup();
    let path = namespace.document_path(Collection::Profiles, "u2");
    backend.insert_raw(
        &path,
        json!({
            "uid": "u2",
            "role": "estudiante",
            "name": "Estudiante_u2",
            "joinedAt": "2024-03-01T12:00:00.000Z"
        }),
    );

    gateway.set_role("u2", Role::Verifier).await.unwrap();

    let stored = backend.document(&path).unwrap().to_profile().unwrap();
    assert_eq!(stored.role, Role::Verifier);
    assert_eq!(stored.name, "Estudiante_u2");
    assert_eq!(stored.joined_at, "2024-03-01T12:00:00.000Z");
}

#[tokio::test]
async fn test_rejected_writes_surface_store_errors() {
    let (backend, gateway, namespace) = setup();
    backend.insert_raw(
        &namespace.document_path(Collection::Materials, "m1"),
        json!({"title": "Costos"}),
    );
    backend.set_faults(Faults {
        fail_writes: true,
        ..Faults::default()
    });
    let me = Identity::anonymous("u1");

    let created = gateway
        .create_material(&fields("x"), Some(&me), Some(&profile("u1", Role::Student)))
        .await;
    assert!(matches!(created, Err(ClientError::Store(_))));

    let deleted = gateway.delete_material("m1", &|_: &str| true).await;
    assert!(matches!(deleted, Err(ClientError::Store(_))));

    let role = gateway.set_role("u1", Role::Admin).await;
    assert!(matches!(role, Err(ClientError::Store(_))));

    assert_eq!(
        backend
            .documents(&namespace.collection_path(Collection::Materials))
            .len(),
        1
    );
}

#[tokio::test]
async fn test_created_material_reaches_the_view() {
    let (backend, gateway, namespace) = setup();
    let me = Identity::anonymous("u1");
    let store = backend.backend().store;
    let mut feed = MirrorFeed::attach(store.as_ref(), &namespace, Some(&me)).unwrap();

    let mut state = MirrorState::default();
    for _ in 0..2 {
        state.apply(feed.next_update().await.unwrap());
    }
    assert!(state.materials.is_empty());

    backend.set_server_time(Timestamp::from_seconds(50));
    gateway
        .create_material(&fields("Física III Apuntes"), Some(&me), Some(&profile("u1", Role::Student)))
        .await
        .unwrap();
    backend.set_server_time(Timestamp::from_seconds(150));
    let newer = gateway
        .create_material(&fields("Física I"), Some(&me), Some(&profile("u1", Role::Student)))
        .await
        .unwrap();

    state.apply(feed.next_update().await.unwrap());
    state.apply(feed.next_update().await.unwrap());

    let view = repo_client::derive_view(
        &state.materials,
        CareerFilter::Only(Career::SoftwareEngineering),
        "física",
    );
    assert_eq!(view.len(), 2);
    assert_eq!(view[0].id, newer);

    let none = repo_client::derive_view(&state.materials, CareerFilter::Only(Career::Gastronomy), "");
    assert!(none.is_empty());
}
