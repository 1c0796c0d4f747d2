//! Application shell.
//!
//! Owns the session and mirror signals, keeps exactly one live mirror per
//! signed-in identity, and routes user actions to the mutation gateway.
//! Writes never touch local state directly; the grid changes when the next
//! snapshot arrives.

use dioxus::core::Task;
use dioxus::prelude::*;
use dioxus_logger::tracing::{error, info, warn};
use futures::StreamExt;
use repo_client::{
    can_modify, derive_view, ClientResult, DeleteOutcome, MaterialForm, MirrorFeed, MirrorState,
    MutationGateway, Session, SessionManager,
};
use shared_types::{CareerFilter, Material, Role};

use crate::api::build_backend;
use crate::components::{
    AdminPanel, EditorMode, FilterBar, MaterialCard, MaterialEditor, NavBar, RoleSwitcher,
};
use crate::interop::{browser_confirm, load_app_config};
use crate::styles::{HUB_STYLES, HUB_TOKENS};

pub const ROLE_SWITCHER_ENABLED: bool = cfg!(feature = "prototype-role-switcher");

#[component]
pub fn App() -> Element {
    let config = use_hook(load_app_config);
    let backend = use_hook(|| build_backend(&config));
    let sessions = use_hook(|| SessionManager::new(&backend, &config));
    let gateway = use_hook(|| MutationGateway::new(&backend, config.namespace.clone()));

    let mut session = use_signal(Session::default);
    let mut mirror = use_signal(MirrorState::default);
    let mut filter = use_signal(CareerFilter::default);
    let mut search = use_signal(String::new);
    let mut editor = use_signal(|| None::<EditorMode>);
    let mut saving = use_signal(|| false);
    let mut admin_open = use_signal(|| false);
    let mut mirror_task = use_signal(|| None::<Task>);
    let mut session_started = use_signal(|| false);

    // Follow auth changes and sign in once on mount.
    {
        let sessions = sessions.clone();
        use_effect(move || {
            if session_started() {
                return;
            }
            session_started.set(true);

            let watcher = sessions.clone();
            spawn(async move {
                let mut changes = watcher.watch_identity();
                while let Some(identity) = changes.next().await {
                    let current = session.peek().clone();
                    let next = watcher.on_identity_change(identity, &current).await;
                    session.set(next);
                }
            });

            let sign_in = sessions.clone();
            spawn(async move {
                if sign_in.establish_session().await.is_none() {
                    warn!("Continuing without an identity; the repository stays empty");
                }
            });
        });
    }

    // One mirror per identity. The previous feed is released and its data cleared
    // before the next attaches.
    let identity = use_memo(move || session.read().identity.clone());
    {
        let store = backend.store.clone();
        let namespace = config.namespace.clone();
        use_effect(move || {
            let identity = identity();
            if let Some(task) = mirror_task.write().take() {
                task.cancel();
            }
            mirror.write().clear();
            let Some(identity) = identity else {
                return;
            };

            let store = store.clone();
            let namespace = namespace.clone();
            let task = spawn(async move {
                let mut feed = match MirrorFeed::attach(store.as_ref(), &namespace, Some(&identity)) {
                    Ok(feed) => feed,
                    Err(e) => {
                        error!("Failed to attach live mirror: {}", e);
                        return;
                    }
                };
                while let Some(update) = feed.next_update().await {
                    mirror.write().apply(update);
                }
                warn!("Live mirror ended; showing the last received data");
            });
            mirror_task.set(Some(task));
        });
    }

    use_drop(move || {
        if let Some(task) = mirror_task.write().take() {
            task.cancel();
        }
    });

    let view = use_memo(move || derive_view(&mirror.read().materials, filter(), &search.read()));

    let sign_in = {
        let sessions = sessions.clone();
        use_callback(move |_: ()| {
            let sessions = sessions.clone();
            spawn(async move {
                sessions.establish_session().await;
            });
        })
    };

    let sign_out = {
        let sessions = sessions.clone();
        use_callback(move |_: ()| {
            let sessions = sessions.clone();
            spawn(async move {
                if let Err(e) = sessions.sign_out().await {
                    error!("Error al cerrar sesión: {}", e);
                }
            });
        })
    };

    let save_material = {
        let gateway = gateway.clone();
        use_callback(move |draft: MaterialForm| {
            let Some(mode) = editor.peek().clone() else {
                return;
            };
            let gateway = gateway.clone();
            let current = session.peek().clone();
            saving.set(true);
            spawn(async move {
                match save(&gateway, &mode, &draft, &current).await {
                    Ok(()) => editor.set(None),
                    Err(e) => error!("Error al guardar: {}", e),
                }
                saving.set(false);
            });
        })
    };

    let delete_material = {
        let gateway = gateway.clone();
        use_callback(move |id: String| {
            let gateway = gateway.clone();
            spawn(async move {
                match gateway.delete_material(&id, &browser_confirm).await {
                    Ok(DeleteOutcome::Deleted) => info!("Deleted material {}", id),
                    Ok(DeleteOutcome::Cancelled) => {}
                    Err(e) => error!("Error al borrar: {}", e),
                }
            });
        })
    };

    let change_role = {
        let gateway = gateway.clone();
        use_callback(move |(uid, role): (String, Role)| {
            let gateway = gateway.clone();
            spawn(async move {
                if let Err(e) = gateway.set_role(&uid, role).await {
                    error!("Error al cambiar rol de {}: {}", uid, e);
                }
            });
        })
    };

    let switch_own_role = {
        let gateway = gateway.clone();
        use_callback(move |role: Role| {
            let Some(uid) = session.peek().uid().map(str::to_string) else {
                return;
            };
            let gateway = gateway.clone();
            spawn(async move {
                match gateway.set_role(&uid, role).await {
                    Ok(()) => {
                        if let Some(profile) = session.write().profile.as_mut() {
                            profile.role = role;
                        }
                    }
                    Err(e) => error!("Error al cambiar mi rol: {}", e),
                }
            });
        })
    };

    let current = session.read().clone();
    let is_admin = current
        .profile
        .as_ref()
        .is_some_and(|profile| profile.role == Role::Admin);
    let own_role = current.profile.as_ref().map(|profile| profile.role);
    let current_uid = current.uid().map(str::to_string);
    let loading = mirror.read().loading;
    let profiles = mirror.read().profiles.clone();
    let search_value = search.read().clone();
    let cards: Vec<(String, Material, bool)> = view
        .read()
        .iter()
        .map(|material| {
            let editable = can_modify(material, current.identity.as_ref(), current.profile.as_ref());
            (material.id.clone(), material.clone(), editable)
        })
        .collect();

    rsx! {
        style { {HUB_TOKENS} }
        style { {HUB_STYLES} }

        div {
            class: "hub-shell",

            NavBar {
                is_admin,
                signed_in: current.is_signed_in(),
                on_open_admin: move |_| admin_open.set(true),
                on_upload: move |_| editor.set(Some(EditorMode::Create)),
                on_sign_in: sign_in,
                on_sign_out: sign_out,
            }

            main {
                class: "hub-main",

                FilterBar {
                    search: search_value,
                    filter: filter(),
                    on_search: move |value: String| search.set(value),
                    on_filter: move |value: CareerFilter| filter.set(value),
                }

                if loading {
                    div { class: "hub-loading", "Cargando repositorio de la UT..." }
                } else {
                    div {
                        class: "hub-grid",
                        for (id, material, editable) in cards {
                            MaterialCard {
                                key: "{id}",
                                material,
                                editable,
                                on_edit: move |material: Material| editor.set(Some(EditorMode::Edit(material))),
                                on_delete: delete_material,
                            }
                        }
                    }
                }
            }

            if ROLE_SWITCHER_ENABLED {
                RoleSwitcher { current: own_role, on_switch: switch_own_role }
            }

            if let Some(mode) = editor() {
                MaterialEditor {
                    mode,
                    saving: saving(),
                    on_submit: save_material,
                    on_close: move |_| editor.set(None),
                }
            }

            if admin_open() && is_admin {
                AdminPanel {
                    profiles,
                    current_uid,
                    on_role_change: change_role,
                    on_close: move |_| admin_open.set(false),
                }
            }
        }
    }
}

/// Validate the draft and send it as a create or an update.
async fn save(
    gateway: &MutationGateway,
    mode: &EditorMode,
    draft: &MaterialForm,
    session: &Session,
) -> ClientResult<()> {
    let fields = draft.to_fields()?;
    match mode {
        EditorMode::Create => {
            let id = gateway
                .create_material(&fields, session.identity.as_ref(), session.profile.as_ref())
                .await?;
            info!("Published material {}", id);
        }
        EditorMode::Edit(material) => gateway.update_material(&material.id, &fields).await?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use repo_client::{Identity, MemoryBackend};
    use shared_types::{Career, Collection, Namespace, Profile};

    fn draft() -> MaterialForm {
        MaterialForm {
            title: "Apuntes de Física III".to_string(),
            career: Career::SoftwareEngineering.as_str().to_string(),
            url: "https://drive.example.com/f/1".to_string(),
            author: String::new(),
        }
    }

    fn signed_in(uid: &str, role: Role) -> Session {
        Session {
            identity: Some(Identity::anonymous(uid)),
            profile: Some(Profile {
                uid: uid.to_string(),
                role,
                name: format!("Estudiante_{uid}"),
                joined_at: String::new(),
            }),
        }
    }

    #[test]
    fn test_save_creates_then_updates() {
        futures::executor::block_on(async {
            let memory = MemoryBackend::new();
            let namespace = Namespace::default();
            let gateway = MutationGateway::new(&memory.backend(), namespace.clone());
            let session = signed_in("u1", Role::Verifier);

            save(&gateway, &EditorMode::Create, &draft(), &session).await.unwrap();
            let docs = memory.documents(&namespace.collection_path(Collection::Materials));
            assert_eq!(docs.len(), 1);
            let created = docs[0].to_material().unwrap();
            assert!(created.verified);

            let mut edited = draft();
            edited.title = "Apuntes de Física IV".to_string();
            save(&gateway, &EditorMode::Edit(created.clone()), &edited, &session)
                .await
                .unwrap();
            let updated = memory
                .document(&namespace.document_path(Collection::Materials, &created.id))
                .unwrap()
                .to_material()
                .unwrap();
            assert_eq!(updated.title, "Apuntes de Física IV");
        });
    }

    #[test]
    fn test_save_rejects_invalid_draft() {
        futures::executor::block_on(async {
            let memory = MemoryBackend::new();
            let gateway = MutationGateway::new(&memory.backend(), Namespace::default());
            let mut invalid = draft();
            invalid.url = "drive".to_string();

            let result = save(&gateway, &EditorMode::Create, &invalid, &signed_in("u1", Role::Student)).await;
            assert!(matches!(result, Err(repo_client::ClientError::Validation(_))));
        });
    }

    #[test]
    fn test_save_without_profile_fails() {
        futures::executor::block_on(async {
            let memory = MemoryBackend::new();
            let gateway = MutationGateway::new(&memory.backend(), Namespace::default());
            let session = Session {
                identity: Some(Identity::anonymous("u1")),
                profile: None,
            };

            let result = save(&gateway, &EditorMode::Create, &draft(), &session).await;
            assert_eq!(result, Err(repo_client::ClientError::ProfileNotLoaded));
        });
    }
}
