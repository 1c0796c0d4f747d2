use std::collections::BTreeMap;

use dioxus::prelude::*;
use dioxus_logger::tracing::warn;
use repo_client::MaterialForm;
use shared_types::{Career, CareerFilter, Material, Profile, Role};

/// What the editor modal is doing.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorMode {
    Create,
    Edit(Material),
}

impl EditorMode {
    pub fn title(&self) -> &'static str {
        match self {
            EditorMode::Create => "Subir Material",
            EditorMode::Edit(_) => "Editar Recurso",
        }
    }

    pub fn initial_form(&self) -> MaterialForm {
        match self {
            EditorMode::Create => MaterialForm::default(),
            EditorMode::Edit(material) => MaterialForm::from_material(material),
        }
    }
}

pub fn submit_label(saving: bool) -> &'static str {
    if saving {
        "Guardando..."
    } else {
        "Publicar Material"
    }
}

// ============================================================================
// Navigation
// ============================================================================

#[component]
pub fn NavBar(
    is_admin: bool,
    signed_in: bool,
    on_open_admin: EventHandler<()>,
    on_upload: EventHandler<()>,
    on_sign_in: EventHandler<()>,
    on_sign_out: EventHandler<()>,
) -> Element {
    rsx! {
        nav {
            class: "hub-nav",
            div {
                class: "hub-brand",
                "UT Learning "
                span { class: "hub-brand-accent", "Hub" }
            }
            div {
                class: "hub-nav-actions",
                if is_admin {
                    button {
                        class: "hub-link-button",
                        onclick: move |_| on_open_admin.call(()),
                        "Admin"
                    }
                }
                if signed_in {
                    button {
                        class: "hub-link-button",
                        onclick: move |_| on_sign_out.call(()),
                        "Salir"
                    }
                } else {
                    button {
                        class: "hub-link-button",
                        onclick: move |_| on_sign_in.call(()),
                        "Entrar"
                    }
                }
                if signed_in {
                    button {
                        class: "hub-primary-button",
                        onclick: move |_| on_upload.call(()),
                        "+ Subir"
                    }
                }
            }
        }
    }
}

// ============================================================================
// Search and career filter
// ============================================================================

#[component]
pub fn FilterBar(
    search: String,
    filter: CareerFilter,
    on_search: EventHandler<String>,
    on_filter: EventHandler<CareerFilter>,
) -> Element {
    rsx! {
        div {
            class: "hub-filters",
            input {
                class: "hub-search",
                r#type: "text",
                placeholder: "Buscar material didáctico...",
                value: "{search}",
                oninput: move |evt| on_search.call(evt.value()),
            }
            select {
                class: "hub-select",
                value: filter.as_str(),
                onchange: move |evt| match evt.value().parse::<CareerFilter>() {
                    Ok(next) => on_filter.call(next),
                    Err(e) => warn!("Ignoring filter option: {}", e),
                },
                for choice in CareerFilter::options() {
                    option {
                        value: choice.as_str(),
                        selected: choice == filter,
                        {choice.as_str()}
                    }
                }
            }
        }
    }
}

// ============================================================================
// Material grid
// ============================================================================

#[component]
pub fn MaterialCard(
    material: Material,
    editable: bool,
    on_edit: EventHandler<Material>,
    on_delete: EventHandler<String>,
) -> Element {
    let initial = material.uploader_initial();
    let edit_target = material.clone();
    let delete_id = material.id.clone();

    rsx! {
        div {
            class: "hub-card",
            div {
                class: "hub-card-header",
                div {
                    span { class: "hub-badge", "{material.career}" }
                    if material.verified {
                        span { class: "hub-badge hub-badge-verified", "Verificado" }
                    }
                }
                if editable {
                    div {
                        class: "hub-card-actions",
                        button {
                            class: "hub-icon-button edit",
                            title: "Editar",
                            onclick: move |_| on_edit.call(edit_target.clone()),
                            "✎"
                        }
                        button {
                            class: "hub-icon-button delete",
                            title: "Eliminar",
                            onclick: move |_| on_delete.call(delete_id.clone()),
                            "🗑"
                        }
                    }
                }
            }
            h3 { class: "hub-card-title", "{material.title}" }
            div {
                class: "hub-card-footer",
                div {
                    class: "hub-uploader",
                    div { class: "hub-avatar", "{initial}" }
                    span { "{material.uploader_name}" }
                }
                a {
                    class: "hub-download",
                    href: "{material.url}",
                    target: "_blank",
                    rel: "noopener noreferrer",
                    "Descargar"
                }
            }
        }
    }
}

// ============================================================================
// Editor modal
// ============================================================================

#[component]
pub fn MaterialEditor(
    mode: EditorMode,
    saving: bool,
    on_submit: EventHandler<MaterialForm>,
    on_close: EventHandler<()>,
) -> Element {
    let initial = mode.initial_form();
    let mut draft = use_signal(move || initial);
    let mut errors = use_signal(BTreeMap::<String, String>::new);

    let current = draft.read().clone();
    let messages = errors.read().clone();

    rsx! {
        div {
            class: "hub-overlay",
            div {
                class: "hub-modal",
                div {
                    class: "hub-modal-header",
                    h2 { class: "hub-modal-title", {mode.title()} }
                    button {
                        class: "hub-icon-button",
                        onclick: move |_| on_close.call(()),
                        "✕"
                    }
                }
                form {
                    onsubmit: move |evt: FormEvent| {
                        evt.prevent_default();
                        let submitted = draft.read().clone();
                        let invalid = submitted.field_messages();
                        if invalid.is_empty() {
                            errors.set(BTreeMap::new());
                            on_submit.call(submitted);
                        } else {
                            errors.set(invalid);
                        }
                    },
                    div {
                        class: "hub-field",
                        label { "Título" }
                        input {
                            placeholder: "Ej: Apuntes de Física III",
                            value: "{current.title}",
                            oninput: move |evt| draft.write().title = evt.value(),
                        }
                        if let Some(message) = messages.get("title") {
                            span { class: "hub-field-error", "{message}" }
                        }
                    }
                    div {
                        class: "hub-field",
                        label { "Carrera" }
                        select {
                            value: "{current.career}",
                            onchange: move |evt| draft.write().career = evt.value(),
                            option { value: "", "Selecciona carrera..." }
                            for career in Career::ALL {
                                option {
                                    value: career.as_str(),
                                    selected: current.career == career.as_str(),
                                    {career.as_str()}
                                }
                            }
                        }
                        if let Some(message) = messages.get("career") {
                            span { class: "hub-field-error", "{message}" }
                        }
                    }
                    div {
                        class: "hub-field",
                        label { "Enlace de descarga (Drive/Cloud)" }
                        input {
                            r#type: "url",
                            placeholder: "https://...",
                            value: "{current.url}",
                            oninput: move |evt| draft.write().url = evt.value(),
                        }
                        if let Some(message) = messages.get("url") {
                            span { class: "hub-field-error", "{message}" }
                        }
                    }
                    div {
                        class: "hub-field",
                        label { "Autor (opcional)" }
                        input {
                            placeholder: "Ej: Dr. Pérez",
                            value: "{current.author}",
                            oninput: move |evt| draft.write().author = evt.value(),
                        }
                    }
                    button {
                        class: "hub-primary-button",
                        r#type: "submit",
                        disabled: saving,
                        {submit_label(saving)}
                    }
                }
            }
        }
    }
}

// ============================================================================
// Admin panel
// ============================================================================

#[component]
pub fn AdminPanel(
    profiles: Vec<Profile>,
    current_uid: Option<String>,
    on_role_change: EventHandler<(String, Role)>,
    on_close: EventHandler<()>,
) -> Element {
    rsx! {
        div {
            class: "hub-overlay strong",
            div {
                class: "hub-modal wide",
                div {
                    class: "hub-admin-header",
                    div {
                        h2 { class: "hub-modal-title", "Moderación de Comunidad" }
                        p { "Gestiona quién puede verificar material." }
                    }
                    button {
                        class: "hub-icon-button",
                        onclick: move |_| on_close.call(()),
                        "✕"
                    }
                }
                div {
                    class: "hub-admin-list",
                    for profile in profiles.iter() {
                        AdminRow {
                            key: "{profile.uid}",
                            is_self: current_uid.as_deref() == Some(profile.uid.as_str()),
                            profile: profile.clone(),
                            on_role_change,
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn AdminRow(profile: Profile, is_self: bool, on_role_change: EventHandler<(String, Role)>) -> Element {
    let initial = profile.initial();
    let uid = profile.uid.clone();
    let marker = if is_self { " (Tú)" } else { "" };

    rsx! {
        div {
            class: "hub-admin-row",
            div {
                class: "hub-uploader",
                div { class: "hub-avatar", "{initial}" }
                div {
                    p { "{profile.name}{marker}" }
                    p { class: "hub-admin-uid", "{profile.uid}" }
                }
            }
            select {
                class: "hub-select",
                disabled: is_self,
                value: profile.role.as_str(),
                onchange: move |evt| match evt.value().parse::<Role>() {
                    Ok(role) => on_role_change.call((uid.clone(), role)),
                    Err(e) => warn!("Ignoring role option: {}", e),
                },
                for role in Role::ALL {
                    option {
                        value: role.as_str(),
                        selected: role == profile.role,
                        {role.label()}
                    }
                }
            }
        }
    }
}

// ============================================================================
// Role switcher
// ============================================================================

fn role_option_class(active: bool) -> &'static str {
    if active {
        "hub-role-option active"
    } else {
        "hub-role-option"
    }
}

#[component]
pub fn RoleSwitcher(current: Option<Role>, on_switch: EventHandler<Role>) -> Element {
    rsx! {
        div {
            class: "hub-role-bar",
            span { "Cambiar Mi Rol:" }
            for role in Role::ALL {
                button {
                    class: role_option_class(current == Some(role)),
                    onclick: move |_| on_switch.call(role),
                    {role.as_str()}
                }
            }
        }
    }
}
