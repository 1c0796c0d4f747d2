pub const HUB_TOKENS: &str = r#"
:root {
    /* Colors */
    --bg-page: #f8fafc;
    --bg-card: #ffffff;
    --bg-field: #f8fafc;
    --bg-overlay: rgba(15, 23, 42, 0.6);
    --bg-overlay-strong: rgba(15, 23, 42, 0.9);
    --bg-bar: #0f172a;
    --text-primary: #0f172a;
    --text-secondary: #64748b;
    --text-muted: #94a3b8;
    --accent-bg: #4f46e5;
    --accent-bg-hover: #4338ca;
    --accent-soft: #eef2ff;
    --accent-text: #ffffff;
    --danger: #e11d48;
    --warning: #f59e0b;
    --success: #059669;
    --border-color: #e2e8f0;

    /* Radius */
    --radius-field: 1rem;
    --radius-card: 2rem;
    --radius-modal: 2.5rem;
}

body {
    margin: 0;
    background: var(--bg-page);
    color: var(--text-primary);
    font-family: system-ui, -apple-system, "Segoe UI", sans-serif;
}
"#;

pub const HUB_STYLES: &str = r#"
/* Shell */
.hub-shell {
    min-height: 100vh;
    padding-bottom: 5rem;
}

.hub-main {
    max-width: 80rem;
    margin: 0 auto;
    padding: 2rem 1rem;
}

/* Navigation */
.hub-nav {
    position: sticky;
    top: 0;
    z-index: 50;
    height: 4rem;
    padding: 0 1rem;
    display: flex;
    align-items: center;
    justify-content: space-between;
    background: var(--bg-card);
    border-bottom: 1px solid var(--border-color);
}

.hub-brand {
    font-weight: 700;
    font-size: 1.125rem;
}

.hub-brand-accent {
    color: var(--accent-bg);
}

.hub-nav-actions {
    display: flex;
    align-items: center;
    gap: 1rem;
}

.hub-link-button {
    background: none;
    border: none;
    cursor: pointer;
    color: var(--text-secondary);
    font-size: 0.625rem;
    font-weight: 900;
    letter-spacing: 0.1em;
    text-transform: uppercase;
}

.hub-link-button:hover {
    color: var(--accent-bg);
}

.hub-primary-button {
    background: var(--accent-bg);
    color: var(--accent-text);
    border: none;
    border-radius: 0.5rem;
    padding: 0.5rem 1rem;
    font-weight: 700;
    cursor: pointer;
}

.hub-primary-button:hover {
    background: var(--accent-bg-hover);
}

.hub-primary-button:disabled {
    background: var(--text-muted);
    cursor: default;
}

/* Filters */
.hub-filters {
    display: grid;
    grid-template-columns: 3fr 1fr;
    gap: 1.5rem;
    margin-bottom: 2rem;
}

.hub-search,
.hub-select {
    background: var(--bg-card);
    border: 1px solid var(--border-color);
    border-radius: var(--radius-field);
    padding: 1rem;
    font-size: 1rem;
    outline: none;
}

.hub-select {
    font-weight: 700;
    color: var(--text-secondary);
    cursor: pointer;
}

.hub-loading {
    text-align: center;
    padding: 5rem 0;
    color: var(--text-muted);
    font-weight: 500;
}

/* Material grid */
.hub-grid {
    display: grid;
    grid-template-columns: repeat(auto-fill, minmax(18rem, 1fr));
    gap: 1.5rem;
}

.hub-card {
    background: var(--bg-card);
    border: 1px solid var(--border-color);
    border-radius: var(--radius-card);
    padding: 1.5rem;
}

.hub-card-header {
    display: flex;
    justify-content: space-between;
    margin-bottom: 1rem;
}

.hub-badge {
    font-size: 0.625rem;
    font-weight: 900;
    text-transform: uppercase;
    letter-spacing: 0.1em;
    color: var(--accent-bg);
    background: var(--accent-soft);
    padding: 0.25rem 0.5rem;
    border-radius: 0.25rem;
}

.hub-badge-verified {
    color: var(--success);
    background: #ecfdf5;
    margin-left: 0.5rem;
}

.hub-card-actions {
    display: flex;
    gap: 0.5rem;
}

.hub-icon-button {
    background: none;
    border: none;
    cursor: pointer;
    color: var(--text-muted);
}

.hub-icon-button.edit:hover {
    color: var(--warning);
}

.hub-icon-button.delete:hover {
    color: var(--danger);
}

.hub-card-title {
    font-size: 1.25rem;
    font-weight: 700;
    margin: 0 0 1.5rem;
}

.hub-card-footer {
    display: flex;
    align-items: center;
    justify-content: space-between;
    padding-top: 1.5rem;
    border-top: 1px solid var(--bg-page);
}

.hub-uploader {
    display: flex;
    align-items: center;
    gap: 0.5rem;
    font-size: 0.75rem;
    font-weight: 600;
    color: var(--text-secondary);
}

.hub-avatar {
    width: 2rem;
    height: 2rem;
    border-radius: 9999px;
    background: var(--accent-soft);
    color: var(--accent-bg);
    display: flex;
    align-items: center;
    justify-content: center;
    font-weight: 700;
    text-transform: uppercase;
}

.hub-download {
    background: var(--bg-bar);
    color: var(--accent-text);
    padding: 0.6rem 0.8rem;
    border-radius: 0.75rem;
    text-decoration: none;
}

.hub-download:hover {
    background: var(--accent-bg);
}

/* Modals */
.hub-overlay {
    position: fixed;
    inset: 0;
    z-index: 60;
    display: flex;
    align-items: center;
    justify-content: center;
    padding: 1rem;
    background: var(--bg-overlay);
}

.hub-overlay.strong {
    background: var(--bg-overlay-strong);
}

.hub-modal {
    background: var(--bg-card);
    border-radius: var(--radius-modal);
    width: 100%;
    max-width: 28rem;
    padding: 2rem;
}

.hub-modal.wide {
    max-width: 42rem;
    height: 80vh;
    display: flex;
    flex-direction: column;
    overflow: hidden;
    padding: 0;
}

.hub-modal-header {
    display: flex;
    justify-content: space-between;
    align-items: center;
    margin-bottom: 1.5rem;
}

.hub-modal-title {
    font-size: 1.5rem;
    font-weight: 900;
    margin: 0;
}

.hub-field {
    display: flex;
    flex-direction: column;
    gap: 0.25rem;
    margin-bottom: 1rem;
}

.hub-field label {
    font-size: 0.625rem;
    font-weight: 900;
    text-transform: uppercase;
    color: var(--text-muted);
}

.hub-field input,
.hub-field select {
    background: var(--bg-field);
    border: 1px solid var(--border-color);
    border-radius: var(--radius-field);
    padding: 1rem;
    outline: none;
}

.hub-field-error {
    font-size: 0.75rem;
    color: var(--danger);
}

/* Admin panel */
.hub-admin-header {
    padding: 2rem;
    border-bottom: 1px solid var(--border-color);
    background: var(--bg-page);
    display: flex;
    justify-content: space-between;
    align-items: center;
}

.hub-admin-list {
    flex: 1;
    overflow-y: auto;
    padding: 2rem;
    display: flex;
    flex-direction: column;
    gap: 1rem;
}

.hub-admin-row {
    display: flex;
    align-items: center;
    justify-content: space-between;
    padding: 1rem;
    border: 1px solid var(--border-color);
    border-radius: var(--radius-field);
}

.hub-admin-uid {
    font-family: ui-monospace, monospace;
    font-size: 0.6rem;
    color: var(--text-muted);
}

/* Role switcher */
.hub-role-bar {
    position: fixed;
    bottom: 0;
    left: 0;
    right: 0;
    z-index: 100;
    display: flex;
    justify-content: center;
    gap: 0.5rem;
    padding: 0.5rem;
    background: var(--bg-bar);
    color: var(--accent-text);
    font-size: 0.625rem;
}

.hub-role-option {
    border: none;
    border-radius: 0.25rem;
    padding: 0.25rem 0.75rem;
    font-weight: 700;
    text-transform: uppercase;
    cursor: pointer;
    background: #1e293b;
    color: var(--text-secondary);
}

.hub-role-option.active {
    background: var(--accent-bg);
    color: var(--accent-text);
}
"#;
