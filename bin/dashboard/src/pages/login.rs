//! Login page.

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_navigate;
use pharmaec_navigation::HOME_PATH;

use crate::components::use_toasts;
use crate::context::use_session;

/// Email and password form. A visitor who already holds an access token is
/// sent straight to the dashboard.
#[component]
pub fn LoginPage() -> impl IntoView {
    let session = use_session();
    let toasts = use_toasts();
    let navigate = use_navigate();

    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let submitting = RwSignal::new(false);
    let error = RwSignal::new(Option::<String>::None);

    let to_home = navigate.clone();
    Effect::new(move || {
        if session.api().store().has_access_token() {
            to_home(HOME_PATH, Default::default());
        }
    });

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let (email_value, password_value) = (email.get_untracked(), password.get_untracked());
        if email_value.trim().is_empty() || password_value.is_empty() {
            error.set(Some("Enter your email and password".to_string()));
            return;
        }

        submitting.set(true);
        error.set(None);
        let api = session.api();
        let navigate = navigate.clone();
        spawn_local(async move {
            match api.login(email_value.trim(), &password_value).await {
                Ok(_) => {
                    session.refresh();
                    toasts.success("Welcome back");
                    navigate(HOME_PATH, Default::default());
                }
                Err(err) => {
                    tracing::debug!(error = %err, "login rejected");
                    error.set(Some(err.user_message()));
                }
            }
            submitting.set(false);
        });
    };

    view! {
        <div class="login-page">
            <form class="login-box" on:submit=on_submit>
                <div class="login-brand">
                    <span class="material-symbols-outlined brand-mark">"local_pharmacy"</span>
                    <h1>"PharmaEC"</h1>
                </div>
                <p class="muted">"Sign in to manage your pharmacy network"</p>

                {move || error.get().map(|e| view! { <p class="error">{e}</p> })}

                <label for="email">"Email"</label>
                <input
                    id="email"
                    type="email"
                    autocomplete="username"
                    placeholder="you@pharmaec.in"
                    prop:value=move || email.get()
                    on:input=move |ev| email.set(event_target_value(&ev))
                />
                <label for="password">"Password"</label>
                <input
                    id="password"
                    type="password"
                    autocomplete="current-password"
                    prop:value=move || password.get()
                    on:input=move |ev| password.set(event_target_value(&ev))
                />
                <button type="submit" class="primary-btn" disabled=move || submitting.get()>
                    {move || if submitting.get() { "Signing in..." } else { "Sign In" }}
                </button>
            </form>
        </div>
    }
}
