//! Top bar: page title, theme toggle, the signed-in user and logout.

use leptos::prelude::*;
use leptos_router::hooks::use_location;
use pharmaec_navigation::{Theme, title_for};

use crate::context::use_session;

/// Up to two initials from a display name.
#[must_use]
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|part| part.chars().next())
        .take(2)
        .flat_map(char::to_uppercase)
        .collect()
}

/// Page header. `theme` is owned by the layout so other pages can change it.
#[component]
pub fn Header(theme: RwSignal<Theme>) -> impl IntoView {
    let session = use_session();
    let location = use_location();
    let store = session.api().store().clone();

    let toggle_theme = move |_| {
        theme.update(|t| *t = t.toggled());
        theme.with_untracked(|t| t.persist(&store));
    };

    let user_name = move || {
        session.state().with(|s| {
            s.principal
                .as_ref()
                .map_or_else(|| "User".to_string(), |p| p.full_name().to_string())
        })
    };
    let role_name = move || {
        session.state().with(|s| {
            s.principal
                .as_ref()
                .map(|p| p.role().display_name().to_string())
                .unwrap_or_default()
        })
    };

    view! {
        <header class="header">
            <h1 class="page-title">
                {move || title_for(&location.pathname.get()).unwrap_or("Dashboard")}
            </h1>
            <div class="header-right">
                <button
                    class="icon-btn"
                    title=move || { if theme.get().is_dark() { "Switch to Light Mode" } else { "Switch to Dark Mode" } }
                    on:click=toggle_theme
                >
                    <span class="material-symbols-outlined">
                        {move || if theme.get().is_dark() { "light_mode" } else { "dark_mode" }}
                    </span>
                </button>
                <div class="user-menu">
                    <span class="avatar">{move || initials(&user_name())}</span>
                    <div class="user-details">
                        <span class="user-name">{user_name}</span>
                        <span class="user-role">{role_name}</span>
                    </div>
                    <button class="icon-btn" title="Log out" on:click=move |_| session.sign_out()>
                        <span class="material-symbols-outlined">"logout"</span>
                    </button>
                </div>
            </div>
        </header>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initials_take_the_first_two_words() {
        assert_eq!(initials("Asha Rao"), "AR");
        assert_eq!(initials("asha maria rao"), "AM");
        assert_eq!(initials("Ravi"), "R");
        assert_eq!(initials(""), "");
    }
}
