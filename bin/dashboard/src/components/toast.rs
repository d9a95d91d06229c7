//! Transient notifications.
//!
//! Pages report the outcome of mutations here instead of rendering their
//! own banners. Every toast dismisses itself after [`TOAST_LIFETIME`]; the
//! close button removes it earlier.

use leptos::prelude::*;
use std::time::Duration;

/// How long a toast stays on screen.
pub const TOAST_LIFETIME: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Warning,
    Info,
}

impl ToastKind {
    /// Material symbol shown next to the message.
    #[must_use]
    pub fn icon(self) -> &'static str {
        match self {
            Self::Success => "check_circle",
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }

    #[must_use]
    pub fn class(self) -> &'static str {
        match self {
            Self::Success => "toast toast-success",
            Self::Error => "toast toast-error",
            Self::Warning => "toast toast-warning",
            Self::Info => "toast toast-info",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: u64,
    pub kind: ToastKind,
    pub message: String,
}

/// Toasts currently on screen, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToastQueue {
    next_id: u64,
    items: Vec<Toast>,
}

impl ToastQueue {
    /// Appends a toast and returns its id.
    pub fn push(&mut self, kind: ToastKind, message: impl Into<String>) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.items.push(Toast {
            id,
            kind,
            message: message.into(),
        });
        id
    }

    /// Removes the toast with `id`. Unknown ids are ignored, so a manual
    /// close followed by the timer is harmless.
    pub fn dismiss(&mut self, id: u64) {
        self.items.retain(|t| t.id != id);
    }

    #[must_use]
    pub fn items(&self) -> &[Toast] {
        &self.items
    }
}

/// Handle for raising toasts from any component.
#[derive(Clone, Copy)]
pub struct Toasts {
    queue: RwSignal<ToastQueue>,
}

impl Toasts {
    pub fn push(&self, kind: ToastKind, message: impl Into<String>) {
        let mut id = 0;
        self.queue.update(|q| id = q.push(kind, message));
        let queue = self.queue;
        set_timeout(move || queue.update(|q| q.dismiss(id)), TOAST_LIFETIME);
    }

    pub fn success(&self, message: impl Into<String>) {
        self.push(ToastKind::Success, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.push(ToastKind::Error, message);
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.push(ToastKind::Warning, message);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.push(ToastKind::Info, message);
    }

    pub fn dismiss(&self, id: u64) {
        self.queue.update(|q| q.dismiss(id));
    }
}

/// Provides the toast handle for the subtree.
pub fn provide_toasts() -> Toasts {
    let toasts = Toasts {
        queue: RwSignal::new(ToastQueue::default()),
    };
    provide_context(toasts);
    toasts
}

/// Returns the toast handle.
///
/// # Panics
///
/// Panics if called outside [`crate::app::App`].
#[must_use]
pub fn use_toasts() -> Toasts {
    match use_context::<Toasts>() {
        Some(toasts) => toasts,
        None => panic!("use_toasts() called outside the App component"),
    }
}

/// Renders the toast stack in the top-right corner.
#[component]
pub fn ToastContainer() -> impl IntoView {
    let toasts = use_toasts();

    view! {
        <div class="toast-container">
            <For
                each=move || toasts.queue.with(|q| q.items().to_vec())
                key=|toast| toast.id
                let:toast
            >
                <div class=toast.kind.class()>
                    <span class="material-symbols-outlined">{toast.kind.icon()}</span>
                    <p class="toast-message">{toast.message.clone()}</p>
                    <button class="toast-close" on:click=move |_| toasts.dismiss(toast.id)>
                        <span class="material-symbols-outlined">"close"</span>
                    </button>
                </div>
            </For>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique_and_order_is_kept() {
        let mut queue = ToastQueue::default();
        let first = queue.push(ToastKind::Success, "Warehouse created");
        let second = queue.push(ToastKind::Error, "Code already exists");

        assert_ne!(first, second);
        let messages: Vec<&str> = queue.items().iter().map(|t| t.message.as_str()).collect();
        assert_eq!(messages, ["Warehouse created", "Code already exists"]);
    }

    #[test]
    fn dismiss_removes_only_that_toast() {
        let mut queue = ToastQueue::default();
        let first = queue.push(ToastKind::Info, "a");
        let second = queue.push(ToastKind::Warning, "b");

        queue.dismiss(first);
        queue.dismiss(first);

        assert_eq!(queue.items().len(), 1);
        assert_eq!(queue.items()[0].id, second);
    }

    #[test]
    fn ids_are_not_reused_after_dismissal() {
        let mut queue = ToastQueue::default();
        let first = queue.push(ToastKind::Info, "a");
        queue.dismiss(first);
        let second = queue.push(ToastKind::Info, "b");
        assert_ne!(first, second);
    }

    #[test]
    fn toasts_last_five_seconds() {
        assert_eq!(TOAST_LIFETIME, Duration::from_secs(5));
        assert_eq!(ToastKind::Error.icon(), "error");
    }
}
