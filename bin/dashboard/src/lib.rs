//! PharmaEC admin dashboard.
//!
//! This crate provides the Leptos-based web interface for the PharmaEC
//! pharmacy-chain backend, and the shell server that serves it and relays
//! `/api/v1` calls to the backend.

#![allow(non_snake_case)]

pub mod app;
pub mod browser;
pub mod components;
pub mod context;
pub mod pages;

#[cfg(feature = "ssr")]
pub mod config;
#[cfg(feature = "ssr")]
pub mod error;
#[cfg(feature = "ssr")]
pub mod proxy;

#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    use crate::app::App;
    console_error_panic_hook::set_once();
    leptos::mount::hydrate_body(App);
}
