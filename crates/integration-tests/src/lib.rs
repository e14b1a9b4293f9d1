//! Integration tests for Sugar Maple.
//!
//! These tests exercise a *running* server end to end over HTTP, so they
//! are `#[ignore]`d by default.
//!
//! # Running Tests
//!
//! ```bash
//! # Start PostgreSQL and run migrations
//! sm-cli migrate
//!
//! # Start the server
//! cargo run -p sugar-maple-server
//!
//! # Run integration tests
//! cargo test -p sugar-maple-integration-tests -- --ignored
//! ```
//!
//! # Environment Variables
//!
//! - `STORE_BASE_URL` - Server base URL (default: `http://localhost:3000`)
//! - `STORE_ADMIN_EMAIL` / `STORE_ADMIN_PASSWORD` - Credentials the tests
//!   use to sign in; must match the server's configured pair

#![cfg_attr(not(test), forbid(unsafe_code))]

use reqwest::Client;
use serde_json::json;

/// Base URL for the store API (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("STORE_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// A plain client with cookie support (no identity).
///
/// # Panics
///
/// Panics if the client cannot be constructed.
#[must_use]
pub fn anonymous_client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

/// A client signed in as the configured admin.
///
/// # Panics
///
/// Panics if sign-in fails; check `STORE_ADMIN_EMAIL` /
/// `STORE_ADMIN_PASSWORD` against the server's configuration.
pub async fn admin_client() -> Client {
    let client = anonymous_client();

    let email = std::env::var("STORE_ADMIN_EMAIL")
        .unwrap_or_else(|_| "admin@sugarmaple.shop".to_string());
    let password =
        std::env::var("STORE_ADMIN_PASSWORD").expect("STORE_ADMIN_PASSWORD must be set");

    let resp = client
        .post(format!("{}/api/auth/admin/sign-in", base_url()))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("Failed to reach sign-in endpoint");

    assert!(
        resp.status().is_success(),
        "admin sign-in failed: {}",
        resp.status()
    );

    client
}
