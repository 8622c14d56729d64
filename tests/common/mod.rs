#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use lizard_api::config::{AppConfig, Environment};
use lizard_api::database::MemoryStore;
use lizard_api::{app, AppState};
use serde_json::Value;

pub const TEST_SECRET: &str = "integration-test-secret";
pub const TEST_PASSWORD: &str = "correct horse battery";

/// An in-process server on a free port, backed by a fresh in-memory store.
/// It lives as long as the test's runtime.
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub client: reqwest::Client,
}

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::preset(Environment::Test);
    config.security.jwt_secret = TEST_SECRET.to_string();
    config
}

pub async fn spawn_server() -> Result<TestServer> {
    let state = AppState::new(test_config(), Arc::new(MemoryStore::new()))?;

    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app(state)).await;
    });

    Ok(TestServer { port, base_url: format!("http://127.0.0.1:{}", port), client: reqwest::Client::new() })
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Signs up an account and returns `(token, user)`.
    pub async fn signup(&self, email: &str, name: &str, age: u32, number: i32, date: &str) -> Result<(String, Value)> {
        let age = age.to_string();
        let number = number.to_string();
        let res = self
            .client
            .post(self.url("/signup"))
            .form(&[
                ("email", email),
                ("password", TEST_PASSWORD),
                ("name", name),
                ("age", age.as_str()),
                ("number", number.as_str()),
                ("date", date),
            ])
            .send()
            .await?;
        anyhow::ensure!(res.status() == reqwest::StatusCode::CREATED, "signup failed: {}", res.status());

        let body = res.json::<Value>().await?;
        let token = body["data"]["token"].as_str().context("missing token")?.to_string();
        Ok((token, body["data"]["user"].clone()))
    }

    /// Signs up a standard account and returns its token.
    pub async fn token(&self) -> Result<String> {
        let (token, _) = self.signup("owner@example.com", "Owner Account", 40, 0, "2020-01-01T00:00:00Z").await?;
        Ok(token)
    }

    pub async fn get(&self, path: &str, token: &str) -> Result<(reqwest::StatusCode, Value)> {
        let res = self.client.get(self.url(path)).bearer_auth(token).send().await?;
        Ok((res.status(), res.json().await?))
    }

    pub async fn put(&self, path: &str, token: &str, form: &[(&str, &str)]) -> Result<(reqwest::StatusCode, Value)> {
        let res = self.client.put(self.url(path)).bearer_auth(token).form(form).send().await?;
        Ok((res.status(), res.json().await?))
    }

    pub async fn delete(&self, path: &str, token: &str) -> Result<(reqwest::StatusCode, Value)> {
        let res = self.client.delete(self.url(path)).bearer_auth(token).send().await?;
        Ok((res.status(), res.json().await?))
    }
}

pub fn names(body: &Value) -> Vec<String> {
    body["data"]
        .as_array()
        .map(|users| users.iter().filter_map(|u| u["name"].as_str().map(str::to_string)).collect())
        .unwrap_or_default()
}
