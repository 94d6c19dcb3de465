#![allow(dead_code)]

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

use game_api_rust::config::AppConfig;
use game_api_rust::{app, AppState};

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub client: Client,
}

impl TestServer {
    /// Start the API on an unused port with a fresh in-memory store.
    pub async fn spawn() -> Result<Self> {
        Self::spawn_with(AppConfig::for_tests()).await
    }

    pub async fn spawn_with(config: AppConfig) -> Result<Self> {
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .context("failed to bind test listener")?;
        let router = app(AppState::in_memory(config));
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        let server = Self {
            port,
            base_url,
            client: Client::new(),
        };
        server.wait_ready(Duration::from_secs(5)).await?;
        Ok(server)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if let Ok(resp) = self.client.get(self.url("/health")).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Register `email` and sign in, returning the bearer token.
    pub async fn sign_up_and_in(&self, email: &str, password: &str) -> Result<String> {
        let resp = self
            .client
            .post(self.url("/sign-up"))
            .json(&json!({
                "credentials": {
                    "email": email,
                    "password": password,
                    "password_confirmation": password
                }
            }))
            .send()
            .await?;
        anyhow::ensure!(resp.status() == StatusCode::CREATED, "sign-up failed: {}", resp.status());

        let resp = self
            .client
            .post(self.url("/sign-in"))
            .json(&json!({ "credentials": { "email": email, "password": password } }))
            .send()
            .await?;
        anyhow::ensure!(resp.status() == StatusCode::CREATED, "sign-in failed: {}", resp.status());

        let body: Value = resp.json().await?;
        body["user"]["token"]
            .as_str()
            .map(str::to_string)
            .context("sign-in response carried no token")
    }

    /// Create a game as the holder of `token`, returning its JSON.
    pub async fn create_game(&self, token: &str, game: Value) -> Result<Value> {
        let resp = self
            .client
            .post(self.url("/games"))
            .bearer_auth(token)
            .json(&json!({ "game": game }))
            .send()
            .await?;
        anyhow::ensure!(resp.status() == StatusCode::CREATED, "create failed: {}", resp.status());
        let body: Value = resp.json().await?;
        Ok(body["game"].clone())
    }
}
