#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use reqwest::{Client, Response};
use tokio::net::TcpListener;

use channel_api::config::AppConfig;
use channel_api::database::models::{ChannelRecord, ItemRecord, UserRecord};
use channel_api::database::{MemoryStore, Store};
use axum::Router;

use channel_api::app::{routes, with_reporting};
use channel_api::AppState;

pub const SECRET: &str = "SUP3R_S33CR37";
pub const USER1: &str = "testuser1";
pub const USER2: &str = "testuser2";
/// Never registered
pub const BAD_USER: &str = "baduser1";

pub const CHANNEL1: &str = "test-channel-1";
pub const CHANNEL1_TITLE: &str = "Test Channel 1";
pub const CHANNEL2: &str = "test-channel-2";
pub const CHANNEL2_TITLE: &str = "Test Channel 2";
pub const ITEM1: &str = "test-item-1";
pub const ITEM1_TITLE: &str = "Test Item 1";
pub const ITEM2: &str = "test-item-2";
pub const ITEM2_TITLE: &str = "Test Item 2";
pub const ITEM_DATA: &str = "/9j/4AAQSkZJRgABAQEASABIAAD/2wBDAP8=";

pub struct TestServer {
    pub base_url: String,
    pub store: Arc<dyn Store>,
    client: Client,
}

impl TestServer {
    /// Serve the router over a fresh seeded memory store on an unused port
    pub async fn start() -> Result<Self> {
        Self::start_with(AppConfig::development()).await
    }

    pub async fn start_with(config: AppConfig) -> Result<Self> {
        Self::start_with_routes(config, routes()).await
    }

    /// Serve `routes` behind the same reporting and authentication layers
    pub async fn start_with_routes(mut config: AppConfig, routes: Router<AppState>) -> Result<Self> {
        config.api.enable_request_logging = false;

        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        load_fixtures(store.as_ref()).await?;

        let router = with_reporting(routes, AppState::new(store.clone(), config));

        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let listener = TcpListener::bind(("127.0.0.1", port))
            .await
            .context("failed to bind test listener")?;

        tokio::spawn(async move {
            axum::serve(listener, router).await.ok();
        });

        Ok(Self {
            base_url: format!("http://127.0.0.1:{}", port),
            store,
            client: Client::new(),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn auth_header(username: &str) -> String {
        format!("Bearer {}:{}", SECRET, username)
    }

    pub async fn auth_get(&self, username: &str, path: &str) -> Result<Response> {
        Ok(self
            .client
            .get(self.url(path))
            .header("Authorization", Self::auth_header(username))
            .send()
            .await?)
    }

    pub async fn unauth_get(&self, path: &str) -> Result<Response> {
        Ok(self.client.get(self.url(path)).send().await?)
    }

    pub async fn auth_post(&self, username: &str, path: &str, params: &[(&str, &str)]) -> Result<Response> {
        Ok(self
            .client
            .post(self.url(path))
            .header("Authorization", Self::auth_header(username))
            .form(params)
            .send()
            .await?)
    }

    pub async fn unauth_post(&self, path: &str, params: &[(&str, &str)]) -> Result<Response> {
        Ok(self.client.post(self.url(path)).form(params).send().await?)
    }

    /// Send with an arbitrary header name and value
    pub async fn raw_header_do(
        &self,
        method: reqwest::Method,
        path: &str,
        header: &str,
        value: &str,
    ) -> Result<Response> {
        Ok(self
            .client
            .request(method, self.url(path))
            .header(header, value)
            .send()
            .await?)
    }
}

async fn load_fixtures(store: &dyn Store) -> Result<()> {
    store.insert_user(&UserRecord::new(USER1)).await?;
    store.insert_user(&UserRecord::new(USER2)).await?;
    // BAD_USER intentionally omitted

    let mut channel1 = ChannelRecord::new(CHANNEL1, CHANNEL1_TITLE, Some(USER1.to_string()));
    for (slug, title) in [(ITEM1, ITEM1_TITLE), (ITEM2, ITEM2_TITLE)] {
        channel1.items.push(ItemRecord {
            slug: slug.to_string(),
            title: title.to_string(),
            date_uploaded: Utc::now(),
            data: ITEM_DATA.to_string(),
            uploader: USER1.to_string(),
        });
    }
    store.insert_channel(&channel1).await?;

    let channel2 = ChannelRecord::new(CHANNEL2, CHANNEL2_TITLE, Some(USER2.to_string()));
    store.insert_channel(&channel2).await?;

    Ok(())
}
