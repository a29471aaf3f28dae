mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::Value;

use common::{TestServer, CHANNEL1, CHANNEL1_TITLE, CHANNEL2, CHANNEL2_TITLE, ITEM1, ITEM2, USER1, USER2};

#[tokio::test]
async fn get_channel_list() -> Result<()> {
    let server = TestServer::start().await?;
    let res = server.auth_get(USER1, "/channel").await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = res.json().await?;
    assert_eq!(body[CHANNEL1], CHANNEL1_TITLE);
    assert_eq!(body[CHANNEL2], CHANNEL2_TITLE);
    assert_eq!(body.as_object().map(|o| o.len()), Some(2));
    Ok(())
}

#[tokio::test]
async fn get_channel_with_items() -> Result<()> {
    let server = TestServer::start().await?;
    let res = server.auth_get(USER2, &format!("/channel/{}", CHANNEL1)).await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = res.json().await?;
    assert_eq!(body["slug"], CHANNEL1);
    assert_eq!(body["title"], CHANNEL1_TITLE);
    assert_eq!(body["owner"], USER1);

    let items = body["items"].as_array().cloned().unwrap_or_default();
    let slugs: Vec<&str> = items.iter().filter_map(|i| i["slug"].as_str()).collect();
    assert_eq!(slugs, vec![ITEM1, ITEM2]);
    // Payload is only served by the data endpoint
    assert!(items.iter().all(|i| i.get("data").is_none()));
    Ok(())
}

#[tokio::test]
async fn get_missing_channel() -> Result<()> {
    let server = TestServer::start().await?;
    let res = server.auth_get(USER1, "/channel/nosuchchannel").await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let body: Value = res.json().await?;
    assert_eq!(body["error"], "No such channel nosuchchannel");
    Ok(())
}

#[tokio::test]
async fn get_channel_is_idempotent() -> Result<()> {
    let server = TestServer::start().await?;
    let path = format!("/channel/{}", CHANNEL2);
    let first: Value = server.auth_get(USER1, &path).await?.json().await?;
    let second: Value = server.auth_get(USER1, &path).await?.json().await?;
    assert_eq!(first, second);
    Ok(())
}

#[tokio::test]
async fn create_channel_then_fetch() -> Result<()> {
    let server = TestServer::start().await?;
    let res = server
        .auth_post(USER2, "/channel", &[("slug", "fresh"), ("title", "Fresh Channel")])
        .await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let body: Value = server.auth_get(USER1, "/channel/fresh").await?.json().await?;
    assert_eq!(body["title"], "Fresh Channel");
    assert_eq!(body["owner"], USER2);
    assert_eq!(body["items"], serde_json::json!([]));

    let list: Value = server.auth_get(USER1, "/channel").await?.json().await?;
    assert_eq!(list["fresh"], "Fresh Channel");
    Ok(())
}

#[tokio::test]
async fn create_channel_requires_fields() -> Result<()> {
    let server = TestServer::start().await?;

    let res = server.auth_post(USER1, "/channel", &[("title", "No Slug")]).await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    assert_eq!(body["error"], "slug cannot be empty");

    let res = server
        .auth_post(USER1, "/channel", &[("slug", "untitled"), ("title", "")])
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    assert_eq!(body["error"], "title cannot be empty");

    let res = server.auth_get(USER1, "/channel/untitled").await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn create_duplicate_channel() -> Result<()> {
    let server = TestServer::start().await?;
    let res = server
        .auth_post(USER2, "/channel", &[("slug", CHANNEL1), ("title", "doesn't matter")])
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    assert_eq!(body["error"], format!("Channel {} already exists", CHANNEL1));

    let channel: Value = server
        .auth_get(USER1, &format!("/channel/{}", CHANNEL1))
        .await?
        .json()
        .await?;
    assert_eq!(channel["title"], CHANNEL1_TITLE);
    assert_eq!(channel["owner"], USER1);
    assert_eq!(channel["items"].as_array().map(Vec::len), Some(2));
    Ok(())
}

#[tokio::test]
async fn create_channel_without_auth() -> Result<()> {
    let server = TestServer::start().await?;
    let res = server
        .unauth_post("/channel", &[("slug", "anon"), ("title", "Anon")])
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = server.auth_get(USER1, "/channel/anon").await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}
