mod common;

use anyhow::Result;
use futures::future::join_all;
use reqwest::StatusCode;
use serde_json::Value;

use common::{TestServer, CHANNEL1, CHANNEL2, USER1, USER2};

const WRITERS: usize = 10;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_appends_keep_every_item() -> Result<()> {
    let server = TestServer::start().await?;
    let path = format!("/channel/{}/item", CHANNEL1);

    let slugs: Vec<String> = (0..WRITERS).map(|i| format!("burst-{}", i)).collect();
    let requests = slugs.iter().map(|slug| {
        let path = &path;
        let server = &server;
        async move {
            server
                .auth_post(USER1, path, &[("itemSlug", slug.as_str()), ("title", slug.as_str())])
                .await
        }
    });

    for res in join_all(requests).await {
        assert_eq!(res?.status(), StatusCode::OK);
    }

    let list: Value = server.auth_get(USER1, &path).await?.json().await?;
    for slug in &slugs {
        assert_eq!(list[slug.as_str()], slug.as_str(), "lost {}", slug);
    }
    // Two fixture items plus every appended one
    assert_eq!(list.as_object().map(|o| o.len()), Some(WRITERS + 2));
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn appends_to_different_channels_do_not_interfere() -> Result<()> {
    let server = TestServer::start().await?;
    let targets = [(USER1, CHANNEL1), (USER2, CHANNEL2)];

    let requests = (0..WRITERS).map(|i| {
        let (user, channel) = targets[i % 2];
        let server = &server;
        async move {
            let slug = format!("mixed-{}", i);
            server
                .auth_post(
                    user,
                    &format!("/channel/{}/item", channel),
                    &[("itemSlug", slug.as_str()), ("title", "Mixed")],
                )
                .await
        }
    });

    for res in join_all(requests).await {
        assert_eq!(res?.status(), StatusCode::OK);
    }

    let first: Value = server
        .auth_get(USER1, &format!("/channel/{}/item", CHANNEL1))
        .await?
        .json()
        .await?;
    let second: Value = server
        .auth_get(USER1, &format!("/channel/{}/item", CHANNEL2))
        .await?
        .json()
        .await?;
    assert_eq!(first.as_object().map(|o| o.len()), Some(WRITERS / 2 + 2));
    assert_eq!(second.as_object().map(|o| o.len()), Some(WRITERS / 2));
    Ok(())
}
