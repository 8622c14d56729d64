mod common;

use anyhow::Result;
use common::{names, spawn_server, TEST_PASSWORD};
use reqwest::StatusCode;
use serde_json::Value;

#[tokio::test]
async fn list_users_basic() -> Result<()> {
    let server = spawn_server().await?;
    let token = server.token().await?;

    let (status, body) = server.get("/", &token).await?;
    assert_eq!(status, StatusCode::OK, "expected 200 OK, got {}", status);
    assert_eq!(body["success"], true);
    assert!(body["data"].is_array(), "data should be an array: {}", body);
    assert_eq!(names(&body), vec!["Owner Account"]);
    Ok(())
}

#[tokio::test]
async fn create_and_fetch_record() -> Result<()> {
    let server = spawn_server().await?;
    let token = server.token().await?;

    let res = server
        .client
        .post(server.url("/"))
        .bearer_auth(&token)
        .form(&[
            ("email", "new@example.com"),
            ("password", TEST_PASSWORD),
            ("name", "Newly Created"),
            ("age", "22"),
            ("number", "-5"),
            ("date", "2022-02-02T02:02:02Z"),
        ])
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let created = res.json::<Value>().await?["data"].clone();
    assert_eq!(created["number"], -5);

    let (status, body) = server.get(&format!("/{}", created["id"]), &token).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], "new@example.com");
    assert_eq!(body["data"]["date"], "2022-02-02T02:02:02Z");
    Ok(())
}

#[tokio::test]
async fn record_errors() -> Result<()> {
    let server = spawn_server().await?;
    let token = server.token().await?;

    let (status, body) = server.get("/abc", &token).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid id");

    let (status, body) = server.get("/9999", &token).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");

    let (status, body) = server.put("/9999", &token, &[("name", "Nobody Here")]).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    Ok(())
}

#[tokio::test]
async fn update_record_partially() -> Result<()> {
    let server = spawn_server().await?;
    let (token, user) = server.signup("carol@example.com", "Carol Example", 33, 4, "2021-01-01T00:00:00Z").await?;
    let path = format!("/{}", user["id"]);

    let (status, body) = server.put(&path, &token, &[("age", "34"), ("name", "")]).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["age"], 34);
    assert_eq!(body["data"]["name"], "Carol Example");

    let (status, body) = server.put(&path, &token, &[("date", "soon")]).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid value for date");

    let (status, _) = server.put(&path, &token, &[("name", "Cat")]).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn delete_record_is_soft() -> Result<()> {
    let server = spawn_server().await?;
    let token = server.token().await?;
    let (_, other) = server.signup("gone@example.com", "Going Away", 50, 0, "2021-01-01T00:00:00Z").await?;
    let path = format!("/{}", other["id"]);

    let (status, _) = server.delete(&path, &token).await?;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(server.get(&path, &token).await?.0, StatusCode::NOT_FOUND);
    assert_eq!(server.delete(&path, &token).await?.0, StatusCode::NOT_FOUND);
    assert_eq!(names(&server.get("/", &token).await?.1), vec!["Owner Account"]);

    // The email is free again once the holder is gone.
    server.signup("gone@example.com", "Came Back", 51, 0, "2021-01-01T00:00:00Z").await?;
    Ok(())
}

#[tokio::test]
async fn bulk_update_and_delete_by_filter() -> Result<()> {
    let server = spawn_server().await?;
    let token = server.token().await?;
    server.signup("y1@example.com", "Young One", 10, 1, "2021-01-01T00:00:00Z").await?;
    server.signup("y2@example.com", "Young Two", 12, 2, "2021-01-01T00:00:00Z").await?;

    let (status, body) = server.put("/?age=%3C18", &token, &[("number", "100")]).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["updated"], 2);

    let (_, body) = server.get("/?number=100&Order=name&OrderDir=ASC", &token).await?;
    assert_eq!(names(&body), vec!["Young One", "Young Two"]);

    let (status, body) = server.put("/?age=%3C18", &token, &[]).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["updated"], 0);

    let (status, body) = server.delete("/?number=100", &token).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["deleted"], 2);
    assert_eq!(names(&server.get("/", &token).await?.1), vec!["Owner Account"]);
    Ok(())
}

#[tokio::test]
async fn me_update() -> Result<()> {
    let server = spawn_server().await?;
    let token = server.token().await?;

    let (status, body) = server.put("/me", &token, &[("number", "-42")]).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["number"], -42);
    assert_eq!(body["data"]["email"], "owner@example.com");
    Ok(())
}
