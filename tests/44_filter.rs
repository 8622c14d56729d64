mod common;

use anyhow::Result;
use common::{names, spawn_server, TestServer};
use reqwest::StatusCode;

// Owner Account (40), Ann Adams (20), Bea Brown (35), Cal Clark (50).
async fn seeded() -> Result<(TestServer, String)> {
    let server = spawn_server().await?;
    let token = server.token().await?;
    server.signup("ann@example.com", "Ann Adams", 20, -3, "2019-05-01T00:00:00Z").await?;
    server.signup("bea@example.com", "Bea Brown", 35, 0, "2020-05-01T00:00:00Z").await?;
    server.signup("cal@example.com", "Cal Clark", 50, 12, "2021-05-01T00:00:00+02:00").await?;
    Ok((server, token))
}

async fn list(server: &TestServer, token: &str, query: &str) -> Result<(StatusCode, Vec<String>, String)> {
    let (status, body) = server.get(&format!("/?{}", query), token).await?;
    let error = body["error"].as_str().unwrap_or_default().to_string();
    Ok((status, names(&body), error))
}

#[tokio::test]
async fn comparison_operators_on_age() -> Result<()> {
    let (server, token) = seeded().await?;
    let by_age = "Order=age&OrderDir=ASC";

    let (_, found, _) = list(&server, &token, &format!("age=%3E%3D35&{}", by_age)).await?;
    assert_eq!(found, vec!["Bea Brown", "Owner Account", "Cal Clark"]);

    let (_, found, _) = list(&server, &token, &format!("age=%3E35&{}", by_age)).await?;
    assert_eq!(found, vec!["Owner Account", "Cal Clark"]);

    let (_, found, _) = list(&server, &token, &format!("age=%3C%3D35&{}", by_age)).await?;
    assert_eq!(found, vec!["Ann Adams", "Bea Brown"]);

    let (_, found, _) = list(&server, &token, &format!("age=%3C%3E40&{}", by_age)).await?;
    assert_eq!(found, vec!["Ann Adams", "Bea Brown", "Cal Clark"]);

    let (_, found, _) = list(&server, &token, "age=20").await?;
    assert_eq!(found, vec!["Ann Adams"]);
    Ok(())
}

#[tokio::test]
async fn filters_combine_with_and() -> Result<()> {
    let (server, token) = seeded().await?;
    let (_, found, _) = list(&server, &token, "age=%3E30&number=%3E%3D0&Order=name&OrderDir=ASC").await?;
    assert_eq!(found, vec!["Bea Brown", "Cal Clark", "Owner Account"]);
    Ok(())
}

#[tokio::test]
async fn date_filters_compare_instants() -> Result<()> {
    let (server, token) = seeded().await?;

    let (status, found, _) = list(&server, &token, "date=%3E2020-01-01T00:00:00Z&Order=date&OrderDir=ASC").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found, vec!["Bea Brown", "Cal Clark"]);

    // 2021-05-01T00:00:00+02:00 is 2021-04-30T22:00:00Z.
    let (_, found, _) = list(&server, &token, "date=2021-04-30T22:00:00Z").await?;
    assert_eq!(found, vec!["Cal Clark"]);
    Ok(())
}

#[tokio::test]
async fn name_filter_is_literal_equality() -> Result<()> {
    let (server, token) = seeded().await?;

    let (_, found, _) = list(&server, &token, "name=Bea%20Brown").await?;
    assert_eq!(found, vec!["Bea Brown"]);

    let (status, found, _) = list(&server, &token, "name=%3EAnn").await?;
    assert_eq!(status, StatusCode::OK);
    assert!(found.is_empty());
    Ok(())
}

#[tokio::test]
async fn invalid_filters_are_rejected() -> Result<()> {
    let (server, token) = seeded().await?;

    let (status, _, error) = list(&server, &token, "age=%3D%3E5").await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error, "Invalid operator for age");

    let (status, _, error) = list(&server, &token, "age=-1").await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error, "Invalid value for age");

    let (_, _, error) = list(&server, &token, "number=%3E2.5").await?;
    assert_eq!(error, "Invalid value for number");

    let (_, _, error) = list(&server, &token, "date=yesterday").await?;
    assert_eq!(error, "Invalid value for date");
    Ok(())
}

#[tokio::test]
async fn ordering_defaults_and_validation() -> Result<()> {
    let (server, token) = seeded().await?;

    let (_, found, _) = list(&server, &token, "").await?;
    assert_eq!(found, vec!["Cal Clark", "Bea Brown", "Ann Adams", "Owner Account"]);

    let (_, found, _) = list(&server, &token, "Order=number").await?;
    assert_eq!(found, vec!["Cal Clark", "Owner Account", "Bea Brown", "Ann Adams"]);

    let (status, _, error) = list(&server, &token, "Order=password").await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error, "Invalid order field");

    let (status, _, error) = list(&server, &token, "Order=age&OrderDir=asc").await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error, "Invalid order direction");
    Ok(())
}

#[tokio::test]
async fn pagination_window() -> Result<()> {
    let (server, token) = seeded().await?;
    let by_age = "Order=age&OrderDir=ASC";

    let (_, found, _) = list(&server, &token, &format!("{}&Limit=2", by_age)).await?;
    assert_eq!(found, vec!["Ann Adams", "Bea Brown"]);

    let (_, found, _) = list(&server, &token, &format!("{}&Limit=2&Offset=2", by_age)).await?;
    assert_eq!(found, vec!["Owner Account", "Cal Clark"]);

    // Offset without a limit is ignored.
    let (_, found, _) = list(&server, &token, &format!("{}&Offset=3", by_age)).await?;
    assert_eq!(found.len(), 4);

    let (status, _, error) = list(&server, &token, "Limit=0").await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error, "Invalid limit");

    let (_, _, error) = list(&server, &token, "Limit=5&Offset=-1").await?;
    assert_eq!(error, "Invalid offset");
    Ok(())
}

#[tokio::test]
async fn empty_parameters_are_ignored() -> Result<()> {
    let (server, token) = seeded().await?;
    let (status, found, _) = list(&server, &token, "age=&name=&Order=&OrderDir=&Limit=&Offset=").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found.len(), 4);
    Ok(())
}
