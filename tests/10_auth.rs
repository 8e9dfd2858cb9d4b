mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn health_endpoint_responds() -> Result<()> {
    let Some(server) = common::server_if_configured().await? else {
        return Ok(());
    };
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/health", server.base_url))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["data"]["database"], "ok");
    Ok(())
}

#[tokio::test]
async fn protected_routes_reject_missing_and_malformed_headers() -> Result<()> {
    let Some(server) = common::server_if_configured().await? else {
        return Ok(());
    };
    let client = reqwest::Client::new();
    let url = format!("{}/api/references", server.base_url);

    // No header at all
    let res = client.get(&url).send().await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body = res.json::<Value>().await?;
    assert_eq!(body["code"], "AUTHENTICATION_FAILED");
    assert_eq!(body["message"], "authorization header required");

    // Wrong scheme
    let res = client
        .get(&url)
        .header("Authorization", "Basic dXNlcjpwYXNz")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body = res.json::<Value>().await?;
    assert_eq!(body["message"], "invalid security scheme");

    // Not a real token
    let res = client
        .get(&url)
        .header("Authorization", "Bearer not.a.token")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body = res.json::<Value>().await?;
    assert_eq!(body["message"], "authentication failed");

    Ok(())
}

#[tokio::test]
async fn login_with_unknown_user_is_unauthorized() -> Result<()> {
    let Some(server) = common::server_if_configured().await? else {
        return Ok(());
    };
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/auth/login", server.base_url))
        .json(&json!({"name": "no-such-user-ever", "password": "whatever"}))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn signup_rejects_short_credentials() -> Result<()> {
    let Some(server) = common::server_if_configured().await? else {
        return Ok(());
    };
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/auth/signup", server.base_url))
        .json(&json!({"name": "abc", "password": "secretpw"}))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = res.json::<Value>().await?;
    assert_eq!(body["code"], "INVALID_PARAMETER");
    Ok(())
}
