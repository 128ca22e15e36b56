//! Integration tests for configuration and client construction.

use std::sync::Arc;

use github_api::clients::{HttpClient, HttpMethod, HttpRequest, RateLimiter};
use github_api::{ApiVersion, BaseUrl, ConfigError, Credentials, GitHubConfig};
use tokio_test::{assert_err, assert_ok};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[test]
fn test_base_url_validation() {
    assert_ok!(BaseUrl::new("https://api.github.com"));
    assert_ok!(BaseUrl::new("http://localhost:8080/api/v3/"));
    assert_err!(BaseUrl::new("ftp://example.com"));
    assert_err!(BaseUrl::new("not a url"));
}

#[test]
fn test_api_version_round_trips_through_display() {
    let version = assert_ok!("2022-11-28".parse::<ApiVersion>());
    assert_eq!(version.to_string(), "2022-11-28");
    assert_err!("latest".parse::<ApiVersion>());
}

#[test]
fn test_empty_token_is_rejected() {
    let error = assert_err!(Credentials::token("   "));
    assert!(matches!(error, ConfigError::EmptyAccessToken));
}

#[test]
fn test_client_sends_configured_version_header() {
    let config = assert_ok!(GitHubConfig::builder()
        .api_version(ApiVersion::Custom("2026-03-10".to_string()))
        .build());
    let client = assert_ok!(HttpClient::new(&config));

    let version = client
        .default_headers()
        .get("x-github-api-version")
        .and_then(|value| value.to_str().ok());
    assert_eq!(version, Some("2026-03-10"));
}

#[test]
fn test_anonymous_client_has_no_authorization_header() {
    let config = assert_ok!(GitHubConfig::builder().build());
    let client = assert_ok!(HttpClient::new(&config));
    assert!(client.default_headers().get("authorization").is_none());
}

#[tokio::test]
async fn test_clients_can_share_a_rate_limiter() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user"))
        .and(header("authorization", "Bearer shared-token"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("x-ratelimit-limit", "5000")
                .insert_header("x-ratelimit-remaining", "4321")
                .insert_header("x-ratelimit-reset", "1893456000")
                .insert_header("x-ratelimit-resource", "core")
                .set_body_json(serde_json::json!({"login": "octocat"})),
        )
        .mount(&server)
        .await;

    let config = assert_ok!(GitHubConfig::builder()
        .base_url(assert_ok!(BaseUrl::new(server.uri())))
        .credentials(assert_ok!(Credentials::token("shared-token")))
        .build());

    let limiter = Arc::new(RateLimiter::new());
    let first = assert_ok!(HttpClient::new(&config)).with_rate_limiter(Arc::clone(&limiter));
    let second = assert_ok!(HttpClient::new(&config)).with_rate_limiter(Arc::clone(&limiter));

    let request = assert_ok!(HttpRequest::builder(HttpMethod::Get, "user").build());
    assert_ok!(first.send(request).await);

    let rate = second.rate_limit("core").unwrap();
    assert_eq!(rate.remaining, 4321);
    assert_eq!(rate.limit, 5000);
}
