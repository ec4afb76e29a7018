//! Integration tests for [`HttpDirectory`] and an end-to-end resolve over
//! wiremock.

use std::time::Duration;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use wayfinder::{GatewayDirectory, HttpDirectory, ResolverConfig, Wayfinder, WayfinderError};

const TX_ID: &str = "abcdefghijABCDEFGHIJ0123456789-_abcdefghijk";

#[tokio::test]
async fn lists_registered_gateways() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/gateways"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "items": [
                { "settings": { "fqdn": "ar-io.dev" } },
                { "settings": { "fqdn": "permagate.io" } }
            ],
            "hasMore": false
        })))
        .mount(&server)
        .await;

    let dir = HttpDirectory::new(format!("{}/gateways", server.uri()));
    let hosts: Vec<_> = dir.list().await.unwrap().into_iter().map(|c| c.host).collect();

    assert_eq!(hosts, vec!["ar-io.dev", "permagate.io"]);
}

#[tokio::test]
async fn server_error_is_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let dir = HttpDirectory::new(server.uri());
    let err = dir.list().await.unwrap_err();

    assert!(matches!(err, WayfinderError::Api { status: 500, .. }));
}

#[tokio::test]
async fn unparseable_body_is_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>nope</html>"))
        .mount(&server)
        .await;

    let dir = HttpDirectory::new(server.uri());
    assert!(matches!(dir.list().await, Err(WayfinderError::Json(_))));
}

#[tokio::test]
async fn resolves_through_directory_and_probe() {
    let server = MockServer::start().await;
    let gateway = server.address().to_string();

    Mock::given(method("GET"))
        .and(path("/gateways"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!([{ "host": gateway }])),
        )
        .mount(&server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("HEAD"))
        .and(path(format!("/{TX_ID}")))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let resolver = Wayfinder::builder()
        .directory_url(format!("{}/gateways", server.uri()))
        .config(
            ResolverConfig::new()
                .scheme("http")
                .probe_timeout(Duration::from_millis(500)),
        )
        .build()
        .unwrap();

    assert_eq!(resolver.best_gateway().await, gateway);
    assert_eq!(
        resolver.routable_url(TX_ID, None).await,
        format!("http://{gateway}/{TX_ID}")
    );
}

#[tokio::test]
async fn unreachable_directory_falls_back() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let resolver = Wayfinder::builder()
        .directory_url(server.uri())
        .fallback_host("https://ar-io.dev/")
        .build()
        .unwrap();

    assert_eq!(resolver.best_gateway().await, "ar-io.dev");
}

#[tokio::test]
async fn stalled_directory_falls_back_within_limit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!([{ "host": "a.example" }]))
                .set_delay(Duration::from_secs(30)),
        )
        .mount(&server)
        .await;

    let resolver = Wayfinder::builder()
        .directory_url(server.uri())
        .config(ResolverConfig::new().directory_timeout(Duration::from_millis(200)))
        .build()
        .unwrap();

    let both = async { tokio::join!(resolver.best_gateway(), resolver.best_gateway()) };
    let (first, second) = tokio::time::timeout(Duration::from_secs(5), both)
        .await
        .expect("resolution should not wait on a stalled directory");

    assert_eq!(first, "arweave.net");
    assert_eq!(second, "arweave.net");
}

#[tokio::test]
async fn static_gateway_urls_are_probed_as_hosts() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    // Listed with scheme and trailing slash, as users tend to write them.
    let resolver = Wayfinder::builder()
        .gateways([format!("{}/", server.uri())])
        .config(
            ResolverConfig::new()
                .scheme("http")
                .fallback_host("fallback.example")
                .probe_timeout(Duration::from_millis(500)),
        )
        .build()
        .unwrap();

    assert_eq!(resolver.best_gateway().await, server.address().to_string());
}
