use esg_spider::error::FetchError;
use esg_spider::esg::de::{parse, Strictness};
use esg_spider::esg::fetch::{HttpSource, Source};
use esg_spider::CompanyScore;
use httpmock::{Method::GET, MockServer};
use std::time::Duration;

fn client() -> reqwest::Client {
    esg_spider::std_client_build("esg-spider-tests", Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn body_is_returned_verbatim() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/v1/esg");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"companies":[{"name":"Acme","esg_score":88.2}]}"#);
    });

    let source = HttpSource::new(client(), server.url("/v1/esg"));
    let body = source.fetch().await.unwrap();

    mock.assert();
    assert_eq!(
        parse(&body, Strictness::Strict),
        vec![CompanyScore::new("Acme", 88.2)]
    );
}

#[tokio::test]
async fn user_agent_is_sent() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/v1/esg")
            .header("user-agent", "esg-spider-tests");
        then.status(200).body("{}");
    });

    let source = HttpSource::new(client(), server.url("/v1/esg"));
    source.fetch().await.unwrap();
    mock.assert();
}

#[tokio::test]
async fn server_errors_are_fetch_errors() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/v1/esg");
        then.status(429).body("slow down");
    });

    let source = HttpSource::new(client(), server.url("/v1/esg"));
    match source.fetch().await {
        Err(FetchError::Status { status, url }) => {
            assert_eq!(status, 429);
            assert_eq!(url, source.url());
        }
        other => panic!("expected a status error, got {other:?}"),
    }
    mock.assert();
}

#[tokio::test]
async fn empty_url_is_a_request_error() {
    let source = HttpSource::new(client(), "");
    assert!(matches!(
        source.fetch().await,
        Err(FetchError::Request { .. })
    ));
}

#[tokio::test]
async fn refused_connection_is_a_request_error() {
    // bind then drop, so nothing is listening on the port
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();

    let source = HttpSource::new(client(), format!("http://127.0.0.1:{port}/v1/esg"));
    assert!(matches!(
        source.fetch().await,
        Err(FetchError::Request { .. })
    ));
}
