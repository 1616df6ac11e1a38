use std::time::Duration;

use aiweb_core::{ApiClient, UnexpectedStatus, WeatherApi};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn get_weather_sends_the_city_percent_encoded() {
    let server = MockServer::start().await;

    // wiremock decodes the query string, so matching on the raw value proves
    // the wire form arrived correctly escaped.
    Mock::given(method("GET"))
        .and(path("/ai/weather"))
        .and(query_param("city", "New York"))
        .respond_with(ResponseTemplate::new(200).set_body_string("cloudy, 18C"))
        .expect(1)
        .mount(&server)
        .await;

    let api = ApiClient::new(&server.uri()).expect("client must build");
    let body = api.get_weather("New York").await.expect("request must succeed");

    assert_eq!(body, "cloudy, 18C");
}

#[tokio::test]
async fn search_parses_a_json_array_of_strings() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ai/weather"))
        .and(query_param("city", "Kyiv"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(r#"["Kyiv: sunny", "Kyiv: 21C"]"#),
        )
        .expect(1)
        .mount(&server)
        .await;

    let api = ApiClient::new(&server.uri()).expect("client must build");
    let results = api.search("Kyiv").await.expect("request must succeed");

    assert_eq!(results, ["Kyiv: sunny", "Kyiv: 21C"]);
}

#[tokio::test]
async fn both_operations_issue_the_same_request_path() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ai/weather"))
        .and(query_param("city", "Odesa"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
        .expect(2)
        .mount(&server)
        .await;

    let api = ApiClient::new(&server.uri()).expect("client must build");

    api.get_weather("Odesa").await.expect("get_weather must succeed");
    api.search("Odesa").await.expect("search must succeed");
}

#[tokio::test]
async fn relative_prefix_resolves_against_the_configured_origin() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ai/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&server)
        .await;

    // Trailing slash on the origin must not break the prefix join.
    let origin = format!("{}/", server.uri());
    let api = ApiClient::new(&origin).expect("client must build");

    api.get_weather("Kyiv").await.expect("request must succeed");
}

#[tokio::test]
async fn non_success_status_surfaces_as_typed_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ai/weather"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let api = ApiClient::new(&server.uri()).expect("client must build");
    let err = api.get_weather("Kyiv").await.expect_err("500 must fail");

    let status = err.downcast_ref::<UnexpectedStatus>().expect("typed status error");
    assert_eq!(status.status.as_u16(), 500);
    assert_eq!(status.body, "boom");
    assert_eq!(status.path, "/ai/weather?city=Kyiv");
}

#[tokio::test]
async fn requests_exceeding_the_timeout_fail_as_timeouts() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ai/weather"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(30)))
        .mount(&server)
        .await;

    let api = ApiClient::with_timeout(&server.uri(), Duration::from_millis(250))
        .expect("client must build");
    let err = api.get_weather("Kyiv").await.expect_err("delayed response must time out");

    let timed_out = err
        .chain()
        .any(|cause| cause.downcast_ref::<reqwest::Error>().is_some_and(reqwest::Error::is_timeout));

    assert!(timed_out, "expected a timeout failure, got: {err:#}");
}
