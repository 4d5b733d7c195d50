use hemero_http::{Auth, HttpClient, HttpError, RequestOpts};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn post_json_decodes_success_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/t"))
        .and(body_json(json!({"from": "es", "to": "en", "q": "hola"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(["hello"])))
        .mount(&server)
        .await;

    let client = HttpClient::new(&server.uri()).expect("client");
    let got: Vec<String> = client
        .post_json(
            "t",
            &json!({"from": "es", "to": "en", "q": "hola"}),
            RequestOpts::default(),
        )
        .await
        .expect("request");

    assert_eq!(got, vec!["hello".to_string()]);
}

#[tokio::test]
async fn auth_and_extra_headers_reach_the_wire() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/t"))
        .and(header("x-rapidapi-key", "k-123"))
        .and(header("x-rapidapi-host", "api.example"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(["ok"])))
        .mount(&server)
        .await;

    let mut headers = HeaderMap::new();
    headers.insert("x-rapidapi-host", HeaderValue::from_static("api.example"));

    let client = HttpClient::new(&server.uri()).expect("client");
    let got: Vec<String> = client
        .post_json(
            "t",
            &json!({"q": "hola"}),
            RequestOpts {
                auth: Some(Auth::Header {
                    name: HeaderName::from_static("x-rapidapi-key"),
                    value: HeaderValue::from_static("k-123"),
                }),
                headers: Some(headers),
                ..Default::default()
            },
        )
        .await
        .expect("request");

    assert_eq!(got, vec!["ok".to_string()]);
}

#[tokio::test]
async fn non_success_status_maps_to_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/t"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({"message": "not subscribed"})))
        .mount(&server)
        .await;

    let client = HttpClient::new(&server.uri()).expect("client");
    let err = client
        .post_json::<_, Vec<String>>("t", &json!({"q": "hola"}), RequestOpts::default())
        .await
        .expect_err("should fail");

    match err {
        HttpError::Api { status, message } => {
            assert_eq!(status.as_u16(), 403);
            assert_eq!(message, "not subscribed");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_body_maps_to_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/t"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let client = HttpClient::new(&server.uri()).expect("client");
    let err = client
        .post_json::<_, Vec<String>>("t", &json!({"q": "hola"}), RequestOpts::default())
        .await
        .expect_err("should fail");

    assert!(matches!(err, HttpError::Decode(..)));
}

#[tokio::test]
async fn get_bytes_returns_body_verbatim() {
    let server = MockServer::start().await;
    let payload: &[u8] = &[0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a];
    Mock::given(method("GET"))
        .and(path("/img/photo.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(payload))
        .mount(&server)
        .await;

    let client = HttpClient::new("https://unused.example").expect("client");
    let absolute = format!("{}/img/photo.jpg", server.uri());
    let got = client
        .get_bytes(
            &absolute,
            RequestOpts {
                allow_absolute: true,
                ..Default::default()
            },
        )
        .await
        .expect("request");

    assert_eq!(got, payload);
}
