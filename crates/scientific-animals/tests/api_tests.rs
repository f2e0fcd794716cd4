//! End-to-end tests of the HTTP surface with external services mocked

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use mockito::{Matcher, Mock, ServerGuard};
use serde_json::{json, Value};
use tower::ServiceExt;

use scientific_animals::{AppConfig, ScientificNameServer};

const ANSWER: &str = "Panthera leo";

fn config_for(server: &ServerGuard) -> AppConfig {
    let mut config = AppConfig::default();
    config.sources.wikipedia.base_url = server.url();
    config.sources.arxiv.api_url = format!("{}/api/query", server.url());
    config.sources.arxiv.full_text = false;
    config.llm.base_url = format!("{}/hf", server.url());
    config.llm.api_token = Some("hf_test".to_string());
    config.embeddings.dimensions = 3;
    config.embeddings.batch_size = 1;
    config
}

fn router(config: AppConfig) -> Router {
    ScientificNameServer::new(config).unwrap().router()
}

async fn post(router: Router, body: Body, content_type: Option<&str>) -> (StatusCode, Value) {
    let mut request = Request::builder().method("POST").uri("/scientific-name");
    if let Some(content_type) = content_type {
        request = request.header("content-type", content_type);
    }

    let response = router.oneshot(request.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn mock_services(server: &mut ServerGuard) -> Vec<Mock> {
    let search = server
        .mock("GET", "/w/api.php")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("list".into(), "search".into()),
            Matcher::UrlEncoded("srsearch".into(), "lion".into()),
        ]))
        .with_header("content-type", "application/json")
        .with_body(r#"{"query": {"search": [{"title": "Lion"}]}}"#)
        .create_async()
        .await;
    let page = server
        .mock("GET", "/w/api.php")
        .match_query(Matcher::UrlEncoded("titles".into(), "Lion".into()))
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"query": {"pages": [{
                "title": "Lion",
                "fullurl": "https://en.wikipedia.org/wiki/Lion",
                "extract": "The lion (Panthera leo) is a large cat of the genus Panthera."
            }]}}"#,
        )
        .create_async()
        .await;
    let arxiv = server
        .mock("GET", "/api/query")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("search_query".into(), "lion".into()),
            Matcher::UrlEncoded("max_results".into(), "2".into()),
        ]))
        .with_header("content-type", "application/atom+xml")
        .with_body(
            r#"<feed xmlns="http://www.w3.org/2005/Atom"><entry>
                <id>http://arxiv.org/abs/2101.00001v1</id>
                <published>2021-01-04T18:00:00Z</published>
                <title>Counting Lions</title>
                <summary>A census of Panthera leo populations.</summary>
                <author><name>Ada Lovelace</name></author>
            </entry></feed>"#,
        )
        .create_async()
        .await;
    // Two chunk embeddings plus the question embedding
    let embed = server
        .mock("POST", "/hf/sentence-transformers/all-MiniLM-L6-v2/pipeline/feature-extraction")
        .match_header("authorization", "Bearer hf_test")
        .with_header("content-type", "application/json")
        .with_body("[[0.1, 0.2, 0.3]]")
        .expect(3)
        .create_async()
        .await;
    let generate = server
        .mock("POST", "/hf/google/flan-t5-base")
        .match_body(Matcher::PartialJson(json!({
            "parameters": { "temperature": 0.2, "max_length": 256 }
        })))
        .with_header("content-type", "application/json")
        .with_body(json!([{ "generated_text": ANSWER }]).to_string())
        .expect(1)
        .create_async()
        .await;

    vec![search, page, arxiv, embed, generate]
}

#[tokio::test]
async fn test_lion_end_to_end() {
    let mut server = mockito::Server::new_async().await;
    let mocks = mock_services(&mut server).await;

    let (status, body) = post(
        router(config_for(&server)),
        Body::from(r#"{"animal": "lion"}"#),
        Some("application/json"),
    )
    .await;

    for mock in &mocks {
        mock.assert_async().await;
    }
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "scientific_name": ANSWER }));
    assert_eq!(body.as_object().unwrap().len(), 1);
}

#[tokio::test]
async fn test_missing_animal_key() {
    let (status, body) = post(
        router(AppConfig::default()),
        Body::from(r#"{"name": "lion"}"#),
        Some("application/json"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Missing 'animal' parameter." }));
}

#[tokio::test]
async fn test_missing_body() {
    let (status, body) = post(router(AppConfig::default()), Body::empty(), None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Missing 'animal' parameter." }));
}

#[tokio::test]
async fn test_invalid_json_body() {
    let (status, body) = post(
        router(AppConfig::default()),
        Body::from("{animal: lion"),
        Some("application/json"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Missing 'animal' parameter." }));
}

#[tokio::test]
async fn test_oversized_body_is_rejected() {
    let body = format!(r#"{{"animal": "lion", "padding": "{}"}}"#, "x".repeat(70 * 1024));

    let (status, _) = post(
        router(AppConfig::default()),
        Body::from(body),
        Some("application/json"),
    )
    .await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_upstream_failure_is_mapped() {
    let mut server = mockito::Server::new_async().await;
    let _wiki = server
        .mock("GET", "/w/api.php")
        .match_query(Matcher::Any)
        .with_status(500)
        .create_async()
        .await;

    let (status, body) = post(
        router(config_for(&server)),
        Body::from(r#"{"animal": "lion"}"#),
        Some("application/json"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"]["type"], "document_source_error");
}

#[tokio::test]
async fn test_health() {
    let response = router(AppConfig::default())
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
