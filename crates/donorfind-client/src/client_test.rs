use super::*;

fn test_client(base_url: &str) -> DonorApiClient {
    DonorApiClient::with_base_url(base_url, 30, "donorfind-test")
        .expect("client construction should not fail")
}

#[test]
fn endpoint_appends_to_root() {
    let client = test_client("http://localhost:8000");
    let url = client.endpoint("donors/42", &[]).unwrap();
    assert_eq!(url.as_str(), "http://localhost:8000/donors/42");
}

#[test]
fn endpoint_keeps_base_path_prefix() {
    let client = test_client("https://api.example.org/v1/");
    let url = client.endpoint("donors/42/crawl", &[]).unwrap();
    assert_eq!(url.as_str(), "https://api.example.org/v1/donors/42/crawl");
}

#[test]
fn endpoint_encodes_query_values() {
    let client = test_client("http://localhost:8000");
    let url = client
        .endpoint(
            "donors",
            &[("q", "arts & culture".to_string()), ("limit", "25".to_string())],
        )
        .unwrap();
    assert!(
        url.as_str().contains("q=arts+%26+culture") || url.as_str().contains("q=arts%20%26%20culture"),
        "query param should be percent-encoded: {url}"
    );
    assert!(url.as_str().ends_with("limit=25"), "{url}");
}

#[test]
fn endpoint_without_query_has_no_question_mark() {
    let client = test_client("http://localhost:8000");
    let url = client.endpoint("donors/search/semantic", &[]).unwrap();
    assert!(url.query().is_none());
}

#[test]
fn invalid_base_url_is_rejected() {
    let result = DonorApiClient::with_base_url("not a url", 30, "donorfind-test");
    assert!(matches!(result, Err(ApiError::InvalidBaseUrl { .. })));
}

#[test]
fn status_error_message_embeds_status_and_body() {
    let err = ApiError::Status {
        status: 500,
        reason: "Internal Server Error".to_string(),
        url: "http://localhost:8000/donors/42/enrich".to_string(),
        body: "apollo down".to_string(),
    };
    assert_eq!(err.to_string(), "500 Internal Server Error: apollo down");
    assert_eq!(err.status(), Some(500));
}
