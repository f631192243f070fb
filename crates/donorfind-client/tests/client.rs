//! Integration tests for `DonorApiClient` using wiremock HTTP mocks.

use donorfind_client::{ApiError, DonorApiClient, ListQuery, SemanticQuery};
use donorfind_core::{build_profile_view, EnrichmentKind};
use rust_decimal::Decimal;
use wiremock::matchers::{body_json, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> DonorApiClient {
    DonorApiClient::with_base_url(base_url, 30, "donorfind-test")
        .expect("client construction should not fail")
}

#[tokio::test]
async fn list_donors_with_empty_backend_returns_no_items() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/donors"))
        .and(query_param("state", "CA"))
        .and(query_param("limit", "25"))
        .and(query_param_is_missing("offset"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"items": [], "total": 0})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let query = ListQuery {
        state: Some("CA".to_string()),
        limit: 25,
        ..ListQuery::default()
    };
    let page = client.list_donors(&query).await.expect("should parse page");

    assert!(page.items.is_empty());
    assert_eq!(page.total, 0);
}

#[tokio::test]
async fn list_donors_sends_range_filters() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "items": [
            {"id": 1, "name": "Golden Gate Fund", "state": "CA", "city": "San Francisco",
             "assets_total": 2500000, "website": "ggf.org"}
        ],
        "total": 1
    });

    Mock::given(method("GET"))
        .and(path("/donors"))
        .and(query_param("q", "youth"))
        .and(query_param("min_assets", "1000000"))
        .and(query_param("max_assets", "5000000"))
        .and(query_param("offset", "25"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let query = ListQuery {
        q: Some("youth".to_string()),
        min_assets: Some(1_000_000),
        max_assets: Some(5_000_000),
        offset: 25,
        ..ListQuery::default()
    };
    let page = client.list_donors(&query).await.unwrap();

    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].name, "Golden Gate Fund");
    assert_eq!(page.items[0].assets_total, Some(Decimal::from(2_500_000)));
}

#[tokio::test]
async fn list_donors_non_2xx_is_status_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/donors"))
        .respond_with(ResponseTemplate::new(503).set_body_string("database unavailable"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client
        .list_donors(&ListQuery::default())
        .await
        .expect_err("503 should fail");

    assert_eq!(err.status(), Some(503));
    let msg = err.to_string();
    assert!(msg.contains("503"), "{msg}");
    assert!(msg.contains("database unavailable"), "{msg}");
}

#[tokio::test]
async fn donor_detail_parses_and_feeds_profile_view() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "donor": {"id": 42, "name": "Bay Area Children's Fund", "city": "Oakland", "state": "CA",
                  "assets_total": 1234567, "grants_total": null, "website": "bacf.org",
                  "created_at": "2024-01-02T03:04:05.000001"},
        "grants": [{"id": 1, "donor_id": 42, "year": 2023, "amount": 50000,
                    "recipient_name": "Oakland Reads"}],
        "contacts": [{"id": 5, "donor_id": 42, "name": "Ada Park", "title": "ED", "source": "apollo"}],
        "enrichments": [
            {"id": 10, "donor_id": 42, "kind": "company_profile", "source": "firecrawl",
             "url": "https://bacf.org", "created_at": "2024-05-01T00:00:00+00:00",
             "raw": {"about": "Old profile"}},
            {"id": 11, "donor_id": 42, "kind": "company_profile", "source": "firecrawl",
             "url": "https://bacf.org", "created_at": "2024-06-01T00:00:00+00:00",
             "raw": {"about": "New profile", "program_areas": ["Literacy"]}},
            {"id": 12, "donor_id": 42, "kind": "page_markdown", "source": "firecrawl",
             "url": "https://bacf.org/about", "created_at": "2024-06-01T00:00:00+00:00",
             "raw": {"markdown": "# About"}}
        ]
    });

    Mock::given(method("GET"))
        .and(path("/donors/42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let detail = client.donor_detail(42).await.expect("should parse detail");

    assert_eq!(detail.enrichments.len(), 3);
    assert_eq!(detail.enrichments[2].kind, EnrichmentKind::PageMarkdown);

    let view = build_profile_view(
        &detail.donor,
        &detail.enrichments,
        &detail.contacts,
        &detail.grants,
    );
    let profile = view.profile.expect("firecrawl profile expected");
    assert_eq!(profile.enrichment_id, 11);
    assert_eq!(profile.about.as_deref(), Some("New profile"));
    assert_eq!(view.evidence.len(), 1);
    assert_eq!(view.assets, "1,234,567");
    assert_eq!(view.grants[0].amount, "50,000");
}

#[tokio::test]
async fn donor_detail_not_found_is_status_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/donors/999"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(serde_json::json!({"detail": "Donor not found"})),
        )
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.donor_detail(999).await.unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 404, .. }));
    assert!(err.to_string().contains("Donor not found"));
}

#[tokio::test]
async fn donor_detail_malformed_body_is_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/donors/1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy error</html>"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.donor_detail(1).await.unwrap_err();
    assert!(matches!(err, ApiError::Deserialize { .. }), "got: {err:?}");
}

#[tokio::test]
async fn semantic_search_posts_query_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/donors/search/semantic"))
        .and(body_json(serde_json::json!({
            "query": "early childhood in California",
            "state": "CA",
            "limit": 15
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "items": [
                {"id": 3, "name": "First 5 Fund", "state": "CA", "distance": 0.12},
                {"id": 8, "name": "Little Learners", "state": "CA", "distance": 0.31}
            ],
            "count": 2
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let query = SemanticQuery {
        state: Some("CA".to_string()),
        limit: 15,
        ..SemanticQuery::new("early childhood in California")
    };
    let page = client.semantic_search(&query).await.unwrap();

    assert_eq!(page.count, 2);
    assert_eq!(page.items[0].donor.id, 3);
    assert_eq!(page.items[1].distance, Some(0.31));
}

#[tokio::test]
async fn semantic_search_rejects_blank_query_without_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client
        .semantic_search(&SemanticQuery::new("   "))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidQuery(_)));
}

#[tokio::test]
async fn trigger_enrich_failure_surfaces_status() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/donors/42/enrich"))
        .respond_with(ResponseTemplate::new(500).set_body_string("apollo credits exhausted"))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.trigger_enrich(42).await.unwrap_err();
    assert_eq!(err.status(), Some(500));
    assert!(err.to_string().contains("apollo credits exhausted"));
}

#[tokio::test]
async fn trigger_crawl_keeps_json_ack() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/donors/42/crawl"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"id": 42, "crawled": true, "pages": 4})),
        )
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let ack = client.trigger_crawl(42).await.unwrap();
    assert_eq!(ack.status, 200);
    assert_eq!(ack.body.unwrap()["pages"], 4);
}

#[tokio::test]
async fn trigger_accepts_non_json_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/donors/websites/backfill_apollo"))
        .and(query_param("limit", "12"))
        .respond_with(ResponseTemplate::new(202).set_body_string("queued"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let ack = client.backfill_websites(12).await.unwrap();
    assert_eq!(ack.status, 202);
    assert!(ack.body.is_none());
}

#[tokio::test]
async fn dev_endpoints_send_expected_parameters() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/donors/ingest/propublica"))
        .and(query_param("state", "NY"))
        .and(query_param("ntee_major", "2"))
        .and(query_param("limit", "35"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"inserted": 35})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/donors/embeddings/build"))
        .and(query_param("batch_size", "32"))
        .and(query_param("max_rows", "500"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"created": 35})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/donors/enrich/batch"))
        .and(query_param("limit", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"count": 0})))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    client.ingest_propublica("ny", 2, 35).await.unwrap();
    client.build_embeddings(32, 500).await.unwrap();
    client.enrich_batch(5).await.unwrap();
}
