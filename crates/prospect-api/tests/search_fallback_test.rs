use prospect_api::{
    search_companies, search_people, ApiClient, ApiError, CompanyFilters, PeopleFilters,
};
use prospect_core::ApiKey;
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> ApiClient {
    ApiClient::new(server.uri(), ApiKey::new("test-key").expect("valid key"))
        .expect("create client")
}

#[tokio::test]
async fn company_search_uses_primary_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/mixed_companies/search"))
        .and(header("X-Api-Key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "organizations": [{"id": "c1", "name": "Acme"}],
            "pagination": {"page": 1, "per_page": 25, "total_entries": 1, "total_pages": 1}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let resp = search_companies(&client, &CompanyFilters::default())
        .await
        .expect("search ok");

    assert_eq!(resp.items.len(), 1);
    assert_eq!(resp.items[0].name.as_deref(), Some("Acme"));
}

#[tokio::test]
async fn company_search_falls_back_to_organizations_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/mixed_companies/search"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/organizations/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "organizations": [{"id": "c2", "name": "Globex"}],
            "pagination": {"total_entries": 1}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let resp = search_companies(&client, &CompanyFilters::default())
        .await
        .expect("fallback ok");

    assert_eq!(resp.items[0].id, "c2");
}

#[tokio::test]
async fn company_search_returns_primary_error_when_all_fail() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/mixed_companies/search"))
        .respond_with(ResponseTemplate::new(422))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/organizations/search"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = search_companies(&client, &CompanyFilters::default())
        .await
        .expect_err("all endpoints down");

    // The first attempt's error is the one surfaced.
    assert!(matches!(err, ApiError::InvalidParameters));
    assert_eq!(
        err.to_string(),
        "Invalid search parameters. Please check your search criteria and try again."
    );
}

#[tokio::test]
async fn unauthorized_maps_to_api_key_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/mixed_companies/search"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/organizations/search"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = search_companies(&client, &CompanyFilters::default())
        .await
        .expect_err("unauthorized");

    assert_eq!(
        err.to_string(),
        "Invalid API key. Please check your API key."
    );
}

#[tokio::test]
async fn people_search_falls_back_to_contacts_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/mixed_people/search"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/contacts/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "contacts": [{"id": "p1", "name": "Jane Roe", "title": "CTO"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let resp = search_people(&client, &PeopleFilters::default())
        .await
        .expect("fallback ok");

    assert_eq!(resp.items.len(), 1);
    assert_eq!(resp.items[0].title.as_deref(), Some("CTO"));
}

#[tokio::test]
async fn people_search_runs_broad_alternative_when_primary_empty() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/mixed_people/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "contacts": [], "people": []
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/people/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "people": [{"id": "p7", "name": "Sam Park"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let resp = search_people(&client, &PeopleFilters::default())
        .await
        .expect("alternative ok");

    assert_eq!(resp.items.len(), 1);
    assert_eq!(resp.items[0].id, "p7");
}

#[tokio::test]
async fn people_search_alternative_exhaustion_yields_empty_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/mixed_people/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"contacts": []})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/people/search"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/organizations/people"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let resp = search_people(&client, &PeopleFilters::default())
        .await
        .expect("alternative chain never errors");

    assert!(resp.items.is_empty());
    assert_eq!(resp.pagination.total_entries, 0);
}
