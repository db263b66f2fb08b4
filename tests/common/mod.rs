#![allow(dead_code)]

use axum::Router;
use axum_test::TestServer;
use serde_json::{Value, json};
use std::sync::Arc;
use program_service::api::routes::api_routes;
use program_service::infrastructure::persistence::{
    InMemoryProgramRepository, InMemoryTaxonomyRepository,
};
use program_service::infrastructure::seed::TaxonomySeed;
use program_service::state::AppState;

fn names(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Small taxonomy with predictable ids, starting at 1 in list order.
pub fn test_seed() -> TaxonomySeed {
    TaxonomySeed {
        cancers: names(&["Breast cancer", "Lung cancer", "Pancreatic cancer"]),
        primary_sites: names(&["Breast", "Lung", "Pancreas"]),
        countries: names(&["Canada", "Japan", "Spain"]),
        institutions: names(&["OICR", "UCSC"]),
        regions: names(&["Asia", "Europe", "North America"]),
    }
}

pub fn create_test_state() -> AppState {
    AppState::new(
        Arc::new(InMemoryProgramRepository::new()),
        Arc::new(InMemoryTaxonomyRepository::new(test_seed().into_taxonomy())),
        30,
    )
}

pub fn make_server() -> TestServer {
    let app = Router::new()
        .nest("/api", api_routes())
        .with_state(create_test_state());
    TestServer::new(app).unwrap()
}

pub fn program_body(short_name: &str) -> Value {
    json!({
        "short_name": short_name,
        "name": format!("Program {short_name}"),
        "membership_type": "FULL",
        "commitment_donors": 100,
        "cancer_types": ["Breast cancer", "Lung cancer"],
        "primary_sites": ["Breast"],
        "countries": ["Canada"],
        "institutions": ["OICR"],
        "regions": ["North America"]
    })
}

pub async fn create_program(server: &TestServer, short_name: &str) {
    server
        .post("/api/programs")
        .json(&program_body(short_name))
        .await
        .assert_status(axum::http::StatusCode::CREATED);
}

pub async fn invite(server: &TestServer, short_name: &str, email: &str) -> i64 {
    let response = server
        .post(&format!("/api/programs/{short_name}/invitations"))
        .json(&json!({
            "email": email,
            "first_name": "Jane",
            "last_name": "Doe",
            "role": "SUBMITTER"
        }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    response.json::<Value>()["id"].as_i64().unwrap()
}

/// Program short names linked to the named term, from the taxonomy listing.
pub async fn programs_of(server: &TestServer, kind: &str, term: &str) -> Vec<String> {
    let json = server
        .get(&format!("/api/taxonomy/{kind}"))
        .await
        .json::<Value>();
    json["items"]
        .as_array()
        .unwrap()
        .iter()
        .find(|item| item["name"] == term)
        .map(|item| {
            item["programs"]
                .as_array()
                .unwrap()
                .iter()
                .map(|p| p.as_str().unwrap().to_string())
                .collect()
        })
        .unwrap_or_default()
}
