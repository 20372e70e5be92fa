use axum::http::StatusCode;
use serde_json::json;

use crate::tests::test_server;

async fn seed_donor(server: &axum_test::TestServer, name: &str, blood_group: &str, city: &str) -> i64 {
  let response = server
    .post("/api/donors")
    .json(&json!({
        "name": name,
        "blood_group": blood_group,
        "city": city,
        "contact_number": "9876543210"
    }))
    .await;

  response.assert_status(StatusCode::CREATED);
  response.json::<serde_json::Value>()["id"].as_i64().unwrap()
}

async fn seed_request(server: &axum_test::TestServer, patient: &str, blood_group: &str, city: &str, urgency: &str) -> i64 {
  let response = server
    .post("/api/requests")
    .json(&json!({
        "patient_name": patient,
        "blood_group": blood_group,
        "city": city,
        "urgency": urgency,
        "contact_number": "9123456780"
    }))
    .await;

  response.assert_status(StatusCode::CREATED);
  response.json::<serde_json::Value>()["id"].as_i64().unwrap()
}

#[tokio::test]
async fn donor_crud_roundtrip() {
  let server = test_server();
  let id = seed_donor(&server, "John Doe", "O+", "Mumbai").await;

  let response = server.get(&format!("/api/donors/{id}")).await;
  response.assert_status_ok();
  response.assert_json_contains(&json!({ "name": "John Doe", "blood_group": "O+", "city": "Mumbai" }));

  let response = server.put(&format!("/api/donors/{id}")).json(&json!({ "city": "Delhi" })).await;
  response.assert_status_ok();
  response.assert_json_contains(&json!({ "city": "Delhi" }));

  let response = server.get("/api/donors").add_query_param("blood_group", "O+").await;
  response.assert_status_ok();
  assert_eq!(response.json::<serde_json::Value>().as_array().unwrap().len(), 1);

  server.delete(&format!("/api/donors/{id}")).await.assert_status(StatusCode::NO_CONTENT);
  server.get(&format!("/api/donors/{id}")).await.assert_status_not_found();
}

#[tokio::test]
async fn payload_validation_is_enforced() {
  let server = test_server();

  // Names with digits fail the payload rules.
  let response = server
    .post("/api/donors")
    .json(&json!({ "name": "R2D2", "blood_group": "O+", "city": "Mumbai", "contact_number": "9876543210" }))
    .await;
  response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);

  // Unknown blood groups never deserialize.
  let response = server
    .post("/api/donors")
    .json(&json!({ "name": "John Doe", "blood_group": "X+", "city": "Mumbai", "contact_number": "9876543210" }))
    .await;
  response.assert_status(StatusCode::BAD_REQUEST);

  let response = server
    .post("/api/requests")
    .json(&json!({ "patient_name": "Jane Smith", "blood_group": "B+", "city": "Delhi", "urgency": "Panic", "contact_number": "9123456780" }))
    .await;
  response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn request_lifecycle_and_terminal_fulfillment() {
  let server = test_server();
  let id = seed_request(&server, "Jane Smith", "B+", "Delhi", "High").await;

  let response = server.post(&format!("/api/requests/{id}/fulfill")).await;
  response.assert_status_ok();
  response.assert_json_contains(&json!({ "status": "Fulfilled" }));

  // Fulfilling twice is a no-op, reactivating is not allowed.
  server.post(&format!("/api/requests/{id}/fulfill")).await.assert_status_ok();
  server.put(&format!("/api/requests/{id}")).json(&json!({ "status": "Active" })).await.assert_status(StatusCode::BAD_REQUEST);

  let response = server.get("/api/requests/filter/active").await;
  response.assert_status_ok();
  assert!(response.json::<serde_json::Value>().as_array().unwrap().is_empty());
}

#[tokio::test]
async fn request_matches_are_ranked_by_score() {
  let server = test_server();

  let exact = seed_donor(&server, "Amar Patel", "A+", "Delhi").await;
  let universal = seed_donor(&server, "Uma Nair", "O-", "Delhi").await;
  let faraway = seed_donor(&server, "Farhan Khan", "O+", "Mumbai").await;
  seed_donor(&server, "Binod Rao", "B+", "Delhi").await;

  let request = seed_request(&server, "Jane Smith", "A+", "Delhi", "Critical").await;

  let response = server.get(&format!("/api/requests/{request}/matches")).add_query_param("city_exact_match", "false").await;
  response.assert_status_ok();

  let matches = response.json::<serde_json::Value>();
  let matches = matches.as_array().unwrap();

  assert_eq!(matches.len(), 3);
  assert_eq!(matches[0]["donor"]["id"].as_i64(), Some(exact));
  assert_eq!(matches[0]["match_score"], json!(100.0));
  assert_eq!(matches[0]["exact_blood_match"], json!(true));
  assert_eq!(matches[1]["donor"]["id"].as_i64(), Some(universal));
  assert_eq!(matches[1]["match_score"], json!(80.0));
  assert_eq!(matches[2]["donor"]["id"].as_i64(), Some(faraway));
  assert_eq!(matches[2]["match_score"], json!(50.0));

  // The default mode restricts candidates to the request city.
  let response = server.get(&format!("/api/requests/{request}/matches")).await;
  assert_eq!(response.json::<serde_json::Value>().as_array().unwrap().len(), 2);

  let response = server
    .get(&format!("/api/requests/{request}/matches"))
    .add_query_param("city_exact_match", "false")
    .add_query_param("limit", "2")
    .await;
  assert_eq!(response.json::<serde_json::Value>().as_array().unwrap().len(), 2);

  server.get(&format!("/api/requests/{request}/matches")).add_query_param("limit", "0").await.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn fulfilled_requests_match_no_donors() {
  let server = test_server();

  seed_donor(&server, "Uma Nair", "O-", "Delhi").await;
  let request = seed_request(&server, "Jane Smith", "A+", "Delhi", "Critical").await;

  assert!(!server.get(&format!("/api/requests/{request}/matches")).await.json::<serde_json::Value>().as_array().unwrap().is_empty());

  server.post(&format!("/api/requests/{request}/fulfill")).await.assert_status_ok();

  let response = server.get(&format!("/api/requests/{request}/matches")).await;
  response.assert_status_ok();
  assert!(response.json::<serde_json::Value>().as_array().unwrap().is_empty());
}

#[tokio::test]
async fn donor_matches_rank_urgency_over_score() {
  let server = test_server();

  let donor = seed_donor(&server, "Uma Nair", "B-", "Delhi").await;

  let critical = seed_request(&server, "Jane Smith", "AB+", "Delhi", "Critical").await;
  let low = seed_request(&server, "John Doe", "B-", "Delhi", "Low").await;

  // The donor's own group in the same city is the only candidate by default.
  let response = server.get(&format!("/api/donors/{donor}/matches")).await;
  response.assert_status_ok();

  let defaults = response.json::<serde_json::Value>();
  let defaults = defaults.as_array().unwrap();

  assert_eq!(defaults.len(), 1);
  assert_eq!(defaults[0]["request"]["id"].as_i64(), Some(low));

  // Compatibility-wide search puts the critical request first despite its
  // lower score.
  let response = server.get(&format!("/api/donors/{donor}/matches")).add_query_param("city_exact_match", "false").await;
  let matches = response.json::<serde_json::Value>();
  let matches = matches.as_array().unwrap();

  assert_eq!(matches.len(), 2);
  assert_eq!(matches[0]["request"]["id"].as_i64(), Some(critical));
  assert_eq!(matches[0]["match_score"], json!(80.0));
  assert_eq!(matches[1]["request"]["id"].as_i64(), Some(low));
  assert_eq!(matches[1]["match_score"], json!(91.0));
}

#[tokio::test]
async fn compatible_donor_search_spans_all_groups() {
  let server = test_server();

  seed_donor(&server, "Uma Nair", "O-", "Delhi").await;
  seed_donor(&server, "Amar Patel", "A+", "Mumbai").await;
  seed_donor(&server, "Binod Rao", "B+", "Delhi").await;

  let response = server.get("/api/donors/search/compatible").add_query_param("blood_group", "A+").await;
  response.assert_status_ok();
  assert_eq!(response.json::<serde_json::Value>().as_array().unwrap().len(), 2);

  let response = server.get("/api/donors/search/compatible").add_query_param("blood_group", "A+").add_query_param("city", "delhi").await;
  assert_eq!(response.json::<serde_json::Value>().as_array().unwrap().len(), 1);

  server.get("/api/donors/search/compatible").add_query_param("blood_group", "X+").await.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn compatibility_info_reports_both_directions() {
  let server = test_server();

  let response = server.get("/api/matching/compatibility").add_query_param("blood_group", "O-").await;
  response.assert_status_ok();
  response.assert_json_contains(&json!({
      "blood_group": "O-",
      "can_receive_from": ["O-"],
      "is_universal_donor": true,
      "is_universal_recipient": false,
  }));

  server.get("/api/matching/compatibility").add_query_param("blood_group", "o+").await.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn statistics_endpoints_aggregate_the_system() {
  let server = test_server();

  seed_donor(&server, "Uma Nair", "O-", "Delhi").await;
  seed_donor(&server, "Amar Patel", "A+", "Delhi").await;
  seed_request(&server, "Jane Smith", "A+", "Delhi", "Critical").await;
  let unmatchable = seed_request(&server, "John Doe", "O-", "Mumbai", "Low").await;
  seed_donor(&server, "Late Arrival", "AB+", "Pune").await;

  let response = server.get("/api/matching/statistics").await;
  response.assert_status_ok();
  response.assert_json_contains(&json!({
      "total_active_requests": 2,
      "total_donors": 3,
      "requests_with_potential_matches": 2,
  }));

  // The O- request can only be served by the O- donor.
  let matches = server.get(&format!("/api/requests/{unmatchable}/matches")).add_query_param("city_exact_match", "false").await;
  assert_eq!(matches.json::<serde_json::Value>().as_array().unwrap().len(), 1);

  let response = server.get("/api/donors/statistics").await;
  response.assert_status_ok();
  response.assert_json_contains(&json!({ "total_donors": 3 }));

  let response = server.get("/api/requests/statistics").await;
  response.assert_status_ok();
  response.assert_json_contains(&json!({ "total_requests": 2, "status_distribution": { "active": 2, "fulfilled": 0 } }));
}

#[tokio::test]
async fn probes_and_fallback() {
  let server = test_server();

  server.get("/healthz").await.assert_status_ok();
  server.get("/readyz").await.assert_status_ok();
  server.get("/api/nope").await.assert_status_not_found();
  server.get("/api/donors/99").await.assert_status_not_found();
  server.get("/api/donors/99/matches").await.assert_status_not_found();
  server.get("/api/requests/99/matches").await.assert_status_not_found();
  server.get("/metrics").await.assert_status_not_found();
}
