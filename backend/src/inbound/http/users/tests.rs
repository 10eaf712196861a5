//! Tests for users API handlers.
//!
//! Handlers are exercised through the actix test harness against a stub
//! repository, so every assertion covers routing, extraction, validation,
//! and response shaping without touching a database.

use std::sync::{Arc, Mutex};

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use async_trait::async_trait;
use chrono::Utc;
use pagination::PageLimits;
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::domain::ports::UserRepository;
use crate::domain::{UserDraft, Validator};
use crate::inbound::http::error::json_error_handler;

#[derive(Clone, Copy)]
enum StubFailure {
    Connection,
    Query,
    Conflict,
}

impl StubFailure {
    fn to_error(self) -> UserPersistenceError {
        match self {
            Self::Connection => UserPersistenceError::connection("database unavailable"),
            Self::Query => UserPersistenceError::query("database query failed"),
            Self::Conflict => UserPersistenceError::conflict("users_email_idx"),
        }
    }
}

#[derive(Default)]
struct StubState {
    users: Vec<User>,
    next_id: i64,
    failure: Option<StubFailure>,
    writes: usize,
}

/// In-memory `UserRepository` with a programmable failure mode and a write
/// counter, so tests can assert the store was never touched.
#[derive(Default)]
struct StubUserRepository {
    state: Mutex<StubState>,
}

impl StubUserRepository {
    fn with_users(users: Vec<User>) -> Self {
        let next_id = users.iter().map(|user| user.id).max().unwrap_or(0);
        Self {
            state: Mutex::new(StubState {
                users,
                next_id,
                ..StubState::default()
            }),
        }
    }

    fn set_failure(&self, failure: StubFailure) {
        self.state.lock().expect("state lock").failure = Some(failure);
    }

    fn write_count(&self) -> usize {
        self.state.lock().expect("state lock").writes
    }

    fn stored(&self) -> Vec<User> {
        self.state.lock().expect("state lock").users.clone()
    }
}

#[async_trait]
impl UserRepository for StubUserRepository {
    async fn create(&self, draft: &UserDraft) -> Result<User, UserPersistenceError> {
        let mut state = self.state.lock().expect("state lock");
        if let Some(failure) = state.failure {
            return Err(failure.to_error());
        }
        state.writes += 1;
        state.next_id += 1;
        let now = Utc::now();
        let user = User {
            id: state.next_id,
            name: draft.name.clone(),
            email: draft.email.clone(),
            age: draft.age,
            created_at: now,
            updated_at: now,
        };
        state.users.push(user.clone());
        Ok(user)
    }

    async fn update(&self, id: i64, draft: &UserDraft) -> Result<u64, UserPersistenceError> {
        let mut state = self.state.lock().expect("state lock");
        if let Some(failure) = state.failure {
            return Err(failure.to_error());
        }
        state.writes += 1;
        match state.users.iter_mut().find(|user| user.id == id) {
            Some(user) => {
                user.name = draft.name.clone();
                user.email = draft.email.clone();
                user.age = draft.age;
                user.updated_at = Utc::now();
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete(&self, id: i64) -> Result<u64, UserPersistenceError> {
        let mut state = self.state.lock().expect("state lock");
        if let Some(failure) = state.failure {
            return Err(failure.to_error());
        }
        state.writes += 1;
        let before = state.users.len();
        state.users.retain(|user| user.id != id);
        Ok((before - state.users.len()) as u64)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, UserPersistenceError> {
        let state = self.state.lock().expect("state lock");
        if let Some(failure) = state.failure {
            return Err(failure.to_error());
        }
        Ok(state.users.iter().find(|user| user.id == id).cloned())
    }

    async fn list(
        &self,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<User>, i64), UserPersistenceError> {
        let state = self.state.lock().expect("state lock");
        if let Some(failure) = state.failure {
            return Err(failure.to_error());
        }
        let mut users = state.users.clone();
        users.sort_by_key(|user| user.id);
        let total = users.len() as i64;
        let items = users
            .into_iter()
            .skip(usize::try_from(offset).unwrap_or(0))
            .take(usize::try_from(limit).unwrap_or(0))
            .collect();
        Ok((items, total))
    }
}

fn seeded_user(id: i64, name: &str, email: &str) -> User {
    let now = Utc::now();
    User {
        id,
        name: name.into(),
        email: email.into(),
        age: None,
        created_at: now,
        updated_at: now,
    }
}

fn valid_body() -> Value {
    json!({ "name": "Ada Lovelace", "email": "ada@example.org", "age": 36 })
}

fn test_app(
    repo: Arc<StubUserRepository>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let state = HttpState::new(
        repo,
        Validator::users(),
        PageLimits::new(20, 100).expect("valid limits"),
    );
    App::new()
        .app_data(web::Data::new(state))
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .service(create_user)
        .service(list_users)
        .service(get_user)
        .service(update_user)
        .service(delete_user)
}

async fn read_json(res: ServiceResponse) -> Value {
    let body = actix_test::read_body(res).await;
    serde_json::from_slice(&body).expect("response JSON")
}

#[actix_web::test]
async fn create_assigns_identifier_and_echoes_fields() {
    let repo = Arc::new(StubUserRepository::default());
    let app = actix_test::init_service(test_app(repo)).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/users")
            .set_json(valid_body())
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let value = read_json(res).await;
    assert_eq!(value["message"], "User has been added");
    assert!(value["data"]["id"].as_i64().expect("assigned id") > 0);
    assert_eq!(value["data"]["name"], "Ada Lovelace");
    assert_eq!(value["data"]["email"], "ada@example.org");
    assert_eq!(value["data"]["age"], 36);
}

#[rstest]
#[case(json!({ "email": "ada@example.org" }), "name")]
#[case(json!({ "name": "Ada Lovelace" }), "email")]
#[actix_web::test]
async fn create_with_missing_required_field_names_it(
    #[case] body: Value,
    #[case] field: &str,
) {
    let repo = Arc::new(StubUserRepository::default());
    let app = actix_test::init_service(test_app(repo.clone())).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/users")
            .set_json(body)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let value = read_json(res).await;
    assert_eq!(value["code"], "invalid_request");
    let violations = value["details"]["violations"]
        .as_array()
        .expect("violations array");
    assert!(
        violations
            .iter()
            .any(|violation| violation["field"] == field && violation["rule"] == "required"),
        "expected a required violation for {field}: {violations:?}"
    );
    assert_eq!(repo.write_count(), 0, "store must not be touched");
}

#[actix_web::test]
async fn create_with_malformed_body_is_422() {
    let repo = Arc::new(StubUserRepository::default());
    let app = actix_test::init_service(test_app(repo.clone())).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/users")
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json")
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let value = read_json(res).await;
    assert_eq!(value["code"], "malformed_payload");
    assert_eq!(value["message"], "Request failed");
    assert_eq!(repo.write_count(), 0);
}

#[rstest]
#[case(StubFailure::Query, StatusCode::BAD_REQUEST, "persistence_error")]
#[case(StubFailure::Conflict, StatusCode::BAD_REQUEST, "persistence_error")]
#[case(StubFailure::Connection, StatusCode::SERVICE_UNAVAILABLE, "service_unavailable")]
#[actix_web::test]
async fn create_store_failures_map_to_statuses(
    #[case] failure: StubFailure,
    #[case] status: StatusCode,
    #[case] code: &str,
) {
    let repo = Arc::new(StubUserRepository::default());
    repo.set_failure(failure);
    let app = actix_test::init_service(test_app(repo)).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/users")
            .set_json(valid_body())
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), status);
    let value = read_json(res).await;
    assert_eq!(value["code"], code);
}

#[actix_web::test]
async fn update_with_empty_identifier_is_500_and_skips_store() {
    let repo = Arc::new(StubUserRepository::default());
    let app = actix_test::init_service(test_app(repo.clone())).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri("/users/")
            .set_json(valid_body())
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let value = read_json(res).await;
    assert_eq!(value["message"], "ID cannot be empty");
    assert_eq!(value["code"], "missing_identifier");
    assert_eq!(repo.write_count(), 0);
}

#[actix_web::test]
async fn delete_with_empty_identifier_is_500_and_skips_store() {
    let repo = Arc::new(StubUserRepository::default());
    let app = actix_test::init_service(test_app(repo.clone())).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::delete().uri("/users/").to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let value = read_json(res).await;
    assert_eq!(value["message"], "ID cannot be empty");
    assert_eq!(repo.write_count(), 0);
}

#[actix_web::test]
async fn update_matching_zero_rows_is_not_found() {
    let repo = Arc::new(StubUserRepository::default());
    let app = actix_test::init_service(test_app(repo)).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri("/users/42")
            .set_json(valid_body())
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let value = read_json(res).await;
    assert_eq!(value["code"], "not_found");
}

#[actix_web::test]
async fn update_applies_fields_and_reports_rows_affected() {
    let repo = Arc::new(StubUserRepository::with_users(vec![seeded_user(
        1,
        "Ada",
        "ada@example.org",
    )]));
    let app = actix_test::init_service(test_app(repo.clone())).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri("/users/1")
            .set_json(json!({ "name": "Ada Lovelace", "email": "ada@maths.org" }))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let value = read_json(res).await;
    assert_eq!(value["message"], "User successfully updated");
    assert_eq!(value["rowsAffected"], 1);

    let stored = repo.stored();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].name, "Ada Lovelace");
    assert_eq!(stored[0].email, "ada@maths.org");
    assert_eq!(stored[0].age, None);
}

#[actix_web::test]
async fn update_with_invalid_payload_reports_violations_without_store_write() {
    let repo = Arc::new(StubUserRepository::with_users(vec![seeded_user(
        1,
        "Ada",
        "ada@example.org",
    )]));
    let app = actix_test::init_service(test_app(repo.clone())).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri("/users/1")
            .set_json(json!({ "name": "Ada", "email": "not-an-email" }))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let value = read_json(res).await;
    let violations = value["details"]["violations"]
        .as_array()
        .expect("violations array");
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0]["field"], "email");
    assert_eq!(repo.write_count(), 0);
    assert_eq!(repo.stored()[0].email, "ada@example.org");
}

#[actix_web::test]
async fn delete_removes_the_matching_row() {
    let repo = Arc::new(StubUserRepository::with_users(vec![
        seeded_user(1, "Ada", "ada@example.org"),
        seeded_user(2, "Grace", "grace@example.org"),
    ]));
    let app = actix_test::init_service(test_app(repo.clone())).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::delete().uri("/users/1").to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let value = read_json(res).await;
    assert_eq!(value["message"], "User deleted successfully");
    let stored = repo.stored();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id, 2);
}

#[actix_web::test]
async fn delete_missing_row_is_not_found() {
    let repo = Arc::new(StubUserRepository::default());
    let app = actix_test::init_service(test_app(repo)).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::delete().uri("/users/42").to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn delete_store_error_is_distinct_from_missing_row() {
    let repo = Arc::new(StubUserRepository::default());
    repo.set_failure(StubFailure::Query);
    let app = actix_test::init_service(test_app(repo)).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::delete().uri("/users/42").to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let value = read_json(res).await;
    assert_eq!(value["code"], "persistence_error");
    assert_eq!(value["message"], "Could not delete the user");
}

#[actix_web::test]
async fn get_missing_user_is_reported_as_bad_request() {
    let repo = Arc::new(StubUserRepository::default());
    let app = actix_test::init_service(test_app(repo)).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/users/999999")
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let value = read_json(res).await;
    assert_eq!(value["message"], "Could not get the user");
}

#[actix_web::test]
async fn get_with_empty_identifier_is_400() {
    let repo = Arc::new(StubUserRepository::default());
    let app = actix_test::init_service(test_app(repo)).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get().uri("/users/").to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let value = read_json(res).await;
    assert_eq!(value["message"], "ID cannot be empty");
}

#[actix_web::test]
async fn get_with_non_numeric_identifier_is_400() {
    let repo = Arc::new(StubUserRepository::default());
    let app = actix_test::init_service(test_app(repo)).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get().uri("/users/abc").to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let value = read_json(res).await;
    assert_eq!(value["code"], "invalid_request");
    assert_eq!(value["details"]["value"], "abc");
}

#[actix_web::test]
async fn created_user_round_trips_through_get() {
    let repo = Arc::new(StubUserRepository::default());
    let app = actix_test::init_service(test_app(repo)).await;

    let created = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/users")
            .set_json(valid_body())
            .to_request(),
    )
    .await;
    let created = read_json(created).await;
    let id = created["data"]["id"].as_i64().expect("assigned id");

    let fetched = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/users/{id}"))
            .to_request(),
    )
    .await;
    assert_eq!(fetched.status(), StatusCode::OK);
    let fetched = read_json(fetched).await;
    assert_eq!(fetched["message"], "User fetched successfully");
    assert_eq!(fetched["data"], created["data"]);
}

#[actix_web::test]
async fn list_returns_bounded_ordered_pages_with_metadata() {
    let repo = Arc::new(StubUserRepository::with_users(vec![
        seeded_user(2, "Grace", "grace@example.org"),
        seeded_user(1, "Ada", "ada@example.org"),
        seeded_user(3, "Edsger", "edsger@example.org"),
    ]));
    let app = actix_test::init_service(test_app(repo)).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/users?page=1&size=2")
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let value = read_json(res).await;
    let page = &value["data"];
    assert_eq!(page["total"], 3);
    assert_eq!(page["page"], 1);
    assert_eq!(page["size"], 2);
    assert_eq!(page["totalPages"], 2);
    let ids: Vec<i64> = page["items"]
        .as_array()
        .expect("items array")
        .iter()
        .map(|item| item["id"].as_i64().expect("item id"))
        .collect();
    assert_eq!(ids, vec![1, 2]);

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/users?page=2&size=2")
            .to_request(),
    )
    .await;
    let value = read_json(res).await;
    let ids: Vec<i64> = value["data"]["items"]
        .as_array()
        .expect("items array")
        .iter()
        .map(|item| item["id"].as_i64().expect("item id"))
        .collect();
    assert_eq!(ids, vec![3]);
}

#[actix_web::test]
async fn list_without_parameters_uses_configured_defaults() {
    let users = (1..=25)
        .map(|id| seeded_user(id, "User", &format!("user{id}@example.org")))
        .collect();
    let repo = Arc::new(StubUserRepository::with_users(users));
    let app = actix_test::init_service(test_app(repo)).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get().uri("/users").to_request(),
    )
    .await;
    let value = read_json(res).await;
    let page = &value["data"];
    assert_eq!(page["page"], 1);
    assert_eq!(page["size"], 20);
    assert_eq!(page["total"], 25);
    assert_eq!(page["totalPages"], 2);
    assert_eq!(page["items"].as_array().expect("items array").len(), 20);
}
