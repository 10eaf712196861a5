//! Users API handlers.
//!
//! ```text
//! POST   /users        create a user
//! PUT    /users/{id}   update a user
//! DELETE /users/{id}   delete a user
//! GET    /users        list users (paginated)
//! GET    /users/{id}   fetch a user
//! ```
//!
//! Each handler follows the same shape: parse the body, path, or query,
//! run the validator, invoke the repository port, and reply with a JSON
//! envelope carrying a `message` plus `data` on success paths. Failures are
//! domain [`Error`]s rendered by the shared `ResponseError` implementation.
//!
//! The update and delete path patterns admit an empty identifier segment so
//! the missing-identifier contract (500, "ID cannot be empty") is served by
//! the handlers themselves rather than the router's 404 fallback.

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::Serialize;
use serde_json::json;
use utoipa::ToSchema;

use pagination::{Page, PageParams, PageRequest};

use crate::domain::ports::UserPersistenceError;
use crate::domain::validation::violations_error;
use crate::domain::{Error, User, UserPayload};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Success envelope carrying a stored user.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserEnvelope {
    /// Human-readable outcome description.
    pub message: &'static str,
    /// The stored user record.
    pub data: User,
}

/// Success envelope for operations with no entity payload.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageEnvelope {
    /// Human-readable outcome description.
    pub message: &'static str,
}

/// Success envelope for updates, surfacing the affected-row count
/// distinctly from the outcome message.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEnvelope {
    /// Human-readable outcome description.
    pub message: &'static str,
    /// Rows matched and updated by the store.
    pub rows_affected: u64,
}

/// Map port failures onto client-facing errors. `message` is the
/// operation-specific summary; the adapter detail travels in `details`.
fn map_persistence_error(error: UserPersistenceError, message: &'static str) -> Error {
    match error {
        UserPersistenceError::Connection { .. } => Error::service_unavailable("Store unavailable"),
        UserPersistenceError::Query { message: detail }
        | UserPersistenceError::Conflict { message: detail } => {
            Error::persistence(message).with_details(json!({ "reason": detail }))
        }
    }
}

/// Parse a non-empty path identifier.
fn parse_id(raw: &str) -> Result<i64, Error> {
    raw.parse::<i64>().map_err(|_| {
        Error::invalid_request("ID must be a number").with_details(json!({ "value": raw }))
    })
}

/// Create a user.
#[utoipa::path(
    post,
    path = "/users",
    request_body = UserPayload,
    responses(
        (status = 200, description = "User created", body = UserEnvelope),
        (status = 400, description = "Validation or persistence failure", body = Error),
        (status = 422, description = "Unparseable body", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    payload: web::Json<UserPayload>,
) -> ApiResult<HttpResponse> {
    let draft = state
        .validator
        .validate(&payload)
        .map_err(|violations| violations_error(&violations))?;

    let user = state
        .users
        .create(&draft)
        .await
        .map_err(|err| map_persistence_error(err, "Couldn't create user"))?;

    Ok(HttpResponse::Ok().json(UserEnvelope {
        message: "User has been added",
        data: user,
    }))
}

/// Update the user matching the path identifier.
///
/// The path identifier is authoritative; the payload carries no identifier.
/// Matching zero rows is a distinct 404 outcome, and the success body
/// reports how many rows the store touched.
#[utoipa::path(
    put,
    path = "/users/{id}",
    request_body = UserPayload,
    params(("id" = i64, Path, description = "User identifier")),
    responses(
        (status = 200, description = "User updated", body = UpdateEnvelope),
        (status = 400, description = "Bad identifier, validation, or persistence failure", body = Error),
        (status = 404, description = "No row matched the identifier", body = Error),
        (status = 422, description = "Unparseable body", body = Error),
        (status = 500, description = "Identifier missing", body = Error)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[put("/users/{id:[^/]*}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<UserPayload>,
) -> ApiResult<HttpResponse> {
    let raw = path.into_inner();
    if raw.is_empty() {
        return Err(Error::missing_identifier("ID cannot be empty"));
    }
    let id = parse_id(&raw)?;

    let draft = state
        .validator
        .validate(&payload)
        .map_err(|violations| violations_error(&violations))?;

    let affected = state
        .users
        .update(id, &draft)
        .await
        .map_err(|err| map_persistence_error(err, "Couldn't update user"))?;

    if affected == 0 {
        return Err(Error::not_found("Could not get user with given ID"));
    }

    Ok(HttpResponse::Ok().json(UpdateEnvelope {
        message: "User successfully updated",
        rows_affected: affected,
    }))
}

/// Delete the user matching the path identifier.
///
/// A missing row (404) is distinguished from a store failure (400/503).
#[utoipa::path(
    delete,
    path = "/users/{id}",
    params(("id" = i64, Path, description = "User identifier")),
    responses(
        (status = 200, description = "User deleted", body = MessageEnvelope),
        (status = 400, description = "Bad identifier or store failure", body = Error),
        (status = 404, description = "No row matched the identifier", body = Error),
        (status = 500, description = "Identifier missing", body = Error)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{id:[^/]*}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let raw = path.into_inner();
    if raw.is_empty() {
        return Err(Error::missing_identifier("ID cannot be empty"));
    }
    let id = parse_id(&raw)?;

    let affected = state
        .users
        .delete(id)
        .await
        .map_err(|err| map_persistence_error(err, "Could not delete the user"))?;

    if affected == 0 {
        return Err(Error::not_found("User not found"));
    }

    Ok(HttpResponse::Ok().json(MessageEnvelope {
        message: "User deleted successfully",
    }))
}

/// List users, paginated and ordered by ascending identifier.
///
/// `page` and `size` resolve against the configured limits; out-of-range
/// values clamp rather than fail.
#[utoipa::path(
    get,
    path = "/users",
    params(
        ("page" = Option<i64>, Query, description = "1-based page index"),
        ("size" = Option<i64>, Query, description = "Page size, clamped to the configured maximum")
    ),
    responses(
        (status = 200, description = "One page of users plus paging metadata"),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    query: web::Query<PageParams>,
) -> ApiResult<HttpResponse> {
    let request = PageRequest::resolve(query.into_inner(), state.page_limits);

    let (items, total) = state
        .users
        .list(request.offset(), request.size())
        .await
        .map_err(|err| map_persistence_error(err, "Could not list users"))?;

    let page: Page<User> = Page::assemble(items, total, request);
    Ok(HttpResponse::Ok().json(json!({ "data": page })))
}

/// Fetch a single user by identifier.
///
/// A miss reports as a generic bad request, indistinguishable from other
/// bad-identifier failures.
#[utoipa::path(
    get,
    path = "/users/{id}",
    params(("id" = i64, Path, description = "User identifier")),
    responses(
        (status = 200, description = "User found", body = UserEnvelope),
        (status = 400, description = "Missing/bad identifier or no matching row", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{id:[^/]*}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let raw = path.into_inner();
    if raw.is_empty() {
        return Err(Error::invalid_request("ID cannot be empty"));
    }
    let id = parse_id(&raw)?;

    let user = state
        .users
        .find_by_id(id)
        .await
        .map_err(|err| map_persistence_error(err, "Could not get the user"))?
        .ok_or_else(|| Error::invalid_request("Could not get the user"))?;

    Ok(HttpResponse::Ok().json(UserEnvelope {
        message: "User fetched successfully",
        data: user,
    }))
}

#[cfg(test)]
mod tests;
