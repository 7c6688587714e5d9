//! Staff registration and login endpoints

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use common::error::DatabaseError;
use tracing::{error, info};

use crate::{
    error::{ApiError, ApiResult},
    models::{
        ApiResponse,
        staff::{LoginRequest, RegisterRequest, Staff, StaffResponse},
    },
    password,
    repositories::staff::{EMAIL_UNIQUE_CONSTRAINT, PHONE_NUMBER_UNIQUE_CONSTRAINT},
    state::AppState,
    validation::{validate_email, validate_name, validate_password, validate_phone_number},
};

/// Staff registration endpoint
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(payload) = payload?;

    validate_name(&payload.name).map_err(ApiError::BadRequest)?;
    validate_email(&payload.email).map_err(ApiError::BadRequest)?;
    validate_password(&payload.password).map_err(ApiError::BadRequest)?;
    validate_phone_number(&payload.phone_number).map_err(ApiError::BadRequest)?;

    let hashed = password::hash_password(&payload.password).map_err(|e| {
        error!("Failed to hash password: {}", e);
        ApiError::InternalServerError
    })?;

    let staff = state
        .staff_repository
        .create(&payload, &hashed)
        .await
        .map_err(registration_error)?;

    info!("Registered staff member {}", staff.user_id);
    let response = issue_token(&state, staff)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new("User registered successfully", response)),
    ))
}

/// Staff login endpoint
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(payload) = payload?;

    validate_phone_number(&payload.phone_number).map_err(ApiError::BadRequest)?;
    validate_password(&payload.password)
        .map_err(|_| ApiError::BadRequest("wrong password".to_string()))?;

    let staff = state
        .staff_repository
        .find_by_phone_number(&payload.phone_number)
        .await
        .map_err(|e| {
            error!("Failed to look up staff member: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::NotFound("user not found".to_string()))?;

    let matches = password::verify_password(&payload.password, &staff.password).map_err(|e| {
        error!("Failed to verify password: {}", e);
        ApiError::InternalServerError
    })?;

    if !matches {
        return Err(ApiError::BadRequest("wrong password".to_string()));
    }

    let response = issue_token(&state, staff)?;

    Ok(Json(ApiResponse::new("User logged successfully", response)))
}

fn issue_token(state: &AppState, staff: Staff) -> ApiResult<StaffResponse> {
    let access_token = state
        .jwt_service
        .generate_access_token(staff.user_id)
        .map_err(|e| {
            error!("Failed to generate access token: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(StaffResponse::new(staff, access_token))
}

fn registration_error(err: DatabaseError) -> ApiError {
    if err.violates(EMAIL_UNIQUE_CONSTRAINT) {
        return ApiError::Conflict("email already exists".to_string());
    }
    if err.violates(PHONE_NUMBER_UNIQUE_CONSTRAINT) {
        return ApiError::Conflict("phone number already used".to_string());
    }
    if let DatabaseError::UniqueViolation { .. } = err {
        return ApiError::Conflict("staff member already exists".to_string());
    }

    error!("Failed to create staff member: {}", err);
    ApiError::InternalServerError
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_support::lazy_state;

    fn register_request() -> RegisterRequest {
        RegisterRequest {
            email: "jane.doe@example.com".to_string(),
            name: "Jane Doe".to_string(),
            phone_number: "+621234567890".to_string(),
            password: "secret1".to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_rejects_invalid_email_before_store() {
        let result = register(
            State(lazy_state()),
            Ok(Json(RegisterRequest {
                email: "not-an-email".to_string(),
                ..register_request()
            })),
        )
        .await;

        assert!(matches!(result, Err(ApiError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_register_rejects_invalid_phone_before_store() {
        let result = register(
            State(lazy_state()),
            Ok(Json(RegisterRequest {
                phone_number: "0812345".to_string(),
                ..register_request()
            })),
        )
        .await;

        assert!(matches!(result, Err(ApiError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_login_rejects_malformed_credentials_before_store() {
        let result = login(
            State(lazy_state()),
            Ok(Json(LoginRequest {
                phone_number: "+621234567890".to_string(),
                password: "abc".to_string(),
            })),
        )
        .await;

        assert!(matches!(result, Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn test_unique_violations_become_conflicts() {
        let email = registration_error(DatabaseError::UniqueViolation {
            constraint: Some(EMAIL_UNIQUE_CONSTRAINT.to_string()),
        });
        assert!(matches!(email, ApiError::Conflict(ref msg) if msg == "email already exists"));

        let phone = registration_error(DatabaseError::UniqueViolation {
            constraint: Some(PHONE_NUMBER_UNIQUE_CONSTRAINT.to_string()),
        });
        assert!(matches!(phone, ApiError::Conflict(ref msg) if msg == "phone number already used"));

        let other = registration_error(DatabaseError::Query(sqlx::Error::PoolTimedOut));
        assert!(matches!(other, ApiError::InternalServerError));
    }
}
