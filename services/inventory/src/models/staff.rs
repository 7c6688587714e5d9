//! Staff models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Staff account entity
#[derive(Debug, Clone, FromRow)]
pub struct Staff {
    pub user_id: i64,
    pub email: String,
    pub name: String,
    pub phone_number: String,
    pub password: String,
    pub salt: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Request for staff registration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub name: String,
    pub phone_number: String,
    pub password: String,
}

/// Request for staff login
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub phone_number: String,
    pub password: String,
}

/// Response for registration and login
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffResponse {
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub access_token: String,
}

impl StaffResponse {
    pub fn new(staff: Staff, access_token: String) -> Self {
        Self {
            user_id: staff.user_id.to_string(),
            name: staff.name,
            email: staff.email,
            phone_number: staff.phone_number,
            access_token,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_staff_response_hides_credentials() {
        let staff = Staff {
            user_id: 42,
            email: "jane@example.com".to_string(),
            name: "Jane Doe".to_string(),
            phone_number: "+621234567890".to_string(),
            password: "$argon2id$v=19$...".to_string(),
            salt: "c2FsdA".to_string(),
            created_at: Utc::now(),
            updated_at: None,
        };

        let value = serde_json::to_value(StaffResponse::new(staff, "token".to_string())).unwrap();
        assert_eq!(value["userId"], "42");
        assert_eq!(value["phoneNumber"], "+621234567890");
        assert_eq!(value["accessToken"], "token");
        assert!(value.get("password").is_none());
        assert!(value.get("salt").is_none());
    }
}
