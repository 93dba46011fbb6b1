//! Request/response types for auth and account endpoints.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::storage::UserRecord;

/// Account role; ordering is not meaningful, membership is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    User,
    Guide,
    LeadGuide,
    Admin,
}

impl Role {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Guide => "guide",
            Self::LeadGuide => "lead-guide",
            Self::Admin => "admin",
        }
    }

    /// Parse the database representation.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "user" => Some(Self::User),
            "guide" => Some(Self::Guide),
            "lead-guide" => Some(Self::LeadGuide),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Signup accepts a restricted field set. A `role` field in the body is
/// ignored so clients cannot self-assign privileges.
#[derive(ToSchema, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub password_confirm: Option<String>,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct ForgotPasswordRequest {
    pub email: Option<String>,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub password: Option<String>,
    pub password_confirm: Option<String>,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePasswordRequest {
    pub password_current: Option<String>,
    pub password: Option<String>,
    pub password_confirm: Option<String>,
}

/// Outward user representation. The password hash is not part of this type,
/// so it cannot be serialized by accident.
#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl From<&UserRecord> for UserResponse {
    fn from(user: &UserRecord) -> Self {
        Self {
            id: user.id.to_string(),
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
        }
    }
}

#[derive(ToSchema, Serialize, Debug)]
pub struct UserEnvelope {
    pub user: UserResponse,
}

/// Body of every response that also carries a fresh session token.
#[derive(ToSchema, Serialize, Debug)]
pub struct AuthResponse {
    pub status: &'static str,
    pub token: String,
    pub data: UserEnvelope,
}

#[derive(ToSchema, Serialize, Debug)]
pub struct StatusResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn sample_user() -> UserRecord {
        UserRecord {
            id: Uuid::nil(),
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            role: Role::User,
            token_horizon: Utc::now(),
        }
    }

    #[test]
    fn role_round_trips_database_form() {
        for role in [Role::User, Role::Guide, Role::LeadGuide, Role::Admin] {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
        assert_eq!(Role::parse("superadmin"), None);
    }

    #[test]
    fn role_serializes_kebab_case() {
        let value = serde_json::to_value(Role::LeadGuide).expect("role should serialize");
        assert_eq!(value, "lead-guide");
    }

    #[test]
    fn user_response_never_contains_password_field() {
        let response = UserResponse::from(&sample_user());
        let value = serde_json::to_value(&response).expect("user should serialize");
        let object = value.as_object().expect("user should be an object");
        assert!(!object.contains_key("password"));
        assert!(!object.contains_key("password_hash"));
        assert_eq!(
            object.keys().collect::<Vec<_>>(),
            vec!["id", "name", "email", "role"]
        );
    }

    #[test]
    fn auth_response_shape() {
        let response = AuthResponse {
            status: "success",
            token: "tok".to_string(),
            data: UserEnvelope {
                user: UserResponse::from(&sample_user()),
            },
        };
        let value = serde_json::to_value(&response).expect("auth response should serialize");
        assert_eq!(value["status"], "success");
        assert_eq!(value["data"]["user"]["email"], "alice@example.com");
        assert!(value["data"]["user"].get("password").is_none());
    }

    #[test]
    fn signup_request_reads_camel_case_confirm() {
        let request: SignupRequest = serde_json::from_str(
            r#"{"name":"Alice","email":"a@example.com","password":"pass12345","passwordConfirm":"pass12345"}"#,
        )
        .expect("signup request should deserialize");
        assert_eq!(request.password_confirm.as_deref(), Some("pass12345"));
    }

    #[test]
    fn signup_request_ignores_role_field() {
        // Role in the body must not be readable anywhere downstream.
        let request: SignupRequest =
            serde_json::from_str(r#"{"name":"Mallory","role":"admin"}"#)
                .expect("unknown fields are ignored");
        assert_eq!(request.name.as_deref(), Some("Mallory"));
    }

    #[test]
    fn login_request_tolerates_missing_fields() {
        let request: LoginRequest =
            serde_json::from_str("{}").expect("empty body should deserialize");
        assert!(request.email.is_none());
        assert!(request.password.is_none());
    }

    #[test]
    fn status_response_omits_absent_message() {
        let value = serde_json::to_value(StatusResponse {
            status: "success",
            message: None,
        })
        .expect("status response should serialize");
        assert!(value.get("message").is_none());
    }
}
