use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use surgical_academy_domain::entities::SignupInput;

/// Request payload for self-registration
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct PublicSignupRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,

    /// At least 6 characters
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: Option<String>,

    #[validate(length(max = 200, message = "Full name cannot exceed 200 characters"))]
    pub full_name: Option<String>,

    /// STUDENT or TEACHER; anything else registers a student
    pub role: Option<String>,

    pub specialization: Option<String>,

    pub institution: Option<String>,
}

impl From<PublicSignupRequest> for SignupInput {
    fn from(request: PublicSignupRequest) -> Self {
        Self {
            email: request.email,
            password: request.password,
            full_name: request.full_name,
            role: request.role,
            specialization: request.specialization,
            institution: request.institution,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signup_validation() {
        let valid = PublicSignupRequest {
            email: Some("resident@example.com".to_string()),
            password: Some("secret1".to_string()),
            full_name: Some("Иван Петров".to_string()),
            ..Default::default()
        };
        tokio_test::assert_ok!(valid.validate());

        let bad_email = PublicSignupRequest {
            email: Some("not-an-email".to_string()),
            ..valid.clone()
        };
        tokio_test::assert_err!(bad_email.validate());

        let short_password = PublicSignupRequest {
            password: Some("12345".to_string()),
            ..valid
        };
        let errors = short_password.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password"));
    }
}
