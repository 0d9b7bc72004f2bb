use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::accounts::repo_types::PublicAccount;
use crate::error::{AppError, AppResult, FieldErrors};

pub const MIN_PASSWORD_CHARS: usize = 8;
pub const MAX_NAME_CHARS: usize = 100;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Request body for `POST /api/user`. Missing fields deserialize as empty
/// so they are reported per field instead of as a parse failure.
#[derive(Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

/// A registration that passed validation; names trimmed, email normalized.
pub struct Registration {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

impl fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl RegisterRequest {
    pub fn validate(self) -> AppResult<Registration> {
        let mut errors = FieldErrors::new();

        let first_name = self.first_name.trim().to_string();
        check_name(&mut errors, "firstName", "First name", &first_name);
        let last_name = self.last_name.trim().to_string();
        check_name(&mut errors, "lastName", "Last name", &last_name);

        let email = normalize_email(&self.email);
        if email.is_empty() {
            errors.insert("email", "Email is required".into());
        } else if !is_valid_email(&email) {
            errors.insert("email", "Invalid email".into());
        }

        // Length only; composition rules are not enforced.
        if self.password.is_empty() {
            errors.insert("password", "Password is required".into());
        } else if self.password.chars().count() < MIN_PASSWORD_CHARS {
            errors.insert(
                "password",
                format!("Password must have at least {MIN_PASSWORD_CHARS} characters"),
            );
        }

        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }
        Ok(Registration {
            first_name,
            last_name,
            email,
            password: self.password,
        })
    }
}

fn check_name(errors: &mut FieldErrors, field: &'static str, label: &str, value: &str) {
    if value.is_empty() {
        errors.insert(field, format!("{label} is required"));
    } else if value.chars().count() > MAX_NAME_CHARS {
        errors.insert(
            field,
            format!("{label} must have at most {MAX_NAME_CHARS} characters"),
        );
    }
}

/// Response body for a successful registration.
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user: PublicAccount,
    pub message: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paul() -> RegisterRequest {
        RegisterRequest {
            first_name: "Paul".into(),
            last_name: "McCartney".into(),
            email: "paul@example.com".into(),
            password: "PaulMcCartney13.?".into(),
        }
    }

    fn field_errors(req: RegisterRequest) -> FieldErrors {
        match req.validate() {
            Err(AppError::Validation(errors)) => errors,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn valid_request_is_normalized() {
        let req = RegisterRequest {
            first_name: "  Paul ".into(),
            email: "  Paul@Example.COM ".into(),
            ..paul()
        };
        let reg = req.validate().expect("valid");
        assert_eq!(reg.first_name, "Paul");
        assert_eq!(reg.email, "paul@example.com");
        assert_eq!(reg.password, "PaulMcCartney13.?");
    }

    #[test]
    fn seven_char_password_is_rejected() {
        let errors = field_errors(RegisterRequest {
            password: "Abc123!".into(),
            ..paul()
        });
        assert_eq!(errors.len(), 1);
        assert!(errors["password"].contains("at least 8"));
    }

    #[test]
    fn eight_chars_is_enough_without_composition_rules() {
        let req = RegisterRequest {
            password: "aaaaaaaa".into(),
            ..paul()
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn password_length_counts_characters_not_bytes() {
        // 7 characters, 14 bytes
        let errors = field_errors(RegisterRequest {
            password: "ééééééé".into(),
            ..paul()
        });
        assert!(errors.contains_key("password"));
    }

    #[test]
    fn every_bad_field_is_reported() {
        let errors = field_errors(RegisterRequest::default());
        assert_eq!(errors["firstName"], "First name is required");
        assert_eq!(errors["lastName"], "Last name is required");
        assert_eq!(errors["email"], "Email is required");
        assert_eq!(errors["password"], "Password is required");
    }

    #[test]
    fn long_names_and_bad_email() {
        let errors = field_errors(RegisterRequest {
            last_name: "x".repeat(MAX_NAME_CHARS + 1),
            email: "paul@example".into(),
            ..paul()
        });
        assert!(errors["lastName"].contains("at most 100"));
        assert_eq!(errors["email"], "Invalid email");
        assert!(!errors.contains_key("firstName"));
    }

    #[test]
    fn debug_redacts_password() {
        let req = format!("{:?}", paul());
        let reg = format!("{:?}", paul().validate().unwrap());
        for out in [req, reg] {
            assert!(out.contains("paul@example.com"));
            assert!(!out.contains("PaulMcCartney13"), "leaked: {out}");
        }
    }

    #[test]
    fn email_regex() {
        assert!(is_valid_email("a@b.co"));
        assert!(!is_valid_email("a b@c.d"));
        assert!(!is_valid_email("no-at.example.com"));
        assert!(!is_valid_email("a@@b.c"));
    }

    #[test]
    fn missing_fields_deserialize_empty() {
        let req: RegisterRequest = serde_json::from_str(r#"{"firstName":"Paul"}"#).unwrap();
        assert_eq!(req.first_name, "Paul");
        assert!(req.email.is_empty());
    }
}
