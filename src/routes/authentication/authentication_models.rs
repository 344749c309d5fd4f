use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::validation::{check_required, ValidationErrors};

const MIN_PASSWORD_LENGTH: usize = 10;

// Registration request
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserForRegistrationDto {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub user_name: Option<String>,
    pub password: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
}

impl UserForRegistrationDto {
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        check_required(&mut errors, "userName", self.user_name.as_deref(), "Username is required");

        match self.password.as_deref() {
            Some(password) if !password.is_empty() => {
                if password.chars().count() < MIN_PASSWORD_LENGTH {
                    errors.add(
                        "password",
                        format!("Passwords must be at least {} characters.", MIN_PASSWORD_LENGTH),
                    );
                }
                if !password.chars().any(|c| c.is_ascii_digit()) {
                    errors.add("password", "Passwords must have at least one digit ('0'-'9').");
                }
            }
            _ => errors.add("password", "Password is required"),
        }

        match self.email.as_deref().map(str::trim) {
            Some(email) if !email.is_empty() => {
                if !is_plausible_email(email) {
                    errors.add("email", format!("Email '{}' is invalid.", email));
                }
            }
            _ => errors.add("email", "Email is required"),
        }
        errors
    }
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    }
}

// Login request and response
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserForAuthenticationDto {
    pub user_name: Option<String>,
    pub password: Option<String>,
    #[serde(default)]
    pub remember_me: bool,
}

impl UserForAuthenticationDto {
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        check_required(&mut errors, "userName", self.user_name.as_deref(), "UserName is required");
        check_required(&mut errors, "password", self.password.as_deref(), "Password is required");
        errors
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub session_id: String,
    pub expires_at: DateTime<Utc>,
}
