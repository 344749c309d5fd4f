use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub user_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub password_hash: String,
}

pub const MANAGER_ROLE: &str = "Manager";
pub const ADMINISTRATOR_ROLE: &str = "Administrator";

/// Roles seeded by the initial migration.
pub const KNOWN_ROLES: [&str; 2] = [MANAGER_ROLE, ADMINISTRATOR_ROLE];
