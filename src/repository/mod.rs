//! Data access traits. The MySQL implementations live in `mysql.rs`; handlers
//! only ever see the traits through [`RepositoryManager`].

pub mod mysql;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{company::Company, employee::Employee, session::Session, user::User};
use crate::request_features::{EmployeeParameters, PagedList};

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    /// A unique user column already holds the value being inserted.
    #[error("duplicate user {0:?}")]
    DuplicateUser(UserUniqueKey),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserUniqueKey {
    UserName,
    Email,
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// A company together with the employees created alongside it.
#[derive(Debug, Clone)]
pub struct CompanyWithEmployees {
    pub company: Company,
    pub employees: Vec<Employee>,
}

#[async_trait]
pub trait CompanyRepository: Send + Sync {
    /// All companies ordered by name
    async fn get_all_companies(&self) -> RepositoryResult<Vec<Company>>;

    async fn get_company(&self, id: Uuid) -> RepositoryResult<Option<Company>>;

    /// Companies whose id is in `ids`; unknown ids are silently absent
    async fn get_by_ids(&self, ids: &[Uuid]) -> RepositoryResult<Vec<Company>>;

    async fn create_company(&self, company: &CompanyWithEmployees) -> RepositoryResult<()>;

    /// Inserts every company and its employees in one transaction
    async fn create_companies(&self, companies: &[CompanyWithEmployees]) -> RepositoryResult<()>;

    /// Updates the company row and inserts `new_employees` in one transaction
    async fn update_company(&self, company: &Company, new_employees: &[Employee]) -> RepositoryResult<()>;

    /// Deletes the company; its employees go with it
    async fn delete_company(&self, id: Uuid) -> RepositoryResult<()>;
}

#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    async fn get_employees(
        &self,
        company_id: Uuid,
        parameters: &EmployeeParameters,
    ) -> RepositoryResult<PagedList<Employee>>;

    async fn get_employee(&self, company_id: Uuid, id: Uuid) -> RepositoryResult<Option<Employee>>;

    async fn create_employee(&self, employee: &Employee) -> RepositoryResult<()>;

    async fn update_employee(&self, employee: &Employee) -> RepositoryResult<()>;

    async fn delete_employee(&self, company_id: Uuid, id: Uuid) -> RepositoryResult<()>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_user_name(&self, user_name: &str) -> RepositoryResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<User>>;

    /// Inserts the user and its role assignments in one transaction.
    /// A taken user name or email fails with [`RepositoryError::DuplicateUser`].
    async fn create_user(&self, user: &User, roles: &[String]) -> RepositoryResult<()>;

    async fn get_roles(&self, user_id: Uuid) -> RepositoryResult<Vec<String>>;
}

#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn create_session(&self, session: &Session) -> RepositoryResult<()>;

    async fn find_session(&self, session_id: &str) -> RepositoryResult<Option<Session>>;

    async fn delete_session(&self, session_id: &str) -> RepositoryResult<()>;
}

#[derive(Clone)]
pub struct RepositoryManager {
    pub companies: Arc<dyn CompanyRepository>,
    pub employees: Arc<dyn EmployeeRepository>,
    pub users: Arc<dyn UserRepository>,
    pub sessions: Arc<dyn SessionRepository>,
}

impl RepositoryManager {
    pub fn new(
        companies: Arc<dyn CompanyRepository>,
        employees: Arc<dyn EmployeeRepository>,
        users: Arc<dyn UserRepository>,
        sessions: Arc<dyn SessionRepository>,
    ) -> Self {
        Self {
            companies,
            employees,
            users,
            sessions,
        }
    }
}
