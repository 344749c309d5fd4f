use std::sync::Arc;

use async_trait::async_trait;
use log::info;
use sqlx::{MySql, MySqlPool, QueryBuilder, Transaction};
use uuid::Uuid;

use super::{
    CompanyRepository, CompanyWithEmployees, EmployeeRepository, RepositoryError,
    RepositoryManager, RepositoryResult, SessionRepository, UserRepository, UserUniqueKey,
};
use crate::models::{company::Company, employee::Employee, session::Session, user::User};
use crate::request_features::{EmployeeParameters, PagedList};

pub async fn run_migrations(pool: &MySqlPool) -> RepositoryResult<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    info!("Database migrations applied");
    Ok(())
}

impl RepositoryManager {
    pub fn mysql(pool: MySqlPool) -> Self {
        Self::new(
            Arc::new(MySqlCompanyRepository::new(pool.clone())),
            Arc::new(MySqlEmployeeRepository::new(pool.clone())),
            Arc::new(MySqlUserRepository::new(pool.clone())),
            Arc::new(MySqlSessionRepository::new(pool)),
        )
    }
}

async fn insert_employee(tx: &mut Transaction<'_, MySql>, employee: &Employee) -> RepositoryResult<()> {
    sqlx::query("INSERT INTO Employees_ (id, name, age, position, company_id) VALUES (?, ?, ?, ?, ?)")
        .bind(employee.id)
        .bind(&employee.name)
        .bind(employee.age)
        .bind(&employee.position)
        .bind(employee.company_id)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

async fn insert_company(tx: &mut Transaction<'_, MySql>, entry: &CompanyWithEmployees) -> RepositoryResult<()> {
    let company = &entry.company;
    sqlx::query("INSERT INTO Companies_ (id, name, address, country) VALUES (?, ?, ?, ?)")
        .bind(company.id)
        .bind(&company.name)
        .bind(&company.address)
        .bind(&company.country)
        .execute(&mut **tx)
        .await?;
    for employee in &entry.employees {
        insert_employee(tx, employee).await?;
    }
    Ok(())
}

// LIKE treats % and _ as wildcards; backslash is MySQL's default escape
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

pub struct MySqlCompanyRepository {
    pool: MySqlPool,
}

impl MySqlCompanyRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CompanyRepository for MySqlCompanyRepository {
    async fn get_all_companies(&self) -> RepositoryResult<Vec<Company>> {
        let companies = sqlx::query_as::<_, Company>(
            "SELECT id, name, address, country FROM Companies_ ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(companies)
    }

    async fn get_company(&self, id: Uuid) -> RepositoryResult<Option<Company>> {
        let company = sqlx::query_as::<_, Company>(
            "SELECT id, name, address, country FROM Companies_ WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(company)
    }

    async fn get_by_ids(&self, ids: &[Uuid]) -> RepositoryResult<Vec<Company>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut query =
            QueryBuilder::<MySql>::new("SELECT id, name, address, country FROM Companies_ WHERE id IN (");
        let mut separated = query.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(")");
        let companies = query
            .build_query_as::<Company>()
            .fetch_all(&self.pool)
            .await?;
        Ok(companies)
    }

    async fn create_company(&self, company: &CompanyWithEmployees) -> RepositoryResult<()> {
        let mut tx = self.pool.begin().await?;
        insert_company(&mut tx, company).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn create_companies(&self, companies: &[CompanyWithEmployees]) -> RepositoryResult<()> {
        let mut tx = self.pool.begin().await?;
        for company in companies {
            insert_company(&mut tx, company).await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn update_company(&self, company: &Company, new_employees: &[Employee]) -> RepositoryResult<()> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("UPDATE Companies_ SET name = ?, address = ?, country = ? WHERE id = ?")
            .bind(&company.name)
            .bind(&company.address)
            .bind(&company.country)
            .bind(company.id)
            .execute(&mut *tx)
            .await?;
        for employee in new_employees {
            insert_employee(&mut tx, employee).await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn delete_company(&self, id: Uuid) -> RepositoryResult<()> {
        sqlx::query("DELETE FROM Companies_ WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

pub struct MySqlEmployeeRepository {
    pool: MySqlPool,
}

impl MySqlEmployeeRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn push_filters(
        query: &mut QueryBuilder<'_, MySql>,
        company_id: Uuid,
        parameters: &EmployeeParameters,
        search: Option<String>,
    ) {
        query
            .push(" WHERE company_id = ")
            .push_bind(company_id)
            .push(" AND age >= ")
            .push_bind(parameters.min_age)
            .push(" AND age <= ")
            .push_bind(parameters.max_age);
        if let Some(term) = search {
            query
                .push(" AND LOWER(name) LIKE ")
                .push_bind(format!("%{}%", escape_like(&term)));
        }
    }
}

#[async_trait]
impl EmployeeRepository for MySqlEmployeeRepository {
    async fn get_employees(
        &self,
        company_id: Uuid,
        parameters: &EmployeeParameters,
    ) -> RepositoryResult<PagedList<Employee>> {
        let search = parameters.normalized_search_term();

        let mut count_query = QueryBuilder::<MySql>::new("SELECT COUNT(*) FROM Employees_");
        Self::push_filters(&mut count_query, company_id, parameters, search.clone());
        let total_count: i64 = count_query
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let mut query = QueryBuilder::<MySql>::new(
            "SELECT id, name, age, position, company_id FROM Employees_",
        );
        Self::push_filters(&mut query, company_id, parameters, search);
        query
            .push(" ORDER BY ")
            .push(parameters.order().to_sql())
            .push(" LIMIT ")
            .push_bind(u64::from(parameters.page_size()))
            .push(" OFFSET ")
            .push_bind(parameters.offset());
        let employees = query
            .build_query_as::<Employee>()
            .fetch_all(&self.pool)
            .await?;

        Ok(PagedList::new(
            employees,
            total_count.max(0) as u64,
            parameters.page_number(),
            parameters.page_size(),
        ))
    }

    async fn get_employee(&self, company_id: Uuid, id: Uuid) -> RepositoryResult<Option<Employee>> {
        let employee = sqlx::query_as::<_, Employee>(
            "SELECT id, name, age, position, company_id FROM Employees_ WHERE company_id = ? AND id = ?",
        )
        .bind(company_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(employee)
    }

    async fn create_employee(&self, employee: &Employee) -> RepositoryResult<()> {
        let mut tx = self.pool.begin().await?;
        insert_employee(&mut tx, employee).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn update_employee(&self, employee: &Employee) -> RepositoryResult<()> {
        sqlx::query("UPDATE Employees_ SET name = ?, age = ?, position = ? WHERE company_id = ? AND id = ?")
            .bind(&employee.name)
            .bind(employee.age)
            .bind(&employee.position)
            .bind(employee.company_id)
            .bind(employee.id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete_employee(&self, company_id: Uuid, id: Uuid) -> RepositoryResult<()> {
        sqlx::query("DELETE FROM Employees_ WHERE company_id = ? AND id = ?")
            .bind(company_id)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

pub struct MySqlUserRepository {
    pool: MySqlPool,
}

impl MySqlUserRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

// MySQL names the violated key in the message, e.g. "for key 'Users_.email'"
fn user_insert_error(e: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_unique_violation() {
            let violated_key = db.message().rsplit("for key").next().unwrap_or_default();
            let key = if violated_key.contains("email") {
                UserUniqueKey::Email
            } else {
                UserUniqueKey::UserName
            };
            return RepositoryError::DuplicateUser(key);
        }
    }
    RepositoryError::Database(e)
}

const USER_COLUMNS: &str =
    "id, first_name, last_name, user_name, email, phone_number, password_hash";

#[async_trait]
impl UserRepository for MySqlUserRepository {
    async fn find_by_user_name(&self, user_name: &str) -> RepositoryResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM Users_ WHERE user_name = ?",
            USER_COLUMNS
        ))
        .bind(user_name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM Users_ WHERE email = ?",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn create_user(&self, user: &User, roles: &[String]) -> RepositoryResult<()> {
        let mut tx = self.pool.begin().await?;
        sqlx::query(
            "INSERT INTO Users_ (id, first_name, last_name, user_name, email, phone_number, password_hash) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(user.id)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.user_name)
        .bind(&user.email)
        .bind(&user.phone_number)
        .bind(&user.password_hash)
        .execute(&mut *tx)
        .await
        .map_err(user_insert_error)?;
        for role in roles {
            sqlx::query("INSERT INTO UserRoles_ (user_id, role_name) VALUES (?, ?)")
                .bind(user.id)
                .bind(role)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn get_roles(&self, user_id: Uuid) -> RepositoryResult<Vec<String>> {
        let roles = sqlx::query_scalar::<_, String>(
            "SELECT role_name FROM UserRoles_ WHERE user_id = ? ORDER BY role_name",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(roles)
    }
}

pub struct MySqlSessionRepository {
    pool: MySqlPool,
}

impl MySqlSessionRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionRepository for MySqlSessionRepository {
    async fn create_session(&self, session: &Session) -> RepositoryResult<()> {
        sqlx::query(
            "INSERT INTO Sessions_ (session_id, user_id, expires_at, is_persistent) VALUES (?, ?, ?, ?)",
        )
        .bind(&session.session_id)
        .bind(session.user_id)
        .bind(session.expires_at)
        .bind(session.is_persistent)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_session(&self, session_id: &str) -> RepositoryResult<Option<Session>> {
        let session = sqlx::query_as::<_, Session>(
            "SELECT session_id, user_id, expires_at, is_persistent FROM Sessions_ WHERE session_id = ?",
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(session)
    }

    async fn delete_session(&self, session_id: &str) -> RepositoryResult<()> {
        sqlx::query("DELETE FROM Sessions_ WHERE session_id = ?")
            .bind(session_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
