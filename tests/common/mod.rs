//! In-memory repositories and app wiring shared by the HTTP tests

#![allow(dead_code)]

use std::cmp::Ordering;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use parking_lot::RwLock;
use uuid::Uuid;

use company_employees::config::AuthSettings;
use company_employees::models::{
    company::Company, employee::Employee, session::Session, user::User,
};
use company_employees::repository::{
    CompanyRepository, CompanyWithEmployees, EmployeeRepository, RepositoryError,
    RepositoryManager, RepositoryResult, SessionRepository, UserRepository, UserUniqueKey,
};
use company_employees::request_features::{
    EmployeeParameters, EmployeeSortField, PagedList, SortClause,
};

pub const IT_SOLUTIONS: &str = "c9d4c053-49b6-410c-bc78-2d54a9991870";
pub const ADMIN_SOLUTIONS: &str = "3d490a70-94ce-4d15-9494-5248280c2ce3";
pub const SAM_RAIDEN: &str = "80abbca8-664d-4b20-b5de-024705497d4a";
pub const JANA_MCLEAF: &str = "86dba8c0-d178-41e7-938c-ed49778fb52a";
pub const KANE_MILLER: &str = "021ca3c1-0deb-4afd-ae94-2159a8479811";

pub fn id(raw: &str) -> Uuid {
    Uuid::parse_str(raw).unwrap()
}

#[derive(Default)]
pub struct InMemoryStore {
    pub companies: RwLock<Vec<Company>>,
    pub employees: RwLock<Vec<Employee>>,
    pub users: RwLock<Vec<User>>,
    pub user_roles: RwLock<Vec<(Uuid, String)>>,
    pub sessions: RwLock<Vec<Session>>,
}

impl InMemoryStore {
    /// Same sample data the initial migration seeds
    pub fn seeded() -> Arc<Self> {
        let store = Self::default();
        store.companies.write().extend([
            Company {
                id: id(IT_SOLUTIONS),
                name: "IT_Solutions Ltd".into(),
                address: "583 Wall Dr. Gwynn Oak, MD 21207".into(),
                country: "USA".into(),
            },
            Company {
                id: id(ADMIN_SOLUTIONS),
                name: "Admin_Solutions Ltd".into(),
                address: "312 Forest Avenue, BF 923".into(),
                country: "USA".into(),
            },
        ]);
        store.employees.write().extend([
            employee(SAM_RAIDEN, "Sam Raiden", 26, "Software developer", IT_SOLUTIONS),
            employee(JANA_MCLEAF, "Jana McLeaf", 30, "Software developer", IT_SOLUTIONS),
            employee(KANE_MILLER, "Kane Miller", 35, "Administrator", ADMIN_SOLUTIONS),
        ]);
        Arc::new(store)
    }

    pub fn manager(self: &Arc<Self>) -> RepositoryManager {
        RepositoryManager::new(self.clone(), self.clone(), self.clone(), self.clone())
    }

    pub fn add_employee(&self, name: &str, age: i32, position: &str, company: &str) -> Uuid {
        let new_id = Uuid::new_v4();
        self.employees.write().push(Employee {
            id: new_id,
            name: name.into(),
            age,
            position: position.into(),
            company_id: id(company),
        });
        new_id
    }

    /// Creates a user holding `roles` and a live session; returns the session id.
    pub fn login_with_roles(&self, roles: &[&str]) -> String {
        self.session_for_roles(roles, Utc::now() + Duration::minutes(30))
    }

    pub fn expired_session(&self) -> String {
        self.session_for_roles(&["Manager"], Utc::now() - Duration::minutes(1))
    }

    fn session_for_roles(&self, roles: &[&str], expires_at: chrono::DateTime<Utc>) -> String {
        let user_id = Uuid::new_v4();
        self.users.write().push(User {
            id: user_id,
            first_name: None,
            last_name: None,
            user_name: format!("user-{}", user_id),
            email: format!("{}@example.com", user_id),
            phone_number: None,
            password_hash: String::new(),
        });
        self.user_roles
            .write()
            .extend(roles.iter().map(|role| (user_id, role.to_string())));
        let session_id = Uuid::new_v4().to_string();
        self.sessions.write().push(Session {
            session_id: session_id.clone(),
            user_id,
            expires_at,
            is_persistent: false,
        });
        session_id
    }

    pub fn employees_of(&self, company: Uuid) -> Vec<Employee> {
        self.employees
            .read()
            .iter()
            .filter(|e| e.company_id == company)
            .cloned()
            .collect()
    }
}

fn employee(raw_id: &str, name: &str, age: i32, position: &str, company: &str) -> Employee {
    Employee {
        id: id(raw_id),
        name: name.into(),
        age,
        position: position.into(),
        company_id: id(company),
    }
}

fn compare(a: &Employee, b: &Employee, clauses: &[SortClause]) -> Ordering {
    for clause in clauses {
        let ordering = match clause.field {
            EmployeeSortField::Id => a.id.cmp(&b.id),
            EmployeeSortField::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            EmployeeSortField::Age => a.age.cmp(&b.age),
            EmployeeSortField::Position => a.position.to_lowercase().cmp(&b.position.to_lowercase()),
        };
        let ordering = if clause.descending {
            ordering.reverse()
        } else {
            ordering
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

#[async_trait]
impl CompanyRepository for InMemoryStore {
    async fn get_all_companies(&self) -> RepositoryResult<Vec<Company>> {
        let mut companies = self.companies.read().clone();
        companies.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(companies)
    }

    async fn get_company(&self, id: Uuid) -> RepositoryResult<Option<Company>> {
        Ok(self.companies.read().iter().find(|c| c.id == id).cloned())
    }

    async fn get_by_ids(&self, ids: &[Uuid]) -> RepositoryResult<Vec<Company>> {
        Ok(self
            .companies
            .read()
            .iter()
            .filter(|c| ids.contains(&c.id))
            .cloned()
            .collect())
    }

    async fn create_company(&self, company: &CompanyWithEmployees) -> RepositoryResult<()> {
        self.companies.write().push(company.company.clone());
        self.employees.write().extend(company.employees.iter().cloned());
        Ok(())
    }

    async fn create_companies(&self, companies: &[CompanyWithEmployees]) -> RepositoryResult<()> {
        for company in companies {
            self.create_company(company).await?;
        }
        Ok(())
    }

    async fn update_company(&self, company: &Company, new_employees: &[Employee]) -> RepositoryResult<()> {
        if let Some(stored) = self.companies.write().iter_mut().find(|c| c.id == company.id) {
            *stored = company.clone();
        }
        self.employees.write().extend(new_employees.iter().cloned());
        Ok(())
    }

    async fn delete_company(&self, id: Uuid) -> RepositoryResult<()> {
        self.companies.write().retain(|c| c.id != id);
        self.employees.write().retain(|e| e.company_id != id);
        Ok(())
    }
}

#[async_trait]
impl EmployeeRepository for InMemoryStore {
    async fn get_employees(
        &self,
        company_id: Uuid,
        parameters: &EmployeeParameters,
    ) -> RepositoryResult<PagedList<Employee>> {
        let search = parameters.normalized_search_term();
        let mut matching: Vec<Employee> = self
            .employees
            .read()
            .iter()
            .filter(|e| e.company_id == company_id)
            .filter(|e| e.age >= parameters.min_age && e.age <= parameters.max_age)
            .filter(|e| {
                search
                    .as_deref()
                    .map_or(true, |term| e.name.to_lowercase().contains(term))
            })
            .cloned()
            .collect();
        let order = parameters.order();
        matching.sort_by(|a, b| compare(a, b, order.clauses()));

        let total = matching.len() as u64;
        let items = matching
            .into_iter()
            .skip(parameters.offset() as usize)
            .take(parameters.page_size() as usize)
            .collect();
        Ok(PagedList::new(
            items,
            total,
            parameters.page_number(),
            parameters.page_size(),
        ))
    }

    async fn get_employee(&self, company_id: Uuid, id: Uuid) -> RepositoryResult<Option<Employee>> {
        Ok(self
            .employees
            .read()
            .iter()
            .find(|e| e.company_id == company_id && e.id == id)
            .cloned())
    }

    async fn create_employee(&self, employee: &Employee) -> RepositoryResult<()> {
        self.employees.write().push(employee.clone());
        Ok(())
    }

    async fn update_employee(&self, employee: &Employee) -> RepositoryResult<()> {
        if let Some(stored) = self
            .employees
            .write()
            .iter_mut()
            .find(|e| e.id == employee.id && e.company_id == employee.company_id)
        {
            *stored = employee.clone();
        }
        Ok(())
    }

    async fn delete_employee(&self, company_id: Uuid, id: Uuid) -> RepositoryResult<()> {
        self.employees
            .write()
            .retain(|e| !(e.company_id == company_id && e.id == id));
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_user_name(&self, user_name: &str) -> RepositoryResult<Option<User>> {
        Ok(self
            .users
            .read()
            .iter()
            .find(|u| u.user_name.eq_ignore_ascii_case(user_name))
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<User>> {
        Ok(self
            .users
            .read()
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn create_user(&self, user: &User, roles: &[String]) -> RepositoryResult<()> {
        let mut users = self.users.write();
        if users.iter().any(|u| u.user_name.eq_ignore_ascii_case(&user.user_name)) {
            return Err(RepositoryError::DuplicateUser(UserUniqueKey::UserName));
        }
        if users.iter().any(|u| u.email.eq_ignore_ascii_case(&user.email)) {
            return Err(RepositoryError::DuplicateUser(UserUniqueKey::Email));
        }
        users.push(user.clone());
        drop(users);
        self.user_roles
            .write()
            .extend(roles.iter().map(|role| (user.id, role.clone())));
        Ok(())
    }

    async fn get_roles(&self, user_id: Uuid) -> RepositoryResult<Vec<String>> {
        Ok(self
            .user_roles
            .read()
            .iter()
            .filter(|(id, _)| *id == user_id)
            .map(|(_, role)| role.clone())
            .collect())
    }
}

#[async_trait]
impl SessionRepository for InMemoryStore {
    async fn create_session(&self, session: &Session) -> RepositoryResult<()> {
        self.sessions.write().push(session.clone());
        Ok(())
    }

    async fn find_session(&self, session_id: &str) -> RepositoryResult<Option<Session>> {
        Ok(self
            .sessions
            .read()
            .iter()
            .find(|s| s.session_id == session_id)
            .cloned())
    }

    async fn delete_session(&self, session_id: &str) -> RepositoryResult<()> {
        self.sessions.write().retain(|s| s.session_id != session_id);
        Ok(())
    }
}

/// Lowest bcrypt cost so the tests stay fast.
pub fn auth_settings() -> AuthSettings {
    AuthSettings {
        bcrypt_cost: 4,
        ..AuthSettings::default()
    }
}

/// Builds the full API over `$store` (an `Arc<InMemoryStore>`).
macro_rules! init_app {
    ($store:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new($store.manager()))
                .app_data(actix_web::web::Data::new($crate::common::auth_settings()))
                .configure(company_employees::routes::routes::configure),
        )
        .await
    };
}
