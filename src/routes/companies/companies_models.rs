use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::company::Company;
use crate::models::employee::Employee;
use crate::repository::CompanyWithEmployees;
use crate::routes::employees::employees_models::EmployeeForCreationDto;
use crate::validation::{check_max_length, check_text, ValidationErrors};

// response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyDto {
    pub id: Uuid,
    pub name: String,
    pub full_address: String,
}

impl From<&Company> for CompanyDto {
    fn from(company: &Company) -> Self {
        Self {
            id: company.id,
            name: company.name.clone(),
            full_address: format!("{} {}", company.address, company.country),
        }
    }
}

// requests
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyForCreationDto {
    pub name: Option<String>,
    pub address: Option<String>,
    pub country: Option<String>,
    pub employees: Option<Vec<EmployeeForCreationDto>>,
}

/// Same shape as creation; `employees` are added to the company, never replaced.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyForUpdateDto {
    pub name: Option<String>,
    pub address: Option<String>,
    pub country: Option<String>,
    pub employees: Option<Vec<EmployeeForCreationDto>>,
}

fn validate_company(
    name: Option<&str>,
    address: Option<&str>,
    country: Option<&str>,
    employees: Option<&[EmployeeForCreationDto]>,
) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    check_text(
        &mut errors,
        "name",
        name,
        "Company name is a required field.",
        60,
        "Maximum length for the Name is 60 characters.",
    );
    check_text(
        &mut errors,
        "address",
        address,
        "Company address is a required field.",
        60,
        "Maximum length for the Address is 60 characters.",
    );
    check_max_length(
        &mut errors,
        "country",
        country,
        255,
        "Maximum length for the Country is 255 characters.",
    );
    for (i, employee) in employees.unwrap_or_default().iter().enumerate() {
        errors.merge_prefixed(&format!("employees[{}].", i), employee.validate());
    }
    errors
}

fn text(value: Option<String>) -> String {
    value.unwrap_or_default().trim().to_owned()
}

impl CompanyForCreationDto {
    pub fn validate(&self) -> ValidationErrors {
        validate_company(
            self.name.as_deref(),
            self.address.as_deref(),
            self.country.as_deref(),
            self.employees.as_deref(),
        )
    }

    pub fn into_entity(self) -> CompanyWithEmployees {
        let company = Company {
            id: Uuid::new_v4(),
            name: text(self.name),
            address: text(self.address),
            country: text(self.country),
        };
        let employees = self
            .employees
            .unwrap_or_default()
            .into_iter()
            .map(|employee| employee.into_entity(company.id))
            .collect();
        CompanyWithEmployees { company, employees }
    }
}

impl CompanyForUpdateDto {
    pub fn validate(&self) -> ValidationErrors {
        validate_company(
            self.name.as_deref(),
            self.address.as_deref(),
            self.country.as_deref(),
            self.employees.as_deref(),
        )
    }

    /// Overwrites the company fields and returns the employees to insert.
    pub fn apply_to(self, company: &mut Company) -> Vec<Employee> {
        company.name = text(self.name);
        company.address = text(self.address);
        company.country = text(self.country);
        let company_id = company.id;
        self.employees
            .unwrap_or_default()
            .into_iter()
            .map(|employee| employee.into_entity(company_id))
            .collect()
    }
}
