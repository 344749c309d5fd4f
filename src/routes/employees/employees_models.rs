use std::fmt::Display;

use json_patch::Patch;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::employee::Employee;
use crate::validation::{check_text, ValidationErrors};

const MIN_EMPLOYEE_AGE: i32 = 18;
const PATCH_DOCUMENT_FIELD: &str = "patchDoc";

// response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeDto {
    pub id: Uuid,
    pub name: String,
    pub age: i32,
    pub position: String,
}

impl From<&Employee> for EmployeeDto {
    fn from(employee: &Employee) -> Self {
        Self {
            id: employee.id,
            name: employee.name.clone(),
            age: employee.age,
            position: employee.position.clone(),
        }
    }
}

// requests
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeForCreationDto {
    pub name: Option<String>,
    pub age: Option<i32>,
    pub position: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeForUpdateDto {
    pub name: Option<String>,
    pub age: Option<i32>,
    pub position: Option<String>,
}

fn validate_employee(name: Option<&str>, age: Option<i32>, position: Option<&str>) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    check_text(
        &mut errors,
        "name",
        name,
        "Employee name is a required field.",
        30,
        "Maximum length for the Name is 30 characters.",
    );
    match age {
        None => errors.add("age", "Age is a required field."),
        Some(age) if age < MIN_EMPLOYEE_AGE => {
            errors.add("age", "Age is required and it can't be lower than 18.")
        }
        Some(_) => {}
    }
    check_text(
        &mut errors,
        "position",
        position,
        "Position is a required field.",
        20,
        "Maximum length for the Position is 20 characters.",
    );
    errors
}

impl EmployeeForCreationDto {
    pub fn validate(&self) -> ValidationErrors {
        validate_employee(self.name.as_deref(), self.age, self.position.as_deref())
    }

    /// Call only after `validate` came back empty.
    pub fn into_entity(self, company_id: Uuid) -> Employee {
        Employee {
            id: Uuid::new_v4(),
            name: self.name.unwrap_or_default().trim().to_owned(),
            age: self.age.unwrap_or_default(),
            position: self.position.unwrap_or_default().trim().to_owned(),
            company_id,
        }
    }
}

impl EmployeeForUpdateDto {
    pub fn validate(&self) -> ValidationErrors {
        validate_employee(self.name.as_deref(), self.age, self.position.as_deref())
    }

    pub fn apply_to(self, employee: &mut Employee) {
        if let Some(name) = self.name {
            employee.name = name.trim().to_owned();
        }
        if let Some(age) = self.age {
            employee.age = age;
        }
        if let Some(position) = self.position {
            employee.position = position.trim().to_owned();
        }
    }

    /// Runs a JSON Patch document against the camelCase form of this update.
    /// A removed field comes back as `None`, so validation reports it missing.
    pub fn patched(&self, document: &Patch) -> Result<Self, ValidationErrors> {
        let mut value = serde_json::to_value(self).map_err(patch_failure)?;
        json_patch::patch(&mut value, document).map_err(patch_failure)?;
        serde_json::from_value(value).map_err(patch_failure)
    }
}

fn patch_failure(error: impl Display) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    errors.add(PATCH_DOCUMENT_FIELD, error.to_string());
    errors
}

impl From<&Employee> for EmployeeForUpdateDto {
    fn from(employee: &Employee) -> Self {
        Self {
            name: Some(employee.name.clone()),
            age: Some(employee.age),
            position: Some(employee.position.clone()),
        }
    }
}
