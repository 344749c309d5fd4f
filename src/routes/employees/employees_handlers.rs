use actix_web::{web, HttpRequest, HttpResponse};
use json_patch::Patch;
use log::info;
use uuid::Uuid;

use super::employees_models::{EmployeeDto, EmployeeForCreationDto, EmployeeForUpdateDto};
use crate::data_shaping::DataShaper;
use crate::errors::ApiError;
use crate::models::employee::Employee;
use crate::repository::RepositoryManager;
use crate::request_features::EmployeeParameters;
use crate::routes::location_for;

pub const PAGINATION_HEADER: &str = "X-Pagination";

async fn check_if_company_exists(repos: &RepositoryManager, company_id: Uuid) -> Result<(), ApiError> {
    match repos.companies.get_company(company_id).await? {
        Some(_) => Ok(()),
        None => {
            info!("Company {} not found", company_id);
            Err(ApiError::company_not_found(company_id))
        }
    }
}

async fn get_employee_for_company_and_check_if_it_exists(
    repos: &RepositoryManager,
    company_id: Uuid,
    id: Uuid,
) -> Result<Employee, ApiError> {
    repos
        .employees
        .get_employee(company_id, id)
        .await?
        .ok_or_else(|| {
            info!("Employee {} not found in company {}", id, company_id);
            ApiError::employee_not_found(id)
        })
}

// GET /api/companies/{companyId}/employees
pub async fn get_employees_for_company(
    repos: web::Data<RepositoryManager>,
    path: web::Path<Uuid>,
    parameters: web::Query<EmployeeParameters>,
) -> Result<HttpResponse, ApiError> {
    let company_id = path.into_inner();
    let parameters = parameters.into_inner();

    if !parameters.valid_age_range() {
        return Err(ApiError::max_age_range());
    }
    check_if_company_exists(&repos, company_id).await?;

    let page = repos
        .employees
        .get_employees(company_id, &parameters)
        .await?
        .map(|employee| EmployeeDto::from(&employee));
    let shaped = DataShaper::<EmployeeDto>::new()
        .shape_collection(&page.items, parameters.fields.as_deref())?;

    info!(
        "Returning {} of {} employees for company {}",
        shaped.len(),
        page.meta_data.total_count,
        company_id
    );
    Ok(HttpResponse::Ok()
        .insert_header((PAGINATION_HEADER, serde_json::to_string(&page.meta_data)?))
        .json(shaped))
}

// GET /api/companies/{companyId}/employees/{id}
pub async fn get_employee_for_company(
    repos: web::Data<RepositoryManager>,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse, ApiError> {
    let (company_id, id) = path.into_inner();
    check_if_company_exists(&repos, company_id).await?;
    let employee = get_employee_for_company_and_check_if_it_exists(&repos, company_id, id).await?;
    Ok(HttpResponse::Ok().json(EmployeeDto::from(&employee)))
}

// POST /api/companies/{companyId}/employees
pub async fn create_employee_for_company(
    req: HttpRequest,
    repos: web::Data<RepositoryManager>,
    path: web::Path<Uuid>,
    body: web::Json<EmployeeForCreationDto>,
) -> Result<HttpResponse, ApiError> {
    let company_id = path.into_inner();
    let employee = body.into_inner();
    employee.validate().into_result()?;
    check_if_company_exists(&repos, company_id).await?;

    let employee = employee.into_entity(company_id);
    repos.employees.create_employee(&employee).await?;
    info!("Created employee {} for company {}", employee.id, company_id);

    let location = location_for(
        &req,
        "employee_for_company",
        [company_id.to_string(), employee.id.to_string()],
    )?;
    Ok(HttpResponse::Created()
        .insert_header((actix_web::http::header::LOCATION, location))
        .json(EmployeeDto::from(&employee)))
}

// DELETE /api/companies/{companyId}/employees/{id}
pub async fn delete_employee_for_company(
    repos: web::Data<RepositoryManager>,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse, ApiError> {
    let (company_id, id) = path.into_inner();
    check_if_company_exists(&repos, company_id).await?;
    get_employee_for_company_and_check_if_it_exists(&repos, company_id, id).await?;

    repos.employees.delete_employee(company_id, id).await?;
    info!("Deleted employee {} of company {}", id, company_id);
    Ok(HttpResponse::NoContent().finish())
}

// PUT /api/companies/{companyId}/employees/{id}
pub async fn update_employee_for_company(
    repos: web::Data<RepositoryManager>,
    path: web::Path<(Uuid, Uuid)>,
    body: web::Json<EmployeeForUpdateDto>,
) -> Result<HttpResponse, ApiError> {
    let (company_id, id) = path.into_inner();
    let update = body.into_inner();
    update.validate().into_result()?;
    check_if_company_exists(&repos, company_id).await?;
    let mut employee = get_employee_for_company_and_check_if_it_exists(&repos, company_id, id).await?;

    update.apply_to(&mut employee);
    repos.employees.update_employee(&employee).await?;
    info!("Updated employee {} of company {}", id, company_id);
    Ok(HttpResponse::NoContent().finish())
}

// PATCH /api/companies/{companyId}/employees/{id}
pub async fn partially_update_employee_for_company(
    repos: web::Data<RepositoryManager>,
    path: web::Path<(Uuid, Uuid)>,
    body: web::Json<Option<Patch>>,
) -> Result<HttpResponse, ApiError> {
    let (company_id, id) = path.into_inner();
    let document = body
        .into_inner()
        .ok_or_else(|| ApiError::BadRequest("patchDoc object sent from client is null.".into()))?;
    check_if_company_exists(&repos, company_id).await?;
    let mut employee = get_employee_for_company_and_check_if_it_exists(&repos, company_id, id).await?;

    let update = EmployeeForUpdateDto::from(&employee)
        .patched(&document)
        .map_err(|errors| {
            info!("Patch document for employee {} could not be applied", id);
            ApiError::Validation(errors)
        })?;
    update.validate().into_result()?;

    update.apply_to(&mut employee);
    repos.employees.update_employee(&employee).await?;
    info!("Patched employee {} of company {}", id, company_id);
    Ok(HttpResponse::NoContent().finish())
}
