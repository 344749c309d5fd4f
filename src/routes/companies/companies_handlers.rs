use actix_web::{http::header, web, HttpRequest, HttpResponse};
use log::info;
use uuid::Uuid;

use super::companies_models::{CompanyDto, CompanyForCreationDto, CompanyForUpdateDto};
use crate::errors::ApiError;
use crate::models::company::Company;
use crate::models::user::MANAGER_ROLE;
use crate::repository::RepositoryManager;
use crate::routes::auth_guard::AuthenticatedUser;
use crate::routes::location_for;
use crate::routes::model_binders::IdsPath;
use crate::validation::ValidationErrors;

async fn get_company_and_check_if_it_exists(
    repos: &RepositoryManager,
    id: Uuid,
) -> Result<Company, ApiError> {
    repos.companies.get_company(id).await?.ok_or_else(|| {
        info!("Company {} not found", id);
        ApiError::company_not_found(id)
    })
}

fn to_dtos(companies: &[Company]) -> Vec<CompanyDto> {
    companies.iter().map(CompanyDto::from).collect()
}

// GET /api/companies
pub async fn get_companies(
    repos: web::Data<RepositoryManager>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    user.require_role(MANAGER_ROLE)?;
    let companies = repos.companies.get_all_companies().await?;
    info!("Returning {} companies", companies.len());
    Ok(HttpResponse::Ok().json(to_dtos(&companies)))
}

// GET /api/companies/{id}
pub async fn get_company(
    repos: web::Data<RepositoryManager>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let company = get_company_and_check_if_it_exists(&repos, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(CompanyDto::from(&company)))
}

// POST /api/companies
pub async fn create_company(
    req: HttpRequest,
    repos: web::Data<RepositoryManager>,
    body: web::Json<CompanyForCreationDto>,
) -> Result<HttpResponse, ApiError> {
    let company = body.into_inner();
    company.validate().into_result()?;

    let entry = company.into_entity();
    repos.companies.create_company(&entry).await?;
    info!(
        "Created company {} with {} employees",
        entry.company.id,
        entry.employees.len()
    );

    let location = location_for(&req, "company_by_id", [entry.company.id.to_string()])?;
    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, location))
        .json(CompanyDto::from(&entry.company)))
}

// GET /api/companies/collection/({ids})
pub async fn get_company_collection(
    repos: web::Data<RepositoryManager>,
    ids: IdsPath<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let ids = ids.into_inner().ok_or_else(ApiError::id_parameters_missing)?;

    let companies = repos.companies.get_by_ids(&ids).await?;
    if companies.len() != ids.len() {
        info!("Requested {} companies, found {}", ids.len(), companies.len());
        return Err(ApiError::collection_by_ids_mismatch());
    }

    Ok(HttpResponse::Ok().json(to_dtos(&companies)))
}

// POST /api/companies/collection
pub async fn create_company_collection(
    req: HttpRequest,
    repos: web::Data<RepositoryManager>,
    body: web::Json<Option<Vec<CompanyForCreationDto>>>,
) -> Result<HttpResponse, ApiError> {
    let collection = body
        .into_inner()
        .ok_or_else(ApiError::company_collection_missing)?;

    let mut errors = ValidationErrors::new();
    for (i, company) in collection.iter().enumerate() {
        errors.merge_prefixed(&format!("[{}].", i), company.validate());
    }
    errors.into_result()?;

    let entries: Vec<_> = collection
        .into_iter()
        .map(CompanyForCreationDto::into_entity)
        .collect();
    repos.companies.create_companies(&entries).await?;
    info!("Created a collection of {} companies", entries.len());

    let ids = entries
        .iter()
        .map(|entry| entry.company.id.to_string())
        .collect::<Vec<_>>()
        .join(",");
    let location = location_for(&req, "company_collection", [format!("({})", ids)])?;
    let companies: Vec<CompanyDto> = entries
        .iter()
        .map(|entry| CompanyDto::from(&entry.company))
        .collect();
    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, location))
        .json(companies))
}

// DELETE /api/companies/{id}
pub async fn delete_company(
    repos: web::Data<RepositoryManager>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let company = get_company_and_check_if_it_exists(&repos, path.into_inner()).await?;
    repos.companies.delete_company(company.id).await?;
    info!("Deleted company {}", company.id);
    Ok(HttpResponse::NoContent().finish())
}

// PUT /api/companies/{id}
pub async fn update_company(
    repos: web::Data<RepositoryManager>,
    path: web::Path<Uuid>,
    body: web::Json<CompanyForUpdateDto>,
) -> Result<HttpResponse, ApiError> {
    let update = body.into_inner();
    update.validate().into_result()?;
    let mut company = get_company_and_check_if_it_exists(&repos, path.into_inner()).await?;

    let new_employees = update.apply_to(&mut company);
    repos
        .companies
        .update_company(&company, &new_employees)
        .await?;
    info!(
        "Updated company {} and added {} employees",
        company.id,
        new_employees.len()
    );
    Ok(HttpResponse::NoContent().finish())
}

// OPTIONS /api/companies
pub async fn get_companies_options() -> HttpResponse {
    HttpResponse::Ok()
        .insert_header((header::ALLOW, "GET, OPTIONS, POST"))
        .finish()
}
