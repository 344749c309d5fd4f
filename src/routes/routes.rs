use actix_web::{http::Method, web, HttpRequest};
use log::info;

use crate::errors::ApiError;

use super::authentication::authentication_handlers;
use super::companies::companies_handlers;
use super::employees::employees_handlers;

/// Every API scope plus the JSON/query error mapping.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(query_config())
        .configure(authentication_configure)
        .configure(companies_configure);
}

pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, req: &HttpRequest| {
        info!("Rejected body for {} {}: {}", req.method(), req.path(), err);
        ApiError::BadRequest(format!("Invalid request body: {}", err)).into()
    })
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, req: &HttpRequest| {
        info!("Rejected query for {} {}: {}", req.method(), req.path(), err);
        ApiError::BadRequest(format!("Invalid query string: {}", err)).into()
    })
}

pub fn authentication_configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/authentication")
            .route("", web::post().to(authentication_handlers::register_user))
            .route("/login", web::post().to(authentication_handlers::authenticate))
            .route("/logout", web::post().to(authentication_handlers::logout)),
    );
}

pub fn companies_configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/companies")
            .configure(employees_configure)
            .service(
                web::resource("")
                    .route(web::get().to(companies_handlers::get_companies))
                    .route(web::post().to(companies_handlers::create_company))
                    .route(web::method(Method::OPTIONS).to(companies_handlers::get_companies_options)),
            )
            .service(
                web::resource("/collection")
                    .route(web::post().to(companies_handlers::create_company_collection)),
            )
            .service(
                web::resource("/collection/{ids}")
                    .name("company_collection")
                    .route(web::get().to(companies_handlers::get_company_collection)),
            )
            .service(
                web::resource("/{id}")
                    .name("company_by_id")
                    .route(web::get().to(companies_handlers::get_company))
                    .route(web::put().to(companies_handlers::update_company))
                    .route(web::delete().to(companies_handlers::delete_company)),
            ),
    );
}

// nested under /api/companies
pub fn employees_configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/{companyId}/employees")
            .service(
                web::resource("")
                    .route(web::get().to(employees_handlers::get_employees_for_company))
                    .route(web::post().to(employees_handlers::create_employee_for_company)),
            )
            .service(
                web::resource("/{id}")
                    .name("employee_for_company")
                    .route(web::get().to(employees_handlers::get_employee_for_company))
                    .route(web::put().to(employees_handlers::update_employee_for_company))
                    .route(web::patch().to(employees_handlers::partially_update_employee_for_company))
                    .route(web::delete().to(employees_handlers::delete_employee_for_company)),
            ),
    );
}

