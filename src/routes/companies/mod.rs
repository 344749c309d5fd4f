pub mod companies_handlers;
pub mod companies_models;
