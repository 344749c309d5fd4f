pub mod employees_handlers;
pub mod employees_models;
