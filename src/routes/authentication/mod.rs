pub mod authentication_handlers;
pub mod authentication_models;
