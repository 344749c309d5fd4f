pub mod config;
pub mod data_shaping;
pub mod errors;
pub mod models;
pub mod repository;
pub mod request_features;
pub mod routes;
pub mod validation;
