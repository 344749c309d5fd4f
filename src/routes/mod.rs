pub mod auth_guard;
pub mod authentication;
pub mod companies;
pub mod employees;
pub mod model_binders;
pub mod routes;

use actix_web::HttpRequest;
use log::error;

use crate::errors::ApiError;

/// Absolute URL of a named resource, used for `Location` headers.
pub fn location_for<U, I>(req: &HttpRequest, name: &str, elements: U) -> Result<String, ApiError>
where
    U: IntoIterator<Item = I>,
    I: AsRef<str>,
{
    req.url_for(name, elements)
        .map(|url| url.to_string())
        .map_err(|e| {
            error!("Failed to build URL for route {}: {:?}", name, e);
            ApiError::Internal
        })
}
