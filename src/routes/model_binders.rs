use std::fmt::Display;
use std::future::{ready, Ready};
use std::str::FromStr;

use actix_web::{dev::Payload, FromRequest, HttpRequest};
use log::info;
use thiserror::Error;

use crate::errors::ApiError;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Value '{value}' in the array parameter is not valid: {reason}")]
pub struct ArrayBindError {
    pub value: String,
    pub reason: String,
}

/// Binds `"a,b,c"` (optionally wrapped in parentheses) to a typed vector.
/// Blank input binds to `None`.
pub fn bind_array<T>(raw: &str) -> Result<Option<Vec<T>>, ArrayBindError>
where
    T: FromStr,
    T::Err: Display,
{
    let trimmed = raw.trim();
    let inner = trimmed
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .unwrap_or(trimmed);

    if inner.trim().is_empty() {
        return Ok(None);
    }

    inner
        .split(',')
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(|value| {
            value.parse::<T>().map_err(|e| ArrayBindError {
                value: value.to_owned(),
                reason: e.to_string(),
            })
        })
        .collect::<Result<Vec<_>, _>>()
        .map(|values| if values.is_empty() { None } else { Some(values) })
}

/// Extracts the `{ids}` path segment through [`bind_array`].
#[derive(Debug)]
pub struct IdsPath<T>(pub Option<Vec<T>>);

impl<T> IdsPath<T> {
    pub fn into_inner(self) -> Option<Vec<T>> {
        self.0
    }
}

impl<T> FromRequest for IdsPath<T>
where
    T: FromStr,
    T::Err: Display,
{
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let raw = req.match_info().get("ids").unwrap_or_default();
        let bound = bind_array::<T>(raw).map(IdsPath).map_err(|e| {
            info!("Failed to bind ids '{}': {}", raw, e);
            ApiError::BadRequest(e.to_string())
        });
        ready(bound)
    }
}
