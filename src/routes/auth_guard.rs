use std::future::Future;
use std::pin::Pin;

use actix_web::{dev::Payload, http::header, web, FromRequest, HttpRequest};
use chrono::Utc;
use log::{error, info};
use uuid::Uuid;

use crate::errors::ApiError;
use crate::repository::RepositoryManager;

pub const SESSION_COOKIE: &str = "session_id";

/// Session id from the `session_id` cookie, falling back to `Authorization: Bearer`.
pub fn session_id_from_request(req: &HttpRequest) -> Option<String> {
    if let Some(cookie) = req.cookie(SESSION_COOKIE) {
        return Some(cookie.value().to_string());
    }
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_owned)
}

#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub session_id: String,
    pub roles: Vec<String>,
}

impl AuthenticatedUser {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r.eq_ignore_ascii_case(role))
    }

    pub fn require_role(&self, role: &str) -> Result<(), ApiError> {
        if self.has_role(role) {
            Ok(())
        } else {
            info!("User {} lacks role {}", self.user_id, role);
            Err(ApiError::Forbidden(format!(
                "The {} role is required to access this resource.",
                role
            )))
        }
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = ApiError;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let repos = req.app_data::<web::Data<RepositoryManager>>().cloned();
        let session_id = session_id_from_request(req);

        Box::pin(async move {
            let repos = repos.ok_or_else(|| {
                error!("RepositoryManager is not registered as app data");
                ApiError::Internal
            })?;
            let session_id = session_id
                .ok_or_else(|| ApiError::Unauthorized("Authentication is required.".into()))?;

            let session = match repos.sessions.find_session(&session_id).await? {
                Some(session) if !session.is_expired(Utc::now()) => session,
                Some(_) => {
                    info!("Session {} has expired", session_id);
                    return Err(ApiError::Unauthorized("Session has expired.".into()));
                }
                None => {
                    info!("Unknown session {}", session_id);
                    return Err(ApiError::Unauthorized("Invalid session.".into()));
                }
            };

            let roles = repos.users.get_roles(session.user_id).await?;
            Ok(AuthenticatedUser {
                user_id: session.user_id,
                session_id,
                roles,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::cookie::Cookie;
    use actix_web::test::TestRequest;

    #[test]
    fn cookie_wins_over_bearer_header() {
        let req = TestRequest::default()
            .cookie(Cookie::new(SESSION_COOKIE, "from-cookie"))
            .insert_header((header::AUTHORIZATION, "Bearer from-header"))
            .to_http_request();
        assert_eq!(session_id_from_request(&req).as_deref(), Some("from-cookie"));
    }

    #[test]
    fn bearer_header_is_accepted() {
        let req = TestRequest::default()
            .insert_header((header::AUTHORIZATION, "Bearer abc-123"))
            .to_http_request();
        assert_eq!(session_id_from_request(&req).as_deref(), Some("abc-123"));
    }

    #[test]
    fn other_schemes_are_ignored() {
        let req = TestRequest::default()
            .insert_header((header::AUTHORIZATION, "Basic dXNlcjpwYXNz"))
            .to_http_request();
        assert_eq!(session_id_from_request(&req), None);
    }

    #[test]
    fn roles_match_case_insensitively() {
        let user = AuthenticatedUser {
            user_id: Uuid::new_v4(),
            session_id: "s".into(),
            roles: vec!["manager".into()],
        };
        assert!(user.require_role("Manager").is_ok());
        assert!(matches!(
            user.require_role("Administrator"),
            Err(ApiError::Forbidden(_))
        ));
    }
}
