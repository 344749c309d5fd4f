use actix_web::cookie::{time::Duration as CookieDuration, Cookie};
use actix_web::{web, HttpRequest, HttpResponse};
use bcrypt::{hash, verify};
use chrono::Utc;
use log::{error, info, warn};
use uuid::Uuid;

use super::authentication_models::{LoginResponse, UserForAuthenticationDto, UserForRegistrationDto};
use crate::config::AuthSettings;
use crate::errors::ApiError;
use crate::models::session::Session;
use crate::models::user::{User, KNOWN_ROLES};
use crate::repository::{RepositoryError, RepositoryManager, UserUniqueKey};
use crate::routes::auth_guard::{session_id_from_request, SESSION_COOKIE};
use crate::validation::ValidationErrors;

// Maps requested role names onto the seeded ones, ignoring case and duplicates
fn resolve_roles(requested: &[String], errors: &mut ValidationErrors) -> Vec<String> {
    let mut roles: Vec<String> = Vec::new();
    for role in requested {
        match KNOWN_ROLES.iter().find(|known| known.eq_ignore_ascii_case(role.trim())) {
            Some(known) => {
                if !roles.iter().any(|r| r == known) {
                    roles.push(known.to_string());
                }
            }
            None => errors.add("roles", format!("Role {} does not exist.", role)),
        }
    }
    roles
}

fn add_duplicate_error(errors: &mut ValidationErrors, key: UserUniqueKey, user_name: &str, email: &str) {
    match key {
        UserUniqueKey::UserName => errors.add(
            "DuplicateUserName",
            format!("Username '{}' is already taken.", user_name),
        ),
        UserUniqueKey::Email => {
            errors.add("DuplicateEmail", format!("Email '{}' is already taken.", email))
        }
    }
}

fn registration_failed(errors: ValidationErrors) -> ApiError {
    ApiError::Rejected {
        message: "User registration failed.".into(),
        errors,
    }
}

async fn run_blocking<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, bcrypt::BcryptError> + Send + 'static,
    T: Send + 'static,
{
    let result = web::block(f).await.map_err(|e| {
        error!("Password hashing task failed: {}", e);
        ApiError::Internal
    })?;
    Ok(result?)
}

// POST /api/authentication
pub async fn register_user(
    repos: web::Data<RepositoryManager>,
    settings: web::Data<AuthSettings>,
    body: web::Json<UserForRegistrationDto>,
) -> Result<HttpResponse, ApiError> {
    let registration = body.into_inner();
    registration.validate().into_result()?;

    let user_name = registration.user_name.unwrap_or_default().trim().to_owned();
    let email = registration.email.unwrap_or_default().trim().to_owned();
    info!("Received request to register user: {}", user_name);

    let mut errors = ValidationErrors::new();
    let roles = resolve_roles(&registration.roles, &mut errors);
    if repos.users.find_by_user_name(&user_name).await?.is_some() {
        add_duplicate_error(&mut errors, UserUniqueKey::UserName, &user_name, &email);
    }
    if repos.users.find_by_email(&email).await?.is_some() {
        add_duplicate_error(&mut errors, UserUniqueKey::Email, &user_name, &email);
    }
    if !errors.is_empty() {
        info!("Registration of {} rejected", user_name);
        return Err(registration_failed(errors));
    }

    let password = registration.password.unwrap_or_default();
    let cost = settings.bcrypt_cost;
    let password_hash = run_blocking(move || hash(password, cost)).await?;

    let user = User {
        id: Uuid::new_v4(),
        first_name: registration.first_name,
        last_name: registration.last_name,
        user_name,
        email,
        phone_number: registration.phone_number,
        password_hash,
    };
    // a concurrent registration can still win the race to the unique keys
    match repos.users.create_user(&user, &roles).await {
        Ok(()) => {}
        Err(RepositoryError::DuplicateUser(key)) => {
            warn!("Registration of {} lost to a concurrent one ({:?})", user.user_name, key);
            let mut errors = ValidationErrors::new();
            add_duplicate_error(&mut errors, key, &user.user_name, &user.email);
            return Err(registration_failed(errors));
        }
        Err(e) => return Err(e.into()),
    }
    info!("User {} registered successfully with roles {:?}", user.user_name, roles);
    Ok(HttpResponse::Created().finish())
}

// POST /api/authentication/login
pub async fn authenticate(
    repos: web::Data<RepositoryManager>,
    settings: web::Data<AuthSettings>,
    body: web::Json<UserForAuthenticationDto>,
) -> Result<HttpResponse, ApiError> {
    let credentials = body.into_inner();
    credentials.validate().into_result()?;

    let user_name = credentials.user_name.unwrap_or_default();
    let password = credentials.password.unwrap_or_default();
    info!("Received login request for user: {}", user_name);

    let user = repos.users.find_by_user_name(user_name.trim()).await?;
    let valid = match &user {
        Some(user) => {
            let password_hash = user.password_hash.clone();
            run_blocking(move || verify(password, &password_hash)).await?
        }
        None => false,
    };
    let user = match user {
        Some(user) if valid => user,
        _ => {
            warn!("Authentication failed for {}. Wrong user name or password.", user_name);
            return Err(ApiError::Unauthorized(
                "Authentication failed. Wrong user name or password.".into(),
            ));
        }
    };

    let ttl = if credentials.remember_me {
        settings.remember_me_ttl
    } else {
        settings.session_ttl
    };
    let session = Session {
        session_id: Uuid::new_v4().to_string(),
        user_id: user.id,
        expires_at: Utc::now() + ttl,
        is_persistent: credentials.remember_me,
    };
    repos.sessions.create_session(&session).await?;

    let mut cookie = Cookie::build(SESSION_COOKIE, session.session_id.clone())
        .path("/")
        .http_only(true)
        .finish();
    if session.is_persistent {
        cookie.set_max_age(CookieDuration::seconds(ttl.num_seconds()));
    }

    info!("User {} logged in successfully", user.user_name);
    Ok(HttpResponse::Ok().cookie(cookie).json(LoginResponse {
        session_id: session.session_id,
        expires_at: session.expires_at,
    }))
}

// POST /api/authentication/logout
pub async fn logout(
    req: HttpRequest,
    repos: web::Data<RepositoryManager>,
) -> Result<HttpResponse, ApiError> {
    let session_id = session_id_from_request(&req).ok_or_else(|| {
        info!("Session ID does not exist in request for logout");
        ApiError::BadRequest("Session ID does not exist".into())
    })?;

    let session = repos
        .sessions
        .find_session(&session_id)
        .await?
        .ok_or_else(|| {
            info!("Session not found for session ID: {}", session_id);
            ApiError::BadRequest("Session not found".into())
        })?;

    repos.sessions.delete_session(&session_id).await?;
    if session.is_expired(Utc::now()) {
        info!("Session already expired for session ID: {}", session_id);
        return Err(ApiError::BadRequest("Already expired session".into()));
    }

    let mut removal = Cookie::build(SESSION_COOKIE, "").path("/").finish();
    removal.make_removal();
    info!("Logout successful for session ID: {}", session_id);
    Ok(HttpResponse::NoContent().cookie(removal).finish())
}
