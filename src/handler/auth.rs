// handler/auth.rs
use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::IntoResponse,
    routing::post,
    Extension, Json, Router,
};
use axum_extra::extract::cookie::Cookie;
use validator::Validate;

use crate::{
    db::{profiledb::ProfileExt, userdb::UserExt},
    dtos::userdtos::*,
    error::{ErrorMessage, HttpError},
    models::profilemodel::ProfileRole,
    utils::{password, token},
    AppState,
};

pub fn auth_handler() -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
}

pub async fn register(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<RegisterUserDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let role = match body.role.as_str() {
        "organizer" => ProfileRole::Organizer,
        "staff" => ProfileRole::Staff,
        _ => return Err(HttpError::bad_request("Role must be 'organizer' or 'staff'")),
    };

    let existing = app_state
        .db_client
        .get_user(None, None, Some(&body.email))
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;
    if existing.is_some() {
        return Err(HttpError::bad_request(ErrorMessage::EmailExist.to_string()));
    }

    let existing = app_state
        .db_client
        .get_user(None, Some(&body.username), None)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;
    if existing.is_some() {
        return Err(HttpError::bad_request(
            ErrorMessage::UsernameExist.to_string(),
        ));
    }

    let hashed_password = password::hash(&body.password)
        .map_err(|_| HttpError::server_error(ErrorMessage::HashingError.to_string()))?;

    let user = app_state
        .db_client
        .save_user(body.name, body.username, body.email, hashed_password)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    app_state
        .db_client
        .create_profile(user.id, role)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let response = UserResponseDto {
        status: "success".to_string(),
        data: UserData {
            user: FilterUserDto::filter_user(&user),
        },
    };

    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn login(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<LoginUserDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let user = app_state
        .db_client
        .get_user(None, None, Some(&body.email))
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::bad_request(ErrorMessage::WrongCredentials.to_string()))?;

    let password_matches = password::compare(&body.password, &user.password)
        .map_err(|_| HttpError::bad_request(ErrorMessage::WrongCredentials.to_string()))?;
    if !password_matches {
        return Err(HttpError::bad_request(
            ErrorMessage::WrongCredentials.to_string(),
        ));
    }

    let token = token::create_token(
        &user.id.to_string(),
        app_state.env.jwt_secret.as_bytes(),
        app_state.env.jwt_maxage,
    )
    .map_err(|e| HttpError::server_error(e.to_string()))?;

    let cookie_duration = time::Duration::minutes(app_state.env.jwt_maxage);
    let cookie = Cookie::build(("token", token.clone()))
        .path("/")
        .max_age(cookie_duration)
        .http_only(true)
        .build();

    let response = Json(UserLoginResponseDto {
        status: "success".to_string(),
        token,
    });

    let mut response = response.into_response();
    response.headers_mut().insert(
        header::SET_COOKIE,
        HeaderValue::from_str(&cookie.to_string())
            .map_err(|e| HttpError::server_error(e.to_string()))?,
    );

    Ok(response)
}

pub async fn logout() -> Result<impl IntoResponse, HttpError> {
    let cookie = Cookie::build(("token", ""))
        .path("/")
        .max_age(time::Duration::minutes(-1))
        .http_only(true)
        .build();

    let response = Json(Response {
        status: "success",
        message: "Logged out".to_string(),
    });

    let mut response = response.into_response();
    response.headers_mut().insert(
        header::SET_COOKIE,
        HeaderValue::from_str(&cookie.to_string())
            .map_err(|e| HttpError::server_error(e.to_string()))?,
    );

    Ok(response)
}
