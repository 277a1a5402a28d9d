use std::sync::Arc;
use poem::handler;
use poem::web::cookie::CookieJar;
use poem::web::{Data, Form, Query, Redirect};
use crate::errors::ServiceError;
use crate::services::{validation, DirectoryService};
use crate::types::dto::auth::{LoginPayload, SignupPayload};
use super::{clear_token_cookie, redirect_with_message, set_token_cookie, MessageQuery};

/// Login form placeholder; echoes the message a prior redirect carried
#[handler]
pub async fn login_form(Query(query): Query<MessageQuery>) -> String {
    match query.message {
        Some(message) => format!("Login\n{}", message),
        None => "Login".to_string(),
    }
}

/// Signup form placeholder
#[handler]
pub async fn signup_form(Query(query): Query<MessageQuery>) -> String {
    match query.message {
        Some(message) => format!("Sign up\n{}", message),
        None => "Sign up".to_string(),
    }
}

/// Login: validate, authenticate, set the token cookie
///
/// Failure outcomes are user-facing redirects; only persistence and
/// internal faults propagate as error responses.
#[handler]
pub async fn authenticate_user(
    Data(service): Data<&Arc<DirectoryService>>,
    jar: &CookieJar,
    Form(payload): Form<LoginPayload>,
) -> poem::Result<Redirect> {
    if let Err(message) = validation::validate(&validation::login_rules(), &payload.fields()) {
        return Ok(redirect_with_message("/auth/login", message));
    }

    match service.login(&payload.username, &payload.password).await {
        Ok(token) => {
            set_token_cookie(jar, token);
            Ok(Redirect::see_other("/"))
        }
        Err(ServiceError::NotFound(_)) => Ok(redirect_with_message(
            "/",
            "User does not exist. You may REGISTER user.",
        )),
        Err(ServiceError::InvalidCredential) => {
            Ok(redirect_with_message("/auth/login", "Password is incorrect"))
        }
        Err(err) => Err(err.into()),
    }
}

/// Signup: validate, register, set the token cookie
#[handler]
pub async fn add_user(
    Data(service): Data<&Arc<DirectoryService>>,
    jar: &CookieJar,
    Form(payload): Form<SignupPayload>,
) -> poem::Result<Redirect> {
    if let Err(message) = validation::validate(&validation::signup_rules(), &payload.fields()) {
        return Ok(redirect_with_message("/auth/sign-up", message));
    }

    match service
        .signup(&payload.username, &payload.email, &payload.password)
        .await
    {
        Ok(token) => {
            set_token_cookie(jar, token);
            Ok(Redirect::see_other("/"))
        }
        Err(ServiceError::Conflict(message)) => {
            Ok(redirect_with_message("/auth/sign-up", &message))
        }
        Err(err) => Err(err.into()),
    }
}

/// Clear the token cookie; always succeeds
#[handler]
pub async fn logout(jar: &CookieJar) -> Redirect {
    clear_token_cookie(jar);
    Redirect::see_other("/")
}
