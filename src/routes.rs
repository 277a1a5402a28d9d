use std::sync::Arc;
use poem::middleware::CookieJarManager;
use poem::{get, patch, post, Endpoint, EndpointExt, Route};
use crate::api::{self, auth, auth_gate::AuthGate, users};
use crate::services::{DirectoryService, TokenService};

/// Wire the full route surface
///
/// Listing and detail views are public; every mutating record route and
/// the record-creation form sit behind the auth gate. Signup and login
/// validate their own payloads and never pass the gate.
pub fn build_app(service: Arc<DirectoryService>, tokens: Arc<TokenService>) -> impl Endpoint {
    Route::new()
        .at("/", get(api::home))
        .at("/auth/login", get(auth::login_form))
        .at("/auth/sign-up", get(auth::signup_form))
        .at("/auth/authenticate-user", post(auth::authenticate_user))
        .at("/auth/add-user", post(auth::add_user))
        .at("/logout", post(auth::logout))
        .at("/users", get(users::list_users))
        .at("/users/about/:id", get(users::about_user))
        .at(
            "/users/delete/:id",
            get(users::delete_user).with(AuthGate::new(tokens.clone())),
        )
        .at(
            "/users/add-user",
            get(users::add_user_form).with(AuthGate::new(tokens.clone())),
        )
        .at(
            "/users/users/new-user",
            post(users::new_user).with(AuthGate::new(tokens.clone())),
        )
        .at(
            "/users/edit/:id",
            get(users::edit_form).with(AuthGate::new(tokens.clone())),
        )
        .at(
            "/users/edit-user-detail",
            patch(users::edit_detail).with(AuthGate::new(tokens.clone())),
        )
        .with(CookieJarManager::new())
        .data(service)
}
