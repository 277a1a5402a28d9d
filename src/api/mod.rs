pub mod auth;
pub mod auth_gate;
pub mod users;

use poem::handler;
use poem::web::cookie::{Cookie, CookieJar};
use poem::web::{Query, Redirect};
use serde::Deserialize;

/// Name of the cookie carrying the bearer token
pub const TOKEN_COOKIE: &str = "token";

/// Optional `message` query parameter carried by redirects
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub message: Option<String>,
}

/// Home placeholder; several auth outcomes redirect here with a message.
/// Template rendering lives outside this service, so the endpoint echoes
/// what the view would receive.
#[handler]
pub async fn home(Query(query): Query<MessageQuery>) -> String {
    match query.message {
        Some(message) => format!("User Directory\n{}", message),
        None => "User Directory".to_string(),
    }
}

/// Redirect back to a view with a user-facing message in the query string
pub(crate) fn redirect_with_message(path: &str, message: &str) -> Redirect {
    let query: String = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("message", message)
        .finish();
    Redirect::see_other(format!("{}?{}", path, query))
}

/// Set the token cookie on successful signup/login
pub(crate) fn set_token_cookie(jar: &CookieJar, token: String) {
    let mut cookie = Cookie::new_with_str(TOKEN_COOKIE, token);
    cookie.set_http_only(true);
    cookie.set_path("/");
    jar.add(cookie);
}

pub(crate) fn clear_token_cookie(jar: &CookieJar) {
    jar.remove(TOKEN_COOKIE);
}
