use std::sync::Arc;
use poem::{Endpoint, IntoResponse, Middleware, Request, Response, Result};
use crate::errors::ServiceError;
use crate::services::TokenService;
use crate::types::internal::auth::AuthenticatedUser;
use super::TOKEN_COOKIE;

/// Middleware enforcing token presence and validity
///
/// The single authorization checkpoint: no cookie answers 401, a cookie
/// that fails verification answers 403, and a valid one attaches the
/// resolved subject to the request extensions for downstream handlers.
/// Requires `CookieJarManager` to be applied outside it.
pub struct AuthGate {
    tokens: Arc<TokenService>,
}

impl AuthGate {
    pub fn new(tokens: Arc<TokenService>) -> Self {
        Self { tokens }
    }
}

impl<E: Endpoint> Middleware<E> for AuthGate {
    type Output = AuthGateEndpoint<E>;

    fn transform(&self, ep: E) -> Self::Output {
        AuthGateEndpoint {
            ep,
            tokens: Arc::clone(&self.tokens),
        }
    }
}

pub struct AuthGateEndpoint<E> {
    ep: E,
    tokens: Arc<TokenService>,
}

impl<E: Endpoint> Endpoint for AuthGateEndpoint<E> {
    type Output = Response;

    async fn call(&self, mut req: Request) -> Result<Self::Output> {
        let token = req
            .cookie()
            .get(TOKEN_COOKIE)
            .map(|cookie| cookie.value_str().to_string());

        let Some(token) = token else {
            return Err(ServiceError::Unauthorized.into());
        };

        let Some(subject) = self.tokens.verify(&token) else {
            return Err(ServiceError::Forbidden.into());
        };

        req.extensions_mut().insert(AuthenticatedUser { username: subject });
        self.ep.call(req).await.map(IntoResponse::into_response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use poem::http::StatusCode;
    use poem::middleware::CookieJarManager;
    use poem::test::TestClient;
    use poem::web::Data;
    use poem::{get, handler, EndpointExt, Route};
    use chrono::Utc;
    use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
    use crate::types::internal::auth::Claims;

    const TEST_SECRET: &str = "test-secret-key-minimum-32-characters-long";

    #[handler]
    async fn whoami(Data(user): Data<&AuthenticatedUser>) -> String {
        user.username.clone()
    }

    fn protected_app(tokens: Arc<TokenService>) -> impl Endpoint {
        Route::new()
            .at("/whoami", get(whoami).with(AuthGate::new(tokens)))
            .with(CookieJarManager::new())
    }

    fn test_tokens() -> Arc<TokenService> {
        Arc::new(TokenService::new(
            TEST_SECRET.to_string(),
            Duration::from_secs(900),
        ))
    }

    #[tokio::test]
    async fn test_missing_cookie_answers_unauthorized() {
        let cli = TestClient::new(protected_app(test_tokens()));

        let resp = cli.get("/whoami").send().await;

        resp.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_invalid_token_answers_forbidden() {
        let cli = TestClient::new(protected_app(test_tokens()));

        let resp = cli
            .get("/whoami")
            .header("cookie", "token=not-a-real-token")
            .send()
            .await;

        resp.assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_expired_token_answers_forbidden() {
        let cli = TestClient::new(protected_app(test_tokens()));

        let now = Utc::now().timestamp();
        let expired_claims = Claims {
            sub: "alice".to_string(),
            exp: now - 3600,
            iat: now - 7200,
        };
        let expired_token = encode(
            &Header::new(Algorithm::HS256),
            &expired_claims,
            &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
        )
        .expect("encode should succeed");

        let resp = cli
            .get("/whoami")
            .header("cookie", format!("token={}", expired_token))
            .send()
            .await;

        resp.assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_valid_token_attaches_subject() {
        let tokens = test_tokens();
        let cli = TestClient::new(protected_app(tokens.clone()));

        let token = tokens.issue("alice").expect("issue should succeed");

        let resp = cli
            .get("/whoami")
            .header("cookie", format!("token={}", token))
            .send()
            .await;

        resp.assert_status_is_ok();
        resp.assert_text("alice").await;
    }
}
