//! Authentication middleware for JWT token validation
//!
//! Every inbound call must carry a valid HS256 bearer token. The decoded
//! identity is attached to the request but grants nothing beyond passing the
//! gate.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{error::ApiError, state::AppState};

/// Identity carried by an access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInfo {
    pub username: String,
    pub roles: Vec<String>,
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "UserInfo")]
    pub user_info: UserInfo,
    /// Expiration time
    pub exp: u64,
}

/// Authenticated user information
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub username: String,
    pub roles: Vec<String>,
}

/// Verifies access tokens against the shared secret
#[derive(Clone)]
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;

        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    pub fn verify(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
    }
}

/// Authentication middleware
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .ok_or(ApiError::Unauthorized)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(ApiError::Unauthorized)?;

    let claims = state.token_verifier.verify(token).map_err(|e| {
        warn!("Failed to validate token: {}", e);
        ApiError::Unauthorized
    })?;

    debug!("Authenticated request for {}", claims.user_info.username);
    req.extensions_mut().insert(AuthUser {
        username: claims.user_info.username,
        roles: claims.user_info.roles,
    });

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{repositories::MemoryStore, services::testing::cheap_hasher};
    use axum::{
        Extension, Router,
        body::Body,
        http::{StatusCode, header},
        routing::get,
    };
    use http_body_util::BodyExt;
    use jsonwebtoken::{EncodingKey, Header, encode};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn token(secret: &str, exp: u64) -> String {
        let claims = Claims {
            user_info: UserInfo {
                username: "alice".into(),
                roles: vec!["Employee".into()],
            },
            exp,
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn in_an_hour() -> u64 {
        (chrono::Utc::now().timestamp() + 3600) as u64
    }

    #[test]
    fn test_verify_accepts_valid_token() {
        let verifier = TokenVerifier::new("s3cret");
        let claims = verifier.verify(&token("s3cret", in_an_hour())).unwrap();
        assert_eq!(claims.user_info.username, "alice");
        assert_eq!(claims.user_info.roles, vec!["Employee".to_string()]);
    }

    #[test]
    fn test_verify_rejects_wrong_secret_and_expired_tokens() {
        let verifier = TokenVerifier::new("s3cret");
        assert!(verifier.verify(&token("other", in_an_hour())).is_err());
        assert!(verifier.verify(&token("s3cret", 1_000)).is_err());
        assert!(verifier.verify("not-a-token").is_err());
    }

    async fn whoami(Extension(user): Extension<AuthUser>) -> String {
        format!("{} {}", user.username, user.roles.join(","))
    }

    #[tokio::test]
    async fn test_middleware_attaches_token_identity() {
        let store = Arc::new(MemoryStore::new());
        let state = AppState::new(
            store.clone(),
            store,
            cheap_hasher(),
            TokenVerifier::new("s3cret"),
        );
        let app = Router::new()
            .route("/whoami", get(whoami))
            .route_layer(axum::middleware::from_fn_with_state(
                state.clone(),
                auth_middleware,
            ))
            .with_state(state);

        let request = axum::http::Request::builder()
            .uri("/whoami")
            .header(
                header::AUTHORIZATION,
                format!("Bearer {}", token("s3cret", in_an_hour())),
            )
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"alice Employee");

        let request = axum::http::Request::builder()
            .uri("/whoami")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
