use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::convert::Infallible;

use crate::error::AppError;
use crate::models::token::SCOPE_AUTHENTICATION;
use crate::models::Identity;
use crate::repositories::UserRepository;

/// Resolve every inbound request to a concrete identity before any handler
/// runs: a bearer token becomes `Authenticated`, no header becomes
/// `Anonymous`, and anything malformed is rejected here without reaching a
/// handler at all.
pub async fn authenticate(
    State(user_repo): State<UserRepository>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .map(|value| value.to_str().map(str::to_owned));

    let identity = match auth_header {
        None => Identity::Anonymous,
        Some(Err(_)) => {
            return with_vary(
                AppError::Unauthorized("invalid authorization header format".to_string())
                    .into_response(),
            );
        }
        Some(Ok(value)) => {
            // Exactly two space-separated parts, literal "Bearer" scheme.
            let parts: Vec<&str> = value.split(' ').collect();
            if parts.len() != 2 || parts[0] != "Bearer" {
                return with_vary(
                    AppError::Unauthorized("invalid authorization header format".to_string())
                        .into_response(),
                );
            }

            match user_repo
                .get_user_for_token(SCOPE_AUTHENTICATION, parts[1])
                .await
            {
                Ok(Some(user)) => Identity::Authenticated(user),
                Ok(None) => {
                    return with_vary(
                        AppError::Unauthorized(
                            "invalid or expired authentication token".to_string(),
                        )
                        .into_response(),
                    );
                }
                Err(err) => return with_vary(err.into_response()),
            }
        }
    };

    request.extensions_mut().insert(identity);
    with_vary(next.run(request).await)
}

// Responses vary by identity; shared caches must not cross-serve them.
fn with_vary(mut response: Response) -> Response {
    response
        .headers_mut()
        .append(header::VARY, HeaderValue::from_static("Authorization"));
    response
}

/// The identity attached by [`authenticate`].
///
/// Every route is layered with the middleware, so a missing identity is a
/// wiring bug rather than a runtime condition; retrieval fails loudly instead
/// of quietly downgrading to anonymous.
pub struct CurrentIdentity(pub Identity);

impl<S> FromRequestParts<S> for CurrentIdentity
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let identity = parts
            .extensions
            .get::<Identity>()
            .expect("request reached a handler without an identity attached")
            .clone();
        Ok(CurrentIdentity(identity))
    }
}
