//! Caller extraction from request headers.
//!
//! Identity and role resolution happen upstream (gateway / auth service);
//! by the time a request reaches this service the caller is carried on
//! trusted headers. Production deployments terminate authentication at the
//! gateway; development and tests set the headers directly.

use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use crate::domain::foundation::{Caller, UserId};

use super::ErrorResponse;

/// Header carrying the resolved user id.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Header carrying the resolved role ("admin" grants privilege).
pub const USER_ROLE_HEADER: &str = "x-user-role";

/// Authenticated caller extracted from request headers.
#[derive(Debug, Clone)]
pub struct AuthenticatedCaller(pub Caller);

/// Rejection for requests without a resolved identity.
#[derive(Debug)]
pub struct AuthenticationRequired;

impl IntoResponse for AuthenticationRequired {
    fn into_response(self) -> axum::response::Response {
        let error = ErrorResponse::new("UNAUTHORIZED", "Authentication is required");
        (StatusCode::UNAUTHORIZED, Json(error)).into_response()
    }
}

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for AuthenticatedCaller
where
    S: Send + Sync,
{
    type Rejection = AuthenticationRequired;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| UserId::new(s).ok())
            .ok_or(AuthenticationRequired)?;

        let privileged = parts
            .headers
            .get(USER_ROLE_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(|role| role.eq_ignore_ascii_case("admin"))
            .unwrap_or(false);

        Ok(AuthenticatedCaller(Caller {
            user_id,
            privileged,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::FromRequestParts;
    use axum::http::Request;

    async fn extract(request: Request<()>) -> Result<AuthenticatedCaller, AuthenticationRequired> {
        let (mut parts, _) = request.into_parts();
        AuthenticatedCaller::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn user_header_yields_ordinary_caller() {
        let request = Request::builder()
            .header(USER_ID_HEADER, "user-1")
            .body(())
            .unwrap();

        let caller = extract(request).await.unwrap().0;

        assert_eq!(caller.user_id.as_str(), "user-1");
        assert!(!caller.privileged);
    }

    #[tokio::test]
    async fn admin_role_grants_privilege() {
        let request = Request::builder()
            .header(USER_ID_HEADER, "admin-1")
            .header(USER_ROLE_HEADER, "admin")
            .body(())
            .unwrap();

        let caller = extract(request).await.unwrap().0;

        assert!(caller.privileged);
    }

    #[tokio::test]
    async fn other_roles_do_not_grant_privilege() {
        let request = Request::builder()
            .header(USER_ID_HEADER, "user-1")
            .header(USER_ROLE_HEADER, "support")
            .body(())
            .unwrap();

        let caller = extract(request).await.unwrap().0;

        assert!(!caller.privileged);
    }

    #[tokio::test]
    async fn missing_user_header_is_rejected() {
        let request = Request::builder().body(()).unwrap();

        assert!(extract(request).await.is_err());
    }

    #[tokio::test]
    async fn empty_user_header_is_rejected() {
        let request = Request::builder()
            .header(USER_ID_HEADER, "")
            .body(())
            .unwrap();

        assert!(extract(request).await.is_err());
    }
}
