use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use axum_extra::headers::{self, Header};
use axum_extra::TypedHeader;
use serde_json::json;

use kernel::interface::access::{Identity, Role};

static X_ROLES: HeaderName = HeaderName::from_static("x-roles");

/// Roles of the caller as forwarded by the authenticating proxy, e.g.
/// `X-Roles: ROLE_LIBRARIAN, patron`. Names the service does not know are
/// dropped.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct CallerRoles(Vec<Role>);

impl Header for CallerRoles {
    fn name() -> &'static HeaderName {
        &X_ROLES
    }

    fn decode<'i, I>(values: &mut I) -> Result<Self, headers::Error>
    where
        I: Iterator<Item = &'i HeaderValue>,
    {
        let mut roles = Vec::new();
        let mut seen = false;
        for value in values {
            seen = true;
            let value = value.to_str().map_err(|_| headers::Error::invalid())?;
            for name in value.split(',').filter(|name| !name.trim().is_empty()) {
                match name.parse::<Role>() {
                    Ok(role) => roles.push(role),
                    Err(unknown) => tracing::debug!("ignoring unknown role {:?}", unknown.0),
                }
            }
        }
        if !seen {
            return Err(headers::Error::invalid());
        }
        Ok(Self(roles))
    }

    fn encode<E: Extend<HeaderValue>>(&self, values: &mut E) {
        let joined = self
            .0
            .iter()
            .map(Role::to_string)
            .collect::<Vec<_>>()
            .join(",");
        if let Ok(value) = HeaderValue::from_str(&joined) {
            values.extend(std::iter::once(value));
        }
    }
}

/// The verified identity of whoever sent the request.
pub struct Caller(pub Identity);

#[async_trait]
impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match TypedHeader::<CallerRoles>::from_request_parts(parts, state).await {
            Ok(TypedHeader(CallerRoles(roles))) => Ok(Caller(Identity::new(roles))),
            Err(rejection) if rejection.is_missing() => Err((
                StatusCode::UNAUTHORIZED,
                Json(json!({ "message": "No caller identity presented" })),
            )
                .into_response()),
            Err(rejection) => Err((
                StatusCode::BAD_REQUEST,
                Json(json!({ "message": rejection.to_string() })),
            )
                .into_response()),
        }
    }
}

#[cfg(test)]
mod test {
    use axum::extract::FromRequestParts;
    use axum::http::{Request, StatusCode};

    use kernel::interface::access::{Identity, Role};

    use super::Caller;

    async fn extract(header: Option<&str>) -> Result<Identity, StatusCode> {
        let mut builder = Request::builder().uri("/api/borrowing-records");
        if let Some(header) = header {
            builder = builder.header("x-roles", header);
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        Caller::from_request_parts(&mut parts, &())
            .await
            .map(|Caller(identity)| identity)
            .map_err(|response| response.status())
    }

    #[tokio::test]
    async fn roles_are_read_leniently() {
        let identity = extract(Some("ROLE_LIBRARIAN, patron,, auditor")).await;
        assert_eq!(identity, Ok(Identity::new([Role::Librarian, Role::Patron])));
    }

    #[tokio::test]
    async fn missing_header_is_unauthenticated() {
        assert_eq!(extract(None).await, Err(StatusCode::UNAUTHORIZED));
    }

    #[tokio::test]
    async fn unknown_roles_only_yield_an_empty_identity() {
        assert_eq!(extract(Some("guest")).await, Ok(Identity::default()));
    }
}
