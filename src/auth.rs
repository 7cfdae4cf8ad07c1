//! Caller identity supplied by upstream authentication.
//!
//! Token verification happens in front of the gateway. By the time a request
//! reaches a handler, the caller (if any) is an [`AuthenticatedCaller`] in the
//! request extensions, and handlers receive it through the [`Caller`]
//! extractor rather than reading the request directly.

use std::convert::Infallible;

use axum::extract::{FromRequestParts, Request};
use axum::http::HeaderMap;
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_EMAIL_HEADER: &str = "x-user-email";
pub const WALLET_ADDRESS_HEADER: &str = "x-wallet-address";
pub const USER_ROLE_HEADER: &str = "x-user-role";

/// An authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedCaller {
    pub id: String,
    pub email: Option<String>,
    pub wallet_address: Option<String>,
    pub role: Option<String>,
}

impl AuthenticatedCaller {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: None,
            wallet_address: None,
            role: None,
        }
    }

    pub fn with_wallet(mut self, wallet_address: impl Into<String>) -> Self {
        self.wallet_address = Some(wallet_address.into());
        self
    }

    /// Wallet address, treating an empty string as absent.
    pub fn wallet(&self) -> Option<&str> {
        self.wallet_address.as_deref().filter(|w| !w.is_empty())
    }
}

/// The caller context for one request. `None` means unauthenticated.
#[derive(Debug, Clone, Default)]
pub struct Caller(pub Option<AuthenticatedCaller>);

impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(parts.extensions.get::<AuthenticatedCaller>().cloned()))
    }
}

/// Build a caller from headers set by an authenticating reverse proxy.
///
/// Returns `None` when `x-user-id` is missing or blank.
pub fn caller_from_headers(headers: &HeaderMap) -> Option<AuthenticatedCaller> {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };

    let id = header(USER_ID_HEADER)?;
    Some(AuthenticatedCaller {
        id,
        email: header(USER_EMAIL_HEADER),
        wallet_address: header(WALLET_ADDRESS_HEADER),
        role: header(USER_ROLE_HEADER),
    })
}

/// Middleware that attaches the proxy-supplied caller to the request.
///
/// Only mount this behind a proxy that strips these headers from client
/// traffic.
pub async fn trusted_caller_headers(mut request: Request, next: Next) -> Response {
    if let Some(caller) = caller_from_headers(request.headers()) {
        tracing::debug!(caller_id = %caller.id, "Caller attached from proxy headers");
        request.extensions_mut().insert(caller);
    }
    next.run(request).await
}
