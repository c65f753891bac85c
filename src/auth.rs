//! Role guard for write endpoints.

use crate::{setting::Role, Error};
use actix_web::{dev::Payload, FromRequest, HttpRequest};
use std::future::{ready, Ready};

/// Request header carrying the role chosen at login.
pub const ROLE_HEADER: &str = "X-User-Role";

/// Role of the caller, admin unless the header says otherwise.
pub fn role(req: &HttpRequest) -> Role {
    match req.headers().get(ROLE_HEADER).and_then(|v| v.to_str().ok()) {
        Some(v) if v.trim().eq_ignore_ascii_case(Role::Demo.as_str()) => Role::Demo,
        _ => Role::Admin,
    }
}

/// Extracting this rejects demo accounts before the handler body runs.
/// Put it first in the handler arguments so no other extractor reads the body.
#[derive(Debug, Clone, Copy)]
pub struct Writable;

impl FromRequest for Writable {
    type Error = Error;
    type Future = Ready<Result<Writable, Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(match role(req) {
            Role::Demo => Err(Error::DemoAccessDenied),
            Role::Admin => Ok(Writable),
        })
    }
}
