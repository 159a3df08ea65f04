//! Cookie Auth Library
//!
//! Client-side JWT session handling where the access and refresh tokens are
//! kept in HTTP-only cookies behind a same-origin cookie endpoint instead of
//! in memory the caller can read.
//!
//! # Architecture
//!
//! The library is organized into the following modules, leaf-first:
//! - [`gateway`] - Cookie store gateway (HTTP endpoint client and in-memory store)
//! - [`tokens`] - Typed token adapter over the gateway
//! - [`client`] - Authenticated API client with request/response interception
//! - [`error`] - Transport error shared by all HTTP calls

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod error;
pub mod gateway;
pub mod tokens;

// Re-export commonly used types
pub use client::{
    ApiRequest, ApiResponse, ApiResult, AuthClient, AuthError, AuthRequirement, ClientConfig,
    User,
};
pub use error::TransportError;
pub use gateway::{
    CookieAttributes, CookieGateway, GatewayError, HttpCookieGateway, MemoryCookieGateway,
};
pub use tokens::{TokenCookies, TokenLookup, TokenPair};
