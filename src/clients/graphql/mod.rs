//! GraphQL Admin API client.
//!
//! [`GraphqlClient`] only surfaces transport failures as [`GraphqlError`].
//! Top-level `errors` and mutation `userErrors` arrive with HTTP 200 and are
//! interpreted by the services.

mod client;
mod errors;

pub use client::GraphqlClient;
pub use errors::GraphqlError;
