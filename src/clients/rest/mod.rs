//! REST Admin API client.
//!
//! [`RestClient`] normalizes paths to `{path}.json` under
//! `/admin/api/{version}` and maps every failure to [`RestError`]. Orders,
//! locations, transactions and fulfillments are still read through REST;
//! everything that mutates fulfillment state goes through GraphQL.

mod client;
mod errors;

pub use client::RestClient;
pub use errors::RestError;
