//! Remote acquisition from the OpenAQ v3 API.

pub(crate) mod api_client;
pub mod error;
pub(crate) mod locations;
pub(crate) mod measurements;
pub(crate) mod wire;

#[cfg(test)]
pub(crate) mod mock_server;
