//! Interaction layer: adapters to the remote Ruby HDL service.

pub mod ruby_api_client;

pub use ruby_api_client::RubyApiClient;
