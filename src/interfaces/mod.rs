//! Interface adapters: the REST API over the application services.

pub mod http;
