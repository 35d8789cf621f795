pub mod errors;
pub mod retry;
pub mod shutdown;
pub mod validations;
