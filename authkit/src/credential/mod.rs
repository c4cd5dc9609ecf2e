mod errors;
mod service;

pub use errors::CredentialError;
pub use service::CredentialService;
