pub mod backoff;
pub mod registry_client;

pub use backoff::{retry_with_backoff, BackoffPolicy, MAX_RETRIES, RETRY_DELAY};
pub use registry_client::{FormSubmitter, RegistryClient};
