//! supinic.com API client for the supibot command debugger.
//!
//! Provides [`SupinicClient`], a blocking [`svd_core::DefinitionSource`]
//! over the public bot API, the [`Credentials`] used to authenticate it,
//! and [`FileStore`], a [`svd_core::CacheStore`] that survives restarts.
mod config;
mod credentials;
mod error;
mod http;
mod store;

pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use credentials::{API_KEY_VAR, Credentials, USER_ID_VAR, USERNAME_VAR};
pub use error::ClientError;
pub use http::SupinicClient;
pub use store::FileStore;
