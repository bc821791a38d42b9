//! MEATER Cloud API client.
//!
//! This crate is the single source of truth for the MEATER Cloud wire
//! contract: login, device list, single device status.
//!
//! No global state: a [`MeaterClient`] owns its own [`Session`], so several
//! clients (or tests) can run side by side. No retries. No caching.

mod auth;
mod client;
mod error;
mod session;
mod types;

pub use auth::{AuthCredentials, auth_file_path, load_auth_from, save_auth_to, delete_auth_at};
pub use client::{MeaterClient, DEFAULT_API_BASE, DEFAULT_TIMEOUT_SECS, classify_status};
pub use error::{MeaterError, Result};
pub use session::Session;
pub use types::{
    Cook, CookState, CookTemperature, CookTime, Device, DeviceList, Envelope, ProbeTemperature,
    REMAINING_UNKNOWN,
};
