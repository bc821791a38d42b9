//! CLI Exit Code Registry
//!
//! This is the single source of truth for all `meater` exit codes.
//! Exit codes are part of the shell contract; scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Range   | Domain     | Description                              |
//! |---------|------------|------------------------------------------|
//! | 0       | Universal  | Success                                  |
//! | 1       | Universal  | General error (unspecified)              |
//! | 2       | Universal  | CLI usage error (bad args, no TTY)       |
//! | 10-19   | auth       | Login / token codes                      |
//! | 20-29   | api        | MEATER Cloud request codes               |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant in the appropriate range
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into `api_exit_code` if it comes from the client

use meater_client::MeaterError;

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, bad --api-base, missing credentials with no TTY.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Auth (10-19)
// =============================================================================

/// No token available (not logged in, no --token, no MEATER_TOKEN).
pub const EXIT_AUTH_REQUIRED: u8 = 10;

/// MEATER Cloud rejected the stored token (401). Stored credentials are removed.
pub const EXIT_AUTH_EXPIRED: u8 = 11;

/// Login rejected (wrong e-mail/password), or accepted without a token to store.
pub const EXIT_LOGIN_FAILED: u8 = 12;

// =============================================================================
// API (20-29)
// =============================================================================

/// Network failure: DNS, connect, TLS, timeout.
pub const EXIT_API_NETWORK: u8 = 20;

/// Device not found (404).
pub const EXIT_API_NOT_FOUND: u8 = 21;

/// Rate limited (429). Nothing is retried; wait and run again.
pub const EXIT_API_RATE_LIMIT: u8 = 22;

/// Bad request (400), server error (500) or any other unexpected status.
pub const EXIT_API_UPSTREAM: u8 = 23;

/// Map a client error to its exit code.
pub fn api_exit_code(err: &MeaterError) -> u8 {
    match err {
        MeaterError::InvalidBaseUrl(_) => EXIT_USAGE,
        MeaterError::AuthRequired => EXIT_AUTH_REQUIRED,
        MeaterError::AuthExpired => EXIT_AUTH_EXPIRED,
        MeaterError::Transport(_) => EXIT_API_NETWORK,
        MeaterError::NotFound(_) => EXIT_API_NOT_FOUND,
        MeaterError::RateLimited(_) => EXIT_API_RATE_LIMIT,
        MeaterError::BadRequest(_)
        | MeaterError::ServerError(_)
        | MeaterError::UnhandledStatus(..) => EXIT_API_UPSTREAM,
    }
}
