//! MEATER Cloud commands: login, devices, device, status, logout.
//!
//! `meater login`         exchange e-mail/password (or a token) for stored credentials
//! `meater devices`       list every probe on the account
//! `meater device [ID]`   one probe; the first one when no ID is given
//! `meater status`        show what credentials would be used (no network)
//! `meater logout`        forget stored credentials

use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

use meater_client::{
    AuthCredentials, MeaterClient, MeaterError, DEFAULT_API_BASE,
    auth_file_path, delete_auth_at, load_auth_from, save_auth_to,
};
use meater_config::Settings;
use tracing::{debug, warn};

use crate::exit_codes::*;
use crate::output;
use crate::CliError;

/// Where a request's token came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenSource {
    Flag,
    Stored,
}

/// Resolved inputs shared by every cloud command.
pub struct CloudContext {
    pub api_base: String,
    pub timeout: Duration,
    /// `--token` / `MEATER_TOKEN`
    pub token: Option<String>,
    /// auth.json location; None when no config directory exists
    pub auth_path: Option<PathBuf>,
}

impl CloudContext {
    /// Precedence: flag/env > settings file > built-in default.
    pub fn resolve(api_base: Option<String>, token: Option<String>, settings: &Settings) -> Self {
        let api_base = api_base
            .or_else(|| settings.api_base.clone())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        Self {
            api_base,
            timeout: Duration::from_secs(settings.timeout_secs),
            token: token.filter(|t| !t.trim().is_empty()),
            auth_path: auth_file_path(),
        }
    }

    fn client(&self) -> Result<MeaterClient, CliError> {
        MeaterClient::with_timeout(self.api_base.clone(), self.timeout)
            .map_err(|e| self.api_error(e, TokenSource::Flag))
    }

    fn stored(&self) -> Option<AuthCredentials> {
        load_auth_from(self.auth_path.as_ref()?)
    }

    /// Client with a token attached, or `EXIT_AUTH_REQUIRED`.
    fn authed_client(&self) -> Result<(MeaterClient, TokenSource), CliError> {
        let mut client = self.client()?;

        if let Some(token) = &self.token {
            client.init_with_token(token.clone());
            return Ok((client, TokenSource::Flag));
        }

        let creds = self.stored().ok_or_else(|| CliError {
            code: EXIT_AUTH_REQUIRED,
            message: "Not logged in".into(),
            hint: Some("run `meater login` or pass --token".into()),
        })?;
        if creds.api_base != self.api_base {
            warn!(stored = %creds.api_base, using = %self.api_base, "stored token was issued for a different API base");
        }
        client.init_with_token(creds.token);
        Ok((client, TokenSource::Stored))
    }

    fn save(&self, creds: &AuthCredentials) -> Result<(), CliError> {
        let path = self.auth_path.as_ref().ok_or_else(|| CliError {
            code: EXIT_ERROR,
            message: "Could not determine config directory".into(),
            hint: None,
        })?;
        save_auth_to(path, creds)
            .map_err(|e| CliError { code: EXIT_ERROR, message: e, hint: None })
    }

    fn forget(&self) -> Result<bool, CliError> {
        let Some(path) = &self.auth_path else {
            return Ok(false);
        };
        let existed = path.exists();
        delete_auth_at(path).map_err(|e| CliError { code: EXIT_ERROR, message: e, hint: None })?;
        Ok(existed)
    }

    /// Convert a client error, dropping stored credentials the cloud just rejected.
    fn api_error(&self, err: MeaterError, source: TokenSource) -> CliError {
        let hint = match &err {
            MeaterError::AuthExpired => {
                if source == TokenSource::Stored {
                    if let Err(e) = self.forget() {
                        warn!(error = %e.message, "could not remove rejected credentials");
                    }
                }
                Some("run `meater login` again".to_string())
            }
            MeaterError::Transport(_) => Some(format!("cannot reach {}", self.api_base)),
            MeaterError::RateLimited(_) => Some("wait a minute before trying again".to_string()),
            MeaterError::NotFound(_) => Some("list probe ids with `meater devices`".to_string()),
            MeaterError::InvalidBaseUrl(_) => {
                Some("check --api-base / MEATER_API_BASE or api.baseUrl in settings.json".to_string())
            }
            _ => err.status().map(|code| format!("MEATER Cloud answered HTTP {}", code)),
        };
        CliError { code: api_exit_code(&err), message: err.to_string(), hint }
    }
}

// ── Login ───────────────────────────────────────────────────────────

/// How a prompted value is read from the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Echo {
    Visible,
    Hidden,
}

/// Resolve one credential: flag/env first, then a prompt on a TTY.
fn prompt_value(value: Option<String>, label: &str, flag: &str, echo: Echo) -> Result<String, CliError> {
    if let Some(v) = given_or_tty(value, label, flag, atty::is(atty::Stream::Stdin))? {
        return Ok(v);
    }

    let entered = match echo {
        Echo::Visible => {
            eprint!("{}: ", label);
            io::stderr().flush().ok();
            let mut buf = String::new();
            io::stdin().read_line(&mut buf).map_err(|e| CliError::io(e.to_string()))?;
            buf.trim_end_matches(['\r', '\n']).to_string()
        }
        Echo::Hidden => rpassword::prompt_password(format!("{}: ", label))
            .map_err(|e| CliError::io(e.to_string()))?,
    };
    if entered.is_empty() {
        return Err(CliError::args(format!("No {} provided", label)));
    }
    Ok(entered)
}

/// `Some(value)` when given, `None` when a prompt is possible, usage error otherwise.
fn given_or_tty(
    value: Option<String>,
    label: &str,
    flag: &str,
    stdin_is_tty: bool,
) -> Result<Option<String>, CliError> {
    if let Some(v) = value.filter(|v| !v.is_empty()) {
        return Ok(Some(v));
    }
    if !stdin_is_tty {
        return Err(CliError {
            code: EXIT_USAGE,
            message: format!("No {} provided and stdin is not a TTY", label),
            hint: Some(format!("pass {} or set the matching MEATER_* variable", flag)),
        });
    }
    Ok(None)
}

pub fn cmd_login(
    ctx: &CloudContext,
    email: Option<String>,
    password: Option<String>,
) -> Result<(), CliError> {
    // A pre-acquired token skips the login round-trip entirely.
    if let Some(token) = &ctx.token {
        let creds = AuthCredentials { email, ..AuthCredentials::new(token.clone(), ctx.api_base.clone()) };
        ctx.save(&creds)?;
        eprintln!("Token saved (not verified)");
        return Ok(());
    }

    let email = prompt_value(email, "E-mail", "--email", Echo::Visible)?;
    let password = prompt_value(password, "Password", "--password", Echo::Hidden)?;

    let mut client = ctx.client()?;
    debug!(api_base = %ctx.api_base, "logging in");
    let ok = client.login(&email, &password)
        .map_err(|e| ctx.api_error(e, TokenSource::Flag))?;

    if !ok {
        return Err(CliError {
            code: EXIT_LOGIN_FAILED,
            message: "Login rejected by MEATER Cloud".into(),
            hint: Some("check the e-mail and password used in the MEATER app".into()),
        });
    }

    let session = client.session();
    let token = match session.token() {
        Some(token) if !token.is_empty() => token.to_string(),
        _ => {
            return Err(CliError {
                code: EXIT_LOGIN_FAILED,
                message: "MEATER Cloud accepted the login but returned no token".into(),
                hint: Some("nothing was saved; try again later or pass --token".into()),
            });
        }
    };

    let creds = AuthCredentials {
        token,
        api_base: ctx.api_base.clone(),
        email: Some(email.clone()),
        user_id: session.user_id().map(String::from),
    };
    ctx.save(&creds)?;

    eprintln!("Logged in as {}", email);
    Ok(())
}

// ── Devices ─────────────────────────────────────────────────────────

fn print_json(value: &impl serde::Serialize) -> Result<(), CliError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| CliError { code: EXIT_ERROR, message: e.to_string(), hint: None })?;
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "{}", text).map_err(|e| CliError::io(e.to_string()))
}

fn print_text(text: &str) -> Result<(), CliError> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "{}", text).map_err(|e| CliError::io(e.to_string()))
}

pub fn cmd_devices(ctx: &CloudContext, json: bool) -> Result<(), CliError> {
    let (mut client, source) = ctx.authed_client()?;
    let devices = client.list_devices().map_err(|e| ctx.api_error(e, source))?;

    if json {
        return print_json(&devices);
    }
    if devices.is_empty() {
        eprintln!("No active devices in MEATER Cloud");
        return Ok(());
    }
    print_text(&output::format_device_list(&devices))
}

pub fn cmd_device(ctx: &CloudContext, id: Option<String>, json: bool) -> Result<(), CliError> {
    let (mut client, source) = ctx.authed_client()?;

    let id = match id {
        Some(id) => id,
        None => {
            let devices = client.list_devices().map_err(|e| ctx.api_error(e, source))?;
            match devices.first() {
                Some(first) => first.id().to_string(),
                None => {
                    eprintln!("No active devices in MEATER Cloud");
                    return Ok(());
                }
            }
        }
    };

    let device = client.get_device(&id).map_err(|e| ctx.api_error(e, source))?;
    if json {
        print_json(&device)
    } else {
        print_text(&output::format_device(&device))
    }
}

// ── Status / logout ─────────────────────────────────────────────────

/// Describe the credentials a device command would use. No network.
pub fn status_lines(ctx: &CloudContext) -> Vec<String> {
    let mut lines = vec![
        format!("api: {}", ctx.api_base),
        format!("settings: {}", Settings::config_path_display()),
    ];
    if ctx.token.is_some() {
        lines.push("token: from --token / MEATER_TOKEN".into());
        return lines;
    }
    match ctx.stored() {
        Some(creds) => {
            let who = creds.email.as_deref().unwrap_or("unknown account");
            lines.push(format!("token: stored for {}", who));
            if let Some(path) = &ctx.auth_path {
                lines.push(format!("file: {}", path.display()));
            }
        }
        None => lines.push("token: none (run `meater login`)".into()),
    }
    lines
}

pub fn cmd_status(ctx: &CloudContext) -> Result<(), CliError> {
    print_text(&status_lines(ctx).join("\n"))
}

pub fn cmd_logout(ctx: &CloudContext) -> Result<(), CliError> {
    if ctx.forget()? {
        eprintln!("Logged out");
    } else {
        eprintln!("Not logged in");
    }
    Ok(())
}
