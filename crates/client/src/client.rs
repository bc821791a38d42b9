//! MEATER Cloud HTTP client.
//!
//! Blocking reqwest client (no Tokio runtime required).
//! Covers the whole public API: login → list devices → get device.

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::error::{MeaterError, Result};
use crate::session::Session;
use crate::types::{Device, DeviceList, Envelope};

pub const DEFAULT_API_BASE: &str = "https://public-api.cloud.meater.com/v1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const USER_AGENT: &str = concat!("meater-client/", env!("CARGO_PKG_VERSION"));

/// MEATER Cloud API client (blocking).
///
/// Owns exactly one [`Session`]. A 401 from any device call clears it.
pub struct MeaterClient {
    http: reqwest::blocking::Client,
    api_base: String,
    base_url: reqwest::Url,
    session: Session,
}

impl MeaterClient {
    /// Create an unauthorized client against `api_base`.
    pub fn new(api_base: impl Into<String>) -> Result<Self> {
        Self::with_timeout(api_base, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create an unauthorized client with an explicit request timeout.
    pub fn with_timeout(api_base: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        let api_base = api_base.into().trim_end_matches('/').to_string();
        let base_url = reqwest::Url::parse(&api_base)
            .map_err(|e| MeaterError::InvalidBaseUrl(format!("{}: {}", api_base, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(MeaterError::InvalidBaseUrl(api_base));
        }

        Ok(Self {
            http,
            api_base,
            base_url,
            session: Session::default(),
        })
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn is_authorized(&self) -> bool {
        self.session.is_authorized()
    }

    /// Log in with MEATER Cloud credentials.
    ///
    /// Any previous session is discarded first. Returns `Ok(false)` when the
    /// backend rejects the login; only transport failures are `Err`.
    /// Any 2xx authorizes the session, even one whose body carries no token.
    pub fn login(&mut self, email: &str, password: &str) -> Result<bool> {
        self.session.invalidate();

        let url = self.endpoint(&["login"])?;
        debug!(%url, "POST");
        let response = self.http.post(url)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "login rejected");
            return Ok(false);
        }

        let envelope = Envelope::parse(&response.text()?);
        let token = envelope.data["token"].as_str().unwrap_or("");
        if token.is_empty() {
            warn!(status = envelope.status.as_str(), "login response carried no token");
        }
        let user_id = envelope.data["userId"].as_str().map(String::from);

        self.session = Session::from_login(token.to_string(), user_id);
        info!(user_id = self.session.user_id().unwrap_or(""), "logged in to MEATER Cloud");
        Ok(true)
    }

    /// Use a previously acquired token, skipping login. No I/O.
    pub fn init_with_token(&mut self, token: impl Into<String>) {
        self.session = Session::with_token(token);
    }

    /// Forget the current session. No I/O.
    pub fn logout(&mut self) {
        self.session.invalidate();
    }

    /// `GET /devices`: every probe on the account.
    ///
    /// A missing or null `data` payload yields an empty list.
    pub fn list_devices(&mut self) -> Result<DeviceList> {
        let envelope = self.get(&["devices"])?;
        Ok(DeviceList::from_json(&envelope.data))
    }

    /// `GET /devices/{id}`: one probe.
    ///
    /// A missing or null `data` payload yields a zero-valued [`Device`].
    /// The id is sent as a single escaped path segment; an empty id is
    /// rejected locally.
    pub fn get_device(&mut self, id: &str) -> Result<Device> {
        if id.is_empty() {
            return Err(MeaterError::BadRequest("device id is empty".into()));
        }
        let envelope = self.get(&["devices", id])?;
        Ok(Device::from_json(&envelope.data))
    }

    // ── Internal helpers ────────────────────────────────────────────

    fn endpoint(&self, segments: &[&str]) -> Result<reqwest::Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| MeaterError::InvalidBaseUrl(self.api_base.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn get(&mut self, segments: &[&str]) -> Result<Envelope> {
        let token = self.session.bearer().ok_or(MeaterError::AuthRequired)?.to_string();

        let url = self.endpoint(segments)?;
        let path = url.path().to_string();
        debug!(%url, "GET");
        let response = self.http.get(url)
            .bearer_auth(token)
            .header("Accept", "application/json")
            .send()?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            let body = response.text().unwrap_or_default();
            let err = classify_status(status, body);
            if matches!(err, MeaterError::AuthExpired) {
                warn!(%path, "token rejected, clearing session");
                self.session.invalidate();
            }
            return Err(err);
        }

        let envelope = Envelope::parse(&response.text()?);
        debug!(%path, status_code = envelope.status_code, "response");
        Ok(envelope)
    }
}

/// Map a non-success HTTP status to its error. `body` is kept as the message.
pub fn classify_status(status: u16, body: String) -> MeaterError {
    match status {
        400 => MeaterError::BadRequest(body),
        401 => MeaterError::AuthExpired,
        404 => MeaterError::NotFound(body),
        429 => MeaterError::RateLimited(body),
        500 => MeaterError::ServerError(body),
        _ => MeaterError::UnhandledStatus(status, body),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn authed_client(server: &MockServer) -> MeaterClient {
        let mut client = MeaterClient::new(server.base_url()).unwrap();
        client.init_with_token("T123");
        client
    }

    #[test]
    fn test_classify_status() {
        assert!(matches!(classify_status(400, "x".into()), MeaterError::BadRequest(m) if m == "x"));
        assert!(matches!(classify_status(401, String::new()), MeaterError::AuthExpired));
        assert!(matches!(classify_status(404, String::new()), MeaterError::NotFound(_)));
        assert!(matches!(classify_status(429, String::new()), MeaterError::RateLimited(_)));
        assert!(matches!(classify_status(500, String::new()), MeaterError::ServerError(_)));
        assert!(matches!(classify_status(403, String::new()), MeaterError::UnhandledStatus(403, _)));
        assert!(matches!(classify_status(503, String::new()), MeaterError::UnhandledStatus(503, _)));
    }

    #[test]
    fn test_api_base_trailing_slash_trimmed() {
        let client = MeaterClient::new("https://example.test/v1/").unwrap();
        assert_eq!(client.api_base(), "https://example.test/v1");
        assert_eq!(
            client.endpoint(&["devices"]).unwrap().as_str(),
            "https://example.test/v1/devices"
        );

        let bare = MeaterClient::new("https://example.test").unwrap();
        assert_eq!(bare.endpoint(&["login"]).unwrap().as_str(), "https://example.test/login");
    }

    #[test]
    fn test_device_id_is_one_escaped_segment() {
        let client = MeaterClient::new("https://example.test/v1").unwrap();
        assert_eq!(
            client.endpoint(&["devices", "a/b c"]).unwrap().as_str(),
            "https://example.test/v1/devices/a%2Fb%20c"
        );
    }

    #[test]
    fn test_invalid_api_base_is_rejected() {
        assert!(matches!(MeaterClient::new("not a url"), Err(MeaterError::InvalidBaseUrl(_))));
        assert!(matches!(MeaterClient::new("mailto:cook@example.com"), Err(MeaterError::InvalidBaseUrl(_))));
    }

    // ── httpmock tests ──────────────────────────────────────────────

    #[test]
    fn test_login_then_bearer_header() {
        let server = MockServer::start();

        let login = server.mock(|when, then| {
            when.method(POST)
                .path("/login")
                .json_body(json!({ "email": "a@b.com", "password": "x" }));
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({
                    "status": "OK",
                    "statusCode": 200,
                    "data": { "token": "T123", "userId": "user-9" }
                }));
        });

        let devices = server.mock(|when, then| {
            when.method(GET)
                .path("/devices")
                .header("Authorization", "Bearer T123");
            then.status(200)
                .json_body(json!({
                    "status": "OK",
                    "statusCode": 200,
                    "data": { "devices": [{ "id": "probe-1" }] }
                }));
        });

        let mut client = MeaterClient::new(server.base_url()).unwrap();
        assert!(!client.is_authorized());

        assert!(client.login("a@b.com", "x").unwrap());
        assert!(client.is_authorized());
        assert_eq!(client.session().token(), Some("T123"));
        assert_eq!(client.session().user_id(), Some("user-9"));

        let list = client.list_devices().unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list.first().unwrap().id(), "probe-1");

        login.assert();
        devices.assert();
    }

    #[test]
    fn test_login_rejected_returns_false() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/login");
            then.status(401)
                .json_body(json!({ "status": "Unauthorized", "statusCode": 401 }));
        });

        let mut client = MeaterClient::new(server.base_url()).unwrap();
        assert!(!client.login("a@b.com", "wrong").unwrap());
        assert!(!client.is_authorized());
        assert!(client.session().token().is_none());
    }

    #[test]
    fn test_failed_login_discards_previous_session() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/login");
            then.status(500);
        });

        let mut client = MeaterClient::new(server.base_url()).unwrap();
        client.init_with_token("old");
        assert!(client.is_authorized());

        assert!(!client.login("a@b.com", "x").unwrap());
        assert!(!client.is_authorized());
        assert!(client.session().token().is_none());
    }

    #[test]
    fn test_login_success_without_token_still_authorizes() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/login");
            then.status(200)
                .json_body(json!({ "status": "OK", "statusCode": 200, "data": null }));
        });

        let mut client = MeaterClient::new(server.base_url()).unwrap();
        assert!(client.login("a@b.com", "x").unwrap());
        assert!(client.is_authorized());
        assert_eq!(client.session().token(), Some(""));
        assert!(client.session().user_id().is_none());
    }

    #[test]
    fn test_login_transport_failure_is_error() {
        // Nothing listens on port 1.
        let mut client = MeaterClient::new("http://127.0.0.1:1").unwrap();
        let err = client.login("a@b.com", "x").unwrap_err();
        assert!(matches!(err, MeaterError::Transport(_)), "got {:?}", err);
        assert!(!client.is_authorized());
    }

    #[test]
    fn test_device_calls_transport_failure_keep_session() {
        let mut client = MeaterClient::new("http://127.0.0.1:1").unwrap();
        client.init_with_token("T123");

        let err = client.list_devices().unwrap_err();
        assert!(matches!(err, MeaterError::Transport(_)), "got {:?}", err);
        let err = client.get_device("xyz").unwrap_err();
        assert!(matches!(err, MeaterError::Transport(_)), "got {:?}", err);

        assert!(client.is_authorized());
        assert_eq!(client.session().token(), Some("T123"));
    }

    #[test]
    fn test_get_device_empty_id_is_rejected_locally() {
        let server = MockServer::start();
        let any = server.mock(|when, then| {
            when.path_includes("/");
            then.status(200);
        });

        let mut client = authed_client(&server);
        assert!(matches!(client.get_device(""), Err(MeaterError::BadRequest(_))));
        any.assert_calls(0);
        assert!(client.is_authorized());
    }

    #[test]
    fn test_unauthorized_calls_fail_without_io() {
        let server = MockServer::start();
        let any = server.mock(|when, then| {
            when.path_includes("/");
            then.status(200);
        });

        let mut client = MeaterClient::new(server.base_url()).unwrap();
        assert!(matches!(client.list_devices(), Err(MeaterError::AuthRequired)));
        assert!(matches!(client.get_device("xyz"), Err(MeaterError::AuthRequired)));
        any.assert_calls(0);

        // Same answer when no network is reachable at all.
        let mut offline = MeaterClient::new("http://127.0.0.1:1").unwrap();
        assert!(matches!(offline.list_devices(), Err(MeaterError::AuthRequired)));
    }

    #[test]
    fn test_401_clears_session() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/devices");
            then.status(401)
                .json_body(json!({ "status": "Unauthorized", "statusCode": 401 }));
        });

        let mut client = authed_client(&server);
        assert!(client.is_authorized());

        let err = client.list_devices().unwrap_err();
        assert!(matches!(err, MeaterError::AuthExpired));
        assert!(!client.is_authorized());
        assert!(client.session().token().is_none());

        // Next call fails locally.
        assert!(matches!(client.list_devices(), Err(MeaterError::AuthRequired)));
    }

    #[test]
    fn test_401_on_get_device_clears_session() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/devices/xyz");
            then.status(401);
        });

        let mut client = authed_client(&server);
        assert!(matches!(client.get_device("xyz"), Err(MeaterError::AuthExpired)));
        assert!(!client.is_authorized());
    }

    #[test]
    fn test_other_errors_keep_session() {
        let server = MockServer::start();
        for (id, status) in [("bad", 400), ("gone", 404), ("busy", 429), ("boom", 500), ("down", 503)] {
            let path = format!("/devices/{}", id);
            server.mock(|when, then| {
                when.method(GET).path(path.as_str());
                then.status(status).body(format!("status {}", status));
            });
        }

        let mut client = authed_client(&server);

        assert!(matches!(client.get_device("bad"), Err(MeaterError::BadRequest(m)) if m == "status 400"));
        assert!(matches!(client.get_device("gone"), Err(MeaterError::NotFound(_))));
        assert!(matches!(client.get_device("busy"), Err(MeaterError::RateLimited(_))));
        assert!(matches!(client.get_device("boom"), Err(MeaterError::ServerError(_))));
        assert!(matches!(client.get_device("down"), Err(MeaterError::UnhandledStatus(503, _))));

        assert!(client.is_authorized());
        assert_eq!(client.session().token(), Some("T123"));
    }

    #[test]
    fn test_get_device_null_data_is_zero_device() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/devices/xyz")
                .header("Authorization", "Bearer T123");
            then.status(200).json_body(json!({ "data": null }));
        });

        let mut client = authed_client(&server);
        let device = client.get_device("xyz").unwrap();

        mock.assert();
        assert_eq!(device.id(), "");
        assert_eq!(device.temperature().internal(), 0.0);
        assert_eq!(device.temperature().ambient(), 0.0);
        assert!(device.cook().is_none());
    }

    #[test]
    fn test_get_device_maps_cook() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/devices/p1");
            then.status(200).json_body(json!({
                "status": "OK",
                "statusCode": 200,
                "data": {
                    "id": "p1",
                    "temperature": { "internal": 60.2, "ambient": 140.0 },
                    "cook": {
                        "id": "c1",
                        "name": "Pork Shoulder",
                        "state": "Ready For Resting",
                        "temperature": { "target": 63.0, "peak": 63.4 },
                        "time": { "elapsed": 7200, "remaining": -1 }
                    },
                    "updated_at": 1700000123
                }
            }));
        });

        let mut client = authed_client(&server);
        let device = client.get_device("p1").unwrap();
        let cook = device.cook().unwrap();
        assert_eq!(cook.state(), crate::CookState::ReadyForResting);
        assert!(!cook.time().remaining_known());
        assert_eq!(device.updated_at(), 1_700_000_123);
    }

    #[test]
    fn test_list_devices_empty_payloads() {
        let server = MockServer::start();
        let bodies = [
            ("/v1", json!({ "data": null })),
            ("/v2", json!({ "status": "OK" })),
            ("/v3", json!({ "data": { "devices": [] } })),
        ];
        for (prefix, body) in bodies.iter() {
            let path = format!("{}/devices", prefix);
            server.mock(|when, then| {
                when.method(GET).path(path.as_str());
                then.status(200).json_body(body.clone());
            });
        }

        for (prefix, _) in bodies.iter() {
            let mut client = MeaterClient::new(format!("{}{}", server.base_url(), prefix)).unwrap();
            client.init_with_token("T123");
            assert!(client.list_devices().unwrap().is_empty(), "prefix {}", prefix);
        }
    }

    #[test]
    fn test_list_devices_non_json_body_is_empty() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/devices");
            then.status(200).body("<html>maintenance</html>");
        });

        let mut client = authed_client(&server);
        assert!(client.list_devices().unwrap().is_empty());
    }

    #[test]
    fn test_logout_is_local() {
        let server = MockServer::start();
        let any = server.mock(|when, then| {
            when.path_includes("/");
            then.status(200);
        });

        let mut client = authed_client(&server);
        client.logout();
        assert!(!client.is_authorized());
        any.assert_calls(0);
    }
}
