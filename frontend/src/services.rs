// Service layer for the hosted backend (auth + REST over HTTP)
use std::time::Duration;

use async_trait::async_trait;
use crm_shared::{
    Backend, BackendConfig, BackendError, BackendResult, ConfigError, Controller, Query, Session,
    Table, Timeouts, Timer, User,
};
use gloo_net::http::{Request, RequestBuilder, Response};
use gloo_storage::{LocalStorage, Storage};
use gloo_timers::future::TimeoutFuture;
use serde_json::{Value, json};
use tracing::{debug, warn};

/// LocalStorage key holding the signed-in session
pub const SESSION_STORAGE_KEY: &str = "crm_session";

pub type AppController = Controller<SupabaseBackend, GlooTimer>;

// ============================================
// TIMER
// ============================================

pub struct GlooTimer;

impl Timer for GlooTimer {
    type Sleep = TimeoutFuture;

    fn sleep(&self, duration: Duration) -> Self::Sleep {
        TimeoutFuture::new(u32::try_from(duration.as_millis()).unwrap_or(u32::MAX))
    }
}

// ============================================
// HTTP BACKEND
// ============================================

pub struct SupabaseBackend {
    config: Result<BackendConfig, ConfigError>,
}

impl SupabaseBackend {
    pub fn new(config: Result<BackendConfig, ConfigError>) -> Self {
        if let Err(err) = &config {
            warn!(error = %err, "backend is not configured");
        }
        Self { config }
    }

    /// Reads `CRM_BACKEND_URL` and `CRM_BACKEND_ANON_KEY` from the build environment.
    pub fn from_env() -> Self {
        Self::new(BackendConfig::from_values(
            option_env!("CRM_BACKEND_URL"),
            option_env!("CRM_BACKEND_ANON_KEY"),
        ))
    }

    pub fn config_error(&self) -> Option<&ConfigError> {
        self.config.as_ref().err()
    }

    pub fn timeouts(&self) -> Timeouts {
        self.config
            .as_ref()
            .map(|config| config.timeouts)
            .unwrap_or_default()
    }

    pub fn stored_session() -> Option<Session> {
        LocalStorage::get(SESSION_STORAGE_KEY).ok()
    }

    fn store_session(session: &Session) {
        if let Err(err) = LocalStorage::set(SESSION_STORAGE_KEY, session) {
            warn!(error = %err, "failed to persist session");
        }
    }

    fn clear_session() {
        LocalStorage::delete(SESSION_STORAGE_KEY);
    }

    fn config(&self) -> BackendResult<&BackendConfig> {
        self.config
            .as_ref()
            .map_err(|err| BackendError::NotConfigured(err.to_string()))
    }

    /// Attaches the project key and the caller's token, or the project key
    /// again when nobody is signed in.
    fn authorized(config: &BackendConfig, builder: RequestBuilder) -> RequestBuilder {
        let token = Self::stored_session()
            .map(|session| session.access_token)
            .unwrap_or_else(|| config.anon_key().to_string());
        builder
            .header("apikey", config.anon_key())
            .header("Authorization", &format!("Bearer {}", token))
    }

    fn table_url(config: &BackendConfig, table: Table, query: &Query) -> String {
        let filters: Vec<(&str, String)> = query
            .filters
            .iter()
            .map(|(column, value)| (column.as_str(), format!("eq.{}", value)))
            .collect();
        let order = query
            .order
            .as_ref()
            .map(|(column, order)| format!("{}.{}", column, order.as_str()));

        let mut params = vec![("select", "*")];
        params.extend(filters.iter().map(|(column, value)| (*column, value.as_str())));
        if let Some(order) = &order {
            params.push(("order", order.as_str()));
        }
        config.endpoint_with_query(&format!("rest/v1/{}", table.as_str()), params)
    }

    /// Trades a refresh token for a new session and stores it.
    async fn refresh(config: &BackendConfig, refresh_token: &str) -> BackendResult<Session> {
        let url = config.endpoint_with_query("auth/v1/token", [("grant_type", "refresh_token")]);
        let request = Request::post(&url).header("apikey", config.anon_key());
        let body = json!({ "refresh_token": refresh_token });

        let session: Session = send_json(request, &body)
            .await?
            .json()
            .await
            .map_err(network)?;
        Self::store_session(&session);
        Ok(session)
    }

    async fn refresh_stored(config: &BackendConfig) -> bool {
        let Some(refresh_token) = Self::stored_session().and_then(|session| session.refresh_token) else {
            return false;
        };
        match Self::refresh(config, &refresh_token).await {
            Ok(_) => {
                debug!("access token refreshed");
                true
            }
            Err(err) => {
                warn!(error = %err, "token refresh failed");
                false
            }
        }
    }

    /// Sends a request carrying the caller's token. A rejected token is
    /// refreshed once and the request rebuilt with the new one.
    async fn send_authorized<F>(config: &BackendConfig, build: F) -> BackendResult<Response>
    where
        F: Fn(&BackendConfig) -> BackendResult<Request>,
    {
        match send(build(config)?).await {
            Err(err) if err.is_session_expired() => {
                if Self::refresh_stored(config).await {
                    send(build(config)?).await
                } else {
                    Err(err)
                }
            }
            other => other,
        }
    }

    fn row_url(config: &BackendConfig, table: Table, id: &str) -> String {
        let filter = format!("eq.{}", id);
        config.endpoint_with_query(
            &format!("rest/v1/{}", table.as_str()),
            [("id", filter.as_str())],
        )
    }
}

fn network(err: gloo_net::Error) -> BackendError {
    BackendError::Network(err.to_string())
}

async fn send(request: Request) -> BackendResult<Response> {
    let response = request.send().await.map_err(network)?;
    if response.ok() {
        Ok(response)
    } else {
        Err(error_from(response).await)
    }
}

async fn send_empty(builder: RequestBuilder) -> BackendResult<Response> {
    send(empty(builder)?).await
}

async fn send_json(builder: RequestBuilder, body: &Value) -> BackendResult<Response> {
    send(with_body(builder, body)?).await
}

fn empty(builder: RequestBuilder) -> BackendResult<Request> {
    builder.build().map_err(network)
}

fn with_body(builder: RequestBuilder, body: &Value) -> BackendResult<Request> {
    builder.json(body).map_err(network)
}

/// Turns an error body from either the auth or the REST service into a
/// [`BackendError`].
async fn error_from(response: Response) -> BackendError {
    let status = response.status();
    let body: Value = response.json().await.unwrap_or(Value::Null);
    let field = |keys: &[&str]| {
        keys.iter()
            .find_map(|key| body.get(*key).and_then(Value::as_str))
            .map(str::to_string)
    };

    let message = field(&["msg", "error_description", "message", "error"])
        .unwrap_or_else(|| format!("HTTP Error: {}", status));
    let code = field(&["error_code", "code"]);

    if status == 401 {
        BackendError::Unauthorized(message)
    } else {
        BackendError::Http {
            status,
            code,
            message,
        }
    }
}

#[async_trait(?Send)]
impl Backend for SupabaseBackend {
    async fn get_session(&self) -> BackendResult<Option<Session>> {
        let config = self.config()?;
        let Some(stored) = Self::stored_session() else {
            return Ok(None);
        };

        let request = Request::get(&config.endpoint("auth/v1/user"))
            .header("apikey", config.anon_key())
            .header("Authorization", &format!("Bearer {}", stored.access_token));

        match send_empty(request).await {
            Ok(response) => {
                let user: User = response.json().await.map_err(network)?;
                Ok(Some(Session {
                    access_token: stored.access_token,
                    refresh_token: stored.refresh_token,
                    user,
                }))
            }
            Err(err) if err.is_session_expired() => {
                debug!(error = %err, "stored access token was rejected");
                let Some(refresh_token) = stored.refresh_token else {
                    Self::clear_session();
                    return Err(err);
                };
                match Self::refresh(config, &refresh_token).await {
                    Ok(session) => Ok(Some(session)),
                    Err(refresh_err) => {
                        warn!(error = %refresh_err, "token refresh failed");
                        Self::clear_session();
                        Err(err)
                    }
                }
            }
            Err(err) => Err(err),
        }
    }

    async fn sign_in(&self, email: &str, password: &str) -> BackendResult<Session> {
        let config = self.config()?;
        let url = config.endpoint_with_query("auth/v1/token", [("grant_type", "password")]);
        let request = Request::post(&url).header("apikey", config.anon_key());
        let body = json!({ "email": email, "password": password });

        let session: Session = send_json(request, &body)
            .await?
            .json()
            .await
            .map_err(network)?;
        Self::store_session(&session);
        Ok(session)
    }

    async fn sign_out(&self) -> BackendResult<()> {
        let result = match (self.config(), Self::stored_session()) {
            (Ok(config), Some(_)) => {
                let request = Self::authorized(config, Request::post(&config.endpoint("auth/v1/logout")));
                send_empty(request).await.map(|_| ())
            }
            (Err(err), _) => Err(err),
            (Ok(_), None) => Ok(()),
        };
        Self::clear_session();
        result
    }

    async fn select(&self, table: Table, query: &Query) -> BackendResult<Vec<Value>> {
        let config = self.config()?;
        let url = Self::table_url(config, table, query);
        Self::send_authorized(config, |config| empty(Self::authorized(config, Request::get(&url))))
            .await?
            .json()
            .await
            .map_err(network)
    }

    async fn insert(&self, table: Table, row: Value) -> BackendResult<Value> {
        let config = self.config()?;
        let url = config.endpoint(&format!("rest/v1/{}", table.as_str()));
        let stored: Vec<Value> = Self::send_authorized(config, |config| {
            let builder = Self::authorized(config, Request::post(&url))
                .header("Prefer", "return=representation");
            with_body(builder, &row)
        })
        .await?
        .json()
        .await
        .map_err(network)?;
        Ok(stored.into_iter().next().unwrap_or(row))
    }

    async fn update(&self, table: Table, id: &str, patch: Value) -> BackendResult<()> {
        let config = self.config()?;
        let url = Self::row_url(config, table, id);
        Self::send_authorized(config, |config| {
            with_body(Self::authorized(config, Request::patch(&url)), &patch)
        })
        .await
        .map(|_| ())
    }

    async fn delete(&self, table: Table, id: &str) -> BackendResult<()> {
        let config = self.config()?;
        let url = Self::row_url(config, table, id);
        Self::send_authorized(config, |config| {
            empty(Self::authorized(config, Request::delete(&url)))
        })
        .await
        .map(|_| ())
    }
}
