use reqwest::{
    Client, Method, Request, RequestBuilder, Response, Url,
    header::{AUTHORIZATION, HeaderValue},
};
use serde::Serialize;

use crate::{config::AppConfig, session::SessionContext};

/// GatewayError
///
/// Failures the Gateway itself can produce. Backend responses are never
/// turned into errors: a 401 or 500 comes back as a `Response`.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("invalid API base URL `{url}`: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("invalid request URL `{url}`: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("request to `{url}` is outside the API origin")]
    ForeignOrigin { url: Url },
    #[error("failed to build HTTP client: {0}")]
    Client(reqwest::Error),
    #[error("failed to build request: {0}")]
    Build(reqwest::Error),
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

/// ApiGateway
///
/// HTTP client bound to one backend origin. Every request issued through it
/// passes the pre-send interceptor (`authorize`), which attaches the session's
/// bearer credential when one is stored.
///
/// Cheap to clone; clones share the connection pool and the cookie store.
#[derive(Debug, Clone)]
pub struct ApiGateway {
    client: Client,
    base: Url,
    base_url: String,
    session: SessionContext,
}

impl ApiGateway {
    /// new
    ///
    /// Binds a client to `base_url`. The URL is validated here so that a bad
    /// deployment value shows up at startup rather than on the first request.
    pub fn new(base_url: &str, session: SessionContext) -> Result<Self, GatewayError> {
        let base = Url::parse(base_url).map_err(|e| GatewayError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        // Cookies set by the backend are replayed on later calls.
        let client = Client::builder()
            .cookie_store(true)
            .build()
            .map_err(GatewayError::Client)?;

        Ok(Self {
            client,
            base,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn from_config(config: &AppConfig, session: SessionContext) -> Result<Self, GatewayError> {
        Self::new(&config.api_base_url, session)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    /// resolve
    ///
    /// Joins a request path onto the base URL. Absolute URLs are refused: the
    /// credential only ever travels to the configured backend.
    pub fn resolve(&self, path: &str) -> Result<Url, GatewayError> {
        if Url::parse(path).is_ok() {
            return Err(GatewayError::InvalidUrl {
                url: path.to_string(),
                reason: "absolute URLs are not accepted, pass a path".to_string(),
            });
        }

        let joined = if path.is_empty() {
            self.base_url.clone()
        } else {
            format!("{}/{}", self.base_url, path.trim_start_matches('/'))
        };

        Url::parse(&joined).map_err(|e| GatewayError::InvalidUrl {
            url: joined.clone(),
            reason: e.to_string(),
        })
    }

    /// Whether `url` points at the backend this gateway is bound to.
    pub fn is_api_origin(&self, url: &Url) -> bool {
        url.origin() == self.base.origin()
    }

    /// authorize
    ///
    /// The pre-send interceptor. With a non-empty stored credential, sets
    /// `Authorization: Bearer <token>`, replacing any value already present.
    /// Without one, or when the request targets another origin, the request
    /// is left untouched.
    pub fn authorize(&self, request: &mut Request) {
        if !self.is_api_origin(request.url()) {
            tracing::debug!(url = %request.url(), "foreign origin, credential not attached");
            return;
        }
        let Some(credential) = self.session.credential() else {
            return;
        };
        let Some(token) = credential.bearer() else {
            return;
        };

        match HeaderValue::from_str(&format!("Bearer {token}")) {
            Ok(mut value) => {
                value.set_sensitive(true);
                request.headers_mut().insert(AUTHORIZATION, value);
            }
            Err(_) => {
                // Not representable as a header value; send the request unauthenticated.
                tracing::warn!(
                    url = %request.url(),
                    "stored credential is not a valid header value, sending without Authorization"
                );
            }
        }
    }

    /// Starts a request against `path`. Finish it with [`ApiGateway::send`] so the
    /// interceptor runs.
    pub fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, GatewayError> {
        let url = self.resolve(path)?;
        Ok(self.client.request(method, url))
    }

    /// Builds a request and runs the interceptor on it without sending.
    pub fn prepare(&self, method: Method, path: &str) -> Result<Request, GatewayError> {
        let mut request = self
            .request(method, path)?
            .build()
            .map_err(GatewayError::Build)?;
        self.authorize(&mut request);
        Ok(request)
    }

    /// execute
    ///
    /// Intercepts then transmits. The backend's response is returned as is,
    /// whatever its status. Requests aimed at any other origin are refused.
    pub async fn execute(&self, mut request: Request) -> Result<Response, GatewayError> {
        if !self.is_api_origin(request.url()) {
            return Err(GatewayError::ForeignOrigin {
                url: request.url().clone(),
            });
        }

        self.authorize(&mut request);

        tracing::debug!(method = %request.method(), url = %request.url(), "sending API request");

        let response = self.client.execute(request).await?;

        tracing::debug!(status = %response.status(), url = %response.url(), "API response received");

        Ok(response)
    }

    /// Sends a builder obtained from [`ApiGateway::request`].
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response, GatewayError> {
        let request = builder.build().map_err(GatewayError::Build)?;
        self.execute(request).await
    }

    pub async fn get(&self, path: &str) -> Result<Response, GatewayError> {
        self.send(self.request(Method::GET, path)?).await
    }

    pub async fn delete(&self, path: &str) -> Result<Response, GatewayError> {
        self.send(self.request(Method::DELETE, path)?).await
    }

    pub async fn post_json<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<Response, GatewayError> {
        self.send(self.request(Method::POST, path)?.json(body)).await
    }

    pub async fn put_json<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<Response, GatewayError> {
        self.send(self.request(Method::PUT, path)?.json(body)).await
    }

    pub async fn patch_json<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<Response, GatewayError> {
        self.send(self.request(Method::PATCH, path)?.json(body)).await
    }
}
