use reqwest::StatusCode;
use serde_json::Value;

use crate::gateway::{ApiGateway, GatewayError};

/// Backend endpoint returning the signed-in administrator's profile.
pub const ADMIN_PROFILE_PATH: &str = "/administrators/profile/";

/// ProfileError
///
/// What the profile page shows when the fetch does not produce a profile.
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("No auth token found, please login again.")]
    MissingToken,
    #[error("profile request rejected with {status}")]
    Rejected { status: StatusCode, body: Value },
    #[error("failed to load profile: {0}")]
    Gateway(#[from] GatewayError),
}

/// fetch_profile
///
/// Loads the administrator profile through the Gateway.
///
/// Checks for a stored credential first and sends nothing without one. The
/// Gateway returns every response untouched, so a non-2xx status is turned
/// into `Rejected` here, carrying the backend's body (JSON when it parses,
/// otherwise the text as a JSON string).
pub async fn fetch_profile(gateway: &ApiGateway) -> Result<Value, ProfileError> {
    let has_token = gateway
        .session()
        .credential()
        .is_some_and(|credential| credential.bearer().is_some());
    if !has_token {
        return Err(ProfileError::MissingToken);
    }

    let response = gateway.get(ADMIN_PROFILE_PATH).await?;
    let status = response.status();
    let text = response.text().await.map_err(GatewayError::from)?;
    let body = serde_json::from_str::<Value>(&text).unwrap_or(Value::String(text));

    if !status.is_success() {
        tracing::warn!(%status, "profile request rejected");
        return Err(ProfileError::Rejected { status, body });
    }

    tracing::debug!("profile fetched");
    Ok(body)
}

/// ProfileState
///
/// Data/loading/error triple backing the profile page.
#[derive(Debug, Default)]
pub struct ProfileState {
    pub data: Option<Value>,
    pub loading: bool,
    pub error: Option<ProfileError>,
}

impl ProfileState {
    pub async fn load(&mut self, gateway: &ApiGateway) {
        self.loading = true;
        self.error = None;

        match fetch_profile(gateway).await {
            Ok(profile) => self.data = Some(profile),
            Err(e) => {
                tracing::error!(error = %e, "error fetching profile");
                self.error = Some(e);
            }
        }

        self.loading = false;
    }
}
