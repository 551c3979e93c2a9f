//! OAuth2 client-credentials exchange against the Microsoft identity
//! platform v2.0 token endpoint.
//!
//! This is the only call the client makes outside the Graph base URL. Token
//! caching and refresh are out of scope: the token is acquired once at
//! client construction and held for the session's lifetime.

use reqwest::Client;
use tracing::{debug, instrument};

use crate::error::DriveError;
use crate::models::TokenResponse;

/// Fixed resource-API scope for the client-credentials grant.
const GRAPH_DEFAULT_SCOPE: &str = "https://graph.microsoft.com/.default";

/// Acquires a bearer token for the Graph API using the client-credentials
/// grant.
///
/// # Errors
///
/// Every failure mode surfaces as [`DriveError::Security`]: a transport
/// failure reaching the identity provider, a non-2xx token response, an
/// unparseable body, or a body lacking the `access_token` field.
#[instrument(skip(http, client_secret), fields(tenant_id = %tenant_id, client_id = %client_id))]
pub(crate) async fn acquire_token(
    http: &Client,
    authority_base: &str,
    tenant_id: &str,
    client_id: &str,
    client_secret: &str,
) -> Result<String, DriveError> {
    let token_url = format!("{authority_base}/{tenant_id}/oauth2/v2.0/token");

    let form = [
        ("grant_type", "client_credentials"),
        ("client_id", client_id),
        ("client_secret", client_secret),
        ("scope", GRAPH_DEFAULT_SCOPE),
    ];

    let response = http
        .post(&token_url)
        .form(&form)
        .send()
        .await
        .map_err(|e| DriveError::security(format!("token request failed: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(DriveError::security(format!(
            "identity provider rejected the token request with HTTP {}",
            status.as_u16()
        )));
    }

    let token: TokenResponse = response
        .json()
        .await
        .map_err(|e| DriveError::security(format!("malformed token response: {e}")))?;

    let access_token = token.access_token.ok_or_else(|| {
        DriveError::security("access token not found, please check your credentials")
    })?;

    debug!("bearer token acquired");
    Ok(access_token)
}
