//! Single GET request with status classification and body decoding.

use reqwest::StatusCode;
use tracing::instrument;
use url::Url;

use super::config::FetchConfig;
use super::error::{FetchError, SERVER_ERROR, UNKNOWN_ERROR};
use crate::catalog::{DecodeError, decode_error_message};

/// Number of body characters kept in log previews.
const BODY_PREVIEW_CHARS: usize = 200;

/// Returns the first few characters of `body` for diagnostics.
fn preview(body: &str) -> String {
    body.chars().take(BODY_PREVIEW_CHARS).collect()
}

/// Parses `raw` and checks that it is an HTTP(S) URL.
///
/// # Errors
///
/// Returns [`FetchError::InvalidUrl`] if parsing fails or the scheme is not
/// `http` / `https`.
pub(crate) fn parse_url(raw: &str) -> Result<Url, FetchError> {
    let url = Url::parse(raw).map_err(|e| FetchError::InvalidUrl {
        url: String::from(raw),
        reason: e.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(FetchError::InvalidUrl {
            url: String::from(raw),
            reason: format!("unsupported scheme `{other}`"),
        }),
    }
}

/// Maps an error status (>= 400) to a [`FetchError`].
///
/// HTTP 400 carries `{"message": ..}`; when that body does not parse the
/// generic message is surfaced and the parse failure is logged.
pub(crate) fn status_error(status: StatusCode, body: Option<&str>) -> FetchError {
    let message = if status == StatusCode::BAD_REQUEST {
        let body = body.unwrap_or_default();
        match decode_error_message(body) {
            Ok(message) => message,
            Err(e) => {
                tracing::warn!(
                    status = status.as_u16(),
                    error = %e,
                    body = %preview(body),
                    "error body did not decode, surfacing generic message"
                );
                String::from(UNKNOWN_ERROR)
            }
        }
    } else {
        String::from(SERVER_ERROR)
    };
    FetchError::HttpStatus {
        status: status.as_u16(),
        message,
    }
}

/// Performs one GET on `url` and decodes the body with `decode`.
///
/// The client, connection and response are owned by this call and dropped
/// on every return path.
///
/// # Errors
///
/// - [`FetchError::Transport`] / [`FetchError::Timeout`] on network failure.
/// - [`FetchError::HttpStatus`] for status >= 400.
/// - [`FetchError::Decode`] if `decode` rejects the body.
#[instrument(skip_all, fields(url = %url))]
pub(crate) async fn fetch_decoded<T, D>(
    config: &FetchConfig,
    url: &Url,
    decode: D,
) -> Result<T, FetchError>
where
    D: FnOnce(&str) -> Result<T, DecodeError>,
{
    let client = config.http_client()?;

    tracing::debug!("catalog request");
    let response = client.get(url.clone()).send().await?;
    let status = response.status();

    if status.as_u16() >= 400 {
        let body = if status == StatusCode::BAD_REQUEST {
            Some(response.text().await?)
        } else {
            None
        };
        return Err(status_error(status, body.as_deref()));
    }

    let body = response.text().await?;
    tracing::debug!(status = status.as_u16(), len = body.len(), "catalog response");

    decode(&body).map_err(|e| {
        tracing::debug!(error = %e, body = %preview(&body), "catalog payload did not decode");
        FetchError::Decode(e)
    })
}
