/// Submission of the collected profile to the style backend
///
/// Everything in the field store plus the photo goes out as one multipart
/// POST. The backend answers `{"success": bool, "message": "..."}`, with a
/// JSON body even for logical rejections such as an expired session.
use reqwest::multipart::{Form, Part};
use reqwest::{header, Client, Url};
use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::Config;
use crate::media::photo::PhotoAsset;
use crate::state::session::WizardSession;

/// Multipart name of the photo part
pub const PHOTO_PART: &str = "photo";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    /// The backend understood the request and said no
    #[error("Error: {0}")]
    Rejected(String),

    /// Network failure, timeout, or refused connection
    #[error("Could not process the request")]
    Transport(String),

    /// The backend answered with something that isn't a result object
    #[error("Could not process the request")]
    InvalidResponse(String),

    #[error("Invalid backend configuration: {0}")]
    Config(String),
}

impl SubmitError {
    /// Detail for logs; the display text is what users see
    pub fn detail(&self) -> &str {
        match self {
            SubmitError::Rejected(s)
            | SubmitError::Transport(s)
            | SubmitError::InvalidResponse(s)
            | SubmitError::Config(s) => s,
        }
    }
}

#[derive(Deserialize, Debug)]
struct BackendResponse {
    success: bool,
    #[serde(default)]
    message: Option<String>,
}

/// Snapshot of everything that will be sent
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionPayload {
    /// Field name/value pairs in name order
    pub fields: Vec<(String, String)>,
    pub photo: Option<PhotoAsset>,
}

impl SubmissionPayload {
    pub fn from_session(session: &WizardSession) -> Self {
        Self {
            fields: session
                .store()
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            photo: session.photo().cloned(),
        }
    }

    pub fn into_form(self) -> Result<Form, SubmitError> {
        let mut form = Form::new();
        for (name, value) in self.fields {
            form = form.text(name, value);
        }

        if let Some(photo) = self.photo {
            let part = Part::bytes(photo.bytes)
                .file_name(photo.file_name)
                .mime_str(&photo.mime_type)
                .map_err(|e| SubmitError::Transport(format!("bad photo MIME type: {}", e)))?;
            form = form.part(PHOTO_PART, part);
        }

        Ok(form)
    }
}

/// HTTP client for the intake endpoint
#[derive(Debug, Clone)]
pub struct SubmissionClient {
    http: Client,
    submit_url: Url,
    results_url: Url,
    session_cookie: Option<String>,
}

impl SubmissionClient {
    pub fn new(config: &Config) -> Result<Self, SubmitError> {
        let submit_url = config
            .submit_url()
            .map_err(|e| SubmitError::Config(e.to_string()))?;
        let results_url = config
            .results_url()
            .map_err(|e| SubmitError::Config(e.to_string()))?;
        let http = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| SubmitError::Config(e.to_string()))?;

        Ok(Self {
            http,
            submit_url,
            results_url,
            session_cookie: config.session_cookie.clone(),
        })
    }

    pub fn submit_url(&self) -> &Url {
        &self.submit_url
    }

    /// Send the payload. On success returns the results URL to navigate to.
    pub async fn submit(self, payload: SubmissionPayload) -> Result<Url, SubmitError> {
        info!(
            "📤 Submitting {} fields{} to {}",
            payload.fields.len(),
            if payload.photo.is_some() { " and a photo" } else { "" },
            self.submit_url
        );

        let mut request = self
            .http
            .post(self.submit_url.clone())
            .multipart(payload.into_form()?);
        if let Some(cookie) = &self.session_cookie {
            request = request.header(header::COOKIE, cookie);
        }

        let response = request
            .send()
            .await
            .map_err(|e| SubmitError::Transport(e.to_string()))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| SubmitError::Transport(e.to_string()))?;

        if let Err(e) = interpret(&body) {
            warn!("⚠️  Submission failed with HTTP {}: {}", status, e.detail());
            return Err(e);
        }

        info!("✅ Submission accepted");
        Ok(self.results_url.clone())
    }
}

/// Read the backend's result object
fn interpret(body: &[u8]) -> Result<(), SubmitError> {
    let response: BackendResponse =
        serde_json::from_slice(body).map_err(|e| SubmitError::InvalidResponse(e.to_string()))?;

    if response.success {
        Ok(())
    } else {
        Err(SubmitError::Rejected(
            response.message.unwrap_or_else(|| "Unknown error".to_string()),
        ))
    }
}

/// What the UI should do once a submission settles
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// Leave the wizard for the results page
    Navigate(Url),
    /// Stay on the terminal step and show this message
    Failed(String),
}

/// Release the in-flight slot and turn a result into a UI outcome.
///
/// The field store and photo are left as they are so a failed
/// submission can be retried.
pub fn settle(session: &mut WizardSession, result: Result<Url, SubmitError>) -> SubmissionOutcome {
    session.finish_submission();
    match result {
        Ok(url) => SubmissionOutcome::Navigate(url),
        Err(e) => SubmissionOutcome::Failed(e.to_string()),
    }
}
