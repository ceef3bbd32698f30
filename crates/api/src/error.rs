use snafu::Snafu;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ApiError {
    #[snafu(display("invalid backend base URL '{base_url}': {details}"))]
    InvalidBaseUrl {
        stage: &'static str,
        base_url: String,
        details: String,
    },
    #[snafu(display("failed to build http client on `{stage}`: {source}"))]
    BuildClient {
        stage: &'static str,
        source: reqwest::Error,
    },
    #[snafu(display("request failed on `{stage}`: {source}"))]
    Transport {
        stage: &'static str,
        source: reqwest::Error,
    },
    #[snafu(display("backend answered {status} on `{stage}`: {message}"))]
    Status {
        stage: &'static str,
        status: u16,
        message: String,
    },
    #[snafu(display("failed to decode response on `{stage}`: {source}"))]
    Decode {
        stage: &'static str,
        source: reqwest::Error,
    },
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// Message suitable for showing to the user.
    pub fn user_message(&self) -> String {
        match self {
            Self::Status { message, .. } => message.clone(),
            Self::Transport { .. } => "Could not reach the chat server".to_string(),
            Self::Decode { .. } => "The chat server sent an unexpected response".to_string(),
            Self::InvalidBaseUrl { .. } | Self::BuildClient { .. } => {
                "The chat client is misconfigured".to_string()
            }
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn stage(&self) -> &'static str {
        match self {
            Self::InvalidBaseUrl { stage, .. }
            | Self::BuildClient { stage, .. }
            | Self::Transport { stage, .. }
            | Self::Status { stage, .. }
            | Self::Decode { stage, .. } => stage,
        }
    }

    /// True when the backend rejected the credentials of a login attempt.
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            Self::Status {
                stage: "login",
                status: 400 | 401 | 403,
                ..
            }
        )
    }
}
