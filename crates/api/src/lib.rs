use std::sync::Arc;

mod api;
mod error;
mod http;
mod types;

pub use api::{ChatBackend, MessagesApi, RestBackend, RoomsApi, SessionsApi};
pub use error::{ApiError, ApiResult};
pub use futures::future::BoxFuture;
pub use http::{DEFAULT_BASE_URL, HttpClient, HttpConfig, Operation, extract_error_message};
pub use types::{
    AuthToken, LoginRequest, LoginResponse, Message, MessageId, NewMessage, NewRoom, Room, RoomId,
    UserId,
};

pub fn create_backend(config: HttpConfig) -> ApiResult<Arc<dyn ChatBackend>> {
    tracing::info!(base_url = %config.base_url, "creating REST chat backend");
    Ok(Arc::new(RestBackend::new(config)?))
}
