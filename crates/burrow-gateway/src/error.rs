use crate::model::ErrorResponse;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use burrow_core::{CoreError, ShortenerError};
use thiserror::Error;
use tracing::error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<CoreError> for AppError {
    fn from(error: CoreError) -> Self {
        match error {
            CoreError::InvalidUrl(message) | CoreError::InvalidShortCode(message) => {
                AppError::BadRequest(message)
            }
        }
    }
}

impl From<ShortenerError> for AppError {
    fn from(error: ShortenerError) -> Self {
        match error {
            ShortenerError::InvalidUrl(message) | ShortenerError::InvalidShortCode(message) => {
                AppError::BadRequest(message)
            }
            ShortenerError::Exhausted { .. } => {
                error!(error = %error, "short code allocation exhausted");
                AppError::Internal(error.to_string())
            }
            ShortenerError::Storage(source) => {
                error!(error = %source, "storage operation failed");
                AppError::Internal("storage operation failed".to_string())
            }
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (
            self.status(),
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burrow_core::StorageError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tracing::{Event, Level, Subscriber};
    use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

    /// Counts `ERROR` events.
    struct ErrorCounter(Arc<AtomicUsize>);

    impl<S: Subscriber> Layer<S> for ErrorCounter {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            if *event.metadata().level() == Level::ERROR {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    fn errors_logged(f: impl FnOnce()) -> usize {
        let count = Arc::new(AtomicUsize::new(0));
        let subscriber = tracing_subscriber::registry().with(ErrorCounter(count.clone()));
        tracing::subscriber::with_default(subscriber, f);
        count.load(Ordering::SeqCst)
    }

    #[test]
    fn validation_errors_are_bad_requests() {
        let err: AppError = ShortenerError::InvalidUrl("URL cannot be empty".into()).into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "URL cannot be empty");

        let err: AppError = CoreError::InvalidShortCode("length must be 6, got 3".into()).into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn exhaustion_is_a_server_error() {
        let err: AppError = ShortenerError::Exhausted { attempts: 10 }.into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.to_string().contains("10 attempts"));
    }

    #[test]
    fn storage_details_are_not_leaked() {
        let err: AppError =
            ShortenerError::Storage(StorageError::Unavailable("disk on fire".into())).into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.to_string().contains("disk on fire"));
    }

    #[test]
    fn server_errors_are_logged_once() {
        let storage = errors_logged(|| {
            let err: AppError =
                ShortenerError::Storage(StorageError::Timeout("pool timed out".into())).into();
            let _ = err.into_response();
        });
        assert_eq!(storage, 1);

        let exhausted = errors_logged(|| {
            let err: AppError = ShortenerError::Exhausted { attempts: 10 }.into();
            let _ = err.into_response();
        });
        assert_eq!(exhausted, 1);
    }
}
