use actix_web::http::StatusCode;
use actix_web::{error::BlockingError, HttpResponse, ResponseError};
use diesel::r2d2::PoolError;
use serde_json::json;

pub(crate) type DbError = Box<dyn std::error::Error + Send + Sync>;

/// Why a restaurant pizza was refused before anything was written.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub(crate) enum ValidationError {
    #[error("price {0} is outside the allowed range")]
    PriceOutOfRange(i32),
    #[error("restaurant {0} does not exist")]
    UnknownRestaurant(i32),
    #[error("pizza {0} does not exist")]
    UnknownPizza(i32),
}

#[derive(Debug, thiserror::Error)]
pub(crate) enum CreateError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Storage(#[from] diesel::result::Error),
}

#[derive(Debug, thiserror::Error)]
pub(crate) enum ApiError {
    #[error("Restaurant not found")]
    RestaurantNotFound,
    #[error("validation errors")]
    Validation,
    #[error("internal server error: {0}")]
    Internal(String),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::RestaurantNotFound => StatusCode::NOT_FOUND,
            ApiError::Validation => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            ApiError::RestaurantNotFound => json!({ "error": "Restaurant not found" }),
            ApiError::Validation => json!({ "errors": ["validation errors"] }),
            ApiError::Internal(msg) => {
                log::error!("request failed: {}", msg);
                json!({ "error": "Internal server error" })
            }
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

impl From<CreateError> for ApiError {
    fn from(err: CreateError) -> Self {
        match err {
            CreateError::Validation(_) => ApiError::Validation,
            CreateError::Storage(err) => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<PoolError> for ApiError {
    fn from(err: PoolError) -> Self {
        ApiError::Internal(format!("no database connection available: {}", err))
    }
}

impl From<BlockingError> for ApiError {
    fn from(err: BlockingError) -> Self {
        ApiError::Internal(err.to_string())
    }
}
