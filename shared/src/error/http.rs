//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::Success => StatusCode::OK,

            Self::NotFound | Self::CertificateNotFound | Self::TagNotFound => {
                StatusCode::NOT_FOUND
            }

            Self::AlreadyExists | Self::CertificateAlreadyExists | Self::TagAlreadyExists => {
                StatusCode::CONFLICT
            }

            Self::ValidationFailed | Self::InvalidRequest => StatusCode::BAD_REQUEST,

            Self::Unknown | Self::InternalError | Self::DatabaseError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_mapping() {
        assert_eq!(ErrorCode::TagNotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ErrorCode::CertificateAlreadyExists.http_status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ErrorCode::ValidationFailed.http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ErrorCode::DatabaseError.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
