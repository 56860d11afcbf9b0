use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};

/// Uniform response wrapper: `{success, response, message}`.
/// Every endpoint speaks this shape so clients can branch on `success`
/// plus the status code without parsing prose.
#[derive(Debug)]
pub struct Envelope {
    status: StatusCode,
    success: bool,
    response: Value,
    message: String,
}

impl Envelope {
    fn new<T: Serialize>(status: StatusCode, success: bool, data: T, message: &str) -> Self {
        let response = match serde_json::to_value(&data) {
            Ok(v) => v,
            Err(e) => {
                tracing::error!(error = %e, "failed to serialize response payload");
                return Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    success: false,
                    response: Value::Null,
                    message: "Internal server error".into(),
                };
            }
        };
        Self {
            status,
            success,
            response,
            message: message.into(),
        }
    }

    /// 200 with a payload.
    pub fn ok<T: Serialize>(data: T, message: &str) -> Self {
        Self::new(StatusCode::OK, true, data, message)
    }

    /// 201 with the created resource.
    pub fn created<T: Serialize>(data: T, message: &str) -> Self {
        Self::new(StatusCode::CREATED, true, data, message)
    }

    /// Non-exceptional failure envelope, e.g. an empty filter result.
    pub fn fail<T: Serialize>(status: StatusCode, data: T, message: &str) -> Self {
        Self::new(status, false, data, message)
    }
}

impl IntoResponse for Envelope {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(json!({
                "success": self.success,
                "response": self.response,
                "message": self.message,
            })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_envelope_shape() {
        let body = Envelope::ok(vec![1, 2, 3], "Retrieved");
        assert_eq!(body.status, StatusCode::OK);
        assert!(body.success);
        assert_eq!(body.response, json!([1, 2, 3]));
        assert_eq!(body.message, "Retrieved");
    }

    #[test]
    fn fail_envelope_keeps_payload() {
        let body = Envelope::fail(StatusCode::NOT_FOUND, Vec::<i32>::new(), "No matches");
        assert_eq!(body.status, StatusCode::NOT_FOUND);
        assert!(!body.success);
        assert_eq!(body.response, json!([]));
    }
}
