//! Validated JSON extractor.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::AppError;

/// JSON extractor that validates the payload after deserializing it.
///
/// # Example
///
/// ```rust,ignore
/// use common::ValidatedJson;
/// use domain::UserCreate;
///
/// async fn register(ValidatedJson(payload): ValidatedJson<UserCreate>) {
///     // payload already passed `UserCreate::validate`
/// }
/// ```
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::validation(e.body_text()))?;

        value.validate()?;

        Ok(ValidatedJson(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::header::CONTENT_TYPE;
    use domain::{UserCreate, UserUpdate};

    fn json_request(body: &'static str) -> Request {
        Request::builder()
            .method("POST")
            .uri("/")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_accepts_valid_payload() {
        let req = json_request(r#"{"email": "ada@example.com", "password": "long-enough"}"#);

        let ValidatedJson(payload) = ValidatedJson::<UserCreate>::from_request(req, &())
            .await
            .unwrap();

        assert_eq!(payload.email, "ada@example.com");
    }

    #[tokio::test]
    async fn test_rejects_short_password() {
        let req = json_request(r#"{"email": "ada@example.com", "password": "short"}"#);

        let err = ValidatedJson::<UserCreate>::from_request(req, &())
            .await
            .err()
            .unwrap();

        match err {
            AppError::Validation(msg) => assert!(msg.contains("at least 8")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_rejects_malformed_json() {
        let req = json_request(r#"{"email": "#);

        let err = ValidatedJson::<UserUpdate>::from_request(req, &())
            .await
            .err()
            .unwrap();

        assert!(matches!(err, AppError::Validation(_)));
    }
}
