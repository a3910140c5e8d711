// Validation utilities module
// Custom field validators and extractors that validate what they deserialize

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::{header, request::Parts, HeaderMap},
    Form, Json,
};
use serde::{de::DeserializeOwned, Deserialize, Deserializer};
use std::borrow::Cow;
use validator::{Validate, ValidationError};

use crate::auth::models::Role;
use crate::error::ApiError;

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

/// Validates that a role is one of the accepted values: "human" or "ghost"
pub fn validate_role(role: &str) -> Result<(), ValidationError> {
    role.parse::<Role>()
        .map(|_| ())
        .map_err(|_| invalid("invalid_role", "Role must be either human or ghost"))
}

fn validate_coordinate(
    value: &str,
    bound: f64,
    code: &'static str,
    message: &'static str,
) -> Result<(), ValidationError> {
    match value.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && (-bound..=bound).contains(&v) => Ok(()),
        _ => Err(invalid(code, message)),
    }
}

/// Validates a latitude given as text, in [-90, 90]
pub fn validate_latitude(value: &str) -> Result<(), ValidationError> {
    validate_coordinate(value, 90.0, "invalid_latitude", "Invalid latitude")
}

/// Validates a longitude given as text, in [-180, 180]
pub fn validate_longitude(value: &str) -> Result<(), ValidationError> {
    validate_coordinate(value, 180.0, "invalid_longitude", "Invalid longitude")
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
}

/// Accept a coordinate sent either as a number or as numeric text
///
/// The value is kept as text so the same validators cover query, form and
/// JSON input. Anything that is neither a number nor a string is malformed.
pub fn number_or_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<NumberOrText>::deserialize(deserializer)?.map(|value| match value {
        NumberOrText::Number(n) => n.to_string(),
        NumberOrText::Text(s) => s,
    }))
}

fn is_form_encoded(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(|mime| mime.trim().eq_ignore_ascii_case("application/x-www-form-urlencoded"))
        .unwrap_or(false)
}

/// Body extractor that runs `Validate` before the handler sees the value
///
/// URL-encoded form bodies are read as forms; everything else must be JSON.
pub struct ValidJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let malformed = |detail: String| ApiError::MalformedRequest {
            location: "body",
            detail,
        };

        let value = if is_form_encoded(req.headers()) {
            let Form(value) = Form::<T>::from_request(req, state)
                .await
                .map_err(|rejection| malformed(rejection.body_text()))?;
            value
        } else {
            let Json(value) = Json::<T>::from_request(req, state)
                .await
                .map_err(|rejection| malformed(rejection.body_text()))?;
            value
        };

        value.validate()?;
        Ok(Self(value))
    }
}

/// Query string extractor that runs `Validate` before the handler sees the value
pub struct ValidQuery<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ValidQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::MalformedRequest {
                location: "query",
                detail: rejection.body_text(),
            })?;

        value.validate()?;
        Ok(Self(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_role() {
        assert!(validate_role("human").is_ok());
        assert!(validate_role("ghost").is_ok());

        let err = validate_role("zombie").unwrap_err();
        assert_eq!(err.message.as_deref(), Some("Role must be either human or ghost"));
    }

    #[test]
    fn test_validate_latitude_bounds() {
        assert!(validate_latitude("0").is_ok());
        assert!(validate_latitude("-90").is_ok());
        assert!(validate_latitude("90").is_ok());
        assert!(validate_latitude("51.5072").is_ok());
        assert!(validate_latitude("90.0001").is_err());
        assert!(validate_latitude("north").is_err());
        assert!(validate_latitude("NaN").is_err());
        assert!(validate_latitude("").is_err());
    }

    #[test]
    fn test_validate_longitude_bounds() {
        assert!(validate_longitude("-180").is_ok());
        assert!(validate_longitude("180").is_ok());
        assert!(validate_longitude("-0.1276").is_ok());
        assert!(validate_longitude("180.5").is_err());
        assert!(validate_longitude("inf").is_err());
    }

    #[derive(Debug, Deserialize)]
    struct Point {
        #[serde(default, deserialize_with = "number_or_text")]
        latitude: Option<String>,
    }

    #[test]
    fn test_coordinate_accepts_number_or_text() {
        let number: Point = serde_json::from_str(r#"{"latitude": 45}"#).unwrap();
        assert_eq!(number.latitude.as_deref(), Some("45"));

        let text: Point = serde_json::from_str(r#"{"latitude": "45.5"}"#).unwrap();
        assert_eq!(text.latitude.as_deref(), Some("45.5"));

        let absent: Point = serde_json::from_str("{}").unwrap();
        assert!(absent.latitude.is_none());

        let null: Point = serde_json::from_str(r#"{"latitude": null}"#).unwrap();
        assert!(null.latitude.is_none());

        assert!(serde_json::from_str::<Point>(r#"{"latitude": true}"#).is_err());
    }

    #[test]
    fn test_form_content_type_detection() {
        let mut headers = HeaderMap::new();
        assert!(!is_form_encoded(&headers));

        headers.insert(header::CONTENT_TYPE, "application/json".parse().unwrap());
        assert!(!is_form_encoded(&headers));

        headers.insert(
            header::CONTENT_TYPE,
            "Application/X-WWW-Form-Urlencoded; charset=utf-8".parse().unwrap(),
        );
        assert!(is_form_encoded(&headers));
    }
}
