use std::collections::HashMap;

use axum::{
    async_trait,
    body::{Body, Bytes},
    extract::{FromRequest, FromRequestParts, Query, RawPathParams, Request, State},
    http::{header::CONTENT_LENGTH, request::Parts, StatusCode},
    middleware::Next,
    response::Response,
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::warn;

use crate::error::ApiError;
use crate::validation::{validate, FieldError, RequestSchema, Schema, ValidationError};

/// Coerced request fragments, present once `validate_request` has accepted
/// the request. Fragments a route does not declare are empty.
#[derive(Debug, Clone, Default)]
pub struct Validated {
    pub body: Map<String, Value>,
    pub params: Map<String, Value>,
    pub query: Map<String, Value>,
}

impl Validated {
    pub fn body_as<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        decode(&self.body)
    }

    pub fn params_as<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        decode(&self.params)
    }

    pub fn query_as<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        decode(&self.query)
    }
}

fn decode<T: DeserializeOwned>(fragment: &Map<String, Value>) -> Result<T, ApiError> {
    serde_json::from_value(Value::Object(fragment.clone())).map_err(|e| {
        // schema and handler type disagree
        tracing::error!("Validated input does not fit handler type: {}", e);
        ApiError::internal_server_error("Failed to read validated input")
    })
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for Validated {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<Validated>().cloned().ok_or_else(|| {
            tracing::error!("Route is missing its validation layer");
            ApiError::internal_server_error("Request was not validated")
        })
    }
}

/// Route-level middleware validating the fragments named by `schema`.
///
/// Every failing field across params, query and body is reported in one 400
/// response. On success the body is replaced by its coerced form and a
/// [`Validated`] extension is added to the request.
pub async fn validate_request(
    State(schema): State<RequestSchema>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let (mut parts, body) = request.into_parts();
    let mut validated = Validated::default();
    let mut errors: Vec<FieldError> = Vec::new();

    if let Some(params_schema) = &schema.params {
        let raw = match RawPathParams::from_request_parts(&mut parts, &()).await {
            Ok(params) => params
                .iter()
                .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
                .collect(),
            Err(_) => Map::new(),
        };
        collect(params_schema, &Value::Object(raw), "params", &mut validated.params, &mut errors);
    }

    if let Some(query_schema) = &schema.query {
        match Query::<HashMap<String, String>>::try_from_uri(&parts.uri) {
            Ok(Query(pairs)) => {
                let raw = pairs.into_iter().map(|(k, v)| (k, Value::String(v))).collect();
                collect(query_schema, &Value::Object(raw), "query", &mut validated.query, &mut errors);
            }
            Err(_) => errors.push(located("query", "query", "is not a valid query string")),
        }
    }

    let body = match &schema.body {
        Some(body_schema) => {
            let bytes = buffer_body(&parts, body).await?;

            match parse_body(&bytes) {
                Ok(raw) => collect(body_schema, &raw, "body", &mut validated.body, &mut errors),
                Err(reason) => errors.push(located("body", "body", reason)),
            }

            let coerced = serde_json::to_vec(&Value::Object(validated.body.clone()))
                .map_err(|_| ApiError::internal_server_error("Failed to re-encode request body"))?;
            parts.headers.remove(CONTENT_LENGTH);
            Body::from(coerced)
        }
        None => body,
    };

    if !errors.is_empty() {
        warn!(
            method = %parts.method,
            uri = %parts.uri,
            failures = errors.len(),
            "request validation failed"
        );
        return Err(ValidationError { errors }.into());
    }

    parts.extensions.insert(validated);
    Ok(next.run(Request::from_parts(parts, body)).await)
}

/// Buffer the body under the router's size limit
async fn buffer_body(parts: &Parts, body: Body) -> Result<Bytes, ApiError> {
    let mut request = Request::new(body);
    *request.extensions_mut() = parts.extensions.clone();
    Bytes::from_request(request, &()).await.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::payload_too_large("Request body exceeds the size limit")
        } else {
            ApiError::bad_request("Failed to read request body")
        }
    })
}

fn parse_body(bytes: &[u8]) -> Result<Value, &'static str> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    match serde_json::from_slice::<Value>(bytes) {
        Ok(value @ (Value::Object(_) | Value::Null)) => Ok(value),
        Ok(_) => Err("must be a JSON object"),
        Err(_) => Err("must be valid JSON"),
    }
}

fn collect(
    schema: &Schema,
    raw: &Value,
    location: &'static str,
    out: &mut Map<String, Value>,
    errors: &mut Vec<FieldError>,
) {
    match validate(schema, raw) {
        Ok(coerced) => *out = coerced,
        Err(err) => errors.extend(err.at(location).errors),
    }
}

fn located(location: &'static str, field: &str, reason: &str) -> FieldError {
    let mut err = FieldError::new(field, reason);
    err.location = Some(location);
    err
}
