//! Request extractors.

use axum::extract::FromRequest;

use crate::error::ApiError;

/// A JSON request body whose rejections answer as [`ApiError`], so a null or
/// malformed body is a 400 with the usual `{"error": ..}` shape.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);
