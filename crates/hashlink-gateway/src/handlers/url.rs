use crate::error::{AppError, Result};
use crate::model::{CreateUrlRequest, CreateUrlResponse};
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use hashlink_core::{ShortCode, ShortenerError};

/// Turns a path segment into a code; an empty segment names no mapping.
fn path_code(raw: String) -> Result<ShortCode> {
    ShortCode::new(raw).ok_or_else(|| ShortenerError::NotFound(String::new()).into())
}

pub async fn create_url_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CreateUrlRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateUrlResponse>)> {
    let Json(request) = payload?;

    let code = state.shortener().shorten(&request.url).await?;

    let response = CreateUrlResponse {
        shortened_url: state.short_url(&code),
        long_url: request.url,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn redirect_handler(
    State(state): State<AppState>,
    Path(short_code): Path<String>,
) -> Result<Response> {
    let code = path_code(short_code)?;
    let url = state.shortener().resolve(&code).await?;

    let location = HeaderValue::from_str(&url).map_err(|_| AppError::InvalidTarget(url.clone()))?;
    Ok((StatusCode::TEMPORARY_REDIRECT, [(header::LOCATION, location)]).into_response())
}

pub async fn delete_url_handler(
    State(state): State<AppState>,
    Path(short_code): Path<String>,
) -> Result<(StatusCode, &'static str)> {
    let code = path_code(short_code)?;
    state.shortener().delete(&code).await?;
    Ok((StatusCode::OK, "deleted"))
}
