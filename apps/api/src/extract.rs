use axum::extract::FromRequest;

use crate::errors::AppError;

/// `axum::Json` whose rejections (malformed body, wrong content type, body
/// over the route limit) render as the usual `AppError` envelope.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);
