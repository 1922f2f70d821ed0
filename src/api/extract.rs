use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};

use crate::error::AppError;

/// `Json` whose rejections come back as [`AppError`] in the response envelope
/// instead of axum's plain-text body.
pub struct AppJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for AppJson<T>
where
    Json<T>: FromRequest<S, Rejection = axum::extract::rejection::JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(AppJson(value))
    }
}
