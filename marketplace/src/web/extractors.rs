// marketplace/src/web/extractors.rs

use actix_web::http::header::AUTHORIZATION;
use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;
use tracing::{debug, warn};

use crate::errors::AppError;
use crate::models::User;
use crate::services::auth_service::{token_from_header, Principal};
use crate::state::AppState;

/// The requesting user, resolved from the `Authorization` header.
/// Extraction fails with `AppError::Unauthenticated` (401).
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
  pub principal: Principal,
  pub user: User,
}

impl FromRequest for AuthenticatedUser {
  type Error = AppError;
  type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    let app_state = req.app_data::<web::Data<AppState>>().cloned();
    let token = req
      .headers()
      .get(AUTHORIZATION)
      .and_then(|value| value.to_str().ok())
      .and_then(token_from_header)
      .map(str::to_string);

    Box::pin(async move {
      let app_state = app_state.ok_or_else(|| AppError::Internal("AppState is not registered.".to_string()))?;
      let Some(token) = token else {
        debug!("Request carries no usable Authorization header.");
        return Err(AppError::Unauthenticated);
      };
      match app_state.authenticator.authenticate(&token).await? {
        Some(user) => Ok(AuthenticatedUser {
          principal: Principal::from(&user),
          user,
        }),
        None => {
          warn!("Authorization token matched no user.");
          Err(AppError::Unauthenticated)
        }
      }
    })
  }
}
