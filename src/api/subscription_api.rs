use actix_web::http::header;
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use serde::Deserialize;

use crate::auth::VerifyError;
use crate::data_structs::responses::subscription_response::{ErrorResponse, SubscriptionResponse};
use crate::SharedResources;

#[derive(Debug, Deserialize)]
pub struct SubscriptionQuery {
    #[serde(rename = "userId")]
    user_id: Option<String>,
}

/// Looks up the caller's subscription row, or an explicit null if they have
/// none. A bearer credential, when present, is a hard override: it must
/// verify, and the verified identity wins over any `userId` supplied
/// alongside it. Without a credential the `userId` query parameter is used
/// as-is, unauthenticated.
pub async fn subscription_info(
    data: web::Data<SharedResources>,
    req: HttpRequest,
    query: web::Query<SubscriptionQuery>,
) -> impl Responder {
    // Header presence selects the credential path, even when the value is
    // not clean UTF-8; an undecodable token simply fails verification.
    let credential = req.headers().get(header::AUTHORIZATION).map(|value| {
        let value = String::from_utf8_lossy(value.as_bytes());
        match value.strip_prefix("Bearer ") {
            Some(token) => token.to_string(),
            None => value.into_owned(),
        }
    });

    let user_id = if let Some(token) = credential {
        match data.verifier.verify(&token).await {
            Ok(identity) => identity.id,
            Err(VerifyError::Rejected) => {
                return HttpResponse::Unauthorized().json(ErrorResponse::new("Unauthorized"));
            }
            Err(err) => {
                log::error!("Identity verification failed: {}", err);
                return HttpResponse::InternalServerError()
                    .json(ErrorResponse::new(err.to_string()));
            }
        }
    } else {
        match query.into_inner().user_id.filter(|id| !id.is_empty()) {
            Some(id) => id,
            None => {
                return HttpResponse::BadRequest()
                    .json(ErrorResponse::new("Missing userId parameter"));
            }
        }
    };

    match data.store.subscription_for_user(&user_id).await {
        Ok(subscription) => HttpResponse::Ok().json(SubscriptionResponse { subscription }),
        Err(err) => {
            log::error!("Subscription lookup failed for {}: {}", user_id, err);
            HttpResponse::InternalServerError().json(ErrorResponse::new(err.to_string()))
        }
    }
}

pub async fn method_not_allowed() -> impl Responder {
    HttpResponse::MethodNotAllowed().json(ErrorResponse::new("Method not allowed"))
}
