use actix_web::{http::StatusCode, web, HttpResponse, Responder};
use uuid::Uuid;
use validator::Validate;

use crate::models::{
    CreateSubscriptionRequest, ErrorResponse, ListSubscriptionsQuery, SubscriptionFilter,
    SubscriptionSumQuery, SubscriptionSumResponse, UpdateSubscriptionRequest, UpdateSubscriptionResponse,
};
use crate::routes::AppState;
use crate::services::SubscriptionError;

/// Configure all subscription routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .service(
            web::resource("/subs")
                .route(web::post().to(create_subscription))
                .route(web::get().to(list_subscriptions)),
        )
        .service(
            web::resource("/subs/{id}")
                .route(web::get().to(get_subscription))
                .route(web::patch().to(update_subscription))
                .route(web::delete().to(delete_subscription)),
        )
        .route("/subs-sum", web::get().to(get_subscriptions_sum));
}

fn validation_failed(errors: validator::ValidationErrors) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: "Validation failed".to_string(),
        message: errors.to_string(),
        status_code: 400,
    })
}

fn error_response(err: SubscriptionError) -> HttpResponse {
    let status_code = err.status_code();
    let error = match &err {
        SubscriptionError::Validation(_) => "Validation failed",
        SubscriptionError::NotFound(_) => "Subscription not found",
        SubscriptionError::Storage(e) => {
            tracing::error!("Storage failure: {}", e);
            "Internal error"
        }
    };

    HttpResponse::build(StatusCode::from_u16(status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR))
        .json(ErrorResponse {
            error: error.to_string(),
            message: err.to_string(),
            status_code,
        })
}

/// Create subscription endpoint
///
/// POST /api/v1/subs
///
/// Request body:
/// ```json
/// {
///   "service_name": "Yandex Plus",
///   "price": 400,
///   "user_id": "60601fee-2bf1-4721-ae6f-7636e79a0cba",
///   "start_date": "07-2025",
///   "end_date": "08-2025"
/// }
/// ```
async fn create_subscription(
    state: web::Data<AppState>,
    req: web::Json<CreateSubscriptionRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for create request: {}", errors);
        return validation_failed(errors);
    }

    match state.subscriptions.create(req.into_inner()).await {
        Ok(subscription) => HttpResponse::Created().json(subscription),
        Err(e) => error_response(e),
    }
}

/// Get subscription endpoint
///
/// GET /api/v1/subs/{id}
async fn get_subscription(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> impl Responder {
    match state.subscriptions.get(path.into_inner()).await {
        Ok(subscription) => HttpResponse::Ok().json(subscription),
        Err(e) => error_response(e),
    }
}

/// Partial update endpoint
///
/// PATCH /api/v1/subs/{id}
///
/// Only keys present in the body are applied. `"end_date": null` makes the
/// subscription open-ended.
async fn update_subscription(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    req: web::Json<UpdateSubscriptionRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for update request: {}", errors);
        return validation_failed(errors);
    }

    match state.subscriptions.update(path.into_inner(), req.into_inner()).await {
        Ok(outcome) => HttpResponse::Ok().json(UpdateSubscriptionResponse {
            data: outcome.subscription,
            changed_fields: outcome.changed,
        }),
        Err(e) => error_response(e),
    }
}

/// Delete subscription endpoint
///
/// DELETE /api/v1/subs/{id}
async fn delete_subscription(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> impl Responder {
    match state.subscriptions.delete(path.into_inner()).await {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => error_response(e),
    }
}

/// List subscriptions endpoint
///
/// GET /api/v1/subs?page={page}&limit={limit}
async fn list_subscriptions(
    state: web::Data<AppState>,
    query: web::Query<ListSubscriptionsQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        return validation_failed(errors);
    }

    match state.subscriptions.list(query.page, query.limit).await {
        Ok(list) => HttpResponse::Ok().json(list),
        Err(e) => error_response(e),
    }
}

/// Aggregate price endpoint
///
/// GET /api/v1/subs-sum?service_name=&user_id=&start_date=MM-YYYY&end_date=MM-YYYY
///
/// Sums the prices of all subscriptions whose active period overlaps the
/// requested window and that match the user and service filters.
async fn get_subscriptions_sum(
    state: web::Data<AppState>,
    query: web::Query<SubscriptionSumQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        return validation_failed(errors);
    }

    let filter = SubscriptionFilter::from(query.into_inner());

    match state.subscriptions.sum(&filter).await {
        Ok(sum) => HttpResponse::Ok().json(SubscriptionSumResponse { filter, sum }),
        Err(e) => error_response(e),
    }
}
