use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use serde_json::json;

use crate::api::error::ApiResult;
use crate::api::extract::{Json, Path};
use crate::auth::{AdminUser, AuthUser};
use crate::services::store_service::{self, PlanInput, ProductInput, SaleLine};

#[derive(Deserialize)]
pub struct SubscribeRequest {
    plan_id: i32,
}

#[derive(Deserialize)]
pub struct SaleRequest {
    items: Vec<SaleLine>,
}

// Plans

pub async fn list_plans(State(db): State<DatabaseConnection>) -> ApiResult<impl IntoResponse> {
    Ok(Json(store_service::list_plans(&db).await?))
}

pub async fn create_plan(
    State(db): State<DatabaseConnection>,
    _admin: AdminUser,
    Json(input): Json<PlanInput>,
) -> ApiResult<impl IntoResponse> {
    let plan = store_service::create_plan(&db, input).await?;
    Ok((StatusCode::CREATED, Json(plan)))
}

pub async fn update_plan(
    State(db): State<DatabaseConnection>,
    _admin: AdminUser,
    Path(id): Path<i32>,
    Json(input): Json<PlanInput>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(store_service::update_plan(&db, id, input).await?))
}

pub async fn delete_plan(
    State(db): State<DatabaseConnection>,
    _admin: AdminUser,
    Path(id): Path<i32>,
) -> ApiResult<impl IntoResponse> {
    store_service::delete_plan(&db, id).await?;
    Ok(Json(json!({ "message": "Plan deleted" })))
}

// Subscriptions

#[utoipa::path(
    post,
    path = "/api/store/subscribe",
    responses(
        (status = 201, description = "Subscription started; any running one is closed"),
        (status = 404, description = "Plan not found")
    )
)]
pub async fn subscribe(
    State(db): State<DatabaseConnection>,
    auth: AuthUser,
    Json(payload): Json<SubscribeRequest>,
) -> ApiResult<impl IntoResponse> {
    let subscription = store_service::subscribe(&db, auth.id, payload.plan_id).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Subscription activated",
            "id": subscription.id,
            "start_date": subscription.start_date,
            "end_date": subscription.end_date,
        })),
    ))
}

pub async fn check_subscription(
    State(db): State<DatabaseConnection>,
    auth: AuthUser,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(store_service::subscription_status(&db, auth.id).await?))
}

// Products

pub async fn list_products(State(db): State<DatabaseConnection>) -> ApiResult<impl IntoResponse> {
    Ok(Json(store_service::list_products(&db).await?))
}

pub async fn get_product(
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(store_service::get_product(&db, id).await?))
}

pub async fn create_product(
    State(db): State<DatabaseConnection>,
    _admin: AdminUser,
    Json(input): Json<ProductInput>,
) -> ApiResult<impl IntoResponse> {
    let product = store_service::create_product(&db, input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn update_product(
    State(db): State<DatabaseConnection>,
    _admin: AdminUser,
    Path(id): Path<i32>,
    Json(input): Json<ProductInput>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(store_service::update_product(&db, id, input).await?))
}

pub async fn delete_product(
    State(db): State<DatabaseConnection>,
    _admin: AdminUser,
    Path(id): Path<i32>,
) -> ApiResult<impl IntoResponse> {
    store_service::delete_product(&db, id).await?;
    Ok(Json(json!({ "message": "Product deleted" })))
}

// Sales

#[utoipa::path(
    post,
    path = "/api/store/sales",
    responses(
        (status = 201, description = "Sale recorded at catalog prices"),
        (status = 409, description = "A cart price no longer matches the catalog")
    )
)]
pub async fn create_sale(
    State(db): State<DatabaseConnection>,
    auth: AuthUser,
    Json(payload): Json<SaleRequest>,
) -> ApiResult<impl IntoResponse> {
    let sale = store_service::create_sale(&db, auth.id, payload.items).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Purchase completed",
            "sale_id": sale.id,
            "total": sale.total,
        })),
    ))
}

pub async fn my_sales(
    State(db): State<DatabaseConnection>,
    auth: AuthUser,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(store_service::sales_for_user(&db, auth.id).await?))
}
