//! Order API Handlers
//!
//! Thin translation between HTTP and the order service; every rule lives in
//! the service.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use shared::{ApiResponse, Comment, ServiceItem};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{CreateOrderRequest, Order, OrderStatusView, UpdateOrderRequest};
use crate::db::repository::OrderRepository;
use crate::orders::{OrderListQuery, OrderService, OrderStateStats};
use crate::utils::AppResult;

fn service(state: &ServerState) -> OrderService {
    OrderService::new(OrderRepository::new(state.db.clone()))
}

/// Create a new order
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<CreateOrderRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Order>>)> {
    let order = service(&state).create(&user, payload).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(order))))
}

/// List the caller's orders (filtered, sorted, paginated)
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<ApiResponse<Vec<Order>>>> {
    let page = service(&state).list(&user, query).await?;
    Ok(Json(ApiResponse::ok_paginated(page.data, page.pagination)))
}

/// Get order by id
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let order = service(&state).get(&user, &id).await?;
    Ok(Json(ApiResponse::ok(order)))
}

/// Get the workflow-position projection of an order
pub async fn get_status(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<OrderStatusView>>> {
    let status = service(&state).get_status(&user, &id).await?;
    Ok(Json(ApiResponse::ok(status)))
}

/// Update descriptive fields of an order
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<UpdateOrderRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let order = service(&state).update(&user, &id, payload).await?;
    Ok(Json(ApiResponse::ok(order)))
}

/// Soft-delete an order
pub async fn delete(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    service(&state).delete(&user, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Advance the order to its next workflow state
pub async fn advance(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let order = service(&state).advance(&user, &id).await?;
    Ok(Json(ApiResponse::ok(order)))
}

/// Append a service line item to an order
pub async fn add_service(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<ServiceItem>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let order = service(&state).add_service(&user, &id, payload).await?;
    Ok(Json(ApiResponse::ok(order)))
}

/// Append a comment to an order
pub async fn add_comment(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<Comment>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let order = service(&state).add_comment(&user, &id, payload).await?;
    Ok(Json(ApiResponse::ok(order)))
}

/// Per-state order counts and value totals for the caller
pub async fn stats(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<ApiResponse<Vec<OrderStateStats>>>> {
    let stats = service(&state).stats(&user).await?;
    Ok(Json(ApiResponse::ok(stats)))
}
