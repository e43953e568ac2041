//! Order endpoints: creation, read-back, and the status transitions the
//! payment and delivery collaborators drive.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use medirush_core::{DeliveryPricing, NewOrder, Order, OrderItem, OrderStatus};
use medirush_db::Database;

use crate::error::ApiError;

/// Shared application state accessible from all handlers.
pub struct AppState {
    pub db: Database,
    pub delivery: DeliveryPricing,
}

// -- Response types --

/// The order breakdown returned on creation and after transitions.
#[derive(Debug, Clone, Serialize)]
pub struct OrderSummary {
    pub id: String,
    pub order_number: String,
    pub status: OrderStatus,
    pub subtotal_paise: i64,
    pub quantity_discount_paise: i64,
    pub distance_km: Option<f64>,
    pub distance_surcharge_paise: i64,
    pub express_charge_paise: i64,
    pub total_paise: i64,
    pub is_express: bool,
}

impl From<&Order> for OrderSummary {
    fn from(order: &Order) -> Self {
        OrderSummary {
            id: order.id.clone(),
            order_number: order.order_number.clone(),
            status: order.status,
            subtotal_paise: order.subtotal_paise,
            quantity_discount_paise: order.quantity_discount_paise,
            distance_km: order.distance_km,
            distance_surcharge_paise: order.distance_surcharge_paise,
            express_charge_paise: order.express_charge_paise,
            total_paise: order.total_paise,
            is_express: order.is_express,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateOrderResponse {
    pub order_number: String,
    pub order: OrderSummary,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderDetailsResponse {
    pub order: Order,
    pub items: Vec<OrderItem>,
    pub pharmacy: PharmacyInfo,
}

#[derive(Debug, Clone, Serialize)]
pub struct PharmacyInfo {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
}

// -- Request types --

#[derive(Debug, Clone, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: OrderStatus,
}

// -- Handlers --

/// POST /orders — create an order as one atomic unit of work.
#[tracing::instrument(skip(state, req))]
pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(req): Json<NewOrder>,
) -> Result<(StatusCode, Json<CreateOrderResponse>), ApiError> {
    let created = state.db.orders().create(&req, &state.delivery).await?;

    let response = CreateOrderResponse {
        order_number: created.order.order_number.clone(),
        order: OrderSummary::from(&created.order),
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /orders/{id} — read an order back with items and pharmacy display
/// fields.
#[tracing::instrument(skip(state))]
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<OrderDetailsResponse>, ApiError> {
    let details = state
        .db
        .orders()
        .get_with_items(&id)
        .await
        .map_err(ApiError::from)?
        .ok_or_else(|| ApiError::not_found("Order", &id))?;

    Ok(Json(OrderDetailsResponse {
        order: details.order,
        items: details.items,
        pharmacy: PharmacyInfo {
            name: details.pharmacy_name,
            lat: details.pharmacy_lat,
            lng: details.pharmacy_lng,
        },
    }))
}

/// POST /orders/{id}/pay — payment confirmed downstream; move the order to
/// `paid`.
#[tracing::instrument(skip(state))]
pub async fn pay(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<OrderSummary>, ApiError> {
    let order = state.db.orders().transition(&id, OrderStatus::Paid).await?;

    Ok(Json(OrderSummary::from(&order)))
}

/// PUT /orders/{id}/status — delivery-side transitions
/// (out_for_delivery, delivered, cancelled), guarded by the lifecycle.
#[tracing::instrument(skip(state, req))]
pub async fn update_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<StatusUpdateRequest>,
) -> Result<Json<OrderSummary>, ApiError> {
    let order = state.db.orders().transition(&id, req.status).await?;

    Ok(Json(OrderSummary::from(&order)))
}
