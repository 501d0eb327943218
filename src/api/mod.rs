// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! HTTP routing.
//!
//! The public listing is mounted bare; every mutating or detail route is
//! wrapped per method with the auth guard carrying that route's required
//! capability, so a PATCH and a DELETE on the same path check different
//! permissions.

use axum::{
    extract::{Request, State},
    handler::Handler,
    middleware::{self, Next},
    routing::{get, patch},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::{guard, permissions},
    models::{CreateDrinkRequest, Drink, DrinkId, DrinkSummary, RecipeIngredient, UpdateDrinkRequest},
    state::AppState,
};

pub mod drinks;
pub mod health;

pub fn router(state: AppState) -> Router {
    let routes = Router::new()
        .route(
            "/drinks",
            get(drinks::list_drinks).post(drinks::create_drink.layer(
                middleware::from_fn_with_state(
                    state.clone(),
                    |State(state): State<AppState>, request: Request, next: Next| {
                        guard::require_permission(state, permissions::POST_DRINKS, request, next)
                    },
                ),
            )),
        )
        .route(
            "/drinks-detail",
            get(drinks::list_drinks_detail.layer(middleware::from_fn_with_state(
                state.clone(),
                |State(state): State<AppState>, request: Request, next: Next| {
                    guard::require_permission(state, permissions::GET_DRINKS_DETAIL, request, next)
                },
            ))),
        )
        .route(
            "/drinks/{drink_id}",
            patch(drinks::update_drink.layer(middleware::from_fn_with_state(
                state.clone(),
                |State(state): State<AppState>, request: Request, next: Next| {
                    guard::require_permission(state, permissions::PATCH_DRINKS, request, next)
                },
            )))
            .delete(drinks::delete_drink.layer(middleware::from_fn_with_state(
                state.clone(),
                |State(state): State<AppState>, request: Request, next: Next| {
                    guard::require_permission(state, permissions::DELETE_DRINKS, request, next)
                },
            ))),
        )
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .with_state(state);

    Router::new()
        .merge(routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        drinks::list_drinks,
        drinks::list_drinks_detail,
        drinks::create_drink,
        drinks::update_drink,
        drinks::delete_drink,
        health::health,
        health::liveness,
        health::readiness
    ),
    components(
        schemas(
            Drink,
            DrinkId,
            DrinkSummary,
            RecipeIngredient,
            CreateDrinkRequest,
            UpdateDrinkRequest,
            drinks::DrinkListResponse,
            drinks::DrinkDetailResponse,
            drinks::CreateDrinkResponse,
            drinks::UpdateDrinkResponse,
            drinks::DeleteDrinkResponse
        )
    ),
    tags(
        (name = "Drinks", description = "Drink catalog management"),
        (name = "Health", description = "Service health probes")
    )
)]
struct ApiDoc;
