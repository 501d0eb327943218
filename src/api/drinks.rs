// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Drink catalog endpoints.
//!
//! Success envelopes follow the demo client's contract: every body carries
//! `success: true` plus the operation's payload key. POST wraps the created
//! drink in a single-element list under `drink`; PATCH wraps the updated
//! drink under `drinks`.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    auth::Auth,
    error::ApiError,
    models::{CreateDrinkRequest, Drink, DrinkId, DrinkSummary, UpdateDrinkRequest},
    state::AppState,
};

/// Response for the public drink listing.
#[derive(Debug, Serialize, ToSchema)]
pub struct DrinkListResponse {
    pub success: bool,
    /// Summary views, in id order.
    pub drinks: Vec<DrinkSummary>,
}

/// Response for the authenticated detail listing.
#[derive(Debug, Serialize, ToSchema)]
pub struct DrinkDetailResponse {
    pub success: bool,
    /// Full views, in id order.
    pub drinks: Vec<Drink>,
}

/// Response for drink creation.
#[derive(Debug, Serialize, ToSchema)]
pub struct CreateDrinkResponse {
    pub success: bool,
    /// The created drink, as a single-element list.
    pub drink: Vec<Drink>,
}

/// Response for drink update.
#[derive(Debug, Serialize, ToSchema)]
pub struct UpdateDrinkResponse {
    pub success: bool,
    /// The updated drink, as a single-element list.
    pub drinks: Vec<Drink>,
}

/// Response for drink deletion.
#[derive(Debug, Serialize, ToSchema)]
pub struct DeleteDrinkResponse {
    pub success: bool,
    /// Id of the deleted drink.
    pub delete: DrinkId,
}

/// List drinks in the public summary view. No authentication required.
#[utoipa::path(
    get,
    path = "/drinks",
    tag = "Drinks",
    responses((status = 200, description = "Summary listing", body = DrinkListResponse))
)]
pub async fn list_drinks(
    State(state): State<AppState>,
) -> Result<Json<DrinkListResponse>, ApiError> {
    let drinks = state.store.list()?;
    Ok(Json(DrinkListResponse {
        success: true,
        drinks: drinks.iter().map(Drink::summary).collect(),
    }))
}

/// List drinks with full recipe detail. Requires `get:drinks-detail`.
#[utoipa::path(
    get,
    path = "/drinks-detail",
    tag = "Drinks",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Detail listing", body = DrinkDetailResponse),
        (status = 401, description = "Unauthorized"),
    )
)]
pub async fn list_drinks_detail(
    State(state): State<AppState>,
    Auth(_claims): Auth,
) -> Result<Json<DrinkDetailResponse>, ApiError> {
    let drinks = state.store.list()?;
    Ok(Json(DrinkDetailResponse {
        success: true,
        drinks,
    }))
}

/// Create a drink. Requires `post:drinks`.
#[utoipa::path(
    post,
    path = "/drinks",
    tag = "Drinks",
    security(("bearer" = [])),
    request_body = CreateDrinkRequest,
    responses(
        (status = 200, description = "Created drink", body = CreateDrinkResponse),
        (status = 401, description = "Unauthorized"),
        (status = 422, description = "Malformed body"),
    )
)]
pub async fn create_drink(
    State(state): State<AppState>,
    Auth(claims): Auth,
    payload: Result<Json<CreateDrinkRequest>, JsonRejection>,
) -> Result<Json<CreateDrinkResponse>, ApiError> {
    let Json(request) = payload.map_err(|err| {
        tracing::warn!(error = %err, "rejected malformed drink body");
        ApiError::unprocessable()
    })?;

    if request.title.trim().is_empty() || request.recipe.is_empty() {
        return Err(ApiError::unprocessable());
    }

    let drink = state.store.insert(request.title, request.recipe)?;
    tracing::info!(subject = %claims.sub, id = %drink.id, "created drink");

    Ok(Json(CreateDrinkResponse {
        success: true,
        drink: vec![drink],
    }))
}

/// Update a drink's title and/or recipe. Requires `patch:drinks`.
#[utoipa::path(
    patch,
    path = "/drinks/{drink_id}",
    tag = "Drinks",
    security(("bearer" = [])),
    params(("drink_id" = i64, Path, description = "Id of the drink to update")),
    request_body = UpdateDrinkRequest,
    responses(
        (status = 200, description = "Updated drink", body = UpdateDrinkResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "No drink with this id"),
        (status = 422, description = "Malformed body"),
    )
)]
pub async fn update_drink(
    State(state): State<AppState>,
    Auth(claims): Auth,
    Path(drink_id): Path<DrinkId>,
    payload: Result<Json<UpdateDrinkRequest>, JsonRejection>,
) -> Result<Json<UpdateDrinkResponse>, ApiError> {
    let Json(request) = payload.map_err(|err| {
        tracing::warn!(error = %err, "rejected malformed drink body");
        ApiError::unprocessable()
    })?;

    // A body changing nothing is a client error, not a no-op.
    if request.title.is_none() && request.recipe.is_none() {
        return Err(ApiError::unprocessable());
    }
    if request.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
        return Err(ApiError::unprocessable());
    }

    let drink = state.store.update(drink_id, request.title, request.recipe)?;
    tracing::info!(subject = %claims.sub, id = %drink.id, "updated drink");

    Ok(Json(UpdateDrinkResponse {
        success: true,
        drinks: vec![drink],
    }))
}

/// Delete a drink. Requires `delete:drinks`.
#[utoipa::path(
    delete,
    path = "/drinks/{drink_id}",
    tag = "Drinks",
    security(("bearer" = [])),
    params(("drink_id" = i64, Path, description = "Id of the drink to delete")),
    responses(
        (status = 200, description = "Deleted drink id", body = DeleteDrinkResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "No drink with this id"),
    )
)]
pub async fn delete_drink(
    State(state): State<AppState>,
    Auth(claims): Auth,
    Path(drink_id): Path<DrinkId>,
) -> Result<Json<DeleteDrinkResponse>, ApiError> {
    state.store.delete(drink_id)?;
    tracing::info!(subject = %claims.sub, id = %drink_id, "deleted drink");

    Ok(Json(DeleteDrinkResponse {
        success: true,
        delete: drink_id,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::http::StatusCode;
    use jsonwebtoken::jwk::JwkSet;
    use jsonwebtoken::Algorithm;
    use tempfile::TempDir;

    use crate::auth::jwks::JwksManager;
    use crate::auth::{AuthClaims, TokenVerifier};
    use crate::models::RecipeIngredient;

    fn test_state() -> (AppState, TempDir) {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let store = crate::store::DrinkStore::open(&dir.path().join("drinks.redb"))
            .expect("Failed to open store");
        let jwks: JwkSet = serde_json::from_value(serde_json::json!({
            "keys": [{"kty": "oct", "kid": "menu-key", "alg": "HS256", "k": "c2VjcmV0"}]
        }))
        .unwrap();
        let verifier = TokenVerifier::new(
            JwksManager::from_set(jwks),
            "https://coffee.example.com/",
            None,
            vec![Algorithm::HS256],
        );
        (AppState::new(store, verifier), dir)
    }

    fn manager() -> Auth {
        Auth(AuthClaims {
            sub: "auth0|manager".to_string(),
            permissions: Some(vec![
                "get:drinks-detail".to_string(),
                "post:drinks".to_string(),
                "patch:drinks".to_string(),
                "delete:drinks".to_string(),
            ]),
            issuer: "https://coffee.example.com/".to_string(),
            audience: None,
            expires_at: 0,
        })
    }

    fn flat_white() -> CreateDrinkRequest {
        CreateDrinkRequest {
            title: "Flat White".to_string(),
            recipe: vec![
                RecipeIngredient {
                    color: "brown".into(),
                    name: "espresso".into(),
                    parts: 1,
                },
                RecipeIngredient {
                    color: "white".into(),
                    name: "steamed milk".into(),
                    parts: 2,
                },
            ],
        }
    }

    #[tokio::test]
    async fn create_then_detail_round_trips() {
        let (state, _dir) = test_state();
        let request = flat_white();

        let Json(created) = create_drink(
            State(state.clone()),
            manager(),
            Ok(Json(request.clone())),
        )
        .await
        .expect("create succeeds");

        assert!(created.success);
        assert_eq!(created.drink.len(), 1);
        assert_eq!(created.drink[0].title, request.title);
        assert_eq!(created.drink[0].recipe, request.recipe);

        let Json(detail) = list_drinks_detail(State(state), manager())
            .await
            .expect("detail listing succeeds");
        assert_eq!(detail.drinks, created.drink);
    }

    #[tokio::test]
    async fn public_listing_has_no_recipe_key() {
        let (state, _dir) = test_state();
        create_drink(State(state.clone()), manager(), Ok(Json(flat_white())))
            .await
            .unwrap();

        let Json(listing) = list_drinks(State(state)).await.unwrap();
        assert!(listing.success);

        let json = serde_json::to_value(&listing).unwrap();
        for drink in json["drinks"].as_array().unwrap() {
            assert!(drink.get("recipe").is_none());
            assert!(drink.get("id").is_some());
            assert!(drink.get("title").is_some());
        }
    }

    #[tokio::test]
    async fn create_rejects_empty_title() {
        let (state, _dir) = test_state();
        let mut request = flat_white();
        request.title = "  ".to_string();

        let err = create_drink(State(state), manager(), Ok(Json(request)))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn update_missing_id_is_404() {
        let (state, _dir) = test_state();
        let body = UpdateDrinkRequest {
            title: Some("Cortado".to_string()),
            recipe: None,
        };

        let err = update_drink(
            State(state),
            manager(),
            Path(DrinkId(999_999)),
            Ok(Json(body)),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn update_with_empty_body_is_unprocessable() {
        let (state, _dir) = test_state();
        let Json(created) = create_drink(State(state.clone()), manager(), Ok(Json(flat_white())))
            .await
            .unwrap();

        let err = update_drink(
            State(state),
            manager(),
            Path(created.drink[0].id),
            Ok(Json(UpdateDrinkRequest {
                title: None,
                recipe: None,
            })),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn update_changes_title_and_wraps_in_list() {
        let (state, _dir) = test_state();
        let Json(created) = create_drink(State(state.clone()), manager(), Ok(Json(flat_white())))
            .await
            .unwrap();
        let id = created.drink[0].id;

        let Json(updated) = update_drink(
            State(state),
            manager(),
            Path(id),
            Ok(Json(UpdateDrinkRequest {
                title: Some("Magic".to_string()),
                recipe: None,
            })),
        )
        .await
        .unwrap();

        assert!(updated.success);
        assert_eq!(updated.drinks.len(), 1);
        assert_eq!(updated.drinks[0].title, "Magic");
        assert_eq!(updated.drinks[0].recipe, flat_white().recipe);
    }

    #[tokio::test]
    async fn delete_returns_id_then_404_on_repeat() {
        let (state, _dir) = test_state();
        let Json(created) = create_drink(State(state.clone()), manager(), Ok(Json(flat_white())))
            .await
            .unwrap();
        let id = created.drink[0].id;

        let Json(deleted) = delete_drink(State(state.clone()), manager(), Path(id))
            .await
            .expect("first delete succeeds");
        assert!(deleted.success);
        assert_eq!(deleted.delete, id);

        let err = delete_drink(State(state), manager(), Path(id))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }
}
