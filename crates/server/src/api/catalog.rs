use axum::{
  Json,
  extract::{Path, State},
};
use zara_core::Category;
use zara_shared::AppError;

use crate::utils::AppState;

/// All product categories, in display order
#[utoipa::path(
  get,
  path = "/api/v0/categories",
  responses(
    (status = 200, description = "Product categories", body = Vec<Category>)
  )
)]
#[axum::debug_handler]
pub async fn list_categories(State(state): State<AppState>) -> Json<Vec<Category>> {
  Json(state.catalog.categories().to_vec())
}

/// One category by slug
#[utoipa::path(
  get,
  path = "/api/v0/categories/{slug}",
  params(("slug" = String, Path, description = "Category slug")),
  responses(
    (status = 200, description = "Category", body = Category),
    (status = 404, description = "Unknown category")
  )
)]
#[axum::debug_handler]
pub async fn get_category(
  State(state): State<AppState>,
  Path(slug): Path<String>,
) -> Result<Json<Category>, AppError> {
  state
    .catalog
    .category(&slug)
    .cloned()
    .map(Json)
    .ok_or_else(|| AppError::not_found(format!("Unknown category {slug}")))
}
