//! Category list and categorization preview

use axum::{extract::Query, Json};
use serde::{Deserialize, Serialize};

use budgethub_core::{categorize_transaction, Category};

#[derive(Serialize)]
pub struct CategoryListResponse {
    pub categories: Vec<&'static str>,
}

#[derive(Debug, Deserialize)]
pub struct CategorizeQuery {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub amount: f64,
}

#[derive(Serialize)]
pub struct CategorizeResponse {
    pub category: Category,
}

/// GET /api/categories - The fixed category list
pub async fn list_categories() -> Json<CategoryListResponse> {
    Json(CategoryListResponse {
        categories: Category::ALL.iter().map(|c| c.as_str()).collect(),
    })
}

/// GET /api/categorize - Suggest a category for a description
pub async fn categorize(Query(params): Query<CategorizeQuery>) -> Json<CategorizeResponse> {
    Json(CategorizeResponse {
        category: categorize_transaction(&params.description, params.amount),
    })
}
