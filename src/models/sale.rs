//! Sale model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::Timestamp;

/// Sale model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Sale {
    pub id: i64,
    pub book_id: i64,
    pub buyer_name: String,
    pub quantity: i64,
    /// Unit price at sale time times quantity
    pub total_price: f64,
    #[sqlx(try_from = "String")]
    #[schema(value_type = String, example = "2024-05-01 10:00:00")]
    pub sale_date: Timestamp,
}

/// Sale joined with the sold book's title
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct SaleDetails {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub sale: Sale,
    pub book_title: String,
}

/// Sale row about to be inserted
#[derive(Debug, Clone)]
pub struct NewSale {
    pub book_id: i64,
    pub buyer_name: String,
    pub quantity: i64,
    pub total_price: f64,
    pub sale_date: Timestamp,
}

/// Create sale request
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSale {
    #[validate(required, length(min = 1))]
    pub buyer_name: Option<String>,
    /// At most [`super::book::MAX_STOCK`]
    #[validate(required, range(min = 1, max = 1000000000))]
    pub quantity: Option<i64>,
}
