//! Book model, listing filters and request payloads

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

/// Upper bound for a book's stock and for any single stock movement.
///
/// Keeps `stock + delta` inside `i64` on every engine.
pub const MAX_STOCK: i64 = 1_000_000_000;

/// Book model from database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub year: i64,
    /// Copies on hand; never negative
    pub stock: i64,
    pub price: f64,
}

/// Create/update book request.
///
/// Omitted `stock` and `price` are stored as 0, on update as well as on create.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct BookInput {
    #[validate(required, length(min = 1))]
    pub title: Option<String>,
    #[validate(required, length(min = 1))]
    pub author: Option<String>,
    #[validate(required)]
    pub year: Option<i64>,
    #[validate(range(min = 0, max = 1000000000))]
    pub stock: Option<i64>,
    #[validate(range(min = 0.0))]
    pub price: Option<f64>,
}

/// Validated book fields ready to be written
#[derive(Debug, Clone, PartialEq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub year: i64,
    pub stock: i64,
    pub price: f64,
}

impl BookInput {
    /// Fill defaults; call only after `validate()` succeeded
    pub fn into_new_book(self) -> Option<NewBook> {
        Some(NewBook {
            title: self.title?,
            author: self.author?,
            year: self.year?,
            stock: self.stock.unwrap_or(0),
            price: self.price.unwrap_or(0.0),
        })
    }
}

/// Stock adjustment request (`delta` may be negative)
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct StockAdjustment {
    #[validate(custom(function = "validate_delta"))]
    pub delta: i64,
}

fn validate_delta(delta: i64) -> Result<(), ValidationError> {
    if (-MAX_STOCK..=MAX_STOCK).contains(&delta) {
        Ok(())
    } else {
        Err(ValidationError::new("delta_out_of_range"))
    }
}

/// Book listing query parameters, kept as raw strings so that empty or
/// malformed values are ignored instead of rejected.
#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct BookQuery {
    /// Substring searched in title, author and year
    pub q: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub min_stock: Option<String>,
    pub max_stock: Option<String>,
    pub year_from: Option<String>,
    pub year_to: Option<String>,
    /// `title|year|price|stock` + `_asc|_desc`
    pub sort: Option<String>,
}

/// Typed listing filter; every `None` imposes no constraint
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookFilter {
    pub q: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub min_stock: Option<i64>,
    pub max_stock: Option<i64>,
    pub year_from: Option<i64>,
    pub year_to: Option<i64>,
    pub sort: BookSort,
}

fn parse_param<T: FromStr>(raw: &Option<String>) -> Option<T> {
    let raw = raw.as_deref()?.trim();
    if raw.is_empty() {
        return None;
    }
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::debug!("Ignoring unparseable book filter value '{}'", raw);
            None
        }
    }
}

impl From<&BookQuery> for BookFilter {
    fn from(query: &BookQuery) -> Self {
        Self {
            q: query.q.clone().filter(|q| !q.is_empty()),
            min_price: parse_param(&query.min_price),
            max_price: parse_param(&query.max_price),
            min_stock: parse_param(&query.min_stock),
            max_stock: parse_param(&query.max_stock),
            year_from: parse_param(&query.year_from),
            year_to: parse_param(&query.year_to),
            sort: BookSort::parse(query.sort.as_deref()),
        }
    }
}

/// Supported listing orders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BookSort {
    #[default]
    IdAsc,
    TitleAsc,
    TitleDesc,
    YearAsc,
    YearDesc,
    PriceAsc,
    PriceDesc,
    StockAsc,
    StockDesc,
}

impl BookSort {
    /// Unknown values fall back to ascending id
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.unwrap_or_default() {
            "title_asc" => Self::TitleAsc,
            "title_desc" => Self::TitleDesc,
            "year_asc" => Self::YearAsc,
            "year_desc" => Self::YearDesc,
            "price_asc" => Self::PriceAsc,
            "price_desc" => Self::PriceDesc,
            "stock_asc" => Self::StockAsc,
            "stock_desc" => Self::StockDesc,
            _ => Self::IdAsc,
        }
    }

    /// `ORDER BY` body; id breaks ties so pages are stable
    pub fn order_by(self) -> &'static str {
        match self {
            Self::IdAsc => "id ASC",
            Self::TitleAsc => "title ASC, id ASC",
            Self::TitleDesc => "title DESC, id ASC",
            Self::YearAsc => "year ASC, id ASC",
            Self::YearDesc => "year DESC, id ASC",
            Self::PriceAsc => "price ASC, id ASC",
            Self::PriceDesc => "price DESC, id ASC",
            Self::StockAsc => "stock ASC, id ASC",
            Self::StockDesc => "stock DESC, id ASC",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_parse() {
        assert_eq!(BookSort::parse(Some("title_desc")), BookSort::TitleDesc);
        assert_eq!(BookSort::parse(Some("stock_asc")), BookSort::StockAsc);
        assert_eq!(BookSort::parse(Some("TITLE_DESC")), BookSort::IdAsc);
        assert_eq!(BookSort::parse(Some("id; DROP TABLE books")), BookSort::IdAsc);
        assert_eq!(BookSort::parse(None), BookSort::IdAsc);
    }

    #[test]
    fn test_filter_ignores_empty_and_malformed() {
        let query = BookQuery {
            q: Some(String::new()),
            min_price: Some("  ".into()),
            max_price: Some("abc".into()),
            min_stock: Some("2".into()),
            year_to: Some(" 1999 ".into()),
            ..Default::default()
        };

        let filter = BookFilter::from(&query);
        assert_eq!(
            filter,
            BookFilter {
                min_stock: Some(2),
                year_to: Some(1999),
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_query_uses_camel_case_keys() {
        let query: BookQuery =
            serde_json::from_str(r#"{"minPrice":"5","yearFrom":"1990","sort":"price_desc"}"#).unwrap();
        let filter = BookFilter::from(&query);
        assert_eq!(filter.min_price, Some(5.0));
        assert_eq!(filter.year_from, Some(1990));
        assert_eq!(filter.sort, BookSort::PriceDesc);
    }

    #[test]
    fn test_input_validation() {
        let missing_year = BookInput {
            title: Some("Clean Code".into()),
            author: Some("Martin".into()),
            ..Default::default()
        };
        assert!(missing_year.validate().is_err());

        let empty_title = BookInput {
            title: Some(String::new()),
            author: Some("Martin".into()),
            year: Some(2008),
            ..Default::default()
        };
        assert!(empty_title.validate().is_err());

        let negative_stock = BookInput {
            title: Some("Clean Code".into()),
            author: Some("Martin".into()),
            year: Some(2008),
            stock: Some(-1),
            ..Default::default()
        };
        assert!(negative_stock.validate().is_err());
    }

    #[test]
    fn test_stock_bounds() {
        let book = |stock| BookInput {
            title: Some("Clean Code".into()),
            author: Some("Martin".into()),
            year: Some(2008),
            stock: Some(stock),
            ..Default::default()
        };
        assert!(book(MAX_STOCK).validate().is_ok());
        assert!(book(MAX_STOCK + 1).validate().is_err());
        assert!(book(i64::MAX).validate().is_err());

        for delta in [-MAX_STOCK, -1, 0, 1, MAX_STOCK] {
            assert!(StockAdjustment { delta }.validate().is_ok(), "{delta}");
        }
        for delta in [i64::MIN, -MAX_STOCK - 1, MAX_STOCK + 1, i64::MAX] {
            assert!(StockAdjustment { delta }.validate().is_err(), "{delta}");
        }
    }

    #[test]
    fn test_input_defaults() {
        let input = BookInput {
            title: Some("Refactoring".into()),
            author: Some("Fowler".into()),
            year: Some(1999),
            ..Default::default()
        };
        assert!(input.validate().is_ok());

        let book = input.into_new_book().unwrap();
        assert_eq!(book.stock, 0);
        assert_eq!(book.price, 0.0);
    }
}
