//! Normalisation of product listing query strings
//!
//! Query parameters arrive as loosely typed strings. Each one is coerced on a
//! best-effort basis: a value that cannot be parsed is treated exactly as if
//! it had not been sent, so a bad `limit` never turns into an error response.

use std::str::FromStr;

use serde::Deserialize;

/// Page size used when no usable `limit` is supplied
pub const DEFAULT_LIMIT: i64 = 5;
/// Offset used when no usable `offset` is supplied
pub const DEFAULT_OFFSET: i64 = 0;

/// Sort direction for an ordered column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// SQL keyword for this direction
    pub fn as_sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

impl FromStr for SortDirection {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("asc") {
            Ok(SortDirection::Asc)
        } else if s.eq_ignore_ascii_case("desc") {
            Ok(SortDirection::Desc)
        } else {
            Err(())
        }
    }
}

/// Raw query string of the product listing endpoints
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductQueryParams {
    pub id: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
    pub is_available: Option<String>,
    pub name: Option<String>,
    pub category: Option<String>,
    pub sku: Option<String>,
    pub price: Option<String>,
    pub in_stock: Option<String>,
    pub created_at: Option<String>,
}

/// Typed product filter; `None` means no constraint on that dimension
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
    pub id: Option<i64>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub name: Option<String>,
    pub category: Option<String>,
    pub sku: Option<String>,
    pub price: Option<SortDirection>,
    pub in_stock: Option<bool>,
    pub created_at: Option<SortDirection>,
    pub is_available: Option<bool>,
}

impl ProductFilter {
    /// Filter for the general listing endpoint
    pub fn from_params(params: ProductQueryParams) -> Self {
        Self {
            id: parse_int(params.id.as_deref()),
            limit: Some(parse_count(params.limit.as_deref(), DEFAULT_LIMIT)),
            offset: Some(parse_count(params.offset.as_deref(), DEFAULT_OFFSET)),
            name: non_empty(params.name),
            category: non_empty(params.category),
            sku: non_empty(params.sku),
            price: parse_direction(params.price.as_deref()),
            in_stock: parse_flag(params.in_stock.as_deref()),
            created_at: parse_direction(params.created_at.as_deref()),
            is_available: parse_flag(params.is_available.as_deref()),
        }
    }

    /// Filter for the customer search endpoint
    ///
    /// Search never looks up a single id or orders by creation time, and it
    /// only ever returns available products whatever the caller asked for.
    pub fn for_search(params: ProductQueryParams) -> Self {
        Self {
            id: None,
            created_at: None,
            is_available: Some(true),
            ..Self::from_params(params)
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn parse_int(value: Option<&str>) -> Option<i64> {
    value.and_then(|v| v.parse().ok())
}

fn parse_count(value: Option<&str>, default: i64) -> i64 {
    parse_int(value).filter(|v| *v >= 0).unwrap_or(default)
}

fn parse_direction(value: Option<&str>) -> Option<SortDirection> {
    value.and_then(|v| v.parse().ok())
}

fn parse_flag(value: Option<&str>) -> Option<bool> {
    match value? {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> ProductQueryParams {
        let mut params = ProductQueryParams::default();
        for (key, value) in pairs {
            let value = Some(value.to_string());
            match *key {
                "id" => params.id = value,
                "limit" => params.limit = value,
                "offset" => params.offset = value,
                "isAvailable" => params.is_available = value,
                "name" => params.name = value,
                "category" => params.category = value,
                "sku" => params.sku = value,
                "price" => params.price = value,
                "inStock" => params.in_stock = value,
                "createdAt" => params.created_at = value,
                other => panic!("unknown query parameter {other}"),
            }
        }
        params
    }

    #[test]
    fn test_empty_query_applies_pagination_defaults() {
        let filter = ProductFilter::from_params(ProductQueryParams::default());
        assert_eq!(
            filter,
            ProductFilter {
                limit: Some(DEFAULT_LIMIT),
                offset: Some(DEFAULT_OFFSET),
                ..ProductFilter::default()
            }
        );
    }

    #[test]
    fn test_valid_values_are_coerced() {
        let filter = ProductFilter::from_params(params(&[
            ("id", "12"),
            ("limit", "20"),
            ("offset", "40"),
            ("isAvailable", "false"),
            ("name", "Shirt"),
            ("category", "Clothing"),
            ("sku", "SH-1"),
            ("price", "asc"),
            ("inStock", "1"),
            ("createdAt", "DESC"),
        ]));

        assert_eq!(filter.id, Some(12));
        assert_eq!(filter.limit, Some(20));
        assert_eq!(filter.offset, Some(40));
        assert_eq!(filter.is_available, Some(false));
        assert_eq!(filter.name.as_deref(), Some("Shirt"));
        assert_eq!(filter.category.as_deref(), Some("Clothing"));
        assert_eq!(filter.sku.as_deref(), Some("SH-1"));
        assert_eq!(filter.price, Some(SortDirection::Asc));
        assert_eq!(filter.in_stock, Some(true));
        assert_eq!(filter.created_at, Some(SortDirection::Desc));
    }

    #[test]
    fn test_unparsable_values_are_dropped() {
        let filter = ProductFilter::from_params(params(&[
            ("id", "abc"),
            ("isAvailable", "yes"),
            ("inStock", "maybe"),
            ("price", "ASC; DROP TABLE products"),
            ("createdAt", "newest"),
        ]));

        assert_eq!(filter.id, None);
        assert_eq!(filter.is_available, None);
        assert_eq!(filter.in_stock, None);
        assert_eq!(filter.price, None);
        assert_eq!(filter.created_at, None);
    }

    #[test]
    fn test_bad_pagination_falls_back_to_defaults() {
        let filter = ProductFilter::from_params(params(&[("limit", "ten"), ("offset", "-3")]));
        assert_eq!(filter.limit, Some(DEFAULT_LIMIT));
        assert_eq!(filter.offset, Some(DEFAULT_OFFSET));
    }

    #[test]
    fn test_empty_strings_mean_absent() {
        let filter = ProductFilter::from_params(params(&[
            ("name", ""),
            ("category", ""),
            ("sku", ""),
            ("price", ""),
            ("id", ""),
        ]));
        assert_eq!(filter.name, None);
        assert_eq!(filter.category, None);
        assert_eq!(filter.sku, None);
        assert_eq!(filter.price, None);
        assert_eq!(filter.id, None);
    }

    #[test]
    fn test_flag_spellings() {
        for truthy in ["1", "t", "T", "TRUE", "true", "True"] {
            assert_eq!(parse_flag(Some(truthy)), Some(true), "{truthy}");
        }
        for falsy in ["0", "f", "F", "FALSE", "false", "False"] {
            assert_eq!(parse_flag(Some(falsy)), Some(false), "{falsy}");
        }
        assert_eq!(parse_flag(Some("tRuE")), None);
        assert_eq!(parse_flag(None), None);
    }

    #[test]
    fn test_search_forces_availability_and_ignores_id_and_created_at() {
        let filter = ProductFilter::for_search(params(&[
            ("id", "3"),
            ("isAvailable", "false"),
            ("createdAt", "asc"),
            ("inStock", "false"),
            ("price", "desc"),
            ("limit", "2"),
        ]));

        assert_eq!(filter.id, None);
        assert_eq!(filter.created_at, None);
        assert_eq!(filter.is_available, Some(true));
        assert_eq!(filter.in_stock, Some(false));
        assert_eq!(filter.price, Some(SortDirection::Desc));
        assert_eq!(filter.limit, Some(2));
        assert_eq!(filter.offset, Some(DEFAULT_OFFSET));
    }
}
