//! Dynamic SQL for product listings
//!
//! A [`ProductFilter`] is turned into a list of typed clauses which are then
//! rendered into one parameterised statement. User supplied values only ever
//! travel as bind parameters; the text spliced into the SQL is either a fixed
//! fragment from this module or a [`SortDirection`] keyword.

use sqlx::{Postgres, postgres::PgArguments, query::QueryAs};

use crate::filters::{ProductFilter, SortDirection};

const LISTING_SELECT: &str = "SELECT p.id_product, p.name, p.category, p.is_available, p.sku, \
     p.stock, p.price, p.created_at, p.notes, p.location, pi.image_url \
     FROM products p \
     JOIN product_images pi ON pi.id_product = p.id_product \
     WHERE 1=1";

/// A value bound to a positional placeholder
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    Int(i64),
    Text(String),
    Bool(bool),
}

#[derive(Debug, Clone, PartialEq)]
enum Predicate {
    Id(i64),
    NameContains(String),
    Category(String),
    IsAvailable(bool),
    Sku(String),
    InStock(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SortKey {
    Price,
    CreatedAt,
}

impl SortKey {
    fn column(self) -> &'static str {
        match self {
            SortKey::Price => "p.price",
            SortKey::CreatedAt => "p.created_at",
        }
    }
}

/// Clause list for a product listing query
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingQuery {
    predicates: Vec<Predicate>,
    order_by: Vec<(SortKey, SortDirection)>,
    limit: Option<i64>,
    offset: Option<i64>,
}

impl ListingQuery {
    /// Collect one clause per constraint present in the filter
    pub fn from_filter(filter: &ProductFilter) -> Self {
        let mut predicates = Vec::new();

        if let Some(id) = filter.id {
            predicates.push(Predicate::Id(id));
        }
        if let Some(name) = &filter.name {
            predicates.push(Predicate::NameContains(name.clone()));
        }
        if let Some(category) = &filter.category {
            predicates.push(Predicate::Category(category.clone()));
        }
        if let Some(is_available) = filter.is_available {
            predicates.push(Predicate::IsAvailable(is_available));
        }
        if let Some(sku) = &filter.sku {
            predicates.push(Predicate::Sku(sku.clone()));
        }
        if let Some(in_stock) = filter.in_stock {
            predicates.push(Predicate::InStock(in_stock));
        }

        let order_by = [
            (SortKey::Price, filter.price),
            (SortKey::CreatedAt, filter.created_at),
        ]
        .into_iter()
        .filter_map(|(key, direction)| direction.map(|d| (key, d)))
        .collect();

        Self {
            predicates,
            order_by,
            limit: filter.limit,
            offset: filter.offset,
        }
    }

    /// Render the statement and its parameters
    pub fn build(&self) -> Statement {
        let mut binder = Binder::new(LISTING_SELECT);

        for predicate in &self.predicates {
            match predicate {
                Predicate::Id(id) => {
                    let slot = binder.bind(BindValue::Int(*id));
                    binder.push(&format!(" AND p.id_product = {slot}"));
                }
                Predicate::NameContains(name) => {
                    let slot = binder.bind(BindValue::Text(escape_like(name)));
                    binder.push(&format!(" AND p.name ILIKE '%' || {slot} || '%'"));
                }
                Predicate::Category(category) => {
                    let slot = binder.bind(BindValue::Text(category.clone()));
                    binder.push(&format!(" AND p.category = {slot}"));
                }
                Predicate::IsAvailable(is_available) => {
                    let slot = binder.bind(BindValue::Bool(*is_available));
                    binder.push(&format!(" AND p.is_available = {slot}"));
                }
                Predicate::Sku(sku) => {
                    let slot = binder.bind(BindValue::Text(sku.clone()));
                    binder.push(&format!(" AND p.sku = {slot}"));
                }
                Predicate::InStock(true) => binder.push(" AND p.stock > 0"),
                Predicate::InStock(false) => binder.push(" AND p.stock <= 0"),
            }
        }

        if !self.order_by.is_empty() {
            let order = self
                .order_by
                .iter()
                .map(|(key, direction)| format!("{} {}", key.column(), direction.as_sql()))
                .collect::<Vec<_>>()
                .join(", ");
            binder.push(&format!(" ORDER BY {order}"));
        }

        if let Some(limit) = self.limit {
            let slot = binder.bind(BindValue::Int(limit));
            binder.push(&format!(" LIMIT {slot}"));
        }

        if let Some(offset) = self.offset {
            let slot = binder.bind(BindValue::Int(offset));
            binder.push(&format!(" OFFSET {slot}"));
        }

        binder.finish()
    }
}

/// Appends SQL text and hands out placeholders in bind order
struct Binder {
    sql: String,
    params: Vec<BindValue>,
}

impl Binder {
    fn new(base: &str) -> Self {
        Self {
            sql: base.to_string(),
            params: Vec::new(),
        }
    }

    fn push(&mut self, fragment: &str) {
        self.sql.push_str(fragment);
    }

    /// Record a value and return the placeholder that refers to it
    fn bind(&mut self, value: BindValue) -> String {
        self.params.push(value);
        format!("${}", self.params.len())
    }

    fn finish(self) -> Statement {
        Statement {
            sql: self.sql,
            params: self.params,
        }
    }
}

/// A rendered SQL statement with its positional parameters
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    sql: String,
    params: Vec<BindValue>,
}

impl Statement {
    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &[BindValue] {
        &self.params
    }

    /// Attach the parameters, in placeholder order, to a prepared query
    pub fn bind_to<'q, O>(
        &'q self,
        mut query: QueryAs<'q, Postgres, O, PgArguments>,
    ) -> QueryAs<'q, Postgres, O, PgArguments> {
        for param in &self.params {
            query = match param {
                BindValue::Int(value) => query.bind(*value),
                BindValue::Text(value) => query.bind(value.as_str()),
                BindValue::Bool(value) => query.bind(*value),
            };
        }
        query
    }
}

/// Escape LIKE wildcards so the text matches literally
fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
