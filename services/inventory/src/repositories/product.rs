//! Product repository for database operations

use common::error::{DatabaseError, DatabaseResult};
use sqlx::{PgConnection, PgPool};
use tracing::{debug, info};

use crate::{
    filters::ProductFilter,
    models::product::{Product, ProductListing, ProductPayload},
    query::ListingQuery,
};

/// Outcome of an owner-scoped mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductAccess {
    /// The product existed, belonged to the caller and was changed
    Granted,
    /// No product with that id
    Missing,
    /// The product belongs to another staff member
    Forbidden,
}

/// Product repository
#[derive(Clone)]
pub struct ProductRepository {
    pool: PgPool,
}

impl ProductRepository {
    /// Create a new product repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List products matching a filter
    pub async fn list(&self, filter: &ProductFilter) -> DatabaseResult<Vec<ProductListing>> {
        let statement = ListingQuery::from_filter(filter).build();
        debug!(
            sql = statement.sql(),
            params = statement.params().len(),
            "Listing products"
        );

        statement
            .bind_to(sqlx::query_as::<_, ProductListing>(statement.sql()))
            .fetch_all(&self.pool)
            .await
            .map_err(DatabaseError::from_query)
    }

    /// Create a product together with its image
    pub async fn create(&self, owner_id: i64, payload: &ProductPayload) -> DatabaseResult<Product> {
        info!("Creating product {} for user {}", payload.sku, owner_id);

        let mut tx = self.pool.begin().await.map_err(DatabaseError::from_query)?;

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO products (user_id, name, sku, category, notes, price, stock, location, is_available)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id_product
            "#,
        )
        .bind(owner_id)
        .bind(&payload.name)
        .bind(&payload.sku)
        .bind(payload.category.as_str())
        .bind(&payload.notes)
        .bind(payload.price)
        .bind(payload.stock)
        .bind(&payload.location)
        .bind(payload.is_available)
        .fetch_one(&mut *tx)
        .await
        .map_err(DatabaseError::from_query)?;

        sqlx::query("INSERT INTO product_images (id_product, image_url) VALUES ($1, $2)")
            .bind(id)
            .bind(&payload.image_url)
            .execute(&mut *tx)
            .await
            .map_err(DatabaseError::from_query)?;

        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT p.id_product, p.name, p.sku, p.category, pi.image_url, p.notes, p.price,
                   p.stock, p.location, p.is_available, p.created_at, p.updated_at, p.deleted_at
            FROM products p
            JOIN product_images pi ON pi.id_product = p.id_product
            WHERE p.id_product = $1
            LIMIT 1
            "#,
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await
        .map_err(DatabaseError::from_query)?;

        tx.commit().await.map_err(DatabaseError::from_query)?;

        Ok(product)
    }

    /// Replace every mutable field of a product owned by `owner_id`
    pub async fn update(
        &self,
        id: i64,
        owner_id: i64,
        payload: &ProductPayload,
    ) -> DatabaseResult<ProductAccess> {
        let mut tx = self.pool.begin().await.map_err(DatabaseError::from_query)?;

        let access = lock_for_owner(&mut tx, id, owner_id).await?;
        if access != ProductAccess::Granted {
            return Ok(access);
        }

        sqlx::query(
            r#"
            UPDATE products
            SET name = $1, sku = $2, category = $3, notes = $4, price = $5, stock = $6,
                location = $7, is_available = $8, updated_at = NOW()
            WHERE id_product = $9
            "#,
        )
        .bind(&payload.name)
        .bind(&payload.sku)
        .bind(payload.category.as_str())
        .bind(&payload.notes)
        .bind(payload.price)
        .bind(payload.stock)
        .bind(&payload.location)
        .bind(payload.is_available)
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(DatabaseError::from_query)?;

        sqlx::query("UPDATE product_images SET image_url = $1 WHERE id_product = $2")
            .bind(&payload.image_url)
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(DatabaseError::from_query)?;

        tx.commit().await.map_err(DatabaseError::from_query)?;

        info!("Updated product {}", id);
        Ok(ProductAccess::Granted)
    }

    /// Delete a product owned by `owner_id`
    pub async fn delete(&self, id: i64, owner_id: i64) -> DatabaseResult<ProductAccess> {
        let mut tx = self.pool.begin().await.map_err(DatabaseError::from_query)?;

        let access = lock_for_owner(&mut tx, id, owner_id).await?;
        if access != ProductAccess::Granted {
            return Ok(access);
        }

        sqlx::query("DELETE FROM products WHERE id_product = $1 AND user_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(&mut *tx)
            .await
            .map_err(DatabaseError::from_query)?;

        tx.commit().await.map_err(DatabaseError::from_query)?;

        info!("Deleted product {}", id);
        Ok(ProductAccess::Granted)
    }
}

/// Lock the product row and decide whether `owner_id` may change it
async fn lock_for_owner(
    conn: &mut PgConnection,
    id: i64,
    owner_id: i64,
) -> DatabaseResult<ProductAccess> {
    let owner: Option<i64> =
        sqlx::query_scalar("SELECT user_id FROM products WHERE id_product = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
            .map_err(DatabaseError::from_query)?;

    Ok(match owner {
        None => ProductAccess::Missing,
        Some(owner) if owner == owner_id => ProductAccess::Granted,
        Some(_) => ProductAccess::Forbidden,
    })
}

#[cfg(test)]
mod tests {
    //! These tests need a PostgreSQL instance reachable through `DATABASE_URL`:
    //! `cargo test -p inventory -- --ignored`

    use super::*;
    use crate::{filters::ProductQueryParams, models::product::Category};
    use common::database::{DatabaseConfig, init_pool, run_migrations};

    async fn pool() -> PgPool {
        let config = DatabaseConfig::from_env().expect("DATABASE_URL must be set");
        let pool = init_pool(&config).await.unwrap();
        run_migrations(&pool).await.unwrap();
        pool
    }

    async fn staff_member(pool: &PgPool) -> i64 {
        let suffix = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default() % 10_000_000_000;
        sqlx::query_scalar(
            r#"
            INSERT INTO users (email, name, phone_number, password, salt)
            VALUES ($1, 'Test Staff', $2, 'hash', 'salt')
            RETURNING user_id
            "#,
        )
        .bind(format!("staff{suffix}@example.com"))
        .bind(format!("+62{suffix:010}"))
        .fetch_one(pool)
        .await
        .unwrap()
    }

    fn payload(sku: &str) -> ProductPayload {
        ProductPayload {
            name: "Linen Shirt".to_string(),
            sku: sku.to_string(),
            category: Category::Clothing,
            image_url: "https://img.example.com/shirt.png".to_string(),
            notes: "Light summer shirt".to_string(),
            price: 25.5,
            stock: 3,
            location: "Rack A1".to_string(),
            is_available: true,
        }
    }

    fn by_id(id: &str) -> ProductFilter {
        ProductFilter::from_params(ProductQueryParams {
            id: Some(id.to_string()),
            ..ProductQueryParams::default()
        })
    }

    #[tokio::test]
    #[ignore = "requires a running PostgreSQL instance"]
    async fn test_created_product_is_listed_by_id() {
        let pool = pool().await;
        let repository = ProductRepository::new(pool.clone());
        let owner = staff_member(&pool).await;

        let created = repository.create(owner, &payload("RT-1")).await.unwrap();
        let listed = repository.list(&by_id(&created.id)).await.unwrap();

        assert_eq!(listed.len(), 1);
        let listing = &listed[0];
        assert_eq!(listing.id, created.id);
        assert_eq!(listing.name, "Linen Shirt");
        assert_eq!(listing.sku, "RT-1");
        assert_eq!(listing.category, Category::Clothing);
        assert_eq!(listing.image_url, "https://img.example.com/shirt.png");
        assert_eq!(listing.notes, "Light summer shirt");
        assert_eq!(listing.price, 25.5);
        assert_eq!(listing.stock, 3);
        assert_eq!(listing.location, "Rack A1");
        assert!(listing.is_available);
    }

    #[tokio::test]
    #[ignore = "requires a running PostgreSQL instance"]
    async fn test_mutations_are_scoped_to_owner() {
        let pool = pool().await;
        let repository = ProductRepository::new(pool.clone());
        let owner = staff_member(&pool).await;
        let stranger = staff_member(&pool).await;

        let created = repository.create(owner, &payload("OWN-1")).await.unwrap();
        let id: i64 = created.id.parse().unwrap();

        assert_eq!(
            repository.delete(id, stranger).await.unwrap(),
            ProductAccess::Forbidden
        );
        assert_eq!(
            repository
                .update(id, stranger, &payload("OWN-2"))
                .await
                .unwrap(),
            ProductAccess::Forbidden
        );

        assert_eq!(
            repository.update(id, owner, &payload("OWN-2")).await.unwrap(),
            ProductAccess::Granted
        );
        let listed = repository.list(&by_id(&created.id)).await.unwrap();
        assert_eq!(listed[0].sku, "OWN-2");

        assert_eq!(
            repository.delete(id, owner).await.unwrap(),
            ProductAccess::Granted
        );
        assert_eq!(
            repository.delete(id, owner).await.unwrap(),
            ProductAccess::Missing
        );
        assert!(repository.list(&by_id(&created.id)).await.unwrap().is_empty());
    }
}
