//! Application state shared across handlers

use sqlx::PgPool;

use crate::{
    jwt::JwtService,
    repositories::{ProductRepository, StaffRepository},
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub jwt_service: JwtService,
    pub staff_repository: StaffRepository,
    pub product_repository: ProductRepository,
}

impl AppState {
    pub fn new(db_pool: PgPool, jwt_service: JwtService) -> Self {
        Self {
            staff_repository: StaffRepository::new(db_pool.clone()),
            product_repository: ProductRepository::new(db_pool.clone()),
            db_pool,
            jwt_service,
        }
    }
}
