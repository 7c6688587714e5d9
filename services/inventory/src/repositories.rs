//! Repositories for database operations

pub mod product;
pub mod staff;

pub use product::{ProductAccess, ProductRepository};
pub use staff::StaffRepository;
