// app/src/models/mod.rs

//! Catalog and user records owned by the server crate. Orders live in the
//! `storefront` core.

pub mod product;
pub mod user;

pub use product::{NewProduct, Product, ProductChanges};
pub use user::{NewUser, User};
