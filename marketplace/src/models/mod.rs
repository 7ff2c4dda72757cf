// marketplace/src/models/mod.rs

//! Persisted entities and the inputs used to create them.

pub mod order;
pub mod placement;
pub mod product;
pub mod user;

pub use order::{Order, OrderDraft, PlacedOrder};
pub use placement::Placement;
pub use product::{NewProduct, Product};
pub use user::{NewUser, User};
