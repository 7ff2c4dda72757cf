// marketplace/src/web/handlers/mod.rs

pub mod order_handlers;
pub mod product_handlers;
