//! Dish name resolution: from evidence to canonical recipe ids.

mod mapping;
mod resolver;

pub use mapping::DishMapping;
pub use resolver::{resolve_candidates, DishNameResolver, RESOLVER_STAGE};
