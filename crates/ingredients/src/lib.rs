pub mod error;
pub mod parser;
pub mod quantity;
pub mod units;

pub use error::IngredientError;
pub use parser::{ParsedIngredient, parse, parse_all};
pub use quantity::{format_quantity, parse_quantity};
