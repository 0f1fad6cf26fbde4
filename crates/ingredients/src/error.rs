use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum IngredientError {
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),

    #[error("Scaling multiplier must be a positive finite number, got {0}")]
    InvalidMultiplier(f64),
}
