use crate::units::Unit;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UnitError {
    #[error("Incompatible units: cannot convert {from} to {to}")]
    Incompatible { from: Unit, to: Unit },

    #[error("Unknown unit: {0}")]
    UnknownUnit(String),
}

#[derive(Error, Debug)]
pub enum GroceryError {
    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: Uuid },

    #[error("Storage error: {0}")]
    Storage(String),
}

impl GroceryError {
    pub fn not_found(entity: &'static str, id: Uuid) -> Self {
        GroceryError::NotFound { entity, id }
    }
}
