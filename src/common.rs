//! Defines some common functions used in this library.

/// Defines some numerical helpers such as inner products.
pub mod utils;

/// Defines some checker functions.
pub(crate) mod checker;

// JSON persistence of models.
pub(crate) mod persist;
