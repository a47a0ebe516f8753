//! Imputation module for handling missing values.
//!
//! Missing sensor readings are filled with the column median.

mod statistical;

pub use statistical::StatisticalImputer;
