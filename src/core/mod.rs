//! Core business logic, independent of any presentation layer

pub mod catalog;
pub mod config;
pub mod conversion;
pub mod currency;
pub mod form;
pub mod log;
pub mod store;

// Re-export main types for cleaner imports
pub use conversion::{ConversionRequest, ConversionResult, convert};
pub use currency::{Currency, PIVOT_CURRENCY, RateSnapshot, RateSource};
pub use form::ConverterForm;
pub use store::{RateStore, StoreState};
