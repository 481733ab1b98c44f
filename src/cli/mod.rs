//! Terminal front end for the rate store

pub mod convert;
pub mod rates;
pub mod setup;
pub mod ui;
