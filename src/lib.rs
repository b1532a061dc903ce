//! next-step - the next unchecked checklist item of every card on a board
//!
//! The selection logic lives in [`checklist`]; providers, the refresh
//! service and rendering feed it card data and print its results.

pub mod api;
pub mod checklist;
pub mod config;
pub mod logging;
pub mod render;
pub mod services;
