//! Services for next-step.
//!
//! This module contains the refresh service that drives annotations for a
//! whole board.

pub mod board_refresh;

pub use board_refresh::{BoardRefresher, CardAnnotation, RefreshResult};
