//! Climbing route pyramid viewer.
//!
//! Loads a CSV tick log, filters it by route type, lead style, date, pitch
//! count and maximum grade, and counts distinct routes per grade band.

pub mod app;
pub mod color;
pub mod config;
pub mod data;
pub mod export;
pub mod state;
pub mod ui;
