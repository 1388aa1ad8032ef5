//! Interactive dashboard over SpaceX launch records.
//!
//! The launch table is loaded once ([`data::loader`]), aggregated on demand
//! ([`data::aggregate`]), turned into chart specifications ([`figure`]) and
//! wired to the input widgets through an explicit callback registry
//! ([`callbacks`]). The `eframe` window lives in [`app`].

pub mod app;
pub mod callbacks;
pub mod color;
pub mod config;
pub mod data;
pub mod figure;
pub mod state;
pub mod ui;
