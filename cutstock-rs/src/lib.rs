//! `cutstock-rs` is an engine for the 2D rectangular cutting-stock problem.
//!
//! It provides the deterministic building blocks a search heuristic needs:
//! a validated [`PartCatalog`](entities::PartCatalog), a greedy guillotine
//! [`decoder`] turning a placement ordering into a layout, dual-mode
//! [`freespace`] computation (spatial partition tree or occupancy-bitmap
//! sweep) and layout [`stats`]. The metaheuristic driving the search lives
//! in a separate crate.

pub mod decoder;
pub mod entities;
pub mod freespace;
pub mod geometry;
pub mod stats;
pub mod util;
