use std::time::Instant;

use once_cell::sync::Lazy;

pub mod config;
pub mod ga;
pub mod io;
pub mod redistribute;

pub static EPOCH: Lazy<Instant> = Lazy::new(Instant::now);
