//! Vessel geometry models.

pub mod tank;
