//! # Twine Tanks
//!
//! Liquid volume as a function of fill height, and the inverse, for
//! cylindrical tanks with flat, conical, ellipsoidal, spherical, guppy or
//! torispherical heads, built for [Twine](https://github.com/isentropic-dev/twine).
//!
//! ## Crate layout
//!
//! - [`models`]: [`twine_core::Model`] implementations around the tank core.
//! - [`support`]: head geometry, numeric kernels and dimension constraints.
//!
//! ## Utility code lifecycle
//!
//! Modules in [`support`] are part of the public API because they're useful on
//! their own, but their APIs are not stable. Breaking changes may occur as
//! needed.
//!
//! Code that only one model needs starts in that model's internal `core`
//! module and moves to [`support`] once it is useful elsewhere.

pub mod models;
pub mod support;
