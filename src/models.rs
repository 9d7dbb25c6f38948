//! Public Twine models.
//!
//! Models are the primary public interface of this crate.
//!
//! # Organization
//!
//! Models are organized into domain-specific submodules. Tank models live in
//! [`geometry::tank`].
//!
//! # Model structure
//!
//! Each model lives in its own module and contains an internal `core` submodule
//! where the computation and domain logic live. The `core` types a caller needs
//! are re-exported by the model module; the `core` module itself is an
//! implementation detail.
//!
//! The [`twine_core::Model`] implementation is a thin adapter that delegates to
//! the model-specific core API. A single `core` may be exposed through multiple
//! adapters, as [`geometry::tank::Tank`] and [`geometry::tank::HeightFromVolume`]
//! are.

pub mod geometry;
