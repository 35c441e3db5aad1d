//! Shared constants for terrain grid generation.
pub mod coordinate_system;
pub mod grid;
pub mod interpolation;
pub mod layout;
