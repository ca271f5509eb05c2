//! Peripheral drivers, generic over `embedded-hal` 1.0 traits.

pub mod button;
pub mod indicator;
