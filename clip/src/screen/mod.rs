//! Layout detectors, one module per card type.

pub mod character;
pub mod weapon;
