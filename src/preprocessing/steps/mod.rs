//! Individual preprocessing steps

pub mod contrast;
pub mod crop;
pub mod invert;
pub mod pad;
pub mod resize;
