mod chunks;
mod crc;
pub mod decoder;
pub mod encoder;
mod filters;
pub mod generate;
pub mod ico;
pub mod matrix;
mod pixel;
pub mod render;

pub use chunks::{ColorType, IHDRChunk, Interlacing};
pub use decoder::{decode, inspect, DecodedPng};
pub use encoder::PngEncoder;
pub use generate::{Generator, Outcome, Report};
pub use matrix::{Fill, FillKind, FillOverrides, IconMatrix, IconTarget, Platform};
pub use pixel::Pixel;
pub use render::Logo;
