pub mod color;
pub mod dirty;
pub mod mask;
pub mod palette;
pub mod surface;
