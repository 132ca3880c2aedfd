pub mod adjust;
pub mod blend;
pub mod color;
pub mod consts;
pub mod denoise;
pub mod detection;
pub mod error;
pub mod filters;
pub mod frame;
pub mod io;
pub mod pipeline;
pub mod presets;
pub mod stars;
pub mod stats;
