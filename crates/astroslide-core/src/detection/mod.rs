pub mod components;
pub mod morphology;
pub mod stars;
pub mod threshold;

pub use components::{connected_components, Component};
pub use morphology::{close, dilate, erode, open, StructuringElement};
pub use stars::{
    clean_star_mask, count_stars, create_star_mask, detect_stars_aggressive,
    DEFAULT_STAR_THRESHOLD_FACTOR,
};
pub use threshold::{adaptive_mean_threshold, binary_threshold, mean_sigma_threshold};
