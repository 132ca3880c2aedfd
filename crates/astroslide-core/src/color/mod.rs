pub mod convert;
pub mod process;

pub use convert::{
    grayscale, hsv_to_rgb, lab_to_rgb, luma, luminance, rgb_to_hsv, rgb_to_lab, rgb_to_ycbcr,
    ycbcr_to_rgb, HsvPlanes, LabPlanes, YCbCrPlanes,
};
pub use process::{process_channels, process_planes};
