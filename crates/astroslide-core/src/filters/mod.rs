pub mod bilateral;
pub mod border;
pub mod box_filter;
pub mod clahe;
pub mod curves;
pub mod gaussian_blur;
pub mod histogram;
pub mod median;
pub mod resize;
pub mod unsharp_mask;

pub use bilateral::bilateral_filter;
pub use border::reflect_101;
pub use box_filter::{box_mean, local_variance};
pub use clahe::clahe;
pub use gaussian_blur::{gaussian_blur, gaussian_blur_array, gaussian_blur_ksize};
pub use histogram::{histogram, percentile_stretch, Histogram};
pub use median::{median_blur, median_blur_plane};
pub use resize::{resize_area, resize_bicubic, resize_bicubic_plane};
pub use unsharp_mask::{add_weighted, cascaded_unsharp, unsharp_mask};
