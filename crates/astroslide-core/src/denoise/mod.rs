pub mod adaptive;
pub mod astro;
pub mod nlm;
pub mod noise;
pub mod wavelet;

pub use adaptive::adaptive_denoise;
pub use astro::astro_denoise;
pub use nlm::nlm_denoise_colored;
pub use noise::estimate_noise_level;
pub use wavelet::wavelet_denoise;
