pub mod inpaint;
pub mod reduce;
pub mod spikes;

pub use inpaint::{remove_stars_inpaint, InpaintMethod};
pub use reduce::reduce_stars;
pub use spikes::{add_star_spikes, SpikeParams};
