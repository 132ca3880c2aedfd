pub mod fits;
pub mod image_io;

pub use fits::{decode_fits_bytes, read_fits, FitsHeader};
pub use image_io::{
    decode_bytes, encode, from_rgb_image, is_accepted_name, is_fits_name, load_rgb, save_rgb,
    to_rgb_image, ACCEPTED_EXTENSIONS,
};
