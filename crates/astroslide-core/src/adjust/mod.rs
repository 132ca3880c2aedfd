pub mod gradient;
pub mod saturation;
pub mod scnr;
pub mod stretch;
pub mod white_balance;

pub use gradient::extract_background_gradient;
pub use saturation::{
    background_protected_saturation, boost_value, calculate_adaptive_saturation,
    scale_saturation,
};
pub use scnr::scnr_green_removal;
pub use stretch::asinh_stretch;
pub use white_balance::{auto_white_balance, WhiteBalanceMethod};
