pub mod food_analysis_result;

pub use food_analysis_result::*;
