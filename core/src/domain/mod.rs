pub mod common;
pub mod entitlement;
pub mod food_analysis;
pub mod history;
pub mod session;
pub mod storage;
