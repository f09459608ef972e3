pub mod analysis;
pub mod goal;
pub mod health;
pub mod history;
pub mod payment;
pub mod server;
pub mod session;
