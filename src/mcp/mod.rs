pub mod catalog;
pub mod describe;
pub mod protocol;
pub mod server;
