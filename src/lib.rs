#[macro_use]
extern crate lazy_static;

pub mod prelude;

pub mod chart;
pub mod config;
pub mod core;
pub mod error;
pub mod indicators;
pub mod request;
pub mod web_server;
