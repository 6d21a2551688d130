pub mod config;
pub mod flows;
pub mod nav;
pub mod output;
pub mod store;
pub mod views;
