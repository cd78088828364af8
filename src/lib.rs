pub mod auth;
pub mod bidding;
pub mod config;
pub mod dao;
pub mod database;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod hello;
pub mod model;
pub mod notification;
pub mod server;
pub mod state;
