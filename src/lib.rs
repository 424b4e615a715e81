pub mod client;
pub mod config;
pub mod handlers;
pub mod ledger;
pub mod message;
pub mod models;
pub mod repository;
pub mod routes;
pub mod services;
pub mod session;
pub mod storage;
pub mod utils;
