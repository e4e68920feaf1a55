pub mod access;
pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod models;
pub mod ordering;
pub mod report;
pub mod routes;
pub mod services;
pub mod state;
