pub mod config;
pub mod gallery;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;
