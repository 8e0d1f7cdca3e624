pub mod aws_clients;
pub mod config;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod memory;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod service;
pub mod startup;

use crate::service::JokeService;

/// AppState holds shared resources for the web server.
pub struct AppState {
    pub jokes: JokeService,
}
