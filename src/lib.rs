//! Backend del inventario del concesionario
//!
//! Catálogo público, formulario de contacto y gestión del inventario con
//! traducción automática de descripciones y almacenamiento de imágenes.

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

pub use routes::create_app;
pub use state::AppState;
