//! Core library for liked-library-sync
pub mod config;
pub mod db;
pub mod models;
pub mod api;
pub mod genres;
pub mod tasks;
pub mod util;
