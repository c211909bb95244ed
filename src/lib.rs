pub mod config;
pub mod db;
pub mod error;
mod migrations;
pub mod strength;
