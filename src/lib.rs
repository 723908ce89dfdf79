pub mod controllers;
pub mod deployment;
pub mod models;
pub mod utils;
