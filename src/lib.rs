pub mod app;
pub mod cli;
pub mod client;
pub mod config;
pub mod controller;
pub mod model;
pub mod output;
pub mod status;

#[cfg(test)]
mod tests;
