pub mod balance;
pub mod cli;
pub mod combat;
pub mod config;
pub mod console;
pub mod data;
pub mod parallel;
