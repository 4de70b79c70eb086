pub mod audit;
pub mod cli;
pub mod config;
pub mod crypto;
pub mod errors;
pub mod policy;
pub mod transfer;
pub mod vault;
