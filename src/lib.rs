pub mod analyzers;
pub mod audit;
pub mod config;
pub mod fetch;
pub mod filter;
pub mod output;
pub mod parser;
pub mod pipeline;
pub mod score;
pub mod services;
