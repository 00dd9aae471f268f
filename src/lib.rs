pub mod arxiv;
pub mod cli;
pub mod config;
pub mod llm;
pub mod pipeline;
pub mod server;
pub mod types;

// Re-export commonly used types
pub use config::Config;
pub use server::launch;
