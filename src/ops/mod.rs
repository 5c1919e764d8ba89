pub mod export;
pub mod filter;
pub mod history;
pub mod import;
pub mod session;
pub mod stats;
