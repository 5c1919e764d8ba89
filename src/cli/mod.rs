pub mod commands;
pub mod console;
pub mod handlers;
pub mod output;
