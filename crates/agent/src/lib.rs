pub mod catalog;
pub mod classify;
pub mod parser;
pub mod pipeline;
pub mod prompt;
pub mod registry;
