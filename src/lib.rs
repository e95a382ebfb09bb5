pub mod error;
pub mod html_tree;
pub mod report;
pub mod runtime;
pub mod sources;
pub mod types;
