pub mod client;
pub mod document;
pub mod memory;
pub mod patch;
pub mod record;
