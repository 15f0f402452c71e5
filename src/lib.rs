pub mod api;
pub mod cli;
pub mod environment;
pub mod logging;
pub mod manifest;
