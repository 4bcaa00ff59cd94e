pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod poller;
pub mod riot;
pub mod sync;
pub mod time;
pub mod trigger;
