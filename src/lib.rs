pub mod config;
pub mod content;
pub mod db;
pub mod domain;
pub mod paths;
pub mod progress;
pub mod quiz;
pub mod srs;

#[cfg(any(test, feature = "testing"))]
pub mod testing;
