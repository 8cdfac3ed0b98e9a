//! Configuration model for arbor.
//!
//! This module defines the Config struct that represents `.arbor.yaml` at the
//! repository root. Parsing is forward-compatible (unknown fields are ignored),
//! every field has a default, and values are validated after loading.

mod model;
mod operations;


pub use model::{CONFIG_FILE_NAME, Config};
