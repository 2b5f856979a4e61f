//! Library side of the `labelctl` command-line tool.

pub mod inputs;
pub mod logging;
pub mod templates;
