//! One module per subcommand

pub mod batch;
pub mod info;
pub mod render;
