//! CLI command implementations

pub mod evaluate;
pub mod init_config;
pub mod recommend;
pub mod tree;
