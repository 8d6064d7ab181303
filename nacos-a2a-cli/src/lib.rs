//! # nacos-a2a-cli
//!
//! `nacos-a2a plan` shows what registering an agent would do, without
//! talking to a Nacos server. `nacos-a2a overlay` shows the transport
//! overrides found in the environment.

pub mod cli;
pub mod commands;

pub use cli::{Cli, Commands, PlanArgs};
