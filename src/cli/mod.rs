//! CLI argument parsing.

mod args;
pub mod validators;

pub use args::{
    Cli, Command, ConfigAction, CusumArgs, DetectArgs, DetectionArgs, EvaluateArgs, GlobalArgs,
    MonitorArgs, StreamArgs,
};
