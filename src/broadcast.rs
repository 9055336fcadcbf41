//! Paced, permission-gated mention broadcasts.

mod commands;
mod job;

pub use commands::broadcast_commands;
pub use job::{
    BroadcastJob, BroadcastReport, BroadcastState, PacedBroadcaster, REQUIRED_PERMISSION,
    REQUIRED_PERMISSION_NAME,
};
