//! Process exit codes. Part of the CLI contract: scripts driving a sweep rely
//! on them.

pub const SUCCESS: i32 = 0;
pub const SWEEP_FAILED: i32 = 1; // At least one configuration failed, or the log had no metrics
pub const CONFIG_ERROR: i32 = 2; // Bad config, bad arguments, or output could not be written
