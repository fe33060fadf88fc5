//! adb builtin - device log simulator
//!
//! Not a device bridge: `adb logcat -d` replays the `ADB_LOGCAT`
//! environment value, which scenario modules seed with whatever log lines
//! the exercise needs leaked.

use async_trait::async_trait;

use super::{Builtin, Context};
use crate::error::Result;
use crate::shell::ExecResult;

/// The adb builtin. Only `adb logcat -d` is understood.
pub struct Adb;

#[async_trait]
impl Builtin for Adb {
    async fn run(&self, ctx: Context<'_>) -> Result<ExecResult> {
        if ctx.args.len() >= 2 && ctx.args[0] == "logcat" && ctx.args[1] == "-d" {
            let mut logs = ctx.ctx.env_var("ADB_LOGCAT").unwrap_or_default().to_string();
            if !logs.is_empty() && !logs.ends_with('\n') {
                logs.push('\n');
            }
            return Ok(ExecResult::ok(logs));
        }
        Ok(ExecResult::err("adb: only 'adb logcat -d' is supported", 1))
    }
}
