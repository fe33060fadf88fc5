//! seq builtin - print a sequence of integers

use async_trait::async_trait;

use super::{Builtin, Context};
use crate::error::Result;
use crate::shell::ExecResult;

/// Backstop against pathological ranges; the shell's output cap would
/// otherwise be reached only after generating the whole string.
const MAX_VALUES: usize = 1_000_000;

/// The seq builtin - print a sequence of integers.
///
/// Usage: seq LAST
///        seq FIRST LAST
///        seq FIRST LAST STEP
///
/// The two-argument form infers the step direction from the operand
/// order, so `seq 3 1` counts down.
pub struct Seq;

#[async_trait]
impl Builtin for Seq {
    async fn run(&self, ctx: Context<'_>) -> Result<ExecResult> {
        if ctx.args.is_empty() {
            return Ok(ExecResult::err("seq: start end [step] required", 1));
        }

        let parse = |s: &String| s.trim().parse::<i64>();
        let parsed: std::result::Result<Vec<i64>, _> = ctx.args.iter().map(parse).collect();
        let Ok(nums) = parsed else {
            return Ok(ExecResult::err("seq: numeric arguments required", 1));
        };

        let (start, end, step): (i128, i128, i128) = match nums.as_slice() {
            [end] => (1, *end as i128, 1),
            [start, end] => {
                let step = if end >= start { 1 } else { -1 };
                (*start as i128, *end as i128, step)
            }
            [start, end, step, ..] => (*start as i128, *end as i128, *step as i128),
            [] => unreachable!("args checked non-empty"),
        };

        if step == 0 {
            return Ok(ExecResult::err("seq: step must not be 0", 1));
        }

        let mut values: Vec<String> = Vec::new();
        let mut i = start;
        while (step > 0 && i <= end) || (step < 0 && i >= end) {
            values.push(i.to_string());
            if values.len() >= MAX_VALUES {
                break;
            }
            i += step;
        }

        if values.is_empty() {
            Ok(ExecResult::ok(""))
        } else {
            Ok(ExecResult::ok(format!("{}\n", values.join("\n"))))
        }
    }
}
