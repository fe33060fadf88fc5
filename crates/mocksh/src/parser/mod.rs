//! Command-line parser
//!
//! Turns one input string into chains of pipelines of argv-style stages:
//! split on `&&`, then on `|` (both quote-aware, backslashes preserved),
//! then tokenize each stage into shell words (quotes and escapes consumed).
//! Empty chains and stages are dropped, so blank or all-separator input
//! parses to an empty command line, which the engine treats as a no-op.

mod ast;
mod split;
mod words;

pub use ast::{CommandLine, Pipeline, Stage};
pub use split::split_outside_quotes;
pub use words::{join_words, quote_word, split_words};

use crate::error::Result;

/// Parse a raw command string. Pure function of its input.
pub fn parse_command_line(command: &str) -> Result<CommandLine> {
    let mut chains = Vec::new();
    for chain in split_outside_quotes(command, "&&") {
        if chain.is_empty() {
            continue;
        }
        let mut stages = Vec::new();
        for stage in split_outside_quotes(&chain, "|") {
            if stage.is_empty() {
                continue;
            }
            stages.push(Stage {
                argv: split_words(&stage)?,
            });
        }
        if !stages.is_empty() {
            chains.push(Pipeline { stages });
        }
    }
    Ok(CommandLine { chains })
}
