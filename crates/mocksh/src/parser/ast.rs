//! Parsed command-line structure

/// One parsed command line: chains separated by `&&`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandLine {
    pub chains: Vec<Pipeline>,
}

/// One chain: pipeline stages separated by `|`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pipeline {
    pub stages: Vec<Stage>,
}

/// One stage: an argv, `argv[0]` being the command name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stage {
    pub argv: Vec<String>,
}

impl CommandLine {
    /// Total stage count across all chains, the quantity the stage limit
    /// applies to.
    pub fn stage_count(&self) -> usize {
        self.chains.iter().map(|p| p.stages.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }
}
