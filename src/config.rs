//! Search configuration

use std::env::VarError;

use crate::error::SearchError;

/// The default number of recursion levels below the root's children
pub const DEFAULT_DEPTH: usize = 4;

/// Deeper trees than this are too large to build every turn
pub const MAX_DEPTH: usize = 10;

/// Environment variable overriding the search depth
pub const DEPTH_ENV_VAR: &str = "CONNECT4_DEPTH";

/// Configuration for the minimax search
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SearchConfig {
    /// How many times the tree builder recurses below the root's children.
    /// The root's children are always built, so the tree holds `depth + 1` plies.
    pub depth: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            depth: DEFAULT_DEPTH,
        }
    }
}

impl SearchConfig {
    pub fn new(depth: usize) -> Result<Self, SearchError> {
        let config = Self { depth };
        config.validate()?;
        Ok(config)
    }

    /// Reads the depth from `CONNECT4_DEPTH`, falling back to the default when unset
    pub fn from_env() -> Result<Self, SearchError> {
        Self::from_var(std::env::var(DEPTH_ENV_VAR))
    }

    pub(crate) fn from_var(value: Result<String, VarError>) -> Result<Self, SearchError> {
        match value {
            Ok(value) => Self::parse(&value),
            Err(VarError::NotPresent) => Ok(Self::default()),
            Err(VarError::NotUnicode(raw)) => Err(SearchError::InvalidDepth(
                raw.to_string_lossy().into_owned(),
            )),
        }
    }

    /// Parses a depth typed by a user or read from the environment
    pub fn parse(value: &str) -> Result<Self, SearchError> {
        let depth = value
            .trim()
            .parse::<usize>()
            .map_err(|_| SearchError::InvalidDepth(value.trim().to_string()))?;
        Self::new(depth)
    }

    pub fn validate(&self) -> Result<(), SearchError> {
        if self.depth > MAX_DEPTH {
            return Err(SearchError::DepthTooLarge {
                depth: self.depth,
                max: MAX_DEPTH,
            });
        }
        Ok(())
    }
}
