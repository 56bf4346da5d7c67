use thiserror::Error;

/// Reasons an edit to the grid was rejected. The plain mutators on
/// [Pathfinder](crate::Pathfinder) swallow these; the `try_` variants return them.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum EditError {
    #[error("({x}, {y}) lies outside the grid")]
    OutOfBounds { x: i32, y: i32 },
    #[error("start and end cells cannot become walls")]
    MarkerCell,
    #[error("the grid cannot be edited while a search is in progress or finished")]
    SearchActive,
    #[error("expected a {expected:?} grid but found {found:?}")]
    SizeMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },
    #[error("the maze is still being generated")]
    UnfinishedMaze,
}

/// Errors raised while loading a [Config](crate::config::Config).
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config value for `{field}`: must be at least 1")]
    Invalid { field: &'static str },
}
