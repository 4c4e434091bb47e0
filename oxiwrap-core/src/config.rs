//! Run configuration.

/// Settings shared by every operation of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunConfig {
    /// Output level: negative is quiet, 0 is normal, 1 and up add detail.
    pub verbosity: i8,
    /// Allow external programs to prompt the user.
    pub interactive: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            verbosity: 0,
            interactive: true,
        }
    }
}

impl RunConfig {
    /// Create a configuration.
    pub fn new(verbosity: i8, interactive: bool) -> Self {
        Self {
            verbosity,
            interactive,
        }
    }

    /// Same settings with a different verbosity.
    pub fn with_verbosity(self, verbosity: i8) -> Self {
        Self { verbosity, ..self }
    }
}
