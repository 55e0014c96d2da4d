//! Target platforms and the host-default compiler table.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur when resolving a target platform.
#[derive(Error, Debug)]
pub enum ToolchainError {
    #[error("unsupported platform '{0}', expected one of: gcc, clang, avr-gcc, arm-none-eabi-gcc")]
    UnsupportedPlatform(String),

    #[error("unsupported host operating system '{0}', pass a platform explicitly")]
    UnsupportedHost(String),
}

/// A supported C toolchain, named by its compiler executable.
///
/// The manifest stores the compiler name verbatim in its `platform` field;
/// everything that consumes the field parses it back through [`FromStr`],
/// so an unrecognized platform fails before any generation or compilation
/// starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toolchain {
    /// Host GCC.
    Gcc,
    /// Host Clang.
    Clang,
    /// AVR cross compiler (ATmega/ATtiny targets).
    AvrGcc,
    /// ARM bare-metal cross compiler (Cortex-M targets).
    ArmNoneEabiGcc,
}

impl Toolchain {
    /// Returns the compiler executable name.
    #[must_use]
    pub fn compiler(&self) -> &'static str {
        match self {
            Self::Gcc => "gcc",
            Self::Clang => "clang",
            Self::AvrGcc => "avr-gcc",
            Self::ArmNoneEabiGcc => "arm-none-eabi-gcc",
        }
    }

    /// Picks the default toolchain for the host operating system.
    ///
    /// The table is fixed: Linux and Windows default to GCC, macOS to
    /// Clang. Any other host is an error, never a silent fallback.
    ///
    /// # Errors
    ///
    /// Returns an error if the host operating system has no table entry.
    pub fn host_default() -> Result<Self, ToolchainError> {
        Self::default_for(std::env::consts::OS)
    }

    fn default_for(os: &str) -> Result<Self, ToolchainError> {
        match os {
            "linux" | "windows" => Ok(Self::Gcc),
            "macos" => Ok(Self::Clang),
            other => Err(ToolchainError::UnsupportedHost(other.to_string())),
        }
    }
}

impl fmt::Display for Toolchain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.compiler())
    }
}

impl FromStr for Toolchain {
    type Err = ToolchainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gcc" => Ok(Self::Gcc),
            "clang" => Ok(Self::Clang),
            "avr-gcc" => Ok(Self::AvrGcc),
            "arm-none-eabi-gcc" => Ok(Self::ArmNoneEabiGcc),
            _ => Err(ToolchainError::UnsupportedPlatform(s.to_string())),
        }
    }
}
