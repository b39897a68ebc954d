//! Module matrices and the encoder seam that produces them.

use qrcode::{Color, EcLevel, QrCode};
use serde::{Deserialize, Serialize};

use crate::error::{StudioError, StudioResult};

// ============================================================================
// ErrorCorrection
// ============================================================================

/// Error-correction level, ordered from lowest to highest redundancy.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub enum ErrorCorrection {
    L,
    #[default]
    M,
    Q,
    H,
}

impl From<ErrorCorrection> for EcLevel {
    fn from(level: ErrorCorrection) -> Self {
        match level {
            ErrorCorrection::L => EcLevel::L,
            ErrorCorrection::M => EcLevel::M,
            ErrorCorrection::Q => EcLevel::Q,
            ErrorCorrection::H => EcLevel::H,
        }
    }
}

impl std::str::FromStr for ErrorCorrection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "L" => Ok(Self::L),
            "M" => Ok(Self::M),
            "Q" => Ok(Self::Q),
            "H" => Ok(Self::H),
            other => Err(format!("unknown error-correction level '{other}'")),
        }
    }
}

// ============================================================================
// ModuleMatrix
// ============================================================================

/// A square boolean grid; `true` marks a dark module.
///
/// Stored row-major. Never mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleMatrix {
    size: usize,
    modules: Vec<bool>,
}

impl ModuleMatrix {
    /// Builds a matrix from row-major modules.
    ///
    /// Returns `None` unless `modules.len() == size * size`.
    pub fn new(size: usize, modules: Vec<bool>) -> Option<Self> {
        (modules.len() == size * size).then_some(Self { size, modules })
    }

    /// An all-light matrix, mostly useful for building test grids.
    pub fn empty(size: usize) -> Self {
        Self {
            size,
            modules: vec![false; size * size],
        }
    }

    /// Returns a copy with the module at `(x, y)` set dark.
    pub fn with_dark(mut self, x: usize, y: usize) -> Self {
        if x < self.size && y < self.size {
            self.modules[y * self.size + x] = true;
        }
        self
    }

    /// Side length N.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Module at column `x`, row `y`. Out-of-range cells are light.
    pub fn get(&self, x: usize, y: usize) -> bool {
        x < self.size && y < self.size && self.modules[y * self.size + x]
    }

    /// Number of dark modules.
    pub fn dark_count(&self) -> usize {
        self.modules.iter().filter(|m| **m).count()
    }

    /// Iterates `(x, y)` of every dark module in row-major order.
    pub fn dark_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let size = self.size;
        self.modules
            .iter()
            .enumerate()
            .filter(|(_, dark)| **dark)
            .map(move |(i, _)| (i % size, i / size))
    }
}

// ============================================================================
// MatrixProvider
// ============================================================================

/// Produces a module matrix for a payload.
///
/// N is chosen solely by the provider from payload length and level.
pub trait MatrixProvider {
    fn encode(&self, payload: &str, level: ErrorCorrection) -> StudioResult<ModuleMatrix>;
}

/// [`MatrixProvider`] backed by the `qrcode` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct QrEncoder;

impl MatrixProvider for QrEncoder {
    fn encode(&self, payload: &str, level: ErrorCorrection) -> StudioResult<ModuleMatrix> {
        let code = QrCode::with_error_correction_level(payload.as_bytes(), level.into())?;
        let size = code.width();
        let modules = code
            .to_colors()
            .into_iter()
            .map(|c| c == Color::Dark)
            .collect();
        ModuleMatrix::new(size, modules)
            .ok_or_else(|| StudioError::generation("encoder returned a non-square matrix"))
    }
}
