//! Parton flavors and the beam-density capability consumed by the
//! cross-section integrands.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("unsupported parton flavor id {0}, expected a quark id in 1..=5")]
    UnsupportedFlavor(i32),
    #[error("PDF set name must not be empty")]
    EmptySetName,
    #[error("PDF member index must not be negative, got {0}")]
    InvalidMember(i32),
}

/// Quark flavors for which beam densities are looked up. The antiquark
/// density of the second beam is always derived from the conjugate PDG id,
/// so only the quark side is representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flavor {
    Down,
    Up,
    Strange,
    Charm,
    Bottom,
}

impl Flavor {
    pub const ALL: [Flavor; 5] = [
        Flavor::Down,
        Flavor::Up,
        Flavor::Strange,
        Flavor::Charm,
        Flavor::Bottom,
    ];

    /// PDG Monte Carlo numbering of the quark.
    pub fn pdg_id(self) -> i32 {
        match self {
            Flavor::Down => 1,
            Flavor::Up => 2,
            Flavor::Strange => 3,
            Flavor::Charm => 4,
            Flavor::Bottom => 5,
        }
    }

    /// PDG id of the antiquark partner.
    pub fn anti_pdg_id(self) -> i32 {
        -self.pdg_id()
    }

    pub fn from_pdg(id: i32) -> Result<Flavor, PdfError> {
        match id {
            1 => Ok(Flavor::Down),
            2 => Ok(Flavor::Up),
            3 => Ok(Flavor::Strange),
            4 => Ok(Flavor::Charm),
            5 => Ok(Flavor::Bottom),
            _ => Err(PdfError::UnsupportedFlavor(id)),
        }
    }
}

/// Black-box parton-density interpolator.
///
/// Implementations return the momentum density `x·f(x, Q²)` for the parton
/// with the given PDG id, exactly as the backing interpolation engine
/// defines it. Queries outside the tabulated `(x, Q²)` range follow the
/// backend's own contract and are passed through untouched. Whether a
/// handle may be shared across threads is likewise the backend's guarantee;
/// no locking is added here.
pub trait PartonDensity {
    fn xfx_q2(&self, pdg_id: i32, x: f64, q2: f64) -> f64;
}

#[cfg(feature = "lhapdf")]
mod lhapdf_backend {
    use super::{PartonDensity, PdfError};
    use lhapdf::Pdf;

    /// A loaded member of a named LHAPDF set.
    ///
    /// Loading is fatal on failure: a set the library cannot locate brings
    /// the process down inside LHAPDF itself, so the handle either exists
    /// and is usable for its whole lifetime or was never constructed.
    pub struct LhapdfSet {
        pdf: Pdf,
    }

    impl LhapdfSet {
        pub fn load(set_name: &str, member: i32) -> Result<LhapdfSet, PdfError> {
            if set_name.is_empty() {
                return Err(PdfError::EmptySetName);
            }
            if member < 0 {
                return Err(PdfError::InvalidMember(member));
            }
            Ok(LhapdfSet {
                pdf: Pdf::new(set_name, member),
            })
        }
    }

    impl PartonDensity for LhapdfSet {
        fn xfx_q2(&self, pdg_id: i32, x: f64, q2: f64) -> f64 {
            self.pdf.xfx_q2(pdg_id, x, q2)
        }
    }
}

#[cfg(feature = "lhapdf")]
pub use crate::lhapdf_backend::LhapdfSet;
