use crate::width::{self, Mediator};
use std::f64::consts::FRAC_PI_2;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("mediator and dark-matter mass arrays must have equal length ({m_med} vs {m_dm})")]
    MassLengthMismatch { m_med: usize, m_dm: usize },
    #[error("a scan needs at least one mass point")]
    EmptyScan,
    #[error("reference scan must carry a single value of each coupling")]
    MixedReferenceCouplings,
    #[error("no {method} rescaling is available for the {to} model")]
    UnavailableModel { method: &'static str, to: &'static str },
    #[error("the {method} method cannot convert between {from} and {to} models")]
    IncompatibleModels {
        method: &'static str,
        from: &'static str,
        to: &'static str,
    },
    #[error("observed limit needs one coupling value per mass point ({masses} vs {limits})")]
    LimitLengthMismatch { masses: usize, limits: usize },
    #[error("exclusion depths are only defined for vector or axial couplings")]
    UnsupportedLimitModel,
}

/// One point in mediator/dark-matter parameter space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanPoint {
    pub m_med: f64,
    pub m_dm: f64,
    pub gq: f64,
    pub gdm: f64,
    pub gl: f64,
}

/// A parameter scan: paired mediator/DM mass arrays, each point carrying a
/// coupling triple, under one mediator hypothesis.
#[derive(Debug, Clone)]
pub struct ModelScan {
    mediator: Mediator,
    points: Vec<ScanPoint>,
}

impl ModelScan {
    /// Scan over paired mass arrays with a common coupling triple.
    pub fn new(
        mediator: Mediator,
        m_med: &[f64],
        m_dm: &[f64],
        gq: f64,
        gdm: f64,
        gl: f64,
    ) -> Result<ModelScan, ScanError> {
        if m_med.len() != m_dm.len() {
            return Err(ScanError::MassLengthMismatch {
                m_med: m_med.len(),
                m_dm: m_dm.len(),
            });
        }
        let points = m_med
            .iter()
            .zip(m_dm)
            .map(|(&m_med, &m_dm)| ScanPoint {
                m_med,
                m_dm,
                gq,
                gdm,
                gl,
            })
            .collect();
        ModelScan::from_points(mediator, points)
    }

    pub fn from_points(mediator: Mediator, points: Vec<ScanPoint>) -> Result<ModelScan, ScanError> {
        if points.is_empty() {
            return Err(ScanError::EmptyScan);
        }
        Ok(ModelScan { mediator, points })
    }

    pub fn mediator(&self) -> Mediator {
        self.mediator
    }

    pub fn points(&self) -> &[ScanPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    fn map_points(&self, f: impl Fn(&ScanPoint) -> f64) -> Vec<f64> {
        self.points.iter().map(f).collect()
    }

    pub fn total_widths(&self) -> Vec<f64> {
        let mediator = self.mediator;
        self.map_points(|p| width::total_width(mediator, p.m_med, p.m_dm, p.gq, p.gdm, p.gl))
    }

    pub fn partial_widths_quarks(&self) -> Vec<f64> {
        let mediator = self.mediator;
        self.map_points(|p| width::partial_width_quarks(mediator, p.m_med, p.gq))
    }

    pub fn partial_widths_dm(&self) -> Vec<f64> {
        let mediator = self.mediator;
        self.map_points(|p| width::partial_width_dm(mediator, p.m_med, p.m_dm, p.gdm))
    }

    pub fn partial_widths_leptons(&self) -> Vec<f64> {
        let mediator = self.mediator;
        self.map_points(|p| width::partial_width_leptons(mediator, p.m_med, p.gl))
    }

    /// Branching ratio into the dark-matter pair at each point.
    pub fn br_dm(&self) -> Vec<f64> {
        let mediator = self.mediator;
        self.map_points(|p| {
            width::partial_width_dm(mediator, p.m_med, p.m_dm, p.gdm)
                / width::total_width(mediator, p.m_med, p.m_dm, p.gq, p.gdm, p.gl)
        })
    }

    /// Relative cross section from the analytic integral of the Breit-Wigner
    /// propagator over `s`, scaled by the production and decay couplings.
    /// Good within one mediator hypothesis; it knows nothing about the
    /// numerator structure that differs between hypotheses.
    pub fn propagator_relative(&self) -> Vec<f64> {
        let mediator = self.mediator;
        self.map_points(|p| {
            let gamma = width::total_width(mediator, p.m_med, p.m_dm, p.gq, p.gdm, p.gl);
            let arctan_factor =
                FRAC_PI_2 + ((p.m_med * p.m_med - 4. * p.m_dm * p.m_dm) / (p.m_med * gamma)).atan();
            p.gq * p.gq * p.gdm * p.gdm * arctan_factor / (p.m_med * gamma)
        })
    }
}
