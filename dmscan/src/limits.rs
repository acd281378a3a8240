use crate::scan::{ModelScan, ScanError};
use crate::width::{self, Mediator};

/// Limit value assigned to scan masses outside the published curve; far
/// above any physical coupling, so such points are never excluded.
const UNEXCLUDED_GQ: f64 = 10.0;

/// An observed upper limit on the quark coupling versus mediator mass, as
/// published by a dijet search: a 1-D curve at a fixed dark-matter mass,
/// quoted for either a vector or an axial-vector hypothesis.
#[derive(Debug, Clone)]
pub struct DijetCouplingLimit {
    m_med: Vec<f64>,
    gq_limits: Vec<f64>,
    m_dm: f64,
    coupling: Mediator,
}

impl DijetCouplingLimit {
    /// `m_med` must be ascending and paired one-to-one with `gq_limits`.
    /// Treat decoupled dark matter by setting `m_dm` very high.
    pub fn new(
        m_med: Vec<f64>,
        gq_limits: Vec<f64>,
        m_dm: f64,
        coupling: Mediator,
    ) -> Result<DijetCouplingLimit, ScanError> {
        if m_med.len() != gq_limits.len() {
            return Err(ScanError::LimitLengthMismatch {
                masses: m_med.len(),
                limits: gq_limits.len(),
            });
        }
        if m_med.is_empty() {
            return Err(ScanError::EmptyScan);
        }
        match coupling {
            Mediator::Vector | Mediator::Axial => {}
            _ => return Err(ScanError::UnsupportedLimitModel),
        }
        Ok(DijetCouplingLimit {
            m_med,
            gq_limits,
            m_dm,
            coupling,
        })
    }

    /// Exclusion depth of each scan point: observed over predicted, so a
    /// value below one means the point is excluded.
    ///
    /// The quark-only world of the published plot cancels against itself
    /// up to the scan's `Γq²/Γtot`, leaving the interpolated limit squared
    /// times the unit-coupling quark width of that world.
    pub fn exclusion_depths(&self, scan: &ModelScan) -> Vec<f64> {
        scan.points()
            .iter()
            .map(|p| {
                let xsec_scan = {
                    let quarks = width::partial_width_quarks(scan.mediator(), p.m_med, p.gq);
                    let total = width::total_width(
                        scan.mediator(),
                        p.m_med,
                        p.m_dm,
                        p.gq,
                        p.gdm,
                        p.gl,
                    );
                    quarks * quarks / total
                };
                let limit_gq = interp(
                    p.m_med,
                    &self.m_med,
                    &self.gq_limits,
                    UNEXCLUDED_GQ,
                    UNEXCLUDED_GQ,
                );
                let plot_world_width = width::partial_width_quarks(self.coupling, p.m_med, 1.0);
                limit_gq * limit_gq * plot_world_width / xsec_scan
            })
            .collect()
    }
}

/// Piecewise-linear interpolation over an ascending grid, with constant
/// fill values on either side.
fn interp(x: f64, xs: &[f64], ys: &[f64], left: f64, right: f64) -> f64 {
    if x < xs[0] {
        return left;
    }
    if x > xs[xs.len() - 1] {
        return right;
    }
    for i in 1..xs.len() {
        if x <= xs[i] {
            let t = (x - xs[i - 1]) / (xs[i] - xs[i - 1]);
            return ys[i - 1] + t * (ys[i] - ys[i - 1]);
        }
    }
    ys[ys.len() - 1]
}
