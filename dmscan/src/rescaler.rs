use crate::scan::{ModelScan, ScanError, ScanPoint};
use crate::width::Mediator;

/// Scale factors for one target coupling triple, one entry per reference
/// mass point. Multiplying a signal cross section by `factors[i]` carries it
/// from the reference couplings to this triple.
#[derive(Debug, Clone)]
pub struct RescaleFactors {
    pub gq: f64,
    pub gdm: f64,
    pub gl: f64,
    pub factors: Vec<f64>,
}

/// Rescales exclusion results from a reference scan to grids of target
/// couplings, and between mediator hypotheses where the method permits it.
pub struct Rescaler {
    reference: ModelScan,
}

/// Hypothesis pairs a branching-ratio rescaling may convert between. The
/// propagator method carries no pairs: it is only trusted within one model.
const BR_GROUPS: [[Mediator; 2]; 2] = [
    [Mediator::Vector, Mediator::Axial],
    [Mediator::Scalar, Mediator::Pseudoscalar],
];

impl Rescaler {
    /// The reference scan must hold exactly one value of each coupling;
    /// anything else makes the reference cross section ambiguous.
    pub fn new(reference: ModelScan) -> Result<Rescaler, ScanError> {
        let first = reference.points()[0];
        let uniform = reference
            .points()
            .iter()
            .all(|p| p.gq == first.gq && p.gdm == first.gdm && p.gl == first.gl);
        if !uniform {
            return Err(ScanError::MixedReferenceCouplings);
        }
        Ok(Rescaler { reference })
    }

    pub fn reference(&self) -> &ModelScan {
        &self.reference
    }

    /// Rescale according to `gq²·BR`, i.e. `Γq²/Γtot`, for quark-initiated,
    /// quark-final signatures.
    pub fn rescale_by_br_quarks(
        &self,
        target_gq: &[f64],
        target_gdm: &[f64],
        target_gl: &[f64],
        model: Option<Mediator>,
    ) -> Result<Vec<RescaleFactors>, ScanError> {
        let model = model.unwrap_or_else(|| self.reference.mediator());
        self.check_method("BR", &BR_GROUPS, model)?;
        self.rescale(model, target_gq, target_gdm, target_gl, |scan| {
            let quarks = scan.partial_widths_quarks();
            let totals = scan.total_widths();
            quarks.iter().zip(&totals).map(|(q, t)| q * q / t).collect()
        })
    }

    /// Rescale according to `Γq·Γl/Γtot` for quark-initiated, lepton-final
    /// signatures.
    pub fn rescale_by_br_leptons(
        &self,
        target_gq: &[f64],
        target_gdm: &[f64],
        target_gl: &[f64],
        model: Option<Mediator>,
    ) -> Result<Vec<RescaleFactors>, ScanError> {
        let model = model.unwrap_or_else(|| self.reference.mediator());
        self.check_method("BR", &BR_GROUPS, model)?;
        self.rescale(model, target_gq, target_gdm, target_gl, |scan| {
            let quarks = scan.partial_widths_quarks();
            let leptons = scan.partial_widths_leptons();
            let totals = scan.total_widths();
            quarks
                .iter()
                .zip(&leptons)
                .zip(&totals)
                .map(|((q, l), t)| q * l / t)
                .collect()
        })
    }

    /// Rescale by the analytic propagator integral. Within one mediator
    /// hypothesis this is the best-performing method.
    pub fn rescale_by_propagator(
        &self,
        target_gq: &[f64],
        target_gdm: &[f64],
        target_gl: &[f64],
        model: Option<Mediator>,
    ) -> Result<Vec<RescaleFactors>, ScanError> {
        let model = model.unwrap_or_else(|| self.reference.mediator());
        self.check_method("propagator", &[], model)?;
        self.rescale(model, target_gq, target_gdm, target_gl, |scan| {
            scan.propagator_relative()
        })
    }

    fn check_method(
        &self,
        method: &'static str,
        groups: &[[Mediator; 2]],
        target: Mediator,
    ) -> Result<(), ScanError> {
        let reference = self.reference.mediator();
        if reference == target {
            return Ok(());
        }
        let mut available = false;
        for group in groups {
            if group.contains(&target) {
                available = true;
                if group.contains(&reference) {
                    return Ok(());
                }
            }
        }
        if available {
            Err(ScanError::IncompatibleModels {
                method,
                from: reference.name(),
                to: target.name(),
            })
        } else {
            Err(ScanError::UnavailableModel {
                method,
                to: target.name(),
            })
        }
    }

    fn rescale(
        &self,
        model: Mediator,
        target_gq: &[f64],
        target_gdm: &[f64],
        target_gl: &[f64],
        factor: impl Fn(&ModelScan) -> Vec<f64>,
    ) -> Result<Vec<RescaleFactors>, ScanError> {
        let reference_factors = factor(&self.reference);

        let mut output = Vec::with_capacity(target_gq.len() * target_gdm.len() * target_gl.len());
        for &gq in target_gq {
            for &gdm in target_gdm {
                for &gl in target_gl {
                    let target = self.target_scan(model, gq, gdm, gl)?;
                    let factors = factor(&target)
                        .iter()
                        .zip(&reference_factors)
                        .map(|(t, r)| t / r)
                        .collect();
                    output.push(RescaleFactors {
                        gq,
                        gdm,
                        gl,
                        factors,
                    });
                }
            }
        }
        Ok(output)
    }

    /// Target scan sharing the reference mass points.
    fn target_scan(
        &self,
        model: Mediator,
        gq: f64,
        gdm: f64,
        gl: f64,
    ) -> Result<ModelScan, ScanError> {
        let points = self
            .reference
            .points()
            .iter()
            .map(|p| ScanPoint {
                m_med: p.m_med,
                m_dm: p.m_dm,
                gq,
                gdm,
                gl,
            })
            .collect();
        ModelScan::from_points(model, points)
    }
}
