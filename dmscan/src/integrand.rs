use partons::{Flavor, PartonDensity};
use thiserror::Error;

/// Conditioning factor applied to every hadronic integrand value. The raw
/// convolution sits deep below 1 and starves double precision inside an
/// adaptive integrator, so it is scaled up wholesale. The value is
/// arbitrary; only relative scales matter, and any absolute cross section
/// derived downstream must divide it back out.
pub const HADRONIC_RESCALE: f64 = 1e8;

#[derive(Debug, Error)]
pub enum EvaluatorError {
    #[error("collider energy parameter must be positive, got {0}")]
    NonPositiveEnergy(f64),
    #[error(transparent)]
    Pdf(#[from] partons::PdfError),
}

/// Differential cross-section integrands for dark-matter pair production
/// through an s-channel mediator, at parton and at hadron level.
///
/// The hadronic integrands convolve the partonic formula with two beam
/// densities from the injected interpolator; the handle is owned for the
/// evaluator's whole lifetime and never mutated. Everything else is pure
/// arithmetic per call, so an evaluator can be handed to a numerical
/// integrator as-is.
pub struct IntegrandEvaluator {
    pdf: Box<dyn PartonDensity>,
    collider_energy: f64,
}

/// Parton-level integrand in `s` for a vector mediator. Zero below the
/// pair-production threshold `s < 4 m_dm²`; that is the kinematic boundary,
/// not an error. On resonance with a vanishing width the denominator is
/// allowed to vanish and the IEEE non-finite result propagates to the
/// caller's tolerance logic.
pub fn parton_vector(s: f64, gamma: f64, m_med: f64, m_dm: f64) -> f64 {
    if s < 4. * m_dm * m_dm {
        return 0.;
    }
    let numerator = (s - 4. * m_dm * m_dm).sqrt() * (s + 2. * m_dm * m_dm);
    let m2 = m_med * m_med;
    let denominator = s.sqrt() * (gamma * gamma * m2 + (m2 - s) * (m2 - s));
    numerator / denominator
}

/// Parton-level integrand in `s` for an axial-vector mediator. Same
/// propagator as the vector case; the numerator carries the `p-wave`
/// threshold factor `(s - 4 m_dm²)^{3/2}` instead.
pub fn parton_axial_vector(s: f64, gamma: f64, m_med: f64, m_dm: f64) -> f64 {
    if s < 4. * m_dm * m_dm {
        return 0.;
    }
    let numerator = (s - 4. * m_dm * m_dm).powf(1.5);
    let m2 = m_med * m_med;
    let denominator = s.sqrt() * (gamma * gamma * m2 + (m2 - s) * (m2 - s));
    numerator / denominator
}

impl IntegrandEvaluator {
    pub fn new(pdf: Box<dyn PartonDensity>, collider_energy: f64) -> Result<IntegrandEvaluator, EvaluatorError> {
        if !(collider_energy > 0.) {
            return Err(EvaluatorError::NonPositiveEnergy(collider_energy));
        }
        Ok(IntegrandEvaluator {
            pdf,
            collider_energy,
        })
    }

    /// Load the named member of a PDF set and bind it to a fresh evaluator.
    /// A set the library cannot locate is fatal here; the evaluator is
    /// never left partially usable.
    #[cfg(feature = "lhapdf")]
    pub fn from_named_set(
        set_name: &str,
        member: i32,
        collider_energy: f64,
    ) -> Result<IntegrandEvaluator, EvaluatorError> {
        let pdf = partons::LhapdfSet::load(set_name, member)?;
        IntegrandEvaluator::new(Box::new(pdf), collider_energy)
    }

    pub fn collider_energy(&self) -> f64 {
        self.collider_energy
    }

    pub fn parton_vector(&self, s: f64, gamma: f64, m_med: f64, m_dm: f64) -> f64 {
        parton_vector(s, gamma, m_med, m_dm)
    }

    pub fn parton_axial_vector(&self, s: f64, gamma: f64, m_med: f64, m_dm: f64) -> f64 {
        parton_axial_vector(s, gamma, m_med, m_dm)
    }

    /// Hadron-level integrand in the momentum fractions `(x1, x2)` for a
    /// vector mediator: the partonic formula at `s_hat`, weighted by the
    /// quark density of beam 1 and the antiquark density of beam 2 at the
    /// `s_hat` scale. The quark is always drawn from beam 1; the swapped
    /// assignment is a separate production channel and is deliberately not
    /// folded in here.
    pub fn hadronic_vector(
        &self,
        x1: f64,
        x2: f64,
        flavor: Flavor,
        gamma: f64,
        m_med: f64,
        m_dm: f64,
    ) -> f64 {
        let s_hat = self.collider_energy * x1 * x2;
        let parton = parton_vector(s_hat, gamma, m_med, m_dm);
        let q = self.pdf.xfx_q2(flavor.pdg_id(), x1, s_hat);
        let qbar = self.pdf.xfx_q2(flavor.anti_pdg_id(), x2, s_hat);
        HADRONIC_RESCALE * q * qbar * parton
    }

    /// Hadron-level integrand for an axial-vector mediator; identical
    /// convolution around the axial-vector partonic formula.
    pub fn hadronic_axial_vector(
        &self,
        x1: f64,
        x2: f64,
        flavor: Flavor,
        gamma: f64,
        m_med: f64,
        m_dm: f64,
    ) -> f64 {
        let s_hat = self.collider_energy * x1 * x2;
        let parton = parton_axial_vector(s_hat, gamma, m_med, m_dm);
        let q = self.pdf.xfx_q2(flavor.pdg_id(), x1, s_hat);
        let qbar = self.pdf.xfx_q2(flavor.anti_pdg_id(), x2, s_hat);
        HADRONIC_RESCALE * q * qbar * parton
    }

    /// Integration range in `s` for the partonic integrands.
    pub fn parton_s_bounds(&self, m_dm: f64) -> (f64, f64) {
        (4. * m_dm * m_dm, self.collider_energy)
    }

    /// Range of `x1` at fixed `x2`; the lower edge keeps `s_hat` above the
    /// pair-production threshold.
    pub fn x1_bounds(&self, x2: f64, m_dm: f64) -> (f64, f64) {
        (4. * m_dm * m_dm / (x2 * self.collider_energy), 1.)
    }

    pub fn x2_bounds(&self, m_dm: f64) -> (f64, f64) {
        (4. * m_dm * m_dm / self.collider_energy, 1.)
    }

    /// Location of the resonance ridge in `x1` at fixed `x2`, for an
    /// integrator to sample around. `None` when the mediator cannot reach
    /// its mass shell above the threshold.
    pub fn x1_resonance(&self, x2: f64, m_med: f64, m_dm: f64) -> Option<f64> {
        if m_med < 2. * m_dm {
            None
        } else {
            Some(m_med * m_med / (x2 * self.collider_energy))
        }
    }
}

/// Points of interest in `s` that help an adaptive integrator find the
/// resonance peak.
pub fn parton_s_points(gamma: f64, m_med: f64) -> [f64; 4] {
    let m2 = m_med * m_med;
    [m_med, m2 - gamma, m2, m2 + gamma]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Interpolator stub with one constant density per beam side.
    struct TwoBeam {
        quark: f64,
        antiquark: f64,
    }

    impl PartonDensity for TwoBeam {
        fn xfx_q2(&self, pdg_id: i32, _x: f64, _q2: f64) -> f64 {
            if pdg_id > 0 {
                self.quark
            } else {
                self.antiquark
            }
        }
    }

    fn evaluator(quark: f64, antiquark: f64, energy: f64) -> IntegrandEvaluator {
        IntegrandEvaluator::new(Box::new(TwoBeam { quark, antiquark }), energy).unwrap()
    }

    #[test]
    fn construction_rejects_bad_energy() {
        assert!(IntegrandEvaluator::new(Box::new(TwoBeam { quark: 1., antiquark: 1. }), 0.).is_err());
        assert!(IntegrandEvaluator::new(Box::new(TwoBeam { quark: 1., antiquark: 1. }), -13000.).is_err());
        assert!(IntegrandEvaluator::new(Box::new(TwoBeam { quark: 1., antiquark: 1. }), 13000.).is_ok());
    }

    #[test]
    fn below_threshold_is_exactly_zero() {
        for s in [0., 1000., 39999.9] {
            assert_eq!(parton_vector(s, 5., 200., 100.), 0.);
            assert_eq!(parton_axial_vector(s, 5., 200., 100.), 0.);
        }
        // At the threshold itself the numerator vanishes.
        assert_eq!(parton_vector(40000., 5., 200., 100.), 0.);
        assert_eq!(parton_axial_vector(40000., 5., 200., 100.), 0.);
    }

    #[test]
    fn positive_above_threshold_off_resonance() {
        assert!(parton_vector(50000., 5., 200., 100.) > 0.);
        assert!(parton_axial_vector(50000., 5., 200., 100.) > 0.);
    }

    #[test]
    fn on_resonance_value_matches_hand_computation() {
        // s = m_med² = 90000 with the pole term vanishing exactly.
        let expected = (50000f64.sqrt() * 110000.) / (300. * (25. * 90000.));
        assert_relative_eq!(
            parton_vector(90000., 5., 300., 100.),
            expected,
            max_relative = 1e-12
        );

        let expected_axial = 50000f64.powf(1.5) / (300. * (25. * 90000.));
        assert_relative_eq!(
            parton_axial_vector(90000., 5., 300., 100.),
            expected_axial,
            max_relative = 1e-12
        );
    }

    #[test]
    fn off_resonance_pole_term_enters_denominator() {
        let expected = (50000f64.sqrt() * 110000.)
            / (300. * (25. * 40000. + (40000f64 - 90000.) * (40000f64 - 90000.)));
        assert_relative_eq!(
            parton_vector(90000., 5., 200., 100.),
            expected,
            max_relative = 1e-12
        );
    }

    #[test]
    fn integrand_grows_without_bound_as_width_closes() {
        let s = 90000.;
        let mut previous = 0.;
        for &gamma in &[1., 0.1, 0.01, 0.001] {
            let value = parton_vector(s, gamma, 300., 100.);
            assert!(value > previous);
            previous = value;
        }
        // The degenerate point itself is non-finite, not an error.
        assert!(!parton_vector(s, 0., 300., 100.).is_finite());
    }

    #[test]
    fn hadronic_factorizes_into_densities_and_partonic_value() {
        let eval = evaluator(3., 7., 13000.);
        let (gamma, m_med, m_dm) = (2., 50., 10.);
        let s_hat = 13000. * 0.5 * 0.5;
        assert_relative_eq!(s_hat, 3250.);
        let expected = HADRONIC_RESCALE * 3. * 7. * parton_vector(s_hat, gamma, m_med, m_dm);
        assert_relative_eq!(
            eval.hadronic_vector(0.5, 0.5, Flavor::Up, gamma, m_med, m_dm),
            expected,
            max_relative = 1e-12
        );
        let expected_axial =
            HADRONIC_RESCALE * 3. * 7. * parton_axial_vector(s_hat, gamma, m_med, m_dm);
        assert_relative_eq!(
            eval.hadronic_axial_vector(0.5, 0.5, Flavor::Up, gamma, m_med, m_dm),
            expected_axial,
            max_relative = 1e-12
        );
    }

    #[test]
    fn hadronic_scales_linearly_with_each_density() {
        let base = evaluator(1., 1., 13000.);
        let doubled = evaluator(2., 1., 13000.);
        let args = (0.4, 0.6, Flavor::Down, 5., 200., 20.);
        let b = base.hadronic_vector(args.0, args.1, args.2, args.3, args.4, args.5);
        let d = doubled.hadronic_vector(args.0, args.1, args.2, args.3, args.4, args.5);
        assert_relative_eq!(d, 2. * b, max_relative = 1e-12);
    }

    #[test]
    fn beam_assignment_is_not_symmetrized() {
        // Quark density at x1 from beam 1, antiquark density at x2 from
        // beam 2, never the reverse assignment. A side-sensitive stub pins
        // the ordering.
        struct SideSensitive;
        impl PartonDensity for SideSensitive {
            fn xfx_q2(&self, pdg_id: i32, x: f64, _q2: f64) -> f64 {
                if pdg_id > 0 {
                    x
                } else {
                    x * x
                }
            }
        }
        let eval = IntegrandEvaluator::new(Box::new(SideSensitive), 13000.).unwrap();
        let s_hat = 13000. * 0.3 * 0.6;
        let expected =
            HADRONIC_RESCALE * 0.3 * (0.6 * 0.6) * parton_vector(s_hat, 5., 200., 20.);
        assert_relative_eq!(
            eval.hadronic_vector(0.3, 0.6, Flavor::Up, 5., 200., 20.),
            expected,
            max_relative = 1e-12
        );
    }

    #[test]
    fn bounds_track_threshold_and_energy() {
        let eval = evaluator(1., 1., 13000.);
        assert_eq!(eval.parton_s_bounds(10.), (400., 13000.));
        let (lo, hi) = eval.x2_bounds(10.);
        assert_relative_eq!(lo, 400. / 13000.);
        assert_eq!(hi, 1.);
        let (lo, hi) = eval.x1_bounds(0.5, 10.);
        assert_relative_eq!(lo, 400. / 6500.);
        assert_eq!(hi, 1.);

        assert!(eval.x1_resonance(0.5, 50., 100.).is_none());
        assert_relative_eq!(eval.x1_resonance(0.5, 300., 100.).unwrap(), 90000. / 6500.);
    }

    #[test]
    fn resonance_points_bracket_the_pole() {
        let points = parton_s_points(5., 300.);
        assert_eq!(points, [300., 89995., 90000., 90005.]);
    }
}
