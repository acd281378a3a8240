use num::Complex;
use std::f64::consts::PI;
use thiserror::Error;

/// Quark masses in GeV, PDG 2018 values, light to top.
const QUARK_MASSES: [f64; 6] = [0.0022, 0.0047, 0.095, 1.275, 4.180, 173.0];

/// Charged lepton masses in GeV.
const LEPTON_MASSES: [f64; 3] = [0.000511, 0.105658, 1.77686];

/// Electroweak vev in GeV, sets the Yukawa normalization of the
/// (pseudo)scalar quark couplings.
const VEV: f64 = 246.0;

/// Strong coupling entering the gluon loop width.
const ALPHA_S: f64 = 0.130;

/// Spin/parity structure of the s-channel mediator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mediator {
    Vector,
    Axial,
    Scalar,
    Pseudoscalar,
}

#[derive(Debug, Error)]
#[error("unknown mediator type '{0}', expected vector, axial, scalar or pseudoscalar")]
pub struct UnknownMediator(pub String);

impl Mediator {
    pub fn name(self) -> &'static str {
        match self {
            Mediator::Vector => "vector",
            Mediator::Axial => "axial",
            Mediator::Scalar => "scalar",
            Mediator::Pseudoscalar => "pseudoscalar",
        }
    }

    pub fn from_name(name: &str) -> Result<Mediator, UnknownMediator> {
        match name {
            "vector" => Ok(Mediator::Vector),
            "axial" => Ok(Mediator::Axial),
            "scalar" => Ok(Mediator::Scalar),
            "pseudoscalar" => Ok(Mediator::Pseudoscalar),
            _ => Err(UnknownMediator(name.to_owned())),
        }
    }

    /// The spin-1 mediators couple to leptons via `gl`; the spin-0 ones
    /// have no lepton coupling in this model.
    pub fn couples_to_leptons(self) -> bool {
        match self {
            Mediator::Vector | Mediator::Axial => true,
            Mediator::Scalar | Mediator::Pseudoscalar => false,
        }
    }
}

#[inline]
fn z(m_med: f64, m: f64) -> f64 {
    m * m / (m_med * m_med)
}

/// Two-body phase-space and spin factor for a fermion pair with
/// `z = m_f²/m_med²`, per mediator structure.
#[inline]
fn pair_factor(mediator: Mediator, z: f64) -> f64 {
    match mediator {
        Mediator::Vector => (1. - 4. * z).sqrt() * (1. + 2. * z),
        Mediator::Axial => (1. - 4. * z).powf(1.5),
        Mediator::Scalar => (1. - 4. * z).powf(1.5),
        Mediator::Pseudoscalar => (1. - 4. * z).sqrt(),
    }
}

/// On-shell partial width for mediator -> DM DM. Zero below the
/// pair-production threshold `m_med < 2 m_dm`.
pub fn partial_width_dm(mediator: Mediator, m_med: f64, m_dm: f64, gdm: f64) -> f64 {
    if m_med < 2. * m_dm {
        return 0.;
    }
    let factor = pair_factor(mediator, z(m_med, m_dm));
    match mediator {
        Mediator::Vector | Mediator::Axial => gdm * gdm * m_med / (12. * PI) * factor,
        Mediator::Scalar | Mediator::Pseudoscalar => gdm * gdm * m_med / (8. * PI) * factor,
    }
}

/// On-shell partial width for mediator -> q qbar, summed over the open
/// quark channels with color factor 3.
pub fn partial_width_quarks(mediator: Mediator, m_med: f64, gq: f64) -> f64 {
    let mut width = 0.;
    for &m_q in &QUARK_MASSES {
        if m_med < 2. * m_q {
            continue;
        }
        let factor = pair_factor(mediator, z(m_med, m_q));
        width += match mediator {
            Mediator::Vector | Mediator::Axial => 3. * gq * gq * m_med / (12. * PI) * factor,
            Mediator::Scalar | Mediator::Pseudoscalar => {
                let yq = 2f64.sqrt() * m_q / VEV;
                3. * gq * gq * yq * yq * m_med / (16. * PI) * factor
            }
        };
    }
    width
}

/// On-shell partial width for mediator -> l+ l-, summed over the open
/// charged-lepton channels. Spin-0 mediators do not decay leptonically here.
pub fn partial_width_charged_leptons(mediator: Mediator, m_med: f64, gl: f64) -> f64 {
    if !mediator.couples_to_leptons() {
        return 0.;
    }
    let mut width = 0.;
    for &m_l in &LEPTON_MASSES {
        if m_med < 2. * m_l {
            continue;
        }
        width += gl * gl * m_med / (12. * PI) * pair_factor(mediator, z(m_med, m_l));
    }
    width
}

/// Width to the three (massless) neutrino flavors.
pub fn partial_width_neutrinos(mediator: Mediator, m_med: f64, gl: f64) -> f64 {
    if !mediator.couples_to_leptons() {
        return 0.;
    }
    3. * gl * gl * m_med / (24. * PI)
}

/// Charged leptons plus neutrinos.
pub fn partial_width_leptons(mediator: Mediator, m_med: f64, gl: f64) -> f64 {
    partial_width_charged_leptons(mediator, m_med, gl) + partial_width_neutrinos(mediator, m_med, gl)
}

/// Loop-induced width to gluon pairs for the spin-0 mediators, dominated by
/// the top loop. The form factor turns complex above the top threshold.
pub fn partial_width_gluon(mediator: Mediator, m_med: f64, gq: f64) -> f64 {
    let form = match mediator {
        Mediator::Vector | Mediator::Axial => return 0.,
        Mediator::Scalar => top_loop_scalar(4. * z(m_med, QUARK_MASSES[5])),
        Mediator::Pseudoscalar => top_loop_pseudoscalar(4. * z(m_med, QUARK_MASSES[5])),
    };
    ALPHA_S * ALPHA_S * gq * gq * m_med.powi(3) / (32. * PI.powi(3) * VEV * VEV) * form.norm_sqr()
}

fn loop_arctan(tau: Complex<f64>) -> Complex<f64> {
    (Complex::new(1., 0.) / (tau - 1.).sqrt()).atan()
}

fn top_loop_scalar(tau: f64) -> Complex<f64> {
    let t = Complex::new(tau, 0.);
    let a = loop_arctan(t);
    t * (Complex::new(1., 0.) + (Complex::new(1., 0.) - t) * a * a)
}

fn top_loop_pseudoscalar(tau: f64) -> Complex<f64> {
    let t = Complex::new(tau, 0.);
    let a = loop_arctan(t);
    t * a * a
}

/// Total on-shell width, summing every channel open for the mediator type.
pub fn total_width(mediator: Mediator, m_med: f64, m_dm: f64, gq: f64, gdm: f64, gl: f64) -> f64 {
    partial_width_quarks(mediator, m_med, gq)
        + partial_width_dm(mediator, m_med, m_dm, gdm)
        + partial_width_charged_leptons(mediator, m_med, gl)
        + partial_width_neutrinos(mediator, m_med, gl)
        + partial_width_gluon(mediator, m_med, gq)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn dm_channel_closes_below_threshold() {
        for &mediator in &[
            Mediator::Vector,
            Mediator::Axial,
            Mediator::Scalar,
            Mediator::Pseudoscalar,
        ] {
            assert_eq!(partial_width_dm(mediator, 100., 100., 1.), 0.);
            assert!(partial_width_dm(mediator, 300., 100., 1.) > 0.);
        }
    }

    #[test]
    fn vector_dm_width_matches_formula() {
        // z = 0.01 for these masses.
        let expected = 1000. / (12. * PI) * 0.96f64.sqrt() * 1.02;
        assert_relative_eq!(
            partial_width_dm(Mediator::Vector, 1000., 100., 1.),
            expected,
            max_relative = 1e-12
        );
    }

    #[test]
    fn neutrino_width_is_mass_independent() {
        let expected = 3. * 0.25 * 0.25 * 1000. / (24. * PI);
        assert_relative_eq!(
            partial_width_neutrinos(Mediator::Vector, 1000., 0.25),
            expected,
            max_relative = 1e-12
        );
        assert_relative_eq!(
            partial_width_neutrinos(Mediator::Axial, 1000., 0.25),
            expected,
            max_relative = 1e-12
        );
        assert_eq!(partial_width_neutrinos(Mediator::Scalar, 1000., 0.25), 0.);
    }

    #[test]
    fn widths_scale_with_coupling_squared() {
        let w1 = partial_width_quarks(Mediator::Axial, 1000., 1.);
        let w2 = partial_width_quarks(Mediator::Axial, 1000., 2.);
        assert_relative_eq!(w2, 4. * w1, max_relative = 1e-12);
    }

    #[test]
    fn axial_width_below_vector_width() {
        // (1-4z)^{3/2} < (1-4z)^{1/2} (1+2z) for any open massive channel.
        let v = partial_width_quarks(Mediator::Vector, 20., 1.);
        let a = partial_width_quarks(Mediator::Axial, 20., 1.);
        assert!(a < v);
    }

    #[test]
    fn gluon_width_finite_on_both_sides_of_top_threshold() {
        // Below 2 m_t the loop form factor is real, above it turns complex.
        let below = partial_width_gluon(Mediator::Scalar, 100., 0.25);
        let above = partial_width_gluon(Mediator::Scalar, 1000., 0.25);
        assert!(below.is_finite() && below > 0.);
        assert!(above.is_finite() && above > 0.);

        let p_below = partial_width_gluon(Mediator::Pseudoscalar, 100., 0.25);
        let p_above = partial_width_gluon(Mediator::Pseudoscalar, 1000., 0.25);
        assert!(p_below.is_finite() && p_below > 0.);
        assert!(p_above.is_finite() && p_above > 0.);
    }

    #[test]
    fn total_width_sums_open_channels() {
        let m_med = 1000.;
        let m_dm = 100.;
        let total = total_width(Mediator::Vector, m_med, m_dm, 0.25, 1.0, 0.01);
        let sum = partial_width_quarks(Mediator::Vector, m_med, 0.25)
            + partial_width_dm(Mediator::Vector, m_med, m_dm, 1.0)
            + partial_width_charged_leptons(Mediator::Vector, m_med, 0.01)
            + partial_width_neutrinos(Mediator::Vector, m_med, 0.01);
        assert_relative_eq!(total, sum, max_relative = 1e-12);
    }

    #[test]
    fn mediator_names_round_trip() {
        for &m in &[
            Mediator::Vector,
            Mediator::Axial,
            Mediator::Scalar,
            Mediator::Pseudoscalar,
        ] {
            assert_eq!(Mediator::from_name(m.name()).unwrap(), m);
        }
        assert!(Mediator::from_name("tensor").is_err());
    }
}
