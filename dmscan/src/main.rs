use clap::{App, Arg, ArgMatches, SubCommand};

use dmscan::integrand;
use dmscan::rescaler::Rescaler;
use dmscan::run_card::RunCard;
use dmscan::width;

use rand::prelude::*;
use std::error::Error;
use std::str::FromStr;
use std::time::Instant;

fn parse_list(raw: &str) -> Result<Vec<f64>, Box<dyn Error>> {
    raw.split(',')
        .map(|x| f64::from_str(x.trim()).map_err(Into::into))
        .collect()
}

/// Evaluate the partonic integrands at the requested values of s, using the
/// first mass point of the card to fix the mediator parameters.
fn inspect(card: &RunCard, matches: &ArgMatches<'_>) -> Result<(), Box<dyn Error>> {
    let mediator = card.mediator()?;
    let scan = card.scan()?;
    let point = scan.points()[0];
    let gamma = width::total_width(mediator, point.m_med, point.m_dm, point.gq, point.gdm, point.gl);

    println!(
        "m_med={} m_dm={} gamma={:e} ({})",
        point.m_med,
        point.m_dm,
        gamma,
        mediator.name()
    );
    for raw in matches.values_of("s").unwrap() {
        let s = f64::from_str(raw)?;
        println!(
            "s={:e}  vector={:e}  axial={:e}",
            s,
            integrand::parton_vector(s, gamma, point.m_med, point.m_dm),
            integrand::parton_axial_vector(s, gamma, point.m_med, point.m_dm),
        );
    }
    Ok(())
}

/// Tabulate the partial and total widths over the card's mass grid.
fn widths(card: &RunCard) -> Result<(), Box<dyn Error>> {
    let mediator = card.mediator()?;
    let scan = card.scan()?;

    println!("# {} mediator, run tag '{}'", mediator.name(), card.run_tag);
    println!("# m_med  m_dm  quarks  dm  leptons  total");
    for p in scan.points() {
        println!(
            "{:10.3}{:10.3}{:15.6e}{:15.6e}{:15.6e}{:15.6e}",
            p.m_med,
            p.m_dm,
            width::partial_width_quarks(mediator, p.m_med, p.gq),
            width::partial_width_dm(mediator, p.m_med, p.m_dm, p.gdm),
            width::partial_width_leptons(mediator, p.m_med, p.gl),
            width::total_width(mediator, p.m_med, p.m_dm, p.gq, p.gdm, p.gl),
        );
    }
    Ok(())
}

/// Rescale the card's scan to grids of target couplings.
fn rescale(card: &RunCard, matches: &ArgMatches<'_>) -> Result<(), Box<dyn Error>> {
    let rescaler = Rescaler::new(card.scan()?)?;

    let target_gq = parse_list(matches.value_of("gq").unwrap())?;
    let target_gdm = parse_list(matches.value_of("gdm").unwrap())?;
    let target_gl = parse_list(matches.value_of("gl").unwrap())?;
    let model = match matches.value_of("model") {
        Some(name) => Some(width::Mediator::from_name(name)?),
        None => None,
    };

    let results = match matches.value_of("method").unwrap() {
        "br-quarks" => rescaler.rescale_by_br_quarks(&target_gq, &target_gdm, &target_gl, model)?,
        "br-leptons" => rescaler.rescale_by_br_leptons(&target_gq, &target_gdm, &target_gl, model)?,
        "propagator" => rescaler.rescale_by_propagator(&target_gq, &target_gdm, &target_gl, model)?,
        other => return Err(format!("unknown rescaling method '{}'", other).into()),
    };

    for r in results {
        println!("gq={} gdm={} gl={}", r.gq, r.gdm, r.gl);
        for (p, factor) in rescaler.reference().points().iter().zip(&r.factors) {
            println!("  m_med={:10.3} m_dm={:10.3}  {:e}", p.m_med, p.m_dm, factor);
        }
    }
    Ok(())
}

/// Time the partonic integrands on random points across the kinematic range.
fn bench(card: &RunCard, matches: &ArgMatches<'_>) -> Result<(), Box<dyn Error>> {
    let n_max = match matches.value_of("samples") {
        Some(x) => usize::from_str(x)?,
        None => 1_000_000,
    };
    let mediator = card.mediator()?;
    let scan = card.scan()?;
    let point = scan.points()[0];
    let gamma = width::total_width(mediator, point.m_med, point.m_dm, point.gq, point.gdm, point.gl);
    let s_max = card.collider_energy();

    let mut rng = rand::thread_rng();
    let now = Instant::now();
    for _ in 0..n_max {
        let s = rng.gen::<f64>() * s_max;
        let _r = integrand::parton_vector(s, gamma, point.m_med, point.m_dm);
        let _r = integrand::parton_axial_vector(s, gamma, point.m_med, point.m_dm);
    }
    println!("{:#?}", now.elapsed());
    Ok(())
}

/// Evaluate the hadronic integrands at one `(x1, x2)` point with the card's
/// PDF set. Needs the external interpolation library.
#[cfg(feature = "lhapdf")]
fn hadronic(card: &RunCard, matches: &ArgMatches<'_>) -> Result<(), Box<dyn Error>> {
    use dmscan::integrand::IntegrandEvaluator;
    use partons::Flavor;

    let x1 = f64::from_str(matches.value_of("x1").unwrap())?;
    let x2 = f64::from_str(matches.value_of("x2").unwrap())?;
    let flavor = Flavor::from_pdg(i32::from_str(matches.value_of("pid").unwrap())?)?;

    let mediator = card.mediator()?;
    let scan = card.scan()?;
    let point = scan.points()[0];
    let gamma = width::total_width(mediator, point.m_med, point.m_dm, point.gq, point.gdm, point.gl);

    let evaluator =
        IntegrandEvaluator::from_named_set(&card.pdf_set, card.pdf_member, card.collider_energy())?;

    println!(
        "x1={} x2={} pid={}  vector={:e}  axial={:e}",
        x1,
        x2,
        flavor.pdg_id(),
        evaluator.hadronic_vector(x1, x2, flavor, gamma, point.m_med, point.m_dm),
        evaluator.hadronic_axial_vector(x1, x2, flavor, gamma, point.m_med, point.m_dm),
    );
    Ok(())
}

fn run(matches: &ArgMatches<'_>) -> Result<(), Box<dyn Error>> {
    let card = RunCard::new(matches.value_of("card").unwrap())?;

    if let Some(sub) = matches.subcommand_matches("inspect") {
        return inspect(&card, sub);
    }
    if matches.subcommand_matches("widths").is_some() {
        return widths(&card);
    }
    if let Some(sub) = matches.subcommand_matches("scan") {
        return rescale(&card, sub);
    }
    if let Some(sub) = matches.subcommand_matches("bench") {
        return bench(&card, sub);
    }
    #[cfg(feature = "lhapdf")]
    {
        if let Some(sub) = matches.subcommand_matches("hadronic") {
            return hadronic(&card, sub);
        }
    }
    Err("no subcommand given, try --help".into())
}

fn main() {
    let mut app = App::new("dmscan")
        .version("0.1")
        .about("Cross-section integrands and limit rescaling for dark-matter mediator scans")
        .arg(
            Arg::with_name("card")
                .short("c")
                .long("card")
                .value_name("CARD")
                .help("Path to the YAML run card")
                .default_value("run_card.yaml"),
        )
        .subcommand(
            SubCommand::with_name("inspect")
                .about("Evaluate the partonic integrands at the given values of s")
                .arg(Arg::with_name("s").required(true).min_values(1)),
        )
        .subcommand(SubCommand::with_name("widths").about("Tabulate mediator widths over the mass grid"))
        .subcommand(
            SubCommand::with_name("scan")
                .about("Rescale the card's scan to target couplings")
                .arg(
                    Arg::with_name("method")
                        .long("method")
                        .value_name("METHOD")
                        .help("br-quarks, br-leptons or propagator")
                        .default_value("propagator"),
                )
                .arg(
                    Arg::with_name("model")
                        .long("model")
                        .value_name("MODEL")
                        .help("Target mediator type, defaults to the card's"),
                )
                .arg(
                    Arg::with_name("gq")
                        .long("gq")
                        .value_name("GQ")
                        .help("Comma-separated target quark couplings")
                        .required(true),
                )
                .arg(
                    Arg::with_name("gdm")
                        .long("gdm")
                        .value_name("GDM")
                        .help("Comma-separated target dark-matter couplings")
                        .required(true),
                )
                .arg(
                    Arg::with_name("gl")
                        .long("gl")
                        .value_name("GL")
                        .help("Comma-separated target lepton couplings")
                        .required(true),
                ),
        )
        .subcommand(
            SubCommand::with_name("bench")
                .about("Time the partonic integrands on random points")
                .arg(
                    Arg::with_name("samples")
                        .short("n")
                        .long("samples")
                        .value_name("SAMPLES")
                        .help("Number of evaluations"),
                ),
        );
    if cfg!(feature = "lhapdf") {
        app = app.subcommand(
            SubCommand::with_name("hadronic")
                .about("Evaluate the hadronic integrands at one (x1, x2) point")
                .arg(Arg::with_name("x1").required(true))
                .arg(Arg::with_name("x2").required(true))
                .arg(
                    Arg::with_name("pid")
                        .help("PDG id of the beam-1 quark")
                        .required(true),
                ),
        );
    }
    let matches = app.get_matches();

    if let Err(e) = run(&matches) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
