use crate::scan::{ModelScan, ScanError};
use crate::width::{Mediator, UnknownMediator};
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CardError {
    #[error("could not open run card {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("could not read run card {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
    #[error(transparent)]
    Mediator(#[from] UnknownMediator),
    #[error(transparent)]
    Scan(#[from] ScanError),
}

/// Run configuration: collider setup, PDF set selection, mediator
/// hypothesis and the coupling/mass grid to scan.
#[derive(Debug, Deserialize)]
pub struct RunCard {
    pub ebeam1: f64,
    pub ebeam2: f64,
    pub pdf_set: String,
    pub pdf_member: i32,
    pub mediator: String,
    pub gq: f64,
    pub gdm: f64,
    pub gl: f64,
    pub m_med: Vec<f64>,
    pub m_dm: Vec<f64>,
    pub run_tag: String,
}

impl RunCard {
    pub fn new(filename: &str) -> Result<RunCard, CardError> {
        let f = File::open(filename).map_err(|source| CardError::Io {
            path: filename.to_owned(),
            source,
        })?;
        let reader = BufReader::new(f);
        serde_yaml::from_reader(reader).map_err(|source| CardError::Parse {
            path: filename.to_owned(),
            source,
        })
    }

    /// Collider energy parameter entering `s_hat = E·x1·x2`.
    pub fn collider_energy(&self) -> f64 {
        self.ebeam1 + self.ebeam2
    }

    pub fn mediator(&self) -> Result<Mediator, CardError> {
        Ok(Mediator::from_name(&self.mediator)?)
    }

    /// The scan this card describes.
    pub fn scan(&self) -> Result<ModelScan, CardError> {
        let mediator = self.mediator()?;
        Ok(ModelScan::new(
            mediator,
            &self.m_med,
            &self.m_dm,
            self.gq,
            self.gdm,
            self.gl,
        )?)
    }
}
