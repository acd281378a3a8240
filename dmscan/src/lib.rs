//! Cross-section integrands and coupling-scan rescaling for simplified
//! dark-matter mediator models at a hadron collider.

pub mod integrand;
pub mod limits;
pub mod rescaler;
pub mod run_card;
pub mod scan;
pub mod width;
