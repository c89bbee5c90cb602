//! Jurisdiction relationships and tax regimes

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TaxError;

/// How the client's jurisdiction relates to the supplier's.
///
/// Supplied as a data tag by the external assembly stage; unknown tags are
/// rejected at the parse boundary so classification itself stays total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JurisdictionRelation {
    #[serde(rename = "domestic-same-jurisdiction")]
    SameJurisdiction,
    #[serde(rename = "domestic-other-jurisdiction")]
    OtherJurisdiction,
    #[serde(rename = "export")]
    Export,
}

impl FromStr for JurisdictionRelation {
    type Err = TaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "domestic-same-jurisdiction" => Ok(JurisdictionRelation::SameJurisdiction),
            "domestic-other-jurisdiction" => Ok(JurisdictionRelation::OtherJurisdiction),
            "export" => Ok(JurisdictionRelation::Export),
            other => Err(TaxError::UnrecognizedRelationship(other.to_string())),
        }
    }
}

/// The resolved tax treatment for an invoice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaxRegime {
    #[serde(rename = "domestic-intra-state")]
    DomesticIntraState,
    #[serde(rename = "domestic-inter-state")]
    DomesticInterState,
    #[serde(rename = "export-zero-rated")]
    ExportZeroRated,
}

impl fmt::Display for TaxRegime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            TaxRegime::DomesticIntraState => "domestic-intra-state",
            TaxRegime::DomesticInterState => "domestic-inter-state",
            TaxRegime::ExportZeroRated => "export-zero-rated",
        };
        write!(f, "{}", tag)
    }
}
