//! ---
//! pds_section: "01-core-functionality"
//! pds_subsection: "module"
//! pds_type: "source"
//! pds_scope: "code"
//! pds_description: "Closed axis types describing one sweep grid point."
//! pds_version: "v0.1.0"
//! pds_owner: "tbd"
//! ---
//! The three sweep axes. Declaration order is the default enumeration order
//! and the string forms double as artifact file name fragments.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

/// Value domain the solver operates over.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
    IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Domain {
    Real,
    Interval,
    Affine,
    Mixed,
}

/// Flux function variant.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
    IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Flux {
    Cubic,
    Burgers,
    Lwr,
    BuckleyLeverett,
}

/// Numerical time-stepping scheme.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
    IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum SolverMethod {
    LaxFriedrichs,
    Leapfrog,
}

/// Nesting and condition-file naming used when walking the grid.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SweepStrategy {
    /// Domain, flux, method; conditions keyed by domain only.
    #[default]
    Flat,
    /// (domain, flux) pairs, then method; conditions keyed by flux and domain.
    Paired,
}

impl Domain {
    pub fn all() -> Vec<Self> {
        Self::iter().collect()
    }
}

impl Flux {
    pub fn all() -> Vec<Self> {
        Self::iter().collect()
    }
}

impl SolverMethod {
    pub fn all() -> Vec<Self> {
        Self::iter().collect()
    }
}
