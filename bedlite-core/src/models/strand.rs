use std::fmt::{self, Display};
use std::str::FromStr;

use crate::errors::ValidationError;

///
/// Strand of a genomic feature. An absent strand is modelled as `Option::None`
/// by the types that carry one, and is treated as positive wherever an ordering
/// or negation is needed.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Strand {
    Positive,
    Negative,
}

impl Strand {
    /// Return the opposite strand.
    pub fn opposite(&self) -> Strand {
        match self {
            Strand::Positive => Strand::Negative,
            Strand::Negative => Strand::Positive,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Strand::Positive => "+",
            Strand::Negative => "-",
        }
    }
}

impl FromStr for Strand {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "+" => Ok(Strand::Positive),
            "-" => Ok(Strand::Negative),
            other => Err(ValidationError::InvalidStrand(other.to_string())),
        }
    }
}

impl Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
