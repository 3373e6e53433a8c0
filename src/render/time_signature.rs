// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::JamError;

/// Note values allowed as a time signature denominator
pub const VALID_DENOMINATORS: [u8; 4] = [2, 4, 8, 16];

/// Meter such as 4/4 or 3/8
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeSignature {
    numerator: u8,
    denominator: u8,
}

impl TimeSignature {
    pub fn new(numerator: u8, denominator: u8) -> Result<Self, JamError> {
        if numerator == 0 || !VALID_DENOMINATORS.contains(&denominator) {
            return Err(JamError::InvalidTimeSignature {
                numerator,
                denominator,
            });
        }
        Ok(Self {
            numerator,
            denominator,
        })
    }

    pub fn numerator(&self) -> u8 {
        self.numerator
    }

    pub fn denominator(&self) -> u8 {
        self.denominator
    }

    /// Denominator as a power of two, as stored in MIDI files
    pub fn denominator_power(&self) -> u8 {
        self.denominator.trailing_zeros() as u8
    }
}

impl Default for TimeSignature {
    fn default() -> Self {
        Self {
            numerator: 4,
            denominator: 4,
        }
    }
}

impl fmt::Display for TimeSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

impl FromStr for TimeSignature {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (num, den) = s
            .trim()
            .split_once('/')
            .ok_or_else(|| format!("Time signature must look like 4/4, got '{}'", s))?;
        let numerator: u8 = num
            .trim()
            .parse()
            .map_err(|_| format!("Invalid time signature numerator: '{}'", num))?;
        let denominator: u8 = den
            .trim()
            .parse()
            .map_err(|_| format!("Invalid time signature denominator: '{}'", den))?;
        TimeSignature::new(numerator, denominator).map_err(|e| e.to_string())
    }
}

impl TryFrom<String> for TimeSignature {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeSignature> for String {
    fn from(value: TimeSignature) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_denominators() {
        for denominator in [0, 1, 3, 5, 6, 32] {
            let err = TimeSignature::new(4, denominator).unwrap_err();
            assert!(matches!(err, JamError::InvalidTimeSignature { .. }));
            assert!(err
                .to_string()
                .starts_with("Note value must be one of: 2, 4, 8, or 16."));
        }
    }

    #[test]
    fn test_zero_numerator() {
        assert!(TimeSignature::new(0, 4).is_err());
    }

    #[test]
    fn test_valid_signatures() {
        let three_eight = TimeSignature::new(3, 8).unwrap();
        assert_eq!(three_eight.numerator(), 3);
        assert_eq!(three_eight.denominator(), 8);
        assert_eq!(three_eight.to_string(), "3/8");

        assert_eq!(TimeSignature::new(4, 4).unwrap(), TimeSignature::default());
    }

    #[test]
    fn test_denominator_power() {
        let powers: Vec<u8> = VALID_DENOMINATORS
            .iter()
            .map(|&d| TimeSignature::new(4, d).unwrap().denominator_power())
            .collect();
        assert_eq!(powers, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_parse() {
        assert_eq!("6/8".parse::<TimeSignature>().unwrap(), TimeSignature::new(6, 8).unwrap());
        assert_eq!(" 2 / 2 ".parse::<TimeSignature>().unwrap().to_string(), "2/2");
        assert!("4".parse::<TimeSignature>().is_err());
        assert!("x/4".parse::<TimeSignature>().is_err());
        assert!("4/3".parse::<TimeSignature>().is_err());
    }
}
