//! Composite platform identifier
//!
//! Platforms are classified along two independent axes: mobility
//! (stationary/mobile) and sensing mode (insitu/remote). The wire format of a
//! platform identifier combines both axes with the numeric id of the backing
//! record: `"<mobility>-<sensingMode>-<rawId>"`, e.g. `"stationary-insitu-42"`.
//!
//! Encoding (`Display`) and decoding (`FromStr`) are exact inverses over all
//! valid identifiers. Decoding rejects anything else with
//! `Error::InvalidIdentifier`.

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Mobility axis of the platform taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Mobility {
    Stationary,
    Mobile,
}

impl Mobility {
    /// Wire tag used in identifiers and platform-type filters
    pub fn tag(&self) -> &'static str {
        match self {
            Mobility::Stationary => "stationary",
            Mobility::Mobile => "mobile",
        }
    }
}

impl FromStr for Mobility {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "stationary" => Ok(Mobility::Stationary),
            "mobile" => Ok(Mobility::Mobile),
            other => Err(Error::InvalidIdentifier(format!(
                "unknown mobility tag '{}'",
                other
            ))),
        }
    }
}

/// Sensing-mode axis of the platform taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SensingMode {
    Insitu,
    Remote,
}

impl SensingMode {
    /// Wire tag used in identifiers and platform-type filters
    pub fn tag(&self) -> &'static str {
        match self {
            SensingMode::Insitu => "insitu",
            SensingMode::Remote => "remote",
        }
    }
}

impl FromStr for SensingMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "insitu" => Ok(SensingMode::Insitu),
            "remote" => Ok(SensingMode::Remote),
            other => Err(Error::InvalidIdentifier(format!(
                "unknown sensing-mode tag '{}'",
                other
            ))),
        }
    }
}

/// Decoded composite platform identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlatformId {
    pub mobility: Mobility,
    pub sensing_mode: SensingMode,
    pub raw_id: i64,
}

impl PlatformId {
    pub fn new(mobility: Mobility, sensing_mode: SensingMode, raw_id: i64) -> Self {
        Self {
            mobility,
            sensing_mode,
            raw_id,
        }
    }

    pub fn is_stationary(&self) -> bool {
        self.mobility == Mobility::Stationary
    }
}

impl fmt::Display for PlatformId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}-{}",
            self.mobility.tag(),
            self.sensing_mode.tag(),
            self.raw_id
        )
    }
}

impl FromStr for PlatformId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.splitn(3, '-');
        let mobility = parts
            .next()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| Error::InvalidIdentifier(format!("missing mobility tag in '{}'", s)))?
            .parse::<Mobility>()?;
        let sensing_mode = parts
            .next()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| {
                Error::InvalidIdentifier(format!("missing sensing-mode tag in '{}'", s))
            })?
            .parse::<SensingMode>()?;
        let raw = parts
            .next()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| Error::InvalidIdentifier(format!("missing id segment in '{}'", s)))?;
        let raw_id = raw
            .parse::<i64>()
            .map_err(|_| Error::InvalidIdentifier(format!("non-numeric id segment in '{}'", s)))?;
        Ok(PlatformId::new(mobility, sensing_mode, raw_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_over_all_partitions() {
        for mobility in [Mobility::Stationary, Mobility::Mobile] {
            for sensing_mode in [SensingMode::Insitu, SensingMode::Remote] {
                for raw_id in [0i64, 1, 42, 9_999_999] {
                    let id = PlatformId::new(mobility, sensing_mode, raw_id);
                    let decoded: PlatformId = id.to_string().parse().unwrap();
                    assert_eq!(decoded, id);
                }
            }
        }
    }

    #[test]
    fn decodes_wire_format() {
        let id: PlatformId = "stationary-insitu-42".parse().unwrap();
        assert_eq!(id.mobility, Mobility::Stationary);
        assert_eq!(id.sensing_mode, SensingMode::Insitu);
        assert_eq!(id.raw_id, 42);

        let id: PlatformId = "mobile-remote-7".parse().unwrap();
        assert_eq!(id.mobility, Mobility::Mobile);
        assert_eq!(id.sensing_mode, SensingMode::Remote);
        assert_eq!(id.raw_id, 7);
    }

    #[test]
    fn rejects_malformed_identifiers() {
        let cases = [
            "",
            "stationary",
            "stationary-insitu",
            "stationary-insitu-",
            "stationary-insitu-abc",
            "stationary-insitu-1x",
            "stationary-insitu-1-extra",
            "flying-insitu-1",
            "stationary-orbital-1",
            "42",
            "insitu-stationary-42",
        ];
        for case in cases {
            match case.parse::<PlatformId>() {
                Err(Error::InvalidIdentifier(_)) => {}
                other => panic!("'{}' should fail with InvalidIdentifier, got {:?}", case, other),
            }
        }
    }
}
