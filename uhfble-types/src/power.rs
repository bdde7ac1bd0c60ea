//! Reader output power

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Transmit power level accepted by the reader (0..=30)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PowerLevel(u8);

impl PowerLevel {
    /// Lowest accepted level
    pub const MIN: PowerLevel = PowerLevel(0);
    
    /// Highest accepted level
    pub const MAX: PowerLevel = PowerLevel(30);
    
    /// Validate a raw power value
    ///
    /// # Examples
    ///
    /// ```
    /// use uhfble_types::PowerLevel;
    ///
    /// assert_eq!(PowerLevel::new(20).unwrap().value(), 20);
    /// assert!(PowerLevel::new(31).is_err());
    /// ```
    pub fn new(value: u8) -> Result<Self> {
        if value > Self::MAX.0 {
            return Err(Error::Validation(format!(
                "power level {} out of range ({}..={})",
                value,
                Self::MIN.0,
                Self::MAX.0
            )));
        }
        Ok(Self(value))
    }
    
    /// Raw value as written on the wire
    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for PowerLevel {
    fn default() -> Self {
        Self::MAX
    }
}

impl TryFrom<u8> for PowerLevel {
    type Error = Error;
    
    fn try_from(value: u8) -> Result<Self> {
        Self::new(value)
    }
}

impl FromStr for PowerLevel {
    type Err = Error;
    
    fn from_str(s: &str) -> Result<Self> {
        let value = s
            .trim()
            .parse::<u8>()
            .map_err(|e| Error::Parse(format!("power level {:?}: {}", s, e)))?;
        Self::new(value)
    }
}

impl From<PowerLevel> for u8 {
    fn from(level: PowerLevel) -> u8 {
        level.0
    }
}

impl fmt::Display for PowerLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    
    #[test]
    fn test_power_bounds() {
        assert!(PowerLevel::new(0).is_ok());
        assert!(PowerLevel::new(30).is_ok());
        assert!(matches!(PowerLevel::new(31), Err(Error::Validation(_))));
        assert!(PowerLevel::new(255).is_err());
    }
    
    #[test]
    fn test_power_conversion() {
        let level = PowerLevel::try_from(17).unwrap();
        assert_eq!(u8::from(level), 17);
    }
    
    #[test]
    fn test_power_from_str() {
        assert_eq!("25".parse::<PowerLevel>().unwrap().value(), 25);
        assert!(matches!("abc".parse::<PowerLevel>(), Err(Error::Parse(_))));
        assert!(matches!("40".parse::<PowerLevel>(), Err(Error::Validation(_))));
    }
    
    #[test]
    fn test_power_default() {
        assert_eq!(PowerLevel::default(), PowerLevel::MAX);
    }
}
