use std::{fmt, iter::Sum, str::FromStr};

use serde::Serialize;

use crate::core::error::StoreError;

/// A whole-rand currency amount. Never negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Zar(u64);

impl Zar {
    pub const ZERO: Zar = Zar(0);

    pub const fn new(rand: u64) -> Self {
        Zar(rand)
    }

    pub fn rand(self) -> u64 {
        self.0
    }

    pub fn as_f64(self) -> f64 {
        self.0 as f64
    }

    /// Scale by a non-negative ratio, rounding to the nearest rand.
    pub fn scaled(self, ratio: f64) -> Result<Zar, StoreError> {
        if !ratio.is_finite() || ratio < 0.0 {
            return Err(StoreError::invalid(
                "ratio",
                format!("{ratio} must be a finite, non-negative number"),
            ));
        }
        let scaled = (self.as_f64() * ratio).round();
        // `u64::MAX as f64` rounds up to 2^64, which is already out of range
        if scaled >= u64::MAX as f64 {
            return Err(StoreError::invalid("ratio", format!("{self} x {ratio} overflows")));
        }
        Ok(Zar(scaled as u64))
    }

    pub fn checked_add(self, other: Zar) -> Option<Zar> {
        self.0.checked_add(other.0).map(Zar)
    }
}

impl fmt::Display for Zar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.0.to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(c);
        }
        write!(f, "R {grouped}")
    }
}

impl FromStr for Zar {
    type Err = StoreError;

    /// Accepts `7105000`, `7,105,000` and `R 7,105,000`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits: String = trimmed
            .strip_prefix('R')
            .unwrap_or(trimmed)
            .chars()
            .filter(|c| !matches!(c, ',' | '_' | ' '))
            .collect();
        digits.parse::<u64>().map(Zar).map_err(|_| {
            StoreError::invalid(
                "amount",
                format!("{trimmed:?} is not a whole, non-negative rand amount"),
            )
        })
    }
}

/// Saturates at `u64::MAX`. Deal tables refuse rows that would push their
/// total that far, so a pipeline total never saturates.
impl Sum for Zar {
    fn sum<I: Iterator<Item = Zar>>(iter: I) -> Self {
        iter.fold(Zar::ZERO, |total, z| Zar(total.0.saturating_add(z.0)))
    }
}

/// Closing probability, always within `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Probability(f64);

impl Probability {
    /// Probability given to freshly entered and promoted deals.
    pub const INITIAL: Probability = Probability(0.1);
    pub const CERTAIN: Probability = Probability(1.0);

    pub fn new(value: f64) -> Result<Self, StoreError> {
        if (0.0..=1.0).contains(&value) {
            Ok(Probability(value))
        } else {
            Err(StoreError::invalid(
                "probability",
                format!("{value} is outside [0, 1]"),
            ))
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl FromStr for Probability {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim().parse::<f64>().map_err(|_| {
            StoreError::invalid("probability", format!("{:?} is not a number", s.trim()))
        })?;
        Probability::new(value)
    }
}

impl fmt::Display for Probability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// Lowercase and drop separators so `north-west`, `North West` and
/// `NORTH_WEST` all name the same label.
pub(crate) fn normalize_label(label: &str) -> String {
    label
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_' | '.' | '&'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Declares a closed set of display labels: the enum itself plus `ALL`,
/// `label()`, `Display`, `FromStr` and label-based `Serialize`.
macro_rules! labelled_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident as $field:literal {
            $($variant:ident => $label:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
        $vis enum $name {
            $(#[serde(rename = $label)] $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.label())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::core::error::StoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = $crate::core::db::model::normalize_label(s);
                $name::ALL
                    .iter()
                    .copied()
                    .find(|v| $crate::core::db::model::normalize_label(v.label()) == wanted)
                    .ok_or_else(|| $crate::core::error::StoreError::Validation {
                        field: $field,
                        reason: format!(
                            "{:?} is not one of: {}",
                            s.trim(),
                            $name::ALL.iter().map(|v| v.label()).collect::<Vec<_>>().join(", ")
                        ),
                    })
            }
        }
    };
}

pub(crate) use labelled_enum;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zar_formats_with_thousands_separators() {
        assert_eq!(Zar::new(7_105_000).to_string(), "R 7,105,000");
        assert_eq!(Zar::new(35_000).to_string(), "R 35,000");
        assert_eq!(Zar::new(999).to_string(), "R 999");
        assert_eq!(Zar::ZERO.to_string(), "R 0");
    }

    #[test]
    fn zar_parses_formatted_amounts() {
        assert_eq!("R 7,105,000".parse::<Zar>().unwrap(), Zar::new(7_105_000));
        assert_eq!(" 120000 ".parse::<Zar>().unwrap(), Zar::new(120_000));
        assert!("-5".parse::<Zar>().is_err());
        assert!("12.5".parse::<Zar>().is_err());
    }

    #[test]
    fn zar_scaling_rounds_and_rejects_bad_ratios() {
        assert_eq!(Zar::new(85_000_000).scaled(0.05).unwrap(), Zar::new(4_250_000));
        assert_eq!(Zar::new(3).scaled(0.5).unwrap(), Zar::new(2));
        assert!(Zar::new(1).scaled(-0.1).is_err());
        assert!(Zar::new(1).scaled(f64::NAN).is_err());
        assert!(Zar::new(1).scaled(f64::INFINITY).is_err());
    }

    #[test]
    fn zar_scaling_to_two_pow_64_is_an_overflow() {
        let result = Zar::new(u64::MAX).scaled(1.0);
        assert!(
            matches!(result, Err(StoreError::Validation { field: "ratio", .. })),
            "Expected overflow error, got: {result:?}"
        );
        assert!(Zar::new(u64::MAX / 4).scaled(2.0).is_ok());
    }

    #[test]
    fn zar_addition_reports_overflow() {
        assert_eq!(Zar::new(2).checked_add(Zar::new(3)), Some(Zar::new(5)));
        assert_eq!(Zar::new(u64::MAX).checked_add(Zar::new(1)), None);
        let total: Zar = [Zar::new(u64::MAX), Zar::new(1)].into_iter().sum();
        assert_eq!(total, Zar::new(u64::MAX));
    }

    #[test]
    fn probability_enforces_unit_interval() {
        assert!(Probability::new(0.0).is_ok());
        assert!(Probability::new(1.0).is_ok());
        assert!(Probability::new(1.01).is_err());
        assert!(Probability::new(-0.01).is_err());
        assert!(Probability::new(f64::NAN).is_err());
        assert!("0.7".parse::<Probability>().is_ok());
        assert!("seventy".parse::<Probability>().is_err());
    }

    #[test]
    fn labels_normalize_separators_and_case() {
        assert_eq!(normalize_label("North West"), normalize_label("north-west"));
        assert_eq!(normalize_label("Due Diligence"), "duediligence");
    }
}
