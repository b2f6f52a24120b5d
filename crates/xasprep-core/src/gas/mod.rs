//! Ion-chamber fill-gas fractions kept as a partition of unity.
//!
//! A [`GasMixture`] can only be built with fractions that sum to one, and every
//! edit returns a fresh mixture that still does. The caller swaps its stored
//! mixture for the returned one; nothing is mutated in place.

use crate::numerics::{approx_eq, stable_sum};
use serde::{Deserialize, Serialize};

pub const FRACTION_SUM_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct GasComponent {
    pub name: String,
    pub fraction: f64,
}

impl GasComponent {
    pub fn new(name: impl Into<String>, fraction: f64) -> Self {
        Self {
            name: name.into(),
            fraction,
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GasMixError {
    #[error("gas mixture must contain at least one component")]
    EmptyMixture,
    #[error("gas component at index {index} has a blank name")]
    BlankName { index: usize },
    #[error("gas '{name}' appears more than once")]
    DuplicateName { name: String },
    #[error("fraction for '{name}' must be finite and within {allowed}, got {value}")]
    FractionOutOfRange {
        name: String,
        value: f64,
        allowed: &'static str,
    },
    #[error("gas fractions sum to {sum}, expected 1 within {tolerance}")]
    UnbalancedSum { sum: f64, tolerance: f64 },
    #[error("gas index {index} is out of range for a mixture of {len} components")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("cannot remove the only gas in the mixture")]
    LastComponent,
    #[error("'{name}' is the only gas and must keep fraction 1, got {requested}")]
    SoleComponent { name: String, requested: f64 },
    #[error("existing gas fractions sum to zero and cannot be rescaled")]
    DegenerateFractions,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(try_from = "Vec<GasComponent>", into = "Vec<GasComponent>")]
pub struct GasMixture {
    components: Vec<GasComponent>,
}

impl GasMixture {
    /// Validate a caller-supplied mixture: non-empty, unique non-blank names,
    /// fractions finite in `[0, 1]` and summing to one.
    pub fn new(components: Vec<GasComponent>) -> Result<Self, GasMixError> {
        if components.is_empty() {
            return Err(GasMixError::EmptyMixture);
        }
        for (index, component) in components.iter().enumerate() {
            if component.name.trim().is_empty() {
                return Err(GasMixError::BlankName { index });
            }
            if components[..index]
                .iter()
                .any(|earlier| earlier.name == component.name)
            {
                return Err(GasMixError::DuplicateName {
                    name: component.name.clone(),
                });
            }
            check_fraction(&component.name, component.fraction, FractionBound::Inclusive)?;
        }

        let sum = stable_sum(components.iter().map(|component| component.fraction));
        if !approx_eq(sum, 1.0, FRACTION_SUM_TOLERANCE) {
            return Err(GasMixError::UnbalancedSum {
                sum,
                tolerance: FRACTION_SUM_TOLERANCE,
            });
        }

        Ok(Self { components })
    }

    pub fn single(name: impl Into<String>) -> Result<Self, GasMixError> {
        Self::new(vec![GasComponent::new(name, 1.0)])
    }

    pub fn components(&self) -> &[GasComponent] {
        &self.components
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GasComponent> {
        self.components.iter()
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Always false for a validated mixture.
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&GasComponent> {
        self.components.get(index)
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.components
            .iter()
            .position(|component| component.name == name)
    }

    pub fn get_by_name(&self, name: &str) -> Option<&GasComponent> {
        self.position(name).map(|index| &self.components[index])
    }

    pub fn fraction_sum(&self) -> f64 {
        stable_sum(self.components.iter().map(|component| component.fraction))
    }

    /// `(name, fraction)` pairs in the shape the ion-chamber physics routines take.
    pub fn as_pairs(&self) -> Vec<(&str, f64)> {
        self.components
            .iter()
            .map(|component| (component.name.as_str(), component.fraction))
            .collect()
    }

    /// Append `name` at `fraction` and shrink the existing gases proportionally
    /// by `(1 - fraction) / sum_existing`.
    pub fn rebalance_for_added_gas(
        &self,
        name: impl Into<String>,
        fraction: f64,
    ) -> Result<Self, GasMixError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(GasMixError::BlankName {
                index: self.components.len(),
            });
        }
        if self.position(&name).is_some() {
            return Err(GasMixError::DuplicateName { name });
        }
        check_fraction(&name, fraction, FractionBound::ExclusiveOne)?;

        let existing_sum = self.fraction_sum();
        if existing_sum <= 0.0 {
            return Err(GasMixError::DegenerateFractions);
        }

        let scale = (1.0 - fraction) / existing_sum;
        let mut components: Vec<GasComponent> = self
            .components
            .iter()
            .map(|component| GasComponent::new(component.name.clone(), component.fraction * scale))
            .collect();
        components.push(GasComponent::new(name, fraction));

        Ok(Self::balanced(components))
    }

    /// Drop the gas at `index` and scale the remaining gases back up to one.
    ///
    /// When every remaining gas is at zero the freed fraction is split evenly.
    pub fn remove_gas_and_redistribute(&self, index: usize) -> Result<Self, GasMixError> {
        self.check_index(index)?;
        if self.components.len() == 1 {
            return Err(GasMixError::LastComponent);
        }

        let mut components = self.components.clone();
        let removed = components.remove(index);
        let remaining_sum = stable_sum(components.iter().map(|component| component.fraction));

        if remaining_sum > 0.0 {
            for component in &mut components {
                component.fraction /= remaining_sum;
            }
        } else {
            tracing::debug!(
                removed = %removed.name,
                "remaining gases are all zero; splitting evenly"
            );
            let share = 1.0 / components.len() as f64;
            for component in &mut components {
                component.fraction = share;
            }
        }

        Ok(Self::balanced(components))
    }

    /// Set the gas at `index` to `fraction` and rescale the others so the
    /// ratios between them are kept.
    ///
    /// When the others are all at zero, `1 - fraction` is split evenly among
    /// them. A single-gas mixture only accepts a fraction of one.
    pub fn update_gas_fraction_balanced(
        &self,
        index: usize,
        fraction: f64,
    ) -> Result<Self, GasMixError> {
        self.check_index(index)?;
        let edited = &self.components[index];
        check_fraction(&edited.name, fraction, FractionBound::Inclusive)?;

        if self.components.len() == 1 {
            if approx_eq(fraction, 1.0, FRACTION_SUM_TOLERANCE) {
                return Ok(self.clone());
            }
            return Err(GasMixError::SoleComponent {
                name: edited.name.clone(),
                requested: fraction,
            });
        }

        let others_sum = stable_sum(
            self.components
                .iter()
                .enumerate()
                .filter(|(position, _)| *position != index)
                .map(|(_, component)| component.fraction),
        );
        let remainder = 1.0 - fraction;
        let even_share = remainder / (self.components.len() - 1) as f64;
        if others_sum <= 0.0 {
            tracing::debug!(
                gas = %edited.name,
                even_share,
                "other gases are all zero; splitting remainder evenly"
            );
        }

        let components = self
            .components
            .iter()
            .enumerate()
            .map(|(position, component)| {
                let value = if position == index {
                    fraction
                } else if others_sum > 0.0 {
                    // Ratio first: multiplying subnormal fractions underflows to zero.
                    (component.fraction / others_sum) * remainder
                } else {
                    even_share
                };
                GasComponent::new(component.name.clone(), value)
            })
            .collect();

        Ok(Self::balanced(components))
    }

    fn check_index(&self, index: usize) -> Result<(), GasMixError> {
        if index < self.components.len() {
            Ok(())
        } else {
            Err(GasMixError::IndexOutOfRange {
                index,
                len: self.components.len(),
            })
        }
    }

    fn balanced(components: Vec<GasComponent>) -> Self {
        let mixture = Self { components };
        debug_assert!(
            approx_eq(mixture.fraction_sum(), 1.0, FRACTION_SUM_TOLERANCE),
            "rebalanced mixture sums to {}",
            mixture.fraction_sum()
        );
        mixture
    }
}

impl TryFrom<Vec<GasComponent>> for GasMixture {
    type Error = GasMixError;

    fn try_from(components: Vec<GasComponent>) -> Result<Self, Self::Error> {
        Self::new(components)
    }
}

impl From<GasMixture> for Vec<GasComponent> {
    fn from(mixture: GasMixture) -> Self {
        mixture.components
    }
}

impl<'a> IntoIterator for &'a GasMixture {
    type Item = &'a GasComponent;
    type IntoIter = std::slice::Iter<'a, GasComponent>;

    fn into_iter(self) -> Self::IntoIter {
        self.components.iter()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FractionBound {
    Inclusive,
    ExclusiveOne,
}

fn check_fraction(name: &str, value: f64, bound: FractionBound) -> Result<(), GasMixError> {
    let (in_range, allowed) = match bound {
        FractionBound::Inclusive => ((0.0..=1.0).contains(&value), "[0, 1]"),
        FractionBound::ExclusiveOne => ((0.0..1.0).contains(&value), "[0, 1)"),
    };
    if in_range {
        Ok(())
    } else {
        Err(GasMixError::FractionOutOfRange {
            name: name.to_string(),
            value,
            allowed,
        })
    }
}
