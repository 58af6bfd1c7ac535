//! Curve Buffer - borrowed view over a named curve's keys
//!
//! The buffer never copies keys. It borrows them from the curve source for
//! as long as that source is alive, and is rebuilt whenever the source changes.

use crate::curve::{CurveSource, KeySample};
use crate::{CoreError, Result};

/// View over the keys of one float curve
///
/// `samples` is `None` when no curve is bound (no source, or the curve was
/// not found). A bound curve with zero keys is valid and simply empty.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CurveBuffer<'a> {
    samples: Option<&'a [KeySample]>,
    count: usize,
}

impl<'a> CurveBuffer<'a> {
    /// Create an unbound buffer
    pub const fn empty() -> Self {
        Self {
            samples: None,
            count: 0,
        }
    }

    /// Bind directly to a key slice
    pub fn from_samples(samples: &'a [KeySample]) -> Self {
        Self {
            samples: Some(samples),
            count: samples.len(),
        }
    }

    /// Rebind the buffer to the curve named `curve_name` on `source`.
    ///
    /// On `NoAsset` or `MissingCurve` the buffer is left unbound. On
    /// `EmptyCurve` the buffer is bound to the empty key list, so lookups
    /// return 0; the error only reports the condition.
    pub fn rebuild<S>(&mut self, source: Option<&'a S>, curve_name: &str) -> Result<()>
    where
        S: CurveSource + ?Sized,
    {
        self.clear();

        let source = source.ok_or_else(|| CoreError::NoAsset {
            curve: curve_name.to_string(),
        })?;

        let curve = source
            .find_curve(curve_name)
            .ok_or_else(|| CoreError::MissingCurve {
                asset: source.source_name().to_string(),
                curve: curve_name.to_string(),
            })?;

        *self = Self::from_samples(curve.keys());

        if self.count == 0 {
            return Err(CoreError::EmptyCurve {
                asset: source.source_name().to_string(),
                curve: curve_name.to_string(),
            });
        }

        Ok(())
    }

    /// Drop the current binding
    pub fn clear(&mut self) {
        *self = Self::empty();
    }

    /// Whether a curve is bound (possibly with zero keys)
    pub fn is_bound(&self) -> bool {
        self.samples.is_some()
    }

    /// Bound keys; empty when unbound
    pub fn samples(&self) -> &'a [KeySample] {
        self.samples.unwrap_or(&[])
    }

    /// Cached number of keys
    pub fn len(&self) -> usize {
        self.count
    }

    /// Whether there are no keys to search
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// First key, if any
    pub fn first(&self) -> Option<&'a KeySample> {
        self.samples().first()
    }

    /// Last key, if any
    pub fn last(&self) -> Option<&'a KeySample> {
        self.samples().last()
    }
}
