//! Ordering-tagged joint vectors.
//!
//! A vector of joint scalars is only meaningful together with the ordering it
//! is expressed in. [`JointVector`] carries that ordering as a zero-sized type
//! parameter, so passing a transport-ordered vector where a model-ordered one
//! is expected fails to compile instead of silently scrambling joints.
//!
//! Conversions between the two orderings go through a bijection (see the
//! reprojector in `motion-robot`); this module only provides the tags and the
//! container.

use std::marker::PhantomData;
use std::ops::Index;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

mod sealed {
    pub trait Sealed {}
    impl Sealed for super::External {}
    impl Sealed for super::Internal {}
}

/// A scalar ordering tag.
pub trait Order: sealed::Sealed + Copy + Default + std::fmt::Debug + 'static {
    /// Human-readable name of the ordering.
    const NAME: &'static str;
}

/// Ordering of the transport feed (telemetry, commands).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct External;

/// Ordering of the kinematic model (planning, kinematics).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Internal;

impl Order for External {
    const NAME: &'static str = "external";
}

impl Order for Internal {
    const NAME: &'static str = "internal";
}

/// Joint scalars expressed in ordering `O`.
///
/// # Example
///
/// ```
/// use motion_types::{Internal, JointVector};
///
/// let q = JointVector::<Internal>::new(vec![0.1, 0.2, 0.3]);
/// assert_eq!(q.len(), 3);
/// assert_eq!(q[1], 0.2);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(bound = ""))]
pub struct JointVector<O: Order> {
    values: Vec<f64>,
    #[cfg_attr(feature = "serde", serde(skip))]
    ordering: PhantomData<O>,
}

/// Joint scalars in transport order.
pub type ExternalVector = JointVector<External>;

/// Joint scalars in model order.
pub type InternalVector = JointVector<Internal>;

impl<O: Order> JointVector<O> {
    /// Wraps scalars already expressed in ordering `O`.
    #[must_use]
    pub const fn new(values: Vec<f64>) -> Self {
        Self {
            values,
            ordering: PhantomData,
        }
    }

    /// Creates a vector of `len` zeros.
    #[must_use]
    pub fn zeros(len: usize) -> Self {
        Self::new(vec![0.0; len])
    }

    /// Returns the name of the ordering.
    #[must_use]
    pub const fn ordering(&self) -> &'static str {
        O::NAME
    }

    /// Returns the number of scalars.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the vector holds no scalars.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the scalars as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Returns the scalars as a mutable slice.
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.values
    }

    /// Returns the scalar at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    /// Returns an iterator over the scalars.
    pub fn iter(&self) -> impl Iterator<Item = &f64> {
        self.values.iter()
    }

    /// Selects the scalars at `indices`, in that order.
    ///
    /// Returns `None` if an index is out of range.
    #[must_use]
    pub fn select(&self, indices: &[usize]) -> Option<Vec<f64>> {
        indices.iter().map(|&i| self.get(i)).collect()
    }

    /// Unwraps the scalars.
    #[must_use]
    pub fn into_vec(self) -> Vec<f64> {
        self.values
    }
}

impl<O: Order> Default for JointVector<O> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<O: Order> Index<usize> for JointVector<O> {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.values[index]
    }
}

impl<O: Order> AsRef<[f64]> for JointVector<O> {
    fn as_ref(&self) -> &[f64] {
        &self.values
    }
}

impl<'a, O: Order> IntoIterator for &'a JointVector<O> {
    type Item = &'a f64;
    type IntoIter = std::slice::Iter<'a, f64>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}
