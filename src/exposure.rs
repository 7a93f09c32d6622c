//! Allowed values of a configuration parameter, each with a show/hide flag.
//!
//! The flags live in a [`BitArray`] that grows one bit per added value, so hiding a value
//! from a user interface is a single-bit clear.

use crate::bit_array::BitArray;
use log::warn;

/// An ordered list of allowed values with a parallel set of "exposed" flags.
#[derive(Debug, Clone, Default)]
pub struct ExposedChoices {
    possibles: Vec<String>,
    exposed: BitArray<'static>,
}

impl ExposedChoices {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the allowed values; every value starts exposed.
    ///
    /// An empty list leaves the current values in place.
    pub fn set_possibles<I, S>(&mut self, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: Vec<String> = values.into_iter().map(Into::into).collect();
        if values.is_empty() {
            return;
        }
        self.exposed = BitArray::with_size(values.len());
        self.exposed.set_all();
        self.possibles = values;
    }

    /// Adds one allowed value, exposed or hidden.
    pub fn add_possible(&mut self, value: impl Into<String>, expose: bool) {
        self.possibles.push(value.into());
        let count = self.possibles.len();
        self.exposed.grow(count, true);
        if expose {
            self.exposed.set(count - 1);
        } else {
            self.exposed.clear(count - 1);
        }
    }

    /// Hides the value at `index`.
    pub fn hide(&mut self, index: usize) {
        if index < self.exposed.size() {
            self.exposed.clear(index);
        } else {
            warn!("Cannot hide choice {index}: only {} choices exist", self.len());
        }
    }

    /// Shows the value at `index`.
    pub fn show(&mut self, index: usize) {
        if index < self.exposed.size() {
            self.exposed.set(index);
        } else {
            warn!("Cannot show choice {index}: only {} choices exist", self.len());
        }
    }

    #[must_use]
    pub fn is_exposed(&self, index: usize) -> bool {
        index < self.exposed.size() && self.exposed.get(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.possibles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.possibles.is_empty()
    }

    /// All allowed values, exposed or not.
    #[must_use]
    pub fn possibles(&self) -> &[String] {
        &self.possibles
    }

    /// The exposed values, in insertion order.
    pub fn exposed(&self) -> impl Iterator<Item = &str> + '_ {
        self.exposed
            .iter_set_bits()
            .map(|index| self.possibles[index].as_str())
    }

    #[must_use]
    pub fn contains(&self, value: &str) -> bool {
        self.possibles.iter().any(|possible| possible == value)
    }
}
