//! Operator identity
//! Maps legal entity names from the porting registry to canonical brand codes

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;
use std::ops::{Index, IndexMut};
use std::sync::LazyLock;

/// The four carriers every report carries, zero-filled when absent
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Operator {
    Claro,
    Entel,
    Bitel,
    Movistar,
}

impl Operator {
    /// Report order
    pub const ALL: [Operator; 4] = [
        Operator::Claro,
        Operator::Entel,
        Operator::Bitel,
        Operator::Movistar,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Operator::Claro => "CLARO",
            Operator::Entel => "ENTEL",
            Operator::Bitel => "BITEL",
            Operator::Movistar => "MOVISTAR",
        }
    }

    pub fn from_code(code: &str) -> Option<Operator> {
        Operator::ALL.into_iter().find(|op| op.code() == code)
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Legal entity name to brand code
pub static BRAND_NAMES: LazyLock<HashMap<&'static str, Operator>> = LazyLock::new(|| {
    let mut m = HashMap::new();

    m.insert("América Móvil Perú S.A.C.", Operator::Claro);
    m.insert("Entel Perú S.A.", Operator::Entel);
    m.insert("Viettel Perú S.A.C.", Operator::Bitel);
    m.insert("Telefónica del Perú S.A.A.", Operator::Movistar);

    m
});

/// Canonical identity of a porting party. The set is open: names outside the
/// lookup table keep their own identity instead of being dropped.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OperatorId {
    Known(Operator),
    Other(String),
}

impl OperatorId {
    pub fn as_str(&self) -> &str {
        match self {
            OperatorId::Known(op) => op.code(),
            OperatorId::Other(name) => name,
        }
    }

    pub fn known(&self) -> Option<Operator> {
        match self {
            OperatorId::Known(op) => Some(*op),
            OperatorId::Other(_) => None,
        }
    }
}

impl fmt::Display for OperatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolve a raw operator name. Brand codes resolve to themselves, so
/// normalizing an already-normalized name is a no-op.
pub fn normalize_name(raw: &str) -> OperatorId {
    let name = raw.trim();
    BRAND_NAMES
        .get(name)
        .copied()
        .or_else(|| Operator::from_code(name))
        .map(OperatorId::Known)
        .unwrap_or_else(|| OperatorId::Other(name.to_string()))
}

/// One value per known operator. Density over the fixed four is carried by
/// the type: there is no way to build a book with an operator missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OperatorBook<T> {
    slots: [T; 4],
}

impl<T> OperatorBook<T> {
    pub fn from_fn(mut f: impl FnMut(Operator) -> T) -> Self {
        OperatorBook {
            slots: Operator::ALL.map(&mut f),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Operator, &T)> {
        Operator::ALL.into_iter().zip(self.slots.iter())
    }

    pub fn map<U>(&self, mut f: impl FnMut(&T) -> U) -> OperatorBook<U> {
        OperatorBook::from_fn(|op| f(&self[op]))
    }
}

impl<T> Index<Operator> for OperatorBook<T> {
    type Output = T;

    fn index(&self, op: Operator) -> &T {
        &self.slots[op.index()]
    }
}

impl<T> IndexMut<Operator> for OperatorBook<T> {
    fn index_mut(&mut self, op: Operator) -> &mut T {
        &mut self.slots[op.index()]
    }
}

/// Serializes as a map keyed by brand code, in report order
impl<T: Serialize> Serialize for OperatorBook<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(4))?;
        for (op, value) in self.iter() {
            map.serialize_entry(op.code(), value)?;
        }
        map.end()
    }
}
