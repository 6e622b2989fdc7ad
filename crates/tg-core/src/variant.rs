use std::mem;

use serde::{Deserialize, Serialize};

/// Value of a game option. Values of different kinds order by kind first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Variant {
    #[default]
    Null,
    Bool(bool),
    Int(i32),
}

impl Variant {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn same_type(&self, other: &Variant) -> bool {
        mem::discriminant(self) == mem::discriminant(other)
    }
}

/// A set of option values: one value, an inclusive range or a sorted list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VariantSet {
    Single(Variant),
    Range { from: Variant, to: Variant },
    Values(Vec<Variant>),
}

impl VariantSet {
    /// Range with the ends swapped if given in reverse order.
    pub fn range(from: Variant, to: Variant) -> Self {
        if from > to {
            Self::Range { from: to, to: from }
        } else {
            Self::Range { from, to }
        }
    }

    /// Sorts and deduplicates; a single value collapses to `Single`.
    pub fn from_values(mut values: Vec<Variant>) -> Self {
        values.sort();
        values.dedup();
        if values.len() == 1 {
            return Self::Single(values[0]);
        }
        Self::Values(values)
    }

    pub fn contains(&self, value: &Variant) -> bool {
        match self {
            Self::Single(single) => single == value,
            Self::Range { from, to } => from.same_type(value) && from <= value && value <= to,
            Self::Values(values) => values.binary_search(value).is_ok(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_is_swapped_and_type_checked() {
        let set = VariantSet::range(Variant::Int(9), Variant::Int(3));
        assert_eq!(
            set,
            VariantSet::Range {
                from: Variant::Int(3),
                to: Variant::Int(9)
            }
        );
        assert!(set.contains(&Variant::Int(5)));
        assert!(!set.contains(&Variant::Int(10)));
        assert!(!set.contains(&Variant::Bool(true)));
    }

    #[test]
    fn value_list_is_sorted_and_collapses() {
        let set = VariantSet::from_values(vec![Variant::Int(4), Variant::Int(1), Variant::Int(4)]);
        assert_eq!(set, VariantSet::Values(vec![Variant::Int(1), Variant::Int(4)]));
        assert!(set.contains(&Variant::Int(4)));
        assert!(!set.contains(&Variant::Int(2)));
        assert_eq!(
            VariantSet::from_values(vec![Variant::Bool(true), Variant::Bool(true)]),
            VariantSet::Single(Variant::Bool(true))
        );
    }

    #[test]
    fn variant_json_is_untagged() {
        let values: Vec<Variant> = serde_json::from_str("[null, true, 7]").expect("variants");
        assert_eq!(values, vec![Variant::Null, Variant::Bool(true), Variant::Int(7)]);
    }
}
