//! Tagged stack cells

use std::fmt;

/// A value flowing through the evaluation stack and the variable store
///
/// `Id` keeps the referenced slot's value as captured when the cell was
/// formed; assignment aliases that snapshot, not a live binding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cell {
    /// Plain number
    Value(f64),
    /// Reference to a variable slot
    Id { index: usize, value: f64 },
    /// Handle to a grouping owned by the group store
    List(u32),
}

impl Cell {
    /// Numeric payload regardless of tag
    ///
    /// For a `List` cell this is the grouping id as a number.
    pub fn num(&self) -> f64 {
        match self {
            Cell::Value(v) => *v,
            Cell::Id { value, .. } => *value,
            Cell::List(id) => f64::from(*id),
        }
    }

    /// Truncated integer payload (argument-count markers)
    pub fn integer(&self) -> i64 {
        self.num() as i64
    }

    pub fn is_id(&self) -> bool {
        matches!(self, Cell::Id { .. })
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Cell::List(_))
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Value(v) => write!(f, "{{ v:{v} }}"),
            Cell::Id { index, value } => write!(f, "{{ id:{index}, v:{value} }}"),
            Cell::List(id) => write!(f, "{{ list:{id} }}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_num_per_variant() {
        assert_eq!(Cell::Value(2.5).num(), 2.5);
        assert_eq!(Cell::Id { index: 3, value: 7.0 }.num(), 7.0);
        assert_eq!(Cell::List(4).num(), 4.0);
    }

    #[test]
    fn test_integer_truncates() {
        assert_eq!(Cell::Value(2.9).integer(), 2);
        assert_eq!(Cell::Value(-1.5).integer(), -1);
        assert_eq!(Cell::Value(f64::NAN).integer(), 0);
    }

    #[test]
    fn test_tag_predicates() {
        assert!(Cell::Id { index: 0, value: 0.0 }.is_id());
        assert!(!Cell::Value(1.0).is_id());
        assert!(Cell::List(0).is_list());
        assert!(!Cell::Id { index: 0, value: 0.0 }.is_list());
    }

    #[test]
    fn test_display_forms() {
        insta::assert_snapshot!(Cell::Value(3.5).to_string(), @"{ v:3.5 }");
        insta::assert_snapshot!(Cell::Id { index: 2, value: 5.0 }.to_string(), @"{ id:2, v:5 }");
        insta::assert_snapshot!(Cell::List(0).to_string(), @"{ list:0 }");
    }
}
