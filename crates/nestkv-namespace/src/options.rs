//! Options controlling [`Namespace::get_with`](crate::Namespace::get_with).

use nestkv_codec::Value;

/// Dot-parent fallback policy.
///
/// With fallback enabled, a lookup of `"a.b.c"` that finds nothing goes on to
/// try `"a.b"`, then `"a"`, and finally the empty key `""` in the same
/// namespace. The dots in a local key are a second hierarchy, independent of
/// the `/` namespace path.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum DotParent {
    /// Look up the exact key only.
    #[default]
    Off,
    /// Walk up the dot parents until any value is found.
    Any,
    /// Walk up the dot parents until a value in this list is found. A value
    /// found at any level, including the exact key, is skipped unless it is
    /// listed. An empty list never matches. Numbers compare the way
    /// JavaScript's `includes` does: `NaN` matches `NaN` and `0` matches `-0`.
    Permitted(Vec<Value>),
}

impl DotParent {
    pub fn is_enabled(&self) -> bool {
        !matches!(self, Self::Off)
    }

    /// Whether a found value may be returned under this policy.
    pub fn permits(&self, value: &Value) -> bool {
        match self {
            Self::Off | Self::Any => true,
            Self::Permitted(allowed) => allowed.iter().any(|a| same_value_zero(a, value)),
        }
    }
}

fn same_value_zero(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x == y || (x.is_nan() && y.is_nan()),
        _ => a == b,
    }
}

/// Secondary checks to make when a `get` finds no usable value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GetOptions {
    pub check_dot_parent: DotParent,
}

impl GetOptions {
    /// Fall back through dot parents, accepting any value.
    pub fn dot_parent() -> Self {
        Self {
            check_dot_parent: DotParent::Any,
        }
    }

    /// Fall back through dot parents, accepting only the listed values.
    pub fn permitted<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self {
            check_dot_parent: DotParent::Permitted(values.into_iter().map(Into::into).collect()),
        }
    }
}

/// Iterate the dot parents of a key, nearest first: `"a.b.c"` yields
/// `"a.b"`, `"a"` and then the empty key. Any non-empty key ends with `""`;
/// the empty key itself has no parents.
pub fn dot_parents(key: &str) -> impl Iterator<Item = &str> {
    let mut rest = Some(key).filter(|k| !k.is_empty());
    std::iter::from_fn(move || {
        let current = rest?;
        let parent = match current.rsplit_once('.') {
            Some((parent, _)) => parent,
            None => "",
        };
        rest = Some(parent).filter(|p| !p.is_empty());
        Some(parent)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dot_parents_nearest_first() {
        let parents: Vec<&str> = dot_parents("a.b.c.d").collect();
        assert_eq!(parents, vec!["a.b.c", "a.b", "a", ""]);
    }

    #[test]
    fn undotted_key_falls_back_to_empty_key() {
        let parents: Vec<&str> = dot_parents("x").collect();
        assert_eq!(parents, vec![""]);
    }

    #[test]
    fn empty_key_has_no_parents() {
        assert_eq!(dot_parents("").count(), 0);
    }

    #[test]
    fn empty_segments_are_still_segments() {
        // "a..b" splits into ["a", "", "b"].
        let parents: Vec<&str> = dot_parents("a..b").collect();
        assert_eq!(parents, vec!["a.", "a", ""]);
    }

    #[test]
    fn leading_dot_reaches_empty_key_once() {
        let parents: Vec<&str> = dot_parents(".a").collect();
        assert_eq!(parents, vec![""]);
    }

    #[test]
    fn permitted_numbers_compare_like_includes() {
        let policy = DotParent::Permitted(vec![Value::Number(f64::NAN), Value::Number(0.0)]);
        assert!(policy.permits(&Value::Number(f64::NAN)));
        assert!(policy.permits(&Value::Number(-0.0)));
        assert!(!policy.permits(&Value::Number(1.0)));
        assert!(!policy.permits(&Value::from("NaN")));
    }

    #[test]
    fn permits() {
        assert!(DotParent::Off.permits(&Value::from("x")));
        assert!(DotParent::Any.permits(&Value::from("x")));
        let policy = DotParent::Permitted(vec![Value::from("a"), Value::from(1)]);
        assert!(policy.permits(&Value::from("a")));
        assert!(policy.permits(&Value::from(1.0)));
        assert!(!policy.permits(&Value::from("b")));
        assert!(!DotParent::Permitted(vec![]).permits(&Value::from("a")));
    }

    #[test]
    fn builders() {
        assert_eq!(GetOptions::default().check_dot_parent, DotParent::Off);
        assert!(GetOptions::dot_parent().check_dot_parent.is_enabled());
        assert_eq!(
            GetOptions::permitted(["a", "b"]).check_dot_parent,
            DotParent::Permitted(vec![Value::from("a"), Value::from("b")])
        );
    }
}
