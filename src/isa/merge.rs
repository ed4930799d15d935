//! Default-template merging shared by comparisons and opcodes.

use super::ast::{ComparisonFields, OpcodeFields};

/// Shallow, whole-value overlay of one partial record onto another.
pub trait Overlay {
    /// Returns a copy of `self` where every field present on `entry` is replaced by the
    /// entry's value, `null` included. Absent fields keep `self`'s value verbatim, lists
    /// included.
    fn overlay(&self, entry: &Self) -> Self;
}

/// Clones `default` and overrides only the fields `entry` declares.
pub fn merge_with_default<T: Overlay>(default: &T, entry: &T) -> T {
    default.overlay(entry)
}

// Every schema field must be listed: the literal has no `..` rest.
macro_rules! shallow_overlay {
    ($ty:ident { $($field:ident),* $(,)? }) => {
        impl Overlay for $ty {
            fn overlay(&self, entry: &Self) -> Self {
                $ty {
                    $($field: entry.$field.clone().or_else(|| self.$field.clone()),)*
                }
            }
        }
    };
}

shallow_overlay!(ComparisonFields {
    level,
    op_a,
    op_b,
    sizes,
    types,
    form,
    description,
});

shallow_overlay!(OpcodeFields {
    op_a,
    op_b,
    sizes,
    types,
    sizetype,
    is_unsized,
    variant,
    variants,
    extwords,
    comparison,
    form,
    fitsize,
    class,
    description,
});

#[cfg(test)]
mod tests {
    use super::*;
    use crate::isa::ast::{cleared, set};
    use serde_json::json;

    fn comparison_default() -> ComparisonFields {
        ComparisonFields {
            level: set("L0".into()),
            op_a: set("X".into()),
            op_b: set("X".into()),
            sizes: set(vec![8]),
            types: set(vec!["B".into()]),
            form: set("{c}.{t}".into()),
            description: None,
        }
    }

    #[test]
    fn only_declared_fields_change() {
        let entry = ComparisonFields {
            form: set("eq".into()),
            ..ComparisonFields::default()
        };
        let merged = merge_with_default(&comparison_default(), &entry);
        assert_eq!(
            merged,
            ComparisonFields {
                form: set("eq".into()),
                ..comparison_default()
            }
        );
    }

    #[test]
    fn lists_are_replaced_not_extended() {
        let entry = ComparisonFields {
            sizes: set(vec![16, 32]),
            ..ComparisonFields::default()
        };
        let merged = merge_with_default(&comparison_default(), &entry);
        assert_eq!(merged.sizes(), &[16, 32]);
        assert_eq!(merged.types(), &["B"]);
    }

    #[test]
    fn null_entries_clear_inherited_values() {
        let default = OpcodeFields {
            fitsize: set(16),
            class: set("alu".into()),
            extwords: set(vec![vec!["i16".into()]]),
            form: set("ld".into()),
            ..OpcodeFields::default()
        };
        let entry: OpcodeFields = serde_json::from_value(json!({
            "fitsize": null,
            "class": null,
            "extwords": null
        }))
        .expect("parse entry");
        let merged = merge_with_default(&default, &entry);
        assert_eq!(merged.fitsize, cleared());
        assert_eq!(merged.fitsize(), None);
        assert_eq!(merged.class(), None);
        assert!(merged.extwords().is_empty());
        assert_eq!(merged.form(), Some("ld"));
    }

    #[test]
    fn nested_variant_lists_are_taken_whole() {
        let default = OpcodeFields {
            variants: set(vec![OpcodeFields::default(), OpcodeFields::default()]),
            ..OpcodeFields::default()
        };
        let entry = OpcodeFields {
            variants: set(vec![OpcodeFields {
                form: set("x".into()),
                ..OpcodeFields::default()
            }]),
            ..OpcodeFields::default()
        };
        let merged = default.overlay(&entry);
        assert_eq!(merged.variants().map(<[_]>::len), Some(1));
    }
}
