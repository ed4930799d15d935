//! Resolution of variant-bearing opcodes into independent sibling definitions.

use tracing::{trace, warn};

use super::ast::{OpcodeFields, set};
use super::diagnostic::Subject;
use super::error::DefError;
use super::merge::merge_with_default;
use super::opcode::{OpcodeDef, OpcodeShape};
use super::validator::ConstraintValidator;

pub struct VariantResolver<'v, 'a> {
    validator: &'v ConstraintValidator<'a>,
}

impl<'v, 'a> VariantResolver<'v, 'a> {
    pub fn new(validator: &'v ConstraintValidator<'a>) -> Self {
        Self { validator }
    }

    /// Resolves every partial variant of `parent` in list order.
    ///
    /// `parent` must be the fully merged opcode record. Each variant is seeded from it
    /// without the variant markers and with its sizetype association already applied,
    /// numbered by its list position, overridden with its own fields and validated as a
    /// standalone opcode. Variant markers on a variant entry are ignored. The first
    /// failing variant aborts resolution.
    pub fn resolve(&self, id: &str, parent: &OpcodeFields) -> Result<Vec<OpcodeDef>, DefError> {
        let seed = associated_seed(parent);
        let partials = parent.variants().unwrap_or_default();
        let mut resolved = Vec::with_capacity(partials.len());
        for (variation, partial) in partials.iter().enumerate() {
            let subject = Subject::variant(id, variation);
            if partial.variant.is_some() || partial.variants.is_some() {
                warn!(opcode = id, variation, "variant markers inside a variant are ignored");
            }
            let fields = merge_with_default(&seed, partial).without_variants();
            let layout = self.validator.validate_opcode(&subject, &fields)?;
            trace!(opcode = id, variation, "resolved variant");
            resolved.push(OpcodeDef::new(
                id,
                Some(variation),
                layout,
                OpcodeShape::plain(&fields),
                &fields,
            ));
        }
        Ok(resolved)
    }
}

/// The parent without its variant markers, its `types` replaced by the associated
/// enumeration when sizetype applies.
fn associated_seed(parent: &OpcodeFields) -> OpcodeFields {
    let mut seed = parent.without_variants();
    if let OpcodeShape::Sized {
        types,
        sizetype: true,
        ..
    } = OpcodeShape::plain(parent)
    {
        seed.types = set(types);
    }
    seed
}
