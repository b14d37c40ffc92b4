//! Type hierarchy walking.
//!
//! Hooked methods live on subclasses of a designated networked base type.
//! Because a subclass's methods already cover inherited behavior through
//! normal dispatch, processing an ancestor separately would instrument the
//! same call site twice, so only the most-derived candidates survive.
//!
//! Every walk tolerates unresolved base references: a reference into a unit
//! that has not been presented yet simply ends the chain ("top of the
//! hierarchy here"), it never fails the build.
use std::collections::BTreeSet;

use axinstr::units::{TypeDef, TypeResolver, Unit, operand::TypeName};

/// Types in `unit` deriving from `base`, in definition order.
pub fn subclasses_of<'a>(
    unit: &'a Unit,
    base: &TypeName,
    resolver: &impl TypeResolver,
) -> Vec<&'a TypeDef> {
    unit.types
        .values()
        .filter(|ty| is_subclass_of(ty, base, resolver))
        .collect()
}

/// Whether `ty` derives (directly or transitively) from `base`.
pub fn is_subclass_of(ty: &TypeDef, base: &TypeName, resolver: &impl TypeResolver) -> bool {
    let mut current = ty.base.clone();
    while let Some(name) = current {
        if &name == base {
            return true;
        }
        match resolver.find_type(&name) {
            Some(ancestor) => current = ancestor.base,
            None => return false,
        }
    }
    false
}

/// Removes from `candidates` every type observed as an ancestor of another
/// candidate.
///
/// For each candidate the ancestor chain is walked until the designated base
/// type (not marked) or an unresolved reference (chain ends). Everything
/// visited strictly in between is excluded from the result, unconditionally,
/// even if it independently subclasses the base.
pub fn most_derived<'a>(
    candidates: Vec<&'a TypeDef>,
    base: &TypeName,
    resolver: &impl TypeResolver,
) -> Vec<&'a TypeDef> {
    let mut ancestors: BTreeSet<TypeName> = BTreeSet::new();

    for ty in &candidates {
        let mut current = ty.base.clone();
        while let Some(name) = current {
            if &name == base {
                break;
            }
            match resolver.find_type(&name) {
                Some(ancestor) => {
                    ancestors.insert(ancestor.full_name.clone());
                    current = ancestor.base;
                }
                None => break,
            }
        }
    }

    candidates
        .into_iter()
        .filter(|ty| !ancestors.contains(&ty.full_name))
        .collect()
}
