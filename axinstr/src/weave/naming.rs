//! Logic-body resolution.
//!
//! An upstream code-generation pass may split a hooked method into
//! writer/logic/reader variants, renaming the executable body to
//! `<prefix><original name><suffix>`. Whether that pass has already run when
//! this one sees the type is not under our control, so both shapes must
//! resolve.
use log::trace;

use crate::units::TypeDef;

/// Finds the index of the body to rewrite for `original_name` within `ty`.
///
/// Candidates are methods whose name starts with `prefix + original_name`
/// (any suffix) or equals `original_name` exactly. A prefixed candidate
/// means the splitting pass already ran and the prefixed method is the
/// executable logic, so any prefixed match wins over the exact one. Among
/// several prefixed matches the first in declaration order is used.
///
/// `None` means no candidate exists yet. That is not an error: the pass that
/// generates the body may simply not have run, and the caller drops the
/// request.
pub fn resolve_logic_body(ty: &TypeDef, original_name: &str, prefix: &str) -> Option<usize> {
    let prefixed = format!("{prefix}{original_name}");

    let mut exact = None;
    for (index, method) in ty.methods.iter().enumerate() {
        if method.name.starts_with(&prefixed) {
            return Some(index);
        }
        if exact.is_none() && method.name == original_name {
            exact = Some(index);
        }
    }

    if exact.is_none() {
        trace!(
            "no logic body for `{}::{}` (prefix `{}`); dropping",
            ty.full_name, original_name, prefix
        );
    }
    exact
}
