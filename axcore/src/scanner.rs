//! Marker attribute scanning.
use axinstr::units::{MethodDef, TypeDef, TypeResolver};

/// Methods on `ty` (own methods only, not ancestors) carrying the marker
/// attribute, in declaration order.
///
/// The returned iterator is lazy and restartable: calling again re-scans the
/// same declarations with the same result.
pub fn find_marked<'a, R: TypeResolver>(
    ty: &'a TypeDef,
    resolver: &'a R,
) -> impl Iterator<Item = &'a MethodDef> {
    ty.methods
        .iter()
        .filter(move |method| resolver.has_marker(method))
}
