use crate::model::Variant;

/// Pick the rendition with the largest `width + height`.
///
/// Ties go to the variant listed first, so the choice only depends on the
/// order VK returns the sizes in. Returns `None` for an empty slice.
pub fn select_best(variants: &[Variant]) -> Option<&Variant> {
    variants.iter().reduce(|best, candidate| {
        if candidate.dimension_sum() > best.dimension_sum() {
            candidate
        } else {
            best
        }
    })
}
