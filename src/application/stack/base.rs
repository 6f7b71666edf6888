use crate::domain::{BaseFallback, BaseResolution, DiffSnapshot};
use crate::infra::vcs::WorkingCopy;

/// Pick the revision the working copy must start from.
///
/// The base declared by the last visited parent wins; without parents the
/// target's own base is used. A missing or locally unavailable base falls
/// back to `default_base` with a warning.
pub fn resolve_base<W: WorkingCopy + ?Sized>(
    target: &DiffSnapshot,
    parents: &[DiffSnapshot],
    working_copy: &W,
    default_base: &str,
) -> BaseResolution {
    let declared = match parents.last() {
        Some(root) => root.base_revision.as_deref(),
        None => target.base_revision.as_deref(),
    };

    let fallback = match declared {
        None => Some(BaseFallback::Missing),
        Some(revision) if !working_copy.is_revision_available(revision) => {
            Some(BaseFallback::Unavailable {
                declared: revision.to_string(),
            })
        }
        Some(_) => None,
    };

    match (declared, fallback) {
        (Some(revision), None) => BaseResolution {
            revision: revision.to_string(),
            fallback: None,
        },
        (declared, fallback) => {
            log::warn!(
                "Missing base revision from Phabricator: {}, using {}",
                declared.unwrap_or("none"),
                default_base
            );
            BaseResolution {
                revision: default_base.to_string(),
                fallback,
            }
        }
    }
}
