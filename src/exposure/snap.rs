//! Rounding continuous targets to device-supported values.

use crate::error::SnapError;

/// Return the candidate closest to `target`.
///
/// Candidates above `ceiling` are ignored. Ties go to the first candidate in
/// the given (ascending) order. Fails when nothing survives the ceiling.
pub fn snap<T>(
    target: f64,
    candidates: &[T],
    ceiling: Option<f64>,
    kind: &'static str,
) -> Result<T, SnapError>
where
    T: Copy + Into<f64>,
{
    candidates
        .iter()
        .copied()
        .filter(|candidate| ceiling.is_none_or(|limit| (*candidate).into() <= limit))
        .min_by(|a, b| {
            let da = ((*a).into() - target).abs();
            let db = ((*b).into() - target).abs();
            da.total_cmp(&db)
        })
        .ok_or(SnapError::NoCandidate {
            kind,
            ceiling: ceiling.unwrap_or(f64::INFINITY),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPEEDS: &[f64] = &[0.5, 1.0, 2.0, 4.0, 8.0, 15.0, 30.0];

    #[test]
    fn test_snap_picks_closest() {
        assert_eq!(snap(3.1, SPEEDS, None, "shutter speeds").unwrap(), 4.0);
        assert_eq!(snap(0.1, SPEEDS, None, "shutter speeds").unwrap(), 0.5);
        assert_eq!(snap(100.0, SPEEDS, None, "shutter speeds").unwrap(), 30.0);
    }

    #[test]
    fn test_snap_respects_ceiling() {
        let max = 600.0 / 35.0;
        assert_eq!(snap(17.14, SPEEDS, Some(max), "shutter speeds").unwrap(), 15.0);
        assert_eq!(snap(25.0, SPEEDS, Some(max), "shutter speeds").unwrap(), 15.0);
    }

    #[test]
    fn test_snap_tie_prefers_first_candidate() {
        // 3.0 is equidistant from 2.0 and 4.0
        assert_eq!(snap(3.0, SPEEDS, None, "shutter speeds").unwrap(), 2.0);
    }

    #[test]
    fn test_snap_integer_candidates() {
        let isos: &[u32] = &[100, 200, 400, 800, 1600];
        assert_eq!(snap(1500.0, isos, Some(1600.0), "ISO values").unwrap(), 1600);
        assert_eq!(snap(1500.0, isos, Some(800.0), "ISO values").unwrap(), 800);
    }

    #[test]
    fn test_snap_without_candidates_fails() {
        let err = snap(1.0, SPEEDS, Some(0.1), "shutter speeds").unwrap_err();
        assert_eq!(
            err,
            SnapError::NoCandidate {
                kind: "shutter speeds",
                ceiling: 0.1
            }
        );

        let empty: &[f64] = &[];
        assert!(snap(1.0, empty, None, "shutter speeds").is_err());
    }

    #[test]
    fn test_snap_is_idempotent() {
        for target in [0.0, 0.7, 3.0, 9.9, 22.0, 1000.0] {
            let once = snap(target, SPEEDS, None, "shutter speeds").unwrap();
            let twice = snap(once, SPEEDS, None, "shutter speeds").unwrap();
            assert_eq!(once, twice);
        }
    }
}
