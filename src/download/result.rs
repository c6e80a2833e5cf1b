//! Tri-state download outcomes and their folding rules.

use std::fmt;

/// Outcome of one unit of download work, at any level of the traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadResult {
    Success,
    Partial,
    Failed,
}

impl DownloadResult {
    /// Reduce a collection of child outcomes to one outcome: all successes
    /// fold to `Success`, all failures to `Failed`, anything mixed to
    /// `Partial`. An empty collection folds to `Success`; nothing to do is
    /// not a failure.
    pub fn fold<I>(results: I) -> Self
    where
        I: IntoIterator<Item = DownloadResult>,
    {
        let mut all_success = true;
        let mut all_failed = true;
        for result in results {
            match result {
                DownloadResult::Success => all_failed = false,
                DownloadResult::Failed => all_success = false,
                DownloadResult::Partial => {
                    all_success = false;
                    all_failed = false;
                }
            }
        }
        if all_success {
            DownloadResult::Success
        } else if all_failed {
            DownloadResult::Failed
        } else {
            DownloadResult::Partial
        }
    }

    /// Fold boolean leaf outcomes ("did this one file download") by
    /// counting successes against the total.
    pub fn fold_flags<I>(flags: I) -> Self
    where
        I: IntoIterator<Item = bool>,
    {
        let mut successes = 0usize;
        let mut total = 0usize;
        for flag in flags {
            total += 1;
            if flag {
                successes += 1;
            }
        }
        if successes == total {
            DownloadResult::Success
        } else if successes == 0 {
            DownloadResult::Failed
        } else {
            DownloadResult::Partial
        }
    }
}

impl fmt::Display for DownloadResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DownloadResult::Success => write!(f, "SUCCESS"),
            DownloadResult::Partial => write!(f, "PARTIAL"),
            DownloadResult::Failed => write!(f, "FAILED"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;
    use DownloadResult::*;

    #[test]
    fn test_fold_empty_is_success() {
        let no_results: [DownloadResult; 0] = [];
        assert_eq!(DownloadResult::fold(no_results), Success);
        let no_flags: [bool; 0] = [];
        assert_eq!(DownloadResult::fold_flags(no_flags), Success);
    }

    #[test]
    fn test_fold_uniform() {
        assert_eq!(DownloadResult::fold([Success, Success]), Success);
        assert_eq!(DownloadResult::fold([Failed, Failed]), Failed);
    }

    #[test]
    fn test_fold_mixed() {
        assert_eq!(DownloadResult::fold([Success, Failed]), Partial);
        assert_eq!(DownloadResult::fold([Partial]), Partial);
        assert_eq!(DownloadResult::fold([Success, Partial, Success]), Partial);
        assert_eq!(DownloadResult::fold([Failed, Partial]), Partial);
    }

    #[test]
    fn test_fold_flags() {
        assert_eq!(DownloadResult::fold_flags([true, true]), Success);
        assert_eq!(DownloadResult::fold_flags([false, false]), Failed);
        assert_eq!(DownloadResult::fold_flags([true, false]), Partial);
    }

    #[test]
    fn test_fold_random_multisets() {
        let mut rng = rand::thread_rng();
        for _ in 0..500 {
            let len = rng.gen_range(0..20);
            let results: Vec<DownloadResult> = (0..len)
                .map(|_| match rng.gen_range(0..3) {
                    0 => Success,
                    1 => Partial,
                    _ => Failed,
                })
                .collect();

            let folded = DownloadResult::fold(results.clone());
            if results.is_empty() || results.iter().all(|r| *r == Success) {
                assert_eq!(folded, Success);
            } else if results.iter().all(|r| *r == Failed) {
                assert_eq!(folded, Failed);
            } else {
                assert_eq!(folded, Partial);
            }
        }
    }
}
