//! Technique selection
//!
//! Turns the set of techniques confirmed usable against a target into the
//! ordered list of strategies the enumeration lens walks through.

use std::collections::BTreeSet;

use super::{Strategy, Technique};

/// Orders extraction strategies for a target
///
/// Direct extraction comes first whenever a row-returning technique is
/// available (or the caller has direct access); inferential extraction is
/// always the last resort.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TechniqueSelector {
    available: BTreeSet<Technique>,
    direct_access: bool,
}

impl TechniqueSelector {
    /// Create a selector from the confirmed techniques
    pub fn new<I: IntoIterator<Item = Technique>>(available: I) -> Self {
        Self {
            available: available.into_iter().collect(),
            direct_access: false,
        }
    }

    /// Mark the session as having unrestricted direct access to the target
    pub fn with_direct_access(mut self, direct: bool) -> Self {
        self.direct_access = direct;
        self
    }

    pub fn available(&self) -> &BTreeSet<Technique> {
        &self.available
    }

    pub fn has_direct_access(&self) -> bool {
        self.direct_access
    }

    /// Whether a multi-row technique can be used
    pub fn can_return_rows(&self) -> bool {
        self.direct_access || self.available.iter().any(Technique::returns_rows)
    }

    /// Strategies to try, in order
    pub fn select_strategies(&self) -> Vec<Strategy> {
        if self.can_return_rows() {
            vec![Strategy::Direct, Strategy::Inferential]
        } else {
            vec![Strategy::Inferential]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_returning_techniques_go_first() {
        let selector = TechniqueSelector::new([Technique::Boolean, Technique::Union]);
        assert_eq!(
            selector.select_strategies(),
            vec![Strategy::Direct, Strategy::Inferential]
        );

        let selector = TechniqueSelector::new([Technique::Error]);
        assert_eq!(
            selector.select_strategies(),
            vec![Strategy::Direct, Strategy::Inferential]
        );
    }

    #[test]
    fn test_blind_only_target() {
        let selector = TechniqueSelector::new([Technique::Boolean, Technique::Time]);
        assert_eq!(selector.select_strategies(), vec![Strategy::Inferential]);
    }

    #[test]
    fn test_empty_set_still_has_fallback() {
        let selector = TechniqueSelector::default();
        assert_eq!(selector.select_strategies(), vec![Strategy::Inferential]);
    }

    #[test]
    fn test_direct_access() {
        let selector = TechniqueSelector::new([]).with_direct_access(true);
        assert!(selector.has_direct_access());
        assert_eq!(
            selector.select_strategies(),
            vec![Strategy::Direct, Strategy::Inferential]
        );
    }
}
