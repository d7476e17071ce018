//! Template-driven administrator probe

use tracing::{debug, warn};

use super::{AdministratorProbe, PivotExecutor, RowExtractor, TechniqueSelector};
use crate::dialect::{render, Dialect, Level, NAME_FIELD};

/// Answers the administrator question with the dialect's `is_admin` template
///
/// The template must return a single count in its `name` column; a positive
/// count means the user is an administrator. Dialects without the template
/// always answer "unknown".
pub struct TemplateAdminProbe<'a> {
    extractor: &'a dyn RowExtractor,
    dialect: &'a Dialect,
    selector: TechniqueSelector,
}

impl<'a> TemplateAdminProbe<'a> {
    pub fn new(
        extractor: &'a dyn RowExtractor,
        dialect: &'a Dialect,
        selector: TechniqueSelector,
    ) -> Self {
        Self {
            extractor,
            dialect,
            selector,
        }
    }
}

impl AdministratorProbe for TemplateAdminProbe<'_> {
    fn is_administrator(&self, user: &str) -> Option<bool> {
        let template = self.dialect.templates.get(Level::Administrator)?;
        let user_literal = self.dialect.literal(user);
        let source = render(template, &[("user", user_literal.as_str())]);
        let pivot = PivotExecutor::new(self.extractor);

        for strategy in self.selector.select_strategies() {
            match pivot.pivot(&source, &[NAME_FIELD], strategy) {
                Ok(Some(result)) => {
                    return result
                        .first_column()
                        .first()
                        .and_then(|v| v.as_integer())
                        .map(|count| count > 0);
                }
                Ok(None) => debug!("administrator check for '{}' returned nothing", user),
                Err(e) => warn!("administrator check for '{}' failed: {}", user, e),
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::mock::ScriptedExtractor;
    use crate::extract::{Strategy, Technique};

    #[test]
    fn test_probe_reads_count() {
        let dialect = Dialect::sybase();
        let extractor = ScriptedExtractor::new()
            .on("l.name='sa'", Strategy::Direct, "name", &["1"])
            .on("l.name='guest'", Strategy::Direct, "name", &["0"]);
        let probe = TemplateAdminProbe::new(
            &extractor,
            &dialect,
            TechniqueSelector::new([Technique::Union]),
        );

        assert_eq!(probe.is_administrator("sa"), Some(true));
        assert_eq!(probe.is_administrator("guest"), Some(false));
    }

    #[test]
    fn test_probe_falls_back_then_gives_up() {
        let dialect = Dialect::sybase();
        let extractor = ScriptedExtractor::new().fail("sa_role", Strategy::Direct, "blocked");
        let probe = TemplateAdminProbe::new(
            &extractor,
            &dialect,
            TechniqueSelector::new([Technique::Error]),
        );

        assert_eq!(probe.is_administrator("sa"), None);
        assert_eq!(
            extractor.calls_matching("sa_role"),
            vec![Strategy::Direct, Strategy::Inferential]
        );
    }

    #[test]
    fn test_probe_without_template() {
        let dialect = Dialect::sqlite();
        let extractor = ScriptedExtractor::new();
        let probe = TemplateAdminProbe::new(&extractor, &dialect, TechniqueSelector::default());

        assert_eq!(probe.is_administrator("main"), None);
        assert_eq!(extractor.call_count(), 0);
    }
}
