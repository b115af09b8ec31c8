use deploydiff_common::{
    Dependency, DeployDiffError, FilterRules, MismatchFilter, PomFilterConfig,
};
use glob::Pattern;
use tracing::trace;

/// Suppresses keys matching glob patterns, per side.
///
/// `*` matches across `/`, so `*/class-use/*` applies at any depth.
#[derive(Debug, Clone, Default)]
pub struct PatternFilter {
    ignore_in_left: Vec<Pattern>,
    ignore_in_right: Vec<Pattern>,
}

impl PatternFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rules(rules: &FilterRules) -> Result<Self, DeployDiffError> {
        Ok(Self {
            ignore_in_left: compile(&rules.ignore_in_left)?,
            ignore_in_right: compile(&rules.ignore_in_right)?,
        })
    }

    pub fn ignoring_in_left(mut self, pattern: &str) -> Result<Self, DeployDiffError> {
        self.ignore_in_left.push(compile_one(pattern)?);
        Ok(self)
    }

    pub fn ignoring_in_right(mut self, pattern: &str) -> Result<Self, DeployDiffError> {
        self.ignore_in_right.push(compile_one(pattern)?);
        Ok(self)
    }
}

fn compile(patterns: &[String]) -> Result<Vec<Pattern>, DeployDiffError> {
    patterns.iter().map(|pattern| compile_one(pattern)).collect()
}

fn compile_one(pattern: &str) -> Result<Pattern, DeployDiffError> {
    Pattern::new(pattern)
        .map_err(|e| DeployDiffError::Config(format!("Invalid pattern '{}': {}", pattern, e)))
}

fn find_match<'a>(patterns: &'a [Pattern], key: &str) -> Option<&'a Pattern> {
    patterns.iter().find(|pattern| pattern.matches(key))
}

impl MismatchFilter<String> for PatternFilter {
    fn ignore_in_left(&self, key: &String) -> bool {
        match find_match(&self.ignore_in_left, key) {
            Some(pattern) => {
                trace!("Ignoring '{}' in left as it matches '{}'", key, pattern);
                true
            }
            None => false,
        }
    }

    fn ignore_in_right(&self, key: &String) -> bool {
        match find_match(&self.ignore_in_right, key) {
            Some(pattern) => {
                trace!("Ignoring '{}' in right as it matches '{}'", key, pattern);
                true
            }
            None => false,
        }
    }
}

/// Suppresses optional dependencies that only one side declares
#[derive(Debug, Clone, Copy, Default)]
pub struct OptionalDependencyFilter {
    pub ignore_in_left: bool,
    pub ignore_in_right: bool,
}

impl From<&PomFilterConfig> for OptionalDependencyFilter {
    fn from(config: &PomFilterConfig) -> Self {
        Self {
            ignore_in_left: config.ignore_optional_in_left,
            ignore_in_right: config.ignore_optional_in_right,
        }
    }
}

impl MismatchFilter<Dependency> for OptionalDependencyFilter {
    fn ignore_in_left(&self, dependency: &Dependency) -> bool {
        self.ignore_in_left && dependency.optional
    }

    fn ignore_in_right(&self, dependency: &Dependency) -> bool {
        self.ignore_in_right && dependency.optional
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_javadoc_patterns() {
        let filter = PatternFilter::new()
            .ignoring_in_left("*/class-use/*")
            .unwrap()
            .ignoring_in_left("*/package-use.html")
            .unwrap();

        assert!(filter.ignore_in_left(&"org/example/class-use/Widget.html".to_string()));
        assert!(filter.ignore_in_left(&"org/example/package-use.html".to_string()));
        assert!(!filter.ignore_in_left(&"org/example/Widget.html".to_string()));
        assert!(!filter.ignore_in_right(&"org/example/package-use.html".to_string()));
    }

    #[test]
    fn test_suffix_patterns_in_right() {
        let rules = FilterRules {
            ignore_in_left: Vec::new(),
            ignore_in_right: vec!["*.sha256".to_string(), "*.module".to_string()],
        };
        let filter = PatternFilter::from_rules(&rules).unwrap();

        assert!(filter.ignore_in_right(&"core-1.0.jar.sha256".to_string()));
        assert!(filter.ignore_in_right(&"core-1.0.module".to_string()));
        assert!(!filter.ignore_in_right(&"core-1.0.module.asc".to_string()));
        assert!(!filter.ignore_in_left(&"core-1.0.module".to_string()));
    }

    #[test]
    fn test_invalid_pattern_is_config_error() {
        let rules = FilterRules {
            ignore_in_left: vec!["[".to_string()],
            ignore_in_right: Vec::new(),
        };
        assert!(matches!(
            PatternFilter::from_rules(&rules),
            Err(DeployDiffError::Config(_))
        ));
    }

    #[test]
    fn test_optional_dependency_filter() {
        let filter = OptionalDependencyFilter::from(&PomFilterConfig::default());
        let mut dependency = Dependency {
            group_id: "org.example".to_string(),
            artifact_id: "extra".to_string(),
            version: "1.0".to_string(),
            classifier: String::new(),
            scope: "compile".to_string(),
            optional: true,
        };

        assert!(filter.ignore_in_left(&dependency));
        assert!(!filter.ignore_in_right(&dependency));

        dependency.optional = false;
        assert!(!filter.ignore_in_left(&dependency));
    }
}
