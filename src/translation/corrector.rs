/*!
 * Terminology post-correction.
 *
 * Backends reliably mistranslate certain proper nouns and domain terms; an
 * ordered list of literal rewrites patches the worst offenders after the
 * fact. This is a known-imprecise patch, not a guarantee.
 */

use crate::app_config::CorrectionRule;

/// Applies an ordered, immutable rule set to translated text.
#[derive(Debug, Clone, Default)]
pub struct TermCorrector {
    rules: Vec<CorrectionRule>,
}

impl TermCorrector {
    /// Create a corrector owning the given rules.
    ///
    /// Rules run in list order; a rule's output is visible to every later
    /// rule, so replacements may chain.
    pub fn new(rules: Vec<CorrectionRule>) -> Self {
        Self { rules }
    }

    /// Number of rules
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the rule set is empty
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rewrite all rule matches in the given text
    pub fn apply(&self, text: &str) -> String {
        let mut output = text.to_string();
        for rule in &self.rules {
            // An empty match key would match between every character
            if rule.find.is_empty() {
                continue;
            }
            output = output.replace(&rule.find, &rule.replace);
        }
        output
    }
}
