//! Handler cascade
//!
//! Every answer strategy is a [`Handler`]: an id, a priority, a predicate and a
//! generator. The registry keeps them sorted by ascending priority (ties keep
//! registration order) and the first handler whose predicate holds and whose
//! generator produces a response consumes the message.
//!
//! | id                       | prio    |
//! |--------------------------|---------|
//! | `glossary`               | 100     |
//! | `faq`                    | 110     |
//! | `loan_scenarios`         | 200     |
//! | `acquisition_tax_relief` | 300     |
//! | `policy_income_period`   | 400     |
//! | `program_comparison`     | 500     |
//! | topic rules (config)     | 510-540 |
//! | `newlywed_programs`      | 530     |
//! | `acquisition_cost`       | 550     |
//! | `appraisal_gap`          | 600     |
//! | `jeonse_rent`            | 700     |
//! | `domain_fallback`        | 800     |

mod appraisal;
mod fallback;
mod knowledge;
mod policy;
mod rent;
mod scenario;
mod tax;
mod topic;

pub use appraisal::AppraisalGapHandler;
pub use fallback::{terminal_fallback, DomainFallbackHandler, TERMINAL_FALLBACK_ID};
pub use knowledge::{FaqHandler, GlossaryHandler};
pub use policy::{NewlywedProgramsHandler, PolicyIncomePeriodHandler, ProgramComparisonHandler};
pub use rent::JeonseRentHandler;
pub use scenario::LoanScenarioHandler;
pub use tax::{AcquisitionCostHandler, AcquisitionTaxReliefHandler};
pub use topic::TopicHandler;

use housing_advisor_config::MasterDomainConfig;
use housing_advisor_core::Response;

use crate::context::RouteContext;
use crate::AgentError;

/// A guarded answer strategy
///
/// Both methods must be pure: the same context always gives the same result.
pub trait Handler: Send + Sync {
    /// Stable identifier, reported in `Response::handler`
    fn id(&self) -> &str;

    /// Cascade position; lower runs first
    fn priority(&self) -> u32;

    /// Cheap gate evaluated before `generate`
    fn matches(&self, ctx: &RouteContext<'_>) -> bool;

    /// Build the answer, or `None` to let the cascade continue
    fn generate(&self, ctx: &RouteContext<'_>) -> Option<Response>;
}

/// Ordered handler list
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: Vec<Box<dyn Handler>>,
}

impl HandlerRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Registry with every built-in handler plus the topic rules of `domain`
    pub fn with_defaults(domain: &MasterDomainConfig) -> Result<Self, AgentError> {
        let mut registry = Self::new();
        registry.register(GlossaryHandler)?;
        registry.register(FaqHandler)?;
        registry.register(LoanScenarioHandler)?;
        registry.register(AcquisitionTaxReliefHandler)?;
        registry.register(PolicyIncomePeriodHandler)?;
        registry.register(ProgramComparisonHandler)?;
        for rule in &domain.topics {
            registry.register(TopicHandler::new(rule.clone()))?;
        }
        registry.register(NewlywedProgramsHandler)?;
        registry.register(AcquisitionCostHandler)?;
        registry.register(AppraisalGapHandler)?;
        registry.register(JeonseRentHandler)?;
        registry.register(DomainFallbackHandler)?;

        tracing::debug!(handlers = ?registry.ids(), "Handler cascade registered");
        Ok(registry)
    }

    /// Register a handler, keeping the list sorted by priority.
    ///
    /// Fails on a duplicate id or on the id reserved for the terminal fallback.
    pub fn register<H: Handler + 'static>(&mut self, handler: H) -> Result<(), AgentError> {
        self.register_boxed(Box::new(handler))
    }

    pub fn register_boxed(&mut self, handler: Box<dyn Handler>) -> Result<(), AgentError> {
        let id = handler.id();
        if id == TERMINAL_FALLBACK_ID || self.has(id) {
            return Err(AgentError::Registry(format!(
                "Handler id '{}' is already registered",
                id
            )));
        }
        self.handlers.push(handler);
        // stable: equal priorities keep registration order
        self.handlers.sort_by_key(|h| h.priority());
        Ok(())
    }

    /// Check if a handler with `id` exists
    pub fn has(&self, id: &str) -> bool {
        self.handlers.iter().any(|h| h.id() == id)
    }

    /// Get number of registered handlers
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Check if registry is empty
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Handler ids in evaluation order
    pub fn ids(&self) -> Vec<&str> {
        self.handlers.iter().map(|h| h.id()).collect()
    }

    /// Run the cascade; `None` when no handler produced a response
    pub fn dispatch(&self, ctx: &RouteContext<'_>) -> Option<Response> {
        for handler in &self.handlers {
            let matched = handler.matches(ctx);
            tracing::trace!(handler = handler.id(), matched, "Evaluated handler predicate");
            if !matched {
                continue;
            }
            match handler.generate(ctx) {
                Some(mut response) => {
                    if response.handler.is_none() {
                        response.handler = Some(handler.id().to_string());
                    }
                    return Some(response);
                }
                None => {
                    tracing::debug!(
                        handler = handler.id(),
                        "Handler matched but produced no response, continuing"
                    );
                }
            }
        }
        None
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("handlers", &self.ids())
            .finish()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use housing_advisor_config::MasterDomainConfig;
    use housing_advisor_core::{ConfigDrivenCalculator, Fields};
    use housing_advisor_text_processing::{IntentClassifier, KnowledgeMatcher, NormalizedText};

    use crate::context::RouteContext;

    /// Owns everything a `RouteContext` borrows
    pub struct Fixture {
        pub domain: Arc<MasterDomainConfig>,
        pub calculator: ConfigDrivenCalculator,
        pub classifier: IntentClassifier,
        pub knowledge: KnowledgeMatcher,
    }

    impl Fixture {
        pub fn builtin() -> Self {
            let domain = Arc::new(MasterDomainConfig::builtin().unwrap());
            Self {
                calculator: ConfigDrivenCalculator::new(domain.calculator.clone()),
                classifier: IntentClassifier::new(domain.clone()),
                knowledge: KnowledgeMatcher::new(domain.clone()),
                domain,
            }
        }

        pub fn with_context<T>(
            &self,
            message: &str,
            profile: &Fields,
            f: impl FnOnce(&RouteContext<'_>) -> T,
        ) -> T {
            let text = NormalizedText::new(message);
            let classification = self.classifier.classify_normalized(&text, profile);
            let ctx = RouteContext::new(
                message,
                &text,
                &classification,
                &self.domain,
                &self.calculator,
                self.classifier.extractor(),
                &self.knowledge,
            );
            f(&ctx)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::Fixture;
    use super::*;
    use housing_advisor_core::Fields;

    struct Fixed {
        id: &'static str,
        priority: u32,
        fires: bool,
        produces: bool,
    }

    impl Handler for Fixed {
        fn id(&self) -> &str {
            self.id
        }

        fn priority(&self) -> u32 {
            self.priority
        }

        fn matches(&self, _ctx: &RouteContext<'_>) -> bool {
            self.fires
        }

        fn generate(&self, _ctx: &RouteContext<'_>) -> Option<Response> {
            self.produces.then(|| Response::builder(self.id).build())
        }
    }

    fn fixed(id: &'static str, priority: u32, fires: bool, produces: bool) -> Fixed {
        Fixed {
            id,
            priority,
            fires,
            produces,
        }
    }

    #[test]
    fn test_default_order() {
        let fixture = Fixture::builtin();
        let registry = HandlerRegistry::with_defaults(&fixture.domain).unwrap();
        assert_eq!(
            registry.ids(),
            vec![
                "glossary",
                "faq",
                "loan_scenarios",
                "acquisition_tax_relief",
                "policy_income_period",
                "program_comparison",
                "model_house_visit",
                "process_order",
                "newlywed_programs",
                "benefit_overlap",
                "acquisition_cost",
                "appraisal_gap",
                "jeonse_rent",
                "domain_fallback",
            ]
        );
    }

    #[test]
    fn test_ties_keep_registration_order() {
        let mut registry = HandlerRegistry::new();
        registry.register(fixed("second", 20, true, true)).unwrap();
        registry.register(fixed("first_a", 10, true, true)).unwrap();
        registry.register(fixed("first_b", 10, true, true)).unwrap();
        assert_eq!(registry.ids(), vec!["first_a", "first_b", "second"]);
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let mut registry = HandlerRegistry::new();
        registry.register(fixed("same", 1, true, true)).unwrap();
        assert!(matches!(
            registry.register(fixed("same", 2, true, true)),
            Err(AgentError::Registry(_))
        ));
        assert!(registry
            .register(fixed(TERMINAL_FALLBACK_ID, 3, true, true))
            .is_err());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_first_producing_handler_wins() {
        let fixture = Fixture::builtin();
        let mut registry = HandlerRegistry::new();
        registry.register(fixed("silent", 1, false, true)).unwrap();
        registry.register(fixed("declines", 2, true, false)).unwrap();
        registry.register(fixed("answers", 3, true, true)).unwrap();
        registry.register(fixed("never", 4, true, true)).unwrap();

        let response = fixture
            .with_context("아무 말", &Fields::default(), |ctx| registry.dispatch(ctx))
            .unwrap();
        assert_eq!(response.handler.as_deref(), Some("answers"));
        assert_eq!(response.content, "answers");
    }

    #[test]
    fn test_empty_registry_dispatches_nothing() {
        let fixture = Fixture::builtin();
        let registry = HandlerRegistry::new();
        assert!(registry.is_empty());
        assert!(fixture
            .with_context("DSR이 뭐야", &Fields::default(), |ctx| registry.dispatch(ctx))
            .is_none());
    }
}
