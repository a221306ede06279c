//! Advisor engine
//!
//! Owns the read-only domain data and the handler cascade. Routing is a pure function
//! of `(message, profile, recent turns)`; an `AdvisorAgent` can be shared across
//! threads without locking.

use std::sync::Arc;

use housing_advisor_config::{EngineConfig, MasterDomainConfig, Settings};
use housing_advisor_core::{ConfigDrivenCalculator, Fields, Response, Turn};
use housing_advisor_text_processing::{IntentClassifier, KnowledgeMatcher, NormalizedText};

use crate::composer::ResponseComposer;
use crate::context::RouteContext;
use crate::handlers::{terminal_fallback, HandlerRegistry};
use crate::request::RouteRequest;
use crate::AgentError;

pub struct AdvisorAgent {
    domain: Arc<MasterDomainConfig>,
    calculator: ConfigDrivenCalculator,
    classifier: IntentClassifier,
    knowledge: KnowledgeMatcher,
    registry: HandlerRegistry,
    composer: ResponseComposer,
    /// User turns considered for slot carry-over
    recent_turn_window: usize,
}

impl AdvisorAgent {
    /// Build from runtime settings, loading the configured domain file or the builtin one
    pub fn new(settings: &Settings) -> Result<Self, AgentError> {
        let domain = settings.load_domain()?;
        Self::from_domain(Arc::new(domain), &settings.engine)
    }

    pub fn from_domain(
        domain: Arc<MasterDomainConfig>,
        engine: &EngineConfig,
    ) -> Result<Self, AgentError> {
        domain.validate()?;
        let registry = HandlerRegistry::with_defaults(&domain)?;

        tracing::info!(
            domain = %domain.domain_id,
            version = %domain.version,
            programs = domain.programs.len(),
            handlers = registry.len(),
            "Advisor engine initialized"
        );

        Ok(Self {
            calculator: ConfigDrivenCalculator::new(domain.calculator.clone()),
            classifier: IntentClassifier::new(domain.clone()),
            knowledge: KnowledgeMatcher::new(domain.clone()),
            registry,
            composer: ResponseComposer::new(engine.append_missing_prompt),
            recent_turn_window: engine.recent_turn_window,
            domain,
        })
    }

    /// Engine over the builtin housing domain with default engine settings
    pub fn with_builtin() -> Result<Self, AgentError> {
        let domain = MasterDomainConfig::builtin()?;
        Self::from_domain(Arc::new(domain), &EngineConfig::default())
    }

    pub fn domain(&self) -> &MasterDomainConfig {
        &self.domain
    }

    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    /// Answer one message.
    ///
    /// Slots stated in recent user turns fill gaps in `profile` (the profile wins on
    /// conflict); slots in `message` override both. Profile amounts outside
    /// `0..=MAX_AMOUNT` are ignored. Never fails and never returns empty content.
    pub fn route(&self, message: &str, profile: &Fields, recent_turns: &[Turn]) -> Response {
        let profile = self.carry_over(&profile.within_limits(), recent_turns);
        let text = NormalizedText::new(message);
        let classification = self.classifier.classify_normalized(&text, &profile);

        let ctx = RouteContext::new(
            message,
            &text,
            &classification,
            &self.domain,
            &self.calculator,
            self.classifier.extractor(),
            &self.knowledge,
        );
        let response = self
            .registry
            .dispatch(&ctx)
            .unwrap_or_else(|| terminal_fallback(&self.domain));
        let response = self.composer.compose(response, &classification, &self.domain);

        tracing::debug!(
            handler = response.handler.as_deref().unwrap_or_default(),
            intent = %classification.intent,
            confidence = ?response.confidence,
            missing = classification.missing.len(),
            "Message routed"
        );
        response
    }

    pub fn route_request(&self, request: &RouteRequest) -> Response {
        self.route(&request.message, &request.profile, &request.recent_turns)
    }

    /// Profile with slots from the last `recent_turn_window` user turns merged underneath
    fn carry_over(&self, profile: &Fields, recent_turns: &[Turn]) -> Fields {
        let user_turns: Vec<&Turn> = recent_turns.iter().filter(|t| t.is_user()).collect();
        let start = user_turns.len().saturating_sub(self.recent_turn_window);

        let extractor = self.classifier.extractor();
        let carried = user_turns[start..]
            .iter()
            .fold(Fields::default(), |acc, turn| acc.merge(&extractor.extract(&turn.content)));
        if carried.is_empty() {
            return profile.clone();
        }
        tracing::trace!(turns = user_turns.len() - start, "Carrying slots from recent turns");
        carried.merge(profile)
    }
}

impl std::fmt::Debug for AdvisorAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdvisorAgent")
            .field("domain", &self.domain.domain_id)
            .field("registry", &self.registry)
            .field("composer", &self.composer)
            .field("recent_turn_window", &self.recent_turn_window)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use housing_advisor_core::Confidence;

    #[test]
    fn test_builtin_engine() {
        let agent = AdvisorAgent::with_builtin().unwrap();
        assert_eq!(agent.domain().example_inputs.len(), 3);
        assert!(agent.registry().has("domain_fallback"));
    }

    #[test]
    fn test_profile_wins_over_recent_turns() {
        let agent = AdvisorAgent::with_builtin().unwrap();
        let profile = Fields {
            income_monthly: Some(6_000_000),
            ..Default::default()
        };
        let turns = vec![
            Turn::user("월소득 400만이에요"),
            Turn::assistant("매매가는 얼마인가요? 월소득 900만이면"),
            Turn::user("매매 5억 생각해요"),
        ];
        let merged = agent.carry_over(&profile, &turns);
        assert_eq!(merged.income_monthly, Some(6_000_000));
        assert_eq!(merged.property_price, Some(500_000_000));
    }

    #[test]
    fn test_window_limits_carry_over() {
        let engine = EngineConfig {
            recent_turn_window: 1,
            ..Default::default()
        };
        let agent = AdvisorAgent::from_domain(
            Arc::new(MasterDomainConfig::builtin().unwrap()),
            &engine,
        )
        .unwrap();
        let turns = vec![Turn::user("월소득 400만"), Turn::user("매매 5억")];
        let merged = agent.carry_over(&Fields::default(), &turns);
        assert_eq!(merged.income_monthly, None);
        assert_eq!(merged.property_price, Some(500_000_000));
    }

    #[test]
    fn test_off_topic_gets_terminal_fallback() {
        let agent = AdvisorAgent::with_builtin().unwrap();
        let response = agent.route("오늘 날씨 어때?", &Fields::default(), &[]);
        assert_eq!(response.handler.as_deref(), Some("fallback"));
        assert_eq!(response.confidence, Confidence::Low);
    }
}
