//! Trinket property synthesis
//!
//! Drives a [`Generator`] through name, class, rarity, stat choice and stat
//! tuning. Class, rarity and stat choice go through the retry loop until the
//! answer validates; the name is free-form and tuning is best effort.

use indexmap::IndexSet;

use crate::assembler::{SynthesisPhase, SynthesisProgress, SynthesisProgressCallback, TrinketProperties};
use crate::catalog::{ClassRestriction, SchemaCatalog};
use crate::error::Result;
use crate::generator::{GenerationRequest, Generator};
use crate::prompts;
use crate::retry::{RetryPolicy, run_until_valid};
use crate::validate::{
    CandidateStatSet, Rejection, TuningOutcome, clean_name, parse_tuned_stats, validate_single_token,
    validate_stat_list,
};

const STEPS: usize = 5;

/// Generates the properties of new trinkets.
pub struct TrinketSynthesizer<'a, G: Generator> {
    catalog: &'a SchemaCatalog,
    generator: G,
    retry: RetryPolicy,
}

impl<'a, G: Generator> TrinketSynthesizer<'a, G> {
    /// Create a synthesizer that retries until every answer validates.
    pub fn new(catalog: &'a SchemaCatalog, generator: G) -> Self {
        Self {
            catalog,
            generator,
            retry: RetryPolicy::unbounded(),
        }
    }

    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    pub fn into_generator(self) -> G {
        self.generator
    }

    /// Run the full sequence: name, class, rarity, stats.
    ///
    /// # Errors
    /// Returns generator errors unchanged and [`crate::Error::RetryExhausted`]
    /// when a bounded retry policy runs out.
    pub fn synthesize(&mut self, progress: SynthesisProgressCallback) -> Result<TrinketProperties> {
        progress(&SynthesisProgress::new(SynthesisPhase::NamingTrinket, 1, STEPS));
        let name = self.name()?;
        tracing::info!("Synthesizing '{}'", name);

        progress(&SynthesisProgress::with_detail(SynthesisPhase::ChoosingClass, 2, STEPS, &name));
        let class = self.choose_class(&name)?;

        progress(&SynthesisProgress::with_detail(SynthesisPhase::ChoosingRarity, 3, STEPS, &name));
        let rarity = self.choose_rarity(&name)?;

        progress(&SynthesisProgress::with_detail(SynthesisPhase::ChoosingStats, 4, STEPS, &name));
        let candidate = self.choose_stats(&name, &class, &rarity)?;

        progress(&SynthesisProgress::with_detail(SynthesisPhase::TuningStats, 5, STEPS, &name));
        let (stats, degradation) = self.tune_stats(&name, &class, &rarity, &candidate)?.into_parts();

        tracing::info!(
            "'{}': class {}, rarity {}, {} stats{}",
            name,
            class,
            rarity,
            stats.len(),
            if degradation.is_some() { " (untuned)" } else { "" }
        );

        Ok(TrinketProperties {
            name,
            class,
            rarity,
            stats,
            degradations: degradation.into_iter().collect(),
        })
    }

    /// Ask for a trinket name.
    ///
    /// # Errors
    /// Returns the generator's error.
    pub fn name(&mut self) -> Result<String> {
        let request = prompts::name_request(
            self.catalog.vanilla_trinket_ids().iter().map(String::as_str),
        );
        let answer = self.generator.generate(&request)?;
        Ok(clean_name(&answer))
    }

    /// Ask for a class token (`every_class` or a hero class).
    ///
    /// # Errors
    /// See [`Self::synthesize`].
    pub fn choose_class(&mut self, name: &str) -> Result<String> {
        let tokens = self.catalog.class_tokens();
        let request = prompts::class_request(name, tokens.iter().map(String::as_str));
        self.until_valid("class", &request, |answer| validate_single_token(answer, &tokens))
    }

    /// Ask for a rarity tier.
    ///
    /// # Errors
    /// See [`Self::synthesize`].
    pub fn choose_rarity(&mut self, name: &str) -> Result<String> {
        let tiers = self.catalog.rarity_tiers();
        let request = prompts::rarity_request(name, tiers.iter().map(String::as_str));
        self.until_valid("rarity", &request, |answer| validate_single_token(answer, &tiers))
    }

    /// Ask for a signed list of catalog stats.
    ///
    /// # Errors
    /// See [`Self::synthesize`].
    pub fn choose_stats(&mut self, name: &str, class: &str, rarity: &str) -> Result<CandidateStatSet> {
        let stat_names: IndexSet<String> = self.catalog.stat_names().map(str::to_string).collect();
        let request = prompts::stat_choice_request(
            name,
            rarity,
            &ClassRestriction::from_token(class),
            stat_names.iter().map(String::as_str),
        );
        self.until_valid("stats", &request, |answer| validate_stat_list(answer, &stat_names))
    }

    /// Ask for values for the chosen stats. One attempt; an unusable answer
    /// falls back to the bare signs.
    ///
    /// # Errors
    /// Returns the generator's error.
    pub fn tune_stats(
        &mut self,
        name: &str,
        class: &str,
        rarity: &str,
        candidate: &CandidateStatSet,
    ) -> Result<TuningOutcome> {
        let request = prompts::stat_tuning_request(
            name,
            rarity,
            &ClassRestriction::from_token(class),
            self.catalog.bounds_text(),
            candidate,
        );
        let answer = self.generator.generate(&request)?;
        tracing::debug!("stat tuning answer: {:?}", answer);
        Ok(parse_tuned_stats(&answer, candidate))
    }

    fn until_valid<T>(
        &mut self,
        label: &str,
        request: &GenerationRequest,
        validate: impl FnMut(&str) -> std::result::Result<T, Rejection>,
    ) -> Result<T> {
        let generator = &mut self.generator;
        run_until_valid(&self.retry, label, || generator.generate(request), validate)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use super::*;
    use crate::catalog::{MagnitudeUnit, RaritySpec, StatDefinition};
    use crate::error::Error;
    use crate::generator::GeneratorRole;
    use crate::validate::Sign;

    struct Scripted {
        answers: VecDeque<&'static str>,
        roles: Vec<GeneratorRole>,
    }

    impl Scripted {
        fn new(answers: &[&'static str]) -> Self {
            Self {
                answers: answers.iter().copied().collect(),
                roles: Vec::new(),
            }
        }
    }

    impl Generator for Scripted {
        fn generate(&mut self, request: &GenerationRequest) -> Result<String> {
            self.roles.push(request.role);
            self.answers
                .pop_front()
                .map(str::to_string)
                .ok_or_else(|| Error::Generation {
                    role: request.role.to_string(),
                    message: "script exhausted".to_string(),
                })
        }
    }

    fn stat(name: &str) -> StatDefinition {
        StatDefinition {
            name: name.to_string(),
            stat_type: Some("resistance".to_string()),
            stat_subtype: Some("bleed".to_string()),
            unit: MagnitudeUnit::Percent,
            min: Some(0.0),
            max: Some(50.0),
        }
    }

    fn catalog() -> SchemaCatalog {
        SchemaCatalog::from_parts(
            vec![stat("Bleed Resist"), stat("Stress")],
            ["jester".to_string(), "vestal".to_string()],
            vec![(
                "very_rare".to_string(),
                RaritySpec {
                    id: "very_rare".to_string(),
                    price: 5000,
                    award_category: "universal".to_string(),
                },
            )],
            Vec::new(),
        )
    }

    #[test]
    fn test_synthesize_in_order_with_retries() {
        let catalog = catalog();
        let generator = Scripted::new(&[
            "\"Starweave Pendant\"",
            "bard",
            "'Jester'",
            "very_rare",
            "['+Bleed Resist', '-Luck']",
            "['-Bleed Resist', '+Stress']",
            "{'Bleed Resist': '-5', 'Stress': 10}",
        ]);
        let mut synth = TrinketSynthesizer::new(&catalog, generator);
        let props = synth.synthesize(&|_| {}).unwrap();

        assert_eq!(props.name, "Starweave Pendant");
        assert_eq!(props.class, "jester");
        assert_eq!(props.rarity, "very_rare");
        assert_eq!(props.stats.get("Bleed Resist"), Some("-5"));
        assert_eq!(props.stats.get("Stress"), Some("10"));
        assert!(props.degradations.is_empty());

        assert_eq!(
            synth.generator().roles,
            vec![
                GeneratorRole::Namer,
                GeneratorRole::ClassChooser,
                GeneratorRole::ClassChooser,
                GeneratorRole::RarityChooser,
                GeneratorRole::StatChooser,
                GeneratorRole::StatChooser,
                GeneratorRole::StatTuner,
            ]
        );
    }

    #[test]
    fn test_untunable_answer_keeps_signs() {
        let catalog = catalog();
        let mut synth = TrinketSynthesizer::new(&catalog, Scripted::new(&["I cannot do that"]));
        let candidate: CandidateStatSet = [("Stress".to_string(), Sign::Plus)].into_iter().collect();
        let outcome = synth
            .tune_stats("Vial", "every_class", "very_rare", &candidate)
            .unwrap();
        assert!(outcome.is_degraded());
        assert_eq!(outcome.stats().get("Stress"), Some("+"));
    }

    #[test]
    fn test_bounded_retry_gives_up() {
        let catalog = catalog();
        let mut synth = TrinketSynthesizer::new(&catalog, Scripted::new(&["bard", "monk"]))
            .with_retry(RetryPolicy::bounded(2));
        let err = synth.choose_class("Vial").unwrap_err();
        assert!(matches!(err, Error::RetryExhausted { attempts: 2, .. }));
    }

    #[test]
    fn test_generator_error_propagates() {
        let catalog = catalog();
        let mut synth = TrinketSynthesizer::new(&catalog, Scripted::new(&[]));
        assert!(matches!(synth.name(), Err(Error::Generation { .. })));
    }
}
