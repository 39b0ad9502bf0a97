//! Generation request assembly
//!
//! Every request is a role-specific instruction header followed by the
//! values the answer must come from, joined with spaces, plus one short user
//! message restating the expected answer format.

use crate::catalog::ClassRestriction;
use crate::generator::{GenerationRequest, GeneratorRole};
use crate::validate::CandidateStatSet;

const GAME_CONTEXT: &str =
    "You decide properties of game files for the video game Darkest Dungeon. ";

fn join<'s>(values: impl IntoIterator<Item = &'s str>) -> String {
    values.into_iter().collect::<Vec<_>>().join(" ")
}

fn tier_words(tier: &str) -> String {
    tier.replace('_', " ")
}

/// Ask for one trinket name in the style of `examples`.
#[must_use]
pub fn name_request<'s>(examples: impl IntoIterator<Item = &'s str>) -> GenerationRequest {
    let instruction = format!(
        "{GAME_CONTEXT}Reply with ONE plausible trinket name and nothing else. \
         Keep to the game's dark fantasy and cosmic horror themes and avoid the word 'whisper'. \
         The name should differ from, but follow the format of, these existing trinkets: {}",
        join(examples)
    );
    GenerationRequest::new(
        GeneratorRole::Namer,
        instruction,
        "Suggest a new trinket name. Avoid the word whisper. Reply with the name only.",
    )
}

/// Ask which hero class (or `every_class`) suits the trinket.
#[must_use]
pub fn class_request<'s>(
    name: &str,
    class_tokens: impl IntoIterator<Item = &'s str>,
) -> GenerationRequest {
    let instruction = format!(
        "{GAME_CONTEXT}Decide which hero class may equip the trinket called: {name}. \
         If it suits every hero, reply with the word {every}. \
         If the name fits one class in particular, reply with that class name. \
         Reply with {every} or a class name and nothing else. Class names: {}",
        join(class_tokens),
        every = ClassRestriction::EVERY_CLASS,
    );
    GenerationRequest::new(
        GeneratorRole::ClassChooser,
        instruction,
        format!(
            "Suggest the hero class for the trinket. Reply with {} or a class name only.",
            ClassRestriction::EVERY_CLASS
        ),
    )
}

/// Ask which rarity tier suits the trinket.
#[must_use]
pub fn rarity_request<'s>(name: &str, tiers: impl IntoIterator<Item = &'s str>) -> GenerationRequest {
    let instruction = format!(
        "{GAME_CONTEXT}Decide the rarity of the trinket called: {name}. \
         Pick the rarity that best fits the name. \
         Reply with the rarity and nothing else. Possible rarities: {}",
        join(tiers)
    );
    GenerationRequest::new(
        GeneratorRole::RarityChooser,
        instruction,
        "Suggest the rarity of the trinket. Reply with a valid rarity only.",
    )
}

/// Ask for a signed list of stats, e.g. `['+Accuracy', '-Stress']`.
#[must_use]
pub fn stat_choice_request<'s>(
    name: &str,
    rarity: &str,
    class: &ClassRestriction,
    stat_names: impl IntoIterator<Item = &'s str>,
) -> GenerationRequest {
    let instruction = format!(
        "{GAME_CONTEXT}Choose the effects of the trinket called: {name}. \
         It is {rarity} and usable by {class}. \
         Pick stats that reflect the name: at least 1 and at most 5, balancing positive and negative effects. \
         Prefix each stat with + or - for the direction of the effect and do not repeat stats. \
         Example: ['+Accuracy', '+Damage', '+Stress', '-Move Resist'] \
         Every stat MUST be written exactly as in this list: {}",
        join(stat_names),
        rarity = tier_words(rarity),
        class = class.describe(),
    );
    GenerationRequest::new(
        GeneratorRole::StatChooser,
        instruction,
        "List the trinket's stats. Reply ONLY with a python list of these stats.",
    )
}

/// Ask for concrete values for the chosen stats within the bounds.
#[must_use]
pub fn stat_tuning_request(
    name: &str,
    rarity: &str,
    class: &ClassRestriction,
    bounds_text: &str,
    candidate: &CandidateStatSet,
) -> GenerationRequest {
    let instruction = format!(
        "{GAME_CONTEXT}Tune the effect values of the trinket called: {name}. \
         It is {rarity} and usable by {class}. \
         Rarer and class-specific trinkets have stronger effects, both good and bad; common ones are weaker. \
         You will receive a python dictionary whose keys are stat names and whose values are + or -. \
         Replace each sign with one concrete number of that sign within the stat's allowed range. \
         Keep every stat name exactly as given. \
         Example input: STATS: {{'Bleed Resist': '-', 'Healing Received': '+', 'Stress': '-'}} \
         Example output: {{'Bleed Resist': '-10', 'Healing Received': '+30', 'Stress': '-20'}} \
         Allowed minimum and maximum magnitude per stat: {bounds_text}",
        rarity = tier_words(rarity),
        class = class.describe(),
    );
    GenerationRequest::new(
        GeneratorRole::StatTuner,
        instruction,
        format!(
            "STATS: {} Reply ONLY with the completed dictionary.",
            candidate.to_prompt_literal()
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::Sign;

    #[test]
    fn test_allowed_values_joined_with_spaces() {
        let request = class_request("Starweave Pendant", ["jester", "vestal", "every_class"]);
        assert_eq!(request.role, GeneratorRole::ClassChooser);
        assert!(request.instruction.contains("Starweave Pendant"));
        assert!(request.instruction.ends_with("Class names: jester vestal every_class"));
    }

    #[test]
    fn test_stat_prompts_mention_rarity_and_class() {
        let class = ClassRestriction::from_token("plague_doctor");
        let request = stat_choice_request("Vial", "very_rare", &class, ["HP", "Stress"]);
        assert!(request.instruction.contains("It is very rare and usable by plague doctor."));
        assert!(request.instruction.ends_with("HP Stress"));
    }

    #[test]
    fn test_tuning_message_carries_candidate() {
        let candidate: CandidateStatSet =
            [("Stress".to_string(), Sign::Minus)].into_iter().collect();
        let request = stat_tuning_request(
            "Vial",
            "common",
            &ClassRestriction::Any,
            "{\"effects\": []}",
            &candidate,
        );
        assert_eq!(request.role, GeneratorRole::StatTuner);
        assert!(request.user_message.starts_with("STATS: {'Stress': '-'}"));
        assert!(request.instruction.ends_with("{\"effects\": []}"));
        assert!(request.instruction.contains("usable by every class"));
    }
}
