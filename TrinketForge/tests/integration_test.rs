mod common;

use std::fs;

use pretty_assertions::assert_eq;
use tempfile::TempDir;
use trinketforge::degrade::DegradationReason;
use trinketforge::prelude::*;
use trinketforge::store::{
    BUFF_CATEGORY, ENTRY_CATEGORY, EntryKind, JsonStore, LANGUAGES, LocalizationStore,
    RARITY_CATEGORY, RarityStore,
};

use common::{ScriptedGenerator, config_for, forge, tuned};

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn stored_buffs(forge: &Forge) -> Vec<BuffRecord> {
    JsonStore::new(&forge.config().output.buffs, BUFF_CATEGORY)
        .records()
        .unwrap()
        .into_iter()
        .map(|v| serde_json::from_value(v).unwrap())
        .collect()
}

fn stored_entries(forge: &Forge) -> Vec<TrinketEntry> {
    JsonStore::new(&forge.config().output.entries, ENTRY_CATEGORY)
        .records()
        .unwrap()
        .into_iter()
        .map(|v| serde_json::from_value(v).unwrap())
        .collect()
}

#[test]
fn test_starweave_pendant() {
    let (_temp, forge) = forge();
    let report = forge
        .assembler()
        .assemble(
            "Starweave Pendant",
            "every_class",
            "very_rare",
            &tuned(&[("Bleed Resist", "-5"), ("Damage", "+15")]),
        )
        .unwrap();

    let buffs = stored_buffs(&forge);
    assert_eq!(buffs, report.buffs);
    assert_eq!(
        buffs.iter().map(|b| b.id.as_str()).collect::<Vec<_>>(),
        vec![
            "TRINKET_starweave_pendant_BUFF1",
            "TRINKET_starweave_pendant_BUFF2",
            "TRINKET_starweave_pendant_BUFF3",
        ]
    );
    assert_eq!(buffs[0].stat_sub_type.as_deref(), Some("bleed"));
    assert!(close(buffs[0].amount, -0.05));
    assert_eq!(buffs[1].stat_sub_type.as_deref(), Some("damage_low"));
    assert_eq!(buffs[2].stat_sub_type.as_deref(), Some("damage_high"));
    assert!(close(buffs[1].amount, 0.15));
    assert!(close(buffs[2].amount, 0.15));

    let entries = stored_entries(&forge);
    assert_eq!(
        entries,
        vec![TrinketEntry {
            id: "starweave_pendant".to_string(),
            buffs: report.entry.buffs.clone(),
            hero_class_requirements: Vec::new(),
            rarity: "very_rare".to_string(),
            price: 12500,
            limit: 1,
            origin_dungeon: String::new(),
        }]
    );

    // base-game rarity: nothing created
    assert!(!report.rarity_created);
    assert!(report.frame.is_none());
    assert!(RarityStore::new(&forge.config().output.rarities).ids().unwrap().is_empty());

    let table = LocalizationStore::new(&forge.config().output.strings).table().unwrap();
    for language in LANGUAGES {
        assert_eq!(
            table.text(language, "str_inventory_title_trinketstarweave_pendant"),
            Some("Starweave Pendant")
        );
    }
    assert!(!table.contains("trinket_rarity_very_rare"));
    assert!(!report.is_degraded());
}

#[test]
fn test_new_rarity_created_once() {
    let (_temp, forge) = forge();
    let assembler = forge.assembler();

    let first = assembler
        .assemble("Glimmering Shard", "jester", "stochastic", &tuned(&[("Speed", "+2")]))
        .unwrap();
    assert!(first.rarity_created);
    let frame = first.frame.clone().unwrap();
    assert!(frame.ends_with("rarity_stochastic.png"));
    assert!(frame.exists());
    assert_eq!(first.entry.price, 10000);
    assert_eq!(first.entry.hero_class_requirements, vec!["jester".to_string()]);

    let second = assembler
        .assemble("Dimmed Shard", "every_class", "stochastic", &tuned(&[("HP", "-5")]))
        .unwrap();
    assert!(!second.rarity_created);
    assert!(second.frame.is_none());

    let rarities = JsonStore::new(&forge.config().output.rarities, RARITY_CATEGORY)
        .records()
        .unwrap();
    assert_eq!(
        rarities,
        vec![serde_json::json!({"id": "stochastic", "award_category": "universal"})]
    );

    let table = LocalizationStore::new(&forge.config().output.strings).table().unwrap();
    assert_eq!(table.text("english", "trinket_rarity_stochastic"), Some("Stochastic"));
    assert_eq!(
        table.text("japanese", "str_inventory_title_trinketdimmed_shard"),
        Some("Dimmed Shard")
    );
}

#[test]
fn test_existing_rarity_name_kept() {
    let (_temp, forge) = forge();
    let strings = &forge.config().output.strings;
    LocalizationStore::new(strings)
        .upsert("trinket_rarity_stochastic", "Chaotic", EntryKind::RarityName)
        .unwrap();

    forge
        .assembler()
        .assemble("Loaded Die", "every_class", "stochastic", &tuned(&[("Crit Chance", "+3")]))
        .unwrap();

    let table = LocalizationStore::new(strings).table().unwrap();
    assert_eq!(table.text("english", "trinket_rarity_stochastic"), Some("Chaotic"));
}

#[test]
fn test_stores_are_append_only() {
    let (_temp, forge) = forge();
    let assembler = forge.assembler();
    let a = assembler
        .assemble("Rusted Key", "every_class", "common", &tuned(&[("Trap Resist", "+20")]))
        .unwrap();
    let b = assembler
        .assemble(
            "Rusted Key",
            "every_class",
            "common",
            &tuned(&[("Damage", "+5"), ("Stress", "+10")]),
        )
        .unwrap();

    let expected: Vec<BuffRecord> = a.buffs.iter().chain(&b.buffs).cloned().collect();
    assert_eq!(stored_buffs(&forge), expected);
    // same name twice is stored twice
    assert_eq!(stored_entries(&forge), vec![a.entry, b.entry]);
}

#[test]
fn test_corrupt_store_recovered() {
    let (_temp, forge) = forge();
    let buffs_path = &forge.config().output.buffs;
    fs::create_dir_all(buffs_path.parent().unwrap()).unwrap();
    fs::write(buffs_path, "{ this is not json").unwrap();

    let report = forge
        .assembler()
        .assemble("Cracked Idol", "every_class", "rare", &tuned(&[("Dodge", "+5")]))
        .unwrap();

    assert_eq!(stored_buffs(&forge), report.buffs);
    assert!(
        report
            .degradations
            .iter()
            .any(|d| matches!(d.reason, DegradationReason::CorruptStore { .. }))
    );
}

#[test]
fn test_generate_with_retries_and_fallback() {
    let (_temp, forge) = forge();
    let mut generator = ScriptedGenerator::new(&[
        "\"Hollow Lantern\"",
        "bard",
        "Occultist",
        "legendary",
        "rare",
        "['+Stress', '-Sanity']",
        "```python\n['+Stress', '-HP']\n```",
        "I would rather not.",
    ]);

    let report = forge.generate_one(&mut generator, &|_| {}).unwrap();

    assert_eq!(generator.remaining(), 0);
    assert_eq!(
        generator.roles(),
        vec![
            GeneratorRole::Namer,
            GeneratorRole::ClassChooser,
            GeneratorRole::ClassChooser,
            GeneratorRole::RarityChooser,
            GeneratorRole::RarityChooser,
            GeneratorRole::StatChooser,
            GeneratorRole::StatChooser,
            GeneratorRole::StatTuner,
        ]
    );
    let tuning_request = &generator.requests[7];
    assert!(tuning_request.user_message.starts_with("STATS: {'Stress': '+', 'HP': '-'}"));

    assert_eq!(report.name, "Hollow Lantern");
    assert_eq!(report.entry.hero_class_requirements, vec!["occultist".to_string()]);
    assert_eq!(report.entry.rarity, "rare");
    assert_eq!(report.entry.price, 7500);
    assert_eq!(report.buffs.len(), 2);
    assert!(report.buffs.iter().all(|b| close(b.amount, 0.0)));

    let reasons: Vec<_> = report.degradations.iter().map(|d| d.reason.clone()).collect();
    assert!(matches!(reasons[0], DegradationReason::TuningFallback(_)));
    assert_eq!(
        reasons[1..].to_vec(),
        vec![
            DegradationReason::MissingMagnitude("+".to_string()),
            DegradationReason::MissingMagnitude("-".to_string()),
        ]
    );
}

#[test]
fn test_progress_reported_in_order() {
    use std::sync::Mutex;

    let (_temp, forge) = forge();
    let generator = ScriptedGenerator::new(&[
        "Bone Flute",
        "every_class",
        "uncommon",
        "['+Stun Resist']",
        "{'Stun Resist': '+10'}",
    ]);
    let phases = Mutex::new(Vec::new());
    forge
        .generate_one(generator, &|p| phases.lock().unwrap().push(p.phase))
        .unwrap();

    let phases = phases.into_inner().unwrap();
    assert_eq!(phases.first(), Some(&SynthesisPhase::NamingTrinket));
    assert_eq!(phases.last(), Some(&SynthesisPhase::Complete));
    let tuning = phases.iter().position(|p| *p == SynthesisPhase::TuningStats);
    let compiling = phases.iter().position(|p| *p == SynthesisPhase::CompilingBuffs);
    assert!(tuning < compiling);
}

#[test]
fn test_abort_policy_writes_nothing() {
    let temp = TempDir::new().unwrap();
    let mut config = config_for(temp.path());
    config.policy.on_degraded = DegradePolicy::Abort;
    let forge = Forge::from_config(config).unwrap();

    let err = forge
        .assembler()
        .assemble("Blank Charm", "every_class", "common", &tuned(&[("Stress", "+")]))
        .unwrap_err();

    assert!(matches!(err, Error::Degraded { count: 1, .. }));
    assert!(!forge.config().output.buffs.exists());
    assert!(!forge.config().output.entries.exists());
    assert!(!forge.config().output.strings.exists());
}

#[test]
fn test_unpriced_rarity_writes_nothing() {
    let (_temp, forge) = forge();
    let err = forge
        .assembler()
        .assemble("Odd Coin", "every_class", "mythic", &tuned(&[("HP", "+5")]))
        .unwrap_err();

    assert!(matches!(err, Error::UnpricedRarity(ref tier) if tier == "mythic"));
    let output = &forge.config().output;
    assert!(!output.buffs.exists());
    assert!(!output.rarities.exists());
    assert!(!output.strings.exists());
    assert!(!output.entries.exists());
}

#[test]
fn test_bounded_retry_writes_nothing() {
    let temp = TempDir::new().unwrap();
    let mut config = config_for(temp.path());
    config.retry.max_attempts = 2;
    let forge = Forge::from_config(config).unwrap();

    let generator = ScriptedGenerator::new(&["Odd Coin", "bard", "monk", "unused"]);
    let err = forge.generate_one(generator, &|_| {}).unwrap_err();

    match err {
        Error::RetryExhausted {
            attempts,
            last_rejection,
        } => {
            assert_eq!(attempts, 2);
            assert_eq!(
                last_rejection,
                Rejection::NotAllowed {
                    answer: "monk".to_string()
                }
            );
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!forge.config().output.buffs.exists());
}

#[test]
fn test_open_resolves_relative_outputs() {
    let temp = TempDir::new().unwrap();
    let res = common::resources_dir();
    let toml_text = format!(
        r#"
[resources]
stat_bounds = {:?}
effect_types = {:?}
trinket_properties = {:?}

[output]
buffs = "mod/buffs.json"
entries = "mod/entries.json"
rarities = "mod/rarities.json"
strings = "mod/strings.xml"

[retry]
max_attempts = 3
"#,
        res.join("trinket_effects.json"),
        res.join("effect_types.json"),
        res.join("trinket_properties.json"),
    );
    let config_path = temp.path().join("forge.toml");
    fs::write(&config_path, toml_text).unwrap();

    let forge = Forge::open(&config_path).unwrap();
    assert_eq!(forge.config().output.buffs, temp.path().join("mod/buffs.json"));
    assert_eq!(forge.config().retry.to_policy().max_attempts, Some(3));
    assert!(forge.catalog().stat("Death Blow").is_some());
    assert!(forge.catalog().vanilla_trinket_ids().is_empty());
}
