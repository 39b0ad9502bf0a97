//! Shared fixtures for integration tests

#![allow(dead_code)]

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use trinketforge::config::{
    ForgeConfig, GeneratorSettings, OutputPaths, PolicySettings, ResourcePaths, RetrySettings,
};
use trinketforge::prelude::*;

/// Directory holding the sample reference data.
pub fn resources_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("resources")
}

/// A config reading the sample resources and writing into `out`.
pub fn config_for(out: &Path) -> ForgeConfig {
    let res = resources_dir();
    ForgeConfig {
        resources: ResourcePaths {
            stat_bounds: res.join("trinket_effects.json"),
            effect_types: res.join("effect_types.json"),
            trinket_properties: res.join("trinket_properties.json"),
            vanilla_rarities: Some(res.join("base.rarities.trinkets.json")),
            vanilla_entries: Some(res.join("base.entries.trinkets.json")),
            rarity_frame: Some(res.join("rarity_stochastic_frame.png")),
        },
        output: OutputPaths {
            buffs: out.join("trinkets/mod.buffs.json"),
            entries: out.join("trinkets/mod.entries.trinkets.json"),
            rarities: out.join("trinkets/mod.rarities.trinkets.json"),
            strings: out.join("localization/mod.string_table.xml"),
            image_dir: out.join("panels/icons_equip/trinket"),
        },
        generator: GeneratorSettings::default(),
        retry: RetrySettings::default(),
        policy: PolicySettings::default(),
    }
}

/// A forge over the sample resources with outputs in a fresh temp dir.
pub fn forge() -> (TempDir, Forge) {
    let temp = TempDir::new().expect("temp dir");
    let forge = Forge::from_config(config_for(temp.path())).expect("sample catalog loads");
    (temp, forge)
}

pub fn tuned(pairs: &[(&str, &str)]) -> TunedStatSet {
    pairs.iter().copied().collect()
}

/// Answers requests from a fixed script and records every request.
pub struct ScriptedGenerator {
    answers: VecDeque<String>,
    pub requests: Vec<GenerationRequest>,
}

impl ScriptedGenerator {
    pub fn new(answers: &[&str]) -> Self {
        Self {
            answers: answers.iter().map(|a| (*a).to_string()).collect(),
            requests: Vec::new(),
        }
    }

    pub fn roles(&self) -> Vec<GeneratorRole> {
        self.requests.iter().map(|r| r.role).collect()
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl Generator for ScriptedGenerator {
    fn generate(&mut self, request: &GenerationRequest) -> Result<String> {
        self.requests.push(request.clone());
        self.answers.pop_front().ok_or_else(|| Error::Generation {
            role: request.role.to_string(),
            message: "script exhausted".to_string(),
        })
    }
}
