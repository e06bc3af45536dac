use serde::{Deserialize, Serialize};

use crate::{LookupError, MirrorConfig, PresetId, Timestamp, ValidationError};

/// A named, reusable config snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preset {
    pub id: PresetId,
    pub name: String,
    pub created_at: Timestamp,
    pub config: MirrorConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PresetBook {
    presets: Vec<Preset>,
}

impl PresetBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn restore(presets: Vec<Preset>) -> Self {
        Self { presets }
    }

    /// Saves a copy of `config` under `name`.
    pub fn create(
        &mut self,
        name: &str,
        config: &MirrorConfig,
        now: Timestamp,
    ) -> Result<&Preset, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::BlankPresetName);
        }
        self.presets.push(Preset {
            id: PresetId::new(),
            name: name.to_owned(),
            created_at: now,
            config: config.clone(),
        });
        Ok(&self.presets[self.presets.len() - 1])
    }

    pub fn get(&self, id: PresetId) -> Option<&Preset> {
        self.presets.iter().find(|preset| preset.id == id)
    }

    pub fn delete(&mut self, id: PresetId) -> Result<Preset, LookupError> {
        let index = self
            .presets
            .iter()
            .position(|preset| preset.id == id)
            .ok_or(LookupError::Preset(id))?;
        Ok(self.presets.remove(index))
    }

    pub fn list(&self) -> &[Preset] {
        &self.presets
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }
}
