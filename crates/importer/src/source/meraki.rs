//! Meraki Analytics champion data source.
//!
//! Documents group abilities by slot letter, each slot holding one entry per
//! form (transforming champions list several). Cooldowns and costs come as
//! modifier arrays; the first modifier carries the per-rank values.

use std::collections::BTreeMap;

use async_trait::async_trait;
use game_core::Slot;
use runtime::{AbilityRecord, ChampionRecord, SkinRecord};
use serde::Deserialize;

use super::{ChampionRef, ChampionSource, JsonClient};
use crate::error::SourceError;
use crate::normalize::{affected_by_cdr, asset_url, non_empty, rarity, truncate_ranks};

pub const DEFAULT_BASE_URL: &str = "https://cdn.merakianalytics.com/riot/lol/resources/latest/en-US";

#[derive(Deserialize)]
struct ListEntry {
    id: i64,
    key: String,
    name: String,
    #[serde(default)]
    icon: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChampionPayload {
    id: i64,
    key: String,
    name: String,
    #[serde(default)]
    title: String,
    icon: String,
    #[serde(default)]
    roles: Vec<String>,
    #[serde(default)]
    abilities: BTreeMap<String, Vec<AbilityPayload>>,
    #[serde(default)]
    skins: Vec<SkinPayload>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AbilityPayload {
    name: String,
    #[serde(default)]
    icon: Option<String>,
    #[serde(default)]
    blurb: Option<String>,
    #[serde(default)]
    cooldown: Option<Cooldown>,
    #[serde(default)]
    cost: Option<Modifiers>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Cooldown {
    #[serde(default)]
    modifiers: Vec<Modifier>,
    #[serde(default)]
    affected_by_cdr: Option<bool>,
}

#[derive(Deserialize)]
struct Modifiers {
    #[serde(default)]
    modifiers: Vec<Modifier>,
}

#[derive(Deserialize)]
struct Modifier {
    #[serde(default)]
    values: Vec<f64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SkinPayload {
    id: i64,
    name: String,
    #[serde(default)]
    is_base: bool,
    #[serde(default)]
    rarity: String,
    #[serde(default)]
    is_legacy: bool,
    splash_path: String,
    #[serde(default)]
    tile_path: Option<String>,
}

/// Reads `champions.json` and `champions/{key}.json`.
#[derive(Clone, Debug)]
pub struct MerakiSource {
    base_url: String,
    client: JsonClient,
}

impl MerakiSource {
    pub fn new(base_url: impl Into<String>, http_client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: JsonClient::new(http_client),
        }
    }
}

impl Default for MerakiSource {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL, reqwest::Client::new())
    }
}

#[async_trait]
impl ChampionSource for MerakiSource {
    fn name(&self) -> &'static str {
        "meraki"
    }

    async fn champion_list(&self) -> Result<Vec<ChampionRef>, SourceError> {
        let url = format!("{}/champions.json", self.base_url);
        let entries: BTreeMap<String, ListEntry> = self.client.get(&url).await?;
        Ok(into_refs(entries))
    }

    async fn champion(&self, champion: &ChampionRef) -> Result<ChampionRecord, SourceError> {
        let url = format!("{}/champions/{}.json", self.base_url, champion.key);
        let payload: ChampionPayload = self.client.get(&url).await?;
        Ok(into_record(payload))
    }
}

fn into_refs(entries: BTreeMap<String, ListEntry>) -> Vec<ChampionRef> {
    let mut refs: Vec<ChampionRef> = entries
        .into_values()
        .map(|entry| ChampionRef {
            id: entry.id,
            key: entry.key,
            name: entry.name,
            icon: entry.icon,
        })
        .collect();
    refs.sort_by(|a, b| a.name.cmp(&b.name));
    refs
}

fn first_values(modifiers: &[Modifier]) -> Vec<f64> {
    modifiers
        .first()
        .map(|modifier| truncate_ranks(&modifier.values))
        .unwrap_or_default()
}

fn into_record(payload: ChampionPayload) -> ChampionRecord {
    let mut abilities = Vec::new();
    for slot in [Slot::P, Slot::Q, Slot::W, Slot::E, Slot::R] {
        let Some(forms) = payload.abilities.get(slot.to_string().as_str()) else {
            continue;
        };
        for form in forms {
            // Passives never take part in a round
            let cooldowns = match (&form.cooldown, slot) {
                (Some(cooldown), s) if s.is_playable() => first_values(&cooldown.modifiers),
                _ => Vec::new(),
            };
            let costs = form
                .cost
                .as_ref()
                .map(|cost| first_values(&cost.modifiers))
                .unwrap_or_default();
            let affected = form
                .cooldown
                .as_ref()
                .and_then(|cooldown| cooldown.affected_by_cdr)
                .unwrap_or_else(|| affected_by_cdr(&payload.name, slot));

            abilities.push(AbilityRecord {
                slot,
                name: form.name.clone(),
                description: non_empty(form.blurb.as_deref()),
                icon: form.icon.as_deref().map(asset_url),
                cooldowns,
                affected_by_cdr: affected,
                costs,
            });
        }
    }

    let skins = payload
        .skins
        .into_iter()
        .map(|skin| SkinRecord {
            riot_id: skin.id,
            name: skin.name,
            is_base: skin.is_base,
            rarity: rarity(&skin.rarity),
            is_legacy: skin.is_legacy,
            splash_path: asset_url(&skin.splash_path),
            tile_path: skin.tile_path.as_deref().map(asset_url),
        })
        .collect();

    ChampionRecord {
        riot_id: payload.id,
        key: payload.key,
        name: payload.name,
        title: payload.title,
        icon: asset_url(&payload.icon),
        roles: payload.roles,
        abilities,
        skins,
    }
}
