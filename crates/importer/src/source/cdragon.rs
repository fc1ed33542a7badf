//! CommunityDragon game-data source.

use async_trait::async_trait;
use game_core::Slot;
use runtime::{AbilityRecord, ChampionRecord, SkinRecord};
use serde::Deserialize;

use super::{ChampionRef, ChampionSource, JsonClient};
use crate::error::SourceError;
use crate::normalize::{affected_by_cdr, asset_url, non_empty, rarity, truncate_ranks};

pub const DEFAULT_BASE_URL: &str =
    "https://raw.communitydragon.org/latest/plugins/rcp-be-lol-game-data/global/default/v1";

/// Ids outside this range are placeholders or non-playable entries.
const PLAYABLE_IDS: std::ops::Range<i64> = 1..1000;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryPayload {
    id: i64,
    name: String,
    alias: String,
    #[serde(default)]
    square_portrait_path: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChampionPayload {
    id: i64,
    name: String,
    alias: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    square_portrait_path: Option<String>,
    #[serde(default)]
    roles: Vec<String>,
    passive: PassivePayload,
    #[serde(default)]
    spells: Vec<SpellPayload>,
    #[serde(default)]
    skins: Vec<SkinPayload>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PassivePayload {
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    ability_icon_path: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SpellPayload {
    spell_key: String,
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    ability_icon_path: Option<String>,
    #[serde(default)]
    cooldown_coefficients: Vec<f64>,
    #[serde(default)]
    cost_coefficients: Vec<f64>,
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

/// Reads `champion-summary.json` and `champions/{id}.json`.
#[derive(Clone, Debug)]
pub struct CDragonSource {
    base_url: String,
    client: JsonClient,
}

impl CDragonSource {
    pub fn new(base_url: impl Into<String>, http_client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: JsonClient::new(http_client),
        }
    }
}

impl Default for CDragonSource {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL, reqwest::Client::new())
    }
}

#[async_trait]
impl ChampionSource for CDragonSource {
    fn name(&self) -> &'static str {
        "cdragon"
    }

    async fn champion_list(&self) -> Result<Vec<ChampionRef>, SourceError> {
        let url = format!("{}/champion-summary.json", self.base_url);
        let summaries: Vec<SummaryPayload> = self.client.get(&url).await?;
        Ok(playable(summaries))
    }

    async fn champion(&self, champion: &ChampionRef) -> Result<ChampionRecord, SourceError> {
        let url = format!("{}/champions/{}.json", self.base_url, champion.id);
        let payload: ChampionPayload = self.client.get(&url).await?;
        into_record(champion, payload)
    }
}

fn playable(summaries: Vec<SummaryPayload>) -> Vec<ChampionRef> {
    summaries
        .into_iter()
        .filter(|summary| PLAYABLE_IDS.contains(&summary.id))
        .map(|summary| ChampionRef {
            id: summary.id,
            key: summary.alias,
            name: summary.name,
            icon: summary.square_portrait_path,
        })
        .collect()
}

fn spell_slot(key: &str) -> Option<Slot> {
    match key.to_ascii_lowercase().as_str() {
        "q" => Some(Slot::Q),
        "w" => Some(Slot::W),
        "e" => Some(Slot::E),
        "r" => Some(Slot::R),
        _ => None,
    }
}

fn into_record(
    summary: &ChampionRef,
    payload: ChampionPayload,
) -> Result<ChampionRecord, SourceError> {
    let icon = summary
        .icon
        .as_deref()
        .or(payload.square_portrait_path.as_deref())
        .map(asset_url)
        .ok_or_else(|| SourceError::Malformed(format!("{} has no portrait", payload.name)))?;

    let mut abilities = Vec::with_capacity(payload.spells.len() + 1);
    abilities.push(AbilityRecord {
        slot: Slot::P,
        name: payload.passive.name,
        description: non_empty(payload.passive.description.as_deref()),
        icon: payload.passive.ability_icon_path.as_deref().map(asset_url),
        cooldowns: Vec::new(),
        affected_by_cdr: affected_by_cdr(&payload.name, Slot::P),
        costs: Vec::new(),
    });

    for spell in payload.spells {
        let Some(slot) = spell_slot(&spell.spell_key) else {
            tracing::debug!(champion = %payload.name, key = %spell.spell_key, "skipping spell");
            continue;
        };
        abilities.push(AbilityRecord {
            slot,
            name: spell.name,
            description: non_empty(spell.description.as_deref()),
            icon: spell.ability_icon_path.as_deref().map(asset_url),
            cooldowns: truncate_ranks(&spell.cooldown_coefficients),
            affected_by_cdr: affected_by_cdr(&payload.name, slot),
            costs: truncate_ranks(&spell.cost_coefficients),
        });
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

    Ok(ChampionRecord {
        riot_id: payload.id,
        key: payload.alias,
        name: payload.name,
        title: payload.title,
        icon,
        roles: payload.roles,
        abilities,
        skins,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::ASSET_BASE_URL;

    const SUMMARY: &str = r#"[
        {"id": -1, "name": "None", "alias": "None", "squarePortraitPath": "/x.png", "roles": []},
        {"id": 103, "name": "Ahri", "alias": "Ahri",
         "squarePortraitPath": "/lol-game-data/assets/v1/champion-icons/103.png", "roles": ["mage"]},
        {"id": 3151, "name": "Doombot", "alias": "Doombot", "squarePortraitPath": "/x.png", "roles": []}
    ]"#;

    const AHRI: &str = r#"{
        "id": 103,
        "name": "Ahri",
        "alias": "Ahri",
        "title": "the Nine-Tailed Fox",
        "roles": ["mage", "assassin"],
        "passive": {
            "name": "Essence Theft",
            "description": "",
            "abilityIconPath": "/lol-game-data/assets/ASSETS/Characters/Ahri/HUD/Icons2D/Ahri_SoulEater2.png"
        },
        "spells": [
            {"spellKey": "q", "name": "Orb of Deception", "description": "Ahri sends out an orb.",
             "abilityIconPath": "/lol-game-data/assets/ASSETS/Characters/Ahri/HUD/Icons2D/Ahri_Q.png",
             "cooldownCoefficients": [7, 7, 7, 7, 7, 0],
             "costCoefficients": [55, 65, 75, 85, 95, 0]},
            {"spellKey": "r", "name": "Spirit Rush", "description": "",
             "abilityIconPath": "/lol-game-data/assets/ASSETS/Characters/Ahri/HUD/Icons2D/Ahri_R.png",
             "cooldownCoefficients": [130, 105, 80, 0, 0, 0],
             "costCoefficients": [100, 100, 100, 0, 0, 0]},
            {"spellKey": "x", "name": "Unused", "cooldownCoefficients": [1]}
        ],
        "skins": [
            {"id": 103000, "name": "Ahri", "isBase": true, "rarity": "kNoRarity", "isLegacy": false,
             "splashPath": "/lol-game-data/assets/ASSETS/Characters/Ahri/Skins/Base/Images/ahri_splash_centered_0.jpg",
             "tilePath": "/lol-game-data/assets/ASSETS/Characters/Ahri/Skins/Base/Images/ahri_splash_tile_0.jpg"},
            {"id": 103086, "name": "Spirit Blossom Ahri", "isBase": false, "rarity": "kMythic", "isLegacy": false,
             "splashPath": "/lol-game-data/assets/ASSETS/Characters/Ahri/Skins/Skin86/Images/ahri_splash_centered_86.jpg"}
        ]
    }"#;

    fn ahri() -> ChampionRecord {
        let list = playable(serde_json::from_str(SUMMARY).unwrap());
        into_record(&list[0], serde_json::from_str(AHRI).unwrap()).unwrap()
    }

    #[test]
    fn summary_keeps_playable_ids_only() {
        let list = playable(serde_json::from_str(SUMMARY).unwrap());

        assert_eq!(list.len(), 1);
        assert_eq!(list[0].id, 103);
        assert_eq!(list[0].key, "Ahri");
    }

    #[test]
    fn passive_comes_first_with_no_cooldowns() {
        let record = ahri();
        let passive = &record.abilities[0];

        assert_eq!(passive.slot, Slot::P);
        assert!(passive.cooldowns.is_empty());
        assert_eq!(passive.description, None);
        assert!(passive.affected_by_cdr);
    }

    #[test]
    fn spells_map_to_slots_and_truncate() {
        let record = ahri();
        let slots: Vec<Slot> = record.abilities.iter().map(|a| a.slot).collect();
        assert_eq!(slots, vec![Slot::P, Slot::Q, Slot::R]);

        let q = &record.abilities[1];
        assert_eq!(q.cooldowns, vec![7.0; 5]);
        assert_eq!(q.costs, vec![55.0, 65.0, 75.0, 85.0, 95.0]);
        assert_eq!(q.description.as_deref(), Some("Ahri sends out an orb."));

        let r = &record.abilities[2];
        assert_eq!(r.cooldowns, vec![130.0, 105.0, 80.0, 0.0, 0.0]);
        assert_eq!(r.description, None);
    }

    #[test]
    fn asset_paths_are_normalized() {
        let record = ahri();

        assert_eq!(
            record.icon,
            format!("{ASSET_BASE_URL}v1/champion-icons/103.png")
        );
        assert_eq!(
            record.abilities[1].icon.as_deref(),
            Some(format!("{ASSET_BASE_URL}assets/characters/ahri/hud/icons2d/ahri_q.png").as_str())
        );
        assert!(record.skins[0].splash_path.starts_with(ASSET_BASE_URL));
        assert_eq!(record.skins[0].splash_path, record.skins[0].splash_path.to_lowercase());
    }

    #[test]
    fn skins_carry_rarity_and_optional_tile() {
        let record = ahri();

        assert_eq!(record.skins.len(), 2);
        assert!(record.skins[0].is_base);
        assert_eq!(record.skins[0].rarity.as_deref(), Some("NoRarity"));
        assert!(record.skins[0].tile_path.is_some());
        assert_eq!(record.skins[1].rarity.as_deref(), Some("Mythic"));
        assert_eq!(record.skins[1].tile_path, None);
    }

    #[test]
    fn champion_fields_copy_through() {
        let record = ahri();

        assert_eq!(record.riot_id, 103);
        assert_eq!(record.key, "Ahri");
        assert_eq!(record.title, "the Nine-Tailed Fox");
        assert_eq!(record.roles, vec!["mage", "assassin"]);
    }

    #[test]
    fn missing_portrait_is_malformed() {
        let champion = ChampionRef {
            id: 103,
            key: "Ahri".to_string(),
            name: "Ahri".to_string(),
            icon: None,
        };
        let result = into_record(&champion, serde_json::from_str(AHRI).unwrap());

        assert!(matches!(result, Err(SourceError::Malformed(_))));
    }
}
