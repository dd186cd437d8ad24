//! Earth Tycoon セーブ/ロード機能。
//!
//! ## バージョニング方針
//!
//! - `SAVE_VERSION`: 現在のセーブ形式バージョン。フィールド追加時にインクリメントする。
//! - `MIN_COMPATIBLE_VERSION`: 互換性を維持できる最小バージョン。
//!   既存フィールドの意味変更や削除など破壊的変更を行った場合のみインクリメントする。
//!
//! `version` を持たないセーブデータは旧形式として扱い、そのまま読み込む。
//! 旧フィールド名 (`credits`, `totalLandOwned` など) も受け付ける。
//!
//! ## 読み込みの寛容さ
//!
//! 数値フィールドは数値でも数値文字列でもよく、解釈できなければデフォルト値を使う。
//! 壊れた建物は捨て、レベルは 1..=3 に丸め、重複 ID は先勝ちで残す。
//! 地域はカタログの 150 件を基準に ID で突き合わせる。

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::PathBuf;
use std::rc::Rc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::catalog::{AbilityKind, BuildingType, MAX_BUILDING_LEVEL};
use super::logic::{area_unit_cost, refresh_unlocks};
use super::state::{Building, EngineState, BASE_INCOME_PER_CLICK};
use crate::error::{DecodeError, StoreError};

/// セーブデータのフォーマットバージョン。
pub const SAVE_VERSION: u32 = 1;

/// 互換性を維持できる最小バージョン。
pub const MIN_COMPATIBLE_VERSION: u32 = 1;

/// Key/value storage for a single save blob.
pub trait BlobStore {
    /// `Ok(None)` when nothing is stored under `key`.
    fn load(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn save(&mut self, key: &str, blob: &str) -> Result<(), StoreError>;
    /// Removing a missing key is not an error.
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

// ── In-memory store ───────────────────────────────────────

/// In-process store. Clones share the same map, so a test can keep a handle
/// to inspect what the engine wrote.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    blobs: Rc<RefCell<HashMap<String, String>>>,
    failing: Rc<RefCell<bool>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.blobs.borrow().get(key).cloned()
    }

    pub fn insert(&self, key: &str, blob: &str) {
        self.blobs.borrow_mut().insert(key.to_string(), blob.to_string());
    }

    /// While set, every operation fails as if the backend were gone.
    pub fn set_failing(&self, failing: bool) {
        *self.failing.borrow_mut() = failing;
    }

    fn check(&self) -> Result<(), StoreError> {
        if *self.failing.borrow() {
            return Err(StoreError::Unavailable("memory store set to fail".into()));
        }
        Ok(())
    }
}

impl BlobStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.check()?;
        Ok(self.get(key))
    }

    fn save(&mut self, key: &str, blob: &str) -> Result<(), StoreError> {
        self.check()?;
        self.insert(key, blob);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.check()?;
        self.blobs.borrow_mut().remove(key);
        Ok(())
    }
}

// ── File store ────────────────────────────────────────────

/// One `<key>.json` file per key under a directory.
#[derive(Clone, Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    fn io_err(key: &str, source: std::io::Error) -> StoreError {
        StoreError::Io {
            key: key.to_string(),
            source,
        }
    }
}

impl BlobStore for FileStore {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        match std::fs::read_to_string(self.path(key)) {
            Ok(blob) => Ok(Some(blob)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Self::io_err(key, e)),
        }
    }

    fn save(&mut self, key: &str, blob: &str) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.dir).map_err(|e| Self::io_err(key, e))?;
        // 書き込み途中で落ちても既存のセーブを壊さないよう、一時ファイル経由で置き換える。
        let tmp = self.dir.join(format!("{key}.json.tmp"));
        std::fs::write(&tmp, blob).map_err(|e| Self::io_err(key, e))?;
        std::fs::rename(&tmp, self.path(key)).map_err(|e| Self::io_err(key, e))
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        match std::fs::remove_file(self.path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Self::io_err(key, e)),
        }
    }
}

// ── Browser store ─────────────────────────────────────────

/// Browser `localStorage`. WASM 環境でのみ動作。
#[cfg(target_arch = "wasm32")]
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalStorageStore;

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    fn storage() -> Result<web_sys::Storage, StoreError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok().flatten())
            .ok_or_else(|| StoreError::Unavailable("localStorage is not available".into()))
    }
}

#[cfg(target_arch = "wasm32")]
impl BlobStore for LocalStorageStore {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        Self::storage()?
            .get_item(key)
            .map_err(|e| StoreError::Unavailable(format!("{e:?}")))
    }

    fn save(&mut self, key: &str, blob: &str) -> Result<(), StoreError> {
        Self::storage()?
            .set_item(key, blob)
            .map_err(|e| StoreError::Unavailable(format!("{e:?}")))
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        Self::storage()?
            .remove_item(key)
            .map_err(|e| StoreError::Unavailable(format!("{e:?}")))
    }
}

// ── Blob format (write side) ──────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SaveData {
    version: u32,
    currency: f64,
    income_per_click: f64,
    income_per_second: f64,
    total_clicks: u64,
    total_area_owned: f64,
    next_area_unit_cost: f64,
    area_purchase_amount: u64,
    regions: Vec<RegionSave>,
    abilities: BTreeMap<&'static str, AbilitySave>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RegionSave {
    id: u32,
    unlocked: bool,
    buildings: Vec<BuildingSave>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BuildingSave {
    id: String,
    #[serde(rename = "type")]
    kind: BuildingType,
    level: u8,
    region_id: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AbilitySave {
    unlocked: bool,
    active: bool,
    /// 0 = 未使用
    last_activated: u64,
    duration: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    multiplier: Option<f64>,
}

fn extract_save(state: &EngineState) -> SaveData {
    SaveData {
        version: SAVE_VERSION,
        currency: state.currency,
        income_per_click: state.income_per_click,
        income_per_second: state.income_per_second,
        total_clicks: state.total_clicks,
        total_area_owned: state.total_area_owned,
        next_area_unit_cost: state.next_area_unit_cost,
        area_purchase_amount: state.area_purchase_amount,
        regions: state
            .regions
            .iter()
            .map(|r| RegionSave {
                id: r.id,
                unlocked: r.unlocked,
                buildings: r
                    .buildings
                    .iter()
                    .map(|b| BuildingSave {
                        id: b.id.clone(),
                        kind: b.kind,
                        level: b.level,
                        region_id: b.region_id,
                    })
                    .collect(),
            })
            .collect(),
        abilities: state
            .abilities
            .iter()
            .map(|a| {
                let save = AbilitySave {
                    unlocked: a.unlocked,
                    active: a.active,
                    last_activated: a.last_activated_at.unwrap_or(0),
                    duration: a.kind.duration_secs(),
                    multiplier: (a.kind == AbilityKind::TapMultiplier)
                        .then(|| a.kind.multiplier()),
                };
                (a.kind.key(), save)
            })
            .collect(),
    }
}

/// Serialize the persistent part of the state.
pub fn encode(state: &EngineState) -> Result<String, serde_json::Error> {
    serde_json::to_string(&extract_save(state))
}

// ── Blob format (read side) ───────────────────────────────

/// Any JSON value; `None` when it doesn't fit `T`.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|n| n.is_finite())
}

/// Number or numeric string; `None` otherwise.
fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(as_number(&value))
}

/// 旧フィールド名は別フィールドで受け、新旧両方あれば新しい名前を優先する。
#[derive(Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
struct LoadData {
    #[serde(deserialize_with = "lenient_f64")]
    version: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    currency: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    credits: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    income_per_click: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    credits_per_click: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    income_per_second: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    credits_per_second: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    total_clicks: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    total_area_owned: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    total_land_owned: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    area_purchase_amount: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    land_purchase_amount: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    regions: Option<Vec<Value>>,
    #[serde(deserialize_with = "lenient")]
    abilities: Option<BTreeMap<String, Value>>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct RegionLoad {
    #[serde(deserialize_with = "lenient_f64")]
    id: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    unlocked: Option<bool>,
    #[serde(deserialize_with = "lenient")]
    buildings: Option<Vec<Value>>,
}

#[derive(Deserialize)]
struct BuildingLoad {
    id: String,
    #[serde(rename = "type")]
    kind: BuildingType,
    #[serde(default, deserialize_with = "lenient_f64")]
    level: Option<f64>,
}

#[derive(Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
struct AbilityLoad {
    #[serde(deserialize_with = "lenient")]
    unlocked: Option<bool>,
    #[serde(deserialize_with = "lenient")]
    active: Option<bool>,
    #[serde(deserialize_with = "lenient_f64")]
    last_activated: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    last_activated_at: Option<f64>,
}

fn whole(n: f64) -> u64 {
    if n.is_finite() && n > 0.0 {
        n.floor() as u64
    } else {
        0
    }
}

/// Restore a state from a blob, merging whatever it holds over defaults.
pub fn decode(blob: &str) -> Result<EngineState, DecodeError> {
    let value: Value = serde_json::from_str(blob)?;
    if !value.is_object() {
        return Err(DecodeError::NotAnObject);
    }
    let data: LoadData = serde_json::from_value(value)?;

    if let Some(version) = data.version {
        let saved = whole(version) as u32;
        if saved < MIN_COMPATIBLE_VERSION {
            return Err(DecodeError::TooOld {
                saved,
                min: MIN_COMPATIBLE_VERSION,
            });
        }
    }

    let mut state = EngineState::new();
    apply_save(&mut state, data);
    Ok(state)
}

fn apply_save(state: &mut EngineState, data: LoadData) {
    state.currency = data.currency.or(data.credits).unwrap_or(0.0).max(0.0);
    state.income_per_second = data
        .income_per_second
        .or(data.credits_per_second)
        .unwrap_or(0.0)
        .max(0.0);
    state.income_per_click = data
        .income_per_click
        .or(data.credits_per_click)
        .filter(|n| *n >= 0.0)
        .unwrap_or(BASE_INCOME_PER_CLICK);
    state.total_clicks = data.total_clicks.map(whole).unwrap_or(0);
    state.total_area_owned = data
        .total_area_owned
        .or(data.total_land_owned)
        .unwrap_or(0.0)
        .max(0.0);
    state.next_area_unit_cost = area_unit_cost(state.total_area_owned);
    state.area_purchase_amount = data
        .area_purchase_amount
        .or(data.land_purchase_amount)
        .map(whole)
        .unwrap_or(1)
        .max(1);

    // 地域復元: カタログ順を維持し、ID が一致するものだけ取り込む
    let mut saved_regions: HashMap<u32, RegionLoad> = HashMap::new();
    for value in data.regions.unwrap_or_default() {
        let Ok(region) = serde_json::from_value::<RegionLoad>(value) else {
            continue;
        };
        if let Some(id) = region.id {
            saved_regions.entry(whole(id) as u32).or_insert(region);
        }
    }
    let mut seen_ids: HashSet<String> = HashSet::new();
    for region in state.regions.iter_mut() {
        let Some(saved) = saved_regions.remove(&region.id) else {
            continue;
        };
        region.unlocked |= saved.unlocked.unwrap_or(false);
        for value in saved.buildings.unwrap_or_default() {
            let Ok(b) = serde_json::from_value::<BuildingLoad>(value) else {
                continue;
            };
            if b.id.is_empty() || !seen_ids.insert(b.id.clone()) {
                continue;
            }
            let level = b
                .level
                .map(|l| l.round().clamp(1.0, MAX_BUILDING_LEVEL as f64) as u8)
                .unwrap_or(1);
            region.buildings.push(Building {
                id: b.id,
                kind: b.kind,
                level,
                region_id: region.id,
            });
        }
    }

    // アビリティ復元: multiplier / duration はカタログの値を使う
    let mut saved_abilities = data.abilities.unwrap_or_default();
    for ability in state.abilities.iter_mut() {
        let Some(value) = saved_abilities.remove(ability.kind.key()) else {
            continue;
        };
        let saved: AbilityLoad = serde_json::from_value(value).unwrap_or_default();
        ability.unlocked = saved.unlocked.unwrap_or(false);
        ability.active = saved.active.unwrap_or(false);
        ability.last_activated_at = saved
            .last_activated
            .or(saved.last_activated_at)
            .map(whole)
            .filter(|t| *t > 0);
        // 起動時刻が無いのに active ならウィンドウを計算できないので止めておく
        if ability.last_activated_at.is_none() {
            ability.active = false;
        }
    }

    refresh_unlocks(state);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::economy::logic::{build_building, purchase_area, upgrade_building};

    fn played_state() -> EngineState {
        let mut s = EngineState::new();
        s.currency = 1e9;
        purchase_area(&mut s, 600).unwrap();
        let id = build_building(&mut s, 1, BuildingType::SolarPanel, 42).unwrap();
        upgrade_building(&mut s, &id).unwrap();
        s.total_clicks = 77;
        s.area_purchase_amount = 25;
        s.ability_mut(AbilityKind::TapMultiplier).last_activated_at = Some(1_000);
        s
    }

    #[test]
    fn encode_and_decode_roundtrip() {
        let played = played_state();
        let blob = encode(&played).unwrap();
        let restored = decode(&blob).unwrap();
        assert_eq!(restored, played);
    }

    #[test]
    fn blob_uses_camel_case_and_version() {
        let blob = encode(&EngineState::new()).unwrap();
        let v: Value = serde_json::from_str(&blob).unwrap();
        assert_eq!(v["version"], SAVE_VERSION);
        assert!(v.get("incomePerClick").is_some());
        assert!(v.get("totalAreaOwned").is_some());
        assert_eq!(v["regions"].as_array().unwrap().len(), 150);
        assert_eq!(v["abilities"]["tapMultiplier"]["multiplier"], 1.5);
        assert!(v["abilities"]["stealingLand"].get("multiplier").is_none());
        assert_eq!(v["abilities"]["continuousTapping"]["lastActivated"], 0);
    }

    #[test]
    fn building_serialized_with_type_field() {
        let blob = encode(&played_state()).unwrap();
        let v: Value = serde_json::from_str(&blob).unwrap();
        let b = &v["regions"][0]["buildings"][0];
        assert_eq!(b["type"], "solar_panel");
        assert_eq!(b["regionId"], 1);
        assert_eq!(b["level"], 2);
    }

    #[test]
    fn empty_object_gives_defaults() {
        let s = decode("{}").unwrap();
        assert_eq!(s, EngineState::new());
    }

    #[test]
    fn legacy_field_names_accepted() {
        let blob = r#"{
            "credits": 1234.5,
            "creditsPerClick": 101,
            "creditsPerSecond": 1,
            "totalLandOwned": 100,
            "nextLandCost": 99,
            "landPurchaseAmount": 4,
            "totalClicks": 9
        }"#;
        let s = decode(blob).unwrap();
        assert!((s.currency - 1234.5).abs() < 1e-9);
        assert!((s.income_per_click - 101.0).abs() < 1e-9);
        assert!((s.total_area_owned - 100.0).abs() < 1e-9);
        assert_eq!(s.area_purchase_amount, 4);
        assert_eq!(s.total_clicks, 9);
        // Cached cost is recomputed rather than trusted.
        assert!((s.next_area_unit_cost - area_unit_cost(100.0)).abs() < 1e-12);
        // Unlocks follow the restored area.
        assert!(s.ability(AbilityKind::TapMultiplier).unlocked);
    }

    #[test]
    fn new_and_legacy_names_together_prefer_new() {
        let blob = r#"{
            "currency": 500,
            "credits": 400,
            "totalAreaOwned": 1000,
            "totalLandOwned": 7,
            "incomePerClick": 110,
            "creditsPerClick": 101,
            "areaPurchaseAmount": 3,
            "landPurchaseAmount": 9,
            "abilities": {
                "tapMultiplier": {"unlocked": true, "lastActivated": 2000, "lastActivatedAt": 1000}
            }
        }"#;
        let s = decode(blob).unwrap();
        assert!((s.currency - 500.0).abs() < 1e-9);
        assert!((s.total_area_owned - 1000.0).abs() < 1e-9);
        assert!((s.income_per_click - 110.0).abs() < 1e-9);
        assert_eq!(s.area_purchase_amount, 3);
        assert_eq!(
            s.ability(AbilityKind::TapMultiplier).last_activated_at,
            Some(2000)
        );
    }

    #[test]
    fn legacy_name_used_when_new_one_is_unreadable() {
        let s = decode(r#"{"currency": "lots", "credits": 250}"#).unwrap();
        assert!((s.currency - 250.0).abs() < 1e-9);
    }

    #[test]
    fn numeric_strings_coerced() {
        let s = decode(r#"{"currency": " 42.5 ", "totalAreaOwned": "3"}"#).unwrap();
        assert!((s.currency - 42.5).abs() < 1e-9);
        assert!((s.total_area_owned - 3.0).abs() < 1e-9);
    }

    #[test]
    fn bad_numbers_fall_back_to_defaults() {
        let s = decode(r#"{"currency": "lots", "incomePerClick": null, "totalClicks": [1]}"#)
            .unwrap();
        assert!((s.currency - 0.0).abs() < f64::EPSILON);
        assert!((s.income_per_click - 100.0).abs() < f64::EPSILON);
        assert_eq!(s.total_clicks, 0);
    }

    #[test]
    fn negative_currency_clamped() {
        let s = decode(r#"{"currency": -50}"#).unwrap();
        assert!((s.currency - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn malformed_buildings_skipped_and_levels_clamped() {
        let blob = r#"{"regions": [
            {"id": 1, "unlocked": true, "buildings": [
                {"id": "a", "type": "solar_panel", "level": 9, "regionId": 1},
                {"id": "b", "type": "death_star", "level": 1},
                {"type": "wind_turbine", "level": 1},
                "junk",
                {"id": "c", "type": "factory", "level": 0}
            ]},
            {"id": 2, "buildings": [
                {"id": "a", "type": "factory", "level": 1}
            ]}
        ]}"#;
        let s = decode(blob).unwrap();
        let r1 = &s.regions[0].buildings;
        assert_eq!(r1.len(), 2);
        assert_eq!(r1[0].id, "a");
        assert_eq!(r1[0].level, 3);
        assert_eq!(r1[1].id, "c");
        assert_eq!(r1[1].level, 1);
        // Duplicate id "a" dropped.
        assert!(s.regions[1].buildings.is_empty());
    }

    #[test]
    fn regions_matched_by_id() {
        let blob = r#"{"regions": [
            {"id": 3, "unlocked": true, "buildings": [{"id": "x", "type": "factory", "level": 2, "regionId": 99}]},
            {"id": 999, "unlocked": true},
            {"unlocked": true}
        ]}"#;
        let s = decode(blob).unwrap();
        assert_eq!(s.regions.len(), 150);
        assert!(s.regions[2].unlocked);
        let b = &s.regions[2].buildings[0];
        assert_eq!(b.region_id, 3);
        assert_eq!(b.level, 2);
    }

    #[test]
    fn ability_zero_timestamp_means_never() {
        let blob = r#"{"abilities": {
            "tapMultiplier": {"unlocked": true, "active": false, "lastActivated": 0, "duration": 999, "multiplier": 10},
            "stealingLand": {"unlocked": true, "active": true, "lastActivated": "5000"}
        }}"#;
        let s = decode(blob).unwrap();
        let tap = s.ability(AbilityKind::TapMultiplier);
        assert!(tap.unlocked);
        assert_eq!(tap.last_activated_at, None);
        let steal = s.ability(AbilityKind::StealingLand);
        assert!(steal.active);
        assert_eq!(steal.last_activated_at, Some(5_000));
    }

    #[test]
    fn active_without_timestamp_is_cleared() {
        let blob = r#"{"abilities": {"continuousTapping": {"unlocked": true, "active": true}}}"#;
        let s = decode(blob).unwrap();
        assert!(!s.ability(AbilityKind::ContinuousTapping).active);
    }

    #[test]
    fn version_gate() {
        assert!(matches!(
            decode(r#"{"version": 0}"#),
            Err(DecodeError::TooOld { saved: 0, min: 1 })
        ));
        assert!(decode(r#"{"version": 1}"#).is_ok());
        // Newer saves load best-effort.
        assert!(decode(r#"{"version": 7}"#).is_ok());
    }

    #[test]
    fn garbage_rejected() {
        assert!(matches!(decode("not json"), Err(DecodeError::Malformed(_))));
        assert!(matches!(decode("[1,2]"), Err(DecodeError::NotAnObject)));
    }

    #[test]
    fn float_roundtrip_is_exact() {
        let mut s = EngineState::new();
        s.currency = 0.1 + 0.2;
        s.total_area_owned = 1.0 / 3.0;
        let restored = decode(&encode(&s).unwrap()).unwrap();
        assert_eq!(restored.currency.to_bits(), s.currency.to_bits());
        assert_eq!(restored.total_area_owned.to_bits(), s.total_area_owned.to_bits());
    }

    // ── Stores ────────────────────────────────────────────

    #[test]
    fn memory_store_clones_share_blobs() {
        let store = MemoryStore::new();
        let mut handle = store.clone();
        handle.save("k", "v").unwrap();
        assert_eq!(store.load("k").unwrap(), Some("v".to_string()));
        handle.remove("k").unwrap();
        assert_eq!(store.load("k").unwrap(), None);
    }

    #[test]
    fn memory_store_failure_mode() {
        let mut store = MemoryStore::new();
        store.set_failing(true);
        assert!(matches!(store.save("k", "v"), Err(StoreError::Unavailable(_))));
        store.set_failing(false);
        assert!(store.save("k", "v").is_ok());
    }

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "earth-tycoon-{}-{}",
            name,
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn file_store_roundtrip() {
        let dir = temp_dir("roundtrip");
        let mut store = FileStore::new(&dir);
        assert_eq!(store.load("earthGameState").unwrap(), None);
        store.save("earthGameState", "{\"a\":1}").unwrap();
        assert_eq!(
            store.load("earthGameState").unwrap().as_deref(),
            Some("{\"a\":1}")
        );
        assert!(!dir.join("earthGameState.json.tmp").exists());
        store.save("earthGameState", "{}").unwrap();
        assert_eq!(store.load("earthGameState").unwrap().as_deref(), Some("{}"));
        store.remove("earthGameState").unwrap();
        store.remove("earthGameState").unwrap();
        assert_eq!(store.load("earthGameState").unwrap(), None);
        let _ = std::fs::remove_dir_all(&dir);
    }
}
