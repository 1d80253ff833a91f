//! Field normalization across the two upstream record shapes
//!
//! The primary API uses hyphenated keys (`eye-color`, `full-name`) and string
//! values; the fallback dataset uses camelCase keys (`eyeColor`, `fullName`)
//! and plain numbers. Every function here accepts either shape, including
//! output it produced itself, so normalizing twice changes nothing.

use std::borrow::Cow;

use serde_json::{Map, Value};

use super::{Appearance, Biography, Character, Detail, HeroSummary, Powerstats};

type Object = Map<String, Value>;

/// Name used when a record carries none
pub const UNKNOWN_NAME: &str = "Unknown";

/// Renders a scalar as a string; null, empty strings and containers are absent
fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Returns the first key in `keys` holding a usable value
///
/// Canonical spellings are listed first so they win over alternates.
fn pick(obj: &Object, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| obj.get(*key).and_then(text))
}

/// Returns the first non-empty list under `keys`, or an empty list
fn pick_list(obj: &Object, keys: &[&str]) -> Vec<String> {
    keys.iter()
        .find_map(|key| match obj.get(*key) {
            Some(Value::Array(items)) if !items.is_empty() => {
                Some(items.iter().filter_map(text).collect())
            }
            _ => None,
        })
        .unwrap_or_default()
}

/// Returns the object under `key`, or an empty one
fn section<'a>(obj: &'a Object, key: &str) -> Cow<'a, Object> {
    match obj.get(key) {
        Some(Value::Object(inner)) => Cow::Borrowed(inner),
        _ => Cow::Owned(Object::new()),
    }
}

/// Coerces a record id (string or number) to its string form
pub fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Normalizes an appearance mapping
pub fn normalize_appearance(obj: &Object) -> Appearance {
    Appearance {
        gender: pick(obj, &["gender"]),
        race: pick(obj, &["race"]),
        height: pick_list(obj, &["height"]),
        weight: pick_list(obj, &["weight"]),
        eye_color: pick(obj, &["eye-color", "eyeColor"]),
        hair_color: pick(obj, &["hair-color", "hairColor"]),
    }
}

/// Normalizes a biography mapping
pub fn normalize_biography(obj: &Object) -> Biography {
    Biography {
        full_name: pick(obj, &["full-name", "fullName"]),
        alter_egos: pick(obj, &["alter-egos", "alterEgos"]),
        aliases: pick_list(obj, &["aliases"]),
        place_of_birth: pick(obj, &["place-of-birth", "placeOfBirth"]),
        first_appearance: pick(obj, &["first-appearance", "firstAppearance"]),
        publisher: pick(obj, &["publisher"]),
        alignment: pick(obj, &["alignment"]),
    }
}

/// Normalizes a powerstats mapping; numeric ratings become strings
pub fn normalize_powerstats(obj: &Object) -> Powerstats {
    Powerstats {
        intelligence: pick(obj, &["intelligence", "Intelligence"]),
        strength: pick(obj, &["strength", "Strength"]),
        speed: pick(obj, &["speed", "Speed"]),
        durability: pick(obj, &["durability", "Durability"]),
        power: pick(obj, &["power", "Power"]),
        combat: pick(obj, &["combat", "Combat"]),
    }
}

/// Normalizes a full character record from either upstream
///
/// Returns `None` when the record is not an object or has no id.
pub fn normalize_character(record: &Value) -> Option<Character> {
    let obj = record.as_object()?;
    let id = obj.get("id").and_then(id_string)?;

    Some(Character {
        id,
        name: pick(obj, &["name"]).unwrap_or_else(|| UNKNOWN_NAME.to_string()),
        appearance: normalize_appearance(&section(obj, "appearance")),
        biography: normalize_biography(&section(obj, "biography")),
        powerstats: normalize_powerstats(&section(obj, "powerstats")),
    })
}

/// Builds the hero-list entry for a full character record
pub fn normalize_summary(record: &Value) -> Option<HeroSummary> {
    let obj = record.as_object()?;
    let id = obj.get("id").and_then(id_string)?;

    Some(HeroSummary {
        id,
        name: pick(obj, &["name"]).unwrap_or_else(|| UNKNOWN_NAME.to_string()),
        appearance: normalize_appearance(&section(obj, "appearance")),
    })
}

/// Extracts one field group from a full character record
///
/// `group` names the nested mapping (`"appearance"`, `"biography"`, ...).
pub fn extract_detail<T>(
    record: &Value,
    group: &str,
    normalize: fn(&Object) -> T,
) -> Option<Detail<T>> {
    let obj = record.as_object()?;
    Some(Detail::new(
        obj.get("id").and_then(id_string),
        pick(obj, &["name"]),
        normalize(&section(obj, group)),
    ))
}

/// Normalizes a flat field-endpoint response such as `GET {id}/appearance`
pub fn flat_detail<T>(response: &Value, normalize: fn(&Object) -> T) -> Option<Detail<T>> {
    let obj = response.as_object()?;
    Some(Detail::new(
        obj.get("id").and_then(id_string),
        pick(obj, &["name"]),
        normalize(obj),
    ))
}
