//! Core data models for superhero records
//!
//! Two upstreams describe the same characters with different field naming
//! (hyphenated keys from the primary API, camelCase from the fallback
//! dataset). The types here are the canonical, hyphenated shape every client
//! operation returns.

pub mod client;
pub mod image;
pub mod normalize;
pub mod transport;

pub use client::{Endpoints, SuperheroClient};
pub use image::{hero_image_url, slug};
pub use transport::{FetchError, ReqwestTransport, Transport};

use serde::{Deserialize, Serialize};

/// Physical description of a character
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Appearance {
    pub gender: Option<String>,
    pub race: Option<String>,
    /// Height in two units, e.g. `["6'2", "188 cm"]`
    #[serde(default)]
    pub height: Vec<String>,
    /// Weight in two units, e.g. `["210 lb", "95 kg"]`
    #[serde(default)]
    pub weight: Vec<String>,
    #[serde(rename = "eye-color")]
    pub eye_color: Option<String>,
    #[serde(rename = "hair-color")]
    pub hair_color: Option<String>,
}

/// Publishing history and identities of a character
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Biography {
    #[serde(rename = "full-name")]
    pub full_name: Option<String>,
    #[serde(rename = "alter-egos")]
    pub alter_egos: Option<String>,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(rename = "place-of-birth")]
    pub place_of_birth: Option<String>,
    #[serde(rename = "first-appearance")]
    pub first_appearance: Option<String>,
    pub publisher: Option<String>,
    pub alignment: Option<String>,
}

/// Power ratings, string-encoded as the primary API sends them
///
/// Values are `"0"`..`"100"` or `"null"` when the rating is unknown.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Powerstats {
    pub intelligence: Option<String>,
    pub strength: Option<String>,
    pub speed: Option<String>,
    pub durability: Option<String>,
    pub power: Option<String>,
    pub combat: Option<String>,
}

/// A field group extracted for one character
///
/// Serializes flat, the way the primary API's field endpoints respond:
/// `{"response": "success", "id": ..., "name": ..., <fields>}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detail<T> {
    #[serde(default = "success")]
    pub response: String,
    pub id: Option<String>,
    pub name: Option<String>,
    #[serde(flatten)]
    pub fields: T,
}

fn success() -> String {
    "success".to_string()
}

impl<T> Detail<T> {
    /// Wraps `fields` for the character `id` / `name`
    pub fn new(id: Option<String>, name: Option<String>, fields: T) -> Self {
        Self {
            response: success(),
            id,
            name,
            fields,
        }
    }
}

/// Canonical full character record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub appearance: Appearance,
    #[serde(default)]
    pub biography: Biography,
    #[serde(default)]
    pub powerstats: Powerstats,
}

/// Entry of the hero list: just enough to render an index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeroSummary {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub appearance: Appearance,
}
