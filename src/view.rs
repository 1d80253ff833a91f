//! Presentation of hero data for the terminal
//!
//! Turns client output into display rows. Absent values render as
//! "unknown"; a missing appearance is the only "not found" case.

use serde::Serialize;

use crate::data::{
    Appearance, Biography, Detail, HeroSummary, Powerstats, SuperheroClient, Transport,
};

/// Placeholder for absent values
const UNKNOWN: &str = "unknown";

/// Width of a powerstat bar at 100
const BAR_WIDTH: i64 = 20;

/// Parses a string-encoded rating, treating anything non-numeric as absent
pub fn safe_int(value: Option<&str>) -> Option<i64> {
    value?.trim().parse().ok()
}

/// One line of the hero index
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeroRow {
    pub id: String,
    pub name: String,
    pub race: Option<String>,
    pub image_url: String,
}

/// Everything shown on a hero's page
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HeroDetail {
    pub id: Option<String>,
    pub name: Option<String>,
    pub image_url: String,
    pub gender: Option<String>,
    pub race: Option<String>,
    pub height: Vec<String>,
    pub weight: Vec<String>,
    pub eye_color: Option<String>,
    pub hair_color: Option<String>,
    pub full_name: Option<String>,
    pub alter_egos: Option<String>,
    pub aliases: Vec<String>,
    pub place_of_birth: Option<String>,
    pub first_appearance: Option<String>,
    pub publisher: Option<String>,
    pub alignment: Option<String>,
    pub intelligence: Option<i64>,
    pub strength: Option<i64>,
    pub speed: Option<i64>,
    pub durability: Option<i64>,
    pub power: Option<i64>,
    pub combat: Option<i64>,
}

impl HeroDetail {
    /// Combines the three field groups of one hero
    pub fn from_parts(
        appearance: Detail<Appearance>,
        biography: Option<Detail<Biography>>,
        powerstats: Option<Detail<Powerstats>>,
        image_url: String,
    ) -> Self {
        let bio = biography.map(|d| d.fields).unwrap_or_default();
        let stats = powerstats.map(|d| d.fields).unwrap_or_default();
        let app = appearance.fields;

        Self {
            id: appearance.id,
            name: appearance.name,
            image_url,
            gender: app.gender,
            race: app.race,
            height: app.height,
            weight: app.weight,
            eye_color: app.eye_color,
            hair_color: app.hair_color,
            full_name: bio.full_name,
            alter_egos: bio.alter_egos,
            aliases: bio.aliases,
            place_of_birth: bio.place_of_birth,
            first_appearance: bio.first_appearance,
            publisher: bio.publisher,
            alignment: bio.alignment,
            intelligence: safe_int(stats.intelligence.as_deref()),
            strength: safe_int(stats.strength.as_deref()),
            speed: safe_int(stats.speed.as_deref()),
            durability: safe_int(stats.durability.as_deref()),
            power: safe_int(stats.power.as_deref()),
            combat: safe_int(stats.combat.as_deref()),
        }
    }
}

/// Builds index rows for the hero list
pub fn hero_rows<T: Transport>(
    client: &SuperheroClient<T>,
    heroes: &[HeroSummary],
) -> Vec<HeroRow> {
    heroes
        .iter()
        .map(|hero| HeroRow {
            id: hero.id.clone(),
            name: hero.name.clone(),
            race: hero.appearance.race.clone(),
            image_url: client.hero_image_url(&hero.id, &hero.name),
        })
        .collect()
}

/// Loads a hero's page; `None` means the hero does not exist
pub async fn hero_detail<T: Transport>(
    client: &SuperheroClient<T>,
    id: &str,
) -> Option<HeroDetail> {
    let appearance = client.get_appearance(id).await?;
    let biography = client.get_biography(id).await;
    let powerstats = client.get_powerstats(id).await;

    let image_url = client.hero_image_url(
        appearance.id.as_deref().unwrap_or(id),
        appearance.name.as_deref().unwrap_or_default(),
    );

    Some(HeroDetail::from_parts(appearance, biography, powerstats, image_url))
}

fn or_unknown(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or(UNKNOWN)
}

fn join_or_unknown(values: &[String], separator: &str) -> String {
    if values.is_empty() {
        UNKNOWN.to_string()
    } else {
        values.join(separator)
    }
}

/// Renders a rating as a fixed-width bar
fn stat_bar(value: Option<i64>) -> String {
    match value {
        Some(v) => {
            let filled = (v.clamp(0, 100) * BAR_WIDTH / 100) as usize;
            format!(
                "[{}{}] {:>3}",
                "#".repeat(filled),
                " ".repeat(BAR_WIDTH as usize - filled),
                v
            )
        }
        None => format!("[{}] {}", " ".repeat(BAR_WIDTH as usize), UNKNOWN),
    }
}

/// Renders the hero index as a table
pub fn render_list(rows: &[HeroRow]) -> String {
    let mut out = format!("{} heroes\n", rows.len());
    for row in rows {
        out.push_str(&format!(
            "{:>5}  {:<30} {}\n",
            row.id,
            row.name,
            or_unknown(row.race.as_deref())
        ));
    }
    out
}

/// Renders a hero's page
pub fn render_detail(hero: &HeroDetail) -> String {
    let mut out = String::new();
    let fields: [(&str, String); 15] = [
        ("Name", or_unknown(hero.name.as_deref()).to_string()),
        ("Id", or_unknown(hero.id.as_deref()).to_string()),
        ("Image", hero.image_url.clone()),
        ("Full name", or_unknown(hero.full_name.as_deref()).to_string()),
        ("Alter egos", or_unknown(hero.alter_egos.as_deref()).to_string()),
        ("Aliases", join_or_unknown(&hero.aliases, ", ")),
        ("Place of birth", or_unknown(hero.place_of_birth.as_deref()).to_string()),
        ("First appearance", or_unknown(hero.first_appearance.as_deref()).to_string()),
        ("Publisher", or_unknown(hero.publisher.as_deref()).to_string()),
        ("Alignment", or_unknown(hero.alignment.as_deref()).to_string()),
        ("Gender", or_unknown(hero.gender.as_deref()).to_string()),
        ("Race", or_unknown(hero.race.as_deref()).to_string()),
        ("Height", join_or_unknown(&hero.height, " / ")),
        ("Weight", join_or_unknown(&hero.weight, " / ")),
        (
            "Eyes / hair",
            format!(
                "{} / {}",
                or_unknown(hero.eye_color.as_deref()),
                or_unknown(hero.hair_color.as_deref())
            ),
        ),
    ];
    for (label, value) in fields {
        out.push_str(&format!("{:<17} {}\n", label, value));
    }

    out.push_str("\nPowerstats\n");
    let stats = [
        ("Intelligence", hero.intelligence),
        ("Strength", hero.strength),
        ("Speed", hero.speed),
        ("Durability", hero.durability),
        ("Power", hero.power),
        ("Combat", hero.combat),
    ];
    for (label, value) in stats {
        out.push_str(&format!("  {:<15} {}\n", label, stat_bar(value)));
    }
    out
}
