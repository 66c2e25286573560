use serde::{Deserialize, Deserializer};

/// Backend ids arrive either as JSON strings or as numbers.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Int(i64),
    Uint(u64),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(s) => s,
            RawId::Int(n) => n.to_string(),
            RawId::Uint(n) => n.to_string(),
        }
    }
}

pub fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    RawId::deserialize(deserializer).map(String::from)
}

pub fn opt_id_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<RawId>::deserialize(deserializer)?.map(String::from))
}

/// Treats `""` like a missing value.
pub fn non_empty<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawList {
    One(String),
    Many(Vec<String>),
}

/// Accepts a single string, a list of strings or nothing.
pub fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<RawList>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(RawList::One(s)) if s.trim().is_empty() => Vec::new(),
        Some(RawList::One(s)) => vec![s],
        Some(RawList::Many(v)) => v,
    })
}
