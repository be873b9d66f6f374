//! Case conversion and English pluralisation for derived names.

use std::fmt;
use std::str::FromStr;

use convert_case::{Case, Casing};
use serde::{Deserialize, Serialize};

use crate::error::MetadataError;

/// Case style applied to derived table and column names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseConversion {
    #[default]
    Snake,
    Camel,
    Kebab,
    Studly,
    /// Names are used as written.
    Null,
}

impl CaseConversion {
    pub fn apply(&self, name: &str) -> String {
        match self {
            CaseConversion::Snake => name.to_case(Case::Snake),
            CaseConversion::Camel => name.to_case(Case::Camel),
            CaseConversion::Kebab => name.to_case(Case::Kebab),
            CaseConversion::Studly => name.to_case(Case::Pascal),
            CaseConversion::Null => name.to_string(),
        }
    }
}

impl FromStr for CaseConversion {
    type Err = MetadataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "snake" => Ok(CaseConversion::Snake),
            "camel" => Ok(CaseConversion::Camel),
            "kebab" => Ok(CaseConversion::Kebab),
            "studly" => Ok(CaseConversion::Studly),
            "null" | "none" => Ok(CaseConversion::Null),
            other => Err(MetadataError::Config(format!(
                "invalid case conversion '{}': expected snake, camel, kebab, studly or null",
                other
            ))),
        }
    }
}

impl fmt::Display for CaseConversion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CaseConversion::Snake => "snake",
            CaseConversion::Camel => "camel",
            CaseConversion::Kebab => "kebab",
            CaseConversion::Studly => "studly",
            CaseConversion::Null => "null",
        };
        f.write_str(name)
    }
}

const UNCOUNTABLE: &[&str] = &[
    "audio",
    "data",
    "equipment",
    "feedback",
    "information",
    "metadata",
    "money",
    "news",
    "series",
    "sheep",
    "species",
    "traffic",
];

const IRREGULAR: &[(&str, &str)] = &[
    ("child", "children"),
    ("criterion", "criteria"),
    ("foot", "feet"),
    ("goose", "geese"),
    ("man", "men"),
    ("mouse", "mice"),
    ("ox", "oxen"),
    ("person", "people"),
    ("tooth", "teeth"),
    ("woman", "women"),
];

/// Plural form of an English word, keeping the case of its first letter.
pub fn pluralize(word: &str) -> String {
    if word.is_empty() {
        return String::new();
    }
    let lower = word.to_ascii_lowercase();

    if UNCOUNTABLE.contains(&lower.as_str()) {
        return word.to_string();
    }
    if let Some((_, plural)) = IRREGULAR.iter().find(|(singular, _)| *singular == lower) {
        return match_first_letter(word, plural);
    }

    let stem_len = word.len();
    if ["s", "x", "z", "ch", "sh"]
        .iter()
        .any(|suffix| lower.ends_with(suffix))
    {
        return format!("{}es", word);
    }
    if let Some(stem) = lower.strip_suffix('y') {
        if !stem.is_empty() && !stem.ends_with(['a', 'e', 'i', 'o', 'u']) {
            return format!("{}ies", &word[..stem_len - 1]);
        }
    }
    if lower.ends_with("fe") {
        return format!("{}ves", &word[..stem_len - 2]);
    }
    if lower.ends_with('f') && !lower.ends_with("ff") {
        return format!("{}ves", &word[..stem_len - 1]);
    }
    format!("{}s", word)
}

fn match_first_letter(original: &str, replacement: &str) -> String {
    let upper = original.chars().next().is_some_and(char::is_uppercase);
    if !upper {
        return replacement.to_string();
    }
    let mut chars = replacement.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Pluralises the last word of a studly-cased name (`OrderItem` → `OrderItems`).
pub fn plural_studly(name: &str) -> String {
    let split = name
        .char_indices()
        .filter(|(_, c)| c.is_uppercase())
        .map(|(index, _)| index)
        .last()
        .unwrap_or(0);
    let (head, last) = name.split_at(split);
    format!("{}{}", head, pluralize(last))
}

/// Table name for a class short name: last word pluralised, then case-converted.
pub fn table_name(short_name: &str, case: CaseConversion) -> String {
    case.apply(&plural_studly(short_name))
}
