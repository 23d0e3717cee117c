//! Theme registry: keyword and seed-symbol rules that decide which listed
//! companies belong to a theme.
//!
//! The registry is built once (built-in table or TOML) and is read-only
//! afterwards. Theme names go through alias normalization before lookup,
//! and an unknown theme falls back to a rule that matches its own name.
//!
//! TOML layout:
//! ```toml
//! [themes."記憶體"]
//! name_keywords = ["記憶體", "DRAM"]
//! seed_symbols = ["2344", "2408"]
//!
//! [aliases]
//! memory = "記憶體"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("parse theme TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("alias '{alias}' points at unknown theme '{target}'")]
    UnknownAliasTarget { alias: String, target: String },

    #[error("theme '{0}' has no keywords and no seed symbols")]
    EmptyRule(String),
}

/// Membership rule for one theme.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeRule {
    /// Matched against the industry label only.
    pub industry_keywords: Vec<String>,
    /// Matched against `"<name> <industry>"`.
    pub name_keywords: Vec<String>,
    /// Always members, regardless of keywords.
    pub seed_symbols: Vec<String>,
}

impl ThemeRule {
    /// Rule used for a theme the registry does not know.
    pub fn fallback(theme: &str) -> Self {
        Self {
            name_keywords: vec![theme.to_string()],
            ..Default::default()
        }
    }

    fn is_empty(&self) -> bool {
        self.industry_keywords.is_empty()
            && self.name_keywords.is_empty()
            && self.seed_symbols.is_empty()
    }

    /// Whether a listed company belongs to this theme. Keyword matching is
    /// case-insensitive substring search.
    pub fn matches(&self, symbol: &str, name: &str, industry: &str) -> bool {
        if self.seed_symbols.iter().any(|s| s == symbol) {
            return true;
        }
        let text = format!("{name} {industry}").to_lowercase();
        if self
            .name_keywords
            .iter()
            .any(|kw| text.contains(&kw.to_lowercase()))
        {
            return true;
        }
        let industry = industry.to_lowercase();
        self.industry_keywords
            .iter()
            .any(|kw| industry.contains(&kw.to_lowercase()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeRegistry {
    themes: BTreeMap<String, ThemeRule>,
    aliases: BTreeMap<String, String>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl ThemeRegistry {
    /// Semiconductors, memory and AI.
    pub fn builtin() -> Self {
        let mut themes = BTreeMap::new();
        themes.insert(
            "半導體".to_string(),
            ThemeRule {
                industry_keywords: strings(&["半導體"]),
                name_keywords: strings(&["半導體", "晶圓", "矽", "IC"]),
                seed_symbols: strings(&[
                    "2330", "2303", "2454", "3711", "3034", "4966", "3443", "6415", "2344", "2408",
                ]),
            },
        );
        themes.insert(
            "記憶體".to_string(),
            ThemeRule {
                industry_keywords: vec![],
                name_keywords: strings(&[
                    "記憶體", "DRAM", "NAND", "快閃", "NOR", "HBM", "華邦", "旺宏", "威剛", "群聯",
                    "南亞科", "宇瞻", "創見",
                ]),
                seed_symbols: strings(&[
                    "2344", "2408", "2337", "3260", "8299", "4967", "3006", "8271", "2451",
                ]),
            },
        );
        themes.insert(
            "AI".to_string(),
            ThemeRule {
                industry_keywords: strings(&["半導體", "電腦及週邊設備", "通信網路", "光電"]),
                name_keywords: strings(&["AI", "伺服器", "雲端", "散熱", "網通", "光通訊", "機器人"]),
                seed_symbols: strings(&[
                    "2330", "2317", "2382", "3231", "6669", "3017", "2356", "2376", "2454",
                ]),
            },
        );

        let aliases = [
            ("ai", "AI"),
            ("人工智慧", "AI"),
            ("半導體業", "半導體"),
            ("semiconductor", "半導體"),
            ("semiconductors", "半導體"),
            ("memory", "記憶體"),
        ]
        .into_iter()
        .map(|(a, t)| (a.to_string(), t.to_string()))
        .collect();

        Self { themes, aliases }
    }

    /// Parse and validate a registry from TOML.
    pub fn from_toml(content: &str) -> Result<Self, RegistryError> {
        let registry: Self = toml::from_str(content)?;
        registry.validate()?;
        Ok(registry)
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    fn validate(&self) -> Result<(), RegistryError> {
        if let Some((name, _)) = self.themes.iter().find(|(_, rule)| rule.is_empty()) {
            return Err(RegistryError::EmptyRule(name.clone()));
        }
        for (alias, target) in &self.aliases {
            if !self.themes.contains_key(target) {
                return Err(RegistryError::UnknownAliasTarget {
                    alias: alias.clone(),
                    target: target.clone(),
                });
            }
        }
        Ok(())
    }

    /// Trim and resolve aliases. Aliases match exactly or by lowercase.
    pub fn normalize(&self, theme: &str) -> String {
        let key = theme.trim();
        self.aliases
            .get(key)
            .or_else(|| self.aliases.get(&key.to_lowercase()))
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }

    /// Rule for a theme after normalization, or the fallback rule.
    pub fn rule(&self, theme: &str) -> ThemeRule {
        let key = self.normalize(theme);
        match self.themes.get(&key) {
            Some(rule) => rule.clone(),
            None => ThemeRule::fallback(&key),
        }
    }

    pub fn is_known(&self, theme: &str) -> bool {
        self.themes.contains_key(&self.normalize(theme))
    }

    pub fn theme_names(&self) -> Vec<&str> {
        self.themes.keys().map(|s| s.as_str()).collect()
    }

    pub fn aliases(&self) -> impl Iterator<Item = (&str, &str)> {
        self.aliases.iter().map(|(a, t)| (a.as_str(), t.as_str()))
    }
}
