//! Ticker-to-provider-symbol resolution.
//!
//! Display tickers may carry an `@MARKET` suffix (e.g. `SXR8@IBIS2`). The
//! resolver turns such an input into an ordered list of candidate provider
//! symbols to try, driven by an explicit [`MarketMap`] built once at startup
//! and passed by reference.

use std::collections::HashMap;
use std::path::Path;

use log::debug;
use serde::Deserialize;

use crate::errors::{ConfigError, Error, Result};

/// Built-in mapping from market codes to provider suffixes, ordered by
/// preference.
const DEFAULT_MARKET_MAP: &[(&str, &[&str])] = &[
    ("IBIS", &[".MI", ".DE"]),
    ("IBIS2", &[".DE", ".MI"]),
    ("AEB", &[".AS"]),
    ("SBF", &[".PA"]),
    ("XLON", &[".L"]),
    ("XETRA", &[".DE"]),
];

/// Built-in exact `TICKER@MARKET` overrides for symbols that would otherwise
/// resolve to delisted or mismatched listings.
const DEFAULT_EXACT_MAP: &[(&str, &[&str])] = &[("NUKL@SBF", &["NUKL.DE"])];

/// Suffixes to try when the market code is unknown.
const GENERIC_SUFFIXES: &[&str] = &[".DE", ".PA", ".AS", ".MI", ".L"];

/// User-supplied additions, loaded from a JSON file. Keys containing `@` are
/// exact overrides; other keys are market codes. Values may be full symbols,
/// `.SUF` suffixes, or bare suffixes without the dot.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct MarketMapOverrides(HashMap<String, Vec<String>>);

/// Resolution table mapping market codes and exact ticker overrides to
/// candidate provider symbols.
#[derive(Debug, Clone)]
pub struct MarketMap {
    markets: HashMap<String, Vec<String>>,
    exact: HashMap<String, Vec<String>>,
    generic_suffixes: Vec<String>,
}

impl Default for MarketMap {
    fn default() -> Self {
        Self::new()
    }
}

impl MarketMap {
    /// Creates a map with the built-in defaults.
    pub fn new() -> Self {
        let markets = DEFAULT_MARKET_MAP
            .iter()
            .map(|(market, suffixes)| {
                (
                    market.to_string(),
                    suffixes.iter().map(|s| s.to_string()).collect(),
                )
            })
            .collect();
        let exact = DEFAULT_EXACT_MAP
            .iter()
            .map(|(key, symbols)| {
                (
                    key.to_string(),
                    symbols.iter().map(|s| s.to_string()).collect(),
                )
            })
            .collect();
        Self {
            markets,
            exact,
            generic_suffixes: GENERIC_SUFFIXES.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Creates a map with the defaults plus overrides read from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(ConfigError::IO(format!(
                "Failed to read market map {}: {}",
                path.display(),
                e
            )))
        })?;
        let overrides: MarketMapOverrides = serde_json::from_str(&raw).map_err(|e| {
            Error::Config(ConfigError::InvalidValue(format!(
                "Market map must be a JSON object of string lists: {}",
                e
            )))
        })?;

        let mut map = Self::new();
        map.merge(overrides);
        Ok(map)
    }

    /// Merges user-supplied entries; they win over the built-in defaults.
    pub fn merge(&mut self, overrides: MarketMapOverrides) {
        for (key, values) in overrides.0 {
            let key = key.trim().to_uppercase();
            if key.contains('@') {
                self.exact.insert(key, values);
            } else {
                self.markets.insert(key, values);
            }
        }
    }

    /// Returns candidate provider symbols for an input like `SXR8@IBIS2` or
    /// `VOO`, ordered by preference and de-duplicated.
    pub fn candidates_for(&self, input: &str) -> Vec<String> {
        let key = input.trim().to_uppercase();
        let base = key.split('@').next().unwrap_or_default().to_string();

        if let Some(mapped) = self.exact.get(&key) {
            let candidates = mapped.iter().map(|item| expand(&base, item)).collect();
            return dedupe(candidates);
        }

        let Some((_, market)) = key.split_once('@') else {
            return vec![key];
        };

        let mut candidates: Vec<String> = if let Some(mapped) = self.markets.get(market) {
            mapped.iter().map(|item| expand(&base, item)).collect()
        } else {
            debug!("Unknown market code {}, trying generic suffixes", market);
            let mut fallbacks = vec![format!("{}.{}", base, market)];
            if let Some(short) = market.get(..2) {
                fallbacks.push(format!("{}.{}", base, short));
            }
            fallbacks.extend(self.generic_suffixes.iter().map(|s| format!("{}{}", base, s)));
            fallbacks
        };
        // The bare ticker itself is always the last resort
        candidates.push(base);

        dedupe(candidates)
    }
}

/// Expands one mapping value against the base ticker. Values may be full
/// symbols (`SXR8.DE`), dotted suffixes (`.DE`), or bare suffixes (`DE`).
fn expand(base: &str, item: &str) -> String {
    let item = item.trim().to_uppercase();
    if !base.is_empty() && item.starts_with(base) {
        item
    } else if let Some(rest) = item.strip_prefix('.') {
        format!("{}.{}", base, rest)
    } else if item.contains('.') {
        item
    } else {
        format!("{}.{}", base, item)
    }
}

fn dedupe(candidates: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    candidates
        .into_iter()
        .filter(|c| seen.insert(c.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_ticker_resolves_to_itself() {
        let map = MarketMap::new();
        assert_eq!(map.candidates_for("voo"), vec!["VOO"]);
    }

    #[test]
    fn known_market_expands_suffixes_then_bare_base() {
        let map = MarketMap::new();
        assert_eq!(
            map.candidates_for("SXR8@IBIS2"),
            vec!["SXR8.DE", "SXR8.MI", "SXR8"]
        );
    }

    #[test]
    fn exact_override_takes_precedence_without_bare_fallback() {
        let map = MarketMap::new();
        assert_eq!(map.candidates_for("NUKL@SBF"), vec!["NUKL.DE"]);
    }

    #[test]
    fn unknown_market_falls_back_to_raw_and_generic_suffixes() {
        let map = MarketMap::new();
        let candidates = map.candidates_for("ABC@WEIRD");
        assert_eq!(candidates[0], "ABC.WEIRD");
        assert_eq!(candidates[1], "ABC.WE");
        assert!(candidates.contains(&"ABC.DE".to_string()));
        assert_eq!(candidates.last().unwrap(), "ABC");
    }

    #[test]
    fn merged_market_entry_wins_over_default() {
        let mut map = MarketMap::new();
        let overrides: MarketMapOverrides =
            serde_json::from_str(r#"{"ibis2": [".L"]}"#).unwrap();
        map.merge(overrides);
        assert_eq!(map.candidates_for("SXR8@IBIS2"), vec!["SXR8.L", "SXR8"]);
    }

    #[test]
    fn merged_exact_override_handles_full_symbols_and_suffixes() {
        let mut map = MarketMap::new();
        let overrides: MarketMapOverrides =
            serde_json::from_str(r#"{"ABC@SBF": ["ABC.MI", ".AS", "L"]}"#).unwrap();
        map.merge(overrides);
        assert_eq!(
            map.candidates_for("abc@sbf"),
            vec!["ABC.MI", "ABC.AS", "ABC.L"]
        );
    }

    #[test]
    fn duplicate_candidates_are_removed_preserving_order() {
        let mut map = MarketMap::new();
        let overrides: MarketMapOverrides =
            serde_json::from_str(r#"{"DUP": [".DE", "DE", ".DE"]}"#).unwrap();
        map.merge(overrides);
        assert_eq!(map.candidates_for("X@DUP"), vec!["X.DE", "X"]);
    }
}
