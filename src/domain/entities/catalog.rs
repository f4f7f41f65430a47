//! Gateway provider pattern catalog.
//!
//! A catalog is an ordered list of providers, each with a set of lower-case
//! substrings that identify its RDAP infrastructure. Order matters: the classifier
//! walks providers in declaration order and the first match wins, even when a later
//! provider has a more specific pattern.
//!
//! Catalogs are values. Renaming or removing a provider returns a new catalog with
//! a bumped version; nothing is mutated in place.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::AppError;

/// One gateway provider and the patterns that identify it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ProviderPatterns {
    #[validate(length(min = 1, max = 128))]
    pub name: String,

    #[validate(length(min = 1))]
    pub patterns: Vec<String>,
}

impl ProviderPatterns {
    pub fn new(name: impl Into<String>, patterns: &[&str]) -> Self {
        Self {
            name: name.into(),
            patterns: patterns.iter().map(|p| p.to_string()).collect(),
        }
    }
}

/// Two patterns from different providers where one contains the other.
///
/// Such pairs make classification depend on catalog order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatternOverlap {
    pub provider: String,
    pub pattern: String,
    pub contained_in_provider: String,
    pub contained_in_pattern: String,
}

/// Deserialising goes through [`PatternCatalog::new`], so a catalog read from a
/// file or a stored result set is normalised and validated like any other.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(try_from = "RawCatalog")]
pub struct PatternCatalog {
    version: u32,
    #[validate(nested)]
    providers: Vec<ProviderPatterns>,
}

#[derive(Deserialize)]
struct RawCatalog {
    version: u32,
    providers: Vec<ProviderPatterns>,
}

impl TryFrom<RawCatalog> for PatternCatalog {
    type Error = AppError;

    fn try_from(raw: RawCatalog) -> Result<Self, Self::Error> {
        Self::new(raw.version, raw.providers)
    }
}

impl PatternCatalog {
    /// Builds a validated catalog.
    ///
    /// Patterns are trimmed and lower-cased; blank and duplicate patterns within a
    /// provider are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidCatalog`] if a provider name is empty or repeated,
    /// or if a provider is left without patterns.
    pub fn new(version: u32, providers: Vec<ProviderPatterns>) -> Result<Self, AppError> {
        let providers = providers
            .into_iter()
            .map(|provider| ProviderPatterns {
                name: provider.name.trim().to_string(),
                patterns: normalize_patterns(provider.patterns),
            })
            .collect::<Vec<_>>();

        let catalog = Self { version, providers };
        catalog
            .validate()
            .map_err(|e| AppError::invalid_catalog(e.to_string()))?;

        let mut seen = HashSet::new();
        for provider in &catalog.providers {
            if !seen.insert(provider.name.as_str()) {
                return Err(AppError::invalid_catalog(format!(
                    "duplicate provider '{}'",
                    provider.name
                )));
            }
        }

        Ok(catalog)
    }

    /// A catalog with no providers. Every URL classifies as unclassified.
    pub fn empty() -> Self {
        Self {
            version: 0,
            providers: Vec::new(),
        }
    }

    /// Parses and validates a catalog from JSON.
    ///
    /// ```json
    /// { "version": 2, "providers": [{ "name": "LogicBoxes", "patterns": ["rdapserver.net"] }] }
    /// ```
    pub fn from_json(json: &str) -> Result<Self, AppError> {
        let raw: RawCatalog = serde_json::from_str(json)?;
        raw.try_into()
    }

    /// The canonical built-in catalog.
    pub fn builtin() -> Self {
        let providers = vec![
            ProviderPatterns::new(
                "Tucows",
                &[
                    "tucows.com",
                    "opensrs.rdap.tucows.com",
                    "enom.rdap.tucows.com",
                    "endurance.rdap.tucows.com",
                    "rdap.ascio.com",
                    "dreamhost.rdap.tucows.com",
                    "domainpeople.rdap.tucows.com",
                    "epag.rdap.tucows.com",
                    "webcentralgroup.rdap.tucows.com",
                    "tpp.rdap.tucows.com",
                    "netregistry.rdap.tucows.com",
                    "easyspace.rdap.tucows.com",
                    "paragon.rdap.tucows.com",
                    "easydns.rdap.tucows.com",
                    "papaki.rdap.tucows.com",
                    "iregister.rdap.tucows.com",
                    "registerca.rdap.tucows.com",
                    "interplanet.rdap.tucows.com",
                    "authenticweb.rdap.tucows.com",
                    "eig.rdap.tucows.com",
                    "peoplebrowsr.rdap.tucows.com",
                    "brs.rdap.tucows.com",
                ],
            ),
            ProviderPatterns::new(
                "InternetX",
                &["internetx.com", "internetx.de", "internetx.net", "autodnslive"],
            ),
            ProviderPatterns::new(
                "RRPProxy/CentralNic",
                &[
                    "rdap.rrpproxy.net",
                    "centralnic.com",
                    "centralnic.net",
                    "rrpproxy.com",
                    "key-systems.net",
                    "hexonet.net",
                ],
            ),
            ProviderPatterns::new(
                "LogicBoxes",
                &[
                    "rdapserver.net",
                    "logicboxes.com",
                    "resellerclub.com",
                    "bigrock.com",
                    "publicdomainregistry.com",
                    "stargate.com",
                    "uniteddomains.com",
                    "resellerspanel.com",
                ],
            ),
            ProviderPatterns::new(
                "Gransy",
                &["gransy.com", "gransy.cz", "subreg.cz", "active24.com"],
            ),
            ProviderPatterns::new("GoDaddy", &["rdap.secureserver.net"]),
            ProviderPatterns::new("NameCheap", &["rdap.namecheap.com"]),
        ];

        Self { version: 1, providers }
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn providers(&self) -> &[ProviderPatterns] {
        &self.providers
    }

    pub fn provider_names(&self) -> impl Iterator<Item = &str> {
        self.providers.iter().map(|p| p.name.as_str())
    }

    pub fn get(&self, name: &str) -> Option<&ProviderPatterns> {
        self.providers.iter().find(|p| p.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Lists cross-provider pattern pairs where one pattern is a substring of the other.
    pub fn ambiguities(&self) -> Vec<PatternOverlap> {
        let mut overlaps = Vec::new();

        for (i, left) in self.providers.iter().enumerate() {
            for right in self.providers.iter().skip(i + 1) {
                for lp in &left.patterns {
                    for rp in &right.patterns {
                        if rp.contains(lp.as_str()) {
                            overlaps.push(PatternOverlap {
                                provider: left.name.clone(),
                                pattern: lp.clone(),
                                contained_in_provider: right.name.clone(),
                                contained_in_pattern: rp.clone(),
                            });
                        } else if lp.contains(rp.as_str()) {
                            overlaps.push(PatternOverlap {
                                provider: right.name.clone(),
                                pattern: rp.clone(),
                                contained_in_provider: left.name.clone(),
                                contained_in_pattern: lp.clone(),
                            });
                        }
                    }
                }
            }
        }

        overlaps
    }

    /// Returns a new catalog with `from` renamed to `to`.
    ///
    /// If `to` already exists, `from`'s patterns are appended to it and `from` is
    /// dropped; otherwise `from` keeps its position under the new name.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::UnknownCategory`] if `from` is not in the catalog and
    /// [`AppError::InvalidDirective`] if `from == to`.
    pub fn renamed(&self, from: &str, to: &str) -> Result<Self, AppError> {
        if from == to {
            return Err(AppError::invalid_directive(format!(
                "cannot rename '{from}' to itself"
            )));
        }

        let source = self
            .get(from)
            .ok_or_else(|| AppError::unknown_category(from))?
            .clone();

        let providers = if self.contains(to) {
            self.providers
                .iter()
                .filter(|p| p.name != from)
                .map(|p| {
                    if p.name == to {
                        let mut merged = p.clone();
                        merged.patterns.extend(source.patterns.iter().cloned());
                        merged.patterns = normalize_patterns(merged.patterns);
                        merged
                    } else {
                        p.clone()
                    }
                })
                .collect()
        } else {
            self.providers
                .iter()
                .map(|p| {
                    if p.name == from {
                        ProviderPatterns {
                            name: to.to_string(),
                            patterns: p.patterns.clone(),
                        }
                    } else {
                        p.clone()
                    }
                })
                .collect()
        };

        Ok(Self {
            version: self.version + 1,
            providers,
        })
    }

    /// Returns a new catalog without the provider `name`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::UnknownCategory`] if `name` is not in the catalog.
    pub fn without(&self, name: &str) -> Result<Self, AppError> {
        if !self.contains(name) {
            return Err(AppError::unknown_category(name));
        }

        Ok(Self {
            version: self.version + 1,
            providers: self
                .providers
                .iter()
                .filter(|p| p.name != name)
                .cloned()
                .collect(),
        })
    }
}

impl Default for PatternCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn normalize_patterns(patterns: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    patterns
        .into_iter()
        .map(|p| p.trim().to_lowercase())
        .filter(|p| !p.is_empty())
        .filter(|p| seen.insert(p.clone()))
        .collect()
}
