//! Source catalog and keyword configuration.
//!
//! The catalog is built once at startup, either from the built-in defaults
//! ([`Catalog::default_catalog`]) or from a YAML file, and is read-only for
//! the rest of the process.
//!
//! # YAML Format
//!
//! ```yaml
//! keywords:
//!   include: [solar, eólica, renovables]
//!   exclude: [guerra, militar]
//! sources:
//!   - name: EnergyNews
//!     url: https://www.energynews.es/
//!     selector: article h2.entry-title a
//!   - name: Ejemplo
//!     url: https://example.com/energia
//!     tag: div
//!     class: titular
//!     link_prefix: https://example.com
//! ```
//!
//! Each source uses exactly one selection form: a CSS `selector`, or a
//! `tag` + `class` pair.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::{info, instrument};
use url::Url;

/// How headline elements are located within a source's page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionRule {
    /// A CSS selector, e.g. `article h2.entry-title a`.
    BySelector(String),
    /// Every element with the given tag name carrying the given class.
    ByTagAndClass { tag: String, class: String },
}

/// One news outlet in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSourceConfig", into = "RawSourceConfig")]
pub struct SourceConfig {
    /// Display label, unique within a catalog.
    pub name: String,
    /// Absolute page URL to fetch.
    pub url: String,
    pub rule: SelectionRule,
    /// Prepended to relative links to make them absolute.
    pub link_prefix: Option<String>,
}

impl SourceConfig {
    /// Source located with a CSS selector.
    pub fn with_selector(name: &str, url: &str, selector: &str, link_prefix: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
            rule: SelectionRule::BySelector(selector.to_string()),
            link_prefix: link_prefix.map(str::to_string),
        }
    }

    /// Source located by tag name and class.
    pub fn with_tag_and_class(
        name: &str,
        url: &str,
        tag: &str,
        class: &str,
        link_prefix: Option<&str>,
    ) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
            rule: SelectionRule::ByTagAndClass {
                tag: tag.to_string(),
                class: class.to_string(),
            },
            link_prefix: link_prefix.map(str::to_string),
        }
    }
}

/// Flat on-disk representation of a [`SourceConfig`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSourceConfig {
    name: String,
    url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    selector: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    link_prefix: Option<String>,
}

impl TryFrom<RawSourceConfig> for SourceConfig {
    type Error = String;

    fn try_from(raw: RawSourceConfig) -> Result<Self, Self::Error> {
        let rule = match (raw.selector, raw.tag, raw.class) {
            (Some(selector), None, None) => SelectionRule::BySelector(selector),
            (None, Some(tag), Some(class)) => SelectionRule::ByTagAndClass { tag, class },
            (None, None, None) => {
                return Err(format!(
                    "source `{}` needs either `selector` or `tag` + `class`",
                    raw.name
                ));
            }
            (Some(_), _, _) => {
                return Err(format!(
                    "source `{}` sets both `selector` and `tag`/`class`; use one",
                    raw.name
                ));
            }
            (None, _, _) => {
                return Err(format!(
                    "source `{}` must set `tag` and `class` together",
                    raw.name
                ));
            }
        };
        Ok(SourceConfig {
            name: raw.name,
            url: raw.url,
            rule,
            link_prefix: raw.link_prefix,
        })
    }
}

impl From<SourceConfig> for RawSourceConfig {
    fn from(source: SourceConfig) -> Self {
        let (selector, tag, class) = match source.rule {
            SelectionRule::BySelector(s) => (Some(s), None, None),
            SelectionRule::ByTagAndClass { tag, class } => (None, Some(tag), Some(class)),
        };
        RawSourceConfig {
            name: source.name,
            url: source.url,
            selector,
            tag,
            class,
            link_prefix: source.link_prefix,
        }
    }
}

/// Inclusion and exclusion phrases used by the relevance classifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordSet {
    #[serde(rename = "include")]
    pub inclusion_terms: Vec<String>,
    #[serde(rename = "exclude", default)]
    pub exclusion_terms: Vec<String>,
}

impl KeywordSet {
    pub fn new<I, E>(include: I, exclude: E) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
        E: IntoIterator,
        E::Item: Into<String>,
    {
        Self {
            inclusion_terms: include.into_iter().map(Into::into).collect(),
            exclusion_terms: exclude.into_iter().map(Into::into).collect(),
        }
    }

    /// Check that no term is blank and that the two sets share no phrase.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let blank = self
            .inclusion_terms
            .iter()
            .chain(&self.exclusion_terms)
            .any(|t| t.trim().is_empty());
        if blank {
            return Err(ConfigError::Validation(
                "keyword terms must not be empty".to_string(),
            ));
        }

        let included: HashSet<String> = self
            .inclusion_terms
            .iter()
            .map(|t| t.trim().to_lowercase())
            .collect();
        let overlap: Vec<&str> = self
            .exclusion_terms
            .iter()
            .filter(|t| included.contains(&t.trim().to_lowercase()))
            .map(String::as_str)
            .collect();
        if !overlap.is_empty() {
            return Err(ConfigError::Validation(format!(
                "terms appear in both include and exclude lists: {}",
                overlap.join(", ")
            )));
        }
        Ok(())
    }
}

/// The full static configuration of a run: outlets plus keyword sets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub keywords: KeywordSet,
    #[serde(default)]
    pub sources: Vec<SourceConfig>,
}

impl Catalog {
    /// Parse and validate a catalog from YAML text.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let catalog: Catalog = serde_yaml::from_str(yaml)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Load and validate a catalog from a YAML file.
    #[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let catalog = Self::from_yaml_str(&yaml)?;
        info!(
            sources = catalog.sources.len(),
            include = catalog.keywords.inclusion_terms.len(),
            exclude = catalog.keywords.exclusion_terms.len(),
            "Loaded catalog"
        );
        Ok(catalog)
    }

    /// Render the catalog as YAML, suitable for feeding back via [`Catalog::load`].
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.keywords.validate()?;

        let mut names = HashSet::new();
        for source in &self.sources {
            if source.name.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "source names must not be empty".to_string(),
                ));
            }
            if !names.insert(source.name.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate source name `{}`",
                    source.name
                )));
            }
            match Url::parse(&source.url) {
                Ok(u) if matches!(u.scheme(), "http" | "https") => {}
                _ => {
                    return Err(ConfigError::Validation(format!(
                        "source `{}` has a non-absolute or non-HTTP url `{}`",
                        source.name, source.url
                    )));
                }
            }
            if let Some(prefix) = &source.link_prefix {
                match Url::parse(prefix) {
                    Ok(u) if matches!(u.scheme(), "http" | "https") => {}
                    _ => {
                        return Err(ConfigError::Validation(format!(
                            "source `{}` has a non-absolute or non-HTTP link_prefix `{}`",
                            source.name, prefix
                        )));
                    }
                }
            }
            let empty_rule = match &source.rule {
                SelectionRule::BySelector(s) => s.trim().is_empty(),
                SelectionRule::ByTagAndClass { tag, class } => {
                    tag.trim().is_empty() || class.trim().is_empty()
                }
            };
            if empty_rule {
                return Err(ConfigError::Validation(format!(
                    "source `{}` has an empty selection rule",
                    source.name
                )));
            }
        }
        Ok(())
    }

    /// Built-in catalog of Spanish energy-sector outlets.
    pub fn default_catalog() -> Self {
        Self {
            keywords: default_keywords(),
            sources: default_sources(),
        }
    }
}

fn default_keywords() -> KeywordSet {
    KeywordSet::new(
        [
            "energía",
            "transición energética",
            "transición sostenible",
            "renovables",
            "nextgeneration",
            "sostenibilidad",
            "electricidad",
            "calor",
            "potencia",
            "nuclear",
            "solar",
            "eólica",
            "hidroeléctrica",
            "eficiencia energética",
            "aerogenerador",
            "aerotermia",
            "fotovoltaico",
            "biomasa",
            "energía térmica",
            "energía eléctrica",
            "geotermia",
            "almacenamiento hidroeléctrico",
            "almacenamiento térmico",
            "emisiones",
            "carbono",
            "descarbonización",
            "gases",
            "invernadero",
            "instalaciones",
            "energía verde",
            "fuentes de energía",
            "autoconsumo",
            "placas solares",
            "vehículos eléctricos",
            "vehículos híbridos",
            "Mariano Hernández Zapata",
            "Zapata",
            "Mariano H. Zapata",
        ],
        [
            "subvención",
            "ayuda",
            "guerra",
            "militar",
            "ejército",
            "misil",
            "bomba",
            "ataque",
            "conflicto",
            "israel",
            "palestina",
            "irán",
            "iran",
            "ucrania",
            "rusia",
            "otan",
            "norte corea",
            "nuclear militar",
            "armamento",
            "defensa",
            "netanyahu",
            "trump",
            "putin",
            "hamás",
            "hezbolá",
            "suministro",
            "impacto",
            "fuentes",
        ],
    )
}

fn default_sources() -> Vec<SourceConfig> {
    let s = SourceConfig::with_selector;
    vec![
        s("EnergyNews", "https://www.energynews.es/", "article h2.entry-title a", None),
        s("EFEVerde", "https://efeverde.com/energia/", "article h2 a", None),
        s(
            "El Periódico de la Energía",
            "https://elperiodicodelaenergia.com/renovables",
            "h3.entry-title a",
            None,
        ),
        s(
            "Energías Renovables",
            "https://www.energias-renovables.com/",
            "div.enrTitularNoticia a",
            Some("https://www.energias-renovables.com"),
        ),
        s("Review Energy", "https://www.review-energy.com/", "div.card-title a", None),
        s("Diario de la Energía", "https://www.diariodelaenergia.com/", "h3.entry-title a", None),
        s("El Día", "https://www.eldia.es/tags/ayudas/", "article h3 a", Some("https://www.eldia.es")),
        s(
            "Diario de Avisos",
            "https://diariodeavisos.elespanol.com/economia/",
            "h2.entry-title a",
            None,
        ),
        s(
            "El País",
            "https://elpais.com/noticias/energias-renovables/",
            "h2.c_t a",
            Some("https://elpais.com"),
        ),
        s(
            "El Mundo",
            "https://www.elmundo.es/economia.html",
            "h2.ue-c-cover-content__headline a",
            Some("https://www.elmundo.es"),
        ),
        s(
            "La Vanguardia",
            "https://www.lavanguardia.com/natural/energia",
            "h2 a",
            Some("https://www.lavanguardia.com"),
        ),
        s(
            "ABC",
            "https://www.abc.es/noticias/energias-renovables/",
            "h2 a",
            Some("https://www.abc.es"),
        ),
        s("EFE", "https://efe.com/noticias/renovables/", "article h3 a", Some("https://efe.com")),
        s(
            "Europa Press",
            "https://www.europapress.es/",
            "div.noticiacuerpo h2 a",
            Some("https://www.europapress.es"),
        ),
        s(
            "La Razón",
            "https://www.larazon.es/tags/renovables/",
            "h2.title-news a",
            Some("https://www.larazon.es"),
        ),
        s(
            "El Español",
            "https://www.elespanol.com/temas/energias_renovables/",
            "article h2 a",
            Some("https://www.elespanol.com"),
        ),
        s(
            "Cadena SER Canarias",
            "https://cadenaser.com/ccaa/canarias/",
            "article h2 a",
            Some("https://cadenaser.com"),
        ),
        s(
            "Euronews UE",
            "https://es.euronews.com/tag/union-europea",
            "main a",
            Some("https://es.euronews.com"),
        ),
        s(
            "EnergiaParaElCambio",
            "https://energiaparaelcambio.com/",
            "main a",
            Some("https://energiaparaelcambio.com"),
        ),
    ]
}
