//! Reference taxonomy seed data.
//!
//! The service starts with a built-in set of terms, or with the lists from a
//! JSON file named by `TAXONOMY_SEED`:
//!
//! ```json
//! {
//!   "cancers": ["Breast cancer", "Lung cancer"],
//!   "primary_sites": ["Breast", "Lung"],
//!   "countries": ["Canada"],
//!   "institutions": ["Ontario Institute for Cancer Research"],
//!   "regions": ["North America"]
//! }
//! ```
//!
//! Missing lists are empty. Ids are assigned from 1 in list order; repeated
//! names are skipped.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

use crate::associator::Table;
use crate::domain::entities::{Taxonomy, TaxonomyKind, TaxonomyTerm};

/// Term names for every taxonomy.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaxonomySeed {
    #[serde(default)]
    pub cancers: Vec<String>,
    #[serde(default)]
    pub primary_sites: Vec<String>,
    #[serde(default)]
    pub countries: Vec<String>,
    #[serde(default)]
    pub institutions: Vec<String>,
    #[serde(default)]
    pub regions: Vec<String>,
}

impl TaxonomySeed {
    /// Built-in reference lists.
    pub fn builtin() -> Self {
        fn names(items: &[&str]) -> Vec<String> {
            items.iter().map(|s| s.to_string()).collect()
        }

        Self {
            cancers: names(&[
                "Biliary tract cancer",
                "Bladder cancer",
                "Blood cancer",
                "Bone cancer",
                "Brain cancer",
                "Breast cancer",
                "Cervical cancer",
                "Colorectal cancer",
                "Esophageal cancer",
                "Gastric cancer",
                "Head and neck cancer",
                "Kidney cancer",
                "Liver cancer",
                "Lung cancer",
                "Ovarian cancer",
                "Pancreatic cancer",
                "Prostate cancer",
                "Skin cancer",
                "Uterine cancer",
            ]),
            primary_sites: names(&[
                "Biliary tract",
                "Bladder",
                "Blood",
                "Bone",
                "Brain",
                "Breast",
                "Cervix",
                "Colorectal",
                "Esophagus",
                "Head and neck",
                "Kidney",
                "Liver",
                "Lung",
                "Ovary",
                "Pancreas",
                "Prostate",
                "Skin",
                "Stomach",
                "Uterus",
            ]),
            countries: names(&[
                "Australia",
                "Brazil",
                "Canada",
                "China",
                "France",
                "Germany",
                "India",
                "Japan",
                "Mexico",
                "Saudi Arabia",
                "Singapore",
                "South Korea",
                "Spain",
                "United Kingdom",
                "United States",
            ]),
            institutions: names(&[
                "Ontario Institute for Cancer Research",
                "University of California, Santa Cruz",
                "Wellcome Sanger Institute",
            ]),
            regions: names(&[
                "Africa",
                "Asia",
                "Australia and New Zealand",
                "Europe",
                "Middle East",
                "North America",
                "South America",
            ]),
        }
    }

    /// Reads seed lists from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid seed JSON.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read taxonomy seed {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Invalid taxonomy seed {}", path.display()))
    }

    /// Builds a taxonomy snapshot with no program links.
    pub fn into_taxonomy(self) -> Taxonomy {
        Taxonomy {
            cancers: table(self.cancers),
            primary_sites: table(self.primary_sites),
            countries: table(self.countries),
            institutions: table(self.institutions),
            regions: table(self.regions),
        }
    }
}

fn table<K: TaxonomyKind>(names: Vec<String>) -> Table<TaxonomyTerm<K>> {
    let mut seen = HashSet::new();
    names
        .into_iter()
        .filter(|name| seen.insert(name.clone()))
        .zip(1_i64..)
        .map(|(name, id)| TaxonomyTerm::new(id, name))
        .collect()
}
