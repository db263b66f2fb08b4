//! Reference taxonomies and their program join entities.
//!
//! The five taxonomies (cancers, primary sites, countries, institutions,
//! regions) share one shape: a named term linked to programs through a join
//! entity. [`TaxonomyKind`] carries what differs between them, so each
//! relationship is declared once in [`crate::domain::relations`].

use std::fmt::{self, Debug};
use std::marker::PhantomData;
use std::str::FromStr;

use crate::associator::{CompositeId, Identifiable, Table};
use crate::domain::entities::program::Program;

/// Per-taxonomy labels and accessors.
pub trait TaxonomyKind: Debug + Clone + PartialEq + Eq + Send + Sync + 'static {
    /// Entity name of a term, e.g. `Cancer`.
    const TERM: &'static str;
    /// Entity name of the join, e.g. `ProgramCancer`.
    const LINK: &'static str;
    const SLUG: TermKind;

    /// The program's joins for this taxonomy.
    fn program_links(program: &mut Program) -> &mut Vec<ProgramTerm<Self>>;

    /// This taxonomy's table in a snapshot.
    fn table(taxonomy: &mut Taxonomy) -> &mut Table<TaxonomyTerm<Self>>;
}

/// A reference term of taxonomy `K`.
#[derive(Debug, Clone)]
pub struct TaxonomyTerm<K> {
    pub id: i64,
    pub name: String,
    pub programs: Vec<ProgramTerm<K>>,
    kind: PhantomData<K>,
}

impl<K> TaxonomyTerm<K> {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            programs: Vec::new(),
            kind: PhantomData,
        }
    }

    /// Short names of the programs this term is linked to, sorted.
    pub fn program_short_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .programs
            .iter()
            .filter_map(|link| link.program.clone())
            .collect();
        names.sort();
        names
    }
}

impl<K: TaxonomyKind> Identifiable for TaxonomyTerm<K> {
    type Id = i64;
    const KIND: &'static str = K::TERM;

    fn id(&self) -> i64 {
        self.id
    }
}

/// Join entity linking one program to one term.
///
/// Identity is `(program short name, term id)`; both keys are set when the
/// join is created and never change afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramTerm<K> {
    pub program: Option<String>,
    pub term: Option<i64>,
    kind: PhantomData<K>,
}

impl<K> ProgramTerm<K> {
    pub fn new(program: &str, term: i64) -> Self {
        Self {
            program: Some(program.to_string()),
            term: Some(term),
            kind: PhantomData,
        }
    }
}

impl<K: TaxonomyKind> Identifiable for ProgramTerm<K> {
    type Id = CompositeId<String, i64>;
    const KIND: &'static str = K::LINK;

    fn id(&self) -> Self::Id {
        CompositeId(
            self.program.clone().unwrap_or_default(),
            self.term.unwrap_or_default(),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CancerKind;
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PrimarySiteKind;
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CountryKind;
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InstitutionKind;
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RegionKind;

pub type Cancer = TaxonomyTerm<CancerKind>;
pub type PrimarySite = TaxonomyTerm<PrimarySiteKind>;
pub type Country = TaxonomyTerm<CountryKind>;
pub type Institution = TaxonomyTerm<InstitutionKind>;
pub type Region = TaxonomyTerm<RegionKind>;

pub type ProgramCancer = ProgramTerm<CancerKind>;
pub type ProgramPrimarySite = ProgramTerm<PrimarySiteKind>;
pub type ProgramCountry = ProgramTerm<CountryKind>;
pub type ProgramInstitution = ProgramTerm<InstitutionKind>;
pub type ProgramRegion = ProgramTerm<RegionKind>;

impl TaxonomyKind for CancerKind {
    const TERM: &'static str = "Cancer";
    const LINK: &'static str = "ProgramCancer";
    const SLUG: TermKind = TermKind::Cancers;

    fn program_links(program: &mut Program) -> &mut Vec<ProgramTerm<Self>> {
        &mut program.cancers
    }

    fn table(taxonomy: &mut Taxonomy) -> &mut Table<TaxonomyTerm<Self>> {
        &mut taxonomy.cancers
    }
}

impl TaxonomyKind for PrimarySiteKind {
    const TERM: &'static str = "PrimarySite";
    const LINK: &'static str = "ProgramPrimarySite";
    const SLUG: TermKind = TermKind::PrimarySites;

    fn program_links(program: &mut Program) -> &mut Vec<ProgramTerm<Self>> {
        &mut program.primary_sites
    }

    fn table(taxonomy: &mut Taxonomy) -> &mut Table<TaxonomyTerm<Self>> {
        &mut taxonomy.primary_sites
    }
}

impl TaxonomyKind for CountryKind {
    const TERM: &'static str = "Country";
    const LINK: &'static str = "ProgramCountry";
    const SLUG: TermKind = TermKind::Countries;

    fn program_links(program: &mut Program) -> &mut Vec<ProgramTerm<Self>> {
        &mut program.countries
    }

    fn table(taxonomy: &mut Taxonomy) -> &mut Table<TaxonomyTerm<Self>> {
        &mut taxonomy.countries
    }
}

impl TaxonomyKind for InstitutionKind {
    const TERM: &'static str = "Institution";
    const LINK: &'static str = "ProgramInstitution";
    const SLUG: TermKind = TermKind::Institutions;

    fn program_links(program: &mut Program) -> &mut Vec<ProgramTerm<Self>> {
        &mut program.institutions
    }

    fn table(taxonomy: &mut Taxonomy) -> &mut Table<TaxonomyTerm<Self>> {
        &mut taxonomy.institutions
    }
}

impl TaxonomyKind for RegionKind {
    const TERM: &'static str = "Region";
    const LINK: &'static str = "ProgramRegion";
    const SLUG: TermKind = TermKind::Regions;

    fn program_links(program: &mut Program) -> &mut Vec<ProgramTerm<Self>> {
        &mut program.regions
    }

    fn table(taxonomy: &mut Taxonomy) -> &mut Table<TaxonomyTerm<Self>> {
        &mut taxonomy.regions
    }
}

/// Runtime name of a taxonomy, as used in URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermKind {
    Cancers,
    PrimarySites,
    Countries,
    Institutions,
    Regions,
}

impl TermKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TermKind::Cancers => "cancers",
            TermKind::PrimarySites => "primary-sites",
            TermKind::Countries => "countries",
            TermKind::Institutions => "institutions",
            TermKind::Regions => "regions",
        }
    }
}

impl fmt::Display for TermKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TermKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cancers" => Ok(TermKind::Cancers),
            "primary-sites" => Ok(TermKind::PrimarySites),
            "countries" => Ok(TermKind::Countries),
            "institutions" => Ok(TermKind::Institutions),
            "regions" => Ok(TermKind::Regions),
            other => Err(format!("unknown taxonomy '{other}'")),
        }
    }
}

/// Snapshot of every reference taxonomy.
#[derive(Debug, Clone, Default)]
pub struct Taxonomy {
    pub cancers: Table<Cancer>,
    pub primary_sites: Table<PrimarySite>,
    pub countries: Table<Country>,
    pub institutions: Table<Institution>,
    pub regions: Table<Region>,
}

impl Taxonomy {
    /// Looks up terms of kind `K` by name.
    ///
    /// Returns the matching ids in input order, or every unknown name, sorted
    /// and deduplicated.
    pub fn resolve<K: TaxonomyKind>(&mut self, names: &[String]) -> Result<Vec<i64>, Vec<String>> {
        let table = K::table(self);
        let mut ids = Vec::with_capacity(names.len());
        let mut unknown = Vec::new();

        for name in names {
            match table.iter().find(|term| term.name == *name) {
                Some(term) => ids.push(term.id),
                None => unknown.push(name.clone()),
            }
        }

        if unknown.is_empty() {
            Ok(ids)
        } else {
            unknown.sort();
            unknown.dedup();
            Err(unknown)
        }
    }

    /// Next free id in the table of kind `K`.
    pub fn next_id<K: TaxonomyKind>(&mut self) -> i64 {
        K::table(self).ids().max().map_or(1, |id| id + 1)
    }
}
