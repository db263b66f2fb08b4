//! Program administration service.

use chrono::{Duration, Utc};
use serde_json::{Map, Value, json};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{info, warn};

use crate::application::services::GraphLock;
use crate::domain::entities::{
    CancerKind, CountryKind, InstitutionKind, Invitation, InvitationStatus, NewInvitation,
    NewProgram, PrimarySiteKind, Program, RegionKind, SHORT_NAME_PATTERN, Taxonomy, TaxonomyKind,
    TermNames, UpdateProgram,
};
use crate::domain::relations;
use crate::domain::repositories::{ProgramRepository, TaxonomyRepository};
use crate::error::AppError;

const MAX_SHORT_NAME_LEN: usize = 11;

/// Service for programs, their taxonomy links and their invitations.
///
/// Every relationship change goes through [`relations`]; the service loads
/// the program and taxonomy snapshot, mutates them, and stores both back
/// while holding the shared [`GraphLock`].
pub struct ProgramService<R: ProgramRepository, T: TaxonomyRepository> {
    programs: Arc<R>,
    taxonomy: Arc<T>,
    lock: GraphLock,
    invitation_ttl: Duration,
}

/// Term names per taxonomy; `None` leaves that taxonomy untouched.
struct TermLists<'a> {
    cancers: Option<&'a [String]>,
    primary_sites: Option<&'a [String]>,
    countries: Option<&'a [String]>,
    institutions: Option<&'a [String]>,
    regions: Option<&'a [String]>,
}

impl<'a> From<&'a TermNames> for TermLists<'a> {
    fn from(names: &'a TermNames) -> Self {
        Self {
            cancers: Some(&names.cancers),
            primary_sites: Some(&names.primary_sites),
            countries: Some(&names.countries),
            institutions: Some(&names.institutions),
            regions: Some(&names.regions),
        }
    }
}

impl<'a> From<&'a UpdateProgram> for TermLists<'a> {
    fn from(update: &'a UpdateProgram) -> Self {
        Self {
            cancers: update.cancers.as_deref(),
            primary_sites: update.primary_sites.as_deref(),
            countries: update.countries.as_deref(),
            institutions: update.institutions.as_deref(),
            regions: update.regions.as_deref(),
        }
    }
}

/// Term ids per taxonomy, resolved from names.
#[derive(Debug)]
struct ResolvedTerms {
    cancers: Option<Vec<i64>>,
    primary_sites: Option<Vec<i64>>,
    countries: Option<Vec<i64>>,
    institutions: Option<Vec<i64>>,
    regions: Option<Vec<i64>>,
}

impl<R: ProgramRepository, T: TaxonomyRepository> ProgramService<R, T> {
    /// Creates a new program service.
    ///
    /// `invitation_ttl_days` sets how long a new invitation stays valid.
    pub fn new(programs: Arc<R>, taxonomy: Arc<T>, lock: GraphLock, invitation_ttl_days: i64) -> Self {
        Self {
            programs,
            taxonomy,
            lock,
            invitation_ttl: Duration::days(invitation_ttl_days),
        }
    }

    /// Creates a program and links it to the named taxonomy terms.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the short name or donor counts are invalid.
    /// Returns [`AppError::Conflict`] if the short name is taken.
    /// Returns [`AppError::NotFound`] listing every unknown term name.
    /// Returns [`AppError::Internal`] on storage errors; the program is removed
    /// again if the taxonomy cannot be stored.
    pub async fn create_program(&self, new_program: NewProgram) -> Result<Program, AppError> {
        validate_short_name(&new_program.short_name)?;
        validate_donor_counts(&[
            ("commitment_donors", new_program.commitment_donors),
            ("submitted_donors", new_program.submitted_donors),
            ("genomic_donors", new_program.genomic_donors),
        ])?;

        let _guard = self.lock.lock().await;

        if self.programs.find(&new_program.short_name).await?.is_some() {
            return Err(AppError::conflict(
                "Program already exists",
                json!({ "short_name": new_program.short_name }),
            ));
        }

        let mut taxonomy = self.taxonomy.load().await?;
        let resolved = resolve_terms(&mut taxonomy, TermLists::from(&new_program.terms))?;

        let mut program = Program::new(
            new_program.short_name,
            new_program.name,
            new_program.membership_type,
            Utc::now(),
        );
        program.description = new_program.description;
        program.commitment_donors = new_program.commitment_donors;
        program.submitted_donors = new_program.submitted_donors;
        program.genomic_donors = new_program.genomic_donors;
        program.website = new_program.website;

        apply_terms(&mut program, &mut taxonomy, resolved)?;

        let created = self.programs.insert(program).await?;
        if let Err(e) = self.taxonomy.store(taxonomy).await {
            warn!(short_name = %created.short_name, error = %e, "Taxonomy store failed, removing program");
            self.programs.delete(&created.short_name).await?;
            return Err(e);
        }

        info!(short_name = %created.short_name, "Program created");
        Ok(created)
    }

    /// Retrieves a program by short name.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the program does not exist.
    pub async fn get_program(&self, short_name: &str) -> Result<Program, AppError> {
        self.programs
            .find(short_name)
            .await?
            .ok_or_else(|| program_not_found(short_name))
    }

    /// Lists every program.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn list_programs(&self) -> Result<Vec<Program>, AppError> {
        self.programs.list().await
    }

    /// Retrieves a program with the names of its linked terms.
    ///
    /// Program and taxonomy are read under the graph lock, so both sides of
    /// every link come from the same state.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the program does not exist.
    pub async fn describe_program(&self, short_name: &str) -> Result<(Program, TermNames), AppError> {
        let _guard = self.lock.lock().await;

        let mut program = self.get_program(short_name).await?;
        let mut taxonomy = self.taxonomy.load().await?;
        let names = term_names(&mut program, &mut taxonomy);

        Ok((program, names))
    }

    /// Lists every program with the names of its linked terms.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn describe_programs(&self) -> Result<Vec<(Program, TermNames)>, AppError> {
        let _guard = self.lock.lock().await;

        let programs = self.programs.list().await?;
        let mut taxonomy = self.taxonomy.load().await?;

        Ok(programs
            .into_iter()
            .map(|mut program| {
                let names = term_names(&mut program, &mut taxonomy);
                (program, names)
            })
            .collect())
    }

    /// Applies a partial update.
    ///
    /// A term list present in `update` replaces that taxonomy's links: terms
    /// no longer named are disassociated, new ones associated, the rest kept.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if donor counts are invalid.
    /// Returns [`AppError::NotFound`] if the program or any named term does not exist.
    /// Returns [`AppError::Internal`] on storage errors; the previous program
    /// is written back if the taxonomy cannot be stored.
    pub async fn update_program(
        &self,
        short_name: &str,
        update: UpdateProgram,
    ) -> Result<Program, AppError> {
        let counts: Vec<(&str, i32)> = [
            ("commitment_donors", update.commitment_donors),
            ("submitted_donors", update.submitted_donors),
            ("genomic_donors", update.genomic_donors),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.map(|v| (field, v)))
        .collect();
        validate_donor_counts(&counts)?;

        let _guard = self.lock.lock().await;

        let mut program = self.get_program(short_name).await?;
        let previous = program.clone();
        let mut taxonomy = self.taxonomy.load().await?;

        let resolved = resolve_terms(&mut taxonomy, TermLists::from(&update))?;

        if let Some(name) = update.name {
            program.name = name;
        }
        if let Some(description) = update.description {
            program.description = Some(description);
        }
        if let Some(membership_type) = update.membership_type {
            program.membership_type = membership_type;
        }
        if let Some(count) = update.commitment_donors {
            program.commitment_donors = count;
        }
        if let Some(count) = update.submitted_donors {
            program.submitted_donors = count;
        }
        if let Some(count) = update.genomic_donors {
            program.genomic_donors = count;
        }
        if let Some(website) = update.website {
            program.website = Some(website);
        }

        apply_terms(&mut program, &mut taxonomy, resolved)?;
        program.updated_at = Utc::now();

        let updated = self.programs.update(program).await?;
        if let Err(e) = self.taxonomy.store(taxonomy).await {
            warn!(short_name, error = %e, "Taxonomy store failed, restoring program");
            self.programs.update(previous).await?;
            return Err(e);
        }

        info!(short_name = %updated.short_name, "Program updated");
        Ok(updated)
    }

    /// Removes a program after unlinking every term and invitation.
    ///
    /// The unlinked taxonomy is stored before the program is deleted; if the
    /// delete fails the previous taxonomy is stored back.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the program does not exist.
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn remove_program(&self, short_name: &str) -> Result<(), AppError> {
        let _guard = self.lock.lock().await;

        let mut program = self.get_program(short_name).await?;
        let mut taxonomy = self.taxonomy.load().await?;
        let previous = taxonomy.clone();

        unlink_all::<CancerKind>(&mut program, &mut taxonomy)?;
        unlink_all::<PrimarySiteKind>(&mut program, &mut taxonomy)?;
        unlink_all::<CountryKind>(&mut program, &mut taxonomy)?;
        unlink_all::<InstitutionKind>(&mut program, &mut taxonomy)?;
        unlink_all::<RegionKind>(&mut program, &mut taxonomy)?;

        let invitations = relations::program_invitations();
        let invitation_ids = invitations.child_ids(&mut program);
        let dropped = invitations.disassociate(&mut program, &invitation_ids)?;

        self.taxonomy.store(taxonomy).await?;
        if let Err(e) = self.programs.delete(short_name).await {
            warn!(short_name, error = %e, "Program delete failed, restoring taxonomy");
            self.taxonomy.store(previous).await?;
            return Err(e);
        }

        info!(
            short_name,
            invitations = dropped.len(),
            "Program removed"
        );
        Ok(())
    }

    /// Invites a user to a program.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the email is malformed.
    /// Returns [`AppError::NotFound`] if the program does not exist.
    /// Returns [`AppError::Conflict`] if the email already has a pending invitation.
    pub async fn invite_user(
        &self,
        short_name: &str,
        invite: NewInvitation,
    ) -> Result<Invitation, AppError> {
        if !invite.email.contains('@') {
            return Err(AppError::bad_request(
                "Invalid email address",
                json!({ "email": invite.email }),
            ));
        }

        let _guard = self.lock.lock().await;

        let mut program = self.get_program(short_name).await?;

        if program
            .invitations
            .iter()
            .any(|i| i.is_pending() && i.email.eq_ignore_ascii_case(&invite.email))
        {
            return Err(AppError::conflict(
                "User already has a pending invitation",
                json!({ "short_name": short_name, "email": invite.email }),
            ));
        }

        let id = self.programs.next_invitation_id().await?;
        let now = Utc::now();
        let invitation = Invitation::pending(id, invite, now, now + self.invitation_ttl);

        relations::program_invitations().associate(&mut program, invitation)?;
        let program = self.programs.update(program).await?;

        let created = program
            .invitations
            .into_iter()
            .find(|i| i.id == id)
            .ok_or_else(|| AppError::internal("Invitation missing after save", json!({ "id": id })))?;

        info!(short_name, invitation_id = id, role = ?created.role, "User invited");
        Ok(created)
    }

    /// Lists a program's invitations.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the program does not exist.
    pub async fn list_invitations(&self, short_name: &str) -> Result<Vec<Invitation>, AppError> {
        Ok(self.get_program(short_name).await?.invitations)
    }

    /// Revokes invitations by deleting them from the program.
    ///
    /// Returns the deleted invitations as they were, without a program
    /// back-reference. Nothing about them is kept.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the program does not exist, or listing
    /// every id that is not one of its invitations. Nothing is revoked then.
    pub async fn revoke_invitations(
        &self,
        short_name: &str,
        ids: &[i64],
    ) -> Result<Vec<Invitation>, AppError> {
        let _guard = self.lock.lock().await;

        let mut program = self.get_program(short_name).await?;
        let revoked = relations::program_invitations().disassociate(&mut program, ids)?;

        self.programs.update(program).await?;

        info!(short_name, count = revoked.len(), "Invitations revoked");
        Ok(revoked)
    }

    /// Accepts a pending invitation.
    ///
    /// An invitation past its expiry is marked expired and rejected.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the program or invitation does not exist.
    /// Returns [`AppError::Conflict`] if the invitation is not pending.
    /// Returns [`AppError::Validation`] if the invitation has expired.
    pub async fn accept_invitation(&self, short_name: &str, id: i64) -> Result<Invitation, AppError> {
        let _guard = self.lock.lock().await;

        let mut program = self.get_program(short_name).await?;
        let now = Utc::now();

        let invitation = program
            .invitations
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| {
                AppError::not_found(
                    "Invitation not found",
                    json!({ "short_name": short_name, "id": id }),
                )
            })?;

        if !invitation.is_pending() {
            return Err(AppError::conflict(
                "Invitation is not pending",
                json!({ "id": id, "status": invitation.status }),
            ));
        }

        if invitation.is_expired_at(now) {
            invitation.status = InvitationStatus::Expired;
            self.programs.update(program).await?;
            warn!(short_name, invitation_id = id, "Expired invitation rejected");
            return Err(AppError::bad_request(
                "Invitation has expired",
                json!({ "id": id }),
            ));
        }

        invitation.status = InvitationStatus::Accepted;
        invitation.accepted_at = Some(now);
        let accepted = invitation.clone();

        self.programs.update(program).await?;

        info!(short_name, invitation_id = id, "Invitation accepted");
        Ok(accepted)
    }
}

fn program_not_found(short_name: &str) -> AppError {
    AppError::not_found("Program not found", json!({ "short_name": short_name }))
}

fn validate_short_name(short_name: &str) -> Result<(), AppError> {
    if short_name.len() > MAX_SHORT_NAME_LEN || !SHORT_NAME_PATTERN.is_match(short_name) {
        return Err(AppError::bad_request(
            "Invalid program short name",
            json!({
                "short_name": short_name,
                "hint": "Uppercase letters, digits and dashes, e.g. PACA-CA",
                "max_length": MAX_SHORT_NAME_LEN,
            }),
        ));
    }
    Ok(())
}

fn validate_donor_counts(counts: &[(&str, i32)]) -> Result<(), AppError> {
    let negative: Vec<&str> = counts
        .iter()
        .filter(|(_, value)| *value < 0)
        .map(|(field, _)| *field)
        .collect();

    if !negative.is_empty() {
        return Err(AppError::bad_request(
            "Donor counts must not be negative",
            json!({ "fields": negative }),
        ));
    }
    Ok(())
}

/// Resolves every list of names, collecting unknown names across taxonomies.
fn resolve_terms(taxonomy: &mut Taxonomy, names: TermLists<'_>) -> Result<ResolvedTerms, AppError> {
    let mut unknown = Map::new();

    let resolved = ResolvedTerms {
        cancers: resolve::<CancerKind>(taxonomy, names.cancers, &mut unknown),
        primary_sites: resolve::<PrimarySiteKind>(taxonomy, names.primary_sites, &mut unknown),
        countries: resolve::<CountryKind>(taxonomy, names.countries, &mut unknown),
        institutions: resolve::<InstitutionKind>(taxonomy, names.institutions, &mut unknown),
        regions: resolve::<RegionKind>(taxonomy, names.regions, &mut unknown),
    };

    if !unknown.is_empty() {
        return Err(AppError::not_found(
            "Unknown taxonomy terms",
            Value::Object(unknown),
        ));
    }
    Ok(resolved)
}

/// Ids for `names`, deduplicated in first-seen order.
fn resolve<K: TaxonomyKind>(
    taxonomy: &mut Taxonomy,
    names: Option<&[String]>,
    unknown: &mut Map<String, Value>,
) -> Option<Vec<i64>> {
    match taxonomy.resolve::<K>(names?) {
        Ok(ids) => {
            let mut seen = BTreeSet::new();
            Some(ids.into_iter().filter(|id| seen.insert(*id)).collect())
        }
        Err(missing) => {
            unknown.insert(K::SLUG.to_string(), json!(missing));
            None
        }
    }
}

fn apply_terms(
    program: &mut Program,
    taxonomy: &mut Taxonomy,
    resolved: ResolvedTerms,
) -> Result<(), AppError> {
    if let Some(ids) = resolved.cancers {
        replace_links::<CancerKind>(program, taxonomy, &ids)?;
    }
    if let Some(ids) = resolved.primary_sites {
        replace_links::<PrimarySiteKind>(program, taxonomy, &ids)?;
    }
    if let Some(ids) = resolved.countries {
        replace_links::<CountryKind>(program, taxonomy, &ids)?;
    }
    if let Some(ids) = resolved.institutions {
        replace_links::<InstitutionKind>(program, taxonomy, &ids)?;
    }
    if let Some(ids) = resolved.regions {
        replace_links::<RegionKind>(program, taxonomy, &ids)?;
    }
    Ok(())
}

/// Makes `target` the program's exact set of links of kind `K`.
fn replace_links<K: TaxonomyKind>(
    program: &mut Program,
    taxonomy: &mut Taxonomy,
    target: &[i64],
) -> Result<(), AppError> {
    let associator = relations::program_terms::<K>();
    let table = K::table(taxonomy);

    let current: BTreeSet<i64> = associator.children_of(program).into_iter().collect();
    let wanted: BTreeSet<i64> = target.iter().copied().collect();

    let stale: Vec<i64> = current.difference(&wanted).copied().collect();
    if !stale.is_empty() {
        associator.disassociate(program, table, &stale)?;
    }

    for id in target.iter().filter(|id| !current.contains(id)) {
        let term = table.get_mut(id).ok_or_else(|| {
            AppError::not_found(format!("{} not found", K::TERM), json!({ "id": id }))
        })?;
        associator.associate(program, term)?;
    }

    Ok(())
}

fn term_names(program: &mut Program, taxonomy: &mut Taxonomy) -> TermNames {
    TermNames {
        cancers: linked_names::<CancerKind>(program, taxonomy),
        primary_sites: linked_names::<PrimarySiteKind>(program, taxonomy),
        countries: linked_names::<CountryKind>(program, taxonomy),
        institutions: linked_names::<InstitutionKind>(program, taxonomy),
        regions: linked_names::<RegionKind>(program, taxonomy),
    }
}

fn linked_names<K: TaxonomyKind>(program: &mut Program, taxonomy: &mut Taxonomy) -> Vec<String> {
    let table = K::table(taxonomy);
    let mut names = Vec::new();

    for id in relations::program_terms::<K>().children_of(program) {
        match table.get(&id) {
            Some(term) => names.push(term.name.clone()),
            None => warn!(
                short_name = %program.short_name,
                term_kind = K::TERM,
                term_id = id,
                "Linked term missing from taxonomy"
            ),
        }
    }

    names
}

fn unlink_all<K: TaxonomyKind>(program: &mut Program, taxonomy: &mut Taxonomy) -> Result<(), AppError> {
    replace_links::<K>(program, taxonomy, &[])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Cancer, Country, MembershipType, UserRole};
    use crate::domain::repositories::{MockProgramRepository, MockTaxonomyRepository};
    use tokio::sync::Mutex;

    fn taxonomy() -> Taxonomy {
        Taxonomy {
            cancers: [Cancer::new(1, "Breast cancer"), Cancer::new(2, "Lung cancer")]
                .into_iter()
                .collect(),
            countries: [Country::new(1, "Canada")].into_iter().collect(),
            ..Default::default()
        }
    }

    fn new_program(short_name: &str) -> NewProgram {
        NewProgram {
            short_name: short_name.to_string(),
            name: "Test program".to_string(),
            description: None,
            membership_type: MembershipType::Full,
            commitment_donors: 100,
            submitted_donors: 0,
            genomic_donors: 0,
            website: None,
            terms: TermNames {
                cancers: vec!["Breast cancer".to_string()],
                countries: vec!["Canada".to_string()],
                ..Default::default()
            },
        }
    }

    fn stored_program(short_name: &str) -> Program {
        Program::new(
            short_name.to_string(),
            "Test program".to_string(),
            MembershipType::Full,
            Utc::now(),
        )
    }

    fn invite(email: &str) -> NewInvitation {
        NewInvitation {
            email: email.to_string(),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            role: UserRole::Submitter,
        }
    }

    fn service(
        programs: MockProgramRepository,
        taxonomy: MockTaxonomyRepository,
    ) -> ProgramService<MockProgramRepository, MockTaxonomyRepository> {
        ProgramService::new(
            Arc::new(programs),
            Arc::new(taxonomy),
            Arc::new(Mutex::new(())),
            30,
        )
    }

    #[tokio::test]
    async fn test_create_program_links_terms_on_both_sides() {
        let mut programs = MockProgramRepository::new();
        programs.expect_find().times(1).returning(|_| Ok(None));
        programs
            .expect_insert()
            .withf(|p| p.cancers.len() == 1 && p.countries.len() == 1)
            .times(1)
            .returning(Ok);

        let mut tax = MockTaxonomyRepository::new();
        tax.expect_load().times(1).returning(|| Ok(taxonomy()));
        tax.expect_store()
            .withf(|t| {
                t.cancers.get(&1).unwrap().program_short_names() == vec!["TEST-CA"]
                    && t.cancers.get(&2).unwrap().programs.is_empty()
                    && t.countries.get(&1).unwrap().programs.len() == 1
            })
            .times(1)
            .returning(|_| Ok(()));

        let result = service(programs, tax)
            .create_program(new_program("TEST-CA"))
            .await;

        assert!(result.is_ok());
        assert_eq!(result.unwrap().short_name, "TEST-CA");
    }

    #[tokio::test]
    async fn test_create_program_duplicate_names_link_once() {
        let mut programs = MockProgramRepository::new();
        programs.expect_find().returning(|_| Ok(None));
        programs
            .expect_insert()
            .withf(|p| p.cancers.len() == 1)
            .times(1)
            .returning(Ok);
        let mut tax = MockTaxonomyRepository::new();
        tax.expect_load().returning(|| Ok(taxonomy()));
        tax.expect_store().returning(|_| Ok(()));

        let mut input = new_program("TEST-CA");
        input.terms.cancers = vec!["Breast cancer".to_string(), "Breast cancer".to_string()];

        assert!(service(programs, tax).create_program(input).await.is_ok());
    }

    #[tokio::test]
    async fn test_create_program_invalid_short_name() {
        let service = service(MockProgramRepository::new(), MockTaxonomyRepository::new());

        for bad in ["", "lower-ca", "-LEAD", "TRAIL-", "WAY-TOO-LONG-NAME", "BAD_CHAR"] {
            let result = service.create_program(new_program(bad)).await;
            assert!(
                matches!(result.unwrap_err(), AppError::Validation { .. }),
                "{bad} should be rejected"
            );
        }
    }

    #[tokio::test]
    async fn test_create_program_negative_donors() {
        let service = service(MockProgramRepository::new(), MockTaxonomyRepository::new());
        let mut input = new_program("TEST-CA");
        input.genomic_donors = -1;

        let result = service.create_program(input).await;

        assert!(matches!(result.unwrap_err(), AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_create_program_already_exists() {
        let mut programs = MockProgramRepository::new();
        programs
            .expect_find()
            .times(1)
            .returning(|name| Ok(Some(stored_program(name))));

        let result = service(programs, MockTaxonomyRepository::new())
            .create_program(new_program("TEST-CA"))
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_create_program_reports_every_unknown_term() {
        let mut programs = MockProgramRepository::new();
        programs.expect_find().returning(|_| Ok(None));
        programs.expect_insert().never();
        let mut tax = MockTaxonomyRepository::new();
        tax.expect_load().returning(|| Ok(taxonomy()));
        tax.expect_store().never();

        let mut input = new_program("TEST-CA");
        input.terms.cancers = vec!["Moon cancer".to_string(), "Breast cancer".to_string()];
        input.terms.regions = vec!["Atlantis".to_string()];

        let err = service(programs, tax).create_program(input).await.unwrap_err();

        match err {
            AppError::NotFound { details, .. } => {
                assert_eq!(details["cancers"], json!(["Moon cancer"]));
                assert_eq!(details["regions"], json!(["Atlantis"]));
            }
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_update_program_replaces_only_named_taxonomies() {
        let mut tax_snapshot = taxonomy();
        let mut existing = stored_program("TEST-CA");
        let cancers = relations::program_terms::<CancerKind>();
        cancers
            .associate(&mut existing, tax_snapshot.cancers.get_mut(&1).unwrap())
            .unwrap();
        relations::program_terms::<CountryKind>()
            .associate(&mut existing, tax_snapshot.countries.get_mut(&1).unwrap())
            .unwrap();

        let mut programs = MockProgramRepository::new();
        programs
            .expect_find()
            .returning(move |_| Ok(Some(existing.clone())));
        programs
            .expect_update()
            .withf(|p| {
                p.name == "Renamed"
                    && p.cancers.len() == 1
                    && p.cancers[0].term == Some(2)
                    && p.countries.len() == 1
            })
            .times(1)
            .returning(Ok);

        let mut tax = MockTaxonomyRepository::new();
        tax.expect_load()
            .returning(move || Ok(tax_snapshot.clone()));
        tax.expect_store()
            .withf(|t| {
                t.cancers.get(&1).unwrap().programs.is_empty()
                    && t.cancers.get(&2).unwrap().programs.len() == 1
                    && t.countries.get(&1).unwrap().programs.len() == 1
            })
            .times(1)
            .returning(|_| Ok(()));

        let update = UpdateProgram {
            name: Some("Renamed".to_string()),
            cancers: Some(vec!["Lung cancer".to_string()]),
            ..Default::default()
        };

        let result = service(programs, tax).update_program("TEST-CA", update).await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_update_program_not_found() {
        let mut programs = MockProgramRepository::new();
        programs.expect_find().returning(|_| Ok(None));

        let result = service(programs, MockTaxonomyRepository::new())
            .update_program("NOPE-CA", UpdateProgram::default())
            .await;

        assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_remove_program_unlinks_terms() {
        let mut tax_snapshot = taxonomy();
        let mut existing = stored_program("TEST-CA");
        relations::program_terms::<CancerKind>()
            .associate_all(&mut existing, tax_snapshot.cancers.iter_mut())
            .unwrap();

        let mut programs = MockProgramRepository::new();
        programs
            .expect_find()
            .returning(move |_| Ok(Some(existing.clone())));
        programs
            .expect_delete()
            .withf(|name| name == "TEST-CA")
            .times(1)
            .returning(|_| Ok(()));

        let mut tax = MockTaxonomyRepository::new();
        tax.expect_load()
            .returning(move || Ok(tax_snapshot.clone()));
        tax.expect_store()
            .withf(|t| t.cancers.iter().all(|c| c.programs.is_empty()))
            .times(1)
            .returning(|_| Ok(()));

        let result = service(programs, tax).remove_program("TEST-CA").await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_invite_user() {
        let mut programs = MockProgramRepository::new();
        programs
            .expect_find()
            .returning(|name| Ok(Some(stored_program(name))));
        programs.expect_next_invitation_id().returning(|| Ok(9));
        programs
            .expect_update()
            .withf(|p| p.invitations.len() == 1)
            .times(1)
            .returning(Ok);

        let invitation = service(programs, MockTaxonomyRepository::new())
            .invite_user("TEST-CA", invite("jane@example.org"))
            .await
            .unwrap();

        assert_eq!(invitation.id, 9);
        assert_eq!(invitation.program.as_deref(), Some("TEST-CA"));
        assert_eq!(invitation.status, InvitationStatus::Pending);
        assert_eq!(invitation.expires_at - invitation.created_at, Duration::days(30));
    }

    #[tokio::test]
    async fn test_invite_user_pending_email_conflicts() {
        let mut existing = stored_program("TEST-CA");
        let now = Utc::now();
        relations::program_invitations()
            .associate(
                &mut existing,
                Invitation::pending(1, invite("jane@example.org"), now, now + Duration::days(1)),
            )
            .unwrap();

        let mut programs = MockProgramRepository::new();
        programs
            .expect_find()
            .returning(move |_| Ok(Some(existing.clone())));
        programs.expect_update().never();

        let result = service(programs, MockTaxonomyRepository::new())
            .invite_user("TEST-CA", invite("JANE@example.org"))
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_invite_user_invalid_email() {
        let result = service(MockProgramRepository::new(), MockTaxonomyRepository::new())
            .invite_user("TEST-CA", invite("not-an-email"))
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_revoke_invitations_reports_all_missing() {
        let mut existing = stored_program("TEST-CA");
        let now = Utc::now();
        relations::program_invitations()
            .associate(
                &mut existing,
                Invitation::pending(1, invite("a@example.org"), now, now + Duration::days(1)),
            )
            .unwrap();

        let mut programs = MockProgramRepository::new();
        programs
            .expect_find()
            .returning(move |_| Ok(Some(existing.clone())));
        programs.expect_update().never();

        let err = service(programs, MockTaxonomyRepository::new())
            .revoke_invitations("TEST-CA", &[1, 7, 5])
            .await
            .unwrap_err();

        match err {
            AppError::NotFound { details, .. } => {
                assert_eq!(details["missing"], json!(["5", "7"]));
            }
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_accept_expired_invitation() {
        let mut existing = stored_program("TEST-CA");
        let past = Utc::now() - Duration::days(10);
        relations::program_invitations()
            .associate(
                &mut existing,
                Invitation::pending(1, invite("a@example.org"), past, past + Duration::days(1)),
            )
            .unwrap();

        let mut programs = MockProgramRepository::new();
        programs
            .expect_find()
            .returning(move |_| Ok(Some(existing.clone())));
        programs
            .expect_update()
            .withf(|p| p.invitations[0].status == InvitationStatus::Expired)
            .times(1)
            .returning(Ok);

        let result = service(programs, MockTaxonomyRepository::new())
            .accept_invitation("TEST-CA", 1)
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_describe_programs() {
        let mut tax_snapshot = taxonomy();
        let mut existing = stored_program("TEST-CA");
        relations::program_terms::<CancerKind>()
            .associate_all(&mut existing, tax_snapshot.cancers.iter_mut())
            .unwrap();

        let mut programs = MockProgramRepository::new();
        programs
            .expect_list()
            .times(1)
            .returning(move || Ok(vec![existing.clone()]));

        let mut tax = MockTaxonomyRepository::new();
        tax.expect_load()
            .times(1)
            .returning(move || Ok(tax_snapshot.clone()));

        let described = service(programs, tax).describe_programs().await.unwrap();

        let (_, names) = &described[0];
        assert_eq!(names.cancers, vec!["Breast cancer", "Lung cancer"]);
        assert!(names.countries.is_empty());
    }

    #[tokio::test]
    async fn test_describe_waits_for_graph_lock() {
        let mut programs = MockProgramRepository::new();
        programs
            .expect_find()
            .times(1)
            .returning(|name| Ok(Some(stored_program(name))));
        let mut tax = MockTaxonomyRepository::new();
        tax.expect_load().times(1).returning(|| Ok(taxonomy()));

        let lock: GraphLock = Arc::new(Mutex::new(()));
        let service = ProgramService::new(Arc::new(programs), Arc::new(tax), lock.clone(), 30);

        let guard = lock.lock().await;
        tokio::select! {
            biased;
            _ = service.describe_program("TEST-CA") => panic!("read ran while a mutation held the lock"),
            _ = std::future::ready(()) => {}
        }
        drop(guard);

        let (program, names) = service.describe_program("TEST-CA").await.unwrap();
        assert_eq!(program.short_name, "TEST-CA");
        assert!(names.cancers.is_empty());
    }

    #[test]
    fn test_linked_names_skips_terms_missing_from_taxonomy() {
        let mut tax = taxonomy();
        let mut program = stored_program("TEST-CA");
        relations::program_terms::<CancerKind>()
            .associate_all(&mut program, tax.cancers.iter_mut())
            .unwrap();
        tax.cancers.remove(&2);

        let names = term_names(&mut program, &mut tax);

        assert_eq!(names.cancers, vec!["Breast cancer"]);
    }

    #[tokio::test]
    async fn test_revoke_invitations_deletes_them() {
        let mut existing = stored_program("TEST-CA");
        let now = Utc::now();
        relations::program_invitations()
            .associate_all(
                &mut existing,
                [
                    Invitation::pending(1, invite("a@example.org"), now, now + Duration::days(1)),
                    Invitation::pending(2, invite("b@example.org"), now, now + Duration::days(1)),
                ],
            )
            .unwrap();

        let mut programs = MockProgramRepository::new();
        programs
            .expect_find()
            .returning(move |_| Ok(Some(existing.clone())));
        programs
            .expect_update()
            .withf(|p| p.invitations.len() == 1 && p.invitations[0].id == 2)
            .times(1)
            .returning(Ok);

        let revoked = service(programs, MockTaxonomyRepository::new())
            .revoke_invitations("TEST-CA", &[1])
            .await
            .unwrap();

        assert_eq!(revoked.len(), 1);
        assert_eq!(revoked[0].id, 1);
        assert_eq!(revoked[0].program, None);
        assert_eq!(revoked[0].status, InvitationStatus::Pending);
    }

    #[tokio::test]
    async fn test_create_program_removed_when_taxonomy_store_fails() {
        let mut programs = MockProgramRepository::new();
        programs.expect_find().returning(|_| Ok(None));
        programs.expect_insert().times(1).returning(Ok);
        programs
            .expect_delete()
            .withf(|name| name == "TEST-CA")
            .times(1)
            .returning(|_| Ok(()));

        let mut tax = MockTaxonomyRepository::new();
        tax.expect_load().returning(|| Ok(taxonomy()));
        tax.expect_store()
            .times(1)
            .returning(|_| Err(AppError::internal("store failed", json!({}))));

        let result = service(programs, tax)
            .create_program(new_program("TEST-CA"))
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Internal { .. }));
    }

    #[tokio::test]
    async fn test_update_program_restored_when_taxonomy_store_fails() {
        let written = Arc::new(std::sync::Mutex::new(Vec::new()));

        let mut programs = MockProgramRepository::new();
        programs
            .expect_find()
            .returning(|name| Ok(Some(stored_program(name))));
        let log = written.clone();
        programs.expect_update().times(2).returning(move |p| {
            log.lock().unwrap().push(p.name.clone());
            Ok(p)
        });

        let mut tax = MockTaxonomyRepository::new();
        tax.expect_load().returning(|| Ok(taxonomy()));
        tax.expect_store()
            .times(1)
            .returning(|_| Err(AppError::internal("store failed", json!({}))));

        let update = UpdateProgram {
            name: Some("Renamed".to_string()),
            cancers: Some(vec!["Lung cancer".to_string()]),
            ..Default::default()
        };
        let result = service(programs, tax).update_program("TEST-CA", update).await;

        assert!(matches!(result.unwrap_err(), AppError::Internal { .. }));
        assert_eq!(*written.lock().unwrap(), vec!["Renamed", "Test program"]);
    }

    #[tokio::test]
    async fn test_remove_program_restores_taxonomy_when_delete_fails() {
        let mut tax_snapshot = taxonomy();
        let mut existing = stored_program("TEST-CA");
        relations::program_terms::<CancerKind>()
            .associate_all(&mut existing, tax_snapshot.cancers.iter_mut())
            .unwrap();
        let stored = Arc::new(std::sync::Mutex::new(Vec::new()));

        let mut programs = MockProgramRepository::new();
        programs
            .expect_find()
            .returning(move |_| Ok(Some(existing.clone())));
        programs
            .expect_delete()
            .times(1)
            .returning(|_| Err(AppError::internal("delete failed", json!({}))));

        let mut tax = MockTaxonomyRepository::new();
        tax.expect_load()
            .returning(move || Ok(tax_snapshot.clone()));
        let log = stored.clone();
        tax.expect_store().times(2).returning(move |t| {
            log.lock().unwrap().push(t.cancers.get(&1).unwrap().programs.len());
            Ok(())
        });

        let result = service(programs, tax).remove_program("TEST-CA").await;

        assert!(matches!(result.unwrap_err(), AppError::Internal { .. }));
        assert_eq!(*stored.lock().unwrap(), vec![0, 1]);
    }

    #[test]
    fn test_replace_links_diff() {
        let mut tax = taxonomy();
        let mut program = stored_program("TEST-CA");

        replace_links::<CancerKind>(&mut program, &mut tax, &[1, 2]).unwrap();
        replace_links::<CancerKind>(&mut program, &mut tax, &[2]).unwrap();

        let linked = relations::program_terms::<CancerKind>().children_of(&mut program);
        assert_eq!(linked, vec![2]);
        assert!(tax.cancers.get(&1).unwrap().programs.is_empty());
        assert_eq!(tax.cancers.get(&2).unwrap().programs.len(), 1);
    }
}
