//! Agency transitions: create, forward, resolve, isolate.

use std::collections::BTreeSet;

use uuid::Uuid;

use super::{Workflow, require_role, required_text, settle};
use crate::{
  Error, Result,
  actor::{ActorContext, ActorKind, RoleName},
  agency::{Agency, AgencyQuery, AgencyStatus, ForwardAgency, ResolveAgency},
  notification::{Notification, NotificationKind, compose},
  store::{AgencyCommit, InsertAgencyOutcome, WorkflowStore},
};

impl<S: WorkflowStore> Workflow<S> {
  // ── Transitions ─────────────────────────────────────────────────────────

  /// A user requests a power of attorney from a lawyer.
  pub async fn create_agency(
    &self,
    ctx: &ActorContext,
    lawyer_id: Uuid,
    cause: &str,
  ) -> Result<Agency> {
    require_role(ctx, RoleName::User)?;
    let cause = required_text("cause", cause)?;

    let user = self.load_actor(ActorKind::User, ctx.id).await?;
    let lawyer = self.load_actor(ActorKind::Lawyer, lawyer_id).await?;

    let agency = Agency::new(user.id, lawyer.id, cause);
    let notifications =
      compose(NotificationKind::AgencyRequested, &agency, &user, &[&lawyer]);

    let limit = self.config.daily_agency_limit;
    match self
      .store
      .insert_agency(agency, notifications, limit)
      .await
      .map_err(Error::internal)?
    {
      InsertAgencyOutcome::Inserted(agency) => {
        tracing::info!(
          agency_id = %agency.id,
          user_id = %agency.user_id,
          lawyer_id = %agency.lawyer_id,
          "agency requested"
        );
        Ok(agency)
      }
      InsertAgencyOutcome::RateLimited { count } => {
        tracing::debug!(user_id = %ctx.id, %lawyer_id, count, "daily agency limit reached");
        Err(Error::RateLimited { limit })
      }
    }
  }

  /// The target lawyer routes a pending agency to a representative.
  pub async fn forward_agency(
    &self,
    ctx: &ActorContext,
    agency_id: Uuid,
    input: ForwardAgency,
  ) -> Result<Agency> {
    require_role(ctx, RoleName::Lawyer)?;

    let current = self.load_agency(agency_id).await?;
    if current.lawyer_id != ctx.id {
      return Err(Error::AgencyNotFound(agency_id));
    }
    if current.status.is_resolved() {
      return Err(Error::AlreadyResolved(agency_id));
    }

    let lawyer = self.load_actor(ActorKind::Lawyer, ctx.id).await?;
    let representative = self
      .load_actor(ActorKind::Representative, input.representative_id)
      .await?;
    let authorizations = self.check_authorizations(&input.authorizations).await?;

    let mut agency = current.clone();
    agency.representative_id = Some(representative.id);
    agency.kind = Some(input.kind);
    agency.authorizations = authorizations;
    agency.exceptions = input
      .exceptions
      .map(|e| e.trim().to_owned())
      .filter(|e| !e.is_empty());
    agency.updated_at = crate::now();

    let notifications = compose(
      NotificationKind::AgencyForwarded,
      &agency,
      &lawyer,
      &[&representative],
    );

    let agency = self.commit(agency, current.version, notifications).await?;
    tracing::info!(
      agency_id = %agency.id,
      representative_id = %representative.id,
      kind = %input.kind,
      "agency forwarded"
    );
    Ok(agency)
  }

  /// The assigned representative approves or rejects a forwarded agency.
  pub async fn resolve_agency(
    &self,
    ctx: &ActorContext,
    agency_id: Uuid,
    input: ResolveAgency,
  ) -> Result<Agency> {
    require_role(ctx, RoleName::Representative)?;

    let current = self.load_agency(agency_id).await?;
    if current.representative_id != Some(ctx.id) {
      return Err(Error::AgencyNotFound(agency_id));
    }
    // A resolved agency means another representative call already won.
    if current.status.is_resolved() {
      return Err(Error::ConflictingState(agency_id));
    }

    let mut agency = current.clone();
    let kind = match input.status {
      AgencyStatus::Pending => {
        return Err(Error::Validation(
          "status must be approved or rejected".into(),
        ));
      }
      AgencyStatus::Approved => {
        let sequential = required_text(
          "sequential_number",
          input.sequential_number.as_deref().unwrap_or_default(),
        )?;
        let record = required_text(
          "record_number",
          input.record_number.as_deref().unwrap_or_default(),
        )?;
        let place = required_text(
          "place_of_issue",
          input.place_of_issue.as_deref().unwrap_or_default(),
        )?;
        agency.sequential_number = Some(sequential);
        agency.record_number = Some(record);
        agency.place_of_issue = Some(place);
        agency.status = AgencyStatus::Approved;
        agency.is_active = true;
        NotificationKind::AgencyApproved
      }
      AgencyStatus::Rejected => {
        agency.status = AgencyStatus::Rejected;
        agency.is_active = false;
        NotificationKind::AgencyRejected
      }
    };
    agency.updated_at = crate::now();

    let representative = self.load_actor(ActorKind::Representative, ctx.id).await?;
    let user = self.load_actor(ActorKind::User, agency.user_id).await?;
    let lawyer = self.load_actor(ActorKind::Lawyer, agency.lawyer_id).await?;
    let notifications = compose(kind, &agency, &representative, &[&user, &lawyer]);

    let agency = self.commit(agency, current.version, notifications).await?;
    tracing::info!(agency_id = %agency.id, status = %agency.status, "agency resolved");
    Ok(agency)
  }

  /// The owning user consumes an approved agency, deactivating it.
  pub async fn isolate_agency(
    &self,
    ctx: &ActorContext,
    agency_id: Uuid,
  ) -> Result<Agency> {
    require_role(ctx, RoleName::User)?;

    let current = self.load_agency(agency_id).await?;
    if current.user_id != ctx.id {
      return Err(Error::AgencyNotFound(agency_id));
    }
    if !current.is_in_force() {
      return Err(Error::AgencyNotActive(agency_id));
    }

    let mut agency = current.clone();
    agency.is_active = false;
    agency.updated_at = crate::now();

    let agency = self.commit(agency, current.version, Vec::new()).await?;
    tracing::info!(agency_id = %agency.id, "agency isolated");
    Ok(agency)
  }

  // ── Reads ───────────────────────────────────────────────────────────────

  /// Fetch an agency the caller takes part in. Staff see every agency.
  pub async fn agency(&self, ctx: &ActorContext, agency_id: Uuid) -> Result<Agency> {
    let agency = self.load_agency(agency_id).await?;
    if agency.involves(ctx.id) || ctx.role.is_some_and(RoleName::is_staff) {
      Ok(agency)
    } else {
      Err(Error::AgencyNotFound(agency_id))
    }
  }

  /// Agencies visible to the caller, scoped by the caller's role.
  pub async fn agencies(
    &self,
    ctx: &ActorContext,
    status: Option<AgencyStatus>,
  ) -> Result<Vec<Agency>> {
    let mut query = AgencyQuery { status, ..AgencyQuery::default() };
    match ctx.role {
      Some(RoleName::User) => query.user_id = Some(ctx.id),
      Some(RoleName::Lawyer) => query.lawyer_id = Some(ctx.id),
      Some(RoleName::Representative) => query.representative_id = Some(ctx.id),
      Some(RoleName::Employee | RoleName::Admin) => {}
      None => return Err(Error::Unauthorized { required: RoleName::User }),
    }
    self.store.list_agencies(&query).await.map_err(Error::internal)
  }

  /// Notifications addressed to the caller, newest first.
  pub async fn notifications(&self, ctx: &ActorContext) -> Result<Vec<Notification>> {
    self
      .store
      .notifications_for(ctx.actor_ref())
      .await
      .map_err(Error::internal)
  }

  // ── Helpers ─────────────────────────────────────────────────────────────

  pub(super) async fn load_agency(&self, id: Uuid) -> Result<Agency> {
    self
      .store
      .get_agency(id)
      .await
      .map_err(Error::internal)?
      .ok_or(Error::AgencyNotFound(id))
  }

  /// Deduplicate `ids` and make sure every one exists.
  async fn check_authorizations(&self, ids: &[Uuid]) -> Result<Vec<Uuid>> {
    let wanted: Vec<Uuid> = ids.iter().copied().collect::<BTreeSet<_>>().into_iter().collect();
    if wanted.is_empty() {
      return Ok(wanted);
    }

    let found: BTreeSet<Uuid> = self
      .store
      .get_authorizations(&wanted)
      .await
      .map_err(Error::internal)?
      .into_iter()
      .map(|a| a.id)
      .collect();

    match wanted.iter().find(|id| !found.contains(id)) {
      Some(missing) => Err(Error::AuthorizationNotFound(*missing)),
      None => Ok(wanted),
    }
  }

  async fn commit(
    &self,
    agency: Agency,
    expected_version: i64,
    notifications: Vec<Notification>,
  ) -> Result<Agency> {
    let id = agency.id;
    let sequential = agency.sequential_number.clone().unwrap_or_default();
    let record = agency.record_number.clone().unwrap_or_default();

    let outcome = self
      .store
      .commit_agency(AgencyCommit { agency, expected_version, notifications })
      .await
      .map_err(Error::internal)?;

    settle(outcome, id, |field| match field {
      "sequential_number" => sequential.clone(),
      _ => record.clone(),
    })
  }
}
