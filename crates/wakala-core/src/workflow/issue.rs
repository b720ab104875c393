//! Issue sub-workflow: open, update status, finish, delete.

use uuid::Uuid;

use super::{Workflow, require_role, required_text, settle};
use crate::{
  Error, Result,
  actor::{ActorContext, RoleName},
  agency::AgencyStatus,
  issue::{FinishIssue, Issue, NewIssue},
  store::WorkflowStore,
};

impl<S: WorkflowStore> Workflow<S> {
  /// Open a case under an agency the lawyer holds and that is in force.
  pub async fn create_issue(
    &self,
    ctx: &ActorContext,
    agency_id: Uuid,
    input: NewIssue,
  ) -> Result<Issue> {
    require_role(ctx, RoleName::Lawyer)?;

    let agency = self.load_agency(agency_id).await?;
    if agency.lawyer_id != ctx.id {
      return Err(Error::AgencyNotFound(agency_id));
    }
    // Rejected, or pending and never activated: nothing to act under.
    if agency.status == AgencyStatus::Rejected
      || (!agency.is_active && agency.status == AgencyStatus::Pending)
    {
      return Err(Error::AgencyNotFound(agency_id));
    }
    if !agency.is_active {
      return Err(Error::AgencyExpired(agency_id));
    }

    if !input.estimated_cost.is_finite() || input.estimated_cost < 0.0 {
      return Err(Error::Validation(
        "estimated_cost must be a non-negative amount".into(),
      ));
    }

    let now = crate::now();
    let issue = Issue {
      id:             Uuid::new_v4(),
      agency_id,
      lawyer_id:      ctx.id,
      base_number:    required_text("base_number", &input.base_number)?,
      record_number:  required_text("record_number", &input.record_number)?,
      court_name:     required_text("court_name", &input.court_name)?,
      kind:           required_text("type", &input.kind)?,
      start_date:     input.start_date,
      end_date:       None,
      status:         input
        .status
        .map(|s| s.trim().to_owned())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "opened".to_owned()),
      estimated_cost: input.estimated_cost,
      is_active:      true,
      success_rate:   None,
      version:        0,
      created_at:     now,
      updated_at:     now,
    };

    let id = issue.id;
    let base = issue.base_number.clone();
    let record = issue.record_number.clone();
    let outcome = self
      .store
      .insert_issue(issue)
      .await
      .map_err(Error::internal)?;
    let issue = settle(outcome, id, |field| match field {
      "base_number" => base.clone(),
      _ => record.clone(),
    })?;

    tracing::info!(issue_id = %issue.id, %agency_id, "issue opened");
    Ok(issue)
  }

  /// Record progress on an active issue whose agency is still in force.
  pub async fn change_issue_status(
    &self,
    ctx: &ActorContext,
    issue_id: Uuid,
    status: &str,
  ) -> Result<Issue> {
    let current = self.owned_issue(ctx, issue_id).await?;
    if !current.is_active {
      return Err(Error::AlreadyFinished(issue_id));
    }
    self.require_agency_active(current.agency_id).await?;

    let mut issue = current.clone();
    issue.status = required_text("status", status)?;
    issue.updated_at = crate::now();

    let issue = self.write_issue(issue, current.version, true).await?;
    tracing::info!(issue_id = %issue.id, status = %issue.status, "issue status changed");
    Ok(issue)
  }

  /// Close an issue. Terminal: a finished issue accepts no further changes.
  pub async fn finish_issue(
    &self,
    ctx: &ActorContext,
    issue_id: Uuid,
    input: FinishIssue,
  ) -> Result<Issue> {
    let current = self.owned_issue(ctx, issue_id).await?;
    if !current.is_active {
      return Err(Error::AlreadyFinished(issue_id));
    }

    let (Some(end_date), Some(success_rate)) = (input.end_date, input.success_rate)
    else {
      return Err(Error::IncompleteFinishData);
    };
    if success_rate > 100 {
      return Err(Error::Validation(
        "success_rate must be between 0 and 100".into(),
      ));
    }
    if end_date <= current.start_date {
      return Err(Error::EndBeforeStart);
    }

    let mut issue = current.clone();
    issue.end_date = Some(end_date);
    issue.success_rate = Some(success_rate);
    issue.is_active = false;
    issue.updated_at = crate::now();

    let issue = self.write_issue(issue, current.version, false).await?;
    tracing::info!(issue_id = %issue.id, success_rate, "issue finished");
    Ok(issue)
  }

  /// Remove an issue while its agency is still in force.
  pub async fn delete_issue(&self, ctx: &ActorContext, issue_id: Uuid) -> Result<()> {
    let issue = self.owned_issue(ctx, issue_id).await?;
    self.require_agency_active(issue.agency_id).await?;

    let outcome = self
      .store
      .delete_issue(&issue)
      .await
      .map_err(Error::internal)?;
    settle(outcome, issue_id, |_| String::new())?;

    tracing::info!(%issue_id, "issue deleted");
    Ok(())
  }

  /// Fetch one of the caller's issues.
  pub async fn issue(&self, ctx: &ActorContext, issue_id: Uuid) -> Result<Issue> {
    self.owned_issue(ctx, issue_id).await
  }

  /// The caller's issues, optionally limited to one agency.
  pub async fn issues(
    &self,
    ctx: &ActorContext,
    agency_id: Option<Uuid>,
  ) -> Result<Vec<Issue>> {
    require_role(ctx, RoleName::Lawyer)?;
    self
      .store
      .list_issues(ctx.id, agency_id)
      .await
      .map_err(Error::internal)
  }

  // ── Helpers ─────────────────────────────────────────────────────────────

  async fn owned_issue(&self, ctx: &ActorContext, issue_id: Uuid) -> Result<Issue> {
    require_role(ctx, RoleName::Lawyer)?;
    self
      .store
      .get_issue(issue_id)
      .await
      .map_err(Error::internal)?
      .filter(|issue| issue.lawyer_id == ctx.id)
      .ok_or(Error::IssueNotFound(issue_id))
  }

  async fn require_agency_active(&self, agency_id: Uuid) -> Result<()> {
    let agency = self.load_agency(agency_id).await?;
    if agency.is_active {
      Ok(())
    } else {
      Err(Error::AgencyExpired(agency_id))
    }
  }

  async fn write_issue(
    &self,
    issue: Issue,
    expected_version: i64,
    agency_in_force: bool,
  ) -> Result<Issue> {
    let id = issue.id;
    let outcome = self
      .store
      .update_issue(issue, expected_version, agency_in_force)
      .await
      .map_err(Error::internal)?;
    settle(outcome, id, |_| String::new())
  }
}
