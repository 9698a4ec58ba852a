//! Late-submission request repository.
//!
//! Decisions are written with a conditional update guarded on the pending
//! state, so two concurrent decisions on the same request cannot both win.

use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, SqlErr,
};
use stipend_core::events::{AllowanceEvent, EventBus};
use stipend_core::late_submission::{
    CreateLateSubmissionInput, DecisionAction, LateSubmissionDecision, LateSubmissionError,
    LateSubmissionRequest, LateSubmissionService,
};
use stipend_core::period::{MonthPeriod, PeriodCalendar};
use stipend_shared::types::{LateSubmissionId, PageRequest, PageResponse, StudentId, UserId};
use tracing::{error, info, warn};

use super::document::{month_column, month_period};
use super::stored_instant;
use crate::entities::{late_submission_requests, sea_orm_active_enums};

/// Repository for late-submission requests.
#[derive(Debug, Clone)]
pub struct LateSubmissionRepository {
    db: DatabaseConnection,
    calendar: PeriodCalendar,
    events: EventBus,
}

impl LateSubmissionRepository {
    /// Creates a new repository with the default calendar and a private event bus.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            calendar: PeriodCalendar::default(),
            events: EventBus::default(),
        }
    }

    /// Uses `calendar` to resolve period boundaries.
    #[must_use]
    pub fn with_calendar(mut self, calendar: PeriodCalendar) -> Self {
        self.calendar = calendar;
        self
    }

    /// Publishes decisions on `events`.
    #[must_use]
    pub fn with_events(mut self, events: EventBus) -> Self {
        self.events = events;
        self
    }

    /// Files a new pending request.
    ///
    /// # Errors
    ///
    /// * `ReasonRequired` if the reason is blank
    /// * `PendingRequestExists` if the student already has a pending request for the period
    pub async fn create(
        &self,
        input: CreateLateSubmissionInput,
    ) -> Result<LateSubmissionRequest, LateSubmissionError> {
        self.create_at(input, Utc::now()).await
    }

    /// Files a new pending request stamped with `created_at`.
    ///
    /// # Errors
    ///
    /// See [`Self::create`].
    pub async fn create_at(
        &self,
        input: CreateLateSubmissionInput,
        created_at: DateTime<Utc>,
    ) -> Result<LateSubmissionRequest, LateSubmissionError> {
        LateSubmissionService::validate_new(&input)?;

        let id = LateSubmissionId::new();
        let model = late_submission_requests::ActiveModel {
            id: Set(id.into_inner()),
            student_id: Set(input.student_id.into_inner()),
            period_month: Set(month_column(input.period)),
            period_year: Set(input.period.year()),
            reason: Set(input.reason.trim().to_string()),
            decision: Set(sea_orm_active_enums::LateSubmissionDecision::Pending),
            decided_by: Set(None),
            open_until: Set(None),
            decided_at: Set(None),
            created_at: Set(created_at.into()),
        }
        .insert(&self.db)
        .await
        .map_err(|e| {
            if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
                warn!(
                    student_id = %input.student_id,
                    period = %input.period,
                    "pending late-submission request already exists"
                );
                LateSubmissionError::PendingRequestExists {
                    student_id: input.student_id.into_inner(),
                    period: input.period,
                }
            } else {
                error!(error = %e, "failed to create late-submission request");
                LateSubmissionError::Database(e.to_string())
            }
        })?;

        info!(
            request_id = %id,
            student_id = %input.student_id,
            period = %input.period,
            "late-submission request filed"
        );
        model_to_request(model).map_err(LateSubmissionError::Database)
    }

    /// Finds a request by ID.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if absent or `Database` on storage failure.
    pub async fn find(
        &self,
        id: LateSubmissionId,
    ) -> Result<LateSubmissionRequest, LateSubmissionError> {
        let model = late_submission_requests::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(|e| LateSubmissionError::Database(e.to_string()))?
            .ok_or(LateSubmissionError::NotFound(id.into_inner()))?;
        model_to_request(model).map_err(LateSubmissionError::Database)
    }

    /// Lists requests, newest first, optionally filtered by decision.
    ///
    /// # Errors
    ///
    /// Returns `Database` on storage failure.
    pub async fn list(
        &self,
        decision: Option<LateSubmissionDecision>,
        page: PageRequest,
    ) -> Result<PageResponse<LateSubmissionRequest>, LateSubmissionError> {
        let page = page.normalized();
        let mut query = late_submission_requests::Entity::find();
        if let Some(decision) = decision {
            query = query.filter(
                late_submission_requests::Column::Decision
                    .eq(sea_orm_active_enums::LateSubmissionDecision::from(decision)),
            );
        }

        let total = query
            .clone()
            .count(&self.db)
            .await
            .map_err(|e| LateSubmissionError::Database(e.to_string()))?;

        let data = query
            .order_by_desc(late_submission_requests::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await
            .map_err(|e| LateSubmissionError::Database(e.to_string()))?
            .into_iter()
            .map(model_to_request)
            .collect::<Result<Vec<_>, _>>()
            .map_err(LateSubmissionError::Database)?;

        Ok(PageResponse::new(data, page, total))
    }

    /// The latest `open_until` across approved requests for the student and period.
    ///
    /// # Errors
    ///
    /// Returns `Database` on storage failure.
    pub async fn latest_open_until(
        &self,
        student_id: StudentId,
        period: MonthPeriod,
    ) -> Result<Option<DateTime<Utc>>, LateSubmissionError> {
        latest_open_until(&self.db, student_id, period)
            .await
            .map_err(LateSubmissionError::Database)
    }

    /// Approves a pending request, extending the student's document window
    /// for its period to `open_until`.
    ///
    /// # Errors
    ///
    /// * `NotFound` if the request does not exist
    /// * `AlreadyDecided` if it is not pending, including when a concurrent
    ///   decision wins the race
    /// * `InvalidOpenUntil` if `open_until` is not after the period start
    pub async fn approve(
        &self,
        id: LateSubmissionId,
        open_until: DateTime<Utc>,
        decided_by: UserId,
    ) -> Result<LateSubmissionRequest, LateSubmissionError> {
        self.approve_at(id, open_until, decided_by, Utc::now()).await
    }

    /// [`Self::approve`] with an explicit decision time.
    ///
    /// # Errors
    ///
    /// See [`Self::approve`].
    pub async fn approve_at(
        &self,
        id: LateSubmissionId,
        open_until: DateTime<Utc>,
        decided_by: UserId,
        now: DateTime<Utc>,
    ) -> Result<LateSubmissionRequest, LateSubmissionError> {
        let (open_until, now) = (stored_instant(open_until), stored_instant(now));
        let request = self.find(id).await?;
        let action =
            LateSubmissionService::approve(&request, &self.calendar, open_until, decided_by, now)?;
        let decided = self.apply(request, &action).await?;

        info!(
            request_id = %decided.id,
            student_id = %decided.student_id,
            period = %decided.period,
            open_until = %open_until,
            decided_by = %decided_by,
            "late-submission request approved"
        );
        self.events.publish(AllowanceEvent::LateSubmissionApproved {
            request_id: decided.id,
            student_id: decided.student_id,
            period: decided.period,
            open_until,
            decided_by,
        });
        Ok(decided)
    }

    /// Denies a pending request.
    ///
    /// # Errors
    ///
    /// * `NotFound` if the request does not exist
    /// * `AlreadyDecided` if it is not pending
    pub async fn deny(
        &self,
        id: LateSubmissionId,
        decided_by: UserId,
    ) -> Result<LateSubmissionRequest, LateSubmissionError> {
        self.deny_at(id, decided_by, Utc::now()).await
    }

    /// [`Self::deny`] with an explicit decision time.
    ///
    /// # Errors
    ///
    /// See [`Self::deny`].
    pub async fn deny_at(
        &self,
        id: LateSubmissionId,
        decided_by: UserId,
        now: DateTime<Utc>,
    ) -> Result<LateSubmissionRequest, LateSubmissionError> {
        let now = stored_instant(now);
        let request = self.find(id).await?;
        let action = LateSubmissionService::deny(&request, decided_by, now)?;
        let decided = self.apply(request, &action).await?;

        info!(
            request_id = %decided.id,
            student_id = %decided.student_id,
            period = %decided.period,
            decided_by = %decided_by,
            "late-submission request denied"
        );
        self.events.publish(AllowanceEvent::LateSubmissionDenied {
            request_id: decided.id,
            student_id: decided.student_id,
            period: decided.period,
            decided_by,
        });
        Ok(decided)
    }

    /// Writes a validated decision if the request is still pending.
    async fn apply(
        &self,
        request: LateSubmissionRequest,
        action: &DecisionAction,
    ) -> Result<LateSubmissionRequest, LateSubmissionError> {
        let decision = sea_orm_active_enums::LateSubmissionDecision::from(action.new_decision());
        let decided_at: sea_orm::prelude::DateTimeWithTimeZone = action.decided_at().into();
        let open_until: Option<sea_orm::prelude::DateTimeWithTimeZone> =
            action.open_until().map(Into::into);

        let result = late_submission_requests::Entity::update_many()
            .col_expr(late_submission_requests::Column::Decision, Expr::value(decision))
            .col_expr(
                late_submission_requests::Column::DecidedBy,
                Expr::value(action.decided_by().into_inner()),
            )
            .col_expr(
                late_submission_requests::Column::DecidedAt,
                Expr::value(decided_at),
            )
            .col_expr(
                late_submission_requests::Column::OpenUntil,
                Expr::value(open_until),
            )
            .filter(late_submission_requests::Column::Id.eq(request.id.into_inner()))
            .filter(
                late_submission_requests::Column::Decision
                    .eq(sea_orm_active_enums::LateSubmissionDecision::Pending),
            )
            .exec(&self.db)
            .await
            .map_err(|e| {
                error!(error = %e, request_id = %request.id, "failed to record decision");
                LateSubmissionError::Database(e.to_string())
            })?;

        if result.rows_affected == 0 {
            let current = self.find(request.id).await?;
            warn!(
                request_id = %request.id,
                decision = %current.decision,
                "late-submission request decided concurrently"
            );
            return Err(LateSubmissionError::AlreadyDecided {
                id: request.id.into_inner(),
                decision: current.decision,
            });
        }

        Ok(action.apply(request))
    }
}

/// The latest `open_until` across approved requests for the student and period.
pub(crate) async fn latest_open_until<C: ConnectionTrait>(
    db: &C,
    student_id: StudentId,
    period: MonthPeriod,
) -> Result<Option<DateTime<Utc>>, String> {
    let approved = late_submission_requests::Entity::find()
        .filter(late_submission_requests::Column::StudentId.eq(student_id.into_inner()))
        .filter(late_submission_requests::Column::PeriodMonth.eq(month_column(period)))
        .filter(late_submission_requests::Column::PeriodYear.eq(period.year()))
        .filter(
            late_submission_requests::Column::Decision
                .eq(sea_orm_active_enums::LateSubmissionDecision::Approved),
        )
        .all(db)
        .await
        .map_err(|e| e.to_string())?;

    Ok(approved
        .into_iter()
        .filter_map(|m| m.open_until)
        .map(|t| t.with_timezone(&Utc))
        .max())
}

fn model_to_request(
    model: late_submission_requests::Model,
) -> Result<LateSubmissionRequest, String> {
    Ok(LateSubmissionRequest {
        id: LateSubmissionId::from_uuid(model.id),
        student_id: StudentId::from_uuid(model.student_id),
        period: month_period(model.period_month, model.period_year)?,
        reason: model.reason,
        decision: model.decision.into(),
        decided_by: model.decided_by.map(UserId::from_uuid),
        open_until: model.open_until.map(|t| t.with_timezone(&Utc)),
        decided_at: model.decided_at.map(|t| t.with_timezone(&Utc)),
        created_at: model.created_at.with_timezone(&Utc),
    })
}
