//! Allowance repository: generation, preview and claim.
//!
//! Generation relies on the `(student_id, period_year, period_month)` unique
//! constraint rather than a prior existence check, so two concurrent
//! generations for the same key cannot both insert. Claims use a
//! conditional update on `claimed = false`.

use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, SqlErr,
};
use stipend_core::allowance::{
    Allowance, AllowanceError, AllowancePeriod, AllowancePreview, AllowanceService, ClaimService,
    GenerateAllowanceInput,
};
use stipend_core::events::{AllowanceEvent, EventBus};
use stipend_core::period::PeriodCalendar;
use stipend_shared::types::{AllowanceId, PageRequest, PageResponse, StudentId};
use tracing::{error, info, warn};

use super::document::{month_column, month_period, monthly_documents};
use super::late_submission::latest_open_until;
use super::stored_instant;
use crate::entities::{allowances, sea_orm_active_enums};
use crate::money::{from_centavos, to_centavos};

/// Repository for allowances.
#[derive(Debug, Clone)]
pub struct AllowanceRepository {
    db: DatabaseConnection,
    calendar: PeriodCalendar,
    events: EventBus,
}

impl AllowanceRepository {
    /// Creates a new repository with the default calendar and a private event bus.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            calendar: PeriodCalendar::default(),
            events: EventBus::default(),
        }
    }

    /// Uses `calendar` for "today" and period cutoffs.
    #[must_use]
    pub fn with_calendar(mut self, calendar: PeriodCalendar) -> Self {
        self.calendar = calendar;
        self
    }

    /// Publishes generations and claims on `events`.
    #[must_use]
    pub fn with_events(mut self, events: EventBus) -> Self {
        self.events = events;
        self
    }

    /// Generates the allowance for the currently eligible period.
    ///
    /// # Errors
    ///
    /// * `Validation` for malformed input
    /// * `NotGenerableYet` if the period is not the one eligible now
    /// * `AlreadyGenerated` if an allowance exists for the student and period
    pub async fn generate(&self, input: GenerateAllowanceInput) -> Result<Allowance, AllowanceError> {
        self.generate_at(input, Utc::now()).await
    }

    /// [`Self::generate`] evaluated at `now`.
    ///
    /// # Errors
    ///
    /// See [`Self::generate`].
    pub async fn generate_at(
        &self,
        input: GenerateAllowanceInput,
        now: DateTime<Utc>,
    ) -> Result<Allowance, AllowanceError> {
        let period = input.validate()?;
        AllowanceService::ensure_generable(&self.calendar, period.period, now)?;

        let documents = monthly_documents(&self.db, input.student_id, period.period)
            .await
            .map_err(AllowanceError::Database)?;
        let open_until = latest_open_until(&self.db, input.student_id, period.period)
            .await
            .map_err(AllowanceError::Database)?;
        let breakdown =
            AllowanceService::compute(&input, &period, &self.calendar, &documents, open_until)?;

        let id = AllowanceId::new();
        let model = allowances::ActiveModel {
            id: Set(id.into_inner()),
            student_id: Set(input.student_id.into_inner()),
            period_month: Set(month_column(period.period)),
            period_year: Set(period.period.year()),
            semester: Set(period.semester.into()),
            year_level: Set(i32::from(period.year_level)),
            monthly_centavos: Set(centavos(breakdown.monthly)?),
            book_centavos: Set(centavos(breakdown.book)?),
            misc_centavos: Set(centavos(breakdown.misc)?),
            thesis_centavos: Set(centavos(breakdown.thesis)?),
            total_centavos: Set(centavos(breakdown.total)?),
            claimed: Set(false),
            claimed_at: Set(None),
            created_at: Set(now.into()),
        }
        .insert(&self.db)
        .await
        .map_err(|e| {
            if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
                warn!(
                    student_id = %input.student_id,
                    period = %period.period,
                    "allowance already generated"
                );
                AllowanceError::AlreadyGenerated {
                    student_id: input.student_id.into_inner(),
                    period: period.period,
                }
            } else {
                error!(error = %e, student_id = %input.student_id, "failed to insert allowance");
                AllowanceError::Database(e.to_string())
            }
        })?;

        let allowance = model_to_allowance(model).map_err(AllowanceError::Database)?;
        info!(
            allowance_id = %allowance.id,
            student_id = %allowance.student_id,
            period = %period.period,
            total = %allowance.total,
            counted_documents = breakdown.counted_documents.len(),
            excluded_documents = breakdown.excluded_documents.len(),
            book_capped = breakdown.book_capped,
            "allowance generated"
        );
        self.events.publish(AllowanceEvent::AllowanceGenerated {
            allowance_id: allowance.id,
            student_id: allowance.student_id,
            period: period.period,
            total: allowance.total,
        });
        Ok(allowance)
    }

    /// Computes what [`Self::generate`] would persist, without persisting
    /// anything or enforcing the generation gate.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for malformed input or `Database` on storage failure.
    pub async fn preview(
        &self,
        input: GenerateAllowanceInput,
    ) -> Result<AllowancePreview, AllowanceError> {
        self.preview_at(input, Utc::now()).await
    }

    /// [`Self::preview`] evaluated at `now`.
    ///
    /// # Errors
    ///
    /// See [`Self::preview`].
    pub async fn preview_at(
        &self,
        input: GenerateAllowanceInput,
        now: DateTime<Utc>,
    ) -> Result<AllowancePreview, AllowanceError> {
        let period = input.validate()?;
        let documents = monthly_documents(&self.db, input.student_id, period.period)
            .await
            .map_err(AllowanceError::Database)?;
        let open_until = latest_open_until(&self.db, input.student_id, period.period)
            .await
            .map_err(AllowanceError::Database)?;
        AllowanceService::preview(&input, &self.calendar, &documents, open_until, now)
    }

    /// Claims an allowance.
    ///
    /// # Errors
    ///
    /// * `NotFound` if the allowance does not exist
    /// * `AlreadyClaimed` if it is claimed, including when a concurrent claim wins
    /// * `ConfirmationMismatch` unless `confirmation` is exactly `"confirm"`
    pub async fn claim(
        &self,
        id: AllowanceId,
        confirmation: &str,
    ) -> Result<Allowance, AllowanceError> {
        self.claim_at(id, confirmation, Utc::now()).await
    }

    /// [`Self::claim`] stamped with `now`.
    ///
    /// # Errors
    ///
    /// See [`Self::claim`].
    pub async fn claim_at(
        &self,
        id: AllowanceId,
        confirmation: &str,
        now: DateTime<Utc>,
    ) -> Result<Allowance, AllowanceError> {
        let now = stored_instant(now);
        let allowance = self.find(id).await?;
        ClaimService::check(&allowance, confirmation)?;

        let claimed_at: sea_orm::prelude::DateTimeWithTimeZone = now.into();
        let result = allowances::Entity::update_many()
            .col_expr(allowances::Column::Claimed, Expr::value(true))
            .col_expr(allowances::Column::ClaimedAt, Expr::value(Some(claimed_at)))
            .filter(allowances::Column::Id.eq(id.into_inner()))
            .filter(allowances::Column::Claimed.eq(false))
            .exec(&self.db)
            .await
            .map_err(|e| {
                error!(error = %e, allowance_id = %id, "failed to claim allowance");
                AllowanceError::Database(e.to_string())
            })?;

        if result.rows_affected == 0 {
            warn!(allowance_id = %id, "allowance claimed concurrently");
            return Err(AllowanceError::AlreadyClaimed(id.into_inner()));
        }

        info!(
            allowance_id = %id,
            student_id = %allowance.student_id,
            total = %allowance.total,
            "allowance claimed"
        );
        self.events.publish(AllowanceEvent::AllowanceClaimed {
            allowance_id: id,
            student_id: allowance.student_id,
            claimed_at: now,
        });

        Ok(Allowance {
            claimed: true,
            claimed_at: Some(now),
            ..allowance
        })
    }

    /// Finds an allowance by ID.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if absent or `Database` on storage failure.
    pub async fn find(&self, id: AllowanceId) -> Result<Allowance, AllowanceError> {
        let model = allowances::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(|e| AllowanceError::Database(e.to_string()))?
            .ok_or(AllowanceError::NotFound(id.into_inner()))?;
        model_to_allowance(model).map_err(AllowanceError::Database)
    }

    /// Lists a student's allowances, newest period first.
    ///
    /// # Errors
    ///
    /// Returns `Database` on storage failure.
    pub async fn list_for_student(
        &self,
        student_id: StudentId,
        page: PageRequest,
    ) -> Result<PageResponse<Allowance>, AllowanceError> {
        let page = page.normalized();
        let query =
            allowances::Entity::find().filter(allowances::Column::StudentId.eq(student_id.into_inner()));

        let total = query
            .clone()
            .count(&self.db)
            .await
            .map_err(|e| AllowanceError::Database(e.to_string()))?;

        let data = query
            .order_by_desc(allowances::Column::PeriodYear)
            .order_by_desc(allowances::Column::PeriodMonth)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await
            .map_err(|e| AllowanceError::Database(e.to_string()))?
            .into_iter()
            .map(model_to_allowance)
            .collect::<Result<Vec<_>, _>>()
            .map_err(AllowanceError::Database)?;

        Ok(PageResponse::new(data, page, total))
    }
}

fn centavos(amount: rust_decimal::Decimal) -> Result<i64, AllowanceError> {
    to_centavos(amount).map_err(AllowanceError::Validation)
}

fn model_to_allowance(model: allowances::Model) -> Result<Allowance, String> {
    let year_level = u8::try_from(model.year_level)
        .map_err(|_| format!("invalid stored year level {}", model.year_level))?;
    let semester: sea_orm_active_enums::Semester = model.semester;

    Ok(Allowance {
        id: AllowanceId::from_uuid(model.id),
        student_id: StudentId::from_uuid(model.student_id),
        period: AllowancePeriod {
            period: month_period(model.period_month, model.period_year)?,
            semester: semester.into(),
            year_level,
        },
        monthly: from_centavos(model.monthly_centavos),
        book: from_centavos(model.book_centavos),
        misc: from_centavos(model.misc_centavos),
        thesis: from_centavos(model.thesis_centavos),
        total: from_centavos(model.total_centavos),
        claimed: model.claimed,
        claimed_at: model.claimed_at.map(|t| t.with_timezone(&Utc)),
        created_at: model.created_at.with_timezone(&Utc),
    })
}
