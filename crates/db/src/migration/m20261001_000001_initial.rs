//! Initial schema: documents, late-submission requests and allowances.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        for statement in [DOCUMENTS_SQL, LATE_SUBMISSIONS_SQL, ALLOWANCES_SQL]
            .iter()
            .flat_map(|sql| sql.split(';'))
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            db.execute_unprepared(statement).await?;
        }
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared("DROP TABLE IF EXISTS allowances").await?;
        db.execute_unprepared("DROP TABLE IF EXISTS late_submission_requests")
            .await?;
        db.execute_unprepared("DROP TABLE IF EXISTS documents").await?;
        Ok(())
    }
}

const DOCUMENTS_SQL: &str = r"
-- Supporting documents, read-only input to allowance generation
CREATE TABLE documents (
    id UUID PRIMARY KEY,
    student_id UUID NOT NULL,
    category VARCHAR(40) NOT NULL,
    claimed_amount_centavos BIGINT,
    is_monthly BOOLEAN NOT NULL,
    period_month INTEGER,
    period_year INTEGER,
    school_year VARCHAR(9),
    semester VARCHAR(10),
    created_at TIMESTAMPTZ NOT NULL,
    CONSTRAINT chk_documents_amount CHECK (claimed_amount_centavos IS NULL OR claimed_amount_centavos >= 0),
    CONSTRAINT chk_documents_period CHECK (
        (is_monthly AND period_month BETWEEN 1 AND 12 AND period_year IS NOT NULL
            AND school_year IS NULL AND semester IS NULL)
        OR (NOT is_monthly AND period_month IS NULL AND period_year IS NULL
            AND school_year IS NOT NULL AND semester IN ('first', 'second', 'summer'))
    )
);

CREATE INDEX idx_documents_student_period ON documents(student_id, period_year, period_month);
";

const LATE_SUBMISSIONS_SQL: &str = r"
-- Late-submission exception requests
CREATE TABLE late_submission_requests (
    id UUID PRIMARY KEY,
    student_id UUID NOT NULL,
    period_month INTEGER NOT NULL,
    period_year INTEGER NOT NULL,
    reason TEXT NOT NULL,
    decision VARCHAR(10) NOT NULL DEFAULT 'pending',
    decided_by UUID,
    open_until TIMESTAMPTZ,
    decided_at TIMESTAMPTZ,
    created_at TIMESTAMPTZ NOT NULL,
    CONSTRAINT chk_lsr_month CHECK (period_month BETWEEN 1 AND 12),
    CONSTRAINT chk_lsr_decision CHECK (decision IN ('pending', 'approved', 'denied')),
    CONSTRAINT chk_lsr_decided CHECK (
        (decision = 'pending' AND decided_by IS NULL AND decided_at IS NULL AND open_until IS NULL)
        OR (decision = 'approved' AND decided_by IS NOT NULL AND decided_at IS NOT NULL AND open_until IS NOT NULL)
        OR (decision = 'denied' AND decided_by IS NOT NULL AND decided_at IS NOT NULL AND open_until IS NULL)
    )
);

-- At most one pending request per student and period
CREATE UNIQUE INDEX uq_lsr_pending ON late_submission_requests(student_id, period_year, period_month)
    WHERE decision = 'pending';

CREATE INDEX idx_lsr_student_period ON late_submission_requests(student_id, period_year, period_month);

CREATE INDEX idx_lsr_decision ON late_submission_requests(decision, created_at);
";

const ALLOWANCES_SQL: &str = r"
-- One allowance per student and period, arbitrated by the unique constraint
CREATE TABLE allowances (
    id UUID PRIMARY KEY,
    student_id UUID NOT NULL,
    period_month INTEGER NOT NULL,
    period_year INTEGER NOT NULL,
    semester VARCHAR(10) NOT NULL,
    year_level INTEGER NOT NULL,
    monthly_centavos BIGINT NOT NULL,
    book_centavos BIGINT NOT NULL,
    misc_centavos BIGINT NOT NULL,
    thesis_centavos BIGINT NOT NULL,
    total_centavos BIGINT NOT NULL,
    claimed BOOLEAN NOT NULL DEFAULT FALSE,
    claimed_at TIMESTAMPTZ,
    created_at TIMESTAMPTZ NOT NULL,
    CONSTRAINT uq_allowances_student_period UNIQUE (student_id, period_year, period_month),
    CONSTRAINT chk_allowances_month CHECK (period_month BETWEEN 1 AND 12),
    CONSTRAINT chk_allowances_semester CHECK (semester IN ('first', 'second', 'summer')),
    CONSTRAINT chk_allowances_year_level CHECK (year_level BETWEEN 1 AND 6),
    CONSTRAINT chk_allowances_non_negative CHECK (
        monthly_centavos >= 0 AND book_centavos >= 0 AND misc_centavos >= 0 AND thesis_centavos >= 0
    ),
    CONSTRAINT chk_allowances_book_cap CHECK (book_centavos <= 200000),
    CONSTRAINT chk_allowances_total CHECK (
        total_centavos = monthly_centavos + book_centavos + misc_centavos + thesis_centavos
    ),
    CONSTRAINT chk_allowances_claimed CHECK (
        (claimed AND claimed_at IS NOT NULL) OR (NOT claimed AND claimed_at IS NULL)
    )
);

CREATE INDEX idx_allowances_student ON allowances(student_id, period_year DESC, period_month DESC);
";
