//! Initial database migration.
//!
//! Creates the per-user tables: categories, goals, investments, transactions
//! and baby-step progress. Users live in the external identity provider, so
//! `user_id` columns carry no foreign key.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: BUDGET & CASH FLOW
        // ============================================================
        db.execute_unprepared(USER_CATEGORIES_SQL).await?;
        db.execute_unprepared(USER_TRANSACTIONS_SQL).await?;

        // ============================================================
        // PART 2: GOALS & INVESTMENTS
        // ============================================================
        db.execute_unprepared(USER_GOALS_SQL).await?;
        db.execute_unprepared(USER_INVESTMENTS_SQL).await?;

        // ============================================================
        // PART 3: PROGRESS
        // ============================================================
        db.execute_unprepared(USER_PROGRESS_SQL).await?;

        // ============================================================
        // PART 4: TRIGGERS
        // ============================================================
        db.execute_unprepared(TRIGGERS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_SQL).await?;
        Ok(())
    }
}

const USER_CATEGORIES_SQL: &str = r"
CREATE TABLE user_categories (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    user_id UUID NOT NULL,
    name VARCHAR(255) NOT NULL,
    size NUMERIC(19, 4) NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_category_name_not_blank CHECK (length(trim(name)) > 0),
    CONSTRAINT chk_category_size_non_negative CHECK (size >= 0)
);

-- Names are unique per user regardless of case
CREATE UNIQUE INDEX idx_user_categories_user_lower_name ON user_categories(user_id, lower(name));
";

const USER_TRANSACTIONS_SQL: &str = r"
CREATE TABLE user_transactions (
    user_id UUID NOT NULL,
    timestamp TIMESTAMPTZ NOT NULL DEFAULT now(),
    category VARCHAR(255) NOT NULL,
    amount NUMERIC(19, 4) NOT NULL,
    PRIMARY KEY (user_id, timestamp),
    CONSTRAINT chk_transaction_amount_non_zero CHECK (amount <> 0)
);

CREATE INDEX idx_user_transactions_user_time ON user_transactions(user_id, timestamp DESC);
";

const USER_GOALS_SQL: &str = r"
CREATE TABLE user_goals (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    user_id UUID NOT NULL,
    name VARCHAR(255) NOT NULL,
    description TEXT,
    target_amount NUMERIC(19, 4) NOT NULL,
    current_amount NUMERIC(19, 4) NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_goal_target_positive CHECK (target_amount > 0),
    CONSTRAINT chk_goal_current_non_negative CHECK (current_amount >= 0)
);

CREATE INDEX idx_user_goals_user_created ON user_goals(user_id, created_at DESC);
";

const USER_INVESTMENTS_SQL: &str = r"
CREATE TABLE user_investments (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    user_id UUID NOT NULL,
    goal_id UUID NOT NULL UNIQUE REFERENCES user_goals(id) ON DELETE CASCADE,
    percentage_debt NUMERIC(5, 2) NOT NULL,
    percentage_equity NUMERIC(5, 2) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_debt_range CHECK (percentage_debt BETWEEN 0 AND 100),
    CONSTRAINT chk_equity_range CHECK (percentage_equity BETWEEN 0 AND 100),
    CONSTRAINT chk_split_sums_to_100 CHECK (abs(percentage_debt + percentage_equity - 100) <= 0.01)
);

CREATE INDEX idx_user_investments_user ON user_investments(user_id);
";

const USER_PROGRESS_SQL: &str = r"
CREATE TABLE user_progress (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    user_id UUID NOT NULL UNIQUE,
    current_step INTEGER NOT NULL DEFAULT 1,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_current_step_positive CHECK (current_step >= 1)
);
";

const TRIGGERS_SQL: &str = r"
-- ============================================================
-- FUNCTION: touch_updated_at
-- ============================================================
CREATE OR REPLACE FUNCTION touch_updated_at()
RETURNS TRIGGER AS $$
BEGIN
    NEW.updated_at = now();
    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_user_categories_updated_at
BEFORE UPDATE ON user_categories
FOR EACH ROW EXECUTE FUNCTION touch_updated_at();

CREATE TRIGGER trg_user_goals_updated_at
BEFORE UPDATE ON user_goals
FOR EACH ROW EXECUTE FUNCTION touch_updated_at();

CREATE TRIGGER trg_user_investments_updated_at
BEFORE UPDATE ON user_investments
FOR EACH ROW EXECUTE FUNCTION touch_updated_at();

CREATE TRIGGER trg_user_progress_updated_at
BEFORE UPDATE ON user_progress
FOR EACH ROW EXECUTE FUNCTION touch_updated_at();
";

const DROP_SQL: &str = r"
DROP TABLE IF EXISTS user_progress CASCADE;
DROP TABLE IF EXISTS user_investments CASCADE;
DROP TABLE IF EXISTS user_goals CASCADE;
DROP TABLE IF EXISTS user_transactions CASCADE;
DROP TABLE IF EXISTS user_categories CASCADE;
DROP FUNCTION IF EXISTS touch_updated_at();
";
