//! Initial database migration.
//!
//! Creates the enums, tables, triggers, and indexes for the petty-cash
//! float service.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: CORE TABLES
        // ============================================================
        db.execute_unprepared(USERS_SQL).await?;
        db.execute_unprepared(TRANSACTIONS_SQL).await?;
        db.execute_unprepared(REPLENISHMENT_REQUESTS_SQL).await?;
        db.execute_unprepared(SETTINGS_SQL).await?;

        // ============================================================
        // PART 3: TRIGGERS & FUNCTIONS
        // ============================================================
        db.execute_unprepared(TRIGGERS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
-- User roles
CREATE TYPE user_role AS ENUM (
    'custodian',
    'accountant',
    'admin'
);

-- Approval lifecycle shared by transactions and replenishment requests
CREATE TYPE approval_status AS ENUM (
    'pending',
    'approved',
    'rejected'
);

-- Payment methods
CREATE TYPE payment_method AS ENUM (
    'cash',
    'check',
    'card'
);
";

const USERS_SQL: &str = r"
CREATE TABLE users (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    email VARCHAR(255) UNIQUE,
    first_name VARCHAR(255),
    last_name VARCHAR(255),
    profile_image_url VARCHAR(1024),
    role user_role NOT NULL DEFAULT 'custodian',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_users_email ON users(email) WHERE email IS NOT NULL;
";

const TRANSACTIONS_SQL: &str = r"
CREATE TABLE transactions (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    date TIMESTAMPTZ NOT NULL,
    description TEXT NOT NULL,
    amount NUMERIC(10, 2) NOT NULL,
    received_by VARCHAR(255) NOT NULL,
    payment_method payment_method NOT NULL,
    receipt_url VARCHAR(1024),
    receipt_file_name VARCHAR(255),
    status approval_status NOT NULL DEFAULT 'pending',
    submitted_by UUID NOT NULL REFERENCES users(id),
    approved_by UUID REFERENCES users(id),
    approved_at TIMESTAMPTZ,
    comments TEXT,
    running_balance NUMERIC(10, 2),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT chk_amount_nonzero CHECK (amount <> 0),
    -- A running balance exists exactly when the transaction is approved.
    CONSTRAINT chk_balance_on_approval CHECK (
        (status = 'approved') = (running_balance IS NOT NULL)
    )
);

CREATE INDEX idx_transactions_created ON transactions(created_at DESC);
CREATE INDEX idx_transactions_status ON transactions(status, created_at DESC);
CREATE INDEX idx_transactions_submitter ON transactions(submitted_by, created_at DESC);
CREATE INDEX idx_transactions_approved ON transactions(approved_at DESC)
    WHERE status = 'approved';
";

const REPLENISHMENT_REQUESTS_SQL: &str = r"
CREATE TABLE replenishment_requests (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    requested_amount NUMERIC(10, 2) NOT NULL,
    reason TEXT NOT NULL,
    status approval_status NOT NULL DEFAULT 'pending',
    requested_by UUID NOT NULL REFERENCES users(id),
    approved_by UUID REFERENCES users(id),
    approved_at TIMESTAMPTZ,
    comments TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT chk_requested_amount_positive CHECK (requested_amount > 0)
);

CREATE INDEX idx_replenishments_created ON replenishment_requests(created_at DESC);
CREATE INDEX idx_replenishments_status ON replenishment_requests(status, created_at DESC);
";

const SETTINGS_SQL: &str = r"
CREATE TABLE settings (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    key VARCHAR(255) NOT NULL UNIQUE,
    value TEXT NOT NULL,
    updated_by UUID NOT NULL REFERENCES users(id),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const TRIGGERS_SQL: &str = r"
-- Keep updated_at current on every row update
CREATE OR REPLACE FUNCTION set_updated_at()
RETURNS TRIGGER AS $$
BEGIN
    NEW.updated_at = now();
    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_users_updated_at
    BEFORE UPDATE ON users
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();

CREATE TRIGGER trg_transactions_updated_at
    BEFORE UPDATE ON transactions
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();

CREATE TRIGGER trg_replenishments_updated_at
    BEFORE UPDATE ON replenishment_requests
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS settings CASCADE;
DROP TABLE IF EXISTS replenishment_requests CASCADE;
DROP TABLE IF EXISTS transactions CASCADE;
DROP TABLE IF EXISTS users CASCADE;

DROP FUNCTION IF EXISTS set_updated_at CASCADE;

DROP TYPE IF EXISTS payment_method;
DROP TYPE IF EXISTS approval_status;
DROP TYPE IF EXISTS user_role;
";
