use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use super::models::{CreateLeaseRequest, Lease, LeaseFilter, LeaseRow, UpdateLeaseRequest};
use crate::api::Pagination;
use crate::error::{AppError, AppResult, ContractError, PaymentError};
use crate::ledger::models::{ContractStatus, ContractTotals, PaymentRecord, PaymentStatus};
use crate::ledger::{check_payment, reconcile, LedgerRow};

const LEASE_COLUMNS: &str = r#"
    l.id, l.plate_id, l.renter_id, l.start_date, l.end_date,
    l.total_amount, l.paid_amount, l.remaining_amount,
    l.frequency, l.status, l.payment_status, l.rental_type,
    l.create_by, l.create_time, l.update_time
"#;

const PAYMENT_COLUMNS: &str =
    "id, lease_id AS contract_id, amount, payment_date, note, create_by, create_time";

pub struct LeaseRepository {
    pool: PgPool,
}

impl LeaseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(
        &self,
        filter: &LeaseFilter,
        page: Pagination,
    ) -> AppResult<(Vec<LeaseRow>, i64)> {
        let leases = sqlx::query_as::<_, LeaseRow>(&format!(
            r#"
            SELECT {LEASE_COLUMNS}, p.plate_number, r.full_name AS renter_name
            FROM plate_leases l
            LEFT JOIN license_plates p ON l.plate_id = p.id
            LEFT JOIN renters r ON l.renter_id = r.id
            WHERE ($1::text IS NULL OR p.plate_number ILIKE '%' || $1 || '%')
              AND ($2::text IS NULL OR r.full_name ILIKE '%' || $2 || '%')
              AND ($3::contract_status IS NULL OR l.status = $3)
            ORDER BY l.create_time DESC
            OFFSET $4 LIMIT $5
            "#
        ))
        .bind(&filter.plate_number)
        .bind(&filter.renter_name)
        .bind(filter.status)
        .bind(page.skip)
        .bind(page.limit)
        .fetch_all(&self.pool)
        .await?;

        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM plate_leases l
            LEFT JOIN license_plates p ON l.plate_id = p.id
            LEFT JOIN renters r ON l.renter_id = r.id
            WHERE ($1::text IS NULL OR p.plate_number ILIKE '%' || $1 || '%')
              AND ($2::text IS NULL OR r.full_name ILIKE '%' || $2 || '%')
              AND ($3::contract_status IS NULL OR l.status = $3)
            "#,
        )
        .bind(&filter.plate_number)
        .bind(&filter.renter_name)
        .bind(filter.status)
        .fetch_one(&self.pool)
        .await?;

        Ok((leases, count))
    }

    pub async fn get(&self, id: Uuid) -> AppResult<LeaseRow> {
        sqlx::query_as::<_, LeaseRow>(&format!(
            r#"
            SELECT {LEASE_COLUMNS}, p.plate_number, r.full_name AS renter_name
            FROM plate_leases l
            LEFT JOIN license_plates p ON l.plate_id = p.id
            LEFT JOIN renters r ON l.renter_id = r.id
            WHERE l.id = $1
            "#
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Lease {}", id)))
    }

    /// Create a lease and flip its plate to rented, atomically.
    ///
    /// A plate can carry at most one active lease at a time.
    pub async fn create(&self, req: &CreateLeaseRequest) -> AppResult<LeaseRow> {
        let mut tx = self.pool.begin().await?;

        let plate_exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM license_plates WHERE id = $1)")
                .bind(req.plate_id)
                .fetch_one(&mut *tx)
                .await?;
        if !plate_exists {
            return Err(AppError::NotFound(format!("License plate {}", req.plate_id)));
        }

        let has_active: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM plate_leases WHERE plate_id = $1 AND status = 'active')",
        )
        .bind(req.plate_id)
        .fetch_one(&mut *tx)
        .await?;
        if has_active {
            return Err(ContractError::AssetInUse("Plate".to_string()).into());
        }

        let totals = ContractTotals::new(req.total_amount);
        let lease_id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO plate_leases (
                plate_id, renter_id, start_date, end_date,
                total_amount, paid_amount, remaining_amount,
                frequency, rental_type, create_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id
            "#,
        )
        .bind(req.plate_id)
        .bind(req.renter_id)
        .bind(req.start_date)
        .bind(req.end_date)
        .bind(totals.total_amount)
        .bind(totals.paid_amount)
        .bind(totals.remaining_amount)
        .bind(req.frequency)
        .bind(req.rental_type)
        .bind(&req.create_by)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE license_plates SET status = 'rented' WHERE id = $1")
            .bind(req.plate_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        info!("Created lease {} on plate {}", lease_id, req.plate_id);

        self.get(lease_id).await
    }

    /// Partial update. Editing the total recomputes the remaining
    /// balance; a lease leaving `active` releases its plate.
    pub async fn update(&self, id: Uuid, req: &UpdateLeaseRequest) -> AppResult<LeaseRow> {
        let mut tx = self.pool.begin().await?;

        let prev: Lease = sqlx::query_as::<_, Lease>(&format!(
            "SELECT {} FROM plate_leases l WHERE l.id = $1 FOR UPDATE",
            LEASE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Lease {}", id)))?;

        sqlx::query(
            r#"
            UPDATE plate_leases SET
                start_date = COALESCE($2, start_date),
                end_date = COALESCE($3, end_date),
                total_amount = COALESCE($4, total_amount),
                remaining_amount = GREATEST(COALESCE($4, total_amount) - paid_amount, 0),
                frequency = COALESCE($5, frequency),
                status = COALESCE($6, status),
                rental_type = COALESCE($7, rental_type),
                update_time = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(req.start_date)
        .bind(req.end_date)
        .bind(req.total_amount)
        .bind(req.frequency)
        .bind(req.status)
        .bind(req.rental_type)
        .execute(&mut *tx)
        .await?;

        let left_active = prev.status == ContractStatus::Active
            && matches!(req.status, Some(s) if s != ContractStatus::Active);
        if left_active {
            sqlx::query("UPDATE license_plates SET status = 'available' WHERE id = $1")
                .bind(prev.plate_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        self.get(id).await
    }

    /// Append a payment and apply it to the lease totals.
    ///
    /// The lease row is locked for the duration of the transaction, so
    /// concurrent payments serialize and the guard always runs against
    /// fresh totals. Fully paying the lease releases its plate.
    pub async fn pay(
        &self,
        id: Uuid,
        amount: Decimal,
        payment_date: NaiveDate,
        note: Option<&str>,
        recorded_by: Option<&str>,
    ) -> AppResult<LeaseRow> {
        let mut tx = self.pool.begin().await?;

        let lease: Lease = sqlx::query_as::<_, Lease>(&format!(
            "SELECT {} FROM plate_leases l WHERE l.id = $1 FOR UPDATE",
            LEASE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Lease {}", id)))?;

        if lease.payment_status == PaymentStatus::Cancel {
            return Err(PaymentError::ContractFrozen.into());
        }

        let totals = lease.totals();
        check_payment(amount, totals.remaining_amount)?;

        sqlx::query(
            r#"
            INSERT INTO plate_payments (lease_id, amount, payment_date, note, create_by)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(id)
        .bind(amount)
        .bind(payment_date)
        .bind(note)
        .bind(recorded_by)
        .execute(&mut *tx)
        .await?;

        let updated = totals.apply_payment(amount);
        sqlx::query(
            r#"
            UPDATE plate_leases
            SET paid_amount = $2, remaining_amount = $3, payment_status = $4, update_time = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(updated.paid_amount)
        .bind(updated.remaining_amount)
        .bind(updated.payment_status)
        .execute(&mut *tx)
        .await?;

        if updated.is_settled() {
            sqlx::query("UPDATE license_plates SET status = 'available' WHERE id = $1")
                .bind(lease.plate_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        info!("Recorded payment of {} against lease {}", amount, id);

        self.get(id).await
    }

    /// Payment history, newest first (display order).
    pub async fn payments(
        &self,
        id: Uuid,
        page: Pagination,
    ) -> AppResult<(Vec<PaymentRecord>, i64)> {
        let payments = sqlx::query_as::<_, PaymentRecord>(&format!(
            r#"
            SELECT {PAYMENT_COLUMNS}
            FROM plate_payments
            WHERE lease_id = $1
            ORDER BY payment_date DESC, create_time DESC
            OFFSET $2 LIMIT $3
            "#
        ))
        .bind(id)
        .bind(page.skip)
        .bind(page.limit)
        .fetch_all(&self.pool)
        .await?;

        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM plate_payments WHERE lease_id = $1")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;

        Ok((payments, count))
    }

    /// Reconciled running-balance ledger, oldest payment first.
    pub async fn ledger(&self, id: Uuid) -> AppResult<(Decimal, Vec<LedgerRow>)> {
        let lease = self.get(id).await?;

        let payments = sqlx::query_as::<_, PaymentRecord>(&format!(
            "SELECT {PAYMENT_COLUMNS} FROM plate_payments WHERE lease_id = $1"
        ))
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        let rows = reconcile(lease.lease.total_amount, &payments);
        Ok((lease.lease.total_amount, rows))
    }

    /// Freeze the lease: cancel its payment obligation and release the plate.
    pub async fn freeze(&self, id: Uuid) -> AppResult<LeaseRow> {
        let mut tx = self.pool.begin().await?;

        let plate_id: Uuid = sqlx::query_scalar(
            r#"
            UPDATE plate_leases
            SET payment_status = 'cancel', update_time = NOW()
            WHERE id = $1
            RETURNING plate_id
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Lease {}", id)))?;

        sqlx::query("UPDATE license_plates SET status = 'available' WHERE id = $1")
            .bind(plate_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        self.get(id).await
    }

    /// Delete the lease and its payments; the plate goes back to
    /// available if it was rented.
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        let plate_id: Uuid = sqlx::query_scalar("DELETE FROM plate_leases WHERE id = $1 RETURNING plate_id")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Lease {}", id)))?;

        sqlx::query("UPDATE license_plates SET status = 'available' WHERE id = $1 AND status = 'rented'")
            .bind(plate_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}
