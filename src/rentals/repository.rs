use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use super::models::{CreateRentalRequest, Rental, RentalFilter, RentalRow, UpdateRentalRequest};
use crate::api::Pagination;
use crate::error::{AppError, AppResult, ContractError, PaymentError};
use crate::ledger::models::{ContractStatus, ContractTotals, PaymentRecord, PaymentStatus};
use crate::ledger::{check_payment, reconcile, LedgerRow};

const RENTAL_COLUMNS: &str = r#"
    cr.id, cr.car_id, cr.renter_id, cr.start_date, cr.end_date,
    cr.total_amount, cr.paid_amount, cr.remaining_amount,
    cr.frequency, cr.status, cr.payment_status, cr.rental_type,
    cr.create_by, cr.create_time, cr.update_time
"#;

const PAYMENT_COLUMNS: &str =
    "id, rental_id AS contract_id, amount, payment_date, note, create_by, create_time";

pub struct RentalRepository {
    pool: PgPool,
}

impl RentalRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(
        &self,
        filter: &RentalFilter,
        page: Pagination,
    ) -> AppResult<(Vec<RentalRow>, i64)> {
        let rentals = sqlx::query_as::<_, RentalRow>(&format!(
            r#"
            SELECT {RENTAL_COLUMNS}, c.model AS car_model, c.car_id AS car_short_id,
                   r.full_name AS renter_name
            FROM car_rentals cr
            LEFT JOIN cars c ON cr.car_id = c.id
            LEFT JOIN renters r ON cr.renter_id = r.id
            WHERE ($1::text IS NULL OR c.model ILIKE '%' || $1 || '%')
              AND ($2::text IS NULL OR r.full_name ILIKE '%' || $2 || '%')
              AND ($3::contract_status IS NULL OR cr.status = $3)
            ORDER BY cr.create_time DESC
            OFFSET $4 LIMIT $5
            "#
        ))
        .bind(&filter.car_model)
        .bind(&filter.renter_name)
        .bind(filter.status)
        .bind(page.skip)
        .bind(page.limit)
        .fetch_all(&self.pool)
        .await?;

        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM car_rentals cr
            LEFT JOIN cars c ON cr.car_id = c.id
            LEFT JOIN renters r ON cr.renter_id = r.id
            WHERE ($1::text IS NULL OR c.model ILIKE '%' || $1 || '%')
              AND ($2::text IS NULL OR r.full_name ILIKE '%' || $2 || '%')
              AND ($3::contract_status IS NULL OR cr.status = $3)
            "#,
        )
        .bind(&filter.car_model)
        .bind(&filter.renter_name)
        .bind(filter.status)
        .fetch_one(&self.pool)
        .await?;

        Ok((rentals, count))
    }

    pub async fn get(&self, id: Uuid) -> AppResult<RentalRow> {
        sqlx::query_as::<_, RentalRow>(&format!(
            r#"
            SELECT {RENTAL_COLUMNS}, c.model AS car_model, c.car_id AS car_short_id,
                   r.full_name AS renter_name
            FROM car_rentals cr
            LEFT JOIN cars c ON cr.car_id = c.id
            LEFT JOIN renters r ON cr.renter_id = r.id
            WHERE cr.id = $1
            "#
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Rental {}", id)))
    }

    /// Create a rental and flip its car to rented, atomically.
    ///
    /// A car can carry at most one active rental at a time.
    pub async fn create(&self, req: &CreateRentalRequest) -> AppResult<RentalRow> {
        let mut tx = self.pool.begin().await?;

        let car_exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM cars WHERE id = $1)")
                .bind(req.car_id)
                .fetch_one(&mut *tx)
                .await?;
        if !car_exists {
            return Err(AppError::NotFound(format!("Car {}", req.car_id)));
        }

        let has_active: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM car_rentals WHERE car_id = $1 AND status = 'active')",
        )
        .bind(req.car_id)
        .fetch_one(&mut *tx)
        .await?;
        if has_active {
            return Err(ContractError::AssetInUse("Car".to_string()).into());
        }

        let totals = ContractTotals::new(req.total_amount);
        let rental_id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO car_rentals (
                car_id, renter_id, start_date, end_date,
                total_amount, paid_amount, remaining_amount,
                frequency, rental_type, create_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id
            "#,
        )
        .bind(req.car_id)
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

        sqlx::query("UPDATE cars SET status = 'rented', update_time = NOW() WHERE id = $1")
            .bind(req.car_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        info!("Created rental {} on car {}", rental_id, req.car_id);

        self.get(rental_id).await
    }

    /// Partial update. Editing the total recomputes the remaining
    /// balance; a rental leaving `active` releases its car.
    pub async fn update(&self, id: Uuid, req: &UpdateRentalRequest) -> AppResult<RentalRow> {
        let mut tx = self.pool.begin().await?;

        let prev: Rental = sqlx::query_as::<_, Rental>(&format!(
            "SELECT {} FROM car_rentals cr WHERE cr.id = $1 FOR UPDATE",
            RENTAL_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Rental {}", id)))?;

        sqlx::query(
            r#"
            UPDATE car_rentals SET
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
            sqlx::query("UPDATE cars SET status = 'available', update_time = NOW() WHERE id = $1")
                .bind(prev.car_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        self.get(id).await
    }

    /// Append a payment and apply it to the rental totals.
    ///
    /// The rental row is locked for the duration of the transaction, so
    /// concurrent payments serialize and the guard always runs against
    /// fresh totals. Fully paying the rental releases its car.
    pub async fn pay(
        &self,
        id: Uuid,
        amount: Decimal,
        payment_date: NaiveDate,
        note: Option<&str>,
        recorded_by: Option<&str>,
    ) -> AppResult<RentalRow> {
        let mut tx = self.pool.begin().await?;

        let rental: Rental = sqlx::query_as::<_, Rental>(&format!(
            "SELECT {} FROM car_rentals cr WHERE cr.id = $1 FOR UPDATE",
            RENTAL_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Rental {}", id)))?;

        if rental.payment_status == PaymentStatus::Cancel {
            return Err(PaymentError::ContractFrozen.into());
        }

        let totals = rental.totals();
        check_payment(amount, totals.remaining_amount)?;

        sqlx::query(
            r#"
            INSERT INTO rental_payments (rental_id, amount, payment_date, note, create_by)
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
            UPDATE car_rentals
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
            sqlx::query("UPDATE cars SET status = 'available', update_time = NOW() WHERE id = $1")
                .bind(rental.car_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        info!("Recorded payment of {} against rental {}", amount, id);

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
            FROM rental_payments
            WHERE rental_id = $1
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
            sqlx::query_scalar("SELECT COUNT(*) FROM rental_payments WHERE rental_id = $1")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;

        Ok((payments, count))
    }

    /// Reconciled running-balance ledger, oldest payment first.
    pub async fn ledger(&self, id: Uuid) -> AppResult<(Decimal, Vec<LedgerRow>)> {
        let rental = self.get(id).await?;

        let payments = sqlx::query_as::<_, PaymentRecord>(&format!(
            "SELECT {PAYMENT_COLUMNS} FROM rental_payments WHERE rental_id = $1"
        ))
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        let rows = reconcile(rental.rental.total_amount, &payments);
        Ok((rental.rental.total_amount, rows))
    }

    /// Freeze the rental: cancel its payment obligation and release the car.
    pub async fn freeze(&self, id: Uuid) -> AppResult<RentalRow> {
        let mut tx = self.pool.begin().await?;

        let car_id: Uuid = sqlx::query_scalar(
            r#"
            UPDATE car_rentals
            SET payment_status = 'cancel', update_time = NOW()
            WHERE id = $1
            RETURNING car_id
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Rental {}", id)))?;

        sqlx::query("UPDATE cars SET status = 'available', update_time = NOW() WHERE id = $1")
            .bind(car_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        self.get(id).await
    }

    /// Delete the rental and its payments; the car goes back to
    /// available if it was rented.
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        let car_id: Uuid =
            sqlx::query_scalar("DELETE FROM car_rentals WHERE id = $1 RETURNING car_id")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Rental {}", id)))?;

        sqlx::query(
            "UPDATE cars SET status = 'available', update_time = NOW() WHERE id = $1 AND status = 'rented'",
        )
        .bind(car_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }
}
