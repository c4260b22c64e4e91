use sqlx::PgPool;
use uuid::Uuid;

use super::models::{CreatePlateRequest, LicensePlate, PlateFilter, UpdatePlateRequest};
use crate::api::Pagination;
use crate::error::{AppError, AppResult, ContractError};
use crate::ledger::models::AssetStatus;

const PLATE_COLUMNS: &str =
    "id, plate_number, plate_state, purchase_date, purchase_amount, status, notes";

pub struct PlateRepository {
    pool: PgPool,
}

impl PlateRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(
        &self,
        filter: &PlateFilter,
        page: Pagination,
    ) -> AppResult<(Vec<LicensePlate>, i64)> {
        let plates = sqlx::query_as::<_, LicensePlate>(&format!(
            r#"
            SELECT {PLATE_COLUMNS}
            FROM license_plates
            WHERE ($1::text IS NULL OR plate_number ILIKE '%' || $1 || '%')
              AND ($2::asset_status IS NULL OR status = $2)
            ORDER BY plate_number
            OFFSET $3 LIMIT $4
            "#
        ))
        .bind(&filter.plate_number)
        .bind(filter.status)
        .bind(page.skip)
        .bind(page.limit)
        .fetch_all(&self.pool)
        .await?;

        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM license_plates
            WHERE ($1::text IS NULL OR plate_number ILIKE '%' || $1 || '%')
              AND ($2::asset_status IS NULL OR status = $2)
            "#,
        )
        .bind(&filter.plate_number)
        .bind(filter.status)
        .fetch_one(&self.pool)
        .await?;

        Ok((plates, count))
    }

    pub async fn get(&self, id: Uuid) -> AppResult<LicensePlate> {
        sqlx::query_as::<_, LicensePlate>(&format!(
            "SELECT {PLATE_COLUMNS} FROM license_plates WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("License plate {}", id)))
    }

    pub async fn create(&self, req: &CreatePlateRequest) -> AppResult<LicensePlate> {
        let plate = sqlx::query_as::<_, LicensePlate>(&format!(
            r#"
            INSERT INTO license_plates (plate_number, plate_state, purchase_date, purchase_amount, status, notes)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {PLATE_COLUMNS}
            "#
        ))
        .bind(&req.plate_number)
        .bind(&req.plate_state)
        .bind(req.purchase_date)
        .bind(req.purchase_amount)
        .bind(req.status.unwrap_or(AssetStatus::Available))
        .bind(&req.notes)
        .fetch_one(&self.pool)
        .await?;

        Ok(plate)
    }

    /// Update a plate; status changes are blocked while any lease on it
    /// is still unpaid.
    pub async fn update(&self, id: Uuid, req: &UpdatePlateRequest) -> AppResult<LicensePlate> {
        if req.status.is_some() {
            let current = self.get(id).await?;
            if req.status != Some(current.status) && self.has_unpaid_leases(id).await? {
                return Err(ContractError::UnpaidObligations("Plate".to_string()).into());
            }
        }

        sqlx::query_as::<_, LicensePlate>(&format!(
            r#"
            UPDATE license_plates SET
                plate_number = COALESCE($2, plate_number),
                plate_state = COALESCE($3, plate_state),
                purchase_date = COALESCE($4, purchase_date),
                purchase_amount = COALESCE($5, purchase_amount),
                status = COALESCE($6, status),
                notes = COALESCE($7, notes)
            WHERE id = $1
            RETURNING {PLATE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&req.plate_number)
        .bind(&req.plate_state)
        .bind(req.purchase_date)
        .bind(req.purchase_amount)
        .bind(req.status)
        .bind(&req.notes)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("License plate {}", id)))
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        if self.has_unpaid_leases(id).await? {
            return Err(ContractError::UnpaidObligations("Plate".to_string()).into());
        }

        let result = sqlx::query("DELETE FROM license_plates WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("License plate {}", id)));
        }
        Ok(())
    }

    async fn has_unpaid_leases(&self, plate_id: Uuid) -> AppResult<bool> {
        let unpaid: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM plate_leases
                WHERE plate_id = $1 AND payment_status = 'unpaid'
            )
            "#,
        )
        .bind(plate_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(unpaid)
    }
}
