use sqlx::PgPool;
use uuid::Uuid;

use super::models::{Car, CarFilter, CreateCarRequest, UpdateCarRequest};
use crate::api::Pagination;
use crate::error::{AppError, AppResult, ContractError};
use crate::ledger::models::AssetStatus;

const CAR_COLUMNS: &str = r#"
    id, car_id, model, wav, marker, color, year, vin_number, plate_number, state,
    registration_expires_at, insurance_expires_at, price,
    installation_fee_for_safety_equipment, insurance_expenses, service_expenses,
    maintenance_costs, full_coverage_auto_insurance, other_expenses,
    status, notes, create_by, create_time, update_time
"#;

pub struct CarRepository {
    pool: PgPool,
}

impl CarRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, filter: &CarFilter, page: Pagination) -> AppResult<(Vec<Car>, i64)> {
        let cars = sqlx::query_as::<_, Car>(&format!(
            r#"
            SELECT {CAR_COLUMNS}
            FROM cars
            WHERE ($1::text IS NULL OR model ILIKE '%' || $1 || '%')
              AND ($2::text IS NULL OR plate_number ILIKE '%' || $2 || '%')
              AND ($3::asset_status IS NULL OR status = $3)
            ORDER BY create_time DESC
            OFFSET $4 LIMIT $5
            "#
        ))
        .bind(&filter.model)
        .bind(&filter.plate_number)
        .bind(filter.status)
        .bind(page.skip)
        .bind(page.limit)
        .fetch_all(&self.pool)
        .await?;

        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM cars
            WHERE ($1::text IS NULL OR model ILIKE '%' || $1 || '%')
              AND ($2::text IS NULL OR plate_number ILIKE '%' || $2 || '%')
              AND ($3::asset_status IS NULL OR status = $3)
            "#,
        )
        .bind(&filter.model)
        .bind(&filter.plate_number)
        .bind(filter.status)
        .fetch_one(&self.pool)
        .await?;

        Ok((cars, count))
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Car> {
        sqlx::query_as::<_, Car>(&format!("SELECT {CAR_COLUMNS} FROM cars WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Car {}", id)))
    }

    pub async fn create(&self, req: &CreateCarRequest) -> AppResult<Car> {
        if let Some(plate) = &req.plate_number {
            self.ensure_plate_unique(plate, None).await?;
        }

        let car = sqlx::query_as::<_, Car>(&format!(
            r#"
            INSERT INTO cars (
                model, wav, marker, color, year, vin_number, plate_number, state,
                registration_expires_at, insurance_expires_at, price,
                installation_fee_for_safety_equipment, insurance_expenses,
                service_expenses, maintenance_costs, full_coverage_auto_insurance,
                other_expenses, status, notes, car_id
            )
            VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15,
                $16, $17, $18, $19,
                (SELECT COALESCE(MAX(car_id), 0) + 1 FROM cars)
            )
            RETURNING {CAR_COLUMNS}
            "#
        ))
        .bind(&req.model)
        .bind(req.wav)
        .bind(&req.marker)
        .bind(&req.color)
        .bind(req.year)
        .bind(&req.vin_number)
        .bind(&req.plate_number)
        .bind(&req.state)
        .bind(req.registration_expires_at)
        .bind(req.insurance_expires_at)
        .bind(req.price)
        .bind(req.installation_fee_for_safety_equipment)
        .bind(req.insurance_expenses)
        .bind(req.service_expenses)
        .bind(req.maintenance_costs)
        .bind(req.full_coverage_auto_insurance)
        .bind(req.other_expenses)
        .bind(req.status.unwrap_or(AssetStatus::Available))
        .bind(&req.notes)
        .fetch_one(&self.pool)
        .await?;

        Ok(car)
    }

    pub async fn update(&self, id: Uuid, req: &UpdateCarRequest) -> AppResult<Car> {
        if let Some(plate) = &req.plate_number {
            self.ensure_plate_unique(plate, Some(id)).await?;
        }

        sqlx::query_as::<_, Car>(&format!(
            r#"
            UPDATE cars SET
                model = COALESCE($2, model),
                wav = COALESCE($3, wav),
                marker = COALESCE($4, marker),
                color = COALESCE($5, color),
                year = COALESCE($6, year),
                vin_number = COALESCE($7, vin_number),
                plate_number = COALESCE($8, plate_number),
                state = COALESCE($9, state),
                registration_expires_at = COALESCE($10, registration_expires_at),
                insurance_expires_at = COALESCE($11, insurance_expires_at),
                price = COALESCE($12, price),
                installation_fee_for_safety_equipment = COALESCE($13, installation_fee_for_safety_equipment),
                insurance_expenses = COALESCE($14, insurance_expenses),
                service_expenses = COALESCE($15, service_expenses),
                maintenance_costs = COALESCE($16, maintenance_costs),
                full_coverage_auto_insurance = COALESCE($17, full_coverage_auto_insurance),
                other_expenses = COALESCE($18, other_expenses),
                status = COALESCE($19, status),
                notes = COALESCE($20, notes),
                update_time = NOW()
            WHERE id = $1
            RETURNING {CAR_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&req.model)
        .bind(req.wav)
        .bind(&req.marker)
        .bind(&req.color)
        .bind(req.year)
        .bind(&req.vin_number)
        .bind(&req.plate_number)
        .bind(&req.state)
        .bind(req.registration_expires_at)
        .bind(req.insurance_expires_at)
        .bind(req.price)
        .bind(req.installation_fee_for_safety_equipment)
        .bind(req.insurance_expenses)
        .bind(req.service_expenses)
        .bind(req.maintenance_costs)
        .bind(req.full_coverage_auto_insurance)
        .bind(req.other_expenses)
        .bind(req.status)
        .bind(&req.notes)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Car {}", id)))
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM cars WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Car {}", id)));
        }
        Ok(())
    }

    async fn ensure_plate_unique(&self, plate: &str, exclude: Option<Uuid>) -> AppResult<()> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM cars
                WHERE plate_number = $1 AND ($2::uuid IS NULL OR id <> $2)
            )
            "#,
        )
        .bind(plate)
        .bind(exclude)
        .fetch_one(&self.pool)
        .await?;

        if exists {
            return Err(ContractError::DuplicatePlateNumber(plate.to_string()).into());
        }
        Ok(())
    }
}
