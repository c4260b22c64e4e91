use sqlx::PgPool;
use uuid::Uuid;

use super::models::{CreateRenterRequest, Renter, RenterFilter, UpdateRenterRequest};
use crate::api::Pagination;
use crate::error::{AppError, AppResult};

const RENTER_COLUMNS: &str =
    "id, full_name, phone, email, driver_license_number, driver_license_state, address";

const SEARCH_CLAUSE: &str = r#"
    ($1::text IS NULL
     OR full_name ILIKE '%' || $1 || '%'
     OR email ILIKE '%' || $1 || '%'
     OR phone ILIKE '%' || $1 || '%'
     OR driver_license_number ILIKE '%' || $1 || '%')
"#;

pub struct RenterRepository {
    pool: PgPool,
}

impl RenterRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(
        &self,
        filter: &RenterFilter,
        page: Pagination,
    ) -> AppResult<(Vec<Renter>, i64)> {
        let renters = sqlx::query_as::<_, Renter>(&format!(
            r#"
            SELECT {RENTER_COLUMNS}
            FROM renters
            WHERE {SEARCH_CLAUSE}
            ORDER BY full_name
            OFFSET $2 LIMIT $3
            "#
        ))
        .bind(&filter.search)
        .bind(page.skip)
        .bind(page.limit)
        .fetch_all(&self.pool)
        .await?;

        let count: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM renters WHERE {SEARCH_CLAUSE}"
        ))
        .bind(&filter.search)
        .fetch_one(&self.pool)
        .await?;

        Ok((renters, count))
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Renter> {
        sqlx::query_as::<_, Renter>(&format!(
            "SELECT {RENTER_COLUMNS} FROM renters WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Renter {}", id)))
    }

    pub async fn create(&self, req: &CreateRenterRequest) -> AppResult<Renter> {
        let renter = sqlx::query_as::<_, Renter>(&format!(
            r#"
            INSERT INTO renters (full_name, phone, email, driver_license_number, driver_license_state, address)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {RENTER_COLUMNS}
            "#
        ))
        .bind(&req.full_name)
        .bind(&req.phone)
        .bind(&req.email)
        .bind(&req.driver_license_number)
        .bind(&req.driver_license_state)
        .bind(&req.address)
        .fetch_one(&self.pool)
        .await?;

        Ok(renter)
    }

    pub async fn update(&self, id: Uuid, req: &UpdateRenterRequest) -> AppResult<Renter> {
        sqlx::query_as::<_, Renter>(&format!(
            r#"
            UPDATE renters SET
                full_name = COALESCE($2, full_name),
                phone = COALESCE($3, phone),
                email = COALESCE($4, email),
                driver_license_number = COALESCE($5, driver_license_number),
                driver_license_state = COALESCE($6, driver_license_state),
                address = COALESCE($7, address)
            WHERE id = $1
            RETURNING {RENTER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&req.full_name)
        .bind(&req.phone)
        .bind(&req.email)
        .bind(&req.driver_license_number)
        .bind(&req.driver_license_state)
        .bind(&req.address)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Renter {}", id)))
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM renters WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Renter {}", id)));
        }
        Ok(())
    }
}
