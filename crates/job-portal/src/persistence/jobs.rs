use chrono::{DateTime, Utc};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

use super::{RepositoryError, SqliteStore};
use crate::jobs::{JobFilter, JobListing, JobRepository, JobStatus, NewJob, Page};

const LISTING_COLUMNS: &str = "j.id, j.employer_id, j.job_title, j.description, j.location, j.job_type, \
     j.min_salary, j.max_salary, j.posted_date, j.expiry_date, j.applicant_count, j.status, j.job_category";

fn row_to_listing(row: &Row<'_>) -> rusqlite::Result<JobListing> {
    let raw_status: String = row.get(11)?;
    let status = JobStatus::parse(&raw_status).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            11,
            rusqlite::types::Type::Text,
            format!("unknown job status '{raw_status}'").into(),
        )
    })?;
    Ok(JobListing {
        id: row.get(0)?,
        employer_id: row.get(1)?,
        job_title: row.get(2)?,
        description: row.get(3)?,
        location: row.get(4)?,
        job_type: row.get(5)?,
        min_salary: row.get(6)?,
        max_salary: row.get(7)?,
        posted_date: row.get(8)?,
        expiry_date: row.get(9)?,
        applicant_count: row.get(10)?,
        status,
        job_category: row.get(12)?,
        requirements: Vec::new(),
    })
}

fn requirements(conn: &Connection, job_listing_id: i64) -> rusqlite::Result<Vec<String>> {
    let mut stmt =
        conn.prepare("SELECT name FROM requirement WHERE job_listing_id = ?1 ORDER BY id")?;
    let names = stmt
        .query_map(params![job_listing_id], |row| row.get(0))?
        .collect::<Result<Vec<String>, _>>()?;
    Ok(names)
}

fn insert_requirements(
    conn: &Connection,
    job_listing_id: i64,
    names: &[String],
) -> rusqlite::Result<()> {
    let mut stmt = conn.prepare("INSERT INTO requirement (job_listing_id, name) VALUES (?1, ?2)")?;
    for name in names {
        stmt.execute(params![job_listing_id, name])?;
    }
    Ok(())
}

/// Runs a listing query and attaches each row's requirement set.
fn query_listings(
    conn: &Connection,
    sql: &str,
    values: Vec<Value>,
) -> Result<Vec<JobListing>, RepositoryError> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params_from_iter(values.iter()), row_to_listing)?
        .collect::<Result<Vec<_>, _>>()?;

    let mut listings = Vec::with_capacity(rows.len());
    for mut listing in rows {
        listing.requirements = requirements(conn, listing.id)?;
        listings.push(listing);
    }
    Ok(listings)
}

fn fetch_job_with(conn: &Connection, id: i64) -> Result<Option<JobListing>, RepositoryError> {
    let listing = conn
        .query_row(
            &format!("SELECT {LISTING_COLUMNS} FROM job_listings j WHERE j.id = ?1"),
            params![id],
            row_to_listing,
        )
        .optional()?;
    match listing {
        Some(mut listing) => {
            listing.requirements = requirements(conn, listing.id)?;
            Ok(Some(listing))
        }
        None => Ok(None),
    }
}

impl JobRepository for SqliteStore {
    fn insert_job(
        &self,
        job: &NewJob,
        posted_date: DateTime<Utc>,
    ) -> Result<JobListing, RepositoryError> {
        let mut conn = self.connection()?;
        let tx = conn.transaction()?;

        tx.execute(
            "INSERT INTO job_listings (employer_id, job_title, description, location, job_type,
                 min_salary, max_salary, posted_date, expiry_date, applicant_count, status, job_category)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, 0, ?10, ?11)",
            params![
                job.employer_id,
                job.job_title,
                job.description,
                job.location,
                job.job_type,
                job.min_salary,
                job.max_salary,
                posted_date,
                job.expiry_date,
                job.status.label(),
                job.job_category
            ],
        )?;
        let id = tx.last_insert_rowid();
        insert_requirements(&tx, id, &job.requirements)?;
        tx.commit()?;

        Ok(JobListing {
            id,
            employer_id: job.employer_id,
            job_title: job.job_title.clone(),
            description: job.description.clone(),
            location: job.location.clone(),
            job_type: job.job_type.clone(),
            min_salary: job.min_salary,
            max_salary: job.max_salary,
            posted_date,
            expiry_date: job.expiry_date,
            applicant_count: 0,
            status: job.status,
            job_category: job.job_category.clone(),
            requirements: job.requirements.clone(),
        })
    }

    fn fetch_job(&self, id: i64) -> Result<Option<JobListing>, RepositoryError> {
        let conn = self.connection()?;
        fetch_job_with(&conn, id)
    }

    fn list_jobs(&self, page: Page) -> Result<Vec<JobListing>, RepositoryError> {
        let conn = self.connection()?;
        query_listings(
            &conn,
            &format!(
                "SELECT {LISTING_COLUMNS} FROM job_listings j
                 ORDER BY j.posted_date DESC, j.id DESC
                 LIMIT ?1 OFFSET ?2"
            ),
            vec![
                Value::Integer(i64::from(page.limit)),
                Value::Integer(i64::from(page.offset)),
            ],
        )
    }

    fn jobs_by_employer(&self, employer_id: i64) -> Result<Vec<JobListing>, RepositoryError> {
        let conn = self.connection()?;
        query_listings(
            &conn,
            &format!(
                "SELECT {LISTING_COLUMNS} FROM job_listings j
                 WHERE j.employer_id = ?1
                 ORDER BY j.posted_date DESC, j.id DESC"
            ),
            vec![Value::Integer(employer_id)],
        )
    }

    fn update_job(&self, id: i64, job: &NewJob) -> Result<JobListing, RepositoryError> {
        let mut conn = self.connection()?;
        let tx = conn.transaction()?;

        let changed = tx.execute(
            "UPDATE job_listings
             SET employer_id = ?1, job_title = ?2, description = ?3, location = ?4, job_type = ?5,
                 min_salary = ?6, max_salary = ?7, expiry_date = ?8, status = ?9, job_category = ?10
             WHERE id = ?11",
            params![
                job.employer_id,
                job.job_title,
                job.description,
                job.location,
                job.job_type,
                job.min_salary,
                job.max_salary,
                job.expiry_date,
                job.status.label(),
                job.job_category,
                id
            ],
        )?;
        if changed == 0 {
            return Err(RepositoryError::NotFound);
        }

        tx.execute(
            "DELETE FROM requirement WHERE job_listing_id = ?1",
            params![id],
        )?;
        insert_requirements(&tx, id, &job.requirements)?;
        let listing = fetch_job_with(&tx, id)?.ok_or(RepositoryError::NotFound)?;
        tx.commit()?;

        Ok(listing)
    }

    fn delete_job(&self, id: i64) -> Result<(), RepositoryError> {
        let conn = self.connection()?;
        let changed = conn.execute("DELETE FROM job_listings WHERE id = ?1", params![id])?;
        if changed == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    fn filter_jobs(&self, filter: &JobFilter) -> Result<Vec<JobListing>, RepositoryError> {
        let mut clauses: Vec<String> = Vec::new();
        let mut values: Vec<Value> = Vec::new();

        // Both sides go through SQLite's LOWER so folding is identical.
        if let Some(location) = &filter.location {
            values.push(Value::Text(contains_pattern(location)));
            clauses.push(format!(
                "LOWER(j.location) LIKE LOWER(?{}) ESCAPE '\\'",
                values.len()
            ));
        }
        if let Some(job_type) = &filter.job_type {
            values.push(Value::Text(contains_pattern(job_type)));
            clauses.push(format!(
                "LOWER(j.job_type) LIKE LOWER(?{}) ESCAPE '\\'",
                values.len()
            ));
        }
        if let Some(min_salary) = filter.min_salary.filter(|value| *value > 0.0) {
            values.push(Value::Real(min_salary));
            clauses.push(format!("j.min_salary >= ?{}", values.len()));
        }
        if let Some(max_salary) = filter.max_salary.filter(|value| *value > 0.0) {
            values.push(Value::Real(max_salary));
            clauses.push(format!("j.max_salary <= ?{}", values.len()));
        }
        for skill in &filter.skills {
            values.push(Value::Text(skill.clone()));
            clauses.push(format!(
                "EXISTS (SELECT 1 FROM requirement r WHERE r.job_listing_id = j.id AND LOWER(r.name) = LOWER(?{}))",
                values.len()
            ));
        }

        let where_clause = if clauses.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", clauses.join(" AND "))
        };

        let conn = self.connection()?;
        query_listings(
            &conn,
            &format!(
                "SELECT {LISTING_COLUMNS} FROM job_listings j {where_clause}
                 ORDER BY j.posted_date DESC, j.id DESC"
            ),
            values,
        )
    }
}

/// `%text%` with LIKE wildcards in `text` escaped by a backslash.
fn contains_pattern(text: &str) -> String {
    let mut pattern = String::with_capacity(text.len() + 2);
    pattern.push('%');
    for ch in text.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}
