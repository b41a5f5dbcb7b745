use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{RepositoryError, SqliteStore};
use crate::accounts::domain::{Education, Experience};
use crate::hiring::{
    ApplicantView, Application, ApplicationScope, ApplicationStatus, ApplicationSubmission,
    ApplicationSummary, Decision, HiringRepository, Interview, InterviewRequest, InterviewStatus,
    InterviewUpdate, SeekerInterview,
};

const APPLICATION_COLUMNS: &str =
    "a.id, a.job_seeker_id, a.job_listing_id, a.application_status, a.applied_date, a.cover_letter";

const INTERVIEW_COLUMNS: &str =
    "i.id, i.application_id, i.scheduled_date, i.interview_mode, i.status, i.interviewer_name, i.interview_link";

fn decode_status<T>(
    column: usize,
    raw: String,
    parse: impl Fn(&str) -> Option<T>,
) -> rusqlite::Result<T> {
    parse(&raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            column,
            rusqlite::types::Type::Text,
            format!("unknown status '{raw}'").into(),
        )
    })
}

fn row_to_application(row: &Row<'_>) -> rusqlite::Result<Application> {
    Ok(Application {
        id: row.get(0)?,
        job_seeker_id: row.get(1)?,
        job_listing_id: row.get(2)?,
        status: decode_status(3, row.get(3)?, ApplicationStatus::parse)?,
        applied_date: row.get(4)?,
        cover_letter: row.get(5)?,
    })
}

fn row_to_interview(row: &Row<'_>) -> rusqlite::Result<Interview> {
    Ok(Interview {
        id: row.get(0)?,
        application_id: row.get(1)?,
        scheduled_date: row.get(2)?,
        interview_mode: row.get(3)?,
        status: decode_status(4, row.get(4)?, InterviewStatus::parse)?,
        interviewer_name: row.get(5)?,
        interview_link: row.get(6)?,
    })
}

fn fetch_application_with(
    conn: &Connection,
    id: i64,
) -> Result<Option<Application>, RepositoryError> {
    let application = conn
        .query_row(
            &format!("SELECT {APPLICATION_COLUMNS} FROM applications a WHERE a.id = ?1"),
            params![id],
            row_to_application,
        )
        .optional()?;
    Ok(application)
}

fn fetch_interview_with(conn: &Connection, id: i64) -> Result<Interview, RepositoryError> {
    let interview = conn.query_row(
        &format!("SELECT {INTERVIEW_COLUMNS} FROM interviews i WHERE i.id = ?1"),
        params![id],
        row_to_interview,
    )?;
    Ok(interview)
}

pub(super) fn seeker_skills(conn: &Connection, job_seeker_id: i64) -> rusqlite::Result<Vec<String>> {
    let mut stmt =
        conn.prepare("SELECT skill_name FROM job_seeker_skills WHERE job_seeker_id = ?1 ORDER BY id")?;
    let skills = stmt
        .query_map(params![job_seeker_id], |row| row.get(0))?
        .collect::<Result<Vec<String>, _>>()?;
    Ok(skills)
}

pub(super) fn seeker_education(
    conn: &Connection,
    job_seeker_id: i64,
) -> rusqlite::Result<Vec<Education>> {
    let mut stmt = conn.prepare(
        "SELECT education_level, institution_name, field_of_study, start_year, end_year, grade
         FROM education WHERE job_seeker_id = ?1 ORDER BY id",
    )?;
    let education = stmt
        .query_map(params![job_seeker_id], |row| {
            Ok(Education {
                education_level: row.get(0)?,
                institution_name: row.get(1)?,
                field_of_study: row.get(2)?,
                start_year: row.get(3)?,
                end_year: row.get(4)?,
                grade: row.get(5)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(education)
}

pub(super) fn seeker_experience(
    conn: &Connection,
    job_seeker_id: i64,
) -> rusqlite::Result<Vec<Experience>> {
    let mut stmt = conn.prepare(
        "SELECT job_title, company_name, location, start_date, end_date
         FROM experience WHERE job_seeker_id = ?1 ORDER BY id",
    )?;
    let experience = stmt
        .query_map(params![job_seeker_id], |row| {
            Ok(Experience {
                job_title: row.get(0)?,
                company_name: row.get(1)?,
                location: row.get(2)?,
                start_date: row.get(3)?,
                end_date: row.get(4)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(experience)
}

impl HiringRepository for SqliteStore {
    fn insert_application(
        &self,
        submission: &ApplicationSubmission,
        applied_date: DateTime<Utc>,
    ) -> Result<Application, RepositoryError> {
        let mut conn = self.connection()?;
        let tx = conn.transaction()?;

        let listing_exists = tx
            .query_row(
                "SELECT 1 FROM job_listings WHERE id = ?1",
                params![submission.job_listing_id],
                |_| Ok(()),
            )
            .optional()?
            .is_some();
        if !listing_exists {
            return Err(RepositoryError::NotFound);
        }

        let duplicate = tx
            .query_row(
                "SELECT 1 FROM applications WHERE job_seeker_id = ?1 AND job_listing_id = ?2",
                params![submission.job_seeker_id, submission.job_listing_id],
                |_| Ok(()),
            )
            .optional()?
            .is_some();
        if duplicate {
            return Err(RepositoryError::Conflict);
        }

        tx.execute(
            "INSERT INTO applications (job_seeker_id, job_listing_id, application_status, applied_date, cover_letter)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                submission.job_seeker_id,
                submission.job_listing_id,
                ApplicationStatus::Applied.label(),
                applied_date,
                submission.cover_letter
            ],
        )?;
        let id = tx.last_insert_rowid();

        tx.execute(
            "UPDATE job_listings SET applicant_count = applicant_count + 1 WHERE id = ?1",
            params![submission.job_listing_id],
        )?;
        tx.commit()?;

        Ok(Application {
            id,
            job_seeker_id: submission.job_seeker_id,
            job_listing_id: submission.job_listing_id,
            status: ApplicationStatus::Applied,
            applied_date,
            cover_letter: submission.cover_letter.clone(),
        })
    }

    fn fetch_application(&self, id: i64) -> Result<Option<Application>, RepositoryError> {
        let conn = self.connection()?;
        fetch_application_with(&conn, id)
    }

    fn record_decision(
        &self,
        id: i64,
        decision: Decision,
    ) -> Result<Application, RepositoryError> {
        let mut conn = self.connection()?;
        let tx = conn.transaction()?;

        let changed = tx.execute(
            "UPDATE applications SET application_status = ?1 WHERE id = ?2 AND application_status = ?3",
            params![decision.label(), id, ApplicationStatus::Applied.label()],
        )?;
        if changed == 0 {
            return match fetch_application_with(&tx, id)? {
                Some(_) => Err(RepositoryError::Conflict),
                None => Err(RepositoryError::NotFound),
            };
        }

        tx.execute(
            "DELETE FROM interviews WHERE application_id = ?1",
            params![id],
        )?;
        let application = fetch_application_with(&tx, id)?.ok_or(RepositoryError::NotFound)?;
        tx.commit()?;

        Ok(application)
    }

    fn seeker_applications(
        &self,
        job_seeker_id: i64,
        scope: ApplicationScope,
    ) -> Result<Vec<ApplicationSummary>, RepositoryError> {
        let filter = match scope {
            ApplicationScope::All => "",
            ApplicationScope::Pending => "AND a.application_status = 'Applied'",
            ApplicationScope::Decided => "AND a.application_status <> 'Applied'",
        };
        let conn = self.connection()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {APPLICATION_COLUMNS}, j.job_title, j.location, j.min_salary, j.max_salary, c.company_name
             FROM applications a
             JOIN job_listings j ON a.job_listing_id = j.id
             JOIN employers e ON j.employer_id = e.id
             JOIN company c ON e.company_id = c.id
             WHERE a.job_seeker_id = ?1 {filter}
             ORDER BY a.applied_date DESC, a.id DESC"
        ))?;
        let summaries = stmt
            .query_map(params![job_seeker_id], |row| {
                Ok(ApplicationSummary {
                    application: row_to_application(row)?,
                    job_title: row.get(6)?,
                    location: row.get(7)?,
                    min_salary: row.get(8)?,
                    max_salary: row.get(9)?,
                    company_name: row.get(10)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(summaries)
    }

    fn job_applications(
        &self,
        job_listing_id: i64,
    ) -> Result<Vec<ApplicantView>, RepositoryError> {
        let conn = self.connection()?;
        let mut stmt = conn.prepare(
            "SELECT a.id, js.id, a.application_status, js.first_name, js.last_name, js.email,
                    js.phone_number, js.resume, a.applied_date, a.cover_letter
             FROM applications a
             JOIN job_seekers js ON a.job_seeker_id = js.id
             WHERE a.job_listing_id = ?1
             ORDER BY a.applied_date, a.id",
        )?;
        let rows = stmt
            .query_map(params![job_listing_id], |row| {
                Ok(ApplicantView {
                    application_id: row.get(0)?,
                    job_seeker_id: row.get(1)?,
                    application_status: decode_status(2, row.get(2)?, ApplicationStatus::parse)?,
                    first_name: row.get(3)?,
                    last_name: row.get(4)?,
                    email: row.get(5)?,
                    phone_number: row.get(6)?,
                    resume: row.get(7)?,
                    applied_date: row.get(8)?,
                    cover_letter: row.get(9)?,
                    education: Vec::new(),
                    experience: Vec::new(),
                    skills: Vec::new(),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut applicants = Vec::with_capacity(rows.len());
        for mut applicant in rows {
            applicant.education = seeker_education(&conn, applicant.job_seeker_id)?;
            applicant.experience = seeker_experience(&conn, applicant.job_seeker_id)?;
            applicant.skills = seeker_skills(&conn, applicant.job_seeker_id)?;
            applicants.push(applicant);
        }
        Ok(applicants)
    }

    fn count_applications(
        &self,
        job_seeker_id: i64,
        scope: ApplicationScope,
    ) -> Result<i64, RepositoryError> {
        let filter = match scope {
            ApplicationScope::All => "",
            ApplicationScope::Pending => "AND application_status = 'Applied'",
            ApplicationScope::Decided => "AND application_status <> 'Applied'",
        };
        let conn = self.connection()?;
        let count = conn.query_row(
            &format!("SELECT COUNT(*) FROM applications WHERE job_seeker_id = ?1 {filter}"),
            params![job_seeker_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    fn insert_interview(&self, request: &InterviewRequest) -> Result<Interview, RepositoryError> {
        let mut conn = self.connection()?;
        let tx = conn.transaction()?;

        let application = fetch_application_with(&tx, request.application_id)?
            .ok_or(RepositoryError::NotFound)?;
        if application.status.is_decided() {
            return Err(RepositoryError::Conflict);
        }

        tx.execute(
            "INSERT INTO interviews (application_id, scheduled_date, interview_mode, status, interviewer_name, interview_link)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                request.application_id,
                request.scheduled_date,
                request.interview_mode,
                InterviewStatus::Scheduled.label(),
                request.interviewer_name,
                request.interview_link
            ],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;

        Ok(Interview {
            id,
            application_id: request.application_id,
            scheduled_date: request.scheduled_date,
            interview_mode: request.interview_mode.clone(),
            status: InterviewStatus::Scheduled,
            interviewer_name: request.interviewer_name.clone(),
            interview_link: request.interview_link.clone(),
        })
    }

    fn update_interview(&self, update: &InterviewUpdate) -> Result<Interview, RepositoryError> {
        let conn = self.connection()?;
        let changed = conn.execute(
            "UPDATE interviews
             SET scheduled_date = ?1, interview_mode = ?2, interviewer_name = ?3,
                 interview_link = ?4, status = COALESCE(?5, status)
             WHERE id = ?6",
            params![
                update.scheduled_date,
                update.interview_mode,
                update.interviewer_name,
                update.interview_link,
                update.status.map(|status| status.label()),
                update.id
            ],
        )?;
        if changed == 0 {
            return Err(RepositoryError::NotFound);
        }
        fetch_interview_with(&conn, update.id)
    }

    fn interviews_for_application(
        &self,
        application_id: i64,
    ) -> Result<Vec<Interview>, RepositoryError> {
        let conn = self.connection()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {INTERVIEW_COLUMNS} FROM interviews i
             WHERE i.application_id = ?1
             ORDER BY i.scheduled_date, i.id"
        ))?;
        let interviews = stmt
            .query_map(params![application_id], row_to_interview)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(interviews)
    }

    fn seeker_interviews(
        &self,
        job_seeker_id: i64,
    ) -> Result<Vec<SeekerInterview>, RepositoryError> {
        let conn = self.connection()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {INTERVIEW_COLUMNS}, j.id, j.job_title, c.company_name
             FROM interviews i
             JOIN applications a ON i.application_id = a.id
             JOIN job_listings j ON a.job_listing_id = j.id
             JOIN employers e ON j.employer_id = e.id
             JOIN company c ON e.company_id = c.id
             WHERE a.job_seeker_id = ?1
             ORDER BY i.scheduled_date, i.id"
        ))?;
        let interviews = stmt
            .query_map(params![job_seeker_id], |row| {
                Ok(SeekerInterview {
                    interview: row_to_interview(row)?,
                    job_listing_id: row.get(7)?,
                    job_title: row.get(8)?,
                    company_name: row.get(9)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(interviews)
    }

    fn count_seeker_interviews(&self, job_seeker_id: i64) -> Result<i64, RepositoryError> {
        let conn = self.connection()?;
        let count = conn.query_row(
            "SELECT COUNT(*) FROM interviews i
             JOIN applications a ON i.application_id = a.id
             WHERE a.job_seeker_id = ?1",
            params![job_seeker_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    fn seeker_email(&self, job_seeker_id: i64) -> Result<Option<String>, RepositoryError> {
        let conn = self.connection()?;
        let email = conn
            .query_row(
                "SELECT email FROM job_seekers WHERE id = ?1",
                params![job_seeker_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(email)
    }
}
