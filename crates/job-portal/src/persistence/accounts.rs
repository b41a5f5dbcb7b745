use rusqlite::{params, Connection, OptionalExtension};

use super::hiring::{seeker_education, seeker_experience};
use super::{RepositoryError, SqliteStore};
use crate::accounts::{
    AccountRepository, Company, Credentials, EmployerDetails, EmployerProfile, JobSeekerProfile,
    NewCompany, SeekerDetails, Skill,
};

fn seeker_skill_rows(conn: &Connection, job_seeker_id: i64) -> rusqlite::Result<Vec<Skill>> {
    let mut stmt = conn.prepare(
        "SELECT skill_name, skill_level FROM job_seeker_skills WHERE job_seeker_id = ?1 ORDER BY id",
    )?;
    let skills = stmt
        .query_map(params![job_seeker_id], |row| {
            Ok(Skill {
                skill_name: row.get(0)?,
                skill_level: row.get(1)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(skills)
}

/// Writes every sub-collection of `details` for the seeker.
fn insert_seeker_collections(
    conn: &Connection,
    job_seeker_id: i64,
    details: &SeekerDetails,
) -> rusqlite::Result<()> {
    let mut skills = conn.prepare(
        "INSERT INTO job_seeker_skills (job_seeker_id, skill_name, skill_level) VALUES (?1, ?2, ?3)",
    )?;
    for skill in &details.skills {
        skills.execute(params![job_seeker_id, skill.skill_name, skill.skill_level])?;
    }

    let mut education = conn.prepare(
        "INSERT INTO education (job_seeker_id, education_level, institution_name, field_of_study, start_year, end_year, grade)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )?;
    for entry in &details.education {
        education.execute(params![
            job_seeker_id,
            entry.education_level,
            entry.institution_name,
            entry.field_of_study,
            entry.start_year,
            entry.end_year,
            entry.grade
        ])?;
    }

    let mut experience = conn.prepare(
        "INSERT INTO experience (job_seeker_id, job_title, company_name, location, start_date, end_date)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )?;
    for entry in &details.experience {
        experience.execute(params![
            job_seeker_id,
            entry.job_title,
            entry.company_name,
            entry.location,
            entry.start_date,
            entry.end_date
        ])?;
    }
    Ok(())
}

fn fetch_job_seeker_with(
    conn: &Connection,
    id: i64,
) -> Result<Option<JobSeekerProfile>, RepositoryError> {
    let row = conn
        .query_row(
            "SELECT first_name, last_name, email, resume, location, profile_picture, phone_number, linkedin_url
             FROM job_seekers WHERE id = ?1",
            params![id],
            |row| {
                Ok(SeekerDetails {
                    first_name: row.get(0)?,
                    last_name: row.get(1)?,
                    email: row.get(2)?,
                    resume: row.get(3)?,
                    location: row.get(4)?,
                    profile_picture: row.get(5)?,
                    phone_number: row.get(6)?,
                    linkedin_url: row.get(7)?,
                    skills: Vec::new(),
                    education: Vec::new(),
                    experience: Vec::new(),
                })
            },
        )
        .optional()?;

    let Some(mut details) = row else {
        return Ok(None);
    };
    details.skills = seeker_skill_rows(conn, id)?;
    details.education = seeker_education(conn, id)?;
    details.experience = seeker_experience(conn, id)?;
    Ok(Some(JobSeekerProfile { id, details }))
}

fn fetch_employer_with(
    conn: &Connection,
    id: i64,
) -> Result<Option<EmployerProfile>, RepositoryError> {
    let profile = conn
        .query_row(
            "SELECT e.id, e.company_id, e.email, e.description, e.contact_person, e.contact_number,
                    c.company_name, c.industry, c.website
             FROM employers e
             JOIN company c ON e.company_id = c.id
             WHERE e.id = ?1",
            params![id],
            |row| {
                Ok(EmployerProfile {
                    id: row.get(0)?,
                    details: EmployerDetails {
                        company_id: row.get(1)?,
                        email: row.get(2)?,
                        description: row.get(3)?,
                        contact_person: row.get(4)?,
                        contact_number: row.get(5)?,
                    },
                    company_name: row.get(6)?,
                    industry: row.get(7)?,
                    website: row.get(8)?,
                })
            },
        )
        .optional()?;
    Ok(profile)
}

impl AccountRepository for SqliteStore {
    fn insert_job_seeker(
        &self,
        details: &SeekerDetails,
        password_hash: &str,
    ) -> Result<JobSeekerProfile, RepositoryError> {
        let mut conn = self.connection()?;
        let tx = conn.transaction()?;

        tx.execute(
            "INSERT INTO job_seekers (first_name, last_name, email, password, resume, location, profile_picture, phone_number, linkedin_url)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                details.first_name,
                details.last_name,
                details.email,
                password_hash,
                details.resume,
                details.location,
                details.profile_picture,
                details.phone_number,
                details.linkedin_url
            ],
        )?;
        let id = tx.last_insert_rowid();
        insert_seeker_collections(&tx, id, details)?;
        tx.commit()?;

        Ok(JobSeekerProfile {
            id,
            details: details.clone(),
        })
    }

    fn fetch_job_seeker(&self, id: i64) -> Result<Option<JobSeekerProfile>, RepositoryError> {
        let conn = self.connection()?;
        fetch_job_seeker_with(&conn, id)
    }

    fn update_job_seeker(
        &self,
        id: i64,
        details: &SeekerDetails,
        password_hash: Option<&str>,
    ) -> Result<JobSeekerProfile, RepositoryError> {
        let mut conn = self.connection()?;
        let tx = conn.transaction()?;

        let changed = tx.execute(
            "UPDATE job_seekers
             SET first_name = ?1, last_name = ?2, email = ?3, resume = ?4, location = ?5,
                 profile_picture = ?6, phone_number = ?7, linkedin_url = ?8,
                 password = COALESCE(?9, password)
             WHERE id = ?10",
            params![
                details.first_name,
                details.last_name,
                details.email,
                details.resume,
                details.location,
                details.profile_picture,
                details.phone_number,
                details.linkedin_url,
                password_hash,
                id
            ],
        )?;
        if changed == 0 {
            return Err(RepositoryError::NotFound);
        }

        for table in ["job_seeker_skills", "education", "experience"] {
            tx.execute(
                &format!("DELETE FROM {table} WHERE job_seeker_id = ?1"),
                params![id],
            )?;
        }
        insert_seeker_collections(&tx, id, details)?;
        let profile = fetch_job_seeker_with(&tx, id)?.ok_or(RepositoryError::NotFound)?;
        tx.commit()?;

        Ok(profile)
    }

    fn delete_job_seeker(&self, id: i64) -> Result<(), RepositoryError> {
        let conn = self.connection()?;
        let changed = conn.execute("DELETE FROM job_seekers WHERE id = ?1", params![id])?;
        if changed == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    fn seeker_credentials(&self, email: &str) -> Result<Option<Credentials>, RepositoryError> {
        let conn = self.connection()?;
        let credentials = conn
            .query_row(
                "SELECT id, first_name, email, password FROM job_seekers WHERE email = ?1",
                params![email],
                |row| {
                    Ok(Credentials {
                        user_id: row.get(0)?,
                        first_name: Some(row.get(1)?),
                        email: row.get(2)?,
                        password_hash: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(credentials)
    }

    fn insert_employer(
        &self,
        details: &EmployerDetails,
        password_hash: &str,
    ) -> Result<EmployerProfile, RepositoryError> {
        let conn = self.connection()?;
        conn.execute(
            "INSERT INTO employers (company_id, email, password, description, contact_person, contact_number)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                details.company_id,
                details.email,
                password_hash,
                details.description,
                details.contact_person,
                details.contact_number
            ],
        )?;
        let id = conn.last_insert_rowid();
        fetch_employer_with(&conn, id)?.ok_or(RepositoryError::NotFound)
    }

    fn fetch_employer(&self, id: i64) -> Result<Option<EmployerProfile>, RepositoryError> {
        let conn = self.connection()?;
        fetch_employer_with(&conn, id)
    }

    fn update_employer(
        &self,
        id: i64,
        details: &EmployerDetails,
        password_hash: Option<&str>,
    ) -> Result<EmployerProfile, RepositoryError> {
        let conn = self.connection()?;
        let changed = conn.execute(
            "UPDATE employers
             SET company_id = ?1, email = ?2, description = ?3, contact_person = ?4,
                 contact_number = ?5, password = COALESCE(?6, password)
             WHERE id = ?7",
            params![
                details.company_id,
                details.email,
                details.description,
                details.contact_person,
                details.contact_number,
                password_hash,
                id
            ],
        )?;
        if changed == 0 {
            return Err(RepositoryError::NotFound);
        }
        fetch_employer_with(&conn, id)?.ok_or(RepositoryError::NotFound)
    }

    fn delete_employer(&self, id: i64) -> Result<(), RepositoryError> {
        let conn = self.connection()?;
        let changed = conn.execute("DELETE FROM employers WHERE id = ?1", params![id])?;
        if changed == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    fn employer_credentials(&self, email: &str) -> Result<Option<Credentials>, RepositoryError> {
        let conn = self.connection()?;
        let credentials = conn
            .query_row(
                "SELECT id, email, password FROM employers WHERE email = ?1",
                params![email],
                |row| {
                    Ok(Credentials {
                        user_id: row.get(0)?,
                        first_name: None,
                        email: row.get(1)?,
                        password_hash: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(credentials)
    }

    fn insert_company(&self, company: &NewCompany) -> Result<Company, RepositoryError> {
        let conn = self.connection()?;
        conn.execute(
            "INSERT INTO company (company_name, industry, website, description, logo)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                company.company_name.trim(),
                company.industry,
                company.website,
                company.description,
                company.logo
            ],
        )?;
        Ok(Company {
            id: conn.last_insert_rowid(),
            company_name: company.company_name.trim().to_string(),
            industry: company.industry.clone(),
            website: company.website.clone(),
            description: company.description.clone(),
            logo: company.logo.clone(),
        })
    }

    fn list_companies(&self) -> Result<Vec<Company>, RepositoryError> {
        let conn = self.connection()?;
        let mut stmt = conn.prepare(
            "SELECT id, company_name, industry, website, description, logo FROM company ORDER BY id",
        )?;
        let companies = stmt
            .query_map([], |row| {
                Ok(Company {
                    id: row.get(0)?,
                    company_name: row.get(1)?,
                    industry: row.get(2)?,
                    website: row.get(3)?,
                    description: row.get(4)?,
                    logo: row.get(5)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(companies)
    }
}
