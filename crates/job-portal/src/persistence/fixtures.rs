use chrono::Utc;
use rusqlite::params;

use super::SqliteStore;

/// Ids of a minimal company, employer, job seeker and open listing.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Seed {
    pub company: i64,
    pub employer: i64,
    pub seeker: i64,
    pub listing: i64,
}

pub(crate) fn seed(store: &SqliteStore) -> Seed {
    let conn = store.connection().expect("connection");
    conn.execute(
        "INSERT INTO company (company_name, industry, website) VALUES ('Acme Corp', 'Software', 'https://acme.example.com')",
        [],
    )
    .expect("company");
    let company = conn.last_insert_rowid();

    conn.execute(
        "INSERT INTO employers (company_id, email, password, contact_person) VALUES (?1, 'hr@acme.example.com', 'hash', 'Pat')",
        params![company],
    )
    .expect("employer");
    let employer = conn.last_insert_rowid();

    conn.execute(
        "INSERT INTO job_seekers (first_name, last_name, email, password, phone_number) VALUES ('Ada', 'Lovelace', 'ada@example.com', 'hash', '555-0100')",
        [],
    )
    .expect("seeker");
    let seeker = conn.last_insert_rowid();
    conn.execute(
        "INSERT INTO job_seeker_skills (job_seeker_id, skill_name, skill_level) VALUES (?1, 'Rust', 'Expert')",
        params![seeker],
    )
    .expect("skill");

    conn.execute(
        "INSERT INTO job_listings (employer_id, job_title, location, job_type, min_salary, max_salary, posted_date, expiry_date)
         VALUES (?1, 'Backend Engineer', 'Remote', 'Full-time', 90000, 120000, ?2, '2099-12-31')",
        params![employer, Utc::now()],
    )
    .expect("listing");
    let listing = conn.last_insert_rowid();

    Seed {
        company,
        employer,
        seeker,
        listing,
    }
}
