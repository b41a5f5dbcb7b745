use rusqlite::Connection;

pub struct Table {
    pub name: &'static str,
    pub schema: &'static str,
    pub indices: &'static [&'static str],
}

const COMPANY_TABLE_V_1: Table = Table {
    name: "company",
    schema: "CREATE TABLE company (id INTEGER PRIMARY KEY AUTOINCREMENT, company_name TEXT NOT NULL, industry TEXT NOT NULL DEFAULT '', website TEXT NOT NULL DEFAULT '', description TEXT NOT NULL DEFAULT '', logo TEXT NOT NULL DEFAULT '');",
    indices: &[],
};
const JOB_SEEKERS_TABLE_V_1: Table = Table {
    name: "job_seekers",
    schema: "CREATE TABLE job_seekers (id INTEGER PRIMARY KEY AUTOINCREMENT, first_name TEXT NOT NULL, last_name TEXT NOT NULL, email TEXT NOT NULL UNIQUE, password TEXT NOT NULL, resume TEXT, location TEXT NOT NULL DEFAULT '', profile_picture TEXT NOT NULL DEFAULT '', phone_number TEXT NOT NULL DEFAULT '', linkedin_url TEXT NOT NULL DEFAULT '');",
    indices: &["CREATE INDEX job_seekers_email_index ON job_seekers (email);"],
};
const JOB_SEEKER_SKILLS_TABLE_V_1: Table = Table {
    name: "job_seeker_skills",
    schema: "CREATE TABLE job_seeker_skills (id INTEGER PRIMARY KEY AUTOINCREMENT, job_seeker_id INTEGER NOT NULL, skill_name TEXT NOT NULL, skill_level TEXT NOT NULL DEFAULT '', CONSTRAINT job_seeker_id FOREIGN KEY (job_seeker_id) REFERENCES job_seekers (id) ON DELETE CASCADE);",
    indices: &["CREATE INDEX job_seeker_skills_seeker_index ON job_seeker_skills (job_seeker_id);"],
};
const EDUCATION_TABLE_V_1: Table = Table {
    name: "education",
    schema: "CREATE TABLE education (id INTEGER PRIMARY KEY AUTOINCREMENT, job_seeker_id INTEGER NOT NULL, education_level TEXT NOT NULL, institution_name TEXT NOT NULL, field_of_study TEXT NOT NULL DEFAULT '', start_year TEXT NOT NULL DEFAULT '', end_year TEXT NOT NULL DEFAULT '', grade TEXT NOT NULL DEFAULT '', CONSTRAINT job_seeker_id FOREIGN KEY (job_seeker_id) REFERENCES job_seekers (id) ON DELETE CASCADE);",
    indices: &[],
};
const EXPERIENCE_TABLE_V_1: Table = Table {
    name: "experience",
    schema: "CREATE TABLE experience (id INTEGER PRIMARY KEY AUTOINCREMENT, job_seeker_id INTEGER NOT NULL, job_title TEXT NOT NULL, company_name TEXT NOT NULL, location TEXT NOT NULL DEFAULT '', start_date TEXT NOT NULL, end_date TEXT, CONSTRAINT job_seeker_id FOREIGN KEY (job_seeker_id) REFERENCES job_seekers (id) ON DELETE CASCADE);",
    indices: &[],
};
const EMPLOYERS_TABLE_V_1: Table = Table {
    name: "employers",
    schema: "CREATE TABLE employers (id INTEGER PRIMARY KEY AUTOINCREMENT, company_id INTEGER NOT NULL, email TEXT NOT NULL UNIQUE, password TEXT NOT NULL, description TEXT NOT NULL DEFAULT '', contact_person TEXT NOT NULL DEFAULT '', contact_number TEXT NOT NULL DEFAULT '', CONSTRAINT company_id FOREIGN KEY (company_id) REFERENCES company (id));",
    indices: &["CREATE INDEX employers_email_index ON employers (email);"],
};
const JOB_LISTINGS_TABLE_V_1: Table = Table {
    name: "job_listings",
    schema: "CREATE TABLE job_listings (id INTEGER PRIMARY KEY AUTOINCREMENT, employer_id INTEGER NOT NULL, job_title TEXT NOT NULL, description TEXT NOT NULL DEFAULT '', location TEXT NOT NULL DEFAULT '', job_type TEXT NOT NULL DEFAULT '', min_salary REAL NOT NULL DEFAULT 0, max_salary REAL NOT NULL DEFAULT 0, posted_date TEXT NOT NULL, expiry_date TEXT NOT NULL, applicant_count INTEGER NOT NULL DEFAULT 0, status TEXT NOT NULL DEFAULT 'Open', job_category TEXT NOT NULL DEFAULT '', CONSTRAINT employer_id FOREIGN KEY (employer_id) REFERENCES employers (id) ON DELETE CASCADE);",
    indices: &["CREATE INDEX job_listings_employer_index ON job_listings (employer_id);"],
};
const REQUIREMENT_TABLE_V_1: Table = Table {
    name: "requirement",
    schema: "CREATE TABLE requirement (id INTEGER PRIMARY KEY AUTOINCREMENT, job_listing_id INTEGER NOT NULL, name TEXT NOT NULL, CONSTRAINT job_listing_id FOREIGN KEY (job_listing_id) REFERENCES job_listings (id) ON DELETE CASCADE);",
    indices: &["CREATE INDEX requirement_listing_index ON requirement (job_listing_id);"],
};
const APPLICATIONS_TABLE_V_1: Table = Table {
    name: "applications",
    schema: "CREATE TABLE applications (id INTEGER PRIMARY KEY AUTOINCREMENT, job_seeker_id INTEGER NOT NULL, job_listing_id INTEGER NOT NULL, application_status TEXT NOT NULL DEFAULT 'Applied', applied_date TEXT NOT NULL, cover_letter TEXT NOT NULL DEFAULT '', UNIQUE (job_seeker_id, job_listing_id), CONSTRAINT job_seeker_id FOREIGN KEY (job_seeker_id) REFERENCES job_seekers (id) ON DELETE CASCADE, CONSTRAINT job_listing_id FOREIGN KEY (job_listing_id) REFERENCES job_listings (id) ON DELETE CASCADE);",
    indices: &["CREATE INDEX applications_listing_index ON applications (job_listing_id);"],
};
const INTERVIEWS_TABLE_V_1: Table = Table {
    name: "interviews",
    schema: "CREATE TABLE interviews (id INTEGER PRIMARY KEY AUTOINCREMENT, application_id INTEGER NOT NULL, scheduled_date TEXT NOT NULL, interview_mode TEXT NOT NULL, status TEXT NOT NULL DEFAULT 'Scheduled', interviewer_name TEXT NOT NULL, interview_link TEXT NOT NULL DEFAULT '', CONSTRAINT application_id FOREIGN KEY (application_id) REFERENCES applications (id) ON DELETE CASCADE);",
    indices: &["CREATE INDEX interviews_application_index ON interviews (application_id);"],
};
const NOTIFICATIONS_TABLE_V_1: Table = Table {
    name: "notifications",
    schema: "CREATE TABLE notifications (id INTEGER PRIMARY KEY AUTOINCREMENT, user_id INTEGER NOT NULL, user_type TEXT NOT NULL, message TEXT NOT NULL, is_read INTEGER NOT NULL DEFAULT 0, created_at TEXT NOT NULL);",
    indices: &["CREATE INDEX notifications_user_index ON notifications (user_id, user_type);"],
};

pub struct VersionedSchema {
    pub version: u32,
    pub tables: &'static [Table],
}

/// Ordered oldest first; the last entry is the schema new databases are created with.
pub const VERSIONED_SCHEMAS: &[VersionedSchema] = &[VersionedSchema {
    version: 1,
    tables: &[
        COMPANY_TABLE_V_1,
        JOB_SEEKERS_TABLE_V_1,
        JOB_SEEKER_SKILLS_TABLE_V_1,
        EDUCATION_TABLE_V_1,
        EXPERIENCE_TABLE_V_1,
        EMPLOYERS_TABLE_V_1,
        JOB_LISTINGS_TABLE_V_1,
        REQUIREMENT_TABLE_V_1,
        APPLICATIONS_TABLE_V_1,
        INTERVIEWS_TABLE_V_1,
        NOTIFICATIONS_TABLE_V_1,
    ],
}];

pub fn current() -> &'static VersionedSchema {
    &VERSIONED_SCHEMAS[VERSIONED_SCHEMAS.len() - 1]
}

impl Table {
    fn create(&self, conn: &Connection) -> rusqlite::Result<()> {
        conn.execute(self.schema, [])?;
        for index in self.indices {
            conn.execute(index, [])?;
        }
        Ok(())
    }
}

impl VersionedSchema {
    pub fn create(&self, conn: &Connection) -> rusqlite::Result<()> {
        for table in self.tables {
            table.create(conn)?;
        }
        conn.pragma_update(None, "user_version", self.version)?;
        Ok(())
    }

    /// Checks that every table of this version is present.
    pub fn validate(&self, conn: &Connection) -> rusqlite::Result<()> {
        for table in self.tables {
            conn.query_row(
                "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1",
                [table.name],
                |row| row.get::<_, String>(0),
            )?;
        }
        Ok(())
    }
}
