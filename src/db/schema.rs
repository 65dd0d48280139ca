/// SQL-schema för Ansab

pub const SCHEMA_VERSION: i32 = 2;

pub const CREATE_TABLES: &str = r#"
-- Släktmedlemmar. father_id är en lös referens: saknad förälder tillåts.
CREATE TABLE IF NOT EXISTS family_members (
    id TEXT PRIMARY KEY NOT NULL,
    name TEXT NOT NULL,
    father_id TEXT,
    birth_year INTEGER,
    death_year INTEGER,
    biography TEXT,
    tagline TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_members_father ON family_members(father_id);
CREATE INDEX IF NOT EXISTS idx_members_name ON family_members(name);

-- Källor per medlem
CREATE TABLE IF NOT EXISTS member_sources (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    member_id TEXT NOT NULL,
    label TEXT NOT NULL,
    url TEXT,
    FOREIGN KEY (member_id) REFERENCES family_members(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_sources_member ON member_sources(member_id);

-- Migrationshistorik
CREATE TABLE IF NOT EXISTS schema_migrations (
    version INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
);
"#;
