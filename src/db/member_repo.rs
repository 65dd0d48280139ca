use anyhow::{anyhow, Result};
use rusqlite::{params, Connection, Row};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::models::{Member, MemberSource};

/// Övre gräns för förfäderskedjan, skydd mot cykler i data
const MAX_ANCESTOR_DEPTH: i64 = 2048;

const MEMBER_COLUMNS: &str =
    "id, name, father_id, birth_year, death_year, biography, tagline";

pub struct MemberRepository {
    conn: Arc<Mutex<Connection>>,
}

impl MemberRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow!("Databaslåset är förgiftat"))
    }

    /// Hämta alla medlemmar med källor, i inläggningsordning
    pub fn find_all(&self) -> Result<Vec<Member>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {MEMBER_COLUMNS} FROM family_members ORDER BY rowid"
        ))?;
        let mut members = stmt
            .query_map([], Self::row_to_member)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut sources = Self::all_sources(&conn)?;
        for member in &mut members {
            if let Some(list) = sources.remove(&member.id) {
                member.sources = list;
            }
        }

        Ok(members)
    }

    /// Hämta medlem via ID, med källor
    pub fn find_by_id(&self, id: &str) -> Result<Option<Member>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {MEMBER_COLUMNS} FROM family_members WHERE id = ?"
        ))?;

        let mut rows = stmt.query_map([id], Self::row_to_member)?;
        let Some(mut member) = rows.next().transpose()? else {
            return Ok(None);
        };
        member.sources = Self::sources_for(&conn, id)?;
        Ok(Some(member))
    }

    /// Direkta barn, i inläggningsordning
    pub fn children(&self, id: &str) -> Result<Vec<Member>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {MEMBER_COLUMNS} FROM family_members WHERE father_id = ? ORDER BY rowid"
        ))?;
        let members = stmt
            .query_map([id], Self::row_to_member)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(members)
    }

    /// Förfäder, närmast först. Saknade föräldrar avbryter kedjan.
    pub fn ancestors(&self, id: &str) -> Result<Vec<Member>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "WITH RECURSIVE chain(member_id, depth) AS (
                 SELECT father_id, 1 FROM family_members WHERE id = ?1 AND father_id IS NOT NULL
                 UNION ALL
                 SELECT m.father_id, chain.depth + 1
                 FROM family_members m JOIN chain ON m.id = chain.member_id
                 WHERE m.father_id IS NOT NULL AND chain.depth < ?2
             )
             SELECT {MEMBER_COLUMNS}
             FROM chain JOIN family_members ON family_members.id = chain.member_id
             ORDER BY chain.depth"
        ))?;
        let members = stmt
            .query_map(params![id, MAX_ANCESTOR_DEPTH], Self::row_to_member)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(members)
    }

    /// Sök på namn eller ID (skiftlägesokänsligt för ASCII)
    pub fn search(&self, query: &str, limit: usize) -> Result<Vec<Member>> {
        let query = query.trim();
        if query.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }

        let pattern = format!("%{}%", escape_like(query));
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {MEMBER_COLUMNS} FROM family_members
             WHERE name LIKE ?1 ESCAPE '\\' OR id LIKE ?1 ESCAPE '\\'
             ORDER BY rowid
             LIMIT ?2"
        ))?;
        let members = stmt
            .query_map(params![pattern, limit as i64], Self::row_to_member)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(members)
    }

    /// Skapa en medlem med källor
    pub fn create(&self, member: &Member) -> Result<()> {
        self.create_many(std::slice::from_ref(member)).map(|_| ())
    }

    /// Skapa flera medlemmar i en transaktion. Antingen alla eller ingen.
    pub fn create_many(&self, members: &[Member]) -> Result<usize> {
        for member in members {
            member.validate()?;
        }

        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        Self::insert_members(&tx, members)?;
        tx.commit()?;

        Ok(members.len())
    }

    /// Töm trädet och skapa medlemmarna i samma transaktion. Misslyckas
    /// inläggningen står det gamla trädet kvar. Returnerar (borttagna, skapade).
    pub fn replace_all(&self, members: &[Member]) -> Result<(usize, usize)> {
        for member in members {
            member.validate()?;
        }

        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM member_sources", [])?;
        let deleted = tx.execute("DELETE FROM family_members", [])?;
        Self::insert_members(&tx, members)?;
        tx.commit()?;

        Ok((deleted, members.len()))
    }

    fn insert_members(conn: &Connection, members: &[Member]) -> Result<()> {
        for member in members {
            conn.execute(
                "INSERT INTO family_members (id, name, father_id, birth_year, death_year, biography, tagline)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    member.id,
                    member.name,
                    member.parent_id,
                    member.birth_year,
                    member.death_year,
                    member.biography,
                    member.tagline,
                ],
            )?;
            for source in &member.sources {
                conn.execute(
                    "INSERT INTO member_sources (member_id, label, url) VALUES (?1, ?2, ?3)",
                    params![member.id, source.label, source.url],
                )?;
            }
        }
        Ok(())
    }

    pub fn add_source(&self, member_id: &str, source: &MemberSource) -> Result<i64> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO member_sources (member_id, label, url) VALUES (?1, ?2, ?3)",
            params![member_id, source.label, source.url],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn exists(&self, id: &str) -> Result<bool> {
        let conn = self.lock()?;
        let exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM family_members WHERE id = ?)",
            [id],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    pub fn count(&self) -> Result<i64> {
        let conn = self.lock()?;
        let count = conn.query_row("SELECT COUNT(*) FROM family_members", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Töm trädet (används vid ersättande import)
    pub fn delete_all(&self) -> Result<usize> {
        let conn = self.lock()?;
        conn.execute("DELETE FROM member_sources", [])?;
        let deleted = conn.execute("DELETE FROM family_members", [])?;
        Ok(deleted)
    }

    fn all_sources(conn: &Connection) -> Result<HashMap<String, Vec<MemberSource>>> {
        let mut stmt = conn.prepare(
            "SELECT member_id, label, url FROM member_sources ORDER BY id",
        )?;
        let mut map: HashMap<String, Vec<MemberSource>> = HashMap::new();
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                MemberSource::new(row.get::<_, String>(1)?, row.get(2)?),
            ))
        })?;
        for row in rows {
            let (member_id, source) = row?;
            map.entry(member_id).or_default().push(source);
        }
        Ok(map)
    }

    fn sources_for(conn: &Connection, member_id: &str) -> Result<Vec<MemberSource>> {
        let mut stmt = conn.prepare(
            "SELECT label, url FROM member_sources WHERE member_id = ? ORDER BY id",
        )?;
        let sources = stmt
            .query_map([member_id], |row| {
                Ok(MemberSource::new(row.get::<_, String>(0)?, row.get(1)?))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(sources)
    }

    fn row_to_member(row: &Row) -> rusqlite::Result<Member> {
        Ok(Member {
            id: row.get(0)?,
            name: row.get(1)?,
            parent_id: row.get(2)?,
            birth_year: row.get(3)?,
            death_year: row.get(4)?,
            biography: row.get(5)?,
            tagline: row.get(6)?,
            sources: Vec::new(),
        })
    }
}

fn escape_like(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len());
    for c in query.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    fn setup_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    fn seed(db: &Database) {
        let mut adnan = Member::new("adnan", "Adnan", None);
        adnan.sources.push(MemberSource::new("Ibn Hisham", None));
        adnan.sources.push(MemberSource::new(
            "Wikipedia",
            Some("https://en.wikipedia.org/wiki/Adnan".into()),
        ));

        let mut maad = Member::new("maad", "Ma'add", Some("adnan"));
        maad.birth_year = Some(100);

        db.members()
            .create_many(&[
                adnan,
                maad,
                Member::new("akk", "Akk", Some("adnan")),
                Member::new("nizar", "Nizar", Some("maad")),
                Member::new("mudar", "Mudar", Some("nizar")),
            ])
            .unwrap();
    }

    #[test]
    fn test_create_and_find() {
        let db = setup_db();
        seed(&db);
        let repo = db.members();

        let found = repo.find_by_id("adnan").unwrap().unwrap();
        assert_eq!(found.name, "Adnan");
        assert_eq!(found.sources.len(), 2);
        assert_eq!(found.sources[1].url.as_deref(), Some("https://en.wikipedia.org/wiki/Adnan"));

        assert_eq!(repo.find_by_id("maad").unwrap().unwrap().birth_year, Some(100));
        assert!(repo.find_by_id("nobody").unwrap().is_none());
        assert!(repo.exists("akk").unwrap());
        assert_eq!(repo.count().unwrap(), 5);
    }

    #[test]
    fn test_find_all_keeps_insertion_order() {
        let db = setup_db();
        seed(&db);

        let all = db.members().find_all().unwrap();
        let ids: Vec<&str> = all.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, ["adnan", "maad", "akk", "nizar", "mudar"]);
        assert_eq!(all[0].sources.len(), 2);
        assert!(all[1].sources.is_empty());
    }

    #[test]
    fn test_children_and_ancestors() {
        let db = setup_db();
        seed(&db);
        let repo = db.members();

        let children: Vec<String> = repo.children("adnan").unwrap().into_iter().map(|m| m.id).collect();
        assert_eq!(children, ["maad", "akk"]);

        let ancestors: Vec<String> = repo.ancestors("mudar").unwrap().into_iter().map(|m| m.id).collect();
        assert_eq!(ancestors, ["nizar", "maad", "adnan"]);

        assert!(repo.ancestors("adnan").unwrap().is_empty());
        assert!(repo.ancestors("nobody").unwrap().is_empty());
    }

    #[test]
    fn test_ancestors_terminates_on_cycle() {
        let db = setup_db();
        db.members()
            .create_many(&[Member::new("a", "A", Some("b")), Member::new("b", "B", Some("a"))])
            .unwrap();

        let ancestors = db.members().ancestors("a").unwrap();
        assert_eq!(ancestors.len() as i64, MAX_ANCESTOR_DEPTH);
    }

    #[test]
    fn test_search() {
        let db = setup_db();
        seed(&db);
        let repo = db.members();

        let ids = |q: &str, limit| -> Vec<String> {
            repo.search(q, limit).unwrap().into_iter().map(|m| m.id).collect()
        };
        assert_eq!(ids("MA'", 10), ["maad"]);
        assert_eq!(ids("a", 10).len(), 5);
        assert_eq!(ids("a", 2), ["adnan", "maad"]);
        assert_eq!(ids("  nizar ", 10), ["nizar"]);
        assert!(ids("", 10).is_empty());
        assert!(ids("%", 10).is_empty());
    }

    #[test]
    fn test_create_many_is_atomic() {
        let db = setup_db();
        seed(&db);
        let repo = db.members();

        // Dubblett-ID mitt i batchen rullar tillbaka allt
        let result = repo.create_many(&[Member::new("new", "New", None), Member::new("adnan", "Again", None)]);
        assert!(result.is_err());
        assert!(!repo.exists("new").unwrap());

        assert!(repo.create(&Member::new("", "Nameless id", None)).is_err());
        assert_eq!(repo.count().unwrap(), 5);
    }

    #[test]
    fn test_add_source_and_delete_all() {
        let db = setup_db();
        seed(&db);
        let repo = db.members();

        repo.add_source("akk", &MemberSource::new("Tabari", None)).unwrap();
        assert_eq!(repo.find_by_id("akk").unwrap().unwrap().sources.len(), 1);

        assert_eq!(repo.delete_all().unwrap(), 5);
        assert_eq!(repo.count().unwrap(), 0);
        assert!(repo.find_all().unwrap().is_empty());
    }

    #[test]
    fn test_replace_all() {
        let db = setup_db();
        seed(&db);
        let repo = db.members();

        let (deleted, created) = repo
            .replace_all(&[Member::new("a", "A", None), Member::new("b", "B", Some("a"))])
            .unwrap();
        assert_eq!((deleted, created), (5, 2));
        assert_eq!(repo.count().unwrap(), 2);
        assert!(!repo.exists("adnan").unwrap());
        assert!(repo.find_by_id("adnan").unwrap().is_none());
    }

    #[test]
    fn test_failed_replace_keeps_old_tree() {
        let db = setup_db();
        seed(&db);
        let repo = db.members();

        // Dubblett-ID gör att inläggningen misslyckas efter tömningen
        let result = repo.replace_all(&[Member::new("x", "X", None), Member::new("x", "X2", None)]);
        assert!(result.is_err());
        assert_eq!(repo.count().unwrap(), 5);
        assert_eq!(repo.find_by_id("adnan").unwrap().unwrap().sources.len(), 2);
        assert!(!repo.exists("x").unwrap());
    }
}
