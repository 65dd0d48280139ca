//! JSON-import av släktmedlemmar till databasen
//!
//! Filen är en JSON-array med medlemsposter (camelCase, `fatherId` eller
//! `parentId` för föräldern).

use std::collections::HashSet;
use std::path::Path;

use crate::db::Database;
use crate::models::Member;
use crate::utils::path::is_json_file;
use crate::utils::{AppError, AppResult};

/// Hur befintliga medlemmar behandlas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImportMode {
    /// Lägg till; ID:n som redan finns hoppas över
    #[default]
    Append,
    /// Töm trädet först
    Replace,
}

/// Resultat av en import
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportResult {
    pub imported: usize,
    /// Redan existerande ID:n
    pub skipped: usize,
    pub warnings: Vec<String>,
}

impl ImportResult {
    /// Sammanfattning av importen
    pub fn summary(&self) -> String {
        format!(
            "{} medlemmar importerade{}",
            self.imported,
            if self.skipped > 0 {
                format!(" ({} överhoppade)", self.skipped)
            } else {
                String::new()
            }
        )
    }
}

/// Tolka och validera en JSON-array med medlemmar
pub fn parse_members(json: &str) -> AppResult<Vec<Member>> {
    let members: Vec<Member> = serde_json::from_str(json)?;

    let mut seen = HashSet::new();
    for member in &members {
        member.validate()?;
        if !seen.insert(member.id.as_str()) {
            return Err(AppError::validation(format!(
                "ID '{}' förekommer flera gånger",
                member.id
            )));
        }
    }

    Ok(members)
}

pub struct MemberImporter<'a> {
    db: &'a Database,
}

impl<'a> MemberImporter<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    pub fn import_file(&self, path: &Path, mode: ImportMode) -> AppResult<ImportResult> {
        if !is_json_file(path) {
            tracing::warn!("{} saknar .json-ändelse, försöker ändå", path.display());
        }
        let content = std::fs::read_to_string(path)?;
        let members = parse_members(&content)?;
        tracing::info!("Importerar {} medlemmar från {}", members.len(), path.display());
        self.import_members(members, mode)
    }

    pub fn import_members(&self, members: Vec<Member>, mode: ImportMode) -> AppResult<ImportResult> {
        let repo = self.db.members();
        let mut result = ImportResult::default();

        let fresh = match mode {
            // Allt ersätts, inget att hoppa över
            ImportMode::Replace => members,
            ImportMode::Append => {
                let mut fresh = Vec::with_capacity(members.len());
                for member in members {
                    if repo.exists(&member.id)? {
                        result.skipped += 1;
                        result
                            .warnings
                            .push(format!("'{}' finns redan, hoppades över", member.id));
                    } else {
                        fresh.push(member);
                    }
                }
                fresh
            }
        };

        // Föräldrar som varken finns i filen eller i det som blir kvar i databasen
        let incoming: HashSet<&str> = fresh.iter().map(|m| m.id.as_str()).collect();
        for member in &fresh {
            if let Some(parent) = &member.parent_id {
                let known = incoming.contains(parent.as_str())
                    || (mode == ImportMode::Append && repo.exists(parent)?);
                if !known {
                    result.warnings.push(format!(
                        "'{}' refererar till okänd förälder '{}'",
                        member.id, parent
                    ));
                }
            }
        }

        result.imported = match mode {
            ImportMode::Append => repo.create_many(&fresh)?,
            ImportMode::Replace => {
                let (removed, created) = repo.replace_all(&fresh)?;
                tracing::info!("Ersatte trädet ({} medlemmar borttagna)", removed);
                created
            }
        };
        tracing::info!("Import klar: {}", result.summary());
        Ok(result)
    }
}
