//! Master catalog merge and department access rules.
//!
//! Master content is always a full-refresh snapshot: the previous master
//! folders are dropped wholesale and replaced, which keeps the merge free
//! of vector clocks. Personal folders ride along untouched.

use crate::error::{Result, SnipcatError};
use crate::models::{Catalog, Department, Member, Role, SnippetFolder, SnippetKind};

/// Read access to a department's master folders. Members see their own
/// departments; admins may additionally look into other departments when
/// the lookup is explicitly requested; super admins see everything.
pub fn can_read_master(member: &Member, department: &str, explicit_lookup: bool) -> bool {
    match member.role {
        Role::SuperAdmin => true,
        Role::Admin => member.belongs_to(department) || explicit_lookup,
        Role::General => member.belongs_to(department),
    }
}

/// Write access: replacing the distributed master document for a
/// department. General members never write.
pub fn can_write_master(member: &Member, department: &str) -> bool {
    match member.role {
        Role::SuperAdmin => true,
        Role::Admin => member.belongs_to(department),
        Role::General => false,
    }
}

/// The departments whose master documents a routine sync should fetch for
/// this member.
pub fn syncable_departments<'a>(
    member: &Member,
    departments: &'a [Department],
) -> Vec<&'a Department> {
    departments
        .iter()
        .filter(|d| can_read_master(member, &d.name, false))
        .collect()
}

/// Merge a freshly fetched master snapshot into the existing catalog.
///
/// `departments` names the departments the snapshot covers; the actor
/// must be entitled to hold each one, otherwise an `Unauthorized` error
/// is returned and nothing is merged. Fresh folders are name-merged,
/// stamped master and placed first; personal folders follow unchanged in
/// their relative order. A personal folder sharing a name with a master
/// folder stays a separate entry: entries of different kinds are never
/// merged.
pub fn reconcile(
    existing: &Catalog,
    fresh_master: Vec<SnippetFolder>,
    actor: &Member,
    departments: &[String],
) -> Result<Catalog> {
    for department in departments {
        if !can_read_master(actor, department, false) {
            return Err(SnipcatError::Unauthorized {
                department: department.clone(),
                role: actor.role,
            });
        }
    }

    let mut folders = merge_master_by_name(fresh_master);
    for folder in &mut folders {
        folder.stamp(SnippetKind::Master);
        folder.renumber();
    }

    folders.extend(existing.folders.iter().filter(|f| f.is_personal()).cloned());

    // Renumbered sequentially so applying the same snapshot twice is a
    // fixed point.
    for (position, folder) in folders.iter_mut().enumerate() {
        folder.order = position;
    }

    Ok(Catalog { folders })
}

/// Folder identity for merge purposes is the trimmed, case-sensitive
/// name. Same-name folders in one fetch collapse into one logical folder,
/// snippets concatenated in document order.
fn merge_master_by_name(folders: Vec<SnippetFolder>) -> Vec<SnippetFolder> {
    let mut merged: Vec<SnippetFolder> = Vec::new();
    for mut folder in folders {
        folder.name = folder.name.trim().to_string();
        match merged.iter_mut().find(|m| m.name == folder.name) {
            Some(existing) => existing.snippets.append(&mut folder.snippets),
            None => merged.push(folder),
        }
    }
    merged
}
