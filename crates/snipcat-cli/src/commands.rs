use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use snipcat_core::codec::{decode, encode};
use snipcat_core::config::{get_departments_file_path, get_profile_file_path};
use snipcat_core::reconcile::{can_write_master, reconcile, syncable_departments};
use snipcat_core::storage::{
    add_personal_snippet, delete_personal_snippet, load_catalog, load_or_default, save_catalog,
    update_personal_snippet,
};
use snipcat_core::template::{expand, ExpandContext};
use snipcat_core::{Department, Member, Result, SnipcatError};

use crate::cli::Commands;
use crate::utils::print_catalog;

pub fn handle_command(command: Option<Commands>) -> Result<()> {
    match command {
        Some(command) => handle_subcommand(command),
        None => handle_list(), // Default: show the catalog
    }
}

fn handle_subcommand(command: Commands) -> Result<()> {
    match command {
        Commands::Add {
            folder,
            title,
            content,
            description,
        } => {
            let id = add_personal_snippet(&folder, title, content, description)?;
            println!("Snippet added with id {}", id);
            Ok(())
        }
        Commands::Delete { id } => {
            delete_personal_snippet(&id).map(|_| println!("Snippet deleted successfully"))
        }
        Commands::Update {
            id,
            title,
            content,
            description,
        } => update_personal_snippet(&id, title, content, description)
            .map(|_| println!("Snippet updated successfully")),
        Commands::List => handle_list(),
        Commands::Expand { id, name } => handle_expand(&id, name),
        Commands::Sync => handle_sync(),
        Commands::Import { path } => handle_import(&path),
        Commands::Export { output } => handle_export(output),
        Commands::ExportMaster { department, output } => {
            handle_export_master(&department, output)
        }
    }
}

fn handle_list() -> Result<()> {
    let catalog = load_or_default()?;
    print_catalog(&catalog);
    Ok(())
}

fn handle_expand(id: &str, name_override: Option<String>) -> Result<()> {
    let catalog = load_catalog()?;
    let snippet = catalog
        .find_snippet(id)
        .ok_or_else(|| SnipcatError::SnippetNotFound(id.to_string()))?;

    // A missing profile renders name tokens as the empty string.
    let user_name = match name_override {
        Some(name) => name,
        None => load_profile().map(|m| m.name).unwrap_or_default(),
    };

    let context = ExpandContext {
        user_name,
        now: Local::now().naive_local(),
    };
    println!("{}", expand(&snippet.content, &context));
    Ok(())
}

fn handle_sync() -> Result<()> {
    let actor = load_profile()?;
    let departments = load_departments()?;
    let targets = syncable_departments(&actor, &departments);

    if targets.is_empty() {
        println!("No departments available for {}", actor.name);
        return Ok(());
    }

    let mut fresh = Vec::new();
    let mut names = Vec::new();
    for department in &targets {
        let bytes = match fs::read(&department.xml_file_id) {
            Ok(bytes) => bytes,
            Err(e) => {
                // Hand-maintained documents go missing; sync what we can.
                eprintln!("Skipping {}: {}", department.name, e);
                continue;
            }
        };
        let folders = decode(&bytes);
        if folders.is_empty() {
            eprintln!(
                "Warning: no folders decoded from {}",
                department.xml_file_id
            );
        }
        fresh.extend(folders);
        names.push(department.name.clone());
    }

    let existing = load_or_default()?;
    let merged = reconcile(&existing, fresh, &actor, &names)?;
    save_catalog(&merged)?;
    println!("Synced {} department(s)", names.len());
    Ok(())
}

fn handle_import(path: &Path) -> Result<()> {
    let bytes = fs::read(path)?;
    let folders = decode(&bytes);
    let mut catalog = load_or_default()?;
    let imported = catalog.import_personal(folders);
    save_catalog(&catalog)?;
    println!("Imported {} snippet(s)", imported);
    Ok(())
}

fn handle_export(output: Option<PathBuf>) -> Result<()> {
    let catalog = load_catalog()?;
    let personal: Vec<_> = catalog
        .folders
        .iter()
        .filter(|f| f.is_personal())
        .cloned()
        .collect();
    write_xml(&encode(&personal), output)
}

fn handle_export_master(department: &str, output: Option<PathBuf>) -> Result<()> {
    let actor = load_profile()?;
    if !can_write_master(&actor, department) {
        return Err(SnipcatError::Unauthorized {
            department: department.to_string(),
            role: actor.role,
        });
    }

    let catalog = load_catalog()?;
    let master: Vec<_> = catalog
        .folders
        .iter()
        .filter(|f| !f.is_personal())
        .cloned()
        .collect();
    write_xml(&encode(&master), output)
}

fn write_xml(xml: &str, output: Option<PathBuf>) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(&path, xml)?;
            println!("Wrote {}", path.display());
        }
        None => print!("{}", xml),
    }
    Ok(())
}

fn load_profile() -> Result<Member> {
    let path = get_profile_file_path();
    let content = fs::read_to_string(&path)
        .map_err(|_| SnipcatError::ConfigMissing(path.to_string_lossy().to_string()))?;
    serde_json::from_str(&content).map_err(|e| e.into())
}

fn load_departments() -> Result<Vec<Department>> {
    let path = get_departments_file_path();
    let content = fs::read_to_string(&path)
        .map_err(|_| SnipcatError::ConfigMissing(path.to_string_lossy().to_string()))?;
    serde_json::from_str(&content).map_err(|e| e.into())
}
