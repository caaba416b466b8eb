use snipcat_core::models::{Catalog, SnippetKind};

/// Print the catalog as an indented folder/snippet listing.
pub fn print_catalog(catalog: &Catalog) {
    if catalog.folders.is_empty() {
        println!("Catalog is empty. Run `snipcat sync` or add a personal snippet.");
        return;
    }

    for folder in &catalog.folders {
        let kind = if folder.is_personal() {
            "personal"
        } else {
            "master"
        };
        println!("{} [{}]", folder.name, kind);
        for snippet in &folder.snippets {
            let marker = match snippet.kind {
                SnippetKind::Master => "M",
                SnippetKind::Personal => "P",
            };
            println!("  [{}] {}  {}", marker, snippet.id, snippet.title);
        }
    }
}
