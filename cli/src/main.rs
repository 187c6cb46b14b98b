use std::io;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use concept_breakdown_core::{
    CategoryCommand, CategoryId, CategoryKey, Command as RecordCommand, ComponentCommand,
    ComponentId, ComponentKey, ComponentTarget, ConceptCommand, ConceptId, DiagramCatalog,
    NewConcept, RecordStore,
};
use concept_breakdown_db::{DEFAULT_TABLE_PREFIX, StorageFormat, StorageOverrides, ToolConfig};
use rand::SeedableRng;
use rand::rngs::StdRng;

mod logging;
mod render;
mod shell;
mod storage;

use render::{render_listing, render_tables};
use shell::Shell;
use storage::{CliStorageFormat, StorageArgs, load_config, open_backend, open_session};

#[derive(Debug, Parser)]
#[command(name = "concept-breakdown")]
#[command(about = "Organize study material as categories, concepts, and components")]
#[command(version)]
struct Cli {
    /// Tracing filter (e.g. warn, info, concept_breakdown_db=debug).
    #[arg(long, global = true)]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create an empty data source.
    Init(StorageOnlyArgs),
    /// Interactive menu over the loaded data.
    Shell(StorageOnlyArgs),
    /// Add a category, concept, or component.
    Add(AddArgs),
    /// Update a category, concept, or component.
    Update(UpdateArgs),
    /// Remove a category, concept, or component (with everything it owns).
    Remove(RemoveArgs),
    /// Print the hierarchical listing.
    Print(StorageOnlyArgs),
    /// Print every concept with a table of its components.
    Table(StorageOnlyArgs),
    /// Recommend a diagram type for visualizing a concept.
    Recommend(RecommendArgs),
    /// Copy all records into another data source.
    Convert(ConvertArgs),
    /// SQLite table management.
    Migrate(MigrateArgs),
}

impl Command {
    fn storage(&self) -> Option<&StorageArgs> {
        match self {
            Command::Init(a)
            | Command::Shell(a)
            | Command::Print(a)
            | Command::Table(a) => Some(&a.storage),
            Command::Add(a) => Some(a.record.storage()),
            Command::Update(a) => Some(a.record.storage()),
            Command::Remove(a) => Some(a.record.storage()),
            Command::Convert(a) => Some(&a.storage),
            Command::Recommend(_) | Command::Migrate(_) => None,
        }
    }
}

#[derive(Debug, Args)]
struct StorageOnlyArgs {
    #[command(flatten)]
    storage: StorageArgs,
}

#[derive(Debug, Args)]
struct AddArgs {
    #[command(subcommand)]
    record: AddRecord,
}

#[derive(Debug, Subcommand)]
enum AddRecord {
    /// Add a category.
    Category {
        #[command(flatten)]
        storage: StorageArgs,
        /// Category id.
        #[arg(long, value_parser = clap::value_parser!(i64).range(1..))]
        id: i64,
        /// Category topic (unique).
        #[arg(long)]
        topic: String,
    },
    /// Add a concept under an existing category.
    Concept {
        #[command(flatten)]
        storage: StorageArgs,
        /// Concept id (next free id when omitted).
        #[arg(long, value_parser = clap::value_parser!(i64).range(1..))]
        id: Option<i64>,
        #[arg(long)]
        topic: String,
        /// Owning category, by topic.
        #[arg(long, required_unless_present = "category_id", conflicts_with = "category_id")]
        category: Option<String>,
        /// Owning category, by id.
        #[arg(long)]
        category_id: Option<i64>,
        #[arg(long, default_value = "")]
        details: String,
    },
    /// Add a component to a concept.
    Component {
        #[command(flatten)]
        storage: StorageArgs,
        /// Owning concept id (the most recently added concept when omitted).
        #[arg(long)]
        concept: Option<i64>,
        #[arg(long)]
        topic: String,
        #[arg(long, default_value = "")]
        details: String,
    },
}

impl AddRecord {
    fn storage(&self) -> &StorageArgs {
        match self {
            AddRecord::Category { storage, .. }
            | AddRecord::Concept { storage, .. }
            | AddRecord::Component { storage, .. } => storage,
        }
    }

    fn into_command(self) -> RecordCommand {
        match self {
            AddRecord::Category { id, topic, .. } => CategoryCommand::Add {
                id: CategoryId(id),
                topic,
            }
            .into(),
            AddRecord::Concept {
                id,
                topic,
                category,
                category_id,
                details,
                ..
            } => {
                let category = match (category, category_id) {
                    (Some(topic), _) => CategoryKey::topic(topic),
                    (None, Some(id)) => CategoryKey::Id(CategoryId(id)),
                    (None, None) => CategoryKey::topic(String::new()),
                };
                let mut new = NewConcept::new(topic, category, details);
                if let Some(id) = id {
                    new = new.with_id(id);
                }
                ConceptCommand::Add(new).into()
            }
            AddRecord::Component {
                concept,
                topic,
                details,
                ..
            } => ComponentCommand::Add {
                target: concept.map_or(ComponentTarget::LastConcept, |id| {
                    ComponentTarget::Concept(ConceptId(id))
                }),
                topic,
                details,
            }
            .into(),
        }
    }
}

/// Selects components by id, or by topic optionally scoped to a concept.
#[derive(Debug, Args)]
struct ComponentSelector {
    /// Component id.
    #[arg(long, required_unless_present = "topic", conflicts_with = "topic")]
    id: Option<i64>,
    /// Current component topic.
    #[arg(long)]
    topic: Option<String>,
    /// Only match components of this concept.
    #[arg(long, requires = "topic")]
    concept: Option<i64>,
}

impl ComponentSelector {
    fn key(self) -> ComponentKey {
        match (self.id, self.topic, self.concept) {
            (Some(id), _, _) => ComponentKey::Id(ComponentId(id)),
            (None, Some(topic), Some(concept)) => {
                ComponentKey::topic_in(ConceptId(concept), topic)
            }
            // clap requires a topic alongside --concept.
            (None, topic, _) => ComponentKey::topic(topic.unwrap_or_default()),
        }
    }
}

#[derive(Debug, Args)]
struct UpdateArgs {
    #[command(subcommand)]
    record: UpdateRecord,
}

#[derive(Debug, Subcommand)]
enum UpdateRecord {
    /// Rename a category.
    Category {
        #[command(flatten)]
        storage: StorageArgs,
        #[arg(long)]
        id: i64,
        /// New topic.
        #[arg(long)]
        topic: String,
    },
    /// Replace a concept's topic and details.
    Concept {
        #[command(flatten)]
        storage: StorageArgs,
        #[arg(long)]
        id: i64,
        /// New topic.
        #[arg(long)]
        topic: String,
        /// New details.
        #[arg(long, default_value = "")]
        details: String,
    },
    /// Replace the topic and details of matching components.
    Component {
        #[command(flatten)]
        storage: StorageArgs,
        #[command(flatten)]
        selector: ComponentSelector,
        /// New topic.
        #[arg(long)]
        new_topic: String,
        /// New details.
        #[arg(long, default_value = "")]
        details: String,
    },
}

impl UpdateRecord {
    fn storage(&self) -> &StorageArgs {
        match self {
            UpdateRecord::Category { storage, .. }
            | UpdateRecord::Concept { storage, .. }
            | UpdateRecord::Component { storage, .. } => storage,
        }
    }

    fn into_command(self) -> RecordCommand {
        match self {
            UpdateRecord::Category { id, topic, .. } => CategoryCommand::Update {
                id: CategoryId(id),
                topic,
            }
            .into(),
            UpdateRecord::Concept {
                id, topic, details, ..
            } => ConceptCommand::Update {
                id: ConceptId(id),
                topic,
                details,
            }
            .into(),
            UpdateRecord::Component {
                selector,
                new_topic,
                details,
                ..
            } => ComponentCommand::Update {
                key: selector.key(),
                topic: new_topic,
                details,
            }
            .into(),
        }
    }
}

#[derive(Debug, Args)]
struct RemoveArgs {
    #[command(subcommand)]
    record: RemoveRecord,
}

#[derive(Debug, Subcommand)]
enum RemoveRecord {
    /// Remove a category with its concepts and their components.
    Category {
        #[command(flatten)]
        storage: StorageArgs,
        #[arg(long)]
        id: i64,
    },
    /// Remove a concept with its components.
    Concept {
        #[command(flatten)]
        storage: StorageArgs,
        #[arg(long)]
        id: i64,
    },
    /// Remove matching components.
    Component {
        #[command(flatten)]
        storage: StorageArgs,
        #[command(flatten)]
        selector: ComponentSelector,
    },
}

impl RemoveRecord {
    fn storage(&self) -> &StorageArgs {
        match self {
            RemoveRecord::Category { storage, .. }
            | RemoveRecord::Concept { storage, .. }
            | RemoveRecord::Component { storage, .. } => storage,
        }
    }

    fn into_command(self) -> RecordCommand {
        match self {
            RemoveRecord::Category { id, .. } => {
                CategoryCommand::Delete { id: CategoryId(id) }.into()
            }
            RemoveRecord::Concept { id, .. } => ConceptCommand::Delete { id: ConceptId(id) }.into(),
            RemoveRecord::Component { selector, .. } => ComponentCommand::Delete {
                key: selector.key(),
            }
            .into(),
        }
    }
}

#[derive(Debug, Args)]
struct RecommendArgs {
    /// Seed for a reproducible pick.
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Debug, Args)]
struct ConvertArgs {
    #[command(flatten)]
    storage: StorageArgs,
    /// Destination path.
    #[arg(long)]
    to: PathBuf,
    /// Destination format (inferred from the extension when omitted).
    #[arg(long)]
    to_format: Option<CliStorageFormat>,
}

#[derive(Debug, Args)]
struct MigrateArgs {
    #[command(subcommand)]
    operation: MigrateOperation,
}

#[derive(Debug, Subcommand)]
enum MigrateOperation {
    /// Create tables (if missing).
    Up(MigrateDbArgs),
    /// Drop tables.
    Down(MigrateDbArgs),
    /// Show table status and row counts.
    Status(MigrateDbArgs),
}

#[derive(Debug, Args)]
struct MigrateDbArgs {
    /// Database file path.
    #[arg(long)]
    db: PathBuf,
    /// Table prefix.
    #[arg(long, default_value = DEFAULT_TABLE_PREFIX)]
    prefix: String,
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), String> {
    let config = load_config(cli.command.storage().and_then(|s| s.config.as_ref()))?;
    logging::init_tracing(cli.log_level.as_deref(), &config.logging.level)?;

    match cli.command {
        Command::Init(args) => run_init(&args.storage, &config),
        Command::Shell(args) => run_shell(&args.storage, &config),
        Command::Add(args) => {
            let storage = args.record.storage().clone();
            run_mutation(&storage, &config, args.record.into_command())
        }
        Command::Update(args) => {
            let storage = args.record.storage().clone();
            run_mutation(&storage, &config, args.record.into_command())
        }
        Command::Remove(args) => {
            let storage = args.record.storage().clone();
            run_mutation(&storage, &config, args.record.into_command())
        }
        Command::Print(args) => run_view(&args.storage, &config, render_listing),
        Command::Table(args) => run_view(&args.storage, &config, render_tables),
        Command::Recommend(args) => run_recommend(&args),
        Command::Convert(args) => run_convert(&args, &config),
        Command::Migrate(args) => run_migrate(args),
    }
}

// ---------------------------------------------------------------------------
// data commands
// ---------------------------------------------------------------------------

fn run_init(args: &StorageArgs, config: &ToolConfig) -> Result<(), String> {
    let storage = args.resolve(config)?;
    let mut backend = open_backend(&storage)?;
    if backend.exists() {
        return Err(format!("{} already exists", backend.describe()));
    }
    backend
        .save_all(&RecordStore::new())
        .map_err(|e| format!("Failed to create {}: {e}", backend.describe()))?;
    println!("Created empty {}.", backend.describe());
    Ok(())
}

fn run_shell(args: &StorageArgs, config: &ToolConfig) -> Result<(), String> {
    let mut session = open_session(&args.resolve(config)?)?;
    if let Some(store) = session.store() {
        print!("{}", render_tables(store));
    }
    let stdin = io::stdin();
    let stdout = io::stdout();
    Shell::new(&mut session, stdin.lock(), stdout.lock())
        .run()
        .map_err(|e| format!("Console I/O failed: {e}"))
}

fn run_mutation(
    args: &StorageArgs,
    config: &ToolConfig,
    command: RecordCommand,
) -> Result<(), String> {
    let mut session = open_session(&args.resolve(config)?)?;
    let change = session.apply(command).map_err(|e| e.to_string())?;
    println!("{change}");
    println!("Data saved successfully.");
    Ok(())
}

fn run_view(
    args: &StorageArgs,
    config: &ToolConfig,
    render: fn(&RecordStore) -> String,
) -> Result<(), String> {
    let session = open_session(&args.resolve(config)?)?;
    if let Some(store) = session.store() {
        print!("{}", render(store));
    }
    Ok(())
}

fn run_recommend(args: &RecommendArgs) -> Result<(), String> {
    let catalog = DiagramCatalog::standard();
    let pick = match args.seed {
        Some(seed) => catalog.pick(&mut StdRng::seed_from_u64(seed)),
        None => catalog.pick(&mut rand::thread_rng()),
    };
    let name = pick.ok_or_else(|| "No diagram types are configured".to_string())?;
    println!("Recommended Diagram for Visualization: {name}");
    Ok(())
}

fn run_convert(args: &ConvertArgs, config: &ToolConfig) -> Result<(), String> {
    let source = args.storage.resolve(config)?;
    let target = config
        .resolve(&StorageOverrides {
            format: args.to_format.map(StorageFormat::from),
            path: Some(args.to.clone()),
            no_backup: args.storage.no_backup,
            table_prefix: args.storage.prefix.clone(),
        })
        .map_err(|e| format!("Invalid destination settings: {e}"))?;

    let session = open_session(&source)?;
    let store = session
        .store()
        .ok_or_else(|| "Source was not loaded".to_string())?;
    let mut backend = open_backend(&target)?;
    backend
        .save_all(store)
        .map_err(|e| format!("Failed to write {}: {e}", backend.describe()))?;

    let counts = store.counts();
    println!(
        "Converted {} category(ies), {} concept(s), {} component(s) into {}.",
        counts.categories,
        counts.concepts,
        counts.components,
        backend.describe()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// migrate command
// ---------------------------------------------------------------------------

fn run_migrate(args: MigrateArgs) -> Result<(), String> {
    match args.operation {
        MigrateOperation::Up(a) => run_migrate_up(a),
        MigrateOperation::Down(a) => run_migrate_down(a),
        MigrateOperation::Status(a) => run_migrate_status(a),
    }
}

fn open_migration_db(args: &MigrateDbArgs) -> Result<rusqlite::Connection, String> {
    rusqlite::Connection::open(&args.db)
        .map_err(|e| format!("Failed to open database '{}': {e}", args.db.display()))
}

fn run_migrate_up(args: MigrateDbArgs) -> Result<(), String> {
    let conn = open_migration_db(&args)?;
    let migration = concept_breakdown_sqlite::Migration::new(&conn, &args.prefix)
        .map_err(|e| format!("Failed to initialize migration: {e}"))?;
    migration
        .up()
        .map_err(|e| format!("Migration up failed: {e}"))?;
    println!(
        "Migration up complete. Tables created with prefix '{}' in '{}'.",
        args.prefix,
        args.db.display()
    );
    Ok(())
}

fn run_migrate_down(args: MigrateDbArgs) -> Result<(), String> {
    let conn = open_migration_db(&args)?;
    let migration = concept_breakdown_sqlite::Migration::new(&conn, &args.prefix)
        .map_err(|e| format!("Failed to initialize migration: {e}"))?;
    migration
        .down()
        .map_err(|e| format!("Migration down failed: {e}"))?;
    println!(
        "Migration down complete. Tables with prefix '{}' dropped from '{}'.",
        args.prefix,
        args.db.display()
    );
    Ok(())
}

fn run_migrate_status(args: MigrateDbArgs) -> Result<(), String> {
    let conn = open_migration_db(&args)?;
    let migration = concept_breakdown_sqlite::Migration::new(&conn, &args.prefix)
        .map_err(|e| format!("Failed to initialize migration: {e}"))?;
    let status = migration
        .status()
        .map_err(|e| format!("Failed to get migration status: {e}"))?;
    println!("Migration Status:");
    println!(
        "  Tables exist: {}",
        if status.tables_exist { "yes" } else { "no" }
    );
    println!("  Category count: {}", status.category_count);
    println!("  Concept count: {}", status.concept_count);
    println!("  Component count: {}", status.component_count);
    Ok(())
}
