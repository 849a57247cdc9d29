// file: src/main.rs
// description: commandline application entry point with command handling
// reference: application bootstrap and orchestration

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{error, info, warn};
use whattodo::client::{display, prompt};
use whattodo::utils::logging::{format_error, format_info, format_success, format_warning};
use whattodo::utils::parse_date;
use whattodo::{
    AppState, Config, HealthCheck, HealthReport, HealthStatus, JsonExporter, LanceDbClient,
    NewTask, OperationTimer, SchemaManager, TaskApiClient, TaskStatus, TaskUpdate,
};

#[derive(Parser)]
#[command(name = "whattodo")]
#[command(version = "0.1.0")]
#[command(about = "Personal task tracker: REST API over LanceDB and a terminal client", long_about = None)]
struct Cli {
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "config/default.toml"
    )]
    config: PathBuf,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    color: bool,

    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the REST API server
    Serve {
        #[arg(long)]
        port: Option<u16>,
    },

    Verify {
        #[arg(long)]
        create_schema: bool,
    },

    Stats,

    Reset {
        #[arg(long)]
        confirm: bool,
    },

    /// Write all tasks and categories to a JSON file
    Export {
        #[arg(short, long, default_value = "./exports")]
        output: PathBuf,

        #[arg(short, long)]
        pretty: bool,
    },

    /// Manage tasks through the running API
    #[command(subcommand)]
    Tasks(TaskCommands),

    /// Manage categories through the running API
    #[command(subcommand)]
    Categories(CategoryCommands),
}

#[derive(Subcommand)]
enum TaskCommands {
    List {
        /// New, In-Progress, Done or All
        #[arg(short, long)]
        status: Option<String>,
    },

    Add {
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        content: String,

        /// YYYY-MM-DD or RFC 3339
        #[arg(long)]
        start: Option<String>,

        #[arg(long)]
        end: Option<String>,

        #[arg(long)]
        category: Option<String>,
    },

    Edit {
        id: String,

        #[arg(short, long)]
        name: Option<String>,

        #[arg(short, long)]
        content: Option<String>,

        #[arg(long, conflicts_with = "clear_start")]
        start: Option<String>,

        #[arg(long, conflicts_with = "clear_end")]
        end: Option<String>,

        #[arg(long, conflicts_with = "clear_category")]
        category: Option<String>,

        #[arg(long)]
        clear_start: bool,

        #[arg(long)]
        clear_end: bool,

        #[arg(long)]
        clear_category: bool,
    },

    Delete {
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Case-insensitive search on task names
    Search { name: String },

    /// Tasks starting on or after --start and ending on or before --end
    Range {
        #[arg(long)]
        start: String,

        #[arg(long)]
        end: String,
    },

    Page {
        #[arg(short, long, default_value_t = 1)]
        page: usize,

        /// Defaults to the server's page size
        #[arg(short, long)]
        limit: Option<usize>,
    },
}

#[derive(Subcommand)]
enum CategoryCommands {
    List,
    Add { name: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    whattodo::utils::logging::init_logger(cli.color, cli.verbose);

    let path = if cli.config.exists() {
        Some(cli.config.as_path())
    } else {
        warn!(
            "Config file {} not found, using defaults and environment",
            cli.config.display()
        );
        None
    };
    let mut config = Config::load(path).context("Failed to load configuration")?;

    match cli.command {
        Commands::Serve { port } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            config.validate().context("Invalid configuration")?;
            whattodo::api::serve(&config)
                .await
                .context("Task API server failed")?;
        }
        Commands::Verify { create_schema } => {
            cmd_verify(&config, create_schema).await?;
        }
        Commands::Stats => {
            cmd_stats(&config).await?;
        }
        Commands::Reset { confirm } => {
            cmd_reset(&config, confirm).await?;
        }
        Commands::Export { output, pretty } => {
            cmd_export(&config, output, pretty).await?;
        }
        Commands::Tasks(command) => {
            let client = TaskApiClient::new(&config.client)?;
            if let Err(e) = cmd_tasks(&client, command).await {
                eprintln!("{}", format_error(&e.to_string()));
                std::process::exit(1);
            }
        }
        Commands::Categories(command) => {
            let client = TaskApiClient::new(&config.client)?;
            if let Err(e) = cmd_categories(&client, command).await {
                eprintln!("{}", format_error(&e.to_string()));
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

async fn connect(config: &Config) -> Result<LanceDbClient> {
    let client = LanceDbClient::new(config.database.clone())
        .await
        .context("Failed to create LanceDB client")?;

    client.ping().await.context("Cannot connect to LanceDB")?;

    Ok(client)
}

async fn cmd_verify(config: &Config, create_schema: bool) -> Result<()> {
    info!("Verifying database schema");

    let client = connect(config).await?;
    info!("Database connection successful");

    let schema_manager = SchemaManager::new(&client);

    if schema_manager.verify_schema().await? {
        info!("Schema verification passed - all tables exist");
    } else {
        warn!("Schema verification failed - some tables are missing");

        if create_schema {
            info!("Creating schema");
            schema_manager
                .initialize()
                .await
                .context("Failed to create schema")?;
            info!("Schema created successfully");
        } else {
            info!("Use --create-schema to create missing tables");
        }
    }

    Ok(())
}

async fn cmd_stats(config: &Config) -> Result<()> {
    info!("Gathering statistics");
    let timer = OperationTimer::new("statistics");

    let start = Instant::now();
    let client = connect(config).await?;
    let database = HealthCheck::new("database", HealthStatus::Healthy, start.elapsed());

    let state = AppState::new(client, config.pagination.clone());
    let start = Instant::now();
    let tasks = state.tasks.list(None).await?;
    let categories = state.categories.list().await?;
    let scan = HealthCheck::new("tasks", HealthStatus::Healthy, start.elapsed())
        .with_message(format!("{} tasks scanned", tasks.len()));

    timer.warn_if_slow(Duration::from_secs(2), "full task scan");

    let report = HealthReport::new(vec![database, scan], env!("CARGO_PKG_VERSION").to_string());
    print!("{}", report);

    println!("{}", format_info(&format!("Total tasks: {}", tasks.len())));
    for status in TaskStatus::ALL {
        let count = tasks.iter().filter(|t| t.status == status).count();
        println!("   {} {}: {}", display::status_icon(status), status, count);
    }
    println!(
        "{}",
        format_info(&format!("Total categories: {}", categories.len()))
    );

    timer.finish();
    Ok(())
}

async fn cmd_reset(config: &Config, confirm: bool) -> Result<()> {
    if !confirm {
        error!("This will delete all data. Use --confirm to proceed");
        return Ok(());
    }

    warn!("Resetting database - all data will be lost");

    let client = connect(config).await?;
    let schema_manager = SchemaManager::new(&client);
    schema_manager
        .drop_all_tables()
        .await
        .context("Failed to drop tables")?;

    info!("All tables dropped");

    schema_manager
        .initialize()
        .await
        .context("Failed to recreate schema")?;

    info!("Schema recreated - database reset complete");

    Ok(())
}

async fn cmd_export(config: &Config, output: PathBuf, pretty: bool) -> Result<()> {
    info!("Initializing JSON export");

    let client = connect(config).await?;
    let state = AppState::new(client, config.pagination.clone());

    let exporter = JsonExporter::new(output)?;
    let manifest = exporter
        .export_all(&state.tasks, &state.categories, pretty)
        .await
        .context("Export failed")?;

    info!(
        "Export complete: {} tasks, {} categories in {:?}",
        manifest.total_tasks, manifest.total_categories, manifest.files
    );

    Ok(())
}

async fn cmd_tasks(client: &TaskApiClient, command: TaskCommands) -> Result<()> {
    match command {
        TaskCommands::List { status } => {
            let filter =
                TaskStatus::parse_filter(status.as_deref()).map_err(anyhow::Error::msg)?;
            let tasks = client.get_tasks(filter.map(|s| s.as_str())).await?;
            println!("{}", display::format_task_list(&tasks, filter));
        }
        TaskCommands::Add {
            name,
            content,
            start,
            end,
            category,
        } => {
            let task = NewTask {
                name: Some(name),
                content: Some(content),
                start_date: start.as_deref().map(parse_date).transpose()?,
                end_date: end.as_deref().map(parse_date).transpose()?,
                category,
            };
            let created = client.create_task(&task).await?;
            println!("{}", format_success("Task created"));
            println!("{}", display::format_task(&created));
        }
        TaskCommands::Edit {
            id,
            name,
            content,
            start,
            end,
            category,
            clear_start,
            clear_end,
            clear_category,
        } => {
            let update = TaskUpdate {
                name,
                content,
                start_date: patch(start, clear_start)?,
                end_date: patch(end, clear_end)?,
                category: if clear_category {
                    Some(None)
                } else {
                    category.map(Some)
                },
            };

            if update.is_empty() {
                println!("{}", format_warning("Nothing to update"));
                return Ok(());
            }

            let edited = client.edit_task(&id, &update).await?;
            println!("{}", format_success("Task updated"));
            println!("{}", display::format_task(&edited));
        }
        TaskCommands::Delete { id, yes } => {
            if !yes && !prompt::confirm("Are you sure you want to delete this task?")? {
                println!("{}", format_warning("Delete cancelled"));
                return Ok(());
            }
            let message = client.delete_task(&id).await?;
            println!("{}", format_success(&message));
        }
        TaskCommands::Search { name } => {
            let tasks = client.search_tasks_by_name(&name).await?;
            if tasks.is_empty() {
                println!("No tasks matching \"{}\"", name);
            } else {
                println!("{}", display::format_task_list(&tasks, None));
            }
        }
        TaskCommands::Range { start, end } => {
            let tasks = client.tasks_by_date_range(&start, &end).await?;
            println!("{}", display::format_task_list(&tasks, None));
        }
        TaskCommands::Page { page, limit } => {
            let result = client.tasks_page(page, limit).await?;
            println!("{}", display::format_task_list(&result.tasks, None));
            println!("\n{}", display::format_pagination(&result.pagination));
        }
    }

    Ok(())
}

async fn cmd_categories(client: &TaskApiClient, command: CategoryCommands) -> Result<()> {
    match command {
        CategoryCommands::List => {
            let categories = client.get_categories().await?;
            println!("{}", display::format_categories(&categories));
        }
        CategoryCommands::Add { name } => {
            let category = client.create_category(&name).await?;
            println!(
                "{}",
                format_success(&format!("Category '{}' created", category.category_name))
            );
        }
    }

    Ok(())
}

fn patch(
    value: Option<String>,
    clear: bool,
) -> Result<Option<Option<chrono::DateTime<chrono::Utc>>>> {
    if clear {
        return Ok(Some(None));
    }
    Ok(value.as_deref().map(parse_date).transpose()?.map(Some))
}
