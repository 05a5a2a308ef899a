use anyhow::Result;
use clap::{Parser, Subcommand};
use shared::domain::ProjectId;
use storage::Storage;

#[derive(Parser, Debug)]
struct Cli {
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite://./data/site.db")]
    database_url: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    CreateProject {
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "")]
        detail: String,
        /// Image URL; repeat for several images, kept in the given order.
        #[arg(long = "image")]
        images: Vec<String>,
    },
    AddProjectImage {
        project_id: i64,
        image_url: String,
    },
    DeleteProject {
        project_id: i64,
    },
    ListProjects,
    /// Print every table the site serves as JSON.
    Dump,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("warn").init();
    let cli = Cli::parse();
    let storage = Storage::new(&cli.database_url).await?;

    match cli.command {
        Command::CreateProject {
            title,
            description,
            detail,
            images,
        } => {
            let project_id = storage
                .create_project(&title, &description, &detail, &images)
                .await?;
            println!("created project_id={}", project_id.0);
        }
        Command::AddProjectImage {
            project_id,
            image_url,
        } => {
            storage
                .add_project_image(ProjectId(project_id), &image_url)
                .await?;
            println!("added image to project_id={project_id}");
        }
        Command::DeleteProject { project_id } => {
            let removed = storage.delete_project(ProjectId(project_id)).await?;
            println!("deleted {removed} project(s)");
        }
        Command::ListProjects => {
            let projects = storage.list_projects().await?;
            println!("{}", serde_json::to_string_pretty(&projects)?);
        }
        Command::Dump => {
            let dump = serde_json::json!({
                "hero": storage.load_hero().await?.unwrap_or_default(),
                "board_members": storage.list_board_members().await?,
                "events": storage.list_events().await?,
                "quick_items": storage.list_quick_items().await?,
                "projects": storage.list_projects().await?,
            });
            println!("{}", serde_json::to_string_pretty(&dump)?);
        }
    }

    Ok(())
}
