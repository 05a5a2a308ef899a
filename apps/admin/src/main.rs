use std::{path::Path, path::PathBuf, sync::Arc};

use anyhow::{anyhow, bail, Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use client_core::{
    notice, AdminGate, BoardEditor, BoardField, EventField, EventsEditor, HeroEditor, HeroField,
    HttpBackend, Notice, NoticeKind, PendingUpload, QuickEditor, QuickForm, SiteBackend,
    SiteSnapshot,
};
use shared::{
    calendar::{EventListView, EventTab},
    domain::{BoardMemberId, EventId, MediaKind, QuickItemId, QuickSection},
    protocol::QuickItemPatch,
};
use tracing::info;

#[derive(Parser, Debug)]
#[command(about = "Manage the club site's content")]
struct Cli {
    #[arg(long, env = "SITE_URL", default_value = "http://127.0.0.1:8080")]
    site_url: String,
    /// Password configured for the admin panel.
    #[arg(long, env = "ADMIN_PASSWORD", hide_env_values = true, default_value = "")]
    admin_password: String,
    /// Password entered to unlock editing commands.
    #[arg(long)]
    password: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the public view of the site.
    Site {
        #[arg(long, value_enum, default_value_t = TabArg::Upcoming)]
        tab: TabArg,
        /// Number of "show more" expansions of the events list.
        #[arg(long, default_value_t = 0)]
        more: usize,
    },
    #[command(subcommand)]
    Board(BoardCommand),
    #[command(subcommand)]
    Events(EventsCommand),
    #[command(subcommand)]
    Quick(QuickCommand),
    #[command(subcommand)]
    Hero(HeroCommand),
}

#[derive(Subcommand, Debug)]
enum BoardCommand {
    List,
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        position: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long)]
        initial: Option<String>,
        #[arg(long)]
        linkedin: Option<String>,
        #[arg(long)]
        instagram: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        photo: Option<PathBuf>,
    },
    Edit {
        id: i64,
        #[arg(value_enum)]
        field: BoardFieldArg,
        value: String,
    },
    Photo {
        id: i64,
        path: PathBuf,
    },
    Delete {
        id: i64,
    },
}

#[derive(Subcommand, Debug)]
enum EventsCommand {
    List,
    Add {
        #[arg(long)]
        title: String,
        /// `YYYY-MM-DD` or an RFC 3339 timestamp.
        #[arg(long)]
        date: String,
        #[arg(long, default_value = "")]
        time: String,
        #[arg(long, default_value = "")]
        location: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    Edit {
        id: i64,
        #[arg(value_enum)]
        field: EventFieldArg,
        value: String,
    },
    Delete {
        id: i64,
    },
}

#[derive(Subcommand, Debug)]
enum QuickCommand {
    List,
    Add {
        #[arg(long, value_enum)]
        section: SectionArg,
        #[arg(long, value_enum, default_value_t = MediaArg::Image)]
        media_type: MediaArg,
        #[arg(long, default_value = "")]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value_t = 0)]
        sequence: i64,
        #[arg(long)]
        file: Option<PathBuf>,
    },
    Edit {
        id: i64,
        #[arg(long, value_enum)]
        section: Option<SectionArg>,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        sequence: Option<i64>,
        #[arg(long)]
        thumbnail: Option<String>,
    },
    Delete {
        id: i64,
    },
}

#[derive(Subcommand, Debug)]
enum HeroCommand {
    Show,
    Set {
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        subtitle: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        cta_text: Option<String>,
        #[arg(long)]
        background_image: Option<String>,
        /// Local image uploaded as the new background.
        #[arg(long)]
        image: Option<PathBuf>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum TabArg {
    Upcoming,
    Previous,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum BoardFieldArg {
    Name,
    Position,
    Description,
    ImageUrl,
    Initial,
    Sequence,
    Linkedin,
    Instagram,
    Email,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum EventFieldArg {
    Title,
    Date,
    Time,
    Location,
    Description,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum SectionArg {
    Dances,
    Fun,
    Talent,
    Articles,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum MediaArg {
    Image,
    Video,
}

impl From<TabArg> for EventTab {
    fn from(value: TabArg) -> Self {
        match value {
            TabArg::Upcoming => EventTab::Upcoming,
            TabArg::Previous => EventTab::Previous,
        }
    }
}

impl From<BoardFieldArg> for BoardField {
    fn from(value: BoardFieldArg) -> Self {
        match value {
            BoardFieldArg::Name => BoardField::Name,
            BoardFieldArg::Position => BoardField::Position,
            BoardFieldArg::Description => BoardField::Description,
            BoardFieldArg::ImageUrl => BoardField::ImageUrl,
            BoardFieldArg::Initial => BoardField::Initial,
            BoardFieldArg::Sequence => BoardField::Sequence,
            BoardFieldArg::Linkedin => BoardField::LinkedIn,
            BoardFieldArg::Instagram => BoardField::Instagram,
            BoardFieldArg::Email => BoardField::Email,
        }
    }
}

impl From<EventFieldArg> for EventField {
    fn from(value: EventFieldArg) -> Self {
        match value {
            EventFieldArg::Title => EventField::Title,
            EventFieldArg::Date => EventField::Date,
            EventFieldArg::Time => EventField::Time,
            EventFieldArg::Location => EventField::Location,
            EventFieldArg::Description => EventField::Description,
        }
    }
}

impl From<SectionArg> for QuickSection {
    fn from(value: SectionArg) -> Self {
        match value {
            SectionArg::Dances => QuickSection::Dances,
            SectionArg::Fun => QuickSection::Fun,
            SectionArg::Talent => QuickSection::Talent,
            SectionArg::Articles => QuickSection::Articles,
        }
    }
}

impl From<MediaArg> for MediaKind {
    fn from(value: MediaArg) -> Self {
        match value {
            MediaArg::Image => MediaKind::Image,
            MediaArg::Video => MediaKind::Video,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
    let cli = Cli::parse();

    let backend: Arc<dyn SiteBackend> = Arc::new(HttpBackend::new(&cli.site_url));
    info!(site_url = %cli.site_url, "admin: connected backend");

    if let Command::Site { tab, more } = cli.command {
        return print_site(backend.as_ref(), tab.into(), more).await;
    }

    let mut gate = AdminGate::new(cli.admin_password);
    gate.unlock(cli.password.as_deref().unwrap_or_default())
        .map_err(|message| anyhow!(message))?;

    match cli.command {
        Command::Site { .. } => Ok(()),
        Command::Board(command) => run_board(backend, command).await,
        Command::Events(command) => run_events(backend, command).await,
        Command::Quick(command) => run_quick(backend, command).await,
        Command::Hero(command) => run_hero(backend, command).await,
    }
}

/// Prints a notice and turns an error notice into a failing exit.
fn report(notice: Notice) -> Result<()> {
    match notice.kind {
        NoticeKind::Success => {
            println!("{}", notice.message);
            Ok(())
        }
        NoticeKind::Error => bail!(notice.message),
    }
}

async fn read_upload(path: &Path) -> Result<PendingUpload> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read '{}'", path.display()))?;
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());
    let mime_type = mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string();
    Ok(PendingUpload::new(filename, mime_type, bytes))
}

async fn print_site(backend: &dyn SiteBackend, tab: EventTab, more: usize) -> Result<()> {
    let snapshot = SiteSnapshot::fetch(backend).await?;

    let hero = &snapshot.hero;
    println!("# {}", hero.title);
    if !hero.subtitle.is_empty() {
        println!("{}", hero.subtitle);
    }
    if !hero.cta_text.is_empty() {
        println!("[{}]", hero.cta_text);
    }

    println!("\n## Board");
    for member in &snapshot.board {
        println!("  ({}) {} - {}", member.initial, member.name, member.position);
    }

    println!("\n## Projects");
    for project in &snapshot.projects {
        println!(
            "  {} ({} images): {}",
            project.title,
            project.images.len(),
            project.description
        );
    }

    let events = snapshot.events_at(Utc::now());
    let mut view = EventListView::default();
    view.select_tab(tab);
    for _ in 0..more {
        view.show_more();
    }
    println!("\n## Events ({:?})", view.tab());
    for event in view.visible(&events) {
        println!(
            "  {} {} {} @ {}",
            event.date, event.time, event.title, event.location
        );
    }
    if view.has_more(&events) {
        println!("  ... run with --more {} to see more", more + 1);
    }

    println!("\n## Gallery");
    for section in snapshot.gallery_sections() {
        println!("  {}", section.section.label());
        for item in &section.items {
            println!(
                "    [{}] {} {}",
                item.media_type.as_str(),
                item.title.as_deref().unwrap_or("(untitled)"),
                item.media_url
            );
        }
    }
    Ok(())
}

async fn run_board(backend: Arc<dyn SiteBackend>, command: BoardCommand) -> Result<()> {
    let mut editor = BoardEditor::new(backend);
    editor.load().await?;

    let find = |editor: &BoardEditor, id: i64| {
        editor
            .drafts()
            .iter()
            .position(|draft| draft.member.id == Some(BoardMemberId(id)))
            .ok_or_else(|| anyhow!("no board member with id {id}"))
    };

    match command {
        BoardCommand::List => {
            for member in editor.members() {
                println!(
                    "{:>4} #{:<3} {} - {} {}",
                    member.id.map(|id| id.0).unwrap_or_default(),
                    member.sequence,
                    member.name,
                    member.position,
                    member.image_url
                );
            }
            Ok(())
        }
        BoardCommand::Add {
            name,
            position,
            description,
            initial,
            linkedin,
            instagram,
            email,
            photo,
        } => {
            let index = editor.add();
            let initial = initial.unwrap_or_else(|| name.clone());
            editor.update_field(index, BoardField::Name, name)?;
            editor.update_field(index, BoardField::Position, position)?;
            editor.update_field(index, BoardField::Description, description)?;
            editor.update_field(index, BoardField::Initial, initial)?;
            editor.update_field(index, BoardField::LinkedIn, linkedin.unwrap_or_default())?;
            editor.update_field(index, BoardField::Instagram, instagram.unwrap_or_default())?;
            editor.update_field(index, BoardField::Email, email.unwrap_or_default())?;
            if let Some(path) = photo {
                editor.select_photo(index, read_upload(&path).await?)?;
            }
            report(notice::board_saved(&editor.save_all().await))
        }
        BoardCommand::Edit { id, field, value } => {
            let index = find(&editor, id)?;
            editor.update_field(index, field.into(), value)?;
            report(notice::board_saved(&editor.save_all().await))
        }
        BoardCommand::Photo { id, path } => {
            let index = find(&editor, id)?;
            editor.select_photo(index, read_upload(&path).await?)?;
            report(notice::board_saved(&editor.save_all().await))
        }
        BoardCommand::Delete { id } => {
            let index = find(&editor, id)?;
            report(notice::board_member_deleted(&editor.delete(index).await))
        }
    }
}

async fn run_events(backend: Arc<dyn SiteBackend>, command: EventsCommand) -> Result<()> {
    let mut editor = EventsEditor::new(backend);
    editor.load().await?;

    let find = |editor: &EventsEditor, id: i64| {
        editor
            .drafts()
            .iter()
            .position(|draft| draft.event.id == Some(EventId(id)))
            .ok_or_else(|| anyhow!("no event with id {id}"))
    };

    match command {
        EventsCommand::List => {
            for draft in editor.drafts() {
                let event = &draft.event;
                println!(
                    "{:>4} {} {} {} @ {}",
                    event.id.map(|id| id.0).unwrap_or_default(),
                    event.date,
                    event.time,
                    event.title,
                    event.location
                );
            }
            Ok(())
        }
        EventsCommand::Add {
            title,
            date,
            time,
            location,
            description,
        } => {
            let index = editor.add();
            editor.update_field(index, EventField::Title, title)?;
            editor.update_field(index, EventField::Date, date)?;
            editor.update_field(index, EventField::Time, time)?;
            editor.update_field(index, EventField::Location, location)?;
            editor.update_field(index, EventField::Description, description)?;
            report(notice::event_saved(&editor.save(index).await))
        }
        EventsCommand::Edit { id, field, value } => {
            let index = find(&editor, id)?;
            editor.update_field(index, field.into(), value)?;
            report(notice::event_saved(&editor.save(index).await))
        }
        EventsCommand::Delete { id } => {
            let index = find(&editor, id)?;
            report(notice::event_deleted(&editor.delete(index).await))
        }
    }
}

async fn run_quick(backend: Arc<dyn SiteBackend>, command: QuickCommand) -> Result<()> {
    let mut editor = QuickEditor::new(backend);

    match command {
        QuickCommand::List => {
            editor.load().await?;
            for item in editor.items() {
                println!(
                    "{:>4} {:<8} {:<5} #{:<3} {} {}",
                    item.id.0,
                    item.section.as_str(),
                    item.media_type.as_str(),
                    item.sequence,
                    item.title.as_deref().unwrap_or("(untitled)"),
                    item.media_url
                );
            }
            Ok(())
        }
        QuickCommand::Add {
            section,
            media_type,
            title,
            description,
            sequence,
            file,
        } => {
            let mut form = QuickForm::new(section.into(), media_type.into());
            form.title = title;
            form.description = description;
            form.sequence = sequence;
            let file = match file {
                Some(path) => Some(read_upload(&path).await?),
                None => None,
            };
            report(notice::quick_item_created(&editor.submit(form, file).await))
        }
        QuickCommand::Edit {
            id,
            section,
            title,
            description,
            sequence,
            thumbnail,
        } => {
            let patch = QuickItemPatch {
                id: Some(QuickItemId(id)),
                section: section.map(Into::into),
                title,
                description,
                sequence,
                thumbnail_url: thumbnail,
                ..QuickItemPatch::default()
            };
            let updated = editor.update(patch).await?;
            println!("Updated item {}", updated.id.0);
            Ok(())
        }
        QuickCommand::Delete { id } => {
            report(notice::quick_item_deleted(
                &editor.delete(QuickItemId(id)).await,
            ))
        }
    }
}

async fn run_hero(backend: Arc<dyn SiteBackend>, command: HeroCommand) -> Result<()> {
    let mut editor = HeroEditor::new(backend);
    editor.load().await?;

    match command {
        HeroCommand::Show => {
            let hero = editor.hero();
            println!("background:  {}", hero.background_image);
            println!("title:       {}", hero.title);
            println!("subtitle:    {}", hero.subtitle);
            println!("description: {}", hero.description);
            println!("cta:         {}", hero.cta_text);
            Ok(())
        }
        HeroCommand::Set {
            title,
            subtitle,
            description,
            cta_text,
            background_image,
            image,
        } => {
            let fields = [
                (HeroField::Title, title),
                (HeroField::Subtitle, subtitle),
                (HeroField::Description, description),
                (HeroField::CtaText, cta_text),
                (HeroField::BackgroundImage, background_image),
            ];
            for (field, value) in fields {
                if let Some(value) = value {
                    editor.set_field(field, value);
                }
            }
            if let Some(path) = image {
                editor.select_image(read_upload(&path).await?)?;
            }
            report(notice::hero_saved(&editor.save().await))
        }
    }
}
