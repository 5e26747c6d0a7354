//! cinelist - manage personal movie, TV and people lists from the command line

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use cinelist::api;
use cinelist::client::{HttpClient, MemoryLists};
use cinelist::config::{ClientConfig, Paths};
use cinelist::models::{AuthUser, List, MediaItem, MediaType, UnknownMediaType};
use cinelist::session::Session;
use cinelist::workflow::{
    ListModal, ModalBody, ModalSettings, Notification, NotificationKind, Submission,
    SubmitOutcome,
};

/// cinelist - personal movie, TV and people lists
#[derive(Parser, Debug)]
#[command(name = "cinelist")]
#[command(version)]
#[command(about = "Manage personal movie, TV and people lists")]
struct Args {
    /// Base url of the lists API
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Session cookie to forward to the API
    #[arg(long, global = true)]
    cookie: Option<String>,

    /// Path to config directory
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug mode
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show every list and its items
    Lists,
    /// Add a movie, TV show or person to a list
    Add {
        /// Slug of an existing list
        #[arg(long, conflicts_with = "new_list", required_unless_present = "new_list")]
        list: Option<String>,
        /// Create a list with this name and add the item to it
        #[arg(long)]
        new_list: Option<String>,
        /// movie, tv or person
        #[arg(long = "type", value_parser = parse_media_type)]
        media_type: MediaType,
        #[arg(long)]
        tmdb_id: u64,
        #[arg(long)]
        title: String,
        #[arg(long)]
        subtitle: Option<String>,
        #[arg(long)]
        poster: Option<String>,
    },
    /// Create an empty list
    Create { name: String },
    /// Remove an item from a list
    Remove {
        #[arg(long)]
        list: String,
        /// Id of the item within the list
        #[arg(long)]
        item: String,
    },
    /// Rename a list, keeping its slug
    Rename { slug: String, name: String },
    /// Delete a list and its items
    Delete { slug: String },
    /// Serve an in-memory lists API for local development
    ServeDev {
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        #[arg(long, default_value_t = 4000)]
        port: u16,
        /// Answer every request as a signed-out visitor
        #[arg(long)]
        signed_out: bool,
    },
}

fn parse_media_type(s: &str) -> Result<MediaType, UnknownMediaType> {
    s.parse()
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.debug { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::new(format!(
        "{},hyper=warn,reqwest=warn,actix_server=warn",
        log_level
    ));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();

    let paths = Paths::init(args.config)?;
    info!("Config directory: {:?}", paths.config_dir());

    if let Command::ServeDev {
        host,
        port,
        signed_out,
    } = &args.command
    {
        let lists = if *signed_out {
            MemoryLists::new(AuthUser::SignedOut)
        } else {
            MemoryLists::signed_in()
        };
        return api::serve(Arc::new(lists), host, *port).await;
    }

    let config = {
        let global = ClientConfig::global();
        let mut config = global.write();
        if let Some(url) = args.api_url {
            config.api_url = url;
        }
        if let Some(cookie) = args.cookie {
            config.session_cookie = Some(cookie);
        }
        config.clone()
    };

    let client = HttpClient::from_config(&config)
        .with_context(|| format!("Invalid API settings for {}", config.api_url))?;
    let session = Session::bootstrap(Arc::new(client)).await?;

    run(args.command, &session, ModalSettings::from(&config)).await
}

async fn run(command: Command, session: &Session, settings: ModalSettings) -> Result<()> {
    match command {
        Command::Lists => {
            let Some(lists) = session.lists().lists() else {
                bail!("Lists are not available; are you signed in?");
            };
            if lists.is_empty() {
                println!("No lists yet");
            }
            for list in &lists {
                print_list(list);
            }
        }
        Command::Add {
            list,
            new_list,
            media_type,
            tmdb_id,
            title,
            subtitle,
            poster,
        } => {
            let mut item = MediaItem::new(media_type, tmdb_id, title);
            if let Some(subtitle) = subtitle {
                item = item.with_subtitle(subtitle);
            }
            if let Some(poster) = poster {
                item = item.with_poster(poster);
            }

            let submission = match (list, new_list) {
                (_, Some(name)) => Submission::CreateList { name },
                (Some(slug), None) => Submission::AddToList { slug },
                (None, None) => bail!("Pass --list or --new-list"),
            };

            let modal = session.list_modal(settings);
            modal.show_add_modal(item);
            submit(&modal, submission).await?;
        }
        Command::Create { name } => report(session.create_list(&name).await?)?,
        Command::Remove { list, item } => {
            let list = session
                .lists()
                .get(&list)
                .with_context(|| format!("No list with slug '{}'", list))?;
            let media = list
                .item(&item)
                .map(|i| i.to_media_item())
                .with_context(|| format!("No item '{}' in {}", item, list.name))?;

            let modal = session.list_modal(settings);
            modal.show_remove_modal(media, list);
            submit(&modal, Submission::Remove).await?;
        }
        Command::Rename { slug, name } => report(session.rename_list(&slug, &name).await?)?,
        Command::Delete { slug } => report(session.delete_list(&slug).await?)?,
        Command::ServeDev { .. } => bail!("serve-dev does not use a session"),
    }

    Ok(())
}

async fn submit(modal: &ListModal, submission: Submission) -> Result<()> {
    if let Some(ModalBody::SignInPrompt { message, link }) = modal.view().body() {
        bail!("{} Sign in at {}", message, link);
    }

    match modal.submit(submission).await? {
        SubmitOutcome::Completed(change) => {
            if let Some(notification) = modal.notification() {
                println!("{}", notification.title);
            }
            info!("{:?}", change);
            Ok(())
        }
        SubmitOutcome::Failed { message } => bail!("{}", message),
        SubmitOutcome::Blocked(reason) => bail!("Request not sent: {:?}", reason),
        SubmitOutcome::Stale => bail!("The dialog was closed before the response arrived"),
    }
}

fn report(notification: Notification) -> Result<()> {
    match notification.kind {
        NotificationKind::Success => {
            println!("{}", notification);
            Ok(())
        }
        NotificationKind::Error => bail!("{}", notification),
    }
}

fn print_list(list: &List) {
    println!("{} ({}) - {} items", list.name, list.slug, list.items.len());
    for item in &list.items {
        match &item.subtitle {
            Some(subtitle) => println!(
                "  [{}] {} - {} ({})",
                item.id,
                item.title,
                subtitle,
                item.media_type.label()
            ),
            None => println!("  [{}] {} ({})", item.id, item.title, item.media_type.label()),
        }
    }
}
