mod terminal;

use std::io::{self, BufRead};
use std::path::PathBuf;

use catchmind::config::ConfigError;
use catchmind::directory::{DirectoryError, RoomSummary};
use catchmind::identity::{self, IdentityError};
use catchmind::images::{self, ImageClient, ImageError};
use catchmind::store::{FileStore, KeyValueStore};
use catchmind::{ClientConfig, ExitReason, JoinError, Lobby, RoomCommand, SessionIdentity};
use clap::{Args, Parser, Subcommand};
use tokio::sync::mpsc;

use crate::terminal::{HELP, InputLine, TerminalView, parse_input};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("not logged in; run `catchmind login <nickname>` first")]
    NotLoggedIn,
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Identity(#[from] IdentityError),
    #[error(transparent)]
    Directory(#[from] DirectoryError),
    #[error(transparent)]
    Join(#[from] JoinError),
    #[error(transparent)]
    Image(#[from] ImageError),
    #[error("failed to read {path}: {source}")]
    ReadFile { path: PathBuf, source: io::Error },
}

#[derive(Parser, Debug)]
#[command(name = "catchmind", about = "CatchMind room client")]
struct Cli {
    /// Overrides `CATCHMIND_BASE_URL`.
    #[arg(long, env = "CATCHMIND_BASE_URL")]
    base_url: Option<String>,

    /// Overrides `CATCHMIND_STATE_FILE`.
    #[arg(long, env = "CATCHMIND_STATE_FILE")]
    state_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Set the nickname (keeps the session id).
    Login { nickname: String },
    /// Show the stored identity.
    Whoami,
    /// Forget nickname, session id and preferences.
    Logout,
    /// Show or toggle the light/dark preference.
    Theme {
        #[arg(long, default_value_t = false)]
        toggle: bool,
    },
    Rooms(RoomsCommand),
    /// Join a room (or create one) and play from the terminal.
    Play(PlayArgs),
    Images(ImagesCommand),
}

#[derive(Args, Debug)]
struct RoomsCommand {
    #[command(subcommand)]
    command: RoomsSubcommand,
}

#[derive(Subcommand, Debug)]
enum RoomsSubcommand {
    List,
    Create {
        name: String,
        #[arg(long, default_value_t = 3)]
        rounds: u32,
    },
}

#[derive(Args, Debug)]
struct PlayArgs {
    #[arg(required_unless_present = "create")]
    room_id: Option<String>,

    /// Create a room with this name and join it.
    #[arg(long, conflicts_with = "room_id")]
    create: Option<String>,

    #[arg(long, default_value_t = 3)]
    rounds: u32,
}

#[derive(Args, Debug)]
struct ImagesCommand {
    #[command(subcommand)]
    command: ImagesSubcommand,
}

#[derive(Subcommand, Debug)]
enum ImagesSubcommand {
    List,
    Star { id: i64 },
    Upload { path: PathBuf },
    Link { url: String },
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt().with_writer(io::stderr).init();

    let cli = Cli::parse();
    let mut config = ClientConfig::from_env()?;
    if let Some(base_url) = cli.base_url.as_deref() {
        config.base_url = ClientConfig::new(base_url)?.base_url;
    }
    if let Some(path) = cli.state_file {
        config.state_file = path;
    }
    let mut store = FileStore::open(config.state_file.clone());

    match cli.command {
        Command::Login { nickname } => {
            let identity = SessionIdentity::login(&mut store, &nickname)?;
            println!("logged in as {} ({})", identity.nickname, identity.id);
            Ok(())
        }
        Command::Whoami => {
            let identity = SessionIdentity::restore(&mut store).ok_or(CliError::NotLoggedIn)?;
            println!("{} ({})", identity.nickname, identity.id);
            Ok(())
        }
        Command::Logout => {
            store.clear();
            println!("storage cleared");
            Ok(())
        }
        Command::Theme { toggle } => {
            let theme = if toggle {
                identity::toggle_theme(&mut store)
            } else {
                identity::load_theme(&store)
            };
            println!("{}", theme.as_str());
            Ok(())
        }
        Command::Rooms(rooms) => run_rooms(config, &mut store, rooms).await,
        Command::Play(args) => run_play(config, &mut store, args).await,
        Command::Images(images) => run_images(config, &mut store, images).await,
    }
}

fn require_identity(store: &mut dyn KeyValueStore) -> Result<SessionIdentity, CliError> {
    SessionIdentity::restore(store).ok_or(CliError::NotLoggedIn)
}

async fn run_rooms(
    config: ClientConfig,
    store: &mut dyn KeyValueStore,
    rooms: RoomsCommand,
) -> Result<(), CliError> {
    let lobby = Lobby::new(config, require_identity(store)?);
    match rooms.command {
        RoomsSubcommand::List => {
            print_rooms(&lobby.list_rooms().await?);
            Ok(())
        }
        RoomsSubcommand::Create { name, rounds } => {
            let room = lobby.directory().create_room(&name, rounds).await?;
            println!("created {} ({})", room.room_name, room.room_id);
            Ok(())
        }
    }
}

async fn run_play(
    config: ClientConfig,
    store: &mut dyn KeyValueStore,
    args: PlayArgs,
) -> Result<(), CliError> {
    let mut lobby = Lobby::new(config, require_identity(store)?);
    let joined = match (args.create, args.room_id) {
        (Some(name), _) => lobby.create_and_join(&name, args.rounds).await,
        (None, Some(room_id)) => lobby.join_room(&room_id).await,
        (None, None) => return Ok(()),
    };
    let mut session = match joined {
        Ok(session) => session,
        Err(e) => {
            eprintln!("!! {e}");
            print_rooms(&lobby.list_rooms().await?);
            return Ok(());
        }
    };
    println!(
        "joined {} as {}. Type /help for commands.",
        session.room().room_name,
        lobby.identity().nickname
    );

    let (tx, mut rx) = mpsc::unbounded_channel();
    spawn_stdin_reader(tx);
    let mut view = TerminalView::new(io::stdout());
    let reason = session.run(&mut view, &mut rx).await;
    match &reason {
        ExitReason::UserExit => println!("left the room"),
        ExitReason::Kicked(why) => println!("kicked: {why}"),
        ExitReason::ConnectionLost => println!("connection lost"),
    }

    let rooms = lobby.exit_room(session).await?;
    print_rooms(&rooms);
    Ok(())
}

/// Stdin is read on a plain thread so a pending read never holds up exit.
fn spawn_stdin_reader(tx: mpsc::UnboundedSender<RoomCommand>) {
    std::thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            let command = match parse_input(&line) {
                Ok(InputLine::Command(command)) => command,
                Ok(InputLine::ShareImage(url)) => match images::image_chat_content(&url) {
                    Ok(content) => RoomCommand::Chat(content),
                    Err(e) => {
                        eprintln!("!! {e}");
                        continue;
                    }
                },
                Ok(InputLine::Help) => {
                    println!("{HELP}");
                    continue;
                }
                Ok(InputLine::Empty) => continue,
                Err(e) => {
                    eprintln!("!! {e}");
                    continue;
                }
            };
            let exit = command == RoomCommand::Exit;
            if tx.send(command).is_err() || exit {
                break;
            }
        }
    });
}

async fn run_images(
    config: ClientConfig,
    store: &mut dyn KeyValueStore,
    images: ImagesCommand,
) -> Result<(), CliError> {
    let identity = require_identity(store)?;
    let client = ImageClient::new(config.api_base());
    let username = identity.nickname.as_str();
    match images.command {
        ImagesSubcommand::List => {
            for image in client.list(username).await? {
                let star = if image.is_starred { "*" } else { " " };
                println!("{star} {:>5}  {}", image.id, image.url);
            }
        }
        ImagesSubcommand::Star { id } => {
            client.star(id, username).await?;
            println!("toggled star on {id}");
        }
        ImagesSubcommand::Upload { path } => {
            let bytes = std::fs::read(&path).map_err(|source| CliError::ReadFile {
                path: path.clone(),
                source,
            })?;
            let file_name = path
                .file_name()
                .map_or_else(|| "image".to_owned(), |name| name.to_string_lossy().into_owned());
            client
                .upload(bytes, &file_name, username, &config.game_type)
                .await?;
            println!("uploaded {file_name}");
        }
        ImagesSubcommand::Link { url } => {
            client.link(&url, username, &config.game_type).await?;
            println!("linked {url}");
        }
    }
    Ok(())
}

fn print_rooms(rooms: &[RoomSummary]) {
    if rooms.is_empty() {
        println!("no open rooms");
        return;
    }
    for room in rooms {
        let state = if room.playing { "playing" } else { "open" };
        println!("{:<12} {:<24} {state}", room.room_id, room.room_name);
    }
}
