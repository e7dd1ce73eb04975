//! Statute viewer command-line host.
//!
//! Loads a statute page, then drives the viewer from a script file or an
//! interactive prompt. Type `help` at the prompt for the command list.
//! Clipboard writes go to the system clipboard, falling back to OSC 52.

mod host_clipboard;

use std::io::{BufRead, IsTerminal, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use statute_viewer::{
    Command, FileStore, LogSink, MemoryStore, PreferenceStore, ViewEvent, Viewer, ViewerConfig, execute,
    parse_command,
};

#[derive(Parser, Debug)]
#[command(name = "statute-viewer", version, about = "Search and navigate statute pages")]
struct Args {
    /// HTML page to load.
    page: PathBuf,

    /// Viewer configuration (TOML).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Preference file (JSON). Preferences are kept in memory when omitted.
    #[arg(long)]
    prefs: Option<PathBuf>,

    /// Run a search right after loading.
    #[arg(long)]
    search: Option<String>,

    /// Scope for the initial search.
    #[arg(long, requires = "search")]
    scope: Option<String>,

    /// Read commands from this file instead of the prompt.
    #[arg(long)]
    script: Option<PathBuf>,

    /// Write the final content markup here.
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => ViewerConfig::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => ViewerConfig::default(),
    };
    let store: Box<dyn PreferenceStore> = match &args.prefs {
        Some(path) => Box::new(FileStore::open(path).with_context(|| format!("opening {}", path.display()))?),
        None => Box::new(MemoryStore::new()),
    };

    let html = std::fs::read_to_string(&args.page).with_context(|| format!("reading {}", args.page.display()))?;
    log::info!("Loaded {} ({} bytes)", args.page.display(), html.len());

    let mut viewer = Viewer::from_html(&html, config, store)
        .with_clipboard(host_clipboard::host_chain())
        .with_analytics(Box::new(LogSink));
    viewer.tick(0);

    if let Some(term) = &args.search {
        let cmd = match &args.scope {
            Some(scope) => {
                viewer.set_search_term(term);
                Command::Scope(scope.clone())
            },
            None => Command::Search(term.clone()),
        };
        run_command(&mut viewer, &cmd)?;
    }

    match &args.script {
        Some(path) => run_script(&mut viewer, path)?,
        None => run_prompt(&mut viewer)?,
    }

    if let Some(path) = &args.output {
        std::fs::write(path, viewer.content_html()).with_context(|| format!("writing {}", path.display()))?;
        log::info!("Wrote content to {}", path.display());
    }
    Ok(())
}

/// Run every line of a script. The first failing command aborts.
fn run_script(viewer: &mut Viewer, path: &Path) -> Result<()> {
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    for (n, line) in text.lines().enumerate() {
        let Some(cmd) = parse_command(line).with_context(|| format!("{}:{}", path.display(), n + 1))? else {
            continue;
        };
        run_command(viewer, &cmd).with_context(|| format!("{}:{}", path.display(), n + 1))?;
    }
    Ok(())
}

/// Read commands from stdin until EOF or `quit`. Errors are reported and
/// the prompt continues.
fn run_prompt(viewer: &mut Viewer) -> Result<()> {
    let stdin = std::io::stdin();
    let interactive = stdin.is_terminal();
    let mut out = std::io::stdout();
    let mut lines = stdin.lock().lines();
    loop {
        if interactive {
            write!(out, "statute> ")?;
            out.flush()?;
        }
        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        if matches!(line.trim(), "quit" | "exit") {
            break;
        }
        match parse_command(&line) {
            Ok(Some(cmd)) => {
                if let Err(e) = run_command(viewer, &cmd) {
                    eprintln!("error: {e:#}");
                }
            },
            Ok(None) => {},
            Err(e) => eprintln!("error: {e}"),
        }
    }
    Ok(())
}

fn run_command(viewer: &mut Viewer, cmd: &Command) -> Result<()> {
    let output = execute(viewer, cmd)?;
    println!("{output}");
    for event in viewer.take_events() {
        print_event(&event);
    }
    Ok(())
}

fn print_event(event: &ViewEvent) {
    match event {
        ViewEvent::RevealOutlineEntry { id, .. } => log::debug!("outline entry #{id} scrolled into view"),
        ViewEvent::FocusSearchBox => println!("[event] search box focused"),
        ViewEvent::Navigated { id, update } => println!("[event] location #{id} ({update:?})"),
        ViewEvent::Copied(text) => println!("[event] copied {} line(s)", text.lines().count()),
        ViewEvent::BannerShown(message) => println!("[event] banner: {message}"),
        ViewEvent::BannerDismissed => println!("[event] banner dismissed"),
    }
}
