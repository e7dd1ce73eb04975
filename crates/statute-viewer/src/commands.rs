//! Text commands for driving a [`Viewer`] from a script or a prompt.
//!
//! Each line is one command. After a command runs, the viewer is ticked at
//! the current time so the rebuild frame lands; timers only fire on
//! `wait` or `settle`.

use statute_types::{Result, ViewerError};

use crate::{Key, OutlineTarget, Viewer};

/// Usage lines, in `help` order.
const USAGE: &[(&str, &str)] = &[
    ("search <term>", "Search the content for <term>"),
    ("scope <id>|all", "Restrict match counting to one act and search again"),
    ("next", "Go to the next match"),
    ("prev", "Go to the previous match"),
    ("match <n>", "Go to match <n> (1-based)"),
    ("clear", "Clear the search and restore the content"),
    ("goto <id>", "Scroll to a heading"),
    ("open <id>", "Click an outline title"),
    ("fold <id>", "Click an outline entry's expand icon"),
    ("collapse-all", "Fold every outline entry and content section"),
    ("toggle <wrapper-id>", "Click the section toggle for a wrapper"),
    ("copy <section-id>", "Click a section's copy button"),
    ("toc-panel", "Show or hide the navigation panel"),
    ("scroll <y>", "Scroll to offset <y>"),
    ("top", "Scroll back to the top"),
    ("resize <w> <h>", "Resize the viewport"),
    ("key enter|slash", "Press a key"),
    ("theme", "Switch between light and dark"),
    ("font +|-", "Step the font size"),
    ("wait <ms>", "Advance the clock"),
    ("settle", "Run until nothing is pending"),
    ("status", "Show search, heading and scroll state"),
    ("toc", "Print the outline markup"),
    ("html", "Print the content markup"),
    ("help", "List commands"),
];

/// One parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Search(String),
    Scope(String),
    Next,
    Prev,
    /// 1-based match number.
    Match(usize),
    Clear,
    Goto(String),
    Open(String),
    Fold(String),
    CollapseAll,
    Toggle(String),
    Copy(String),
    TocPanel,
    Scroll(i32),
    Top,
    Resize(u32, i32),
    Key(Key),
    Theme,
    Font(bool),
    Wait(u64),
    Settle,
    Status,
    Toc,
    Html,
    Help,
}

fn usage_error(usage: &str) -> ViewerError {
    ViewerError::Command(format!("usage: {usage}"))
}

fn parse_num<T: std::str::FromStr>(arg: Option<&&str>, usage: &str) -> Result<T> {
    arg.and_then(|a| a.parse().ok()).ok_or_else(|| usage_error(usage))
}

fn one_arg(args: &[&str], usage: &str) -> Result<String> {
    match args {
        [arg] => Ok((*arg).to_string()),
        _ => Err(usage_error(usage)),
    }
}

/// Parse one command line. Blank lines and `#` comments are `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<Command>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();
    let args: Vec<&str> = rest.split_whitespace().collect();

    let cmd = match verb {
        "search" => {
            if rest.is_empty() {
                return Err(usage_error("search <term>"));
            }
            Command::Search(rest.to_string())
        },
        "scope" => Command::Scope(one_arg(&args, "scope <id>|all")?),
        "next" => Command::Next,
        "prev" => Command::Prev,
        "match" => {
            let n: usize = parse_num(args.first(), "match <n>")?;
            if n == 0 {
                return Err(usage_error("match <n>"));
            }
            Command::Match(n)
        },
        "clear" => Command::Clear,
        "goto" => Command::Goto(one_arg(&args, "goto <id>")?),
        "open" => Command::Open(one_arg(&args, "open <id>")?),
        "fold" => Command::Fold(one_arg(&args, "fold <id>")?),
        "collapse-all" => Command::CollapseAll,
        "toggle" => Command::Toggle(one_arg(&args, "toggle <wrapper-id>")?),
        "copy" => Command::Copy(one_arg(&args, "copy <section-id>")?),
        "toc-panel" => Command::TocPanel,
        "scroll" => Command::Scroll(parse_num(args.first(), "scroll <y>")?),
        "top" => Command::Top,
        "resize" => Command::Resize(
            parse_num(args.first(), "resize <w> <h>")?,
            parse_num(args.get(1), "resize <w> <h>")?,
        ),
        "key" => match args.first().copied() {
            Some("enter") => Command::Key(Key::Enter),
            Some("slash" | "/") => Command::Key(Key::Slash),
            _ => return Err(usage_error("key enter|slash")),
        },
        "theme" => Command::Theme,
        "font" => match args.first().copied() {
            Some("+") => Command::Font(true),
            Some("-") => Command::Font(false),
            _ => return Err(usage_error("font +|-")),
        },
        "wait" => Command::Wait(parse_num(args.first(), "wait <ms>")?),
        "settle" => Command::Settle,
        "status" => Command::Status,
        "toc" => Command::Toc,
        "html" => Command::Html,
        "help" => Command::Help,
        other => return Err(ViewerError::Command(format!("unknown command: {other}"))),
    };
    Ok(Some(cmd))
}

/// Run `cmd` against `viewer` and describe the outcome.
pub fn execute(viewer: &mut Viewer, cmd: &Command) -> Result<String> {
    let out = match cmd {
        Command::Search(term) => {
            viewer.set_search_term(term);
            viewer.perform_search();
            viewer.tick(viewer.now());
            search_summary(viewer)
        },
        Command::Scope(value) => {
            viewer.set_scope(value);
            viewer.tick(viewer.now());
            search_summary(viewer)
        },
        Command::Next => {
            viewer.next_match();
            search_summary(viewer)
        },
        Command::Prev => {
            viewer.previous_match();
            search_summary(viewer)
        },
        Command::Match(n) => {
            if !viewer.go_to_match(n - 1) {
                return Err(ViewerError::Command(format!("no match {n}")));
            }
            search_summary(viewer)
        },
        Command::Clear => {
            viewer.clear_search();
            viewer.tick(viewer.now());
            "[viewer] Search cleared".to_string()
        },
        Command::Goto(id) => {
            if !viewer.navigate_to(id) {
                return Err(ViewerError::MissingAnchor(format!("#{id}")));
            }
            format!("[viewer] Navigating to #{id}")
        },
        Command::Open(id) => {
            if !viewer.click_outline(id, OutlineTarget::Title) {
                return Err(ViewerError::MissingAnchor(format!("#{id}")));
            }
            format!("[viewer] Opened #{id}")
        },
        Command::Fold(id) => {
            if !viewer.click_outline(id, OutlineTarget::Icon) {
                return Err(ViewerError::Command(format!("#{id} has no sub-entries")));
            }
            format!("[viewer] Toggled #{id}")
        },
        Command::CollapseAll => {
            viewer.collapse_all();
            viewer.tick(viewer.now());
            "[viewer] Collapsed all".to_string()
        },
        Command::Toggle(id) => {
            let button = viewer
                .toggle_button_for(id)
                .ok_or_else(|| ViewerError::MissingAnchor(format!("toggle for #{id}")))?;
            viewer.click(button);
            viewer.tick(viewer.now());
            let label = viewer.document().text_content(button);
            format!("[viewer] #{id}: {}", label.trim())
        },
        Command::Copy(id) => {
            let button = viewer
                .copy_button_for(id)
                .ok_or_else(|| ViewerError::MissingAnchor(format!("copy button for #{id}")))?;
            viewer.click(button);
            match viewer.chrome().banner.as_deref() {
                Some(banner) => format!("[viewer] {banner}"),
                None => format!("[viewer] Copied #{id}"),
            }
        },
        Command::TocPanel => {
            viewer.toggle_outline_panel();
            let panel = viewer.chrome().panel;
            format!(
                "[viewer] Navigation panel {}",
                if panel.collapsed { "hidden" } else { "shown" }
            )
        },
        Command::Scroll(y) => {
            viewer.on_scroll(*y);
            format!("[viewer] Scrolled to {}", viewer.viewport().scroll_y)
        },
        Command::Top => {
            viewer.scroll_to_top();
            "[viewer] Scrolling to top".to_string()
        },
        Command::Resize(w, h) => {
            viewer.on_resize(*w, *h);
            format!("[viewer] Viewport {w}x{h}")
        },
        Command::Key(key) => {
            let handled = viewer.key_press(*key);
            viewer.tick(viewer.now());
            format!("[viewer] {key:?} {}", if handled { "handled" } else { "ignored" })
        },
        Command::Theme => {
            viewer.toggle_theme();
            format!("[viewer] Theme: {}", viewer.preferences().theme.as_str())
        },
        Command::Font(up) => {
            let changed = if *up {
                viewer.increase_font()
            } else {
                viewer.decrease_font()
            };
            viewer.tick(viewer.now());
            let size = viewer.preferences().font_size;
            if changed {
                format!("[viewer] Font size {size}px")
            } else {
                format!("[viewer] Font size stays at {size}px")
            }
        },
        Command::Wait(ms) => {
            viewer.advance(*ms);
            format!("[viewer] t={}ms", viewer.now())
        },
        Command::Settle => {
            viewer.settle();
            format!("[viewer] Settled at t={}ms", viewer.now())
        },
        Command::Status => status_report(viewer),
        Command::Toc => viewer.outline_html(),
        Command::Html => viewer.content_html(),
        Command::Help => help_text(),
    };
    Ok(out)
}

fn search_summary(viewer: &Viewer) -> String {
    let status = viewer.status();
    let text = if status.text.is_empty() {
        "no search"
    } else {
        status.text.as_str()
    };
    if viewer.act_status().is_empty() {
        format!("[viewer] {text}")
    } else {
        format!("[viewer] {text} {}", viewer.act_status())
    }
}

/// Multi-line snapshot of the viewer state.
pub fn status_report(viewer: &Viewer) -> String {
    let vp = viewer.viewport();
    let prefs = viewer.preferences();
    let mut lines = vec![
        search_summary(viewer),
        format!("term: {:?} scope: {}", viewer.search().last_term(), viewer.search().scope().value()),
        format!("heading: {}", viewer.current_heading().unwrap_or("-")),
        format!("scroll: {}/{}", vp.scroll_y, vp.max_scroll()),
        format!(
            "location: {}",
            if viewer.location().hash().is_empty() {
                "-".to_string()
            } else {
                viewer.location().hash()
            }
        ),
        format!("theme: {} font: {}px", prefs.theme.as_str(), prefs.font_size),
    ];
    if viewer.chrome().scroll_top_visible {
        lines.push("scroll-to-top: shown".to_string());
    }
    if viewer.is_spy_overridden() {
        lines.push("heading pinned by navigation".to_string());
    }
    lines.join("\n")
}

pub fn help_text() -> String {
    let width = USAGE.iter().map(|(u, _)| u.len()).max().unwrap_or(0);
    USAGE
        .iter()
        .map(|(usage, desc)| format!("  {usage:<width$}  {desc}"))
        .collect::<Vec<_>>()
        .join("\n")
}
