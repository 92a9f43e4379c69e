mod config;
mod error;
mod nav;
mod news;
mod open_url;
mod page;
mod util;

use anyhow::{Context, Result, bail};
use console::style;
use std::{env, fs, path::PathBuf};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::nav::{ClickEvent, NavRouter};
use crate::news::{LoadOutcome, Story, StorySource, TopStoriesClient};
use crate::page::{Page, Selector};
use crate::util::sanitize::sanitize_for_terminal;

#[derive(Debug, Default)]
struct Args {
    config: Option<PathBuf>,
    section: Option<String>,
    plain: bool,
    clicks: Vec<String>,
    out: Option<PathBuf>,
    open: bool,
    list: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout stays clean for the page
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let Some(args) = parse_args(env::args().skip(1))? else {
        print_help();
        return Ok(());
    };
    if args.open && args.out.is_none() {
        bail!("--open needs --out <path>");
    }

    let cfg = config::load(args.config.as_deref(), args.section.clone())?;
    let client = TopStoriesClient::new(&cfg).context("failed to build HTTP client")?;

    if args.list {
        return list_headlines(&client).await;
    }

    let mut page = if args.plain {
        Page::plain(&cfg.title)
    } else {
        Page::home(&cfg.title)
    };

    match news::load_stories(&mut page, &client)
        .await
        .context("failed to load top stories")?
    {
        LoadOutcome::Skipped => info!("page left without stories"),
        LoadOutcome::Rendered { count } => info!(count, "page filled"),
    }

    let router = NavRouter::site();
    for raw in &args.clicks {
        let selector: Selector = raw
            .parse()
            .with_context(|| format!("bad --click selector {:?}", raw))?;
        match ClickEvent::at(&page, &selector) {
            Some(mut ev) => {
                let handled = router.dispatch(&mut page, &mut ev);
                info!(
                    selector = %raw,
                    handled,
                    default_prevented = ev.default_prevented(),
                    "click dispatched"
                );
            }
            None => warn!(selector = %raw, "nothing to click"),
        }
    }

    let html = page.to_html().context("failed to render page")?;
    match &args.out {
        Some(path) => {
            fs::write(path, &html)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), title = page.title(), "page written");
            if args.open {
                open_url::open_page(path, cfg.open_command.as_deref())?;
            }
        }
        None => print!("{}", html),
    }

    Ok(())
}

async fn list_headlines(source: &dyn StorySource) -> Result<()> {
    let stories = source
        .top_stories()
        .await
        .context("failed to fetch top stories")?;
    for s in &stories {
        print!("{}", format_headline(s));
    }
    Ok(())
}

/// `published_date` as `YYYY-MM-DD HH:MM`, blank when missing or unparseable.
fn published_label(date: Option<&str>) -> String {
    let date_fmt = format_description!("[year]-[month]-[day] [hour]:[minute]");
    date.and_then(|d| OffsetDateTime::parse(d, &Rfc3339).ok())
        .and_then(|d| d.format(date_fmt).ok())
        .unwrap_or_default()
}

fn format_headline(s: &Story) -> String {
    let mut out = format!(
        "{} {}\n",
        style(format!("{:>16}", published_label(s.published_date.as_deref()))).dim(),
        style(sanitize_for_terminal(&s.title)).bold()
    );
    if let Some(byline) = s.byline.as_deref().filter(|b| !b.is_empty()) {
        out.push_str(&format!("{:>16} {}\n", "", style(sanitize_for_terminal(byline)).dim()));
    }
    if !s.summary.is_empty() {
        out.push_str(&format!("{:>16} {}\n", "", sanitize_for_terminal(&s.summary)));
    }
    out.push_str(&format!("{:>16} {}\n", "", style(sanitize_for_terminal(&s.url)).cyan()));
    out
}

/// `Ok(None)` means help was asked for.
fn parse_args<I: Iterator<Item = String>>(mut args: I) -> Result<Option<Args>> {
    let mut parsed = Args::default();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => parsed.config = Some(PathBuf::from(value(&mut args, &arg)?)),
            "--section" => parsed.section = Some(value(&mut args, &arg)?),
            "--click" => parsed.clicks.push(value(&mut args, &arg)?),
            "--out" => parsed.out = Some(PathBuf::from(value(&mut args, &arg)?)),
            "--plain" => parsed.plain = true,
            "--open" => parsed.open = true,
            "--list" => parsed.list = true,
            "-h" | "--help" => return Ok(None),
            other => bail!("unknown argument: {} (see --help)", other),
        }
    }
    Ok(Some(parsed))
}

fn value<I: Iterator<Item = String>>(args: &mut I, flag: &str) -> Result<String> {
    args.next().with_context(|| format!("{} needs a value", flag))
}

fn print_help() {
    println!("topstories");
    println!("Usage: topstories [options]");
    println!("  --config <path>     Path to a config.toml");
    println!("  --section <name>    Top Stories section (default: nyregion)");
    println!("  --plain             Render a page without the home marker (no fetch)");
    println!("  --click <selector>  Click #id, .class or tag before writing");
    println!("                      (repeatable)");
    println!("  --out <path>        Write the page to a file instead of stdout");
    println!("  --open              Open the written page in a browser (needs --out)");
    println!("  --list              Print headlines to the terminal instead");
    println!("The API key is read from NYT_API_KEY or api_key in config.toml.");
}
