use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Select};
use profiledeck_lib::config::Config;
use profiledeck_lib::profile::{capitalize, Profile};
use profiledeck_lib::session::View;
use profiledeck_lib::Client;
use std::path::PathBuf;
use structopt::StructOpt;
use tracing::Level;

static GENDERS: [&str; 3] = ["", "female", "male"];

#[derive(Debug, StructOpt)]
#[structopt(name = "profiledeck-cli", about = "Browse random user profiles in the terminal")]
struct Opt {
    #[structopt(short, long, parse(from_os_str))]
    config: Option<PathBuf>,
    #[structopt(long)]
    endpoint: Option<String>,
    #[structopt(long)]
    pool_pages: Option<usize>,
    /// Where search, gender filter and selection are kept between runs.
    /// Without it nothing is persisted.
    #[structopt(parse(from_os_str))]
    db_path: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let opt = Opt::from_args();

    let collector = tracing_subscriber::fmt()
        .with_max_level(Level::WARN)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(collector)?;

    let mut config = match opt.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    if let Some(endpoint) = opt.endpoint {
        config.endpoint = endpoint;
    }
    if let Some(pool_pages) = opt.pool_pages {
        config.pool_pages = pool_pages;
    }

    let client = match opt.db_path {
        Some(path) => Client::new(path, &config)?,
        None => Client::ephemeral(&config)?,
    };

    println!("Fetching profiles from {}", config.endpoint);
    let view = client.startup()?;
    let outcome = run(&client, view);

    finish(outcome, || client.teardown().map(|_| ()).map_err(Into::into))
}

/// Tear down after the browse loop whether or not it failed. The loop's own
/// error wins over a teardown error.
fn finish<T>(
    outcome: anyhow::Result<T>,
    teardown: impl FnOnce() -> anyhow::Result<()>,
) -> anyhow::Result<T> {
    let torn_down = teardown();
    let value = outcome?;
    torn_down?;
    Ok(value)
}

fn run(client: &Client, mut view: View) -> anyhow::Result<()> {
    let theme = ColorfulTheme::default();

    loop {
        if let Some(error) = &view.error {
            println!("! {}", error);
        }

        let items = [
            format!(
                "Browse profiles ({} of {} shown)",
                view.displayed.len(),
                view.total_filtered
            ),
            format!("Search: {:?}", view.draft_search),
            format!("Gender: {}", gender_label(&view.draft_gender)),
            "Apply filters".to_string(),
            match &view.selected {
                Some(p) => format!("Show selected: {}", p.full_name()),
                None => "Show selected: none".to_string(),
            },
            "Fetch a new batch".to_string(),
            "Quit".to_string(),
        ];

        let choice = Select::with_theme(&theme)
            .with_prompt("profiledeck")
            .items(&items)
            .default(0)
            .interact_opt()?;

        view = match choice {
            Some(0) => browse(client, &theme)?,
            Some(1) => {
                let search: String = Input::with_theme(&theme)
                    .with_prompt("Search by name")
                    .with_initial_text(view.draft_search.clone())
                    .allow_empty(true)
                    .interact_text()?;
                client.edit_search(&search)?
            }
            Some(2) => {
                let labels: Vec<&str> = GENDERS.iter().map(|g| gender_label(g)).collect();
                let current = GENDERS
                    .iter()
                    .position(|g| *g == view.draft_gender)
                    .unwrap_or(0);
                let picked = Select::with_theme(&theme)
                    .with_prompt("Gender")
                    .items(&labels)
                    .default(current)
                    .interact()?;
                client.edit_gender(GENDERS[picked])?
            }
            Some(3) => client.apply_filters()?,
            Some(4) => {
                match &view.selected {
                    Some(profile) => print_details(profile),
                    None => println!("Nothing selected yet."),
                }
                client.view()?
            }
            Some(5) => client.fetch_initial()?,
            _ => return Ok(()),
        };
    }
}

/// Show the displayed list; picking the trailing entry is the same as
/// scrolling to the bottom of the page.
fn browse(client: &Client, theme: &ColorfulTheme) -> anyhow::Result<View> {
    loop {
        let view = client.view()?;
        let mut items: Vec<String> = view.displayed.iter().map(list_entry).collect();
        if view.has_more {
            items.push("… load more".to_string());
        }
        if items.is_empty() {
            println!("No profiles match the current filters.");
            return Ok(view);
        }

        let picked = Select::with_theme(theme)
            .with_prompt("Profiles (Esc to go back)")
            .items(&items)
            .default(0)
            .interact_opt()?;

        match picked {
            Some(i) if i < view.displayed.len() => {
                let profile = &view.displayed[i];
                let view = client.select(profile.clone())?;
                print_details(profile);
                return Ok(view);
            }
            Some(_) => {
                client.scroll(0)?;
            }
            None => return Ok(view),
        }
    }
}

fn list_entry(profile: &Profile) -> String {
    format!(
        "{} ({}, {})",
        profile.full_name(),
        capitalize(&profile.gender),
        profile.location.country
    )
}

fn gender_label(gender: &str) -> &str {
    match gender {
        "" => "Any",
        "female" => "Female",
        "male" => "Male",
        other => other,
    }
}

fn print_details(profile: &Profile) {
    println!();
    println!("  {}", profile.full_name());
    println!("  Gender:   {}", capitalize(&profile.gender));
    println!("  Email:    {}", profile.email);
    println!(
        "  Location: {}, {}, {}",
        profile.location.city, profile.location.state, profile.location.country
    );
    println!("  Phone:    {}", profile.phone);
    println!("  Cell:     {}", profile.cell);
    println!("  Picture:  {}", profile.picture.large);
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gender_labels() {
        assert_eq!(gender_label(""), "Any");
        assert_eq!(gender_label("female"), "Female");
        assert_eq!(gender_label("nonbinary"), "nonbinary");
    }

    #[test]
    fn teardown_runs_when_browsing_fails() {
        let mut torn_down = false;
        let outcome: anyhow::Result<()> = finish(Err(anyhow::anyhow!("terminal closed")), || {
            torn_down = true;
            Ok(())
        });

        assert!(torn_down);
        assert_eq!(outcome.unwrap_err().to_string(), "terminal closed");
    }

    #[test]
    fn teardown_error_surfaces_after_clean_browse() {
        let outcome = finish(Ok(()), || Err(anyhow::anyhow!("store unavailable")));
        assert!(outcome.is_err());
    }

    #[test]
    fn every_selectable_gender_has_a_label() {
        for gender in GENDERS {
            assert!(!gender_label(gender).is_empty());
        }
    }
}
