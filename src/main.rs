//! Headless Earth Tycoon driver: reads commands from stdin and keeps the
//! engine's timers running in real time.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

use earth_tycoon::config::EngineConfig;
use earth_tycoon::economy::catalog::AbilityKind;
use earth_tycoon::economy::save::FileStore;
use earth_tycoon::economy::{view, Engine};
use earth_tycoon::input::{parse_command, BuyAmount, Command, HELP};
use earth_tycoon::time::SystemClock;

/// How often the loop gives due timers a chance to fire.
const PUMP_INTERVAL: Duration = Duration::from_millis(50);

fn parse_args() -> (Option<PathBuf>, Option<PathBuf>) {
    let mut config: Option<PathBuf> = None;
    let mut save_dir: Option<PathBuf> = None;
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--config" => config = it.next().map(PathBuf::from),
            "--save-dir" => save_dir = it.next().map(PathBuf::from),
            _ => {}
        }
    }
    (config, save_dir)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Logging setup
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let (config_path, save_dir) = parse_args();
    let mut config = match &config_path {
        Some(path) => EngineConfig::from_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if let Some(dir) = save_dir {
        config.save_dir = dir;
    }
    info!(config = ?config_path, save_dir = %config.save_dir.display(), "starting earth-tycoon");

    let store = FileStore::new(config.save_dir.clone());
    let mut engine = Engine::new(config, Box::new(store), Box::new(SystemClock));
    engine.init();
    println!("{}", status(&engine));
    println!("type `help` for commands");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut pump = tokio::time::interval(PUMP_INTERVAL);

    loop {
        tokio::select! {
            _ = pump.tick() => engine.advance(),
            line = lines.next_line() => {
                let Some(line) = line.context("reading stdin")? else {
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                match parse_command(&line) {
                    Ok(Command::Quit) => break,
                    Ok(cmd) => println!("{}", run(&mut engine, cmd)),
                    Err(e) => println!("{e}"),
                }
            }
        }
    }

    engine.dispose();
    info!("bye");
    Ok(())
}

/// Apply one command and describe the outcome.
fn run(engine: &mut Engine, cmd: Command) -> String {
    match cmd {
        Command::Tap => format!("+{} Earons", view::format_credits(engine.tap())),
        Command::TapTimes(n) => {
            let earned: f64 = (0..n).map(|_| engine.tap()).sum();
            format!("{} taps, +{} Earons", n, view::format_credits(earned))
        }
        Command::Buy(amount) => {
            let result = match amount {
                BuyAmount::Units(n) => engine.purchase_area(n),
                BuyAmount::Max => {
                    let n = engine.max_affordable_area();
                    engine.purchase_area(n)
                }
                BuyAmount::Selected => engine.purchase_selected_area(),
            };
            match result {
                Ok(r) => format!(
                    "bought {} for {} Earons (now {})",
                    view::format_area(r.amount as f64),
                    view::format_cost(r.cost),
                    view::format_area(engine.state().total_area_owned),
                ),
                Err(e) => format!("cannot buy: {e}"),
            }
        }
        Command::Select(n) => {
            engine.set_area_purchase_amount(n);
            format!(
                "batch set to {} (costs {})",
                engine.state().area_purchase_amount,
                view::format_cost(engine.selected_area_cost())
            )
        }
        Command::Build { region_id, kind } => match engine.build_building(region_id, kind) {
            Ok(id) => format!("built {} ({id})", kind.name()),
            Err(e) => format!("cannot build: {e}"),
        },
        Command::Upgrade(id) => match engine.upgrade_building(&id) {
            Ok(up) => format!("{id} is now level {}", up.new_level),
            Err(e) => format!("cannot upgrade: {e}"),
        },
        Command::Demolish(id) => match engine.demolish_building(&id) {
            Ok(refund) => format!("demolished {id}, refunded {}", view::format_cost(refund)),
            Err(e) => format!("cannot demolish: {e}"),
        },
        Command::Ability(kind) => match engine.activate_ability(kind) {
            Ok(()) => format!("{} active for {}", kind.name(), view::format_time(kind.duration_secs())),
            Err(e) => format!("{e}"),
        },
        Command::Status => status(engine),
        Command::Regions => regions(engine),
        Command::Buildings => buildings(engine),
        Command::Save => {
            if engine.save_now() {
                "saved".to_string()
            } else {
                "save failed (see log)".to_string()
            }
        }
        Command::Reset => {
            engine.reset_game();
            "game reset".to_string()
        }
        Command::Help => HELP.to_string(),
        Command::Quit => String::new(),
    }
}

fn status(engine: &Engine) -> String {
    let s = engine.state();
    let mut out = vec![
        format!(
            "Earons: {}  (+{}/tap, +{}/s)",
            view::format_credits(s.currency),
            view::format_number(s.income_per_click),
            view::format_cost(engine.total_passive_income()),
        ),
        format!(
            "Area: {}  ({:.8}% of Earth)  next unit: {}",
            view::format_area(s.total_area_owned),
            view::earth_ownership_percent(s),
            view::format_cost(s.next_area_unit_cost),
        ),
        format!("Location: {}", view::current_breadcrumb(s)),
    ];
    for &kind in AbilityKind::all() {
        let line = if !s.ability(kind).unlocked {
            format!(
                "  {}: locked (needs {})",
                kind.name(),
                view::format_area(kind.unlock_area())
            )
        } else {
            let info = engine.ability_cooldown_info(kind);
            format!(
                "  {}: {} {}",
                kind.name(),
                info.status.name(),
                view::format_time(info.remaining_secs)
            )
        };
        out.push(line);
    }
    out.join("\n")
}

fn regions(engine: &Engine) -> String {
    engine
        .state()
        .regions
        .iter()
        .filter(|r| r.unlocked)
        .map(|r| {
            format!(
                "{:>3} {:<28} {:<7} slots {}/{}",
                r.id,
                r.name(),
                r.category.name(),
                r.used_slots(),
                r.slot_capacity
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn buildings(engine: &Engine) -> String {
    let lines: Vec<String> = engine
        .state()
        .buildings()
        .map(|(b, _)| {
            format!(
                "{}  {} L{}  {}/s",
                b.id,
                b.kind.name(),
                b.level,
                view::format_cost(engine.building_income(b))
            )
        })
        .collect();
    if lines.is_empty() {
        "no buildings yet".to_string()
    } else {
        lines.join("\n")
    }
}
