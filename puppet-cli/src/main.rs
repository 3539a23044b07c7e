mod layout;
mod replay;
mod script;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::LevelFilter;
use puppet_keyboard::{Flag, Settings, DEFAULT_KEYMAP};
use std::fs;

#[derive(Parser)]
#[command(name = "puppet-cli")]
#[command(about = "Host tools for the puppet keyboard input engine")]
struct Cli {
    /// Log engine internals to stderr (repeat for more detail)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the default keymap
    Keymap,
    /// Replay a press/release script through the engine and print its events
    Replay {
        /// Script file, one `<time_ms> press|release <key>` per line
        script: String,
        /// Scan interval in milliseconds
        #[arg(long, default_value_t = 10)]
        interval: u32,
        /// Hold threshold in units of 10 ms
        #[arg(long, default_value_t = 30)]
        hold: u32,
        /// Emit report codes for modifier keys
        #[arg(long)]
        report_mods: bool,
        /// Emit base codes without applying modifiers or locks
        #[arg(long)]
        raw: bool,
        /// Drop the oldest queued event instead of the newest when full
        #[arg(long)]
        force_overflow: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::new()
        .filter_level(log_level(cli.verbose))
        .init();

    match cli.command {
        Command::Keymap => {
            print!("{}", layout::render(&DEFAULT_KEYMAP));
        }
        Command::Replay {
            script,
            interval,
            hold,
            report_mods,
            raw,
            force_overflow,
        } => {
            let contents =
                fs::read_to_string(&script).with_context(|| format!("reading {}", script))?;
            let steps = script::parse_script(&contents, &DEFAULT_KEYMAP)
                .with_context(|| format!("parsing {}", script))?;

            let mut settings = Settings::new();
            settings.set_scan_interval_ms(interval);
            settings.set_hold_threshold_ten_ms(hold);
            settings.set(Flag::ReportModifiers, report_mods);
            settings.set(Flag::UseModifiers, !raw);
            settings.set(Flag::OverflowForcesEnqueue, force_overflow);

            let summary = replay::run(&DEFAULT_KEYMAP, settings, &steps, &mut |line| {
                println!("{line}")
            })?;

            println!(
                "done at t={}: {} event(s) queued, overflow {}",
                summary.end_ms,
                summary.queued,
                if summary.overflow { "raised" } else { "clear" }
            );
            println!(
                "capslock {}, numlock {}",
                if summary.capslock { "on" } else { "off" },
                if summary.numlock { "on" } else { "off" }
            );
        }
    }

    Ok(())
}

/// Log level for a count of `-v` flags.
fn log_level(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}
