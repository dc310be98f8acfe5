//! Config command - inspect and edit reconciliation settings.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Subcommand, ValueEnum};
use console::style;
use rust_decimal::Decimal;

use larder_core::{LarderConfig, Unit};

use super::default_config_path;

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Print the active settings
    Show,

    /// Write a config file with default settings
    Init(InitArgs),

    /// Print one setting
    Get {
        /// Setting to read
        setting: Setting,
    },

    /// Change one setting and save the file
    Set {
        /// Setting to change
        setting: Setting,

        /// New value
        value: String,
    },

    /// Show which config file is in use
    Path,
}

#[derive(Args)]
struct InitArgs {
    /// Write to this path instead of the config location
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Overwrite existing file
    #[arg(long)]
    force: bool,
}

/// The settings larder reads.
#[derive(Copy, Clone, ValueEnum)]
enum Setting {
    /// VAT rate percentage assumed for line items without an explicit rate
    StandardVatRate,

    /// Unit assigned to merged-in line items that carry none
    DefaultUnit,

    /// Directory holding the JSON store collections
    DataDir,
}

impl Setting {
    fn key(self) -> &'static str {
        match self {
            Setting::StandardVatRate => "reconcile.standard_vat_rate",
            Setting::DefaultUnit => "reconcile.default_unit",
            Setting::DataDir => "store.data_dir",
        }
    }
}

pub fn run(args: ConfigArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let path = config_path
        .map(PathBuf::from)
        .unwrap_or_else(default_config_path);

    match args.command {
        ConfigCommand::Show => show(&path),
        ConfigCommand::Init(init_args) => init(init_args, &path),
        ConfigCommand::Get { setting } => get(&path, setting),
        ConfigCommand::Set { setting, value } => set(&path, setting, &value),
        ConfigCommand::Path => show_path(&path),
    }
}

fn load(path: &Path) -> anyhow::Result<LarderConfig> {
    if path.exists() {
        Ok(LarderConfig::from_file(path)?)
    } else {
        Ok(LarderConfig::default())
    }
}

fn show(path: &Path) -> anyhow::Result<()> {
    if !path.exists() {
        println!(
            "{} No config file at {}, showing defaults.",
            style("ℹ").blue(),
            path.display()
        );
    }

    let config = load(path)?;

    println!(
        "{} = {}",
        style("reconcile.standard_vat_rate").cyan(),
        config.reconcile.standard_vat_rate
    );
    println!(
        "{} = {}",
        style("reconcile.default_unit").cyan(),
        config.reconcile.default_unit.display()
    );
    println!(
        "{} = {}",
        style("store.data_dir").cyan(),
        config.store.data_dir.display()
    );

    Ok(())
}

fn init(args: InitArgs, config_path: &Path) -> anyhow::Result<()> {
    let output_path = args.output.as_deref().unwrap_or(config_path);

    if output_path.exists() && !args.force {
        anyhow::bail!(
            "Config file already exists at {}. Use --force to overwrite.",
            output_path.display()
        );
    }

    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)?;
    }

    LarderConfig::default().save(output_path)?;

    println!(
        "{} Created configuration file at {}",
        style("✓").green(),
        output_path.display()
    );

    Ok(())
}

fn get(path: &Path, setting: Setting) -> anyhow::Result<()> {
    let config = load(path)?;

    match setting {
        Setting::StandardVatRate => println!("{}", config.reconcile.standard_vat_rate),
        Setting::DefaultUnit => println!("{}", config.reconcile.default_unit.display()),
        Setting::DataDir => println!("{}", config.store.data_dir.display()),
    }

    Ok(())
}

fn set(path: &Path, setting: Setting, value: &str) -> anyhow::Result<()> {
    let mut config = load(path)?;

    match setting {
        Setting::StandardVatRate => {
            let rate: Decimal = value
                .parse()
                .map_err(|_| anyhow::anyhow!("not a valid VAT rate: {value}"))?;
            if rate < Decimal::ZERO || rate > Decimal::ONE_HUNDRED {
                anyhow::bail!("VAT rate must be between 0 and 100, got {rate}");
            }
            config.reconcile.standard_vat_rate = rate;
        }
        Setting::DefaultUnit => {
            config.reconcile.default_unit = Unit::from_str(value).ok_or_else(|| {
                anyhow::anyhow!("unknown unit: {value} (expected pcs, kg, g, l or ml)")
            })?;
        }
        Setting::DataDir => config.store.data_dir = PathBuf::from(value),
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    config.save(path)?;

    println!("{} Set {} = {}", style("✓").green(), setting.key(), value);

    Ok(())
}

fn show_path(path: &Path) -> anyhow::Result<()> {
    println!("Configuration file: {}", path.display());

    if path.exists() {
        println!("Status: {}", style("exists").green());
    } else {
        println!("Status: {}", style("not created").yellow());
        println!();
        println!("Run 'larder config init' to create a configuration file.");
    }

    Ok(())
}
