use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::usecases::u501_inventory_lookup::csv_export::EXPORT_FILE_NAME;
use crate::usecases::u501_inventory_lookup::file_batch::DEFAULT_INPUT_FILE;

/// Coupang inventory lookup: HTTP-сервис или пакетный опрос из файла
#[derive(Debug, Parser)]
#[command(name = "backend")]
#[command(about = "Coupang inventory lookup service", long_about = None)]
pub struct Cli {
    /// Без подкоманды запускается HTTP-сервис
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start the HTTP service
    Serve,
    /// Look up every option id from a CSV file and write the results to CSV
    Batch(BatchArgs),
}

#[derive(Debug, Args)]
pub struct BatchArgs {
    /// CSV with an option id column ("옵션 id", "option_id" or "vendorItemId")
    #[arg(long, default_value = DEFAULT_INPUT_FILE)]
    pub input: PathBuf,

    /// Output CSV (UTF-8 with BOM)
    #[arg(long, default_value = EXPORT_FILE_NAME)]
    pub output: PathBuf,

    #[arg(long, env = "COUPANG_ACCESS_KEY", hide_env_values = true)]
    pub access_key: String,

    #[arg(long, env = "COUPANG_SECRET_KEY", hide_env_values = true)]
    pub secret_key: String,
}
