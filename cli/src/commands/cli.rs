use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "skullstrip",
    version,
    about = "Brain extraction preprocessing using FSL BET",
    after_help = "Examples:\n  \
        skullstrip --input /data --output /results --subject 0051160\n  \
        skullstrip --input /data --output /results --subject 0051160 --f 0.4"
)]
pub struct Args {
    /// Root of the BIDS dataset.
    #[arg(long, value_name = "DIR")]
    pub input: PathBuf,

    /// Root of the results tree.
    #[arg(long, value_name = "DIR")]
    pub output: PathBuf,

    /// Subject label without the `sub-` prefix (e.g. 0051160).
    #[arg(long, value_name = "ID")]
    pub subject: String,

    /// BET fractional intensity threshold, strictly between 0 and 1.
    // Parsed by RunConfig so bad values surface as InvalidParameter.
    #[arg(
        long = "fractional-intensity",
        visible_alias = "f",
        value_name = "FLOAT",
        default_value = "0.5",
        allow_negative_numbers = true
    )]
    pub fractional_intensity: String,

    /// Debug-level logging.
    #[arg(long, default_value_t = false)]
    pub verbose: bool,

    /// Path or name of the bet binary (overrides config and SKULLSTRIP_BET_BIN).
    #[arg(long, value_name = "PATH")]
    pub bet_bin: Option<String>,

    /// Do not pass `-R` (robust brain centre estimation) to bet.
    #[arg(long, default_value_t = false)]
    pub no_robust: bool,

    /// Config file; defaults to ./skullstrip.toml, then the user config dir.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}
