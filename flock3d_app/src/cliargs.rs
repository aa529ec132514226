use clap_serde_derive::{
    clap::{self, Parser},
    serde::Serialize,
    ClapSerde,
};

#[derive(Parser)]
#[command(version, about, long_about = None)]
/// Interactive 3D predator and prey flocking.
pub struct Args {
    /// Startup parameters: prey, predators, field of view, boundary and follow
    /// radius, one integer per line
    #[arg(short, long = "parameters", default_value = "parameters.txt")]
    pub parameters_path: std::path::PathBuf,

    /// Config file
    #[arg(short, long = "config", default_value = "config.yaml")]
    pub config_path: std::path::PathBuf,

    /// Rest of arguments
    #[command(flatten)]
    pub config: <Config as ClapSerde>::Opt,
}

#[derive(ClapSerde, Serialize)]
/// Programatic configuration
///
/// Uses defaults, which can be overwritten by specifying a filepath for the `-c` or `--config` arg option
pub struct Config {
    #[default(0)]
    #[arg(long)]
    /// seed for the initial population, 0 picks a random one
    pub seed: u64,

    #[default(false)]
    #[arg(long)]
    /// move boids one after another instead of all at once
    pub sequential: bool,

    #[default(4)]
    #[arg(short = 'r', long)]
    /// ratio of renders/sample_rate, e,g, 4 = sample every 4th render
    pub sample_rate: u64,

    #[default(false)]
    #[arg(short = 's', long)]
    pub save: bool,

    #[default(false)]
    #[arg(short = 't', long)]
    pub save_timestamp: bool,

    #[default(800)]
    #[arg(short = 'x', long)]
    pub init_width: u32,

    #[default(600)]
    #[arg(short = 'y', long)]
    pub init_height: u32,
}
