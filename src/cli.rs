use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "cmec-bundle", version, about = "Package climate diagnostics into CMEC output bundles")]
pub struct Cli {
    /// Library version recorded in the provenance (NAME=VERSION, repeatable)
    #[arg(long = "env", value_name = "NAME=VERSION", global = true)]
    pub env: Vec<String>,
    /// Command printing a library version (NAME=CMD, repeatable)
    #[arg(long = "probe", value_name = "NAME=CMD", global = true)]
    pub probe: Vec<String>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Spatially/temporally weighted mean written as a CMEC metrics bundle
    WeightedMean(WeightedMeanArgs),
    /// Time-mean map written as a CMEC plot bundle
    PlotMean(PlotMeanArgs),
    /// Surface water mass transformation comparison figure
    Wmt(WmtArgs),
}

#[derive(Args, Debug)]
pub struct WeightedMeanArgs {
    /// netCDF data path
    pub input: String,
    /// variable name to average
    pub var: String,
    /// output directory
    pub output: String,
    /// Precomputed weighted mean
    #[arg(long, conflicts_with = "command", required_unless_present = "command", allow_hyphen_values = true)]
    pub value: Option<f64>,
    /// Observational data path recorded in the manifest
    #[arg(long)]
    pub obs_data: Option<String>,
    /// External program printing the mean ({input}, {var} placeholders)
    #[arg(last = true, value_name = "CMD")]
    pub command: Vec<String>,
}

#[derive(Args, Debug)]
pub struct PlotMeanArgs {
    /// netCDF data path
    pub input: String,
    /// variable name to plot
    pub var: String,
    /// output directory
    pub output: String,
    /// Plot file name inside the output directory
    #[arg(long, default_value = "plot.png")]
    pub plot_file: String,
    /// Long name of the plot in the manifest
    #[arg(long, default_value = "Test map")]
    pub long_name: String,
    /// Description of the plot in the manifest
    #[arg(long, default_value = "Map of the test dataset")]
    pub description: String,
    /// Observational data path recorded in the manifest
    #[arg(long)]
    pub obs_data: Option<String>,
    /// External renderer ({input}, {var}, {output} = plot path); without it the plot must already exist
    #[arg(last = true, value_name = "CMD")]
    pub command: Vec<String>,
}

#[derive(Args, Debug)]
pub struct WmtArgs {
    /// observational data path
    pub obs: String,
    /// model netCDF data path
    pub input: String,
    /// output directory
    pub output: String,
    /// label string for model/experiment
    #[arg(long, default_value = "model")]
    pub label: String,
    /// lambda space ('sigma0', 'theta', or 'salt')
    #[arg(long, default_value = "sigma0")]
    pub lstr: String,
    /// basin ('global', 'atlantic', 'indian', 'pacific', 'southern', 'arctic', optional _tropc/_subtN/_subpN/_subtS)
    #[arg(long, default_value = "pacific_tropc")]
    pub basin: String,
    /// External WMT program ({obs}, {input}, {output}, {label}, {lstr}, {basin}, {lmin}, {lmax}, {dl} placeholders)
    #[arg(last = true, required = true, value_name = "CMD")]
    pub command: Vec<String>,
}
