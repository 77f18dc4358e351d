//! Un comando por configuración de diagnóstico.
//!
//! Cada comando recibe sus argumentos, las versiones del entorno y la
//! configuración de forma explícita, delega el cálculo al colaborador
//! externo y termina escribiendo el bundle con `BundleWriter`.
use std::path::Path;

use cmec_adapters::wmt::{missing_inputs, WmtRun};
use cmec_adapters::{collect_environment, BuildEnvironment, CommandComputation, CommandRenderer, CommandVersionProbe,
                    ExternalCommand, FixedValue, MetricComputation, PlotRenderer, StaticVersions, VersionLookup};
use cmec_core::writer::validate::validate_file_names;
use cmec_core::{ArtifactEntry, BundleError, BundleWriter, MetricDescriptor, MetricResult, OutputBundle, PlotArtifact,
                RunMetadata, RunMetadataBuilder};
use indexmap::IndexMap;
use log::{info, warn};

use crate::cli::{Cli, Commands, PlotMeanArgs, WeightedMeanArgs, WmtArgs};
use crate::config::AppConfig;
use crate::errors::AppError;
use crate::logging::init_run_log;

pub const WEIGHTED_MEAN_LOG: &str = "config1.log";
pub const PLOT_MEAN_LOG: &str = "config2.log";
pub const WMT_LOG: &str = "xwmt_full_example.log";

pub const WEIGHTED_MEAN_FILE: &str = "weighted_mean.json";
pub const WEIGHTED_MEAN_METRIC: &str = "weighted_mean";
pub const GLOBAL_REGION: &str = "Global";

impl Commands {
    pub fn output_dir(&self) -> &str {
        match self {
            Commands::WeightedMean(a) => &a.output,
            Commands::PlotMean(a) => &a.output,
            Commands::Wmt(a) => &a.output,
        }
    }

    pub fn log_file(&self) -> &'static str {
        match self {
            Commands::WeightedMean(_) => WEIGHTED_MEAN_LOG,
            Commands::PlotMean(_) => PLOT_MEAN_LOG,
            Commands::Wmt(_) => WMT_LOG,
        }
    }
}

/// Abre el log de la corrida y ejecuta el subcomando.
pub fn execute(cli: Cli, config: &AppConfig) -> Result<OutputBundle, AppError> {
    let out = Path::new(cli.command.output_dir());
    init_run_log(out, cli.command.log_file(), config.log_level, config.bundle.create_if_missing)?;
    let environment = environment(&cli.env, &cli.probe)?;
    match &cli.command {
        Commands::WeightedMean(args) => weighted_mean(args, &environment, config),
        Commands::PlotMean(args) => plot_mean(args, &environment, config),
        Commands::Wmt(args) => wmt(args, &environment, config),
    }
}

/// Versiones de esta herramienta + pares `--env` + sondas `--probe`.
pub fn environment(pairs: &[String], probes: &[String]) -> Result<IndexMap<String, String>, AppError> {
    let build = BuildEnvironment::new(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    let fixed = StaticVersions::parse(pairs)?;
    let probes = probes.iter().map(|p| CommandVersionProbe::parse(p)).collect::<Result<Vec<_>, _>>()?;
    let mut lookups: Vec<&dyn VersionLookup> = vec![&build, &fixed];
    lookups.extend(probes.iter().map(|p| p as &dyn VersionLookup));
    Ok(collect_environment(&lookups))
}

pub fn weighted_mean(args: &WeightedMeanArgs,
                     environment: &IndexMap<String, String>,
                     config: &AppConfig)
                     -> Result<OutputBundle, AppError> {
    let computation: Box<dyn MetricComputation> = match args.value {
        Some(v) => Box::new(FixedValue(v)),
        None => Box::new(CommandComputation::new(ExternalCommand::from_argv(&args.command)?)),
    };

    info!("Calculating metric");
    let value = computation.compute(&args.input, &args.var)?;
    info!("{} weighted mean = {value}", args.var);

    let result = MetricResult::new(ArtifactEntry::new(WEIGHTED_MEAN_FILE, "metrics", "Weighted mean of dataset"))
        .with_value(GLOBAL_REGION, &args.var, WEIGHTED_MEAN_METRIC, value)
        .describe_metric(WEIGHTED_MEAN_METRIC, MetricDescriptor::new("Spatially weighted mean"));
    let metadata = metadata(&args.input, &args.output, WEIGHTED_MEAN_LOG, environment, config)
        .variable(&args.var)
        .obsdata(args.obs_data.clone())
        .build();
    Ok(BundleWriter::new(config.bundle.clone()).write_metrics_bundle(&result, &metadata)?)
}

pub fn plot_mean(args: &PlotMeanArgs,
                 environment: &IndexMap<String, String>,
                 config: &AppConfig)
                 -> Result<OutputBundle, AppError> {
    let plot = PlotArtifact::new(&args.plot_file, &args.long_name, &args.description);
    let metadata = metadata(&args.input, &args.output, PLOT_MEAN_LOG, environment, config)
        .variable(&args.var)
        .obsdata(args.obs_data.clone())
        .build();
    // El renderer escribe directamente en esta ruta: el nombre se valida antes.
    validate_file_names(plot.filename(), &metadata)?;

    let plot_path = Path::new(&args.output).join(plot.filename());
    if args.command.is_empty() {
        info!("Using existing plot {}", plot_path.display());
    } else {
        info!("Generating plot");
        CommandRenderer::new(ExternalCommand::from_argv(&args.command)?).render(&args.input, Some(&args.var), &plot_path)?;
    }
    Ok(BundleWriter::new(config.bundle.clone()).write_plot_bundle(&plot, &metadata)?)
}

pub fn wmt(args: &WmtArgs, environment: &IndexMap<String, String>, config: &AppConfig) -> Result<OutputBundle, AppError> {
    let run = WmtRun::new(&args.label, args.lstr.parse()?, args.basin.parse()?);
    info!("Running xwmt full example");

    for var in missing_inputs(Path::new(&args.input))? {
        warn!("No files available for {var}");
    }
    let obs = Path::new(&args.obs);
    for (tag, path) in run.reference_files(obs) {
        if !path.is_file() {
            warn!("Reference dataset {tag} not found at {}", path.display());
        }
    }

    let (lmin, lmax, dl) = run.lambda.bin_boundaries();
    info!("{} bins of {dl} between {lmin} and {lmax}", run.lambda.bins().len());
    let (lmin, lmax, dl) = (lmin.to_string(), lmax.to_string(), dl.to_string());
    let basin = run.basin.to_string();
    let vars = [("obs", args.obs.as_str()),
                ("input", args.input.as_str()),
                ("output", args.output.as_str()),
                ("label", args.label.as_str()),
                ("lstr", run.lambda.as_str()),
                ("basin", basin.as_str()),
                ("lmin", lmin.as_str()),
                ("lmax", lmax.as_str()),
                ("dl", dl.as_str())];
    let output = Path::new(&args.output);
    let previous = run.comparison_plots(output)?;
    ExternalCommand::from_argv(&args.command)?.run(&vars)?;

    let (plot_name, (start, end)) =
        run.find_comparison_plot(output, &previous)?
           .ok_or_else(|| {
               BundleError::upstream(format!("no {}.G_*_{}_{}_comparison.png in {}",
                                             run.label, run.lambda, run.basin, args.output))
           })?;
    info!("Saving figure to file: {plot_name}");

    let title = run.figure_title(start, end);
    let plot = PlotArtifact::new(plot_name,
                                 format!("{} WMT comparison", run.label),
                                 format!("Surface water mass transformation in {} space, {title}", run.lambda));
    let reference_dir = WmtRun::reference_dir(obs).to_string_lossy().into_owned();
    let metadata = metadata(&args.input, &args.output, WMT_LOG, environment, config)
        .obsdata(Some(reference_dir))
        .build();
    Ok(BundleWriter::new(config.bundle.clone()).write_plot_bundle(&plot, &metadata)?)
}

fn metadata(input: &str,
            output: &str,
            log_file: &str,
            environment: &IndexMap<String, String>,
            config: &AppConfig)
            -> RunMetadataBuilder {
    let builder = RunMetadata::builder(input, output).log_file(log_file).environment(environment.clone());
    match config.fixed_timestamp {
        Some(ts) => builder.timestamp(ts),
        None => builder,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::fs;

    fn config() -> AppConfig {
        AppConfig { fixed_timestamp: Some(Utc.with_ymd_and_hms(2024, 1, 5, 13, 2, 11).unwrap()),
                    ..AppConfig::default() }
    }

    fn read_json(path: &Path) -> serde_json::Value { serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap() }

    #[test]
    fn environment_starts_with_this_tool() {
        let env = environment(&["numpy=1.26.4".to_string()], &[]).unwrap();
        assert_eq!(env.get_index_of(env!("CARGO_PKG_NAME")), Some(0));
        assert_eq!(env["numpy"], "1.26.4");
        assert!(environment(&["numpy".to_string()], &[]).is_err());
    }

    #[test]
    fn weighted_mean_with_fixed_value() {
        let tmp = tempfile::tempdir().unwrap();
        let args = WeightedMeanArgs { input: "/data/in.nc".into(),
                                      var: "tos".into(),
                                      output: tmp.path().to_string_lossy().into_owned(),
                                      value: Some(18.42),
                                      obs_data: None,
                                      command: vec![] };
        let bundle = weighted_mean(&args, &IndexMap::new(), &config()).unwrap();
        let doc = read_json(&bundle.artifact);
        assert_eq!(doc["RESULTS"]["Global"]["tos"]["weighted_mean"].as_f64(), Some(18.42));
        assert_eq!(doc["DIMENSIONS"]["metric"]["weighted_mean"]["Name"], "Spatially weighted mean");
        let manifest = read_json(&bundle.manifest);
        assert_eq!(manifest["provenance"]["log"], "config1.log");
        assert_eq!(manifest["provenance"]["date"], "Jan 05 2024 13:02:11 UTC");
        assert_eq!(manifest["metrics"]["description"], "Weighted mean of dataset");
    }

    #[test]
    fn plot_mean_requires_existing_plot_without_renderer() {
        let tmp = tempfile::tempdir().unwrap();
        let args = PlotMeanArgs { input: "/data/in.nc".into(),
                                  var: "test_var".into(),
                                  output: tmp.path().to_string_lossy().into_owned(),
                                  plot_file: "plot.png".into(),
                                  long_name: "Test map".into(),
                                  description: "Map of the test dataset".into(),
                                  obs_data: Some("/obs".into()),
                                  command: vec![] };
        let err = plot_mean(&args, &IndexMap::new(), &config()).unwrap_err();
        assert_eq!(err.exit_code(), 3);

        fs::write(tmp.path().join("plot.png"), b"png").unwrap();
        let bundle = plot_mean(&args, &IndexMap::new(), &config()).unwrap();
        let manifest = read_json(&bundle.manifest);
        assert_eq!(manifest["plots"]["long_name"], "Test map");
        assert_eq!(manifest["provenance"]["obsdata"], "/obs");
        assert_eq!(manifest["provenance"]["log"], "config2.log");
    }

    #[test]
    fn wmt_rejects_unknown_lambda_before_running_anything() {
        let tmp = tempfile::tempdir().unwrap();
        let args = WmtArgs { obs: "/obs".into(),
                             input: tmp.path().to_string_lossy().into_owned(),
                             output: tmp.path().to_string_lossy().into_owned(),
                             label: "model".into(),
                             lstr: "density".into(),
                             basin: "pacific_tropc".into(),
                             command: vec!["true".into()] };
        let err = wmt(&args, &IndexMap::new(), &config()).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[cfg(unix)]
    #[test]
    fn wmt_bundles_the_comparison_figure() {
        let tmp = tempfile::tempdir().unwrap();
        let input = tmp.path().join("model");
        let out = tmp.path().join("out");
        fs::create_dir_all(&input).unwrap();
        fs::create_dir_all(&out).unwrap();
        let args = WmtArgs { obs: "/obs".into(),
                             input: input.to_string_lossy().into_owned(),
                             output: out.to_string_lossy().into_owned(),
                             label: "om4".into(),
                             lstr: "theta".into(),
                             basin: "atlantic".into(),
                             command: vec!["touch".into(),
                                           "{output}/{label}.G_1993to2017_{lstr}_{basin}_comparison.png".into()] };
        let bundle = wmt(&args, &IndexMap::new(), &config()).unwrap();
        assert_eq!(bundle.artifact, out.join("om4.G_1993to2017_theta_atlantic_comparison.png"));
        let manifest = read_json(&bundle.manifest);
        assert_eq!(manifest["plots"]["long_name"], "om4 WMT comparison");
        assert_eq!(manifest["plots"]["description"],
                   "Surface water mass transformation in theta space, Atlantic (1993-2017)");
        assert_eq!(manifest["provenance"]["obsdata"], "/obs/xwmt/obs_est_cmec/data");
        assert_eq!(manifest["provenance"]["log"], "xwmt_full_example.log");
    }

    #[cfg(unix)]
    #[test]
    fn wmt_without_figure_is_upstream_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().to_string_lossy().into_owned();
        let args = WmtArgs { obs: "/obs".into(),
                             input: path.clone(),
                             output: path,
                             label: "model".into(),
                             lstr: "sigma0".into(),
                             basin: "pacific_tropc".into(),
                             command: vec!["true".into()] };
        let err = wmt(&args, &IndexMap::new(), &config()).unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }

    #[cfg(unix)]
    #[test]
    fn wmt_does_not_reuse_a_figure_from_an_earlier_run() {
        let tmp = tempfile::tempdir().unwrap();
        let stale = tmp.path().join("model.G_1993to2017_sigma0_pacific_tropc_comparison.png");
        fs::write(&stale, b"old png").unwrap();
        let path = tmp.path().to_string_lossy().into_owned();
        let args = WmtArgs { obs: "/obs".into(),
                             input: path.clone(),
                             output: path,
                             label: "model".into(),
                             lstr: "sigma0".into(),
                             basin: "pacific_tropc".into(),
                             command: vec!["true".into()] };
        let err = wmt(&args, &IndexMap::new(), &config()).unwrap_err();
        assert_eq!(err.exit_code(), 4);
        assert!(!tmp.path().join("output.json").exists());
    }

    #[cfg(unix)]
    #[test]
    fn plot_file_outside_output_dir_is_rejected_before_rendering() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("out");
        fs::create_dir_all(&out).unwrap();
        let args = PlotMeanArgs { input: "/data/in.nc".into(),
                                  var: "test_var".into(),
                                  output: out.to_string_lossy().into_owned(),
                                  plot_file: "../escaped.png".into(),
                                  long_name: "Test map".into(),
                                  description: "Map of the test dataset".into(),
                                  obs_data: None,
                                  command: vec!["touch".into(), "{output}".into()] };
        let err = plot_mean(&args, &IndexMap::new(), &config()).unwrap_err();
        assert_eq!(err.exit_code(), 3);
        assert!(!tmp.path().join("escaped.png").exists());
    }
}
