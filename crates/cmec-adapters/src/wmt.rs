//! Corrida de transformación superficial de masas de agua (WMT).
//!
//! El cálculo lo hace un programa externo (xwmt). Aquí viven las
//! convenciones que la corrida comparte con ese programa: espacios lambda y
//! sus bins, cuencas y bandas de latitud, nombres de los archivos de salida y
//! de los productos de referencia (ECCO, ERA5/EN4).
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::SystemTime;

use cmec_core::{BundleError, BundleResult};

/// Variables de superficie que la corrida busca como `<var>*.nc`.
pub const INPUT_VARIABLES: [&str; 5] = ["tos", "sos", "hfds", "wfo", "sfdsi"];
/// Campos estáticos de grilla.
pub const STATIC_VARIABLES: [&str; 3] = ["areacello", "deptho", "basin"];
/// Productos de referencia precalculados: `(archivo, etiqueta)`.
pub const REFERENCE_DATASETS: [(&str, &str); 2] = [("ecco.ecco", "ecco"), ("era5.en4", "era5")];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LambdaSpace {
    Sigma0,
    Theta,
    Salt,
}

impl LambdaSpace {
    pub fn as_str(&self) -> &'static str {
        match self {
            LambdaSpace::Sigma0 => "sigma0",
            LambdaSpace::Theta => "theta",
            LambdaSpace::Salt => "salt",
        }
    }

    /// `(min, max, paso)` de los bins.
    pub fn bin_boundaries(&self) -> (f64, f64, f64) {
        match self {
            LambdaSpace::Sigma0 => (10.0, 30.0, 0.1),
            LambdaSpace::Theta => (-2.0, 30.0, 0.5),
            LambdaSpace::Salt => (20.0, 40.0, 0.1),
        }
    }

    /// Bordes de bin en `[min, max)`, como `arange(min, max, paso)`.
    pub fn bins(&self) -> Vec<f64> {
        let (min, max, step) = self.bin_boundaries();
        // Tolerancia para que 20/0.1 no redondee a 201 bins.
        let n = ((max - min) / step - 1e-9).ceil() as usize;
        (0..n).map(|i| min + i as f64 * step).collect()
    }
}

impl fmt::Display for LambdaSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for LambdaSpace {
    type Err = BundleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sigma0" => Ok(LambdaSpace::Sigma0),
            "theta" => Ok(LambdaSpace::Theta),
            "salt" => Ok(LambdaSpace::Salt),
            other => Err(BundleError::invalid(format!("unknown lambda space '{other}' (sigma0, theta or salt)"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BasinRegion {
    Global,
    Atlantic,
    Indian,
    Pacific,
    Southern,
    Arctic,
}

impl BasinRegion {
    pub fn as_str(&self) -> &'static str {
        match self {
            BasinRegion::Global => "global",
            BasinRegion::Atlantic => "atlantic",
            BasinRegion::Indian => "indian",
            BasinRegion::Pacific => "pacific",
            BasinRegion::Southern => "southern",
            BasinRegion::Arctic => "arctic",
        }
    }
}

/// Sub-región por latitud, indicada con un sufijo en el nombre de cuenca.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LatitudeBand {
    /// `_tropc`: [-20, 20]
    Tropical,
    /// `_subtN`: (20, 45]
    SubtropicalNorth,
    /// `_subpN`: (45, 90]
    SubpolarNorth,
    /// `_subtS`: [-45, -20)
    SubtropicalSouth,
}

impl LatitudeBand {
    pub fn suffix(&self) -> &'static str {
        match self {
            LatitudeBand::Tropical => "tropc",
            LatitudeBand::SubtropicalNorth => "subtN",
            LatitudeBand::SubpolarNorth => "subpN",
            LatitudeBand::SubtropicalSouth => "subtS",
        }
    }

    pub fn contains(&self, lat: f64) -> bool {
        match self {
            LatitudeBand::Tropical => (-20.0..=20.0).contains(&lat),
            LatitudeBand::SubtropicalNorth => lat > 20.0 && lat <= 45.0,
            LatitudeBand::SubpolarNorth => lat > 45.0,
            LatitudeBand::SubtropicalSouth => (-45.0..-20.0).contains(&lat),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Basin {
    pub region: BasinRegion,
    pub band: Option<LatitudeBand>,
}

impl Basin {
    /// Nombre con mayúscula inicial y resto en minúsculas, como en el título
    /// de la figura (`"Pacific_tropc"`).
    pub fn capitalized(&self) -> String {
        let name = self.to_string();
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
            None => String::new(),
        }
    }
}

impl fmt::Display for Basin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.band {
            Some(band) => write!(f, "{}_{}", self.region.as_str(), band.suffix()),
            None => f.write_str(self.region.as_str()),
        }
    }
}

impl FromStr for Basin {
    type Err = BundleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (base, suffix) = match s.split_once('_') {
            Some((b, rest)) => (b, Some(rest)),
            None => (s, None),
        };
        let region = match base {
            "global" => BasinRegion::Global,
            "atlantic" => BasinRegion::Atlantic,
            "indian" => BasinRegion::Indian,
            "pacific" => BasinRegion::Pacific,
            "southern" => BasinRegion::Southern,
            "arctic" => BasinRegion::Arctic,
            other => return Err(BundleError::invalid(format!("unknown basin '{other}'"))),
        };
        let band = match suffix {
            None => None,
            Some("tropc") => Some(LatitudeBand::Tropical),
            Some("subtN") => Some(LatitudeBand::SubtropicalNorth),
            Some("subpN") => Some(LatitudeBand::SubpolarNorth),
            Some("subtS") => Some(LatitudeBand::SubtropicalSouth),
            Some(other) => return Err(BundleError::invalid(format!("unknown basin sub-region '_{other}'"))),
        };
        Ok(Basin { region, band })
    }
}

/// Parámetros de una corrida WMT.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WmtRun {
    pub label: String,
    pub lambda: LambdaSpace,
    pub basin: Basin,
}

impl WmtRun {
    pub fn new(label: impl Into<String>, lambda: LambdaSpace, basin: Basin) -> Self {
        Self { label: label.into(), lambda, basin }
    }

    /// `<label>.G_<y0>to<y1>_<lambda>_<basin>`, años con cuatro dígitos.
    pub fn output_stem(&self, start_year: u32, end_year: u32) -> String {
        format!("{}.G_{start_year:04}to{end_year:04}_{}_{}", self.label, self.lambda, self.basin)
    }

    /// Archivo NetCDF con G(lambda) que escribe el programa externo.
    pub fn netcdf_name(&self, start_year: u32, end_year: u32) -> String {
        format!("{}.nc", self.output_stem(start_year, end_year))
    }

    pub fn comparison_plot_name(&self, start_year: u32, end_year: u32) -> String {
        format!("{}_comparison.png", self.output_stem(start_year, end_year))
    }

    pub fn figure_title(&self, start_year: u32, end_year: u32) -> String {
        format!("{} ({start_year}-{end_year})", self.basin.capitalized())
    }

    /// Directorio de productos de referencia bajo la ruta de observaciones.
    pub fn reference_dir(obs: &Path) -> PathBuf { obs.join("xwmt").join("obs_est_cmec").join("data") }

    /// `(etiqueta, ruta)` de cada producto de referencia para esta corrida.
    pub fn reference_files(&self, obs: &Path) -> Vec<(&'static str, PathBuf)> {
        let dir = Self::reference_dir(obs);
        REFERENCE_DATASETS.iter()
                          .map(|(dset, tag)| (*tag, dir.join(format!("{dset}.G-{}-{}.nc", self.lambda, self.basin))))
                          .collect()
    }

    /// Figuras de comparación de esta corrida presentes en `dir`, ordenadas
    /// por nombre, con el rango de años y la fecha de modificación.
    pub fn comparison_plots(&self, dir: &Path) -> BundleResult<Vec<ComparisonPlot>> {
        let prefix = format!("{}.G_", self.label);
        let suffix = format!("_{}_{}_comparison.png", self.lambda, self.basin);
        let entries = fs::read_dir(dir).map_err(|e| BundleError::filesystem(dir, e))?;
        let mut found = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| BundleError::filesystem(dir, e))?;
            let name = entry.file_name().to_string_lossy().into_owned();
            let years = name.strip_prefix(&prefix)
                            .and_then(|rest| rest.strip_suffix(&suffix))
                            .and_then(parse_year_span);
            if let Some(years) = years {
                let modified = entry.metadata().and_then(|m| m.modified()).ok();
                found.push(ComparisonPlot { name, years, modified });
            }
        }
        found.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(found)
    }

    /// Figura de comparación escrita después de tomar `before` (nueva o con
    /// otra fecha de modificación). Con varias gana la de mayor nombre.
    pub fn find_comparison_plot(&self,
                                dir: &Path,
                                before: &[ComparisonPlot])
                                -> BundleResult<Option<(String, (u32, u32))>> {
        Ok(self.comparison_plots(dir)?
               .into_iter()
               .filter(|plot| !before.contains(plot))
               .next_back()
               .map(|plot| (plot.name, plot.years)))
    }
}

/// Figura de comparación encontrada en el directorio de salida.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonPlot {
    pub name: String,
    pub years: (u32, u32),
    pub modified: Option<SystemTime>,
}

fn parse_year_span(s: &str) -> Option<(u32, u32)> {
    let (a, b) = s.split_once("to")?;
    Some((a.parse().ok()?, b.parse().ok()?))
}

/// Variables de entrada sin ningún `<var>*.nc` en `dir`.
pub fn missing_inputs(dir: &Path) -> BundleResult<Vec<&'static str>> {
    let names: Vec<String> = fs::read_dir(dir).map_err(|e| BundleError::filesystem(dir, e))?
                                              .filter_map(|e| e.ok())
                                              .map(|e| e.file_name().to_string_lossy().into_owned())
                                              .collect();
    Ok(INPUT_VARIABLES.iter()
                      .chain(STATIC_VARIABLES.iter())
                      .copied()
                      .filter(|var| !names.iter().any(|n| n.starts_with(var) && n.ends_with(".nc")))
                      .collect())
}
