//! Resultado métrico `region -> variable -> metric -> valor`.
//!
//! Se conserva el orden de inserción (IndexMap) para que `RESULTS` y
//! `DIMENSIONS` salgan en el mismo orden en que el cálculo los produjo.
//! La validación (claves no vacías, valores finitos) la hace el writer antes
//! de serializar; aquí sólo se acumulan datos.
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::ArtifactEntry;
use crate::constants::DEFAULT_CONTACT;

pub type VariableMetrics = IndexMap<String, f64>;
pub type RegionVariables = IndexMap<String, VariableMetrics>;
pub type ResultTree = IndexMap<String, RegionVariables>;

/// Entrada de `DIMENSIONS.metric`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MetricDescriptor {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Contact")]
    pub contact: String,
}

impl MetricDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), contact: DEFAULT_CONTACT.to_string() }
    }

    pub fn with_contact(mut self, contact: impl Into<String>) -> Self {
        self.contact = contact.into();
        self
    }
}

/// Entrada de `DIMENSIONS.region`; vacía (`{}`) si no se describe.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegionDescriptor {
    #[serde(rename = "Name", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl RegionDescriptor {
    pub fn named(name: impl Into<String>) -> Self { Self { name: Some(name.into()) } }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetricResult {
    /// Archivo de métricas y su entrada en el manifiesto.
    pub file: ArtifactEntry,
    results: ResultTree,
    metrics: IndexMap<String, MetricDescriptor>,
    regions: IndexMap<String, RegionDescriptor>,
}

impl MetricResult {
    pub fn new(file: ArtifactEntry) -> Self {
        Self { file,
               results: IndexMap::new(),
               metrics: IndexMap::new(),
               regions: IndexMap::new() }
    }

    /// Inserta (o reemplaza) un valor. Devuelve el valor previo si existía.
    pub fn insert(&mut self, region: &str, variable: &str, metric: &str, value: f64) -> Option<f64> {
        self.results
            .entry(region.to_string())
            .or_default()
            .entry(variable.to_string())
            .or_default()
            .insert(metric.to_string(), value)
    }

    pub fn with_value(mut self, region: &str, variable: &str, metric: &str, value: f64) -> Self {
        self.insert(region, variable, metric, value);
        self
    }

    pub fn describe_metric(mut self, metric: &str, descriptor: MetricDescriptor) -> Self {
        self.metrics.insert(metric.to_string(), descriptor);
        self
    }

    pub fn describe_region(mut self, region: &str, descriptor: RegionDescriptor) -> Self {
        self.regions.insert(region.to_string(), descriptor);
        self
    }

    pub fn results(&self) -> &ResultTree { &self.results }

    /// Cantidad total de valores métricos.
    pub fn len(&self) -> usize {
        self.results.values().flat_map(|vars| vars.values()).map(|m| m.len()).sum()
    }

    pub fn is_empty(&self) -> bool { self.len() == 0 }

    /// Valores en orden `(region, variable, metric, valor)`.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &str, f64)> {
        self.results.iter().flat_map(|(region, vars)| {
            vars.iter().flat_map(move |(var, metrics)| {
                metrics.iter().map(move |(metric, v)| (region.as_str(), var.as_str(), metric.as_str(), *v))
            })
        })
    }

    /// `DIMENSIONS.metric`: cada métrica presente, en orden de aparición.
    /// Las no descritas usan su propia clave como `Name`.
    pub fn metric_dimension(&self) -> IndexMap<String, MetricDescriptor> {
        let mut out = IndexMap::new();
        for (_, _, metric, _) in self.iter() {
            if !out.contains_key(metric) {
                let desc = self.metrics.get(metric).cloned().unwrap_or_else(|| MetricDescriptor::new(metric));
                out.insert(metric.to_string(), desc);
            }
        }
        out
    }

    /// `DIMENSIONS.region`: cada región presente, en orden de aparición.
    pub fn region_dimension(&self) -> IndexMap<String, RegionDescriptor> {
        self.results
            .keys()
            .map(|r| (r.clone(), self.regions.get(r).cloned().unwrap_or_default()))
            .collect()
    }
}
