//! Envelope CMEC del archivo de métricas.
//!
//! Orden de secciones: `SCHEMA`, `DIMENSIONS`, `RESULTS`, `PROVENANCE`.
//! Las herramientas CMEC parsean estas claves literalmente.
use indexmap::IndexMap;
use serde::Serialize;

use crate::config::{NonFinitePolicy, SchemaInfo};
use crate::constants::JSON_STRUCTURE;
use crate::model::{MetricDescriptor, MetricResult, RegionDescriptor, RunMetadata};

#[derive(Debug, Serialize)]
pub struct MetricsEnvelope<'a> {
    #[serde(rename = "SCHEMA")]
    schema: &'a SchemaInfo,
    #[serde(rename = "DIMENSIONS")]
    dimensions: Dimensions,
    #[serde(rename = "RESULTS")]
    results: IndexMap<&'a str, IndexMap<&'a str, IndexMap<&'a str, MetricValue>>>,
    #[serde(rename = "PROVENANCE")]
    provenance: EnvelopeProvenance<'a>,
}

#[derive(Debug, Serialize)]
struct Dimensions {
    json_structure: [&'static str; 3],
    metric: IndexMap<String, MetricDescriptor>,
    region: IndexMap<String, RegionDescriptor>,
}

#[derive(Debug, Serialize)]
struct EnvelopeProvenance<'a> {
    date: String,
    environment: &'a IndexMap<String, String>,
}

/// Valor de `RESULTS`: número o marca explícita de no finito.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
enum MetricValue {
    Number(f64),
    Tagged(&'static str),
}

impl MetricValue {
    fn from_f64(v: f64, policy: NonFinitePolicy) -> Self {
        match policy {
            NonFinitePolicy::Tag if v.is_nan() => MetricValue::Tagged("NaN"),
            NonFinitePolicy::Tag if v.is_infinite() && v > 0.0 => MetricValue::Tagged("Infinity"),
            NonFinitePolicy::Tag if v.is_infinite() => MetricValue::Tagged("-Infinity"),
            // Con Reject los no finitos ya fueron rechazados por la validación.
            _ => MetricValue::Number(v),
        }
    }
}

impl<'a> MetricsEnvelope<'a> {
    pub fn new(schema: &'a SchemaInfo, result: &'a MetricResult, metadata: &'a RunMetadata, policy: NonFinitePolicy) -> Self {
        let mut results: IndexMap<&str, IndexMap<&str, IndexMap<&str, MetricValue>>> = IndexMap::new();
        for (region, var, metric, value) in result.iter() {
            results.entry(region)
                   .or_default()
                   .entry(var)
                   .or_default()
                   .insert(metric, MetricValue::from_f64(value, policy));
        }
        Self { schema,
               dimensions: Dimensions { json_structure: JSON_STRUCTURE,
                                        metric: result.metric_dimension(),
                                        region: result.region_dimension() },
               results,
               provenance: EnvelopeProvenance { date: metadata.date(),
                                                environment: metadata.environment() } }
    }
}
