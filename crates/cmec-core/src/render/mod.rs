//! Renderizado de los tres artifacts del bundle.
//!
//! Todo es transformación pura a bytes; la escritura a disco vive en `writer`.

pub mod envelope;
pub mod html;
pub mod manifest;

pub use envelope::MetricsEnvelope;
pub use manifest::{Manifest, ManifestContent, ManifestProvenance};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::constants::JSON_INDENT;
use crate::errors::BundleResult;

/// JSON indentado a cuatro espacios, sin salto de línea final.
pub fn to_pretty_json<T: Serialize>(value: &T) -> BundleResult<Vec<u8>> {
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(JSON_INDENT));
    value.serialize(&mut ser)?;
    Ok(buf)
}
