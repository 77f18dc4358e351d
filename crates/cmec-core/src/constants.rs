//! Constantes del contrato CMEC.
//!
//! Nombres de archivo y claves que las herramientas CMEC aguas abajo esperan
//! literalmente. Cambiar cualquiera de estos valores rompe la lectura del
//! bundle por parte de esas herramientas.

/// Nombre de la página índice escrita en cada bundle.
pub const INDEX_FILE: &str = "index.html";

/// Nombre del manifiesto del bundle.
pub const MANIFEST_FILE: &str = "output.json";

/// Estructura ordenada de `RESULTS` declarada en `DIMENSIONS.json_structure`.
pub const JSON_STRUCTURE: [&str; 3] = ["region", "var", "metric"];

/// Valores por defecto de la sección `SCHEMA`.
pub const DEFAULT_SCHEMA_NAME: &str = "CMEC";
pub const DEFAULT_SCHEMA_VERSION: &str = "v1";
pub const DEFAULT_SCHEMA_PACKAGE: &str = "CMECTEST";

/// Contacto usado cuando una métrica no declara uno.
pub const DEFAULT_CONTACT: &str = "none";

/// Formato de fecha (sin el sufijo) usado en `PROVENANCE.date` y `provenance.date`.
pub const DATE_FORMAT: &str = "%b %d %Y %H:%M:%S";
pub const DATE_SUFFIX: &str = " UTC";

/// Indentación de los JSON escritos (cuatro espacios).
pub const JSON_INDENT: &[u8] = b"    ";
