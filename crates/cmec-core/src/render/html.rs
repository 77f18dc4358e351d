//! Página `index.html` mínima.
//!
//! Los valores interpolados se escapan: nombres de archivo y descripciones
//! pueden venir de argumentos de línea de comandos.
use crate::model::ArtifactEntry;

pub fn metrics_page(entry: &ArtifactEntry) -> String {
    page(&entry.description,
         "Metrics",
         &format!("<a href=\"{}\">Link to metrics</a>", escape(&entry.filename)))
}

pub fn plot_page(entry: &ArtifactEntry) -> String {
    page(&entry.description,
         "Figure",
         &format!("<img src=\"{}\" alt=\"{}\">", escape(&entry.filename), escape(&entry.long_name)))
}

fn page(title: &str, heading: &str, body: &str) -> String {
    format!("<html>\n<head><title>{}</title></head>\n<body>\n<h1>{}</h1>\n<p>{}</p>\n</body>\n</html>\n",
            escape(title),
            escape(heading),
            body)
}

/// Escapa texto para contenido y atributos HTML.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
