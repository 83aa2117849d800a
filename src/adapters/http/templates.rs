use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use tera::{Tera, Value};

const TEMPLATE_GLOB: &str = "templates/**/*.html.tera";

/// Everything but RFC 3986 unreserved characters
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
  .remove(b'-')
  .remove(b'.')
  .remove(b'_')
  .remove(b'~');

/// Template engine wrapper for rendering HTML templates
#[derive(Clone)]
pub struct TemplateEngine {
  tera: Arc<Tera>,
}

impl TemplateEngine {
  /// Create a new template engine instance
  pub fn new() -> Result<Self, tera::Error> {
    Self::from_glob(TEMPLATE_GLOB)
  }

  pub fn from_glob(glob: &str) -> Result<Self, tera::Error> {
    let mut tera = Tera::new(glob)?;
    tera.autoescape_on(vec!["html.tera", ".html"]);
    tera.register_filter("cents", cents_filter);
    tera.register_filter("path_segment", path_segment_filter);

    Ok(Self {
      tera: Arc::new(tera),
    })
  }

  /// Render a template with the given context
  pub fn render(&self, template: &str, context: &tera::Context) -> Result<String, tera::Error> {
    self.tera.render(template, context)
  }
}

/// `{{ invoice.amount_cents | cents }}` renders 4550 as "45.50"
fn cents_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
  let cents = value
    .as_i64()
    .ok_or_else(|| tera::Error::msg("cents filter expects an integer"))?;
  Ok(Value::String(Decimal::new(cents, 2).to_string()))
}

/// Percent-encodes `raw` so it stays a single URL path segment
pub fn path_segment(raw: &str) -> String {
  utf8_percent_encode(raw, PATH_SEGMENT).to_string()
}

/// `{{ invoice.id | path_segment }}`
fn path_segment_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
  let raw = value
    .as_str()
    .ok_or_else(|| tera::Error::msg("path_segment filter expects a string"))?;
  Ok(Value::String(path_segment(raw)))
}
