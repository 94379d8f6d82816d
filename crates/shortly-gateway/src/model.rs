use serde::Deserialize;

/// Form body of a shorten request: `url=<value>`.
#[derive(Debug, Default, Deserialize)]
pub struct ShortenForm {
    #[serde(default)]
    pub url: Option<String>,
}
