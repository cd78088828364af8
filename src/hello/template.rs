use serde::{Deserialize, Serialize};
use std::io::{self, Write};

/// Greeting returned by `/hello-world`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Saying {
    pub id: i64,
    pub content: String,
}

/// A `%s`-style greeting template with a fallback name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    content: String,
    default_name: String,
}

impl Template {
    pub fn new(content: impl Into<String>, default_name: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            default_name: default_name.into(),
        }
    }

    /// Blank names count as missing
    pub fn render(&self, name: Option<&str>) -> String {
        let name = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(self.default_name.as_str());
        self.content.replace("%s", name)
    }

    /// Render each name, optionally followed by the default greeting
    pub fn render_all(&self, names: &[String], include_default: bool) -> Vec<String> {
        let mut rendered: Vec<String> = names
            .iter()
            .map(|name| self.render(Some(name.as_str())))
            .collect();
        if include_default {
            rendered.push(self.render(None));
        }
        rendered
    }

    /// Write one rendered line per name, independent of the log level
    pub fn write_rendered<W: Write>(
        &self,
        out: &mut W,
        names: &[String],
        include_default: bool,
    ) -> io::Result<()> {
        for line in self.render_all(names, include_default) {
            writeln!(out, "{}", line)?;
        }
        Ok(())
    }
}
