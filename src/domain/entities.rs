//! Domain entities: core data structures

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Kind of a content tile attached to a topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    /// Interactive Geogebra applet
    Geogebra,
    /// Image file
    Image,
    /// Text snippet or file
    Text,
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Geogebra => "geogebra",
            Self::Image => "image",
            Self::Text => "text",
        };
        f.write_str(name)
    }
}

impl FromStr for ContentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "geogebra" => Ok(Self::Geogebra),
            "image" => Ok(Self::Image),
            "text" => Ok(Self::Text),
            other => Err(format!(
                "unknown content kind {other:?} (expected geogebra, image or text)"
            )),
        }
    }
}

/// Content reference attached to a topic. Rendering is someone else's job;
/// the tree only stores and round-trips the reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Content {
    #[serde(rename = "@type")]
    pub kind: ContentKind,
    /// Path or identifier of the content source
    #[serde(rename = "@source")]
    pub source: String,
    #[serde(
        rename = "@description",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,
}

impl fmt::Display for Content {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.source)?;
        if let Some(description) = &self.description {
            write!(f, " ({description})")?;
        }
        Ok(())
    }
}

/// Persisted form of the whole topic hierarchy (`<topics>` element).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicDocument {
    /// Display title of the root
    #[serde(rename = "@title", default, skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(rename = "topic", default)]
    pub topics: Vec<TopicElement>,
}

/// Persisted form of a single topic (`<topic>` element).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicElement {
    #[serde(rename = "@title")]
    pub title: String,
    #[serde(rename = "content", default, skip_serializing_if = "Vec::is_empty")]
    pub contents: Vec<Content>,
    #[serde(rename = "topic", default, skip_serializing_if = "Vec::is_empty")]
    pub topics: Vec<TopicElement>,
}

impl TopicElement {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            contents: Vec::new(),
            topics: Vec::new(),
        }
    }

    pub fn with_topics(mut self, topics: Vec<TopicElement>) -> Self {
        self.topics = topics;
        self
    }
}

/// Scope in which topic titles have to be unique.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TitleScope {
    /// Titles are unique among the children of one parent
    #[default]
    Siblings,
    /// Titles are unique across the whole tree
    Tree,
}

impl fmt::Display for TitleScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Siblings => f.write_str("siblings"),
            Self::Tree => f.write_str("tree"),
        }
    }
}

impl FromStr for TitleScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "siblings" => Ok(Self::Siblings),
            "tree" => Ok(Self::Tree),
            other => Err(format!(
                "unknown title scope {other:?} (expected siblings or tree)"
            )),
        }
    }
}

/// Mutation of the topic tree, dispatched through
/// [`TopicTreeController::apply`](crate::application::services::TopicTreeController::apply).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopicCommand {
    /// Add `title` under `parent` (root if `None`)
    Add {
        title: String,
        parent: Option<String>,
    },
    Rename {
        from: String,
        to: String,
    },
    /// Remove `title` and its whole subtree
    Remove { title: String },
    /// Re-parent `title` under `parent` (root if `None`)
    Move {
        title: String,
        parent: Option<String>,
    },
    Attach { title: String, content: Content },
}

/// Expand environment variables in a path string.
///
/// Supports `$VAR`, `${VAR}` and `~`.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_mixed_case_kind_when_parsing_then_accepts() {
        assert_eq!("GeoGebra".parse::<ContentKind>(), Ok(ContentKind::Geogebra));
        assert!("video".parse::<ContentKind>().is_err());
    }

    #[test]
    fn given_scope_names_when_parsing_then_round_trips_display() {
        for scope in [TitleScope::Siblings, TitleScope::Tree] {
            assert_eq!(scope.to_string().parse::<TitleScope>(), Ok(scope));
        }
    }

    #[test]
    fn given_content_with_description_when_displaying_then_shows_all_parts() {
        let content = Content {
            kind: ContentKind::Image,
            source: "circles.png".into(),
            description: Some("unit circle".into()),
        };
        assert_eq!(content.to_string(), "[image] circles.png (unit circle)");
    }
}
