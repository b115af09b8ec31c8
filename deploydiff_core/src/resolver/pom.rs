//! Minimal reader for Maven POM descriptors.
//!
//! Only the elements needed to compute the declared dependencies are read:
//! coordinates, parent, properties, dependencies and dependency management.

use deploydiff_common::Coordinates;
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

static COMMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").unwrap());

static PROPERTY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<([A-Za-z0-9_.\-]+)\s*>([^<]*)</([A-Za-z0-9_.\-]+)\s*>").unwrap()
});

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").unwrap());

/// A `<dependency>` element before interpolation and management are applied
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawDependency {
    pub group_id: String,
    pub artifact_id: String,
    pub version: Option<String>,
    pub classifier: Option<String>,
    pub scope: Option<String>,
    pub optional: Option<String>,
}

impl RawDependency {
    /// Key used to match a dependency with its managed counterpart
    pub fn management_key(&self) -> (String, String, String) {
        (
            self.group_id.clone(),
            self.artifact_id.clone(),
            self.classifier.clone().unwrap_or_default(),
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PomModel {
    pub group_id: Option<String>,
    pub artifact_id: String,
    pub version: Option<String>,
    pub parent: Option<Coordinates>,
    pub properties: Vec<(String, String)>,
    pub dependencies: Vec<RawDependency>,
    pub managed_dependencies: Vec<RawDependency>,
}

impl PomModel {
    pub fn parse(content: &str) -> Result<PomModel, String> {
        let content = COMMENT.replace_all(content, "");
        let project = element(&content, "project").ok_or("no <project> element")?;

        let parent = match element(project, "parent") {
            Some(parent) => Some(Coordinates::new(
                required_text(parent, "groupId", "parent")?,
                required_text(parent, "artifactId", "parent")?,
                required_text(parent, "version", "parent")?,
            )),
            None => None,
        };

        let properties = element(project, "properties")
            .map(parse_properties)
            .unwrap_or_default();

        let management = element(project, "dependencyManagement");
        let managed_dependencies = match management.and_then(|m| element(m, "dependencies")) {
            Some(block) => parse_dependencies(block)?,
            None => Vec::new(),
        };

        let mut own = project.to_string();
        for tag in [
            "parent",
            "dependencyManagement",
            "build",
            "reporting",
            "profiles",
            "properties",
        ] {
            own = remove_elements(&own, tag);
        }
        let dependencies = match element(&own, "dependencies") {
            Some(block) => parse_dependencies(block)?,
            None => Vec::new(),
        };
        let own = remove_elements(&own, "dependencies");

        Ok(PomModel {
            group_id: text(&own, "groupId"),
            artifact_id: required_text(&own, "artifactId", "project")?,
            version: text(&own, "version"),
            parent,
            properties,
            dependencies,
            managed_dependencies,
        })
    }

    /// Group id of the project, inherited from the parent when absent
    pub fn effective_group_id(&self) -> Option<&str> {
        self.group_id
            .as_deref()
            .or_else(|| self.parent.as_ref().map(|parent| parent.group_id.as_str()))
    }

    /// Version of the project, inherited from the parent when absent
    pub fn effective_version(&self) -> Option<&str> {
        self.version
            .as_deref()
            .or_else(|| self.parent.as_ref().map(|parent| parent.version.as_str()))
    }
}

fn parse_dependencies(block: &str) -> Result<Vec<RawDependency>, String> {
    elements(block, "dependency")
        .into_iter()
        .map(|dependency| {
            let dependency = remove_elements(dependency, "exclusions");
            Ok(RawDependency {
                group_id: required_text(&dependency, "groupId", "dependency")?,
                artifact_id: required_text(&dependency, "artifactId", "dependency")?,
                version: text(&dependency, "version"),
                classifier: text(&dependency, "classifier"),
                scope: text(&dependency, "scope"),
                optional: text(&dependency, "optional"),
            })
        })
        .collect()
}

fn parse_properties(block: &str) -> Vec<(String, String)> {
    PROPERTY
        .captures_iter(block)
        .filter(|caps| caps[1] == caps[3])
        .map(|caps| (caps[1].to_string(), unescape(caps[2].trim())))
        .collect()
}

/// Replaces `${name}` placeholders from `properties`; unknown ones are kept.
pub fn interpolate(value: &str, properties: &HashMap<String, String>) -> String {
    let mut current = value.to_string();
    // Bounded so that self-referencing properties terminate
    for _ in 0..8 {
        let next = PLACEHOLDER
            .replace_all(&current, |caps: &regex::Captures| {
                properties
                    .get(&caps[1])
                    .cloned()
                    .unwrap_or_else(|| caps[0].to_string())
            })
            .to_string();
        if next == current {
            break;
        }
        current = next;
    }
    current
}

fn required_text(xml: &str, tag: &str, context: &str) -> Result<String, String> {
    text(xml, tag).ok_or_else(|| format!("missing <{}> in <{}>", tag, context))
}

fn text(xml: &str, tag: &str) -> Option<String> {
    element(xml, tag)
        .map(|value| unescape(value.trim()))
        .filter(|value| !value.is_empty())
}

fn unescape(value: &str) -> String {
    value
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// Location of an element: start of the opening tag, start and end of its
/// content, end of the closing tag.
struct Span {
    start: usize,
    content_start: usize,
    content_end: usize,
    end: usize,
}

fn find_span(xml: &str, tag: &str, from: usize) -> Option<Span> {
    let open = format!("<{}", tag);
    let close = format!("</{}>", tag);
    let mut search = from;
    while let Some(offset) = xml[search..].find(&open) {
        let start = search + offset;
        let after_name = start + open.len();
        let boundary = xml[after_name..].chars().next()?;
        if boundary == '>' || boundary == '/' || boundary.is_whitespace() {
            let tag_end = after_name + xml[after_name..].find('>')?;
            if xml[..tag_end].ends_with('/') {
                return Some(Span {
                    start,
                    content_start: tag_end,
                    content_end: tag_end,
                    end: tag_end + 1,
                });
            }
            let content_start = tag_end + 1;
            let content_end = content_start + xml[content_start..].find(&close)?;
            return Some(Span {
                start,
                content_start,
                content_end,
                end: content_end + close.len(),
            });
        }
        search = after_name;
    }
    None
}

fn element<'a>(xml: &'a str, tag: &str) -> Option<&'a str> {
    find_span(xml, tag, 0).map(|span| &xml[span.content_start..span.content_end])
}

fn elements<'a>(xml: &'a str, tag: &str) -> Vec<&'a str> {
    let mut found = Vec::new();
    let mut from = 0;
    while let Some(span) = find_span(xml, tag, from) {
        found.push(&xml[span.content_start..span.content_end]);
        from = span.end;
    }
    found
}

fn remove_elements(xml: &str, tag: &str) -> String {
    let mut result = String::with_capacity(xml.len());
    let mut from = 0;
    while let Some(span) = find_span(xml, tag, from) {
        result.push_str(&xml[from..span.start]);
        from = span.end;
    }
    result.push_str(&xml[from..]);
    result
}
