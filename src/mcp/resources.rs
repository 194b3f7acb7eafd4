use serde_json::Value;

use super::error::StartupError;
use super::protocol::{Resource, ResourceContents};
use super::tokens;

pub const JSON_MIME: &str = "application/json";

/// Produces the payload for a resource. Receives the captured template
/// parameter, if any; `None` from the producer means "not found".
pub type DataProducer = fn(Option<&str>) -> Option<Value>;

#[derive(Debug, Clone, PartialEq)]
enum UriPattern {
    Exact(String),
    Template { prefix: String, suffix: String },
}

impl UriPattern {
    fn parse(uri: &str) -> Result<Self, StartupError> {
        let Some(open) = uri.find('{') else {
            return Ok(UriPattern::Exact(uri.to_string()));
        };
        let close = uri[open..]
            .find('}')
            .map(|offset| open + offset)
            .ok_or_else(|| StartupError::InvalidResourceUri(uri.to_string()))?;
        let suffix = &uri[close + 1..];
        if suffix.contains('{') {
            return Err(StartupError::InvalidResourceUri(uri.to_string()));
        }
        Ok(UriPattern::Template {
            prefix: uri[..open].to_string(),
            suffix: suffix.to_string(),
        })
    }

    /// Returns the captured parameter (or `None` for exact patterns) on match.
    fn capture<'a>(&self, uri: &'a str) -> Option<Option<&'a str>> {
        match self {
            UriPattern::Exact(exact) => (exact == uri).then_some(None),
            UriPattern::Template { prefix, suffix } => {
                let rest = uri.strip_prefix(prefix.as_str())?;
                let param = rest.strip_suffix(suffix.as_str())?;
                if param.is_empty() || param.contains('/') {
                    return None;
                }
                Some(Some(param))
            }
        }
    }

    fn is_exact(&self) -> bool {
        matches!(self, UriPattern::Exact(_))
    }
}

pub struct ResourceDescriptor {
    pub uri: String,
    pub name: String,
    pub description: String,
    pub mime_type: String,
    pattern: UriPattern,
    producer: DataProducer,
}

impl ResourceDescriptor {
    pub fn new(
        uri: &str,
        name: &str,
        description: &str,
        producer: DataProducer,
    ) -> Result<Self, StartupError> {
        Ok(Self {
            uri: uri.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            mime_type: JSON_MIME.to_string(),
            pattern: UriPattern::parse(uri)?,
            producer,
        })
    }

    fn listing(&self) -> Resource {
        Resource {
            uri: self.uri.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            mime_type: self.mime_type.clone(),
        }
    }
}

/// URI-addressed catalog of read-only payloads
pub struct ResourceCatalog {
    descriptors: Vec<ResourceDescriptor>,
}

impl ResourceCatalog {
    pub fn empty() -> Self {
        Self {
            descriptors: Vec::new(),
        }
    }

    pub fn register(&mut self, descriptor: ResourceDescriptor) -> Result<(), StartupError> {
        if self.descriptors.iter().any(|d| d.uri == descriptor.uri) {
            return Err(StartupError::Duplicate {
                kind: "resource",
                name: descriptor.uri,
            });
        }
        self.descriptors.push(descriptor);
        Ok(())
    }

    /// Catalog of the Apple design token resources
    pub fn design_tokens() -> Result<Self, StartupError> {
        let mut catalog = Self::empty();
        let entries: [(&str, &str, &str, DataProducer); 13] = [
            (
                "appleui://colors/{category}",
                "Apple Color Tokens",
                "Color tokens by category: system, semantic, gradients or all",
                |category| category.and_then(tokens::colors),
            ),
            (
                "appleui://typography/{platform}",
                "Apple Typography Scale",
                "Typography scale with sizes, weights and line heights for ios, macos, web or all",
                |platform| platform.and_then(tokens::typography),
            ),
            (
                "appleui://spacing",
                "Apple Spacing System",
                "8pt grid spacing system with layout and component values",
                |_| Some(tokens::spacing()),
            ),
            (
                "appleui://spacing/scale",
                "Spacing Scale",
                "Base spacing scale values (xxs to xxxl)",
                |_| Some(tokens::spacing_scale()),
            ),
            (
                "appleui://spacing/components",
                "Component Spacing",
                "Spacing values for common UI components",
                |_| Some(tokens::spacing_components()),
            ),
            (
                "appleui://animations",
                "Apple Animation System",
                "Spring animations, timing curves and motion patterns",
                |_| Some(tokens::animations()),
            ),
            (
                "appleui://animations/springs",
                "Spring Animations",
                "Spring animation configurations for natural motion",
                |_| Some(tokens::animation_springs()),
            ),
            (
                "appleui://animations/curves",
                "Bezier Curves",
                "CSS cubic-bezier timing functions",
                |_| Some(tokens::animation_curves()),
            ),
            (
                "appleui://animations/patterns",
                "Animation Patterns",
                "Common UI animation patterns with timing",
                |_| Some(tokens::animation_patterns()),
            ),
            (
                "appleui://shadows",
                "Apple Shadow System",
                "Elevation levels and shadow specifications",
                |_| Some(tokens::shadows()),
            ),
            (
                "appleui://shadows/css",
                "CSS Shadow Values",
                "Pre-computed CSS box-shadow values",
                |_| Some(tokens::shadows_css()),
            ),
            (
                "appleui://materials",
                "Apple Materials",
                "Blur and vibrancy material specifications",
                |_| Some(tokens::materials()),
            ),
            (
                "appleui://materials/css",
                "CSS Material Values",
                "CSS backdrop-filter values for materials",
                |_| Some(tokens::materials_css()),
            ),
        ];

        for (uri, name, description, producer) in entries {
            catalog.register(ResourceDescriptor::new(uri, name, description, producer)?)?;
        }
        Ok(catalog)
    }

    pub fn list(&self) -> Vec<Resource> {
        self.descriptors.iter().map(|d| d.listing()).collect()
    }

    pub fn count(&self) -> usize {
        self.descriptors.len()
    }

    /// Resolve and materialize a resource; `None` when nothing matches.
    ///
    /// Exact URIs win over templates, so `appleui://spacing/scale` is never
    /// captured by a `{param}` pattern.
    pub fn read(&self, uri: &str) -> Option<ResourceContents> {
        let exact = self
            .descriptors
            .iter()
            .filter(|d| d.pattern.is_exact())
            .find_map(|d| d.pattern.capture(uri).map(|param| (d, param)));
        let (descriptor, param) = exact.or_else(|| {
            self.descriptors
                .iter()
                .filter(|d| !d.pattern.is_exact())
                .find_map(|d| d.pattern.capture(uri).map(|param| (d, param)))
        })?;

        let data = (descriptor.producer)(param)?;
        let text = serde_json::to_string_pretty(&data).ok()?;
        Some(ResourceContents {
            uri: uri.to_string(),
            mime_type: descriptor.mime_type.clone(),
            text,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> ResourceCatalog {
        ResourceCatalog::design_tokens().unwrap()
    }

    #[test]
    fn template_resolves_known_category() {
        let contents = catalog().read("appleui://colors/system").unwrap();
        assert_eq!(contents.uri, "appleui://colors/system");
        assert_eq!(contents.mime_type, "application/json");
        let parsed: Value = serde_json::from_str(&contents.text).unwrap();
        assert_eq!(parsed["blue"]["light"], "#007AFF");
    }

    #[test]
    fn template_rejects_unknown_category() {
        assert!(catalog().read("appleui://colors/bogus").is_none());
    }

    #[test]
    fn template_parameter_must_be_a_single_segment() {
        let catalog = catalog();
        assert!(catalog.read("appleui://colors/").is_none());
        assert!(catalog.read("appleui://colors/system/extra").is_none());
    }

    #[test]
    fn exact_uri_wins() {
        let contents = catalog().read("appleui://spacing/scale").unwrap();
        let parsed: Value = serde_json::from_str(&contents.text).unwrap();
        assert_eq!(parsed["md"], 16);
    }

    #[test]
    fn text_is_pretty_printed_producer_output() {
        let contents = catalog().read("appleui://shadows/css").unwrap();
        let expected = serde_json::to_string_pretty(&tokens::shadows_css()).unwrap();
        assert_eq!(contents.text, expected);
    }

    #[test]
    fn listing_drops_producers_and_keeps_order() {
        let listed = catalog().list();
        assert_eq!(listed.len(), 13);
        assert_eq!(listed[0].uri, "appleui://colors/{category}");
        assert!(listed.iter().all(|r| r.mime_type == JSON_MIME));
    }

    #[test]
    fn duplicate_uri_is_rejected() {
        let mut catalog = ResourceCatalog::empty();
        catalog
            .register(ResourceDescriptor::new("appleui://x", "x", "x", |_| None).unwrap())
            .unwrap();
        let err = catalog
            .register(ResourceDescriptor::new("appleui://x", "x", "x", |_| None).unwrap())
            .unwrap_err();
        assert!(matches!(err, StartupError::Duplicate { kind: "resource", .. }));
    }

    #[test]
    fn unknown_uri_is_not_found() {
        assert!(catalog().read("appleui://nothing").is_none());
    }
}
