#![forbid(unsafe_code)]

//! Configuration document parsing.
//!
//! ```xml
//! <Configuration xmlns="http://www.xmlsecurity.org/NS/#configuration">
//!   <ResourceBundles defaultLanguageCode="en" defaultCountryCode="US"/>
//!   <TransformAlgorithms>
//!     <TransformAlgorithm URI="..." JAVACLASS="ulriksdal::transforms::Base64Decode"/>
//!   </TransformAlgorithms>
//!   <ResourceResolvers>
//!     <Resolver JAVACLASS="ulriksdal::resolver::LocalFile" DESCRIPTION="..."/>
//!   </ResourceResolvers>
//!   <PrefixMappings>
//!     <PrefixMapping namespace="http://www.w3.org/2000/09/xmldsig#" prefix="ds"/>
//!   </PrefixMappings>
//! </Configuration>
//! ```
//!
//! Sections are recognised by local name; entries must be in the
//! configuration namespace. Anything else is ignored.

use roxmltree::{Document, Node};
use ulriksdal_core::{ns, Error};
use ulriksdal_registry::Category;

/// Attribute naming the implementation identifier.
pub const IMPLEMENTATION_ATTR: &str = "JAVACLASS";
/// Accepted alternative spelling of [`IMPLEMENTATION_ATTR`].
pub const IMPLEMENTATION_ATTR_ALT: &str = "Implementation";

/// One entry to register.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationRequest {
    pub category: Category,
    /// Algorithm URI; for resolvers, the implementation identifier.
    pub id: String,
    pub implementation: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixMapping {
    pub namespace: String,
    pub prefix: String,
}

/// Default locale for diagnostics, from `ResourceBundles`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Locale {
    pub language: Option<String>,
    pub country: Option<String>,
}

impl Locale {
    pub fn new(language: &str, country: &str) -> Self {
        Self {
            language: Some(language.to_owned()),
            country: Some(country.to_owned()),
        }
    }
}

/// An entry dropped because a required attribute was absent or empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    pub section: String,
    pub element: String,
    pub missing: &'static str,
}

/// The parsed document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Configuration {
    /// Registration requests in document order.
    pub requests: Vec<RegistrationRequest>,
    pub prefix_mappings: Vec<PrefixMapping>,
    pub locale: Option<Locale>,
    /// The `JCEAlgorithmMappings` element, verbatim.
    pub provider_mappings: Option<String>,
    pub skipped: Vec<SkippedEntry>,
}

impl Configuration {
    pub fn requests_in(&self, category: Category) -> impl Iterator<Item = &RegistrationRequest> {
        self.requests.iter().filter(move |r| r.category == category)
    }
}

/// Parses configuration documents.
pub struct ConfigurationLoader;

impl ConfigurationLoader {
    pub fn parse(text: &str) -> Result<Configuration, Error> {
        let doc = Document::parse(text)
            .map_err(|e| Error::ConfigDocument(format!("malformed XML: {e}")))?;
        let root = doc.root_element();
        if root.tag_name().name() != "Configuration" {
            return Err(Error::ConfigDocument(format!(
                "expected Configuration root, found {}",
                root.tag_name().name()
            )));
        }

        let mut config = Configuration::default();
        for section in root.children().filter(Node::is_element) {
            match section.tag_name().name() {
                "ResourceBundles" => {
                    config.locale = Some(Locale {
                        language: section.attribute("defaultLanguageCode").map(str::to_owned),
                        country: section.attribute("defaultCountryCode").map(str::to_owned),
                    });
                }
                "CanonicalizationMethods" => algorithm_entries(
                    &mut config,
                    section,
                    "CanonicalizationMethod",
                    Category::Canonicalizer,
                ),
                "TransformAlgorithms" => algorithm_entries(
                    &mut config,
                    section,
                    "TransformAlgorithm",
                    Category::Transform,
                ),
                "SignatureAlgorithms" => algorithm_entries(
                    &mut config,
                    section,
                    "SignatureAlgorithm",
                    Category::SignatureAlgorithm,
                ),
                "JCEAlgorithmMappings" => {
                    config.provider_mappings = Some(doc.input_text()[section.range()].to_owned());
                }
                "ResourceResolvers" => {
                    resolver_entries(&mut config, section, Category::ResourceResolver)
                }
                "KeyResolver" => resolver_entries(&mut config, section, Category::KeyResolver),
                "PrefixMappings" => {
                    for entry in entries(section, "PrefixMapping") {
                        let Some(namespace) = required(&mut config, section, entry, "namespace")
                        else {
                            continue;
                        };
                        let Some(prefix) = required(&mut config, section, entry, "prefix") else {
                            continue;
                        };
                        config.prefix_mappings.push(PrefixMapping { namespace, prefix });
                    }
                }
                other => tracing::trace!(section = other, "ignoring configuration section"),
            }
        }
        Ok(config)
    }
}

fn entries<'a, 'input: 'a>(
    section: Node<'a, 'input>,
    name: &'static str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    section
        .children()
        .filter(move |n| n.is_element() && n.has_tag_name((ns::CONFIGURATION, name)))
}

fn implementation_of<'a>(entry: Node<'a, '_>) -> Option<&'a str> {
    entry
        .attribute(IMPLEMENTATION_ATTR)
        .or_else(|| entry.attribute(IMPLEMENTATION_ATTR_ALT))
}

fn algorithm_entries(
    config: &mut Configuration,
    section: Node<'_, '_>,
    name: &'static str,
    category: Category,
) {
    for entry in entries(section, name) {
        let Some(id) = required(config, section, entry, "URI") else {
            continue;
        };
        let Some(implementation) = non_empty(implementation_of(entry)) else {
            skip(config, section, entry, IMPLEMENTATION_ATTR);
            continue;
        };
        config.requests.push(RegistrationRequest {
            category,
            id,
            implementation,
            description: None,
        });
    }
}

fn resolver_entries(config: &mut Configuration, section: Node<'_, '_>, category: Category) {
    for entry in entries(section, "Resolver") {
        let Some(implementation) = non_empty(implementation_of(entry)) else {
            skip(config, section, entry, IMPLEMENTATION_ATTR);
            continue;
        };
        config.requests.push(RegistrationRequest {
            category,
            id: implementation.clone(),
            implementation,
            description: non_empty(entry.attribute("DESCRIPTION")),
        });
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_owned)
}

fn required(
    config: &mut Configuration,
    section: Node<'_, '_>,
    entry: Node<'_, '_>,
    attr: &'static str,
) -> Option<String> {
    let value = non_empty(entry.attribute(attr));
    if value.is_none() {
        skip(config, section, entry, attr);
    }
    value
}

fn skip(
    config: &mut Configuration,
    section: Node<'_, '_>,
    entry: Node<'_, '_>,
    missing: &'static str,
) {
    let skipped = SkippedEntry {
        section: section.tag_name().name().to_owned(),
        element: entry.tag_name().name().to_owned(),
        missing,
    };
    tracing::warn!(
        section = %skipped.section,
        element = %skipped.element,
        attribute = missing,
        "configuration entry lacks a required attribute"
    );
    config.skipped.push(skipped);
}
