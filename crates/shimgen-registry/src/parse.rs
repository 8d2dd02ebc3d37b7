//! Pull parser over the registry XML.
//!
//! Only the sections the generator consumes are materialized: `<commands>`,
//! `<feature>`, and `<extensions>`. Everything else (`<enums>`, `<types>`,
//! `<groups>`, per-command `<alias>`/`<glx>` annotations) is skipped.

use std::io::Read;

use xml::attribute::OwnedAttribute;
use xml::reader::{EventReader, XmlEvent};

use crate::model::{Command, Extension, Feature, Param, Registry, Require};
use crate::{RegistryError, Result};

pub(crate) struct RegistryParser<R: Read> {
    events: EventReader<R>,
}

impl<R: Read> RegistryParser<R> {
    pub(crate) fn new(reader: R) -> Self {
        Self {
            events: EventReader::new(reader),
        }
    }

    pub(crate) fn parse(mut self) -> Result<Registry> {
        let mut registry = Registry::default();
        loop {
            match self.events.next()? {
                XmlEvent::StartElement {
                    name, attributes, ..
                } => match name.local_name.as_str() {
                    "commands" => self.parse_commands(&mut registry)?,
                    "feature" => {
                        let feature = self.parse_feature(&attributes)?;
                        registry.features.insert(feature.name.clone(), feature);
                    }
                    "extensions" => self.parse_extensions(&mut registry)?,
                    _ => {}
                },
                XmlEvent::EndDocument => break,
                _ => {}
            }
        }
        Ok(registry)
    }

    fn parse_commands(&mut self, registry: &mut Registry) -> Result<()> {
        loop {
            match self.events.next()? {
                XmlEvent::StartElement { name, .. } => {
                    if name.local_name == "command" {
                        let command = self.parse_command()?;
                        registry.commands.insert(command.name.clone(), command);
                    } else {
                        self.skip_element()?;
                    }
                }
                XmlEvent::EndElement { name } if name.local_name == "commands" => return Ok(()),
                _ => {}
            }
        }
    }

    fn parse_command(&mut self) -> Result<Command> {
        let mut proto: Option<(String, String)> = None;
        let mut params = Vec::new();
        loop {
            match self.events.next()? {
                XmlEvent::StartElement {
                    name, attributes, ..
                } => match name.local_name.as_str() {
                    "proto" => proto = Some(self.parse_proto()?),
                    "param" => params.push(self.parse_param(&attributes)?),
                    _ => self.skip_element()?,
                },
                XmlEvent::EndElement { name } if name.local_name == "command" => break,
                _ => {}
            }
        }
        let (return_type, name) = proto.ok_or(RegistryError::MissingProto)?;
        Ok(Command {
            name,
            return_type,
            params,
        })
    }

    /// The return type is every text fragment under `<proto>` except the
    /// `<name>` text, concatenated and trimmed. `<ptype>` text flows into
    /// the return type.
    fn parse_proto(&mut self) -> Result<(String, String)> {
        let mut return_text = String::new();
        let mut name: Option<String> = None;
        let mut in_name = false;
        loop {
            match self.events.next()? {
                XmlEvent::StartElement { name: el, .. } => {
                    if el.local_name == "name" {
                        in_name = true;
                    }
                }
                XmlEvent::EndElement { name: el } => match el.local_name.as_str() {
                    "proto" => break,
                    "name" => in_name = false,
                    _ => {}
                },
                XmlEvent::Characters(text) => {
                    if in_name {
                        name.get_or_insert_with(String::new).push_str(&text);
                    } else {
                        return_text.push_str(&text);
                    }
                }
                XmlEvent::Whitespace(text) => {
                    if !in_name {
                        return_text.push_str(&text);
                    }
                }
                _ => {}
            }
        }
        let name = name.ok_or(RegistryError::MissingName)?;
        Ok((return_text.trim().to_owned(), name))
    }

    /// Collect every non-empty text fragment under `<param>` (qualifiers,
    /// `<ptype>` text, pointer markers, the `<name>` text, array suffixes)
    /// and re-split on whitespace so each token is a single word.
    fn parse_param(&mut self, attributes: &[OwnedAttribute]) -> Result<Param> {
        let len = attr(attributes, "len").map(str::to_owned);
        let mut fragments: Vec<String> = Vec::new();
        let mut name = String::new();
        let mut in_name = false;
        loop {
            match self.events.next()? {
                XmlEvent::StartElement { name: el, .. } => {
                    if el.local_name == "name" {
                        in_name = true;
                    }
                }
                XmlEvent::EndElement { name: el } => match el.local_name.as_str() {
                    "param" => break,
                    "name" => in_name = false,
                    _ => {}
                },
                XmlEvent::Characters(text) => {
                    let trimmed = text.trim();
                    if !trimmed.is_empty() {
                        fragments.push(trimmed.to_owned());
                    }
                    if in_name {
                        name.push_str(trimmed);
                    }
                }
                _ => {}
            }
        }
        if name.is_empty() {
            return Err(RegistryError::MissingName);
        }
        let tokens = fragments
            .iter()
            .flat_map(|f| f.split_whitespace())
            .map(str::to_owned)
            .collect();
        Ok(Param { tokens, name, len })
    }

    /// Features keep only their `<require>/<command>` references; `<remove>`
    /// blocks and enum/type requirements are skipped.
    fn parse_feature(&mut self, attributes: &[OwnedAttribute]) -> Result<Feature> {
        let name = attr(attributes, "name")
            .ok_or(RegistryError::UnnamedFeature)?
            .to_owned();
        let api = attr(attributes, "api").map(str::to_owned);
        let mut commands = Vec::new();
        loop {
            match self.events.next()? {
                XmlEvent::StartElement { name: el, .. } => {
                    if el.local_name == "require" {
                        self.collect_command_refs(&name, &mut commands)?;
                    } else {
                        self.skip_element()?;
                    }
                }
                XmlEvent::EndElement { name: el } if el.local_name == "feature" => break,
                _ => {}
            }
        }
        Ok(Feature {
            name,
            api,
            commands,
        })
    }

    fn parse_extensions(&mut self, registry: &mut Registry) -> Result<()> {
        loop {
            match self.events.next()? {
                XmlEvent::StartElement {
                    name, attributes, ..
                } => {
                    if name.local_name == "extension" {
                        registry.extensions.push(self.parse_extension(&attributes)?);
                    } else {
                        self.skip_element()?;
                    }
                }
                XmlEvent::EndElement { name } if name.local_name == "extensions" => return Ok(()),
                _ => {}
            }
        }
    }

    fn parse_extension(&mut self, attributes: &[OwnedAttribute]) -> Result<Extension> {
        let name = attr(attributes, "name")
            .ok_or(RegistryError::UnnamedExtension)?
            .to_owned();
        // An absent or empty `supported` attribute is an authoring error the
        // resolver reports; keep the distinction here.
        let supported = attr(attributes, "supported")
            .filter(|s| !s.trim().is_empty())
            .map(|s| s.split('|').map(str::to_owned).collect());
        let mut requires = Vec::new();
        loop {
            match self.events.next()? {
                XmlEvent::StartElement {
                    name: el,
                    attributes,
                    ..
                } => {
                    if el.local_name == "require" {
                        let api = attr(&attributes, "api").map(str::to_owned);
                        let mut commands = Vec::new();
                        self.collect_command_refs(&name, &mut commands)?;
                        requires.push(Require { api, commands });
                    } else {
                        self.skip_element()?;
                    }
                }
                XmlEvent::EndElement { name: el } if el.local_name == "extension" => break,
                _ => {}
            }
        }
        Ok(Extension {
            name,
            supported,
            requires,
        })
    }

    /// Inside a `<require>` block: record `<command name=…/>` references,
    /// skip enum and type references.
    fn collect_command_refs(&mut self, owner: &str, out: &mut Vec<String>) -> Result<()> {
        loop {
            match self.events.next()? {
                XmlEvent::StartElement {
                    name: el,
                    attributes,
                    ..
                } => {
                    if el.local_name == "command" {
                        let name = attr(&attributes, "name")
                            .ok_or_else(|| RegistryError::UnnamedReference(owner.to_owned()))?
                            .to_owned();
                        out.push(name);
                    }
                    self.skip_element()?;
                }
                XmlEvent::EndElement { name: el } if el.local_name == "require" => return Ok(()),
                _ => {}
            }
        }
    }

    /// Consume the rest of the element whose `StartElement` was just read.
    fn skip_element(&mut self) -> Result<()> {
        let mut depth = 1usize;
        while depth > 0 {
            match self.events.next()? {
                XmlEvent::StartElement { .. } => depth += 1,
                XmlEvent::EndElement { .. } => depth -= 1,
                XmlEvent::EndDocument => break,
                _ => {}
            }
        }
        Ok(())
    }
}

fn attr<'a>(attributes: &'a [OwnedAttribute], key: &str) -> Option<&'a str> {
    attributes
        .iter()
        .find(|a| a.name.local_name == key)
        .map(|a| a.value.as_str())
}
