use serde::{Deserialize, Serialize};

use crate::Attributes;

/// The entity that produced a set of telemetry, such as a host, process, or service.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Resource {
    attributes: Attributes,
    dropped_attributes_count: u32,
}

impl Resource {
    /// Creates a new `Resource` with the given attributes.
    pub fn new(attributes: Attributes) -> Self {
        Self {
            attributes,
            dropped_attributes_count: 0,
        }
    }

    /// Sets the number of attributes that were discarded upstream.
    pub fn with_dropped_attributes_count(mut self, count: u32) -> Self {
        self.dropped_attributes_count = count;
        self
    }

    /// Returns the resource attributes.
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Returns the number of attributes that were discarded upstream.
    pub fn dropped_attributes_count(&self) -> u32 {
        self.dropped_attributes_count
    }
}

/// The instrumentation scope (library) that emitted a group of telemetry items.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstrumentationScope {
    name: String,
    version: String,
    attributes: Attributes,
}

impl InstrumentationScope {
    /// Creates a new `InstrumentationScope` with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Sets the scope version.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Sets the scope attributes.
    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    /// Returns the scope name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the scope version.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Returns the scope attributes.
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }
}
