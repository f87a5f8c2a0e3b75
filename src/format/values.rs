//! Tagged diagnostic values.
//!
//! Tag and property values are described by an explicit kind discriminator
//! instead of inspecting their runtime type; each kind has its own formatter.

use std::fmt;

use crate::host::Span;

/// A tag reported by the host over part of the view.
#[derive(Debug, Clone, PartialEq)]
pub struct TagSpan {
    /// What the tag is.
    pub kind: TagKind,
    /// Where it applies, in view coordinates.
    pub span: Span,
}

impl TagSpan {
    /// Create a tag span.
    pub const fn new(kind: TagKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Kind of a tag, with the data its description needs.
#[derive(Debug, Clone, PartialEq)]
pub enum TagKind {
    /// A classification tag.
    Classification {
        /// Classification type name.
        classification: String,
    },
    /// An error squiggle.
    Error {
        /// Error type name.
        error_type: String,
        /// Tooltip content, if any.
        tooltip: Option<String>,
    },
    /// An outlining region.
    OutliningRegion {
        /// Whether the region is an implementation block.
        is_implementation: bool,
        /// Whether the region starts collapsed.
        is_default_collapsed: bool,
        /// Hint shown when collapsed.
        collapsed_hint: Option<String>,
    },
    /// A text marker.
    TextMarker {
        /// Marker type name.
        marker_type: String,
    },
    /// An adornment that negotiates space with the text.
    SpaceNegotiatingAdornment {
        /// Text height.
        text_height: f64,
        /// Adornment width.
        width: f64,
        /// Position affinity.
        affinity: String,
    },
    /// An adornment placed between characters.
    IntraTextAdornment {
        /// Description of the adornment content.
        content: String,
    },
    /// A URL.
    Url {
        /// The URL.
        url: String,
    },
    /// Any tag type without a dedicated formatter.
    Other {
        /// Type name reported by the host.
        type_name: String,
    },
}

impl TagKind {
    /// Group name used by the tag panel.
    pub fn kind_name(&self) -> &str {
        match self {
            Self::Classification { .. } => "ClassificationTag",
            Self::Error { .. } => "ErrorTag",
            Self::OutliningRegion { .. } => "OutliningRegionTag",
            Self::TextMarker { .. } => "TextMarkerTag",
            Self::SpaceNegotiatingAdornment { .. } => "SpaceNegotiatingAdornmentTag",
            Self::IntraTextAdornment { .. } => "IntraTextAdornmentTag",
            Self::Url { .. } => "UrlTag",
            Self::Other { type_name } => type_name,
        }
    }

    /// One line description, `None` for kinds without a formatter.
    pub fn description(&self) -> Option<String> {
        match self {
            Self::Classification { classification } => Some(classification.clone()),
            Self::Error { error_type, .. } => Some(error_type.clone()),
            Self::OutliningRegion {
                is_implementation,
                is_default_collapsed,
                ..
            } => Some(format!(
                "IsImplementation: {is_implementation}, IsDefaultCollapsed: {is_default_collapsed}"
            )),
            Self::TextMarker { marker_type } => Some(marker_type.clone()),
            Self::SpaceNegotiatingAdornment {
                text_height,
                width,
                affinity,
            } => Some(format!(
                "TextHeight: {text_height}, Width: {width}, Affinity: {affinity}"
            )),
            Self::IntraTextAdornment { content } => Some(format!("Content: {content}")),
            Self::Url { url } => Some(url.clone()),
            Self::Other { .. } => None,
        }
    }

    /// Tooltip content carried by the tag.
    pub fn tooltip(&self) -> Option<&str> {
        match self {
            Self::Error { tooltip, .. } => tooltip.as_deref(),
            Self::OutliningRegion { collapsed_hint, .. } => collapsed_hint.as_deref(),
            _ => None,
        }
    }
}

/// A possibly generic type name, e.g. `Dictionary<String, Int32>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeName {
    /// Base name.
    pub name: String,
    /// Generic arguments.
    pub arguments: Vec<TypeName>,
}

impl TypeName {
    /// A non-generic type name.
    pub fn simple(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: Vec::new(),
        }
    }

    /// A generic type name.
    pub fn generic(name: impl Into<String>, arguments: Vec<Self>) -> Self {
        Self {
            name: name.into(),
            arguments,
        }
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if !self.arguments.is_empty() {
            f.write_str("<")?;
            for (i, arg) in self.arguments.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{arg}")?;
            }
            f.write_str(">")?;
        }
        Ok(())
    }
}

/// Key of a property bag entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyKey {
    /// Keyed by a type.
    Type(TypeName),
    /// Keyed by any other value, shown by its text.
    Named(String),
}

/// Value of a property bag entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyValue {
    /// No value.
    Null,
    /// A strongly held value of the given type.
    Value(TypeName),
    /// A weak reference; `target` is the referent's type while it is alive.
    Weak {
        /// Type of the reference itself.
        reference: TypeName,
        /// Type of the live target.
        target: Option<TypeName>,
    },
}

/// One entry of a node's property bag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyEntry {
    /// Entry key.
    pub key: PropertyKey,
    /// Entry value.
    pub value: PropertyValue,
}

impl PropertyEntry {
    /// Create an entry.
    pub const fn new(key: PropertyKey, value: PropertyValue) -> Self {
        Self { key, value }
    }
}

impl fmt::Display for PropertyEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // A null value hides its key as well.
        if matches!(self.value, PropertyValue::Null) {
            return f.write_str("?null -> ?null");
        }
        match &self.key {
            PropertyKey::Type(name) => write!(f, "typeof({name})")?,
            PropertyKey::Named(name) => f.write_str(name)?,
        }
        f.write_str(" -> ")?;
        match &self.value {
            PropertyValue::Null => f.write_str("?null"),
            PropertyValue::Value(name) => write!(f, "{name}"),
            PropertyValue::Weak {
                reference,
                target: Some(target),
            } => write!(f, "{reference}({target})"),
            PropertyValue::Weak {
                reference,
                target: None,
            } => write!(f, "{reference}"),
        }
    }
}

/// Render a property bag, one `key -> type` line per entry.
pub fn dump_properties(entries: &[PropertyEntry]) -> Vec<String> {
    entries.iter().map(ToString::to_string).collect()
}
