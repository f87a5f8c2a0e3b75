//! Formatting of diagnostic values for display.
//!
//! Values are described through explicit kind discriminators
//! ([`TagKind`], [`PropertyValue`]) and rendered into fixed-width lines
//! ([`BarLine`]).

mod bar;
mod values;

pub use bar::{fit, BarLine};
pub use values::{
    dump_properties, PropertyEntry, PropertyKey, PropertyValue, TagKind, TagSpan, TypeName,
};
