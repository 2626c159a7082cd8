//! Conversion of Bento web components to their AMP counterparts.
//!
//! [`BentoSanitizer`] rewrites `bento-*` elements to `amp-*`, moves inline dimension
//! styles into AMP layout attributes and prunes the Bento CDN resources the page no
//! longer needs. It runs as one stage of a [`SanitizerPipeline`]; whatever it cannot
//! convert is recorded through [`ValidationExemption`] instead of being rewritten.

pub mod bento;
pub mod component_specs;
pub mod exemption;
pub mod layout;
pub mod pipeline;
pub mod resource_urls;
pub mod validator;

pub use crate::bento::{BentoReport, BentoSanitizer};
pub use crate::component_specs::{ComponentSpecTable, ExtensionSpec, SpecTableError};
pub use crate::exemption::{ExemptionSet, ValidationExemption};
pub use crate::layout::adapt_layout_styles;
pub use crate::pipeline::{Sanitizer, SanitizerEvent, SanitizerPipeline};
pub use crate::validator::{TagAndAttributeArgs, ValidatorArgs, ValidatorConfig};
