//! Argument surface of the downstream tag-and-attribute validator.
//!
//! The validator itself lives outside this crate; sanitizers only ever adjust its
//! arguments, and only through [`ValidatorConfig::update_args`].

/// A partial argument update. `None` fields leave the current value untouched.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ValidatorArgs {
    /// Validate against Bento component rules in preference to the AMP ones.
    pub prefer_bento: Option<bool>,
}

impl ValidatorArgs {
    pub fn prefer_bento() -> Self {
        Self {
            prefer_bento: Some(true),
        }
    }
}

pub trait ValidatorConfig {
    fn update_args(&mut self, args: ValidatorArgs);
}

/// Effective arguments of the tag-and-attribute validator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct TagAndAttributeArgs {
    pub prefer_bento: bool,
}

impl ValidatorConfig for TagAndAttributeArgs {
    fn update_args(&mut self, args: ValidatorArgs) {
        if let Some(prefer_bento) = args.prefer_bento {
            log::debug!(target: "amp.validator", "prefer_bento = {prefer_bento}");
            self.prefer_bento = prefer_bento;
        }
    }
}
