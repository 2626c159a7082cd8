use crate::exemption::ValidationExemption;
use crate::validator::{ValidatorArgs, ValidatorConfig};
use html::Node;
use std::any::Any;
use std::collections::BTreeMap;

const LOG_TARGET: &str = "amp.pipeline";

/// Something a sanitizer wants later stages to know about.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SanitizerEvent {
    /// The page uses Bento components; validation should prefer Bento rules.
    BentoComponentsDiscovered,
}

impl SanitizerEvent {
    fn validator_args(self) -> ValidatorArgs {
        match self {
            SanitizerEvent::BentoComponentsDiscovered => ValidatorArgs::prefer_bento(),
        }
    }
}

pub trait Sanitizer {
    fn name(&self) -> &'static str;

    fn sanitize(
        &mut self,
        document: &mut Node,
        exemptions: &mut dyn ValidationExemption,
    ) -> Vec<SanitizerEvent>;

    /// Source selector to the selectors it becomes after conversion, used when rewriting
    /// stylesheets that target the converted elements.
    fn selector_conversion_mapping(&self) -> BTreeMap<String, Vec<String>> {
        BTreeMap::new()
    }

    /// Whether the elements this sanitizer produces keep their rendered children in the
    /// light DOM.
    fn has_light_shadow_dom(&self) -> bool {
        true
    }

    fn as_any(&self) -> &dyn Any;
}

/// Ordered list of sanitizers run over one document.
#[derive(Default)]
pub struct SanitizerPipeline {
    sanitizers: Vec<Box<dyn Sanitizer>>,
}

impl SanitizerPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, sanitizer: impl Sanitizer + 'static) -> Self {
        self.push(sanitizer);
        self
    }

    pub fn push(&mut self, sanitizer: impl Sanitizer + 'static) {
        self.sanitizers.push(Box::new(sanitizer));
    }

    pub fn len(&self) -> usize {
        self.sanitizers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sanitizers.is_empty()
    }

    /// Run every sanitizer in order, forwarding their events to `validator`.
    pub fn run(
        &mut self,
        document: &mut Node,
        exemptions: &mut dyn ValidationExemption,
        validator: &mut dyn ValidatorConfig,
    ) {
        for sanitizer in &mut self.sanitizers {
            log::debug!(target: LOG_TARGET, "running {}", sanitizer.name());
            for event in sanitizer.sanitize(document, exemptions) {
                log::debug!(target: LOG_TARGET, "{}: {event:?}", sanitizer.name());
                validator.update_args(event.validator_args());
            }
        }
    }

    /// First sanitizer of type `T`.
    pub fn get<T: Sanitizer + 'static>(&self) -> Option<&T> {
        self.sanitizers
            .iter()
            .find_map(|s| s.as_any().downcast_ref::<T>())
    }

    /// Union of every sanitizer's selector mapping; later sanitizers append targets.
    pub fn selector_conversion_mapping(&self) -> BTreeMap<String, Vec<String>> {
        let mut merged: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for sanitizer in &self.sanitizers {
            for (selector, targets) in sanitizer.selector_conversion_mapping() {
                let entry = merged.entry(selector).or_default();
                for target in targets {
                    if !entry.contains(&target) {
                        entry.push(target);
                    }
                }
            }
        }
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exemption::ExemptionSet;
    use crate::validator::TagAndAttributeArgs;
    use html::parse_document;

    struct Recorder {
        seen: usize,
        emit: Vec<SanitizerEvent>,
        mapping: &'static [(&'static str, &'static str)],
    }

    impl Sanitizer for Recorder {
        fn name(&self) -> &'static str {
            "recorder"
        }

        fn sanitize(&mut self, _: &mut Node, _: &mut dyn ValidationExemption) -> Vec<SanitizerEvent> {
            self.seen += 1;
            self.emit.clone()
        }

        fn selector_conversion_mapping(&self) -> BTreeMap<String, Vec<String>> {
            self.mapping
                .iter()
                .map(|(from, to)| (from.to_string(), vec![to.to_string()]))
                .collect()
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    fn recorder(emit: Vec<SanitizerEvent>) -> Recorder {
        Recorder {
            seen: 0,
            emit,
            mapping: &[],
        }
    }

    #[test]
    fn events_update_validator_args() {
        let mut pipeline = SanitizerPipeline::new()
            .with(recorder(Vec::new()))
            .with(recorder(vec![SanitizerEvent::BentoComponentsDiscovered]));
        let mut dom = parse_document("<p>x</p>");
        let mut args = TagAndAttributeArgs::default();
        pipeline.run(&mut dom, &mut ExemptionSet::new(), &mut args);
        assert!(args.prefer_bento);
        assert_eq!(pipeline.get::<Recorder>().map(|r| r.seen), Some(1));
    }

    #[test]
    fn quiet_run_leaves_validator_alone() {
        let mut pipeline = SanitizerPipeline::new().with(recorder(Vec::new()));
        let mut args = TagAndAttributeArgs::default();
        pipeline.run(&mut parse_document(""), &mut ExemptionSet::new(), &mut args);
        assert_eq!(args, TagAndAttributeArgs::default());
    }

    #[test]
    fn mappings_are_merged_without_duplicates() {
        let pipeline = SanitizerPipeline::new()
            .with(Recorder {
                mapping: &[("img", "amp-img"), ("video", "amp-video")],
                ..recorder(Vec::new())
            })
            .with(Recorder {
                mapping: &[("img", "amp-anim"), ("video", "amp-video")],
                ..recorder(Vec::new())
            });
        let mapping = pipeline.selector_conversion_mapping();
        assert_eq!(mapping["img"], vec!["amp-img", "amp-anim"]);
        assert_eq!(mapping["video"], vec!["amp-video"]);
    }

    #[test]
    fn empty_pipeline() {
        let pipeline = SanitizerPipeline::new();
        assert!(pipeline.is_empty());
        assert!(pipeline.get::<Recorder>().is_none());
        assert!(pipeline.selector_conversion_mapping().is_empty());
    }
}
