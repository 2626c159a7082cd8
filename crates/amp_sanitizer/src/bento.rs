//! Bento to AMP component conversion.
//!
//! Every `bento-*` element under `<body>` is renamed to its `amp-*` counterpart when the
//! component spec table knows that extension; the rest are exempted from validation and
//! left alone. Bento CDN stylesheets and scripts are then pruned: resources for converted
//! (or absent) components are removed, resources still needed by unconverted components
//! are exempted, and the Bento runtime is kept only while some component script is kept.

use crate::component_specs::{AMP_PREFIX, BENTO_PREFIX, ComponentSpecTable};
use crate::exemption::ValidationExemption;
use crate::layout::adapt_layout_styles;
use crate::pipeline::{Sanitizer, SanitizerEvent};
use crate::resource_urls::{
    BENTO_SCRIPT_PREFIX, BENTO_STYLESHEET_PREFIX, bento_component_name_from_url,
    is_bento_runtime_script,
};
use html::dom_utils::{
    Retain, assign_node_ids, find_element_mut, max_node_id, retain_elements, visit_elements_mut,
};
use html::{Id, Node};
use serde::Serialize;
use std::any::Any;
use std::collections::BTreeMap;
use std::sync::Arc;

const LOG_TARGET: &str = "amp.bento";

/// What one pass found and did.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BentoReport {
    /// Bento tag names seen, in first-seen document order.
    pub discovered: Vec<String>,
    /// Bento tag names converted to AMP, in first-conversion order.
    pub converted: Vec<String>,
    pub elements_converted: usize,
    pub elements_exempted: usize,
    pub stylesheets_removed: usize,
    pub stylesheets_exempted: usize,
    pub scripts_removed: usize,
    pub non_amp_scripts_retained: usize,
    pub runtime_scripts_removed: usize,
    pub runtime_scripts_exempted: usize,
}

impl BentoReport {
    pub fn was_discovered(&self, bento_name: &str) -> bool {
        self.discovered.iter().any(|n| n == bento_name)
    }

    pub fn was_converted(&self, bento_name: &str) -> bool {
        self.converted.iter().any(|n| n == bento_name)
    }

    /// Validation should prefer Bento rules once any Bento element was on the page.
    pub fn prefers_bento(&self) -> bool {
        !self.discovered.is_empty()
    }

    /// A resource for `bento_name` is no longer needed if the component is not on the page
    /// or has been converted to AMP.
    fn resource_is_unneeded(&self, bento_name: &str) -> bool {
        !self.was_discovered(bento_name) || self.was_converted(bento_name)
    }

    fn record(list: &mut Vec<String>, name: &str) {
        if !list.iter().any(|n| n == name) {
            list.push(name.to_string());
        }
    }
}

pub struct BentoSanitizer {
    specs: Arc<ComponentSpecTable>,
    last_report: Option<BentoReport>,
}

impl BentoSanitizer {
    pub fn new(specs: Arc<ComponentSpecTable>) -> Self {
        Self {
            specs,
            last_report: None,
        }
    }

    pub fn specs(&self) -> &ComponentSpecTable {
        &self.specs
    }

    /// Report of the most recent run through the [`Sanitizer`] interface.
    pub fn last_report(&self) -> Option<&BentoReport> {
        self.last_report.as_ref()
    }

    /// Rewrite `document` in place and report what happened.
    ///
    /// Exemptions are keyed by node id, so nodes without one are numbered first.
    pub fn sanitize_document(
        &self,
        document: &mut Node,
        exemptions: &mut dyn ValidationExemption,
    ) -> BentoReport {
        assign_node_ids(document);
        let mut report = BentoReport::default();

        self.convert_elements(document, exemptions, &mut report);
        prune_stylesheets(document, exemptions, &mut report);
        prune_scripts(document, exemptions, &mut report);
        prune_runtime_scripts(document, exemptions, &mut report);

        log::debug!(
            target: LOG_TARGET,
            "bento pass: {} discovered, {} converted, {} exempted, {} component scripts retained",
            report.discovered.len(),
            report.elements_converted,
            report.elements_exempted,
            report.non_amp_scripts_retained
        );
        report
    }

    fn convert_elements(
        &self,
        document: &mut Node,
        exemptions: &mut dyn ValidationExemption,
        report: &mut BentoReport,
    ) {
        let mut next_id = max_node_id(document).0.wrapping_add(1);

        let mut convert = |element: &mut Node| {
            let Some(bento_name) = element
                .name()
                .filter(|name| name.starts_with(BENTO_PREFIX))
                .map(str::to_string)
            else {
                return;
            };
            BentoReport::record(&mut report.discovered, &bento_name);

            let amp_name = format!("{AMP_PREFIX}{}", &bento_name[BENTO_PREFIX.len()..]);
            if !self.specs.contains(&amp_name) {
                log::debug!(target: LOG_TARGET, "<{bento_name}> has no AMP counterpart; exempting");
                exemptions.mark_node_as_px_verified(element.id());
                report.elements_exempted += 1;
                return;
            }

            let mut amp_element = Node::Element {
                id: Id(next_id),
                name: amp_name,
                attributes: element.take_attributes(),
                children: element.take_children(),
            };
            next_id = next_id.wrapping_add(1);
            adapt_layout_styles(&mut amp_element);
            log::debug!(
                target: LOG_TARGET,
                "converted <{bento_name}> to <{}>",
                amp_element.name().unwrap_or_default()
            );
            *element = amp_element;

            BentoReport::record(&mut report.converted, &bento_name);
            report.elements_converted += 1;
        };

        match find_element_mut(document, "body") {
            Some(body) => visit_elements_mut(body, &mut convert),
            None => visit_elements_mut(document, &mut convert),
        }
    }

    /// `bento-X -> [amp-X]` for every extension that has a Bento build.
    pub fn selector_conversion_mapping(&self) -> BTreeMap<String, Vec<String>> {
        self.specs
            .iter()
            .filter(|(_, spec)| spec.bento)
            .filter_map(|(amp_name, _)| {
                let suffix = amp_name.strip_prefix(AMP_PREFIX)?;
                Some((format!("{BENTO_PREFIX}{suffix}"), vec![amp_name.to_string()]))
            })
            .collect()
    }
}

fn prune_stylesheets(
    document: &mut Node,
    exemptions: &mut dyn ValidationExemption,
    report: &mut BentoReport,
) {
    retain_elements(document, &mut |element: &mut Node| {
        if !element.is_element_named("link") || element.attr("rel") != Some("stylesheet") {
            return Retain::Keep;
        }
        let Some(bento_name) = element
            .attr("href")
            .filter(|href| href.starts_with(BENTO_STYLESHEET_PREFIX))
            .and_then(bento_component_name_from_url)
        else {
            return Retain::Keep;
        };

        if report.resource_is_unneeded(&bento_name) {
            log::debug!(target: LOG_TARGET, "removing stylesheet for {bento_name}");
            report.stylesheets_removed += 1;
            Retain::Remove
        } else {
            exemptions.mark_node_as_px_verified(element.id());
            exemptions.mark_attribute_as_px_verified(element.id(), "href");
            report.stylesheets_exempted += 1;
            Retain::Keep
        }
    });
}

fn prune_scripts(
    document: &mut Node,
    exemptions: &mut dyn ValidationExemption,
    report: &mut BentoReport,
) {
    retain_elements(document, &mut |element: &mut Node| {
        if !element.is_element_named("script") {
            return Retain::Keep;
        }
        let Some(bento_name) = element
            .attr("src")
            .filter(|src| src.starts_with(BENTO_SCRIPT_PREFIX))
            .and_then(bento_component_name_from_url)
        else {
            return Retain::Keep;
        };

        if report.resource_is_unneeded(&bento_name) {
            log::debug!(target: LOG_TARGET, "removing script for {bento_name}");
            report.scripts_removed += 1;
            Retain::Remove
        } else {
            exemptions.mark_node_as_px_verified(element.id());
            report.non_amp_scripts_retained += 1;
            Retain::Keep
        }
    });
}

fn prune_runtime_scripts(
    document: &mut Node,
    exemptions: &mut dyn ValidationExemption,
    report: &mut BentoReport,
) {
    let keep_runtime = report.non_amp_scripts_retained > 0;
    retain_elements(document, &mut |element: &mut Node| {
        if !element.is_element_named("script")
            || !element.attr("src").is_some_and(is_bento_runtime_script)
        {
            return Retain::Keep;
        }
        if keep_runtime {
            exemptions.mark_node_as_px_verified(element.id());
            report.runtime_scripts_exempted += 1;
            Retain::Keep
        } else {
            report.runtime_scripts_removed += 1;
            Retain::Remove
        }
    });
}

impl Sanitizer for BentoSanitizer {
    fn name(&self) -> &'static str {
        "bento"
    }

    fn sanitize(
        &mut self,
        document: &mut Node,
        exemptions: &mut dyn ValidationExemption,
    ) -> Vec<SanitizerEvent> {
        let report = self.sanitize_document(document, exemptions);
        let events = if report.prefers_bento() {
            vec![SanitizerEvent::BentoComponentsDiscovered]
        } else {
            Vec::new()
        };
        self.last_report = Some(report);
        events
    }

    fn selector_conversion_mapping(&self) -> BTreeMap<String, Vec<String>> {
        BentoSanitizer::selector_conversion_mapping(self)
    }

    /// Bento components render into a real shadow root, so selectors reaching past the
    /// component element itself never match light-DOM descendants it created.
    fn has_light_shadow_dom(&self) -> bool {
        false
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
