use amp_sanitizer::{
    BentoReport, BentoSanitizer, ComponentSpecTable, ExemptionSet, SanitizerPipeline,
    TagAndAttributeArgs,
};
use anyhow::{Context, Result};
use clap::Parser;
use mimalloc::MiMalloc;
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::sync::Arc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Debug, Parser)]
#[command(name = "ampify")]
#[command(about = "Convert Bento components in an HTML document to AMP components")]
struct Options {
    /// Component spec table (TOML) to use instead of the built-in one
    #[arg(long, value_name = "FILE")]
    specs: Option<PathBuf>,

    /// Print a JSON report of the run to stderr
    #[arg(long)]
    report: bool,

    /// HTML file to convert; stdin when omitted
    input: Option<PathBuf>,
}

#[derive(Debug, serde::Serialize)]
struct RunReport {
    bento: Option<BentoReport>,
    validator: TagAndAttributeArgs,
    exempted_nodes: usize,
}

struct Converted {
    html: String,
    report: RunReport,
}

fn read_input(path: Option<&PathBuf>) -> Result<String> {
    match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut input = String::new();
            io::stdin()
                .read_to_string(&mut input)
                .context("failed to read stdin")?;
            Ok(input)
        }
    }
}

/// Parse, sanitize and re-serialize one document, with exemptions written back as
/// `data-px-verified-*` attributes.
fn convert(input: &str, specs: Arc<ComponentSpecTable>) -> Converted {
    let mut dom = html::parse_document(input);
    let mut exemptions = ExemptionSet::new();
    let mut validator = TagAndAttributeArgs::default();
    let mut pipeline = SanitizerPipeline::new().with(BentoSanitizer::new(specs));
    pipeline.run(&mut dom, &mut exemptions, &mut validator);
    exemptions.annotate(&mut dom);

    Converted {
        html: html::to_html(&dom),
        report: RunReport {
            bento: pipeline
                .get::<BentoSanitizer>()
                .and_then(BentoSanitizer::last_report)
                .cloned(),
            validator,
            exempted_nodes: exemptions.nodes().count(),
        },
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let options = Options::parse();

    let specs = match &options.specs {
        Some(path) => Arc::new(
            ComponentSpecTable::load(path)
                .with_context(|| format!("failed to load component specs from {}", path.display()))?,
        ),
        None => ComponentSpecTable::builtin(),
    };

    let input = read_input(options.input.as_ref())?;
    log::debug!(target: "ampify", "read {} bytes, {} extension specs", input.len(), specs.len());
    let converted = convert(&input, specs);

    let mut stdout = io::stdout().lock();
    stdout
        .write_all(converted.html.as_bytes())
        .context("failed to write output")?;
    stdout.flush().context("failed to write output")?;

    if options.report {
        let json =
            serde_json::to_string_pretty(&converted.report).context("failed to encode report")?;
        eprintln!("{json}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;
    use serde_json::json;

    #[test]
    fn parses_all_options() {
        let options = Options::try_parse_from(["ampify", "--specs", "t.toml", "--report", "page.html"])
            .expect("valid");
        assert_eq!(options.specs, Some(PathBuf::from("t.toml")));
        assert!(options.report);
        assert_eq!(options.input, Some(PathBuf::from("page.html")));
    }

    #[test]
    fn no_arguments_reads_stdin() {
        let options = Options::try_parse_from(["ampify"]).expect("valid");
        assert!(options.input.is_none());
        assert!(options.specs.is_none());
        assert!(!options.report);
    }

    #[test]
    fn help_is_reported_as_such() {
        let err = Options::try_parse_from(["ampify", "--help"]).expect_err("help");
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
    }

    #[test]
    fn rejects_bad_arguments() {
        assert!(Options::try_parse_from(["ampify", "--bogus"]).is_err());
        assert!(Options::try_parse_from(["ampify", "--specs"]).is_err());
        assert!(Options::try_parse_from(["ampify", "a.html", "b.html"]).is_err());
    }

    #[test]
    fn converts_page_and_reports() {
        let input = concat!(
            r#"<html><head><script src="https://cdn.ampproject.org/bento.js"></script>"#,
            r#"<script src="https://cdn.ampproject.org/v0/bento-accordion-1.0.js"></script>"#,
            r#"<script src="https://cdn.ampproject.org/v0/bento-foo-1.0.js"></script></head>"#,
            r#"<body><bento-accordion><h2>A</h2></bento-accordion><bento-foo></bento-foo></body></html>"#,
        );
        let converted = convert(input, ComponentSpecTable::builtin());
        assert_eq!(
            converted.html,
            concat!(
                r#"<html><head><script src="https://cdn.ampproject.org/bento.js" data-px-verified-tag></script>"#,
                r#"<script src="https://cdn.ampproject.org/v0/bento-foo-1.0.js" data-px-verified-tag></script></head>"#,
                r#"<body><amp-accordion><h2>A</h2></amp-accordion><bento-foo data-px-verified-tag></bento-foo></body></html>"#,
            )
        );

        let report = serde_json::to_value(&converted.report).expect("report encodes");
        assert_eq!(report["validator"]["prefer_bento"], json!(true));
        assert_eq!(report["bento"]["discovered"], json!(["bento-accordion", "bento-foo"]));
        assert_eq!(report["bento"]["converted"], json!(["bento-accordion"]));
        assert_eq!(report["bento"]["scripts_removed"], json!(1));
        assert_eq!(report["bento"]["runtime_scripts_exempted"], json!(1));
        assert_eq!(report["exempted_nodes"], json!(3));
    }

    #[test]
    fn plain_page_passes_through() {
        let input = "<html><body><p>hello</p></body></html>";
        let converted = convert(input, ComponentSpecTable::builtin());
        assert_eq!(converted.html, input);
        assert!(!converted.report.validator.prefer_bento);
        assert_eq!(converted.report.exempted_nodes, 0);
    }
}
