/// Scan driver: walk, parse, detect, resolve, emit
pub mod ast;

use std::io::Write;
use std::path::Path;

use crate::analysis::ast::{infer_context, AstError, GoParser, NakedReturnVisitor};
use crate::config::Config;
use crate::error::ScanError;
use crate::formatting::{Suggestion, SuggestionWriter};
use crate::ignore::SourceFilter;
use crate::walker::SourceWalker;

/// Counters for one run, logged once the walk finishes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    pub files_visited: usize,
    pub files_parsed: usize,
    pub files_unreadable: usize,
    pub files_unparsable: usize,
    pub suggestions: usize,
}

/// Outcome of analyzing one file
#[derive(Debug)]
pub enum FileOutcome {
    Parsed { suggestions: usize },
    Skipped(AstError),
}

/// Runs the whole pipeline one file at a time
pub struct Analyzer {
    config: Config,
    filter: SourceFilter,
    parser: GoParser,
}

impl Analyzer {
    pub fn new(config: Config) -> Result<Self, ScanError> {
        let filter = config.source_filter()?;
        let parser = GoParser::with_limit(config.max_file_bytes)?;
        Ok(Self { config, filter, parser })
    }

    /// Scan every Go source below `root`, writing suggestions as they are
    /// found. Only an unusable root or a failing sink stops the run.
    pub fn scan<W: Write>(
        &mut self,
        root: &Path,
        out: &mut SuggestionWriter<W>,
    ) -> Result<ScanStats, ScanError> {
        let walker = SourceWalker::new(root, self.filter.clone())?;
        let mut stats = ScanStats::default();

        for candidate in walker {
            stats.files_visited += 1;
            let source = match std::fs::read(&candidate.path) {
                Ok(bytes) => bytes,
                Err(e) => {
                    tracing::debug!(path = %candidate.display, error = %e, "skipping unreadable file");
                    stats.files_unreadable += 1;
                    continue;
                }
            };

            match self.analyze_source(&candidate.display, source, out)? {
                FileOutcome::Parsed { suggestions } => {
                    stats.files_parsed += 1;
                    stats.suggestions += suggestions;
                }
                FileOutcome::Skipped(e) => {
                    tracing::debug!(path = %candidate.display, error = %e, "skipping unparsable file");
                    stats.files_unparsable += 1;
                }
            }
        }

        out.flush()?;
        tracing::info!(
            visited = stats.files_visited,
            parsed = stats.files_parsed,
            unreadable = stats.files_unreadable,
            unparsable = stats.files_unparsable,
            suggestions = stats.suggestions,
            "scan finished"
        );
        Ok(stats)
    }

    /// Parse one file and emit a suggestion per naked error return.
    ///
    /// Parse failures come back as [`FileOutcome::Skipped`]; the `Err` side is
    /// reserved for write failures on `out`.
    pub fn analyze_source<W: Write>(
        &mut self,
        display_path: &str,
        source: Vec<u8>,
        out: &mut SuggestionWriter<W>,
    ) -> Result<FileOutcome, ScanError> {
        let tree = match self.parser.parse(source) {
            Ok(tree) => tree,
            Err(e) => return Ok(FileOutcome::Skipped(e)),
        };

        let cfg = &self.config;
        let visitor = NakedReturnVisitor::new(&cfg.error_ident);
        let suggestions = visitor.visit(&tree, |site| {
            let context = infer_context(&tree, &site.statement, &cfg.fallback_label);
            let suggestion = Suggestion::new(display_path, site.line(), context, &cfg.template, &cfg.error_ident);
            out.emit(&suggestion)
        })?;

        Ok(FileOutcome::Parsed { suggestions })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formatting::OutputFormat;

    fn analyze(code: &str) -> (FileOutcome, String) {
        let mut analyzer = Analyzer::new(Config::default()).unwrap();
        let mut out = SuggestionWriter::new(Vec::new(), OutputFormat::Text);
        let outcome = analyzer
            .analyze_source("pkg/a.go", code.as_bytes().to_vec(), &mut out)
            .unwrap();
        (outcome, String::from_utf8(out.into_inner()).unwrap())
    }

    #[test]
    fn load_config_scenario() {
        let code = r#"package pkg

func LoadConfig() (Config, error) {
	cfg, err := read()
	if err != nil {
		return Config{}, err
	}
	return cfg, nil
}
"#;
        let (outcome, out) = analyze(code);
        assert!(matches!(outcome, FileOutcome::Parsed { suggestions: 1 }));
        assert_eq!(out, "pkg/a.go:6:fmt.Errorf(\"load config: %w\", err)\n");
    }

    #[test]
    fn broken_source_is_skipped_without_output() {
        let (outcome, out) = analyze("package pkg\n\nfunc Broken( {\n\treturn err\n");
        assert!(matches!(outcome, FileOutcome::Skipped(AstError::SyntaxError(_))));
        assert!(out.is_empty());
    }

    #[test]
    fn custom_config_flows_into_output() {
        let cfg = Config {
            error_ident: "e".to_string(),
            template: crate::formatting::WrapTemplate::parse(r#"errors.Wrap({ident}, "{context}")"#).unwrap(),
            fallback_label: "init".to_string(),
            ..Config::default()
        };
        let mut analyzer = Analyzer::new(cfg).unwrap();
        let mut out = SuggestionWriter::new(Vec::new(), OutputFormat::Text);
        let code = "package p\n\nvar f = func() error {\n\treturn e\n}\n\nfunc DoWork() error {\n\treturn e\n}\n";
        analyzer.analyze_source("p.go", code.as_bytes().to_vec(), &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out.into_inner()).unwrap(),
            "p.go:4:errors.Wrap(e, \"init\")\np.go:8:errors.Wrap(e, \"do work\")\n"
        );
    }
}
