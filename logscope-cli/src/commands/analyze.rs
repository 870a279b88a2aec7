//! `logscope analyze` command handler

use std::io::Write;
use std::path::PathBuf;

use serde::Serialize;
use tracing::{debug, info, warn};

use logscope_analyzer::export::{write_csv, write_csv_in_dir};
use logscope_analyzer::{
    AnalysisSession, AnalyzerConfig, JobResult, LogInput, PreviewFilter, ProgressEvent,
};
use logscope_core::config::LogscopeConfig;
use logscope_core::types::{LevelHistogram, LineClassification, LogLevel};

use crate::cli::AnalyzeArgs;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `analyze` command.
///
/// Ctrl-C cancels the job at the next chunk boundary; the command then
/// fails with exit code 130 and prints no partial result.
pub async fn execute(
    args: AnalyzeArgs,
    config: &LogscopeConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let analyzer_config = analyzer_config(config, &args);
    let top_n = analyzer_config.top_threats;
    let window = analyzer_config.timeline_window_minutes;

    let mut session = AnalysisSession::new(analyzer_config)?;

    let cancel = session.cancel_token();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received, cancelling analysis");
            cancel.cancel();
        }
    });

    let inputs: Vec<LogInput> = args.files.iter().map(LogInput::path).collect();
    let outcome = session.submit_with_progress(inputs, log_progress).await;
    interrupt.abort();
    let result = outcome?;

    let filter = PreviewFilter::new(args.filter.into(), args.query.as_deref());
    let rows = result.preview(&filter);

    let csv_path = match (&args.csv, &args.csv_dir) {
        (Some(path), _) => {
            write_csv(path, rows.iter().copied()).await?;
            Some(path.clone())
        }
        (None, Some(dir)) => Some(write_csv_in_dir(dir, rows.iter().copied()).await?),
        (None, None) => None,
    };

    let report = AnalysisReport::build(
        result,
        &args.files,
        PreviewSection {
            scope: filter.scope().to_string(),
            query: args.query.clone().filter(|q| !q.is_empty()),
            matched: rows.len(),
            rows: rows.into_iter().take(args.preview).cloned().collect(),
        },
        top_n,
        window,
        csv_path,
    );

    info!(
        files = report.files.len(),
        total_lines = report.total_lines,
        "analysis report ready"
    );
    writer.render(&report)?;

    Ok(())
}

/// Build the analyzer configuration from the file/env config plus CLI overrides.
fn analyzer_config(config: &LogscopeConfig, args: &AnalyzeArgs) -> AnalyzerConfig {
    let mut analyzer = AnalyzerConfig::from_core(&config.analyzer);
    if let Some(chunk_size) = args.chunk_size {
        analyzer.chunk_size = chunk_size;
    }
    if let Some(year) = args.reference_year {
        analyzer.reference_year = Some(year);
    }
    analyzer
}

fn log_progress(event: &ProgressEvent) {
    debug!(
        percent = event.percent_complete,
        files_completed = event.files_completed,
        current_file = %event.current_file,
        "progress"
    );
}

/// Threat keyword and its line count.
#[derive(Debug, Serialize)]
pub struct ThreatCount {
    pub keyword: String,
    pub count: u64,
}

/// One minute bucket of the timeline.
#[derive(Debug, Serialize)]
pub struct TimelineBucket {
    pub minute: String,
    pub count: u64,
}

/// Filtered preview rows.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewSection {
    pub scope: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    /// Sampled lines matching the filter, before the display limit.
    pub matched: usize,
    pub rows: Vec<LineClassification>,
}

/// Summary printed by `logscope analyze`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub files: Vec<String>,
    pub total_lines: u64,
    pub error_lines: u64,
    pub warn_lines: u64,
    pub threat_lines: u64,
    pub first_timestamp: Option<i64>,
    pub last_timestamp: Option<i64>,
    pub time_range_label: String,
    pub level_histogram: LevelHistogram,
    pub top_threats: Vec<ThreatCount>,
    pub timeline: Vec<TimelineBucket>,
    pub preview: PreviewSection,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub csv_path: Option<String>,
}

impl AnalysisReport {
    fn build(
        result: &JobResult,
        files: &[PathBuf],
        preview: PreviewSection,
        top_n: usize,
        window: usize,
        csv_path: Option<PathBuf>,
    ) -> Self {
        Self {
            files: files.iter().map(|p| p.display().to_string()).collect(),
            total_lines: result.total_lines,
            error_lines: result.error_lines,
            warn_lines: result.warn_lines,
            threat_lines: result.threat_lines,
            first_timestamp: result.first_timestamp,
            last_timestamp: result.last_timestamp,
            time_range_label: result.time_range_label.clone(),
            level_histogram: result.level_histogram,
            top_threats: result
                .top_threats(top_n)
                .into_iter()
                .map(|(keyword, count)| ThreatCount {
                    keyword: keyword.to_owned(),
                    count,
                })
                .collect(),
            timeline: result
                .recent_timeline(window)
                .into_iter()
                .map(|(minute, count)| TimelineBucket {
                    minute: minute.to_owned(),
                    count,
                })
                .collect(),
            preview,
            csv_path: csv_path.map(|p| p.display().to_string()),
        }
    }
}

fn percent(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 * 100.0 / total as f64
    }
}

impl Render for AnalysisReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "Analysis: {} file(s)", self.files.len().to_string().bold())?;
        for f in &self.files {
            writeln!(w, "  {}", f.dimmed())?;
        }

        writeln!(w)?;
        writeln!(w, "Total lines:  {}", self.total_lines.to_string().bold())?;
        writeln!(
            w,
            "Errors:       {} ({:.1}%)",
            self.error_lines.to_string().red(),
            percent(self.error_lines, self.total_lines)
        )?;
        writeln!(
            w,
            "Warnings:     {} ({:.1}%)",
            self.warn_lines.to_string().yellow(),
            percent(self.warn_lines, self.total_lines)
        )?;
        writeln!(
            w,
            "Threats:      {} ({:.1}%)",
            self.threat_lines.to_string().magenta(),
            percent(self.threat_lines, self.total_lines)
        )?;
        writeln!(w, "Time range:   {}", self.time_range_label)?;

        writeln!(w)?;
        writeln!(w, "{:<10} {:>10}", "Level", "Lines")?;
        writeln!(w, "{}", "-".repeat(21))?;
        for (level, count) in self.level_histogram.entries() {
            let label = match level {
                LogLevel::Error => level.as_str().red(),
                LogLevel::Warn => level.as_str().yellow(),
                LogLevel::Info => level.as_str().green(),
                LogLevel::Debug => level.as_str().cyan(),
                LogLevel::Other => level.as_str().normal(),
            };
            writeln!(w, "{:<10} {:>10}", label, count)?;
        }

        writeln!(w)?;
        if self.top_threats.is_empty() {
            writeln!(w, "{}", "No threat keywords found.".green())?;
        } else {
            writeln!(w, "{:<16} {:>10}", "Threat", "Lines")?;
            writeln!(w, "{}", "-".repeat(27))?;
            for t in &self.top_threats {
                writeln!(w, "{:<16} {:>10}", t.keyword.magenta(), t.count)?;
            }
        }

        if !self.timeline.is_empty() {
            writeln!(w)?;
            writeln!(w, "{:<18} {:>10}", "Minute (UTC)", "Lines")?;
            writeln!(w, "{}", "-".repeat(29))?;
            for b in &self.timeline {
                writeln!(w, "{:<18} {:>10}", b.minute, b.count)?;
            }
        }

        writeln!(w)?;
        let query = self
            .preview
            .query
            .as_deref()
            .map(|q| format!(", query \"{}\"", q))
            .unwrap_or_default();
        writeln!(
            w,
            "Preview [{}{}]: showing {} of {} matching line(s)",
            self.preview.scope.bold(),
            query,
            self.preview.rows.len(),
            self.preview.matched
        )?;
        for row in &self.preview.rows {
            let level = match row.level {
                LogLevel::Error => row.level.as_str().red(),
                LogLevel::Warn => row.level.as_str().yellow(),
                _ => row.level.as_str().normal(),
            };
            let threat = row
                .threat_keyword
                .as_deref()
                .map(|k| format!(" [{}]", k.magenta()))
                .unwrap_or_default();
            writeln!(
                w,
                "{:>6}  {:<19}  {:<5}{}  {}",
                row.index,
                row.timestamp.as_deref().unwrap_or("-"),
                level,
                threat,
                row.raw
            )?;
        }

        if let Some(path) = &self.csv_path {
            writeln!(w)?;
            writeln!(w, "CSV exported: {}", path.bold())?;
        }

        Ok(())
    }
}
