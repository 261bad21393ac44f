use std::fmt::Write as FmtWrite;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use prd_lib::{ContentNode, CrawlReport, ErrorOutput, NodeKind, PageReport, PrdError, ToolReply};
use serde::Serialize;

use crate::cli::OutputFormat;

/// Everything the CLI prints.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum CliOutput {
    Crawl(CrawlReport),
    Page(PageReport),
    Reply(ToolReply),
    Error(ErrorOutput),
}

/// Write output in the requested format.
pub fn write_output(
    body: &CliOutput,
    format: OutputFormat,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Json => write_json_output(body, output.as_deref())?,
        OutputFormat::Pretty => write_pretty_output(body, output.as_deref())?,
    };
    Ok(())
}

/// Render an error and return the appropriate exit code.
pub fn render_error(err: PrdError, format: OutputFormat, output: Option<PathBuf>) -> ExitCode {
    let payload = CliOutput::Error(ErrorOutput {
        error: err.to_payload(),
    });

    match format {
        OutputFormat::Json => {
            let content =
                serde_json::to_string(&payload).unwrap_or_else(|_| "{\"error\":{}}".into());
            if let Some(path) = output {
                if let Err(write_err) = std::fs::write(&path, &content) {
                    eprintln!("Failed to write error output: {}", write_err);
                    println!("{content}");
                }
            } else {
                println!("{content}");
            }
        }
        OutputFormat::Pretty => {
            if let Err(write_err) = write_pretty_output(&payload, output.as_deref()) {
                eprintln!("Failed to write error output: {}", write_err);
            }
        }
    };

    // Exit code 2 is reserved for fatal errors; a failed fetch uses 1.
    ExitCode::from(2)
}

fn write_json_output(body: &CliOutput, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let content = serde_json::to_string(body)?;
    if let Some(path) = output {
        std::fs::write(path, content)?;
    } else {
        println!("{content}");
    }
    Ok(())
}

fn write_pretty_output(body: &CliOutput, output: Option<&Path>) -> io::Result<()> {
    let use_human = output.is_none() && std::io::stdout().is_terminal();

    if use_human {
        println!("{}", format_pretty(body, true));
        return Ok(());
    }

    // Files and pipes keep the JSON shape, indented.
    let content =
        serde_json::to_string_pretty(body).unwrap_or_else(|_| "{\"error\":{}}".to_string());
    if let Some(path) = output {
        std::fs::write(path, &content)?;
    } else {
        println!("{content}");
    }
    Ok(())
}

/// Format output for human consumption in a terminal.
pub fn format_pretty(body: &CliOutput, colorize: bool) -> String {
    let mut buf = String::new();
    match body {
        CliOutput::Crawl(report) => match (&report.tree, &report.error) {
            (Some(tree), _) => {
                let header = color("[CRAWL]", "32", colorize);
                writeln!(buf, "{header} {} pages", report.page_count()).ok();
                for node in tree {
                    write_tree(&mut buf, node, 0, colorize);
                }
            }
            (None, error) => {
                let header = color("[CRAWL FAILED]", "31", colorize);
                writeln!(buf, "{header} {}", error.as_deref().unwrap_or("unknown error")).ok();
            }
        },
        CliOutput::Page(page) => {
            let header = if page.is_failure() {
                color("[PAGE FAILED]", "31", colorize)
            } else {
                color("[PAGE]", "32", colorize)
            };
            writeln!(buf, "{header} {} chars", page.html.chars().count()).ok();
            if !page.screenshot.is_empty() {
                writeln!(buf, "Screenshot: {}", page.screenshot).ok();
            }
            writeln!(buf, "{}", page.html).ok();
        }
        CliOutput::Reply(reply) => {
            writeln!(buf, "{}", reply.text).ok();
        }
        CliOutput::Error(out) => {
            let header = color("[ERROR]", "31", colorize);
            writeln!(buf, "{} {}", header, out.error.message).ok();
            if let Some(remediation) = &out.error.remediation {
                writeln!(buf, "Hint: {}", remediation).ok();
            }
        }
    }
    buf
}

fn write_tree(buf: &mut String, node: &ContentNode, depth: usize, colorize: bool) {
    let indent = "  ".repeat(depth);
    match node.kind {
        NodeKind::Folder => {
            writeln!(buf, "{indent}{}/", node.name).ok();
        }
        _ => {
            let status = match node.content.as_deref() {
                Some(content) if content.starts_with(prd_lib::walker::PAGE_FETCH_FAILURE) => {
                    color("failed", "31", colorize)
                }
                Some(content) => format!("{} chars", content.chars().count()),
                None => "-".to_string(),
            };
            writeln!(buf, "{indent}{} [{status}]", node.name).ok();
            if let Some(shot) = node.screenshot.as_deref().filter(|s| !s.is_empty()) {
                writeln!(buf, "{indent}  screenshot: {shot}").ok();
            }
        }
    }
    for child in node.children.iter().flatten() {
        write_tree(buf, child, depth + 1, colorize);
    }
}

/// Apply ANSI color codes when enabled.
fn color(text: &str, code: &str, colorize: bool) -> String {
    if colorize {
        format!("\x1b[{}m{}\x1b[0m", code, text)
    } else {
        text.to_string()
    }
}

/// 0 when the fetch produced what was asked for, 1 otherwise.
pub fn exit_code_for_fetch(succeeded: bool) -> ExitCode {
    if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}
