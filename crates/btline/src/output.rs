use std::io::IsTerminal;

use btline_relay::RelaySummary;
use btline_transport::Endpoint;
use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct SummaryOutput<'a> {
    schema_id: &'a str,
    endpoint: String,
    lines_sent: u64,
    bytes_sent: u64,
    exit: &'a str,
}

#[allow(dead_code)] // unused on platforms where the relay command is stubbed out
pub fn print_summary(summary: &RelaySummary, endpoint: &Endpoint, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = SummaryOutput {
                schema_id: "https://schemas.btline.dev/cli/v1/relay-summary.schema.json",
                endpoint: endpoint.to_string(),
                lines_sent: summary.lines_sent,
                bytes_sent: summary.bytes_sent,
                exit: summary.exit.as_str(),
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["ENDPOINT", "LINES", "BYTES", "EXIT"])
                .add_row(vec![
                    endpoint.to_string(),
                    summary.lines_sent.to_string(),
                    summary.bytes_sent.to_string(),
                    summary.exit.as_str().to_string(),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "endpoint={} lines={} bytes={} exit={}",
                endpoint,
                summary.lines_sent,
                summary.bytes_sent,
                summary.exit.as_str()
            );
        }
        OutputFormat::Raw => {
            println!("{}", summary.exit.as_str());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_json_has_schema_id() {
        let out = SummaryOutput {
            schema_id: "x",
            endpoint: "34:98:7A:6A:A9:AC/1".to_string(),
            lines_sent: 2,
            bytes_sent: 10,
            exit: "sentinel",
        };

        let json = serde_json::to_string(&out).expect("summary output should serialize");
        assert!(json.contains("\"schema_id\""));
        assert!(json.contains("\"exit\":\"sentinel\""));
    }
}
