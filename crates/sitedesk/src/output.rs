//! Output formatting: table or JSON, selected by `--output`.

use serde::Serialize;
use tabled::{Table, Tabled, settings::Style};

use crate::cli::OutputFormat;
use crate::error::CliError;

/// Render `data` as a rounded table built from `to_row`, or as JSON.
pub fn render_list<T, R>(
    format: OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
) -> Result<String, CliError>
where
    T: Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            Ok(render_table(&rows))
        }
        OutputFormat::Json => render_json(data),
    }
}

pub fn render_table<R: Tabled>(rows: &[R]) -> String {
    if rows.is_empty() {
        return "(none)".to_owned();
    }
    Table::new(rows).with(Style::rounded()).to_string()
}

pub fn render_json<T: Serialize + ?Sized>(data: &T) -> Result<String, CliError> {
    Ok(serde_json::to_string_pretty(data)?)
}

pub fn print_output(text: &str) {
    if !text.is_empty() {
        println!("{text}");
    }
}

pub fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Item {
        id: i64,
    }

    #[derive(Tabled)]
    struct Row {
        #[tabled(rename = "ID")]
        id: i64,
    }

    #[test]
    fn json_keeps_serde_shape() {
        let text = render_list(OutputFormat::Json, &[Item { id: 7 }], |i| Row { id: i.id }).unwrap();
        assert!(text.contains("\"id\": 7"));
    }

    #[test]
    fn table_has_header() {
        let text = render_list(OutputFormat::Table, &[Item { id: 7 }], |i| Row { id: i.id }).unwrap();
        assert!(text.contains("ID"));
        assert!(text.contains('7'));
    }

    #[test]
    fn empty_table_says_none() {
        let text = render_list(OutputFormat::Table, &[] as &[Item], |i| Row { id: i.id }).unwrap();
        assert_eq!(text, "(none)");
    }
}
