use tabled::{builder::Builder, settings};

/// Predefined output styles that map to `tabled` styles.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum TableStyleKind {
    #[default]
    Modern,
    Ascii,
    Plain,
}

impl TableStyleKind {
    fn apply(self, table: &mut tabled::Table) {
        match self {
            Self::Modern => table.with(settings::Style::modern()),
            Self::Ascii => table.with(settings::Style::ascii()),
            Self::Plain => table.with(settings::Style::empty()),
        };
    }
}

/// Render string rows under the given headers with the provided style.
pub fn render_string_table(
    headers: &[&str],
    rows: Vec<Vec<String>>,
    style: TableStyleKind,
) -> String {
    if headers.is_empty() && rows.is_empty() {
        return "<empty>".into();
    }

    let mut builder = Builder::default();

    if !headers.is_empty() {
        builder.push_record(headers.iter().copied());
    }

    for row in rows {
        builder.push_record(row);
    }

    let mut table = builder.build();
    style.apply(&mut table);
    table.to_string()
}

/// Indent every line of `s` by two spaces.
pub fn indent(s: &str) -> String {
    s.lines()
        .map(|l| format!("  {l}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_table_renders_headers() {
        let rendered = render_string_table(
            &["id", "operator"],
            vec![vec!["0".into(), "Scan".into()]],
            TableStyleKind::Plain,
        );
        assert!(rendered.contains("operator"));
        assert!(rendered.contains("Scan"));
    }

    #[test]
    fn empty_tables_render_placeholder() {
        assert_eq!(
            render_string_table(&[], vec![], TableStyleKind::Plain),
            "<empty>"
        );
    }

    #[test]
    fn indent_prefixes_each_line() {
        assert_eq!(indent("a\nb"), "  a\n  b");
    }
}
