//! Help and version actions.
//!
//! Both are meta actions: they run during scanning, write to a sink the
//! caller injects, and stop the parser so no other handler runs.

use std::io;

use crate::action::Action;
use crate::opt::Opt;

/// Renders the registered options as a two-column table.
///
/// Column one holds `"short, long"` when both names are present, otherwise
/// whichever exists; column two holds the description. Rows are aligned on
/// the widest name column. Options with neither a name nor a description
/// (bare positional handlers) would render as blank lines and are omitted.
pub fn render(opts: &[Opt]) -> String {
    let rows: Vec<(String, &str)> = opts
        .iter()
        .map(|opt| (name_column(opt), opt.description()))
        .filter(|(left, description)| !left.is_empty() || !description.is_empty())
        .collect();
    let width = rows.iter().map(|(left, _)| left.len()).max().unwrap_or(0);

    let mut out = String::new();
    for (left, description) in rows {
        if description.is_empty() {
            out.push_str(&format!("  {}\n", left));
        } else {
            out.push_str(&format!(
                "  {:width$}  {}\n",
                left,
                description,
                width = width
            ));
        }
    }
    out
}

fn name_column(opt: &Opt) -> String {
    match (opt.short_name(), opt.long_name()) {
        (Some(short), Some(long)) => format!("{short}, {long}"),
        (Some(short), None) => short.to_string(),
        (None, Some(long)) => long.to_string(),
        (None, None) => String::new(),
    }
}

/// Builds a help action: stops the parser and writes the option table to
/// `sink`.
pub fn show<'a, W>(mut sink: W) -> Action<'a>
where
    W: io::Write + 'a,
{
    Action::meta(move |_, parser| {
        parser.stop();
        sink.write_all(render(parser.options()).as_bytes())?;
        Ok(())
    })
}

/// Builds a version action: stops the parser and writes `line` to `sink`.
pub fn version<'a, W, S>(mut sink: W, line: S) -> Action<'a>
where
    W: io::Write + 'a,
    S: Into<String>,
{
    let line = line.into();
    Action::meta(move |_, parser| {
        parser.stop();
        writeln!(sink, "{line}")?;
        Ok(())
    })
}
