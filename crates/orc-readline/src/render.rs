//! Terminal rendering of the source and the session output.

use colored::{ColoredString, Colorize};
use orc_core::highlight::{Highlighter as SourceHighlighter, TokenKind};
use orc_core::session::SessionSnapshot;
use orc_core::viz;

const NO_TASK: &str = "N/A";

fn paint(text: &str, kind: TokenKind) -> ColoredString {
    match kind {
        TokenKind::Comment => text.bright_black().italic(),
        TokenKind::Keyword => text.magenta().bold(),
        TokenKind::String => text.green(),
        TokenKind::Atom => text.yellow(),
        TokenKind::Number => text.cyan(),
    }
}

/// Colors one source line.
pub fn highlight_line(highlighter: &SourceHighlighter, line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut cursor = 0;
    for span in highlighter.highlight_line(line) {
        out.push_str(&line[cursor..span.range.start]);
        out.push_str(&paint(&line[span.range.clone()], span.kind).to_string());
        cursor = span.range.end;
    }
    out.push_str(&line[cursor..]);
    out
}

/// Renders the source with right-aligned 1-based line numbers.
pub fn render_source(highlighter: &SourceHighlighter, text: &str) -> String {
    let lines: Vec<&str> = text.split('\n').collect();
    let width = lines.len().to_string().len();
    lines
        .iter()
        .enumerate()
        .map(|(index, line)| {
            let number = format!("{:>width$}", index + 1);
            format!("{} {}", number.bright_black(), highlight_line(highlighter, line))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Renders the output panel: label with a trailing colon, then the text.
pub fn render_output(snapshot: &SessionSnapshot) -> String {
    let header = format!("{}:", snapshot.output_label);
    let header = if snapshot.output_label.is_error() {
        header.red().bold()
    } else {
        header.bright_blue().bold()
    };
    format!("{}\n{}", header, snapshot.last_output)
}

pub fn render_task_id(snapshot: &SessionSnapshot) -> String {
    let task_id = if snapshot.task_id.is_empty() {
        NO_TASK
    } else {
        snapshot.task_id.as_str()
    };
    format!("{} {}", "Task ID:".bright_black(), task_id)
}

pub fn render_status(snapshot: &SessionSnapshot) -> String {
    let input = if snapshot.simulation_input.is_empty() {
        "(empty)"
    } else {
        snapshot.simulation_input.as_str()
    };
    let graph = if snapshot.visualization.is_empty() {
        "none"
    } else if viz::is_left_to_right(&snapshot.visualization) {
        "available, left to right"
    } else {
        "available, top down"
    };
    format!(
        "{}\n{} {}\n{} {}\n{}",
        render_task_id(snapshot),
        "Input:".bright_black(),
        input,
        "Graph:".bright_black(),
        graph,
        render_output(snapshot)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use orc_core::session::OutputLabel;

    fn plain() {
        colored::control::set_override(false);
    }

    #[test]
    fn test_task_id_placeholder() {
        plain();
        let mut snapshot = SessionSnapshot::default();
        assert_eq!(render_task_id(&snapshot), "Task ID: N/A");

        snapshot.task_id = "T1".to_string();
        assert_eq!(render_task_id(&snapshot), "Task ID: T1");
    }

    #[test]
    fn test_output_label_has_trailing_colon() {
        plain();
        let mut snapshot = SessionSnapshot::default();
        assert_eq!(render_output(&snapshot), "Output:\n");

        snapshot.output_label = OutputLabel::CompileError;
        snapshot.last_output = "ERR".to_string();
        assert_eq!(render_output(&snapshot), "Compile Error:\nERR");
    }

    #[test]
    fn test_status_reports_graph_direction() {
        plain();
        let mut snapshot = SessionSnapshot::default();
        assert!(render_status(&snapshot).contains("Graph: none"));

        snapshot.visualization = "digraph circuit {\n\trankdir=LR;\n}\n".to_string();
        let status = render_status(&snapshot);
        assert!(status.contains("Graph: available, left to right"));
        assert!(status.contains("Input: (empty)"));
    }

    #[test]
    fn test_source_is_numbered_and_text_preserved() {
        plain();
        let highlighter = SourceHighlighter::new().unwrap();
        let rendered = render_source(&highlighter, "VAR x . x\n# note\n\nLET");
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines, vec!["1 VAR x . x", "2 # note", "3 ", "4 LET"]);
    }

    #[test]
    fn test_wide_line_numbers_are_aligned() {
        plain();
        let highlighter = SourceHighlighter::new().unwrap();
        let text = vec!["x."; 10].join("\n");
        let rendered = render_source(&highlighter, &text);
        assert!(rendered.starts_with(" 1 x."));
        assert!(rendered.ends_with("10 x."));
    }
}
