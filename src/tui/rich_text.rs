//! Styled text for assistant turns.
//!
//! - [`explanation`]: the service's explanation is LLM prose, often markdown.
//!   A small `pulldown_cmark` walker turns it into ratatui lines: paragraphs,
//!   headings, emphasis, inline code, lists, and fenced code. Raw HTML is
//!   kept as literal text since database errors quote `<EOF>` and the like.
//! - [`verbatim`]: text shown exactly as received, for failure messages.
//! - [`sql`]: generated SQL, highlighted with syntect's SQL grammar.

use std::sync::LazyLock;

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

static SYNTAX_SET: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);
static THEME_SET: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

const THEME_NAME: &str = "base16-ocean.dark";
const TAB: &str = "    ";

fn theme() -> Option<&'static Theme> {
    THEME_SET.themes.get(THEME_NAME)
}

/// Highlight `code` with the grammar for `lang`, falling back to plain text.
fn highlight(code: &str, lang: &str, fallback: Style) -> Vec<Line<'static>> {
    let syntax: Option<&SyntaxReference> = SYNTAX_SET.find_syntax_by_token(lang);
    let (Some(syntax), Some(theme)) = (syntax, theme()) else {
        return code
            .lines()
            .map(|l| Line::from(Span::styled(l.replace('\t', TAB), fallback)))
            .collect();
    };

    let mut hl = HighlightLines::new(syntax, theme);
    let mut lines = Vec::new();
    for raw in LinesWithEndings::from(code) {
        let Ok(ranges) = hl.highlight_line(raw, &SYNTAX_SET) else {
            lines.push(Line::from(Span::styled(
                raw.trim_end_matches('\n').replace('\t', TAB),
                fallback,
            )));
            continue;
        };
        let spans: Vec<Span<'static>> = ranges
            .into_iter()
            .filter_map(|(style, frag)| {
                let content = frag.trim_end_matches('\n').replace('\t', TAB);
                (!content.is_empty()).then(|| {
                    let fg = Color::Rgb(style.foreground.r, style.foreground.g, style.foreground.b);
                    Span::styled(content, Style::default().fg(fg))
                })
            })
            .collect();
        lines.push(Line::from(spans));
    }
    lines
}

/// Generated SQL, one highlighted line per source line.
pub fn sql(query: &str) -> Vec<Line<'static>> {
    highlight(query.trim(), "sql", Style::default().fg(Color::White))
}

/// `content` line by line, with no markup interpretation.
pub fn verbatim(content: &str, fg: Color) -> Vec<Line<'static>> {
    let style = Style::default().fg(fg);
    content
        .lines()
        .map(|l| Line::from(Span::styled(l.replace('\t', TAB), style)))
        .collect()
}

/// Render explanation markdown into lines using `base_fg` for body text.
pub fn explanation(content: &str, base_fg: Color) -> Vec<Line<'static>> {
    let mut writer = Writer::new(base_fg);
    for event in Parser::new_ext(content, Options::ENABLE_STRIKETHROUGH) {
        writer.handle(event);
    }
    writer.lines
}

struct Writer {
    lines: Vec<Line<'static>>,
    base: Style,
    /// Inline styles, composed with `patch` so bold inside a heading stays bold.
    styles: Vec<Style>,
    /// None = bullet list, Some(n) = ordered list at item n.
    lists: Vec<Option<u64>>,
    /// Language of the fenced block being collected, with its text so far.
    code: Option<(String, String)>,
    blank_before_block: bool,
    /// The last literal chunk ended with a newline.
    literal_line_done: bool,
}

impl Writer {
    fn new(base_fg: Color) -> Self {
        Self {
            lines: Vec::new(),
            base: Style::default().fg(base_fg),
            styles: Vec::new(),
            lists: Vec::new(),
            code: None,
            blank_before_block: false,
            literal_line_done: false,
        }
    }

    fn style(&self) -> Style {
        self.styles.last().copied().unwrap_or(self.base)
    }

    fn push_style(&mut self, overlay: Style) {
        self.styles.push(self.style().patch(overlay));
    }

    fn start_block(&mut self) {
        if self.blank_before_block {
            self.lines.push(Line::default());
            self.blank_before_block = false;
        }
        self.lines.push(Line::default());
        self.literal_line_done = false;
    }

    fn push_span(&mut self, span: Span<'static>) {
        match self.lines.last_mut() {
            Some(line) => line.push_span(span),
            None => self.lines.push(Line::from(span)),
        }
    }

    /// Text that may span lines. HTML blocks arrive one line per event,
    /// each ending in a newline.
    fn push_literal(&mut self, text: &str) {
        let style = self.style();
        let (body, ends_line) = match text.strip_suffix('\n') {
            Some(body) => (body, true),
            None => (text, false),
        };
        for (i, line) in body.split('\n').enumerate() {
            if i > 0 || self.literal_line_done {
                self.lines.push(Line::default());
                self.literal_line_done = false;
            }
            if !line.is_empty() {
                self.push_span(Span::styled(line.replace('\t', TAB), style));
            }
        }
        self.literal_line_done = ends_line;
    }

    fn handle(&mut self, event: Event<'_>) {
        if let Some((_, buf)) = self.code.as_mut() {
            match event {
                Event::Text(t) => buf.push_str(&t),
                Event::End(TagEnd::CodeBlock) => self.finish_code_block(),
                _ => {}
            }
            return;
        }

        match event {
            Event::Start(tag) => self.open(tag),
            Event::End(tag) => self.close(tag),
            Event::Text(t) => {
                let style = self.style();
                self.push_span(Span::styled(t.replace('\t', TAB), style));
            }
            Event::Code(c) => self.push_span(Span::styled(
                c.to_string(),
                Style::default().fg(Color::White).bg(Color::DarkGray),
            )),
            Event::Html(t) | Event::InlineHtml(t) => self.push_literal(&t),
            Event::SoftBreak => self.push_span(Span::raw(" ")),
            Event::HardBreak => self.lines.push(Line::default()),
            Event::Rule => {
                self.start_block();
                self.push_span(Span::styled("─".repeat(32), Style::default().fg(Color::DarkGray)));
                self.blank_before_block = true;
            }
            _ => {}
        }
    }

    fn open(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => {
                // List items already opened their own line.
                if self.lists.is_empty() {
                    self.start_block();
                }
            }
            Tag::Heading { level, .. } => {
                self.start_block();
                let modifier = match level {
                    HeadingLevel::H1 => Modifier::BOLD | Modifier::UNDERLINED,
                    _ => Modifier::BOLD,
                };
                self.push_style(Style::default().add_modifier(modifier));
            }
            Tag::List(start) => {
                if self.lists.is_empty() && self.blank_before_block {
                    self.lines.push(Line::default());
                    self.blank_before_block = false;
                }
                self.lists.push(start);
            }
            Tag::Item => {
                let indent = "  ".repeat(self.lists.len().saturating_sub(1));
                let marker = match self.lists.last_mut() {
                    Some(Some(n)) => {
                        let m = format!("{indent}{n}. ");
                        *n += 1;
                        m
                    }
                    _ => format!("{indent}- "),
                };
                self.lines.push(Line::from(Span::styled(
                    marker,
                    Style::default().fg(Color::DarkGray),
                )));
            }
            Tag::CodeBlock(kind) => {
                let lang = match kind {
                    CodeBlockKind::Fenced(l) => l.to_string(),
                    CodeBlockKind::Indented => String::new(),
                };
                self.code = Some((lang, String::new()));
            }
            Tag::HtmlBlock => self.start_block(),
            Tag::Emphasis => self.push_style(Style::default().add_modifier(Modifier::ITALIC)),
            Tag::Strong => self.push_style(Style::default().add_modifier(Modifier::BOLD)),
            Tag::Strikethrough => {
                self.push_style(Style::default().add_modifier(Modifier::CROSSED_OUT))
            }
            _ => {}
        }
    }

    fn close(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => self.blank_before_block = true,
            TagEnd::HtmlBlock => {
                self.literal_line_done = false;
                self.blank_before_block = true;
            }
            TagEnd::Heading(_) => {
                self.styles.pop();
                self.blank_before_block = true;
            }
            TagEnd::List(_) => {
                self.lists.pop();
                self.blank_before_block = true;
            }
            TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough => {
                self.styles.pop();
            }
            _ => {}
        }
    }

    fn finish_code_block(&mut self) {
        let Some((lang, code)) = self.code.take() else {
            return;
        };
        if self.blank_before_block {
            self.lines.push(Line::default());
        }
        let gutter = Span::styled("│ ", Style::default().fg(Color::DarkGray));
        for mut line in highlight(&code, &lang, Style::default().fg(Color::White)) {
            line.spans.insert(0, gutter.clone());
            self.lines.push(line);
        }
        self.blank_before_block = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(lines: &[Line<'_>]) -> Vec<String> {
        lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    #[test]
    fn plain_paragraph_uses_base_color() {
        let lines = explanation("Costs grouped by provider.", Color::Green);
        assert_eq!(plain(&lines), ["Costs grouped by provider."]);
        assert_eq!(lines[0].spans[0].style.fg, Some(Color::Green));
    }

    #[test]
    fn paragraphs_are_separated_by_blank_line() {
        let lines = explanation("First.\n\nSecond.", Color::Green);
        assert_eq!(plain(&lines), ["First.", "", "Second."]);
    }

    #[test]
    fn bold_text_is_bold() {
        let lines = explanation("The **largest** cost", Color::Green);
        let bold = lines[0].spans.iter().find(|s| s.content == "largest").unwrap();
        assert!(bold.style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn inline_code_styled() {
        let lines = explanation("Uses `SUM(cost)` here", Color::Green);
        let code = lines[0].spans.iter().find(|s| s.content == "SUM(cost)").unwrap();
        assert_eq!(code.style.bg, Some(Color::DarkGray));
    }

    #[test]
    fn lists_get_markers() {
        let lines = explanation("- aws\n- gcp\n\n1. one\n2. two", Color::Green);
        let text = plain(&lines);
        assert!(text.contains(&"- aws".to_string()));
        assert!(text.contains(&"- gcp".to_string()));
        assert!(text.contains(&"1. one".to_string()));
        assert!(text.contains(&"2. two".to_string()));
    }

    #[test]
    fn fenced_code_has_gutter() {
        let lines = explanation("```sql\nSELECT 1\n```", Color::Green);
        let text = plain(&lines);
        assert!(text.iter().any(|l| l.starts_with("│ ") && l.contains("SELECT 1")));
    }

    #[test]
    fn angle_bracket_text_is_kept() {
        let lines = explanation("Expected <column> near <EOF>", Color::Green);
        assert_eq!(plain(&lines), ["Expected <column> near <EOF>"]);

        let lines = explanation("<identifier> is not valid\n\nTry again.", Color::Green);
        let text = plain(&lines);
        assert_eq!(text[0], "<identifier> is not valid");
        assert_eq!(text.last().map(String::as_str), Some("Try again."));
    }

    #[test]
    fn html_block_lines_stay_separate() {
        let lines = explanation("<table>\n<tr>\n</table>\n\nAfter.", Color::Green);
        assert_eq!(plain(&lines), ["<table>", "<tr>", "</table>", "", "After."]);
    }

    #[test]
    fn verbatim_keeps_markup_characters() {
        let lines = verbatim("Not found: billing.__TABLES__\n*x* <EOF>", Color::Red);
        assert_eq!(plain(&lines), ["Not found: billing.__TABLES__", "*x* <EOF>"]);
        assert_eq!(lines[0].spans[0].style.fg, Some(Color::Red));
    }

    #[test]
    fn sql_keeps_line_structure() {
        let lines = sql("SELECT a,\n       b\nFROM t\n");
        let text = plain(&lines);
        assert_eq!(text, ["SELECT a,", "       b", "FROM t"]);
    }
}
