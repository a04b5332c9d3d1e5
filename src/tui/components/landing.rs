//! # Landing Page Component
//!
//! Shown while the timeline is empty: a greeting and four example questions
//! bound to F1..F4.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::component::Component;

/// A canned question offered on the landing page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExamplePrompt {
    pub title: &'static str,
    pub question: &'static str,
}

pub const EXAMPLE_PROMPTS: [ExamplePrompt; 4] = [
    ExamplePrompt {
        title: "Cloud Provider Costs",
        question: "What is the total cost by cloud provider this month?",
    },
    ExamplePrompt {
        title: "Environment Analysis",
        question: "Which environments have the highest costs?",
    },
    ExamplePrompt {
        title: "Cost Center Breakdown",
        question: "Show me cost breakdown by cost center",
    },
    ExamplePrompt {
        title: "AWS Tag Analysis",
        question: "What are the most expensive tags in AWS?",
    },
];

pub const GREETING: &str = "What's on your mind today?";

pub struct LandingPage {
    /// 0.0..=1.0, drives the greeting's brightness.
    pub pulse: f32,
}

impl LandingPage {
    fn lines(&self) -> Vec<Line<'static>> {
        let greeting_color = if self.pulse > 0.5 {
            Color::Cyan
        } else {
            Color::LightCyan
        };
        let mut lines = vec![
            Line::from(Span::styled(
                GREETING,
                Style::default()
                    .fg(greeting_color)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Ask about your cloud spend in plain language.",
                Style::default().fg(Color::DarkGray),
            )),
            Line::default(),
        ];
        for (i, prompt) in EXAMPLE_PROMPTS.iter().enumerate() {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("F{} ", i + 1),
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    prompt.title,
                    Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                ),
            ]));
            lines.push(Line::from(Span::styled(
                prompt.question,
                Style::default().fg(Color::DarkGray),
            )));
        }
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::DarkGray),
        )));
        lines
    }
}

impl Component for LandingPage {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let lines = self.lines();
        let height = u16::try_from(lines.len()).unwrap_or(u16::MAX);
        let [centered] = Layout::vertical([Constraint::Length(height)])
            .flex(Flex::Center)
            .areas(area);
        frame.render_widget(
            Paragraph::new(lines).alignment(Alignment::Center),
            centered,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    #[test]
    fn test_landing_lists_examples_with_keys() {
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        let mut landing = LandingPage { pulse: 0.0 };
        terminal.draw(|f| landing.render(f, f.area())).unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();

        assert!(text.contains(GREETING));
        assert!(text.contains("F1 Cloud Provider Costs"));
        assert!(text.contains("F4 AWS Tag Analysis"));
        assert!(text.contains("Which environments have the highest costs?"));
    }
}
