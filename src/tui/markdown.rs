//! Markdown → ratatui `Text` for generated posts.
//!
//! Generated blogs are markdown: headings, emphasis, lists, quotes, code
//! blocks, links, images and the occasional comparison table. This walks
//! `pulldown_cmark` events and builds styled lines. Tables are laid out as
//! aligned plain-text columns.

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use unicode_width::UnicodeWidthStr;

const CODE_FG: Color = Color::White;
const MUTED: Color = Color::DarkGray;
const LINK_FG: Color = Color::Cyan;

/// Render markdown into owned, styled text with `base_fg` as body color.
pub fn render(content: &str, base_fg: Color) -> Text<'static> {
    let mut opts = Options::empty();
    opts.insert(Options::ENABLE_STRIKETHROUGH);
    opts.insert(Options::ENABLE_TABLES);
    opts.insert(Options::ENABLE_TASKLISTS);

    let mut out = MarkdownWriter::new(base_fg);
    for event in Parser::new_ext(content, opts) {
        out.event(event);
    }
    out.finish()
}

/// Cell text collected while inside a table.
#[derive(Default)]
struct TableBuf {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
    row: Vec<String>,
    cell: String,
    in_header: bool,
}

struct MarkdownWriter {
    lines: Vec<Line<'static>>,
    base_fg: Color,
    /// Inline styles; each entry is already merged with its parent.
    styles: Vec<Style>,
    /// Prefixes applied to every new line (quote bars, code gutters).
    prefixes: Vec<Span<'static>>,
    /// `None` = bullet list, `Some(n)` = numbered list at `n`.
    lists: Vec<Option<u64>>,
    in_code: bool,
    /// A list marker was just written; the item's first paragraph joins it.
    item_open: bool,
    link: Option<String>,
    /// Image alt text is collected, then emitted with the URL.
    image: Option<(String, String)>,
    table: Option<TableBuf>,
    pending_gap: bool,
}

impl MarkdownWriter {
    fn new(base_fg: Color) -> Self {
        Self {
            lines: Vec::new(),
            base_fg,
            styles: Vec::new(),
            prefixes: Vec::new(),
            lists: Vec::new(),
            in_code: false,
            item_open: false,
            link: None,
            image: None,
            table: None,
            pending_gap: false,
        }
    }

    fn finish(self) -> Text<'static> {
        Text::from(self.lines)
    }

    fn current_style(&self) -> Style {
        self.styles
            .last()
            .copied()
            .unwrap_or_else(|| Style::default().fg(self.base_fg))
    }

    fn with_style(&mut self, overlay: Style) {
        let merged = self.current_style().patch(overlay);
        self.styles.push(merged);
    }

    fn new_line(&mut self, mut line: Line<'static>) {
        for prefix in self.prefixes.iter().rev() {
            line.spans.insert(0, prefix.clone());
        }
        self.lines.push(line);
    }

    fn append(&mut self, span: Span<'static>) {
        match self.lines.last_mut() {
            Some(line) => line.push_span(span),
            None => self.new_line(Line::from(span)),
        }
    }

    /// Separates consecutive blocks with one blank line.
    fn gap(&mut self) {
        if self.pending_gap {
            self.new_line(Line::default());
            self.pending_gap = false;
        }
    }

    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => {
                if let Some(table) = self.table.as_mut() {
                    table.cell.push_str(&code);
                } else {
                    self.append(Span::styled(
                        code.to_string(),
                        Style::default().fg(CODE_FG).bg(MUTED),
                    ));
                }
            }
            Event::SoftBreak => self.text(" "),
            Event::HardBreak => self.new_line(Line::default()),
            Event::Rule => {
                self.gap();
                self.new_line(Line::from(Span::styled("─".repeat(32), Style::default().fg(MUTED))));
                self.pending_gap = true;
            }
            Event::TaskListMarker(done) => {
                self.append(Span::raw(if done { "[x] " } else { "[ ] " }));
            }
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph if self.item_open => self.item_open = false,
            Tag::Paragraph => {
                self.gap();
                self.new_line(Line::default());
            }
            Tag::Heading { level, .. } => {
                self.gap();
                let style = heading_style(self.base_fg, level);
                self.new_line(Line::default());
                self.styles.push(style);
            }
            Tag::BlockQuote(_) => {
                self.gap();
                self.prefixes
                    .push(Span::styled("▎ ", Style::default().fg(MUTED)));
                self.with_style(Style::default().add_modifier(Modifier::ITALIC));
            }
            Tag::CodeBlock(kind) => {
                self.gap();
                let label = match kind {
                    CodeBlockKind::Fenced(lang) if !lang.is_empty() => format!("┌ {lang}"),
                    _ => "┌".to_string(),
                };
                self.new_line(Line::from(Span::styled(label, Style::default().fg(MUTED))));
                self.prefixes
                    .push(Span::styled("│ ", Style::default().fg(MUTED)));
                self.in_code = true;
            }
            Tag::List(first) => {
                if self.lists.is_empty() {
                    self.gap();
                }
                self.lists.push(first);
            }
            Tag::Item => {
                let indent = "  ".repeat(self.lists.len().saturating_sub(1));
                let marker = match self.lists.last_mut() {
                    Some(Some(n)) => {
                        let marker = format!("{indent}{n}. ");
                        *n += 1;
                        marker
                    }
                    _ => format!("{indent}• "),
                };
                self.new_line(Line::from(Span::styled(marker, Style::default().fg(MUTED))));
                self.item_open = true;
            }
            Tag::Table(_) => {
                self.gap();
                self.table = Some(TableBuf::default());
            }
            Tag::TableHead => {
                if let Some(table) = self.table.as_mut() {
                    table.in_header = true;
                }
            }
            Tag::Emphasis => self.with_style(Style::default().add_modifier(Modifier::ITALIC)),
            Tag::Strong => self.with_style(Style::default().add_modifier(Modifier::BOLD)),
            Tag::Strikethrough => {
                self.with_style(Style::default().add_modifier(Modifier::CROSSED_OUT))
            }
            Tag::Link { dest_url, .. } => {
                self.link = Some(dest_url.to_string());
                self.with_style(Style::default().fg(LINK_FG).add_modifier(Modifier::UNDERLINED));
            }
            Tag::Image { dest_url, .. } => {
                self.image = Some((String::new(), dest_url.to_string()));
            }
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => self.pending_gap = true,
            TagEnd::Heading(_) => {
                self.styles.pop();
                self.pending_gap = true;
            }
            TagEnd::BlockQuote(_) => {
                self.prefixes.pop();
                self.styles.pop();
                self.pending_gap = true;
            }
            TagEnd::CodeBlock => {
                self.in_code = false;
                self.prefixes.pop();
                self.new_line(Line::from(Span::styled("└", Style::default().fg(MUTED))));
                self.pending_gap = true;
            }
            TagEnd::List(_) => {
                self.lists.pop();
                if self.lists.is_empty() {
                    self.pending_gap = true;
                }
            }
            TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough => {
                self.styles.pop();
            }
            TagEnd::Link => {
                self.styles.pop();
                if let Some(url) = self.link.take() {
                    self.append(Span::styled(format!(" <{url}>"), Style::default().fg(MUTED)));
                }
            }
            TagEnd::Image => {
                if let Some((alt, url)) = self.image.take() {
                    let label = if alt.is_empty() { "image".to_string() } else { alt };
                    self.append(Span::styled(
                        format!("[{label}: {url}]"),
                        Style::default().fg(LINK_FG),
                    ));
                }
            }
            TagEnd::TableCell => {
                if let Some(table) = self.table.as_mut() {
                    let cell = std::mem::take(&mut table.cell);
                    table.row.push(cell.trim().to_string());
                }
            }
            TagEnd::TableHead => {
                if let Some(table) = self.table.as_mut() {
                    table.header = std::mem::take(&mut table.row);
                    table.in_header = false;
                }
            }
            TagEnd::TableRow => {
                if let Some(table) = self.table.as_mut()
                    && !table.in_header
                {
                    let row = std::mem::take(&mut table.row);
                    table.rows.push(row);
                }
            }
            TagEnd::Table => {
                if let Some(table) = self.table.take() {
                    self.emit_table(table);
                }
                self.pending_gap = true;
            }
            _ => {}
        }
    }

    fn text(&mut self, text: &str) {
        self.item_open = false;
        if let Some((alt, _)) = self.image.as_mut() {
            alt.push_str(text);
            return;
        }
        if let Some(table) = self.table.as_mut() {
            table.cell.push_str(text);
            return;
        }
        // ratatui draws '\t' as zero-width
        let text = text.replace('\t', "    ");
        if self.in_code {
            for line in text.lines() {
                self.new_line(Line::from(Span::styled(
                    line.to_string(),
                    Style::default().fg(CODE_FG),
                )));
            }
            return;
        }
        let style = self.current_style();
        self.append(Span::styled(text, style));
    }

    fn emit_table(&mut self, table: TableBuf) {
        let columns = std::iter::once(&table.header)
            .chain(table.rows.iter())
            .map(Vec::len)
            .max()
            .unwrap_or(0);
        if columns == 0 {
            return;
        }
        let mut widths = vec![0usize; columns];
        for row in std::iter::once(&table.header).chain(table.rows.iter()) {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max(cell.width());
            }
        }

        let header_style = Style::default()
            .fg(self.base_fg)
            .add_modifier(Modifier::BOLD);
        let body_style = Style::default().fg(self.base_fg);
        let rule_style = Style::default().fg(MUTED);

        if !table.header.is_empty() {
            self.new_line(table_row(&table.header, &widths, header_style, rule_style));
            let rule = widths
                .iter()
                .map(|w| "─".repeat(*w))
                .collect::<Vec<_>>()
                .join("─┼─");
            self.new_line(Line::from(Span::styled(rule, rule_style)));
        }
        for row in &table.rows {
            self.new_line(table_row(row, &widths, body_style, rule_style));
        }
    }
}

fn table_row(cells: &[String], widths: &[usize], style: Style, rule: Style) -> Line<'static> {
    let mut spans = Vec::with_capacity(widths.len() * 2);
    for (i, width) in widths.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" │ ", rule));
        }
        let cell = cells.get(i).map(String::as_str).unwrap_or("");
        let pad = width.saturating_sub(cell.width());
        spans.push(Span::styled(format!("{cell}{}", " ".repeat(pad)), style));
    }
    Line::from(spans)
}

fn heading_style(base_fg: Color, level: HeadingLevel) -> Style {
    let style = Style::default().fg(base_fg).add_modifier(Modifier::BOLD);
    match level {
        HeadingLevel::H1 => style.add_modifier(Modifier::UNDERLINED),
        HeadingLevel::H2 => style,
        _ => style.add_modifier(Modifier::ITALIC),
    }
}
