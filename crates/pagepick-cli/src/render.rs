//! Text and JSON output.
//!
//! Text rows look like:
//!
//! ```text
//! [x] ▾ 📁 Root 1
//! [ ]     Child 1
//! [#]   Locked page
//! ```
//!
//! `[#]` marks a bound (locked) page. The arrow column is blank for leaves
//! and in search mode.

use pagepick::{PageIcon, Picker, Row, RowView, Selection};
use serde::Serialize;
use std::io::Write;
use std::ops::Range;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::error::Result;

const ELLIPSIS: &str = "…";
const INDENT: &str = "  ";

/// Output switches shared by every command.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputOptions {
    pub json: bool,
    /// Maximum display width of a name in text mode.
    pub width: Option<usize>,
}

#[derive(Serialize)]
struct RowOut<'a> {
    #[serde(flatten)]
    row: &'a Row,
    checked: bool,
    disabled: bool,
    show_arrow: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    offset: Option<u32>,
}

impl<'a> RowOut<'a> {
    fn new(view: RowView<'a>, offset: Option<u32>) -> Self {
        Self {
            row: view.row,
            checked: view.checked,
            disabled: view.disabled,
            show_arrow: view.show_arrow,
            offset,
        }
    }
}

#[derive(Serialize)]
struct RowsOut<'a> {
    mode: pagepick::ViewMode,
    count: usize,
    rows: Vec<RowOut<'a>>,
}

#[derive(Serialize)]
struct SelectionOut<'a> {
    selection: &'a Selection,
    disabled: &'a Selection,
}

#[derive(Serialize)]
struct WindowOut<'a> {
    count: usize,
    total_size: u32,
    scroll_offset: u32,
    visible: [usize; 2],
    rendered: [usize; 2],
    rows: Vec<RowOut<'a>>,
}

/// Every row of the current view.
pub fn write_rows(out: &mut dyn Write, picker: &Picker, options: OutputOptions) -> Result<()> {
    let views = (0..picker.rows().count()).filter_map(|index| picker.row_view(index));
    if options.json {
        let payload = RowsOut {
            mode: picker.view_mode(),
            count: picker.rows().count(),
            rows: views.map(|view| RowOut::new(view, None)).collect(),
        };
        serde_json::to_writer_pretty(&mut *out, &payload)?;
        writeln!(out)?;
        return Ok(());
    }

    let mut empty = true;
    for view in views {
        empty = false;
        writeln!(out, "{}", format_row(view, options.width))?;
    }
    if empty {
        writeln!(out, "(no pages)")?;
    }
    Ok(())
}

/// The selected and locked ids.
pub fn write_selection(out: &mut dyn Write, picker: &Picker, options: OutputOptions) -> Result<()> {
    if options.json {
        let payload = SelectionOut {
            selection: picker.selection(),
            disabled: picker.disabled(),
        };
        serde_json::to_writer_pretty(&mut *out, &payload)?;
        writeln!(out)?;
        return Ok(());
    }

    writeln!(out, "selected ({}):", picker.selection().len())?;
    for id in picker.selection().iter() {
        let name = picker.store().get(id).map_or("", |record| record.name.as_str());
        let lock = if picker.disabled().contains(id) { " (bound)" } else { "" };
        writeln!(out, "  {id}  {}{lock}", fit(name, options.width))?;
    }
    Ok(())
}

/// The rows a renderer would draw for `viewport` pixels.
pub fn write_window(
    out: &mut dyn Write,
    picker: &Picker,
    viewport: u32,
    options: OutputOptions,
) -> Result<()> {
    let rows = picker.rows();
    let visible = rows.visible_range(viewport);
    let rendered = rows.render_range(viewport);

    if options.json {
        let payload = WindowOut {
            count: rows.count(),
            total_size: rows.total_size(),
            scroll_offset: rows.scroll_offset(),
            visible: bounds(&visible),
            rendered: bounds(&rendered),
            rows: picker
                .window(viewport)
                .map(|(offset, view)| RowOut::new(view, Some(offset)))
                .collect(),
        };
        serde_json::to_writer_pretty(&mut *out, &payload)?;
        writeln!(out)?;
        return Ok(());
    }

    writeln!(
        out,
        "rows {}..{} of {} (rendered {}..{}, scroll {}px of {}px)",
        visible.start,
        visible.end,
        rows.count(),
        rendered.start,
        rendered.end,
        rows.scroll_offset(),
        rows.total_size(),
    )?;
    for (offset, view) in picker.window(viewport) {
        writeln!(out, "{offset:>6}  {}", format_row(view, options.width))?;
    }
    Ok(())
}

fn bounds(range: &Range<usize>) -> [usize; 2] {
    [range.start, range.end]
}

/// One text line for a row.
#[must_use]
pub fn format_row(view: RowView<'_>, width: Option<usize>) -> String {
    let check = if view.disabled {
        "[#]"
    } else if view.checked {
        "[x]"
    } else {
        "[ ]"
    };
    let arrow = match (view.show_arrow, view.row.expand) {
        (false, _) => " ",
        (true, true) => "▾",
        (true, false) => "▸",
    };
    let indent = INDENT.repeat(view.row.depth);
    let icon = icon_glyph(view.row.icon.as_ref());
    let label = match &view.row.breadcrumb {
        Some(crumb) => crumb.as_str(),
        None => view.row.name.as_str(),
    };
    format!("{check} {indent}{arrow} {icon}{}", fit(label, width))
}

fn icon_glyph(icon: Option<&PageIcon>) -> String {
    match icon {
        Some(PageIcon::Emoji { emoji }) => format!("{emoji} "),
        Some(PageIcon::Url { .. }) | None => String::new(),
    }
}

/// Truncate to `width` display columns, ending in an ellipsis when cut.
#[must_use]
pub fn fit(text: &str, width: Option<usize>) -> String {
    let Some(max) = width else {
        return text.to_owned();
    };
    if text.width() <= max {
        return text.to_owned();
    }
    let ellipsis_width = ELLIPSIS.width();
    if max <= ellipsis_width {
        return truncate_to_width(text, max);
    }
    let mut out = truncate_to_width(text, max - ellipsis_width);
    out.push_str(ELLIPSIS);
    out
}

fn truncate_to_width(text: &str, max: usize) -> String {
    let mut out = String::new();
    let mut used = 0;
    for grapheme in text.graphemes(true) {
        let width = grapheme.width();
        if used + width > max {
            break;
        }
        out.push_str(grapheme);
        used += width;
    }
    out
}
