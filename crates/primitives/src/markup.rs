//! Statusline markup.
//!
//! Composed lines use a small printf-like markup understood by the host:
//!
//! - `%#Group#` switches to highlight group `Group`
//! - `%*` restores the default highlight
//! - `%=` is a stretch marker; the host distributes free columns across markers
//! - `%%` is a literal percent sign
//!
//! The pipeline itself never interprets markup. These helpers exist for value
//! sources that produce it and for hosts that need a plain-text rendition.

use std::borrow::Cow;

use unicode_width::UnicodeWidthChar;

/// Stretch marker separating justified sections.
pub const STRETCH: &str = "%=";

/// Wraps `text` in highlight group `group`, restoring the default afterwards.
pub fn highlight(group: &str, text: &str) -> String {
	format!("%#{group}#{text}%*")
}

/// Escapes literal percent signs so `text` survives as plain content.
pub fn escape(text: &str) -> Cow<'_, str> {
	if text.contains('%') {
		Cow::Owned(text.replace('%', "%%"))
	} else {
		Cow::Borrowed(text)
	}
}

/// Splits a line at its stretch markers, dropping highlight markup.
///
/// A line without markers yields exactly one section.
pub fn sections(line: &str) -> Vec<String> {
	let mut done = Vec::new();
	let mut current = String::new();
	let mut chars = line.chars().peekable();
	while let Some(c) = chars.next() {
		if c != '%' {
			current.push(c);
			continue;
		}
		match chars.peek().copied() {
			Some('%') => {
				chars.next();
				current.push('%');
			}
			Some('=') => {
				chars.next();
				done.push(std::mem::take(&mut current));
			}
			Some('*') => {
				chars.next();
			}
			Some('#') => {
				chars.next();
				for g in chars.by_ref() {
					if g == '#' {
						break;
					}
				}
			}
			_ => current.push('%'),
		}
	}
	done.push(current);
	done
}

/// Plain text of a line with markup and stretch markers removed.
pub fn strip(line: &str) -> String {
	sections(line).concat()
}

/// Terminal columns occupied by a line once markup is removed.
pub fn display_width(line: &str) -> usize {
	sections(line).iter().map(|s| text_width(s)).sum()
}

/// Paints a line as plain text exactly `width` columns wide when it fits.
///
/// Free columns are spread over the stretch markers, leftmost gaps first.
/// Content wider than `width` is truncated.
pub fn justify(line: &str, width: usize) -> String {
	let sections = sections(line);
	let content: usize = sections.iter().map(|s| text_width(s)).sum();
	let gaps = sections.len() - 1;
	let free = width.saturating_sub(content);

	let mut out = String::with_capacity(width);
	for (i, section) in sections.iter().enumerate() {
		out.push_str(section);
		if i < gaps {
			let extra = usize::from(i < free % gaps);
			out.extend(std::iter::repeat_n(' ', free / gaps + extra));
		}
	}
	truncate(&out, width)
}

fn text_width(text: &str) -> usize {
	text.chars().map(|c| c.width().unwrap_or(0)).sum()
}

fn truncate(text: &str, width: usize) -> String {
	let mut used = 0;
	let mut out = String::new();
	for c in text.chars() {
		let w = c.width().unwrap_or(0);
		if used + w > width {
			break;
		}
		used += w;
		out.push(c);
	}
	out
}
