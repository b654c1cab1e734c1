use url::Url;

use crate::error::{PathRenderError, PathTemplateError};

/// A parsed path template like `/messages/{id}`.
///
/// Placeholders are written as `{name}` and may appear anywhere inside a path segment.
/// Substituted values are percent-encoded as part of the segment they appear in,
/// so a value can never introduce additional path segments.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct PathTemplate {
	template: String,
	segments: Vec<Segment>,
}

#[derive(Debug, Clone, Eq, PartialEq)]
struct Segment {
	pieces: Vec<Piece>,
}

#[derive(Debug, Clone, Eq, PartialEq)]
enum Piece {
	Literal(String),
	Placeholder(String),
}

impl PathTemplate {
	/// Parse a path template.
	pub fn parse(template: &str) -> Result<Self, PathTemplateError> {
		let error_template = || template.to_owned();

		let rest = template
			.strip_prefix('/')
			.ok_or_else(|| PathTemplateError::MissingLeadingSlash { template: error_template() })?;

		if template.contains(['?', '#']) {
			return Err(PathTemplateError::QueryOrFragment { template: error_template() });
		}

		let mut segments = Vec::new();
		let mut names: Vec<&str> = Vec::new();
		let mut offset = 1;
		for text in rest.split('/') {
			if matches!(text, "." | "..") {
				return Err(PathTemplateError::DotSegment { template: error_template() });
			}
			let segment = parse_segment(template, text, offset, &mut names)?;
			segments.push(segment);
			offset += text.len() + 1;
		}

		Ok(Self {
			template: template.to_owned(),
			segments,
		})
	}

	/// Get the template text.
	pub fn as_str(&self) -> &str {
		&self.template
	}

	/// Iterate over the placeholder names in order of appearance.
	pub fn placeholders(&self) -> impl Iterator<Item = &str> {
		self.segments
			.iter()
			.flat_map(|segment| segment.pieces.iter())
			.filter_map(|piece| match piece {
				Piece::Placeholder(name) => Some(name.as_str()),
				Piece::Literal(_) => None,
			})
	}

	/// Render the path segments with the given values, without percent-encoding.
	///
	/// The `lookup` function is called for each placeholder and must return the unencoded value.
	/// A segment with a placeholder may not render as empty, `.` or `..`:
	/// URL normalization would drop or resolve such a segment, so the request would reach a different resource.
	pub fn render_segments<'a>(&self, lookup: impl Fn(&str) -> Option<&'a str>) -> Result<Vec<String>, PathRenderError> {
		let mut rendered = Vec::with_capacity(self.segments.len());
		for segment in &self.segments {
			let mut text = String::new();
			let mut has_placeholder = false;
			for piece in &segment.pieces {
				match piece {
					Piece::Literal(literal) => text.push_str(literal),
					Piece::Placeholder(name) => {
						let value = lookup(name).ok_or_else(|| PathRenderError::MissingValue { placeholder: name.clone() })?;
						text.push_str(value);
						has_placeholder = true;
					},
				}
			}
			if has_placeholder && matches!(text.as_str(), "" | "." | "..") {
				return Err(PathRenderError::InvalidSegment {
					template: self.template.clone(),
					segment: text,
				});
			}
			rendered.push(text);
		}
		Ok(rendered)
	}

	/// Append the rendered path to the path of a base URL.
	///
	/// See [`Self::render_segments()`] for the requirements on the values.
	pub fn render<'a>(&self, base: &Url, lookup: impl Fn(&str) -> Option<&'a str>) -> Result<Url, PathRenderError> {
		let segments = self.render_segments(lookup)?;
		Ok(append_segments(base, &segments))
	}
}

/// Append rendered path segments to the path of a base URL, percent-encoding each segment.
///
/// The query string and fragment of the base URL are removed.
/// The segments must not be `.` or `..`, those are silently skipped by [`url::PathSegmentsMut`].
pub(crate) fn append_segments(base: &Url, segments: &[String]) -> Url {
	let mut url = base.clone();
	url.set_query(None);
	url.set_fragment(None);
	// A NetworkAddress never holds a cannot-be-a-base URL, so this always succeeds for resolved addresses.
	if let Ok(mut path) = url.path_segments_mut() {
		path.pop_if_empty();
		path.extend(segments.iter().map(String::as_str));
	}
	url
}

impl std::fmt::Display for PathTemplate {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		f.write_str(&self.template)
	}
}

fn parse_segment<'a>(template: &'a str, text: &'a str, offset: usize, names: &mut Vec<&'a str>) -> Result<Segment, PathTemplateError> {
	let mut pieces = Vec::new();
	let mut literal_start = 0;
	let mut chars = text.char_indices();

	while let Some((i, c)) = chars.next() {
		match c {
			'{' => {
				if literal_start < i {
					pieces.push(Piece::Literal(text[literal_start..i].to_owned()));
				}
				let close = loop {
					match chars.next() {
						Some((j, '}')) => break j,
						Some((j, '{')) => return Err(unbalanced(template, offset + j)),
						Some(_) => continue,
						None => return Err(unbalanced(template, offset + i)),
					}
				};
				let name = &text[i + 1..close];
				if !is_placeholder_name(name) {
					return Err(PathTemplateError::InvalidPlaceholder {
						template: template.to_owned(),
						name: name.to_owned(),
					});
				}
				if names.contains(&name) {
					return Err(PathTemplateError::DuplicatePlaceholder {
						template: template.to_owned(),
						name: name.to_owned(),
					});
				}
				names.push(name);
				pieces.push(Piece::Placeholder(name.to_owned()));
				literal_start = close + 1;
			},
			'}' => return Err(unbalanced(template, offset + i)),
			_ => (),
		}
	}

	if literal_start < text.len() {
		pieces.push(Piece::Literal(text[literal_start..].to_owned()));
	}

	Ok(Segment { pieces })
}

fn unbalanced(template: &str, position: usize) -> PathTemplateError {
	PathTemplateError::UnbalancedBrace {
		template: template.to_owned(),
		position,
	}
}

fn is_placeholder_name(name: &str) -> bool {
	let mut chars = name.chars();
	match chars.next() {
		Some(c) if c.is_ascii_alphabetic() || c == '_' => (),
		_ => return false,
	}
	chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}
