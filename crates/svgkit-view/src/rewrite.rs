//! Attribute rewriting
//!
//! Shallow text substitution that injects or overrides presentation
//! attributes on SVG markup.

/// Set one attribute by text substitution.
///
/// Every `name="..."` occurrence is replaced with `name="value"`; when no
/// such occurrence exists, ` name="value"` is injected right after the
/// opening `<svg` token. The markup is never parsed, so an occurrence of
/// the same pattern inside unrelated text or attribute values gets
/// rewritten too — that fidelity limit is inherited from the contract, not
/// something to fix here. Re-applying the same value is a no-op.
pub fn apply_attribute(markup: &str, name: &str, value: &str) -> String {
    let pattern = format!("{name}=\"");

    if markup.contains(&pattern) {
        let mut out = String::with_capacity(markup.len());
        let mut rest = markup;
        while let Some(start) = rest.find(&pattern) {
            let after = start + pattern.len();
            match rest[after..].find('"') {
                Some(end) => {
                    out.push_str(&rest[..after]);
                    out.push_str(value);
                    out.push('"');
                    rest = &rest[after + end + 1..];
                }
                // Unterminated value, leave the tail as written
                None => break,
            }
        }
        out.push_str(rest);
        out
    } else {
        markup.replacen("<svg", &format!("<svg {name}=\"{value}\""), 1)
    }
}

/// Set several attributes, first to last.
pub fn apply_attributes<'a, I>(markup: &str, attributes: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    attributes
        .into_iter()
        .fold(markup.to_string(), |acc, (name, value)| {
            apply_attribute(&acc, name, value)
        })
}

/// Caller-requested fill/stroke values, layered over markup at render time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PresentationOverrides {
    /// Fill color override.
    pub fill: Option<String>,

    /// Stroke color override.
    pub stroke: Option<String>,
}

impl PresentationOverrides {
    /// Check whether any override is requested.
    pub fn is_empty(&self) -> bool {
        self.fill.is_none() && self.stroke.is_none()
    }

    /// Apply the overrides, fill first, then stroke.
    pub fn apply(&self, markup: &str) -> String {
        let mut out = markup.to_string();
        if let Some(fill) = &self.fill {
            out = apply_attribute(&out, "fill", fill);
        }
        if let Some(stroke) = &self.stroke {
            out = apply_attribute(&out, "stroke", stroke);
        }
        out
    }
}
