//! Toggle viewer generation by line-oriented template expansion.
//!
//! The viewer template is an ordinary HTML page written for two placeholder
//! categories, `type1` and `type2`. A handful of lines carry fixed markers;
//! each marker line is rewritten for the real categories and every other
//! line is copied verbatim:
//!
//! | Marker | Expands to |
//! |--------|------------|
//! | [`TYPE_DECLARATION`] | the category list, `var types = ["real","fake"]` |
//! | [`FIRST_CONDITIONAL`] | one line for the first category |
//! | [`REST_CONDITIONAL`] | one line per remaining category (none if there is only one) |
//! | [`FIRST_TOGGLE`] | one line for the first category |
//! | [`REST_TOGGLE`] | one line per remaining category |
//! | [`OPTION_PLACEHOLDER`] | one `<option>` per catalog file |
//!
//! Rules live in a table ([`RULES`]) and are tried in order; the first
//! marker found in a line wins. Within an expanded line, `typeN_text` slots
//! take the category label and `typeN` slots take the category name.
//!
//! The marker text is replaced in place, so indentation and anything around
//! the marker survive, and each emitted line keeps the template line's
//! terminator.

use crate::types::{Category, FileEntry};
use maud::html;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const TYPE_DECLARATION: &str = r#"var types = ["type1","type2"]"#;
pub const FIRST_CONDITIONAL: &str =
    r#"if (type == "type1"){$("footer").innerHTML = "type1_text";}"#;
pub const REST_CONDITIONAL: &str =
    r#"else if (type == "type2"){$("footer").innerHTML = "type2_text";fh = 40;}"#;
pub const FIRST_TOGGLE: &str = r#"<td><div id="typeText_type1" class="navunselected" onmousedown="changeType(&#39;type1&#39;);">type1_text</div></td>"#;
pub const REST_TOGGLE: &str = r#"<td><div id="typeText_type2" class="navunselected" onmousedown="changeType(&#39;type2&#39;);">type2_text</div></td>"#;
pub const OPTION_PLACEHOLDER: &str = r#"<option value="1">Sample_01</option>"#;

/// Built-in viewer template, used when the gallery has none.
pub const STOCK_TEMPLATE: &str = include_str!("../static/comp.html");

const FIRST_SLOT: &str = "type1";
const REST_SLOT: &str = "type2";

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Path too shallow to derive a tag: {0}")]
    ShallowPath(String),
    #[error("Template needs at least one category")]
    NoCategories,
}

/// Everything an expansion may draw on.
#[derive(Debug, Clone, Copy)]
pub struct ExpandContext<'a> {
    pub categories: &'a [Category],
    pub files: &'a [FileEntry],
}

/// Expands one marker line (without its terminator) into replacement lines.
pub type ExpandFn = fn(&str, &str, &ExpandContext<'_>) -> Result<Vec<String>, TemplateError>;

/// A marker and what to do with lines containing it.
#[derive(Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    pub marker: &'static str,
    pub expand: ExpandFn,
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("marker", &self.marker)
            .finish()
    }
}

/// The viewer rules, in evaluation order.
pub const RULES: &[Rule] = &[
    Rule {
        name: "type-declaration",
        marker: TYPE_DECLARATION,
        expand: expand_type_declaration,
    },
    Rule {
        name: "first-conditional",
        marker: FIRST_CONDITIONAL,
        expand: expand_first,
    },
    Rule {
        name: "rest-conditional",
        marker: REST_CONDITIONAL,
        expand: expand_rest,
    },
    Rule {
        name: "first-toggle",
        marker: FIRST_TOGGLE,
        expand: expand_first,
    },
    Rule {
        name: "rest-toggle",
        marker: REST_TOGGLE,
        expand: expand_rest,
    },
    Rule {
        name: "options",
        marker: OPTION_PLACEHOLDER,
        expand: expand_options,
    },
];

/// One marker line found in the template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerHit {
    pub rule: &'static str,
    /// 1-based template line number.
    pub line: usize,
    /// Number of lines emitted in its place.
    pub emitted: usize,
}

/// Expanded document plus what happened to it.
#[derive(Debug, Clone)]
pub struct ExpandedTemplate {
    pub text: String,
    pub input_lines: usize,
    pub output_lines: usize,
    pub hits: Vec<MarkerHit>,
}

/// Expand `template` with the built-in [`RULES`].
pub fn expand(template: &str, ctx: &ExpandContext<'_>) -> Result<ExpandedTemplate, TemplateError> {
    expand_with_rules(template, ctx, RULES)
}

/// Expand `template`, trying `rules` in order on every line.
pub fn expand_with_rules(
    template: &str,
    ctx: &ExpandContext<'_>,
    rules: &[Rule],
) -> Result<ExpandedTemplate, TemplateError> {
    if ctx.categories.is_empty() {
        return Err(TemplateError::NoCategories);
    }

    let mut text = String::with_capacity(template.len());
    let mut hits = Vec::new();
    let mut input_lines = 0;
    let mut output_lines = 0;

    for (idx, raw) in template.split_inclusive('\n').enumerate() {
        input_lines += 1;
        let content = raw.trim_end_matches(['\n', '\r']);
        let terminator = &raw[content.len()..];

        let Some(rule) = rules.iter().find(|r| content.contains(r.marker)) else {
            text.push_str(raw);
            output_lines += 1;
            continue;
        };

        let lines = (rule.expand)(content, rule.marker, ctx)?;
        let separator = if terminator.is_empty() { "\n" } else { terminator };
        for (i, line) in lines.iter().enumerate() {
            text.push_str(line);
            text.push_str(if i + 1 == lines.len() { terminator } else { separator });
        }
        output_lines += lines.len();
        hits.push(MarkerHit {
            rule: rule.name,
            line: idx + 1,
            emitted: lines.len(),
        });
    }

    Ok(ExpandedTemplate {
        text,
        input_lines,
        output_lines,
        hits,
    })
}

// ============================================================================
// Expansions
// ============================================================================

/// `var types = ["type1","type2"]` → `var types = ["real","fake"]`.
pub fn expand_type_declaration(
    line: &str,
    marker: &str,
    ctx: &ExpandContext<'_>,
) -> Result<Vec<String>, TemplateError> {
    let ids: Vec<&str> = ctx.categories.iter().map(|c| c.id.as_str()).collect();
    let declaration = format!("var types = {}", serde_json::to_string(&ids)?);
    Ok(vec![line.replacen(marker, &declaration, 1)])
}

/// The line once, for the first category.
pub fn expand_first(
    line: &str,
    _marker: &str,
    ctx: &ExpandContext<'_>,
) -> Result<Vec<String>, TemplateError> {
    Ok(ctx
        .categories
        .first()
        .map(|cat| fill_slots(line, FIRST_SLOT, cat))
        .into_iter()
        .collect())
}

/// The line once per category after the first.
pub fn expand_rest(
    line: &str,
    _marker: &str,
    ctx: &ExpandContext<'_>,
) -> Result<Vec<String>, TemplateError> {
    Ok(ctx
        .categories
        .iter()
        .skip(1)
        .map(|cat| fill_slots(line, REST_SLOT, cat))
        .collect())
}

/// One `<option>` per catalog file, value and label both the file's tag.
pub fn expand_options(
    line: &str,
    marker: &str,
    ctx: &ExpandContext<'_>,
) -> Result<Vec<String>, TemplateError> {
    let reference = &ctx
        .categories
        .first()
        .ok_or(TemplateError::NoCategories)?
        .id;
    ctx.files
        .iter()
        .map(|file| {
            let tag = tag_for(reference, file)?;
            let option = html! { option value=(tag) { (tag) } }.into_string();
            Ok(line.replacen(marker, &option, 1))
        })
        .collect()
}

/// Tag of a catalog file: its full path `./<reference>/<file>` minus the
/// first two segments.
///
/// Needs at least one segment below the reference category.
pub fn tag_for(reference: &str, file: &FileEntry) -> Result<String, TemplateError> {
    let full: Vec<&str> = [".", reference]
        .into_iter()
        .chain(file.segments().iter().map(String::as_str))
        .collect();
    if full.len() < 3 {
        return Err(TemplateError::ShallowPath(full.join("/")));
    }
    Ok(full[2..].join("/"))
}

/// Replace `{slot}_text` with the label and `{slot}` with the category name.
///
/// Single left-to-right pass: substituted text is never scanned again, so a
/// label containing `type1` stays intact.
pub fn fill_slots(line: &str, slot: &str, category: &Category) -> String {
    let label_slot = format!("{slot}_text");
    let mut out = String::with_capacity(line.len());
    let mut rest = line;

    while let Some(ch) = rest.chars().next() {
        if let Some(after) = rest.strip_prefix(label_slot.as_str()) {
            out.push_str(&category.label);
            rest = after;
        } else if let Some(after) = rest.strip_prefix(slot) {
            out.push_str(&category.id);
            rest = after;
        } else {
            out.push(ch);
            rest = &rest[ch.len_utf8()..];
        }
    }
    out
}

// ============================================================================
// Template loading
// ============================================================================

/// Where the template text came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    File(PathBuf),
    BuiltIn,
}

/// Read `root/<name>`, falling back to [`STOCK_TEMPLATE`] when it does not exist.
pub fn load_template(root: &Path, name: &str) -> Result<(String, TemplateSource), TemplateError> {
    let path = root.join(name);
    if !path.exists() {
        return Ok((STOCK_TEMPLATE.to_string(), TemplateSource::BuiltIn));
    }
    let text = std::fs::read_to_string(&path)?;
    Ok((text, TemplateSource::File(path)))
}
