use regex::Regex;

use crate::error::{Error, Result};

use super::KeyCodec;

/// Default pattern for fields declared without one.
const DEFAULT_FIELD_PATTERN: &str = r"\w+";

/// Shard numbers are written without leading zeros, so that every matching
/// name corresponds to exactly one integer and back.
const NUMBER_PATTERN: &str = "0|[1-9][0-9]*";

enum Segment {
    Literal(String),
    Field(usize),
}

struct TemplateField {
    name: String,
    pattern: String,
    /// Anchored form of `pattern`, used to validate values on render.
    check: Regex,
}

/// A file-name pattern with named fields, e.g. `{kind}_{number}.parquet`.
///
/// The whole template is matched anchored: a name either satisfies every
/// literal and every field pattern in full, or it is not a member of the
/// dataset at all. [`extract`](KeyTemplate::extract) and
/// [`render`](KeyTemplate::render) are inverses of each other for every
/// matching name and every valid field assignment.
pub struct KeyTemplate {
    template: String,
    regex: Regex,
    segments: Vec<Segment>,
    fields: Vec<TemplateField>,
}

impl KeyTemplate {
    /// Compile `template`, taking per-field patterns from `patterns`.
    ///
    /// Fields not listed in `patterns` default to `\w+`; extra entries in
    /// `patterns` that the template never mentions are ignored.
    pub fn new(template: &str, patterns: &[(&str, &str)]) -> Result<Self> {
        let err = |reason: &str| Error::Template {
            template: template.to_string(),
            reason: reason.to_string(),
        };

        let mut segments = Vec::new();
        let mut fields: Vec<TemplateField> = Vec::new();
        let mut literal = String::new();
        let mut chars = template.chars();
        while let Some(c) = chars.next() {
            match c {
                '{' => {
                    let mut name = String::new();
                    loop {
                        match chars.next() {
                            Some('}') => break,
                            Some(ch) => name.push(ch),
                            None => return Err(err("unterminated `{`")),
                        }
                    }
                    if name.is_empty() {
                        return Err(err("empty field name"));
                    }
                    if !is_field_name(&name) {
                        return Err(err("field names must be of the form [A-Za-z_][A-Za-z0-9_]*"));
                    }
                    if fields.iter().any(|f| f.name == name) {
                        return Err(err("duplicate field name"));
                    }
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    let pattern = patterns
                        .iter()
                        .find(|(n, _)| *n == name)
                        .map(|(_, p)| *p)
                        .unwrap_or(DEFAULT_FIELD_PATTERN);
                    let check = Regex::new(&format!("^(?:{pattern})$"))
                        .map_err(|_| err("invalid field pattern"))?;
                    segments.push(Segment::Field(fields.len()));
                    fields.push(TemplateField {
                        name,
                        pattern: pattern.to_string(),
                        check,
                    });
                }
                '}' => return Err(err("unmatched `}`")),
                _ => literal.push(c),
            }
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        let mut pattern = String::from("^");
        for segment in &segments {
            match segment {
                Segment::Literal(text) => pattern.push_str(&regex::escape(text)),
                Segment::Field(i) => {
                    let field = &fields[*i];
                    pattern.push_str(&format!("(?P<{}>(?:{}))", field.name, field.pattern));
                }
            }
        }
        pattern.push('$');
        let regex = Regex::new(&pattern).map_err(|_| err("invalid field pattern"))?;

        Ok(Self {
            template: template.to_string(),
            regex,
            segments,
            fields,
        })
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Whether `name` satisfies the template in full.
    pub fn matches(&self, name: &str) -> bool {
        self.regex.is_match(name)
    }

    /// Field values of a matching name, in template order.
    pub fn extract<'t, 'n>(&'t self, name: &'n str) -> Result<Vec<(&'t str, &'n str)>> {
        let caps = self
            .regex
            .captures(name)
            .ok_or_else(|| self.key_format(format!("name `{name}` does not match")))?;
        Ok(self
            .fields
            .iter()
            .map(|f| {
                let value = caps.name(&f.name).map(|m| m.as_str()).unwrap_or_default();
                (f.name.as_str(), value)
            })
            .collect())
    }

    /// Rebuild the entry name for a full field assignment.
    ///
    /// Every template field must be supplied, every value must satisfy its
    /// field pattern, and unknown field names are rejected.
    pub fn render(&self, values: &[(&str, &str)]) -> Result<String> {
        for (name, _) in values {
            if !self.fields.iter().any(|f| f.name == *name) {
                return Err(self.key_format(format!("unknown field `{name}`")));
            }
        }
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Field(i) => {
                    let field = &self.fields[*i];
                    let value = values
                        .iter()
                        .find(|(n, _)| *n == field.name)
                        .map(|(_, v)| *v)
                        .ok_or_else(|| {
                            self.key_format(format!("missing field `{}`", field.name))
                        })?;
                    if !field.check.is_match(value) {
                        return Err(self.key_format(format!(
                            "value `{value}` rejected for field `{}`",
                            field.name
                        )));
                    }
                    out.push_str(value);
                }
            }
        }
        Ok(out)
    }

    fn key_format(&self, detail: String) -> Error {
        Error::KeyFormat {
            template: self.template.clone(),
            detail,
        }
    }
}

fn is_field_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Single-field integer mode over a [`KeyTemplate`]: names of the form
/// `<kind>_<number>.parquet`, keyed by the shard number alone.
pub struct ShardTemplate {
    template: KeyTemplate,
}

impl ShardTemplate {
    pub fn new(kind: &str) -> Result<Self> {
        if kind.is_empty() || !kind.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(Error::Template {
                template: format!("{kind}_{{number}}.parquet"),
                reason: "dataset kind must be alphanumeric".to_string(),
            });
        }
        let template = KeyTemplate::new(
            &format!("{kind}_{{number}}.parquet"),
            &[("number", NUMBER_PATTERN)],
        )?;
        Ok(Self { template })
    }

    pub fn template(&self) -> &KeyTemplate {
        &self.template
    }
}

impl KeyCodec for ShardTemplate {
    type Key = u32;

    fn matches(&self, name: &str) -> bool {
        self.template.matches(name)
    }

    fn extract(&self, name: &str) -> Result<u32> {
        let fields = self.template.extract(name)?;
        let (_, raw) = fields[0]; // the template has exactly one field
        raw.parse::<u32>().map_err(|_| Error::KeyFormat {
            template: self.template.template().to_string(),
            detail: format!("shard number `{raw}` is out of range"),
        })
    }

    fn render(&self, key: &u32) -> Result<String> {
        self.template.render(&[("number", &key.to_string())])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multi_field_extract_and_render_are_inverses() {
        let template = KeyTemplate::new(
            "{kind}_{number}.parquet",
            &[("kind", "[a-z]+"), ("number", r"\d+")],
        )
        .expect("template");
        let fields = template.extract("titles_3.parquet").expect("extract");
        assert_eq!(fields, vec![("kind", "titles"), ("number", "3")]);
        assert_eq!(
            template.render(&fields).expect("render"),
            "titles_3.parquet"
        );
    }

    #[test]
    fn matching_is_anchored() {
        let shards = ShardTemplate::new("titles").expect("template");
        assert!(shards.matches("titles_3.parquet"));
        assert!(!shards.matches("titles_3.parquet.bak"));
        assert!(!shards.matches("old-titles_3.parquet"));
        assert!(!shards.matches("titles_.parquet"));
    }

    #[test]
    fn leading_zeros_are_not_members() {
        let shards = ShardTemplate::new("titles").expect("template");
        assert!(!shards.matches("titles_007.parquet"));
        assert!(shards.matches("titles_0.parquet"));
        assert!(shards.matches("titles_700.parquet"));
    }

    #[test]
    fn extract_rejects_non_matching_names() {
        let shards = ShardTemplate::new("titles").expect("template");
        let err = shards.extract("abstracts_3.parquet").unwrap_err();
        assert!(matches!(err, Error::KeyFormat { .. }));
    }

    #[test]
    fn extract_propagates_overflow() {
        let shards = ShardTemplate::new("titles").expect("template");
        assert!(shards.matches("titles_4294967296.parquet"));
        let err = shards.extract("titles_4294967296.parquet").unwrap_err();
        assert!(matches!(err, Error::KeyFormat { .. }));
    }

    #[test]
    fn render_validates_values() {
        let template =
            KeyTemplate::new("titles_{number}.parquet", &[("number", r"\d+")]).expect("template");
        assert!(matches!(
            template.render(&[("number", "12x")]),
            Err(Error::KeyFormat { .. })
        ));
        assert!(matches!(
            template.render(&[]),
            Err(Error::KeyFormat { .. })
        ));
        assert!(matches!(
            template.render(&[("number", "1"), ("extra", "x")]),
            Err(Error::KeyFormat { .. })
        ));
    }

    #[test]
    fn malformed_templates_are_rejected() {
        for template in ["titles_{number", "titles_}x", "{}", "{1bad}", "{a}_{a}"] {
            assert!(
                matches!(KeyTemplate::new(template, &[]), Err(Error::Template { .. })),
                "expected rejection of `{template}`"
            );
        }
    }

    #[test]
    fn shard_round_trip() {
        proptest::proptest!(|(kind in "[a-z][a-z0-9_]{0,11}", n in proptest::num::u32::ANY)| {
            let shards = ShardTemplate::new(&kind).expect("template");
            let name = shards.render(&n).expect("render");
            proptest::prop_assert!(shards.matches(&name));
            proptest::prop_assert_eq!(shards.extract(&name).expect("extract"), n);
        })
    }

    #[test]
    fn name_round_trip() {
        proptest::proptest!(|(kind in "[a-z][a-z0-9_]{0,11}", n in proptest::num::u32::ANY)| {
            let name = format!("{kind}_{n}.parquet");
            let shards = ShardTemplate::new(&kind).expect("template");
            let key = shards.extract(&name).expect("extract");
            proptest::prop_assert_eq!(shards.render(&key).expect("render"), name);
        })
    }
}
