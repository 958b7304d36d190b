use handlebars::{handlebars_helper, Handlebars};
use serde_json::Value;

/// Handlebars registry with the helpers used by the mail templates.
pub fn get_handlebars() -> Handlebars<'static> {
    let mut handlebars = Handlebars::new();
    handlebars.set_strict_mode(false);

    handlebars_helper!(exists: |v: Value| {
        match v {
            serde_json::Value::Null => false,
            serde_json::Value::String(s) => !s.trim().is_empty(),
            _ => true,
        }
    });
    handlebars.register_helper("exists", Box::new(exists));

    handlebars_helper!(or_default: |v: Value, fallback: String| {
        match v {
            serde_json::Value::Null => fallback,
            serde_json::Value::String(s) if s.trim().is_empty() => fallback,
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        }
    });
    handlebars.register_helper("or_default", Box::new(or_default));

    handlebars_helper!(stringeq: |s1: String, s2: String| s1.eq(&s2));
    handlebars.register_helper("stringeq", Box::new(stringeq));

    handlebars
}

/// Join the non-empty segments with ", ".
pub fn join_non_empty<'a, I>(segments: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    segments
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn handlebars_can_render() {
        let handlebars = get_handlebars();
        let res = handlebars
            .render_template("Hello {{name}}", &json!({"name": "foo"}))
            .expect("This to render");
        assert_eq!(res, "Hello foo");
    }

    #[test]
    fn or_default_falls_back_on_blank_values() {
        let handlebars = get_handlebars();
        let res = handlebars
            .render_template(
                "{{or_default spouse \"N/A\"}}|{{or_default children \"0\"}}|{{or_default caste \"N/A\"}}",
                &json!({"spouse": "", "children": 2, "caste": null}),
            )
            .expect("This to render");
        assert_eq!(res, "N/A|2|N/A");
    }

    #[test]
    fn exists_treats_blank_strings_as_missing() {
        let handlebars = get_handlebars();
        let res = handlebars
            .render_template(
                "{{#if (exists a)}}a{{/if}}{{#if (exists b)}}b{{/if}}",
                &json!({"a": "  ", "b": "x"}),
            )
            .expect("This to render");
        assert_eq!(res, "b");
    }

    #[test]
    fn join_non_empty_skips_blanks() {
        assert_eq!(join_non_empty(["12 Main St", "", "Pune - 411001"]), "12 Main St, Pune - 411001");
        assert_eq!(join_non_empty(["", " "]), "");
    }
}
