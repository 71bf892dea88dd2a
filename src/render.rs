use crate::fields::FieldSelection;
use crate::pretty::write_pretty;
use crate::record::Record;
use crate::unrolled;

/// How records are turned into bytes. Chosen once when the logger is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Renderer {
    /// One line of compact JSON per event, via `serde_json`.
    Machine,
    /// Indented JSON per event, highlighted when `colors` is set.
    Human { colors: bool },
    /// One line of compact JSON per event, written by hand with the given
    /// field selection.
    Unrolled(FieldSelection),
}

impl Default for Renderer {
    fn default() -> Self {
        Renderer::Machine
    }
}

#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    #[error("failed to encode event: {0}")]
    Encode(#[from] serde_json::Error),
}

impl Renderer {
    /// Append the rendering of `record`, terminated by a newline, to `buf`.
    ///
    /// On error `buf` may hold a partial rendering.
    pub fn render(&self, buf: &mut Vec<u8>, record: &Record<'_>) -> Result<(), RenderError> {
        match self {
            Renderer::Machine => {
                serde_json::to_writer(&mut *buf, record)?;
                buf.push(b'\n');
            }
            Renderer::Human { colors } => {
                write_pretty(buf, record, *colors)?;
                buf.push(b'\n');
            }
            Renderer::Unrolled(fields) => unrolled::render(buf, record, fields)?,
        }
        Ok(())
    }

    /// Like [`Renderer::render`], but an unrolled renderer uses `fields`
    /// instead of its own selection. The other renderers always write every
    /// field.
    pub fn render_with_fields(
        &self,
        buf: &mut Vec<u8>,
        record: &Record<'_>,
        fields: &FieldSelection,
    ) -> Result<(), RenderError> {
        match self {
            Renderer::Unrolled(_) => Ok(unrolled::render(buf, record, fields)?),
            other => other.render(buf, record),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Context;
    use crate::data;
    use crate::severity::Severity;
    use chrono::{TimeZone, Utc};
    use std::collections::HashMap;

    fn record(ctx: &Context) -> Record<'_> {
        let mut record = Record::at(
            Utc.with_ymd_and_hms(2024, 6, 21, 13, 44, 50).unwrap(),
            "ns",
            "starting",
            ctx,
        );
        record.severity = Some(Severity::Warn);
        record.data = Some(data! { "port" => 8080 });
        record
    }

    fn rendered(renderer: Renderer, record: &Record<'_>) -> String {
        let mut buf = Vec::new();
        renderer.render(&mut buf, record).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn machine_is_one_line() {
        let ctx = Context::background();
        assert_eq!(
            rendered(Renderer::Machine, &record(&ctx)),
            concat!(
                r#"{"created_at":"2024-06-21T13:44:50Z","namespace":"ns","event":"starting","#,
                r#""severity":2,"data":{"port":8080}}"#,
                "\n"
            )
        );
    }

    #[test]
    fn human_is_indented_and_newline_terminated() {
        let ctx = Context::background();
        let text = rendered(Renderer::Human { colors: false }, &record(&ctx));
        assert!(text.ends_with("}\n"));
        assert!(text.contains("\n  \"event\": \"starting\""));
        assert!(text.contains("\n    \"port\": 8080\n"));

        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value, serde_json::to_value(record(&ctx)).unwrap());
    }

    #[test]
    fn unrolled_parses_like_machine() {
        let ctx = Context::background();
        let unrolled = rendered(Renderer::Unrolled(FieldSelection::FULL), &record(&ctx));
        assert_eq!(unrolled.matches('\n').count(), 1);

        let mut a: serde_json::Value = serde_json::from_str(&unrolled).unwrap();
        let mut b: serde_json::Value =
            serde_json::from_str(&rendered(Renderer::Machine, &record(&ctx))).unwrap();
        a["created_at"].take();
        b["created_at"].take();
        assert_eq!(a, b);
    }

    #[test]
    fn explicit_fields_only_affect_the_unrolled_renderer() {
        let ctx = Context::background();
        let r = record(&ctx);
        let mut buf = Vec::new();
        Renderer::Unrolled(FieldSelection::FULL)
            .render_with_fields(&mut buf, &r, &FieldSelection::PROXY)
            .unwrap();
        assert!(!String::from_utf8_lossy(&buf).contains("namespace"));

        buf.clear();
        Renderer::Machine
            .render_with_fields(&mut buf, &r, &FieldSelection::PROXY)
            .unwrap();
        assert!(String::from_utf8_lossy(&buf).contains("namespace"));
    }

    #[test]
    fn every_renderer_reports_unencodable_data() {
        let ctx = Context::background();
        let mut bad = HashMap::new();
        bad.insert(vec![1u8], "value");
        let mut r = record(&ctx);
        r.data = Some(data! { "bad" => bad });

        for renderer in [
            Renderer::Machine,
            Renderer::Human { colors: false },
            Renderer::Unrolled(FieldSelection::FULL),
        ] {
            let mut buf = Vec::new();
            assert!(matches!(renderer.render(&mut buf, &r), Err(RenderError::Encode(_))));
        }
    }
}
