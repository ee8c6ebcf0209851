//! Sitemaps-protocol XML writer and a minimal `<loc>` reader.

use crate::cartography::record::UrlRecord;
use crate::error::{Result, SitemapError};
use chrono::SecondsFormat;
use quick_xml::escape::escape;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::io::Write;

pub const SITEMAP_NAMESPACE: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Render records as a `<urlset>` document, one `<url>` per record.
///
/// All text content is escaped for `<`, `>`, `&`, `'` and `"`.
pub fn write_urlset(records: &[UrlRecord]) -> Result<String> {
    let mut writer = Writer::new(Vec::new());
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut urlset = BytesStart::new("urlset");
    urlset.push_attribute(("xmlns", SITEMAP_NAMESPACE));
    writer.write_event(Event::Start(urlset))?;

    for record in records {
        writer.write_event(Event::Start(BytesStart::new("url")))?;
        write_text_element(&mut writer, "loc", &record.location)?;
        write_text_element(
            &mut writer,
            "lastmod",
            &record.last_modified.to_rfc3339_opts(SecondsFormat::Secs, true),
        )?;
        write_text_element(&mut writer, "changefreq", record.change_frequency.as_str())?;
        write_text_element(&mut writer, "priority", &record.priority.to_string())?;
        writer.write_event(Event::End(BytesEnd::new("url")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("urlset")))?;

    // Writer only ever receives &str input.
    Ok(String::from_utf8_lossy(&writer.into_inner()).into_owned())
}

fn write_text_element<W: Write>(writer: &mut Writer<W>, name: &str, text: &str) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::from_escaped(escape(text))))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

/// Read every `<loc>` value (unescaped) from a sitemap or sitemap index.
///
/// Fails on malformed XML, so it doubles as a well-formedness check.
pub fn parse_locations(xml: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut locations = Vec::new();
    let mut in_loc = false;
    let mut depth: usize = 0;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                depth += 1;
                in_loc = e.local_name().as_ref() == b"loc";
                if in_loc {
                    locations.push(String::new());
                }
            }
            Event::Text(e) if in_loc => {
                if let Some(current) = locations.last_mut() {
                    current.push_str(&e.unescape()?);
                }
            }
            Event::CData(e) if in_loc => {
                if let Some(current) = locations.last_mut() {
                    current.push_str(&String::from_utf8_lossy(&e));
                }
            }
            Event::End(_) => {
                depth = depth.saturating_sub(1);
                in_loc = false;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if depth != 0 {
        return Err(SitemapError::Malformed(format!("{depth} unclosed element(s)")));
    }

    Ok(locations)
}
