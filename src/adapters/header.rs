use crate::domain::model::ModelHeader;
use crate::domain::ports::HeaderReader;
use crate::utils::error::{CatalogError, Result};
use chrono::{DateTime, NaiveDateTime};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

const FULL_MODEL: &[u8] = b"FullModel";
const SCENARIO_TIME: &[u8] = b"Model.scenarioTime";

/// 讀取 CGMES 文件的 `md:FullModel` 標頭。
///
/// id 取自 `rdf:about`（或 `rdf:ID`），scenario time 取自 `md:Model.scenarioTime`，
/// 帶時區的時間保留該時區的當地時間。
#[derive(Debug, Clone, Copy, Default)]
pub struct FullModelHeaderReader;

impl HeaderReader for FullModelHeaderReader {
    fn read_header(&self, content: &[u8]) -> Result<ModelHeader> {
        let mut reader = Reader::from_reader(content);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();
        let mut id: Option<String> = None;
        let mut in_scenario_time = false;
        let mut scenario_text: Option<String> = None;

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(e) => {
                    let name = e.local_name();
                    if id.is_none() && name.as_ref() == FULL_MODEL {
                        id = Some(model_id(&e)?);
                    } else if id.is_some() && name.as_ref() == SCENARIO_TIME {
                        in_scenario_time = true;
                    }
                }
                Event::Empty(e) => {
                    if id.is_none() && e.local_name().as_ref() == FULL_MODEL {
                        return Ok(ModelHeader {
                            id: model_id(&e)?,
                            scenario_time: None,
                        });
                    }
                }
                Event::Text(t) if in_scenario_time => {
                    if scenario_text.is_none() {
                        scenario_text = Some(t.unescape().map_err(malformed)?.into_owned());
                    }
                }
                Event::End(e) => {
                    let name = e.local_name();
                    if name.as_ref() == SCENARIO_TIME {
                        in_scenario_time = false;
                    } else if id.is_some() && name.as_ref() == FULL_MODEL {
                        break;
                    }
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        let id = id.ok_or_else(|| CatalogError::malformed("no md:FullModel header found"))?;
        let scenario_time = scenario_text
            .as_deref()
            .map(parse_scenario_time)
            .transpose()?;

        Ok(ModelHeader { id, scenario_time })
    }
}

fn malformed(e: impl std::fmt::Display) -> CatalogError {
    CatalogError::malformed(e.to_string())
}

fn model_id(element: &BytesStart<'_>) -> Result<String> {
    let mut about = None;
    let mut rdf_id = None;

    for attr in element.attributes() {
        let attr = attr.map_err(malformed)?;
        match attr.key.local_name().as_ref() {
            b"about" => about = Some(attr.unescape_value().map_err(malformed)?.trim().to_string()),
            b"ID" => rdf_id = Some(attr.unescape_value().map_err(malformed)?.trim().to_string()),
            _ => {}
        }
    }

    about
        .or(rdf_id)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| CatalogError::malformed("md:FullModel has no rdf:about identifier"))
}

fn parse_scenario_time(text: &str) -> Result<NaiveDateTime> {
    let text = text.trim();
    if let Ok(time) = DateTime::parse_from_rfc3339(text) {
        return Ok(time.naive_local());
    }
    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f").map_err(|e| {
        CatalogError::malformed(format!("invalid scenario time '{}': {}", text, e))
    })
}
