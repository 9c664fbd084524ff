// src/fetch/urls.rs

use once_cell::sync::Lazy;
use regex::Regex;
use url::{form_urlencoded, Url};

use crate::error::Result;

/// `/spreadsheets/d/<id>` optionally followed by `/edit…` or `/view…`.
static EDITOR_PATH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^/spreadsheets/d/([A-Za-z0-9_-]{10,})(?:/(?:edit|view)[^/]*)?/?$")
        .expect("editor path regex should compile")
});

/// Turn a Google Sheets editor link into its CSV export link.
///
/// `…/spreadsheets/d/<id>/edit#gid=<gid>` becomes
/// `https://docs.google.com/spreadsheets/d/<id>/gviz/tq?tqx=out:csv&gid=<gid>`.
/// Export, "publish to web" and non-Google links come back unchanged.
pub fn export_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim())?;
    if url.host_str() != Some("docs.google.com") {
        return Ok(url);
    }
    let Some(caps) = EDITOR_PATH.captures(url.path()) else {
        return Ok(url);
    };

    let gid = url
        .fragment()
        .and_then(gid_param)
        .or_else(|| url.query().and_then(gid_param))
        .unwrap_or_else(|| "0".to_string());

    let export = format!(
        "https://docs.google.com/spreadsheets/d/{}/gviz/tq?tqx=out:csv&gid={}",
        &caps[1], gid
    );
    Ok(Url::parse(&export)?)
}

fn gid_param(pairs: &str) -> Option<String> {
    form_urlencoded::parse(pairs.as_bytes())
        .find(|(k, _)| k == "gid")
        .map(|(_, v)| v.into_owned())
        .filter(|v| !v.is_empty() && v.chars().all(|c| c.is_ascii_digit()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID: &str = "1AfYExJcJEJVw6hOmPUUkBXBnbC16MM9vu453MpVLIpw";

    #[test]
    fn editor_link_becomes_csv_export() -> Result<()> {
        let u = export_url(&format!(
            "https://docs.google.com/spreadsheets/d/{ID}/edit#gid=123456"
        ))?;
        assert_eq!(
            u.as_str(),
            format!("https://docs.google.com/spreadsheets/d/{ID}/gviz/tq?tqx=out:csv&gid=123456")
        );

        let from_query = export_url(&format!(
            "https://docs.google.com/spreadsheets/d/{ID}/edit?usp=sharing&gid=7"
        ))?;
        assert!(from_query.as_str().ends_with("gid=7"));

        let bare = export_url(&format!("https://docs.google.com/spreadsheets/d/{ID}"))?;
        assert!(bare.as_str().ends_with("tqx=out:csv&gid=0"));
        Ok(())
    }

    #[test]
    fn other_links_pass_through() -> Result<()> {
        for raw in [
            format!("https://docs.google.com/spreadsheets/d/{ID}/gviz/tq?tqx=out:csv&gid=0"),
            "https://docs.google.com/spreadsheets/d/e/2PACX-1vQabc/pub?output=csv".to_string(),
            "https://opensheet.elk.sh/abc/Feuille1".to_string(),
        ] {
            assert_eq!(export_url(&raw)?.as_str(), raw);
        }
        Ok(())
    }

    #[test]
    fn garbage_is_an_error() {
        assert!(export_url("not a url").is_err());
    }
}
